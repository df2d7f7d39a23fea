use super::Renderer;
use std::borrow::Cow;

impl Renderer {
    /// Format plain text as paragraphs.
    ///
    /// Blank lines separate paragraphs and single newlines become `<br>`.
    /// Windows line endings are normalized unless rendering in legacy mode.
    /// Input without any non-blank paragraph is returned as-is.
    pub(crate) fn plain_text(&self, source: &str) -> String {
        let normalized = if self.sanitize() {
            Cow::Owned(source.replace("\r\n", "\n"))
        } else {
            Cow::Borrowed(source)
        };
        let html: String = normalized
            .split("\n\n")
            .map(str::trim)
            .filter(|para| !para.is_empty())
            .map(|para| format!("<p>{}</p>", self.text(para).replace('\n', "<br>")))
            .collect();
        if html.is_empty() {
            self.text(source).into_owned()
        } else {
            html
        }
    }
}
