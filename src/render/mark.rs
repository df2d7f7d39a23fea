use super::Renderer;
use crate::model::{Mark, MarkType, TextNode};

impl Renderer {
    /// Wrap the text of a node in its marks.
    ///
    /// Each mark wraps the result of the previous one, so the first mark ends
    /// up innermost.
    pub(crate) fn apply_marks(&self, node: &TextNode) -> String {
        let text = self.text(&node.text).into_owned();
        node.marks
            .iter()
            .fold(text, |inner, mark| self.wrap_mark(mark, inner))
    }

    fn wrap_mark(&self, mark: &Mark, inner: String) -> String {
        let attrs = &mark.attrs;
        match mark.kind {
            MarkType::Bold => format!("<strong>{}</strong>", inner),
            MarkType::Italic => format!("<em>{}</em>", inner),
            MarkType::Underline => format!("<u>{}</u>", inner),
            MarkType::Code => format!("<code>{}</code>", inner),
            MarkType::TextColor | MarkType::TextStyle => match self.color(attrs.color.as_deref()) {
                Some(color) => format!(r#"<span style="color: {}">{}</span>"#, color, inner),
                None => inner,
            },
            MarkType::BackgroundColor => match self.color(attrs.color.as_deref()) {
                Some(color) => format!(
                    r#"<span style="background-color: {}">{}</span>"#,
                    color, inner
                ),
                None => inner,
            },
            MarkType::Link => match self.url(attrs.href.as_deref()) {
                Some(href) => {
                    let options = self.options();
                    let target = self.attr(attrs.target.as_deref().unwrap_or(&options.link_target));
                    let rel = self.attr(attrs.rel.as_deref().unwrap_or(&options.link_rel));
                    let class = match attrs.class.as_deref() {
                        Some(class) => format!(r#" class="{}""#, self.attr(class)),
                        None => String::new(),
                    };
                    format!(
                        r#"<a href="{}" target="{}" rel="{}"{}>{}</a>"#,
                        href, target, rel, class, inner
                    )
                }
                None => inner,
            },
            MarkType::Unknown => inner,
        }
    }
}
