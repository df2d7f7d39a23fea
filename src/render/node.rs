use super::Renderer;
use crate::model::Node;

impl Renderer {
    /// Render a list of sibling nodes
    pub(crate) fn process_content(&self, nodes: &[Node]) -> String {
        nodes.iter().map(|node| self.process_node(node)).collect()
    }

    fn process_node(&self, node: &Node) -> String {
        match node {
            Node::Doc(doc) => self.process_content(&doc.content),
            Node::Paragraph(p) => format!("<p>{}</p>", self.process_content(&p.content)),
            Node::Text(text) => self.apply_marks(text),
            Node::HardBreak => String::from("<br>"),
            Node::Heading(h) => {
                let level = if self.sanitize() {
                    u64::from(h.attrs.clamped_level())
                } else {
                    h.attrs.level()
                };
                format!(
                    "<h{0}>{1}</h{0}>",
                    level,
                    self.process_content(&h.content)
                )
            }
            Node::Image(img) => {
                let src = self.url(img.attrs.src.as_deref()).unwrap_or_default();
                let alt = img.attrs.alt.as_deref().map(|s| self.attr(s)).unwrap_or_default();
                let title = img.attrs.title.as_deref().map(|s| self.attr(s)).unwrap_or_default();
                format!(r#"<img src="{}" alt="{}" title="{}" />"#, src, alt, title)
            }
            Node::BulletList(list) => format!("<ul>{}</ul>", self.process_content(&list.content)),
            Node::OrderedList(list) => {
                let spacing = if list.attrs.tight {
                    "list-tight"
                } else {
                    "list-loose"
                };
                format!(
                    r#"<ol start="{}" class="{}">{}</ol>"#,
                    list.attrs.start(),
                    spacing,
                    self.process_content(&list.content)
                )
            }
            Node::ListItem(item) => format!("<li>{}</li>", self.process_content(&item.content)),
            Node::TaskList(list) => format!("<ul>{}</ul>", self.process_content(&list.content)),
            Node::TaskItem(item) => {
                let checked = item.attrs.checked;
                format!(
                    r#"<li data-checked="{}"><input type="checkbox" disabled{}><div>{}</div></li>"#,
                    checked,
                    if checked { " checked" } else { "" },
                    self.process_content(&item.content)
                )
            }
            Node::Blockquote(quote) => format!(
                "<blockquote>{}</blockquote>",
                self.process_content(&quote.content)
            ),
            Node::CodeBlock(code) => {
                let language = code
                    .attrs
                    .language
                    .as_deref()
                    .map(|s| self.attr(s))
                    .unwrap_or_default();
                format!(
                    r#"<pre><code class="language-{}">{}</code></pre>"#,
                    language,
                    self.process_content(&code.content)
                )
            }
            Node::HorizontalRule => String::from("<hr>"),
            Node::Twitter(tweet) => match self.url(tweet.attrs.src.as_deref()) {
                Some(src) => format!(
                    r#"<div class="twitter-card"><a href="{0}" target="_blank" rel="noopener noreferrer">{0}</a></div>"#,
                    src
                ),
                None => String::new(),
            },
            Node::Math(math) => match math.attrs.latex.as_deref() {
                Some(latex) => format!(r#"<code class="math-inline">{}</code>"#, self.text(latex)),
                None => String::new(),
            },
            Node::Other { content: Some(content), .. } => self.process_content(content),
            Node::Other { content: None, .. } | Node::Opaque => String::new(),
        }
    }
}
