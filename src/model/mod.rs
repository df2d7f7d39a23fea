//! # The document model
//!
//! This module mirrors the JSON serialization of editor documents: a tree of
//! nodes tagged by `type`, where text nodes carry an ordered list of marks.
//! Node types the schema does not know are kept as [`Node::Other`] so that
//! their children are not lost, and anything that is not an object at all
//! becomes [`Node::Opaque`].
pub mod de;

use serde::{
    de::{DeserializeOwned, IgnoredAny},
    Deserialize,
};

/// A sequence of sibling nodes
pub type Fragment = Vec<Node>;

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct HeadingAttrs {
    #[serde(default, deserialize_with = "de::lenient_u64")]
    pub level: Option<u64>,
}

impl HeadingAttrs {
    /// The heading level, defaulting to 1
    pub fn level(&self) -> u64 {
        match self.level {
            Some(0) | None => 1,
            Some(level) => level,
        }
    }

    /// The heading level, limited to what HTML has tags for
    pub fn clamped_level(&self) -> u8 {
        self.level().min(6) as u8
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageAttrs {
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub src: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub alt: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub title: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderedListAttrs {
    #[serde(default, deserialize_with = "de::lenient_u64")]
    pub start: Option<u64>,
    #[serde(default, deserialize_with = "de::truthy")]
    pub tight: bool,
}

impl OrderedListAttrs {
    /// The first item number; a missing or zero `start` counts from 1.
    pub fn start(&self) -> u64 {
        match self.start {
            Some(0) | None => 1,
            Some(start) => start,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskItemAttrs {
    #[serde(default, deserialize_with = "de::truthy")]
    pub checked: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct CodeBlockAttrs {
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub language: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct TwitterAttrs {
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub src: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct MathAttrs {
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub latex: Option<String>,
}

/// A node that only has children
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct Block {
    #[serde(default, deserialize_with = "de::deserialize_or_default")]
    pub content: Fragment,
}

/// A node with attributes and children
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(bound(deserialize = "A: Default + DeserializeOwned"))]
pub struct AttrNode<A> {
    #[serde(default, deserialize_with = "de::deserialize_or_default")]
    pub attrs: A,
    #[serde(default, deserialize_with = "de::deserialize_or_default")]
    pub content: Fragment,
}

/// A node with attributes only
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(bound(deserialize = "A: Default + DeserializeOwned"))]
pub struct Leaf<A> {
    #[serde(default, deserialize_with = "de::deserialize_or_default")]
    pub attrs: A,
}

/// A run of text with its marks
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct TextNode {
    #[serde(default, deserialize_with = "de::deserialize_or_default")]
    pub text: String,
    #[serde(default, deserialize_with = "de::deserialize_or_default")]
    pub marks: Vec<Mark>,
}

/// The kinds of marks the renderer knows
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkType {
    Bold,
    Italic,
    Underline,
    TextColor,
    BackgroundColor,
    TextStyle,
    Code,
    Link,
    #[serde(other)]
    Unknown,
}

impl Default for MarkType {
    fn default() -> Self {
        Self::Unknown
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct MarkAttrs {
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub href: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub target: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub rel: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub class: Option<String>,
}

/// A text-level annotation
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct Mark {
    #[serde(rename = "type", default, deserialize_with = "de::deserialize_or_default")]
    pub kind: MarkType,
    #[serde(default, deserialize_with = "de::deserialize_or_default")]
    pub attrs: MarkAttrs,
}

impl Mark {
    /// A mark without attributes
    pub fn new(kind: MarkType) -> Self {
        Self {
            kind,
            attrs: MarkAttrs::default(),
        }
    }
}

/// A node in the document tree
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "NodeRepr")]
pub enum Node {
    /// The document root
    Doc(Block),
    /// A paragraph `<p>`
    Paragraph(Block),
    /// A text run
    Text(TextNode),
    /// A hard break `<br>`
    HardBreak,
    /// A heading, e.g. `<h1>`
    Heading(AttrNode<HeadingAttrs>),
    /// An image `<img>`
    Image(Leaf<ImageAttrs>),
    /// A bullet list `<ul>`
    BulletList(Block),
    /// An ordered list `<ol>`
    OrderedList(AttrNode<OrderedListAttrs>),
    /// A list item `<li>`
    ListItem(Block),
    /// A list of checkable items
    TaskList(Block),
    /// A checkable list item
    TaskItem(AttrNode<TaskItemAttrs>),
    /// A blockquote
    Blockquote(Block),
    /// A code block
    CodeBlock(AttrNode<CodeBlockAttrs>),
    /// A horizontal line `<hr>`
    HorizontalRule,
    /// An embedded post
    Twitter(Leaf<TwitterAttrs>),
    /// A LaTeX formula
    Math(Leaf<MathAttrs>),
    /// A node type outside of the schema
    Other {
        /// The `type` tag, if there was one
        kind: Option<String>,
        /// The children, if there were any
        content: Option<Fragment>,
    },
    /// A value that is not a node object
    Opaque,
}

impl Node {
    /// Create a text node without marks
    pub fn text<S: Into<String>>(text: S) -> Self {
        Self::Text(TextNode {
            text: text.into(),
            marks: Vec::new(),
        })
    }

    /// The children of this node, if it is a container
    pub fn content(&self) -> Option<&[Node]> {
        match self {
            Self::Doc(b)
            | Self::Paragraph(b)
            | Self::BulletList(b)
            | Self::ListItem(b)
            | Self::TaskList(b)
            | Self::Blockquote(b) => Some(&b.content),
            Self::Heading(n) => Some(&n.content),
            Self::OrderedList(n) => Some(&n.content),
            Self::TaskItem(n) => Some(&n.content),
            Self::CodeBlock(n) => Some(&n.content),
            Self::Other { content, .. } => content.as_deref(),
            Self::Text(_)
            | Self::HardBreak
            | Self::Image(_)
            | Self::HorizontalRule
            | Self::Twitter(_)
            | Self::Math(_)
            | Self::Opaque => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NodeRepr {
    Schema(SchemaNode),
    Other(OtherNode),
    Opaque(#[allow(dead_code)] IgnoredAny),
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum SchemaNode {
    Doc(Block),
    Paragraph(Block),
    Text(TextNode),
    HardBreak,
    Heading(AttrNode<HeadingAttrs>),
    Image(Leaf<ImageAttrs>),
    BulletList(Block),
    OrderedList(AttrNode<OrderedListAttrs>),
    ListItem(Block),
    TaskList(Block),
    TaskItem(AttrNode<TaskItemAttrs>),
    Blockquote(Block),
    CodeBlock(AttrNode<CodeBlockAttrs>),
    HorizontalRule,
    Twitter(Leaf<TwitterAttrs>),
    Math(Leaf<MathAttrs>),
}

#[derive(Deserialize)]
struct OtherNode {
    #[serde(rename = "type", default, deserialize_with = "de::lenient_string")]
    kind: Option<String>,
    #[serde(default, deserialize_with = "de::deserialize_or_default")]
    content: Option<Fragment>,
}

impl From<NodeRepr> for Node {
    fn from(repr: NodeRepr) -> Self {
        match repr {
            NodeRepr::Schema(node) => match node {
                SchemaNode::Doc(b) => Self::Doc(b),
                SchemaNode::Paragraph(b) => Self::Paragraph(b),
                SchemaNode::Text(t) => Self::Text(t),
                SchemaNode::HardBreak => Self::HardBreak,
                SchemaNode::Heading(n) => Self::Heading(n),
                SchemaNode::Image(l) => Self::Image(l),
                SchemaNode::BulletList(b) => Self::BulletList(b),
                SchemaNode::OrderedList(n) => Self::OrderedList(n),
                SchemaNode::ListItem(b) => Self::ListItem(b),
                SchemaNode::TaskList(b) => Self::TaskList(b),
                SchemaNode::TaskItem(n) => Self::TaskItem(n),
                SchemaNode::Blockquote(b) => Self::Blockquote(b),
                SchemaNode::CodeBlock(n) => Self::CodeBlock(n),
                SchemaNode::HorizontalRule => Self::HorizontalRule,
                SchemaNode::Twitter(l) => Self::Twitter(l),
                SchemaNode::Math(l) => Self::Math(l),
            },
            NodeRepr::Other(OtherNode { kind, content }) => Self::Other { kind, content },
            NodeRepr::Opaque(_) => Self::Opaque,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AttrNode, Block, HeadingAttrs, ImageAttrs, Mark, MarkAttrs, MarkType, Node, TextNode,
    };

    #[test]
    fn test_null_string() {
        assert_eq!(
            serde_json::from_str::<ImageAttrs>(r#"{"src": "", "alt": null}"#).unwrap(),
            ImageAttrs::default()
        );
    }

    #[test]
    fn test_doc() {
        let doc: Node = serde_json::from_str(
            r#"{"type":"doc","content":[
                {"type":"heading","attrs":{"level":2},"content":[{"type":"text","text":"Tours"}]},
                {"type":"paragraph"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(
            doc,
            Node::Doc(Block {
                content: vec![
                    Node::Heading(AttrNode {
                        attrs: HeadingAttrs { level: Some(2) },
                        content: vec![Node::text("Tours")],
                    }),
                    Node::Paragraph(Block::default()),
                ]
            })
        );
    }

    #[test]
    fn test_marks_keep_order() {
        let node: Node = serde_json::from_str(
            r#"{"type":"text","text":"X","marks":[
                {"type":"bold"},
                {"type":"link","attrs":{"href":"https://example.com","target":null}},
                {"type":"sparkle"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(
            node,
            Node::Text(TextNode {
                text: String::from("X"),
                marks: vec![
                    Mark::new(MarkType::Bold),
                    Mark {
                        kind: MarkType::Link,
                        attrs: MarkAttrs {
                            href: Some(String::from("https://example.com")),
                            ..MarkAttrs::default()
                        },
                    },
                    Mark::new(MarkType::Unknown),
                ],
            })
        );
    }

    #[test]
    fn test_unknown_types() {
        let node: Node = serde_json::from_str(
            r#"{"type":"customBlock","content":[{"type":"text","text":"Z"}]}"#,
        )
        .unwrap();
        assert_eq!(
            node,
            Node::Other {
                kind: Some(String::from("customBlock")),
                content: Some(vec![Node::text("Z")]),
            }
        );

        let leaf: Node = serde_json::from_str(r#"{"type":"mention","attrs":{"id":7}}"#).unwrap();
        assert_eq!(
            leaf,
            Node::Other {
                kind: Some(String::from("mention")),
                content: None,
            }
        );
        assert_eq!(leaf.content(), None);
    }

    #[test]
    fn test_non_objects_in_content() {
        let node: Node =
            serde_json::from_str(r#"{"type":"paragraph","content":[42, "x", null]}"#).unwrap();
        assert_eq!(
            node.content(),
            Some(&[Node::Opaque, Node::Opaque, Node::Opaque][..])
        );
    }

    #[test]
    fn test_lenient_attrs() {
        let node: Node = serde_json::from_str(
            r#"{"type":"heading","attrs":{"level":"9"},"content":"not a list"}"#,
        )
        .unwrap();
        match node {
            Node::Heading(n) => {
                assert_eq!(n.attrs.level(), 9);
                assert_eq!(n.attrs.clamped_level(), 6);
                assert!(n.content.is_empty());
            }
            other => panic!("expected a heading, got {:?}", other),
        }
    }

    #[test]
    fn test_leaf_with_extra_fields() {
        let node: Node =
            serde_json::from_str(r#"{"type":"hardBreak","attrs":{},"marks":[]}"#).unwrap();
        assert_eq!(node, Node::HardBreak);
    }
}
