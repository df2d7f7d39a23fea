//! # Rich text rendering
//!
//! [`Renderer::render`] turns stored rich text into HTML. The input is
//! usually the JSON serialization of an editor document, but older records
//! hold plain text, and some callers pass a list wrapping the real payload.
//! Rendering never fails: a document that can't be parsed is shown as plain
//! text, and missing input is replaced by a placeholder.
//!
//! Decision order:
//!
//! 1. missing or empty input renders the empty placeholder
//! 2. a list renders its first element
//! 3. anything that is not a string is converted to one
//! 4. a string that looks like `{...}` is parsed as a document tree
//! 5. everything else, including malformed JSON, is split into paragraphs
mod mark;
mod node;
mod plain;

use crate::config::{OutputMode, RenderOptions};
use crate::model::{de::number_to_string, Fragment};
use crate::util::html::{escape_attr, escape_text, safe_color, safe_url};
use derive_new::new;
use displaydoc::Display;
use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;
use thiserror::Error;
use tracing::{trace, warn};

/// Rendered markup, ready to be inserted into a page without escaping
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RichText {
    pub html: String,
}

/// Some input to render
#[derive(Debug, Clone, PartialEq)]
pub enum Content<'a> {
    /// No value at all
    Missing,
    /// A string, either a serialized document or plain text
    Str(Cow<'a, str>),
    /// A list wrapping the real payload
    List(Vec<Content<'a>>),
    /// An arbitrary JSON value
    Json(Value),
}

impl<'a> Content<'a> {
    /// The string to render, or `None` if the input counts as empty
    fn resolve(self) -> Option<Cow<'a, str>> {
        match self {
            Self::Missing => None,
            Self::Str(s) if s.is_empty() => None,
            Self::Str(s) => Some(s),
            Self::List(list) => list.into_iter().next().and_then(Self::resolve),
            Self::Json(value) => match value {
                Value::Null | Value::Bool(false) => None,
                Value::Bool(true) => Some(Cow::Borrowed("true")),
                Value::Number(n) if n.as_f64() == Some(0.0) => None,
                Value::Number(n) => Some(Cow::Owned(number_to_string(&n))),
                Value::String(s) => Self::Str(Cow::Owned(s)).resolve(),
                Value::Array(list) => list.into_iter().next().map(Self::Json)?.resolve(),
                object @ Value::Object(_) => Some(Cow::Owned(object.to_string())),
            },
        }
    }
}

impl<'a> From<&'a str> for Content<'a> {
    fn from(s: &'a str) -> Self {
        Self::Str(Cow::Borrowed(s))
    }
}

impl From<String> for Content<'_> {
    fn from(s: String) -> Self {
        Self::Str(Cow::Owned(s))
    }
}

impl<'a, T: Into<Content<'a>>> From<Option<T>> for Content<'a> {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Missing, Into::into)
    }
}

impl<'a, T: Into<Content<'a>>> From<Vec<T>> for Content<'a> {
    fn from(list: Vec<T>) -> Self {
        Self::List(list.into_iter().map(Into::into).collect())
    }
}

impl<'a> From<&'a [&'a str]> for Content<'a> {
    fn from(list: &'a [&'a str]) -> Self {
        Self::List(list.iter().map(|s| Self::from(*s)).collect())
    }
}

impl From<Value> for Content<'_> {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<&Value> for Content<'_> {
    fn from(value: &Value) -> Self {
        Self::Json(value.clone())
    }
}

/// Why a string was not rendered as a document tree
#[derive(Debug, Error, Display)]
pub enum ParseDiagnostic {
    /// Input does not look like a document object
    NotADocument,
    /// Malformed document JSON: {0}
    Json(#[from] serde_json::Error),
    /// Document has neither a `doc` root nor a `content` list
    InvalidStructure,
}

/// Renders rich text with a fixed set of options
#[derive(Debug, Clone, Default, new)]
pub struct Renderer {
    options: RenderOptions,
}

/// Render with the default options
pub fn parse_rich_text<'a, C: Into<Content<'a>>>(content: C) -> RichText {
    Renderer::default().render(content)
}

impl Renderer {
    /// The options this renderer uses
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render any input into HTML
    pub fn render<'a, C: Into<Content<'a>>>(&self, content: C) -> RichText {
        let html = match content.into().resolve() {
            Some(source) => self.render_str(&source),
            None => self.text(&self.options.empty_placeholder).into_owned(),
        };
        RichText { html }
    }

    fn render_str(&self, source: &str) -> String {
        match self.parse_document(source) {
            Ok(html) => html,
            Err(ParseDiagnostic::InvalidStructure) => {
                self.text(&self.options.invalid_placeholder).into_owned()
            }
            Err(ParseDiagnostic::NotADocument) => self.plain_text(source),
            Err(ParseDiagnostic::Json(err)) => {
                warn!("Could not parse rich text document, using plain text: {}", err);
                self.plain_text(source)
            }
        }
    }

    /// Render a string as a document tree, if it is one
    pub fn parse_document(&self, source: &str) -> Result<String, ParseDiagnostic> {
        let trimmed = source.trim();
        if !(trimmed.starts_with('{') && trimmed.ends_with('}')) {
            return Err(ParseDiagnostic::NotADocument);
        }
        let mut root = match serde_json::from_str::<Value>(trimmed)? {
            Value::Object(root) => root,
            _ => return Err(ParseDiagnostic::InvalidStructure),
        };
        let is_doc = root.get("type").and_then(Value::as_str) == Some("doc");
        let content = match root.remove("content") {
            Some(content @ Value::Array(_)) => content,
            _ if is_doc => Value::Array(Vec::new()),
            _ => return Err(ParseDiagnostic::InvalidStructure),
        };
        let nodes: Fragment = serde_json::from_value(content)?;
        trace!("Rendering {} top-level nodes", nodes.len());
        Ok(self.process_content(&nodes))
    }

    fn sanitize(&self) -> bool {
        self.options.mode == OutputMode::Sanitize
    }

    /// Text content in the current output mode
    fn text<'s>(&self, s: &'s str) -> Cow<'s, str> {
        if self.sanitize() {
            escape_text(s)
        } else {
            Cow::Borrowed(s)
        }
    }

    /// An attribute value in the current output mode
    fn attr<'s>(&self, s: &'s str) -> Cow<'s, str> {
        if self.sanitize() {
            escape_attr(s)
        } else {
            Cow::Borrowed(s)
        }
    }

    /// A URL attribute, `None` if it is missing or not allowed
    fn url<'s>(&self, url: Option<&'s str>) -> Option<Cow<'s, str>> {
        let url = url?;
        if self.sanitize() {
            safe_url(url, &self.options.allowed_schemes).map(escape_attr)
        } else {
            Some(Cow::Borrowed(url))
        }
    }

    /// A color for a `style` attribute, `None` if missing or not a color
    fn color<'s>(&self, color: Option<&'s str>) -> Option<Cow<'s, str>> {
        let color = color?;
        if self.sanitize() {
            safe_color(color).map(Cow::Borrowed)
        } else {
            Some(Cow::Borrowed(color))
        }
    }
}
