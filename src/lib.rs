//! # Rich text rendering
//!
//! Turns stored editor documents (JSON node trees) and legacy plain text
//! into HTML. See [`render`] for the rendering rules and [`batch`] for
//! rendering whole folders of documents.
pub mod batch;
pub mod config;
pub mod model;
pub mod render;
pub mod util;

pub use render::{parse_rich_text, Content, Renderer, RichText};
