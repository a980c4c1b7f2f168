//! Markdown engine with a pluggable core rule stage.
//!
//! This crate shapes pulldown-cmark output into an [`emtag_core::Token`]
//! forest, runs the registered core rules over it, and renders HTML from the
//! resulting tokens. [`configure_markdown`] registers the emphasis rewrite
//! rule so that each emphasis marker can render to its own tag.
//!
//! # Example
//!
//! ```
//! use emtag_core::{EmphasisOptions, Marker};
//! use emtag_markdown::{MarkdownEngine, configure_markdown};
//!
//! let mut engine = MarkdownEngine::new();
//! configure_markdown(&mut engine, EmphasisOptions::new().with(Marker::DoubleUnderscore, "b"))
//!     .unwrap();
//!
//! assert_eq!(engine.render("__x__ **y**"), "<p><b>x</b> <strong>y</strong></p>");
//! ```

mod engine;
mod html;
mod tokenizer;
mod util;

pub use engine::{MarkdownEngine, configure_markdown};
pub use html::HtmlRenderer;
pub use util::escape_html;
