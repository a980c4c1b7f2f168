//! Emphasis tag rewriting for markdown token trees.
//!
//! Markdown renders `_x_` and `*x*` to the same `<em>`, and `__x__` and
//! `**x**` to the same `<strong>`. This crate lets each of the four markers
//! choose its own output tag by rewriting the token tree between
//! tokenization and rendering.
//!
//! # Architecture
//!
//! - [`Token`] / [`TokenKind`]: markdown-it shaped token tree
//! - [`EmphasisOptions`]: marker to tag table keyed by [`Marker`]
//! - [`replace_emphasis_markers`]: recursive rewrite of one token subtree
//! - [`CoreRuler`]: named rule chain for the core processing stage, with
//!   [`DistinguishEmphases`] as the rule wrapping the rewrite
//!
//! # Example
//!
//! ```
//! use emtag_core::{CoreRuler, CoreState, EmphasisOptions, Marker, Token, TokenKind, configure};
//!
//! let mut ruler = CoreRuler::new();
//! configure(&mut ruler, EmphasisOptions::new().with(Marker::Underscore, "cite")).unwrap();
//!
//! let tokens = vec![Token::new(TokenKind::Inline, "").with_children(vec![
//!     Token::new(TokenKind::EmphasisOpen, "em").with_markup("_"),
//!     Token::text("title"),
//!     Token::new(TokenKind::EmphasisClose, "em").with_markup("_"),
//! ])];
//! let mut state = CoreState::new("_title_", tokens);
//! ruler.process(&mut state);
//!
//! assert_eq!(state.tokens[0].children[0].tag, "cite");
//! ```

mod error;
mod options;
mod rewrite;
mod ruler;
mod token;

pub use error::{RulerError, UnknownMarker};
pub use options::{EmphasisOptions, Marker, Weight};
pub use rewrite::{distinguish_emphases, replace_emphasis_markers};
pub use ruler::{
    CoreRule, CoreRuler, CoreState, DISTINGUISH_EMPHASES, DistinguishEmphases, configure,
};
pub use token::{Token, TokenKind};
