//! Emphasis tag rewriting.
//!
//! Replaces the output tag of emphasis open/close tokens according to the
//! marker that produced them, so that `_x_` and `*x*` (or `__x__` and
//! `**x**`) can render to different elements.

use crate::options::{EmphasisOptions, Marker};
use crate::token::Token;

/// Rewrite emphasis tags in `token` and all of its descendants.
///
/// Containers are only recursed into; their own fields are never checked.
/// A leaf is rewritten when its markup is one of the four markers, that marker
/// has a configured tag, and the token kind matches the marker's weight.
/// Only [`Token::tag`] is ever modified.
///
/// The previous tag is not kept, so a second pass with different options
/// overwrites or keeps the first pass's tags; it never restores defaults.
///
/// # Example
///
/// ```
/// use emtag_core::{EmphasisOptions, Marker, Token, TokenKind, replace_emphasis_markers};
///
/// let options = EmphasisOptions::new().with(Marker::Underscore, "u");
/// let mut token = Token::new(TokenKind::EmphasisOpen, "em").with_markup("_");
///
/// replace_emphasis_markers(&mut token, &options);
/// assert_eq!(token.tag, "u");
/// ```
pub fn replace_emphasis_markers(token: &mut Token, options: &EmphasisOptions) {
    if token.is_container() {
        for child in &mut token.children {
            replace_emphasis_markers(child, options);
        }
        return;
    }

    let Some(marker) = Marker::from_markup(&token.markup) else {
        return;
    };
    if let Some(tag) = options.get(marker)
        && marker.weight().accepts(token.kind)
    {
        tag.clone_into(&mut token.tag);
    }
}

/// Rewrite every root-level token of a document, left to right.
pub fn distinguish_emphases(tokens: &mut [Token], options: &EmphasisOptions) {
    for token in tokens {
        replace_emphasis_markers(token, options);
    }
}
