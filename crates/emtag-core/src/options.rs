//! Emphasis markers and the per-marker tag table.

use std::fmt;
use std::str::FromStr;

use crate::error::UnknownMarker;
use crate::token::TokenKind;

/// Literal delimiter that produced an emphasis token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Marker {
    /// `_`
    Underscore,
    /// `__`
    DoubleUnderscore,
    /// `*`
    Asterisk,
    /// `**`
    DoubleAsterisk,
}

impl Marker {
    /// All markers, in table order.
    pub const ALL: [Marker; 4] = [
        Marker::Underscore,
        Marker::DoubleUnderscore,
        Marker::Asterisk,
        Marker::DoubleAsterisk,
    ];

    /// Literal source text of the marker.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Underscore => "_",
            Self::DoubleUnderscore => "__",
            Self::Asterisk => "*",
            Self::DoubleAsterisk => "**",
        }
    }

    /// Match token markup against the four literals. Anything else is `None`.
    #[must_use]
    pub fn from_markup(markup: &str) -> Option<Self> {
        match markup {
            "_" => Some(Self::Underscore),
            "__" => Some(Self::DoubleUnderscore),
            "*" => Some(Self::Asterisk),
            "**" => Some(Self::DoubleAsterisk),
            _ => None,
        }
    }

    /// Emphasis weight this marker produces.
    #[must_use]
    pub fn weight(self) -> Weight {
        match self {
            Self::Underscore | Self::Asterisk => Weight::Single,
            Self::DoubleUnderscore | Self::DoubleAsterisk => Weight::Double,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Marker {
    type Err = UnknownMarker;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_markup(s).ok_or_else(|| UnknownMarker(s.to_owned()))
    }
}

/// Emphasis weight: one delimiter (`em`) or two (`strong`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Single,
    Double,
}

impl Weight {
    /// Whether a token of `kind` opens or closes an emphasis of this weight.
    #[must_use]
    pub fn accepts(self, kind: TokenKind) -> bool {
        match self {
            Self::Single => matches!(kind, TokenKind::EmphasisOpen | TokenKind::EmphasisClose),
            Self::Double => matches!(kind, TokenKind::StrongOpen | TokenKind::StrongClose),
        }
    }
}

/// Replacement output tag per emphasis marker.
///
/// A sparse table: markers without an entry keep the engine's default tag.
/// Empty tag strings are treated as unset.
///
/// # Example
///
/// ```
/// use emtag_core::{EmphasisOptions, Marker};
///
/// let options = EmphasisOptions::new()
///     .with(Marker::Underscore, "u")
///     .with(Marker::DoubleAsterisk, "b");
///
/// assert_eq!(options.get(Marker::Underscore), Some("u"));
/// assert_eq!(options.get(Marker::Asterisk), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmphasisOptions {
    tags: [Option<String>; 4],
}

impl EmphasisOptions {
    /// Create an empty table (no overrides).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from string keys. Keys that are not markers are ignored.
    ///
    /// ```
    /// use emtag_core::{EmphasisOptions, Marker};
    ///
    /// let options = EmphasisOptions::from_pairs([("*", "i"), ("~", "del")]);
    /// assert_eq!(options.get(Marker::Asterisk), Some("i"));
    /// assert_eq!(options.iter().count(), 1);
    /// ```
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut options = Self::new();
        for (key, tag) in pairs {
            if let Some(marker) = Marker::from_markup(key.as_ref()) {
                options.set(marker, tag);
            }
        }
        options
    }

    /// Set the tag for `marker`.
    #[must_use]
    pub fn with(mut self, marker: Marker, tag: impl Into<String>) -> Self {
        self.set(marker, tag);
        self
    }

    /// Set the tag for `marker`. An empty tag clears the entry.
    pub fn set(&mut self, marker: Marker, tag: impl Into<String>) {
        let tag = tag.into();
        self.tags[marker.index()] = (!tag.is_empty()).then_some(tag);
    }

    /// Remove the entry for `marker`.
    pub fn clear(&mut self, marker: Marker) {
        self.tags[marker.index()] = None;
    }

    /// Replacement tag for `marker`, if configured.
    #[must_use]
    pub fn get(&self, marker: Marker) -> Option<&str> {
        self.tags[marker.index()].as_deref()
    }

    /// Whether no marker has a replacement.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.iter().all(Option::is_none)
    }

    /// Configured entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = (Marker, &str)> + '_ {
        Marker::ALL
            .into_iter()
            .filter_map(|marker| self.get(marker).map(|tag| (marker, tag)))
    }
}
