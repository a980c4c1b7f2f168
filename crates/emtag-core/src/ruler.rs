//! Named rule pipeline for the core processing stage.
//!
//! The core stage runs after tokenization and before rendering. Each rule
//! receives the whole document state and may mutate its tokens in place.

use crate::error::RulerError;
use crate::options::EmphasisOptions;
use crate::rewrite::distinguish_emphases;
use crate::token::Token;

/// Name under which [`DistinguishEmphases`] is registered.
pub const DISTINGUISH_EMPHASES: &str = "distinguish_emphases";

/// Document state passed through the core rules.
#[derive(Debug, Clone, Default)]
pub struct CoreState {
    /// Markdown source of the document.
    pub src: String,
    /// Root-level tokens.
    pub tokens: Vec<Token>,
}

impl CoreState {
    /// Create state for a tokenized document.
    #[must_use]
    pub fn new(src: impl Into<String>, tokens: Vec<Token>) -> Self {
        Self {
            src: src.into(),
            tokens,
        }
    }
}

/// A rule in the core processing stage.
///
/// Rules take `&self` and must be `Send + Sync` so one configured pipeline can
/// process different documents on different threads. Per-document data lives
/// in [`CoreState`].
///
/// # Example
///
/// ```
/// use emtag_core::{CoreRule, CoreRuler, CoreState, Token, TokenKind};
///
/// struct DropRules;
///
/// impl CoreRule for DropRules {
///     fn name(&self) -> &str { "drop_rules" }
///
///     fn apply(&self, state: &mut CoreState) {
///         state.tokens.retain(|t| t.kind != TokenKind::Hr);
///     }
/// }
///
/// let mut ruler = CoreRuler::new();
/// ruler.push(DropRules).unwrap();
///
/// let mut state = CoreState::new("---", vec![Token::new(TokenKind::Hr, "hr")]);
/// ruler.process(&mut state);
/// assert!(state.tokens.is_empty());
/// ```
pub trait CoreRule: Send + Sync {
    /// Unique rule name within a ruler.
    fn name(&self) -> &str;

    /// Run the rule against one document.
    fn apply(&self, state: &mut CoreState);
}

struct Entry {
    rule: Box<dyn CoreRule>,
    enabled: bool,
}

impl Entry {
    fn name(&self) -> &str {
        self.rule.name()
    }
}

/// Ordered list of named core rules.
#[derive(Default)]
pub struct CoreRuler {
    rules: Vec<Entry>,
}

impl std::fmt::Debug for CoreRuler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|e| (e.name(), e.enabled)))
            .finish()
    }
}

impl CoreRuler {
    /// Create an empty ruler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule to the end of the chain.
    pub fn push<R: CoreRule + 'static>(&mut self, rule: R) -> Result<(), RulerError> {
        self.ensure_unique(rule.name())?;
        self.rules.push(Entry {
            rule: Box::new(rule),
            enabled: true,
        });
        Ok(())
    }

    /// Insert a rule immediately before the rule named `anchor`.
    pub fn before<R: CoreRule + 'static>(&mut self, anchor: &str, rule: R) -> Result<(), RulerError> {
        let index = self.position(anchor)?;
        self.insert(index, rule)
    }

    /// Insert a rule immediately after the rule named `anchor`.
    pub fn after<R: CoreRule + 'static>(&mut self, anchor: &str, rule: R) -> Result<(), RulerError> {
        let index = self.position(anchor)?;
        self.insert(index + 1, rule)
    }

    /// Enable a previously disabled rule.
    pub fn enable(&mut self, name: &str) -> Result<(), RulerError> {
        let index = self.position(name)?;
        self.rules[index].enabled = true;
        Ok(())
    }

    /// Disable a rule without removing it.
    pub fn disable(&mut self, name: &str) -> Result<(), RulerError> {
        let index = self.position(name)?;
        self.rules[index].enabled = false;
        Ok(())
    }

    /// Whether a rule with this name is registered (enabled or not).
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.rules.iter().any(|e| e.name() == name)
    }

    /// Names of enabled rules in execution order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.rules
            .iter()
            .filter(|e| e.enabled)
            .map(Entry::name)
            .collect()
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run all enabled rules in order.
    pub fn process(&self, state: &mut CoreState) {
        for entry in self.rules.iter().filter(|e| e.enabled) {
            tracing::debug!(rule = entry.name(), tokens = state.tokens.len(), "Running core rule");
            entry.rule.apply(state);
        }
    }

    fn insert<R: CoreRule + 'static>(&mut self, index: usize, rule: R) -> Result<(), RulerError> {
        self.ensure_unique(rule.name())?;
        self.rules.insert(
            index,
            Entry {
                rule: Box::new(rule),
                enabled: true,
            },
        );
        Ok(())
    }

    fn ensure_unique(&self, name: &str) -> Result<(), RulerError> {
        if self.contains(name) {
            return Err(RulerError::Duplicate(name.to_owned()));
        }
        Ok(())
    }

    fn position(&self, name: &str) -> Result<usize, RulerError> {
        self.rules
            .iter()
            .position(|e| e.name() == name)
            .ok_or_else(|| RulerError::NotFound(name.to_owned()))
    }
}

/// Core rule that rewrites emphasis tags by marker.
#[derive(Debug, Clone, Default)]
pub struct DistinguishEmphases {
    options: EmphasisOptions,
}

impl DistinguishEmphases {
    /// Create the rule with a fixed tag table.
    #[must_use]
    pub fn new(options: EmphasisOptions) -> Self {
        Self { options }
    }

    /// The tag table this rule applies.
    #[must_use]
    pub fn options(&self) -> &EmphasisOptions {
        &self.options
    }
}

impl CoreRule for DistinguishEmphases {
    fn name(&self) -> &str {
        DISTINGUISH_EMPHASES
    }

    fn apply(&self, state: &mut CoreState) {
        tracing::trace!(overrides = self.options.iter().count(), "Distinguishing emphases");
        distinguish_emphases(&mut state.tokens, &self.options);
    }
}

/// Register [`DistinguishEmphases`] at the end of `ruler`.
///
/// Fails with [`RulerError::Duplicate`] if the rule is already registered, so
/// the rewrite runs at most once per document.
pub fn configure(ruler: &mut CoreRuler, options: EmphasisOptions) -> Result<(), RulerError> {
    ruler.push(DistinguishEmphases::new(options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Marker;
    use crate::token::TokenKind;
    use pretty_assertions::assert_eq;

    struct Named(&'static str);

    impl CoreRule for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn apply(&self, state: &mut CoreState) {
            state.tokens.push(Token::text(self.0));
        }
    }

    fn contents(state: &CoreState) -> Vec<&str> {
        state.tokens.iter().map(|t| t.content.as_str()).collect()
    }

    #[test]
    fn test_rules_run_in_order() {
        let mut ruler = CoreRuler::new();
        ruler.push(Named("a")).unwrap();
        ruler.push(Named("c")).unwrap();
        ruler.before("c", Named("b")).unwrap();
        ruler.after("c", Named("d")).unwrap();

        let mut state = CoreState::default();
        ruler.process(&mut state);

        assert_eq!(contents(&state), vec!["a", "b", "c", "d"]);
        assert_eq!(ruler.names(), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut ruler = CoreRuler::new();
        ruler.push(Named("a")).unwrap();

        let err = ruler.push(Named("a")).unwrap_err();
        assert_eq!(err, RulerError::Duplicate("a".to_owned()));
        assert_eq!(ruler.len(), 1);
    }

    #[test]
    fn test_unknown_anchor() {
        let mut ruler = CoreRuler::new();
        let err = ruler.before("missing", Named("a")).unwrap_err();
        assert_eq!(err, RulerError::NotFound("missing".to_owned()));
        assert!(ruler.is_empty());
    }

    #[test]
    fn test_disable_and_enable() {
        let mut ruler = CoreRuler::new();
        ruler.push(Named("a")).unwrap();
        ruler.push(Named("b")).unwrap();
        ruler.disable("a").unwrap();

        let mut state = CoreState::default();
        ruler.process(&mut state);
        assert_eq!(contents(&state), vec!["b"]);
        assert_eq!(ruler.names(), vec!["b"]);
        assert!(ruler.contains("a"));

        ruler.enable("a").unwrap();
        let mut state = CoreState::default();
        ruler.process(&mut state);
        assert_eq!(contents(&state), vec!["a", "b"]);

        assert!(ruler.disable("zzz").is_err());
    }

    #[test]
    fn test_configure_registers_once() {
        let mut ruler = CoreRuler::new();
        configure(&mut ruler, EmphasisOptions::new()).unwrap();
        assert_eq!(ruler.names(), vec![DISTINGUISH_EMPHASES]);

        let err = configure(&mut ruler, EmphasisOptions::new()).unwrap_err();
        assert_eq!(err, RulerError::Duplicate(DISTINGUISH_EMPHASES.to_owned()));
    }

    #[test]
    fn test_distinguish_emphases_rule() {
        let mut ruler = CoreRuler::new();
        configure(
            &mut ruler,
            EmphasisOptions::new().with(Marker::Asterisk, "i"),
        )
        .unwrap();

        let inline = Token::new(TokenKind::Inline, "").with_children(vec![
            Token::new(TokenKind::EmphasisOpen, "em").with_markup("*"),
            Token::text("hello"),
            Token::new(TokenKind::EmphasisClose, "em").with_markup("*"),
        ]);
        let mut state = CoreState::new("*hello*", vec![inline]);
        ruler.process(&mut state);

        let tags: Vec<_> = state.tokens[0].children.iter().map(|t| t.tag.as_str()).collect();
        assert_eq!(tags, vec!["i", "", "i"]);
    }
}
