//! Markdown engine: tokenize, run core rules, render.

use emtag_core::{CoreRuler, CoreState, EmphasisOptions, RulerError, Token, configure};
use pulldown_cmark::{Options, Parser};

use crate::html::HtmlRenderer;
use crate::tokenizer::Tokenizer;

/// Markdown engine with a configurable core rule stage.
///
/// Documents go through three phases:
/// 1. pulldown-cmark parsing, shaped into a [`Token`] forest
/// 2. the [`CoreRuler`] rules, in order
/// 3. HTML rendering from the (possibly rewritten) tokens
///
/// The engine holds no per-document state, so `&MarkdownEngine` can be shared
/// across threads.
///
/// # Example
///
/// ```
/// use emtag_core::{EmphasisOptions, Marker};
/// use emtag_markdown::{MarkdownEngine, configure_markdown};
///
/// let mut engine = MarkdownEngine::new();
/// let options = EmphasisOptions::new()
///     .with(Marker::Asterisk, "i")
///     .with(Marker::Underscore, "cite");
/// configure_markdown(&mut engine, options).unwrap();
///
/// let html = engine.render("*hello* and _world_");
/// assert_eq!(html, "<p><i>hello</i> and <cite>world</cite></p>");
/// ```
#[derive(Debug)]
pub struct MarkdownEngine {
    gfm: bool,
    core: CoreRuler,
    renderer: HtmlRenderer,
}

impl MarkdownEngine {
    /// Create an engine with GFM enabled and an empty core stage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            gfm: true,
            core: CoreRuler::new(),
            renderer: HtmlRenderer::new(),
        }
    }

    /// Enable or disable GitHub Flavored Markdown features.
    ///
    /// GFM is enabled by default. When enabled, the parser supports:
    /// - Tables
    /// - Strikethrough (`~~text~~`)
    /// - Task lists (`- [ ] item`)
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Get parser options based on GFM configuration.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            Options::empty()
        }
    }

    /// The core rule stage.
    #[must_use]
    pub fn core(&self) -> &CoreRuler {
        &self.core
    }

    /// Mutable access to the core rule stage, for registering rules.
    pub fn core_mut(&mut self) -> &mut CoreRuler {
        &mut self.core
    }

    /// Tokenize without running core rules.
    #[must_use]
    pub fn tokenize(&self, markdown: &str) -> Vec<Token> {
        let parser = Parser::new_ext(markdown, self.parser_options());
        Tokenizer::new(markdown).tokenize(parser)
    }

    /// Tokenize and run all enabled core rules.
    #[must_use]
    pub fn parse(&self, markdown: &str) -> Vec<Token> {
        let tokens = self.tokenize(markdown);
        tracing::debug!(bytes = markdown.len(), tokens = tokens.len(), "Tokenized document");

        let mut state = CoreState::new(markdown, tokens);
        self.core.process(&mut state);
        state.tokens
    }

    /// Parse and render markdown to HTML.
    #[must_use]
    pub fn render(&self, markdown: &str) -> String {
        self.render_tokens(&self.parse(markdown))
    }

    /// Render an already processed token sequence.
    #[must_use]
    pub fn render_tokens(&self, tokens: &[Token]) -> String {
        self.renderer.render(tokens)
    }
}

impl Default for MarkdownEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Register the emphasis rewrite rule in `engine`'s core stage.
///
/// The rule runs after tokenization and before rendering, once per document.
/// Calling this twice on one engine returns [`RulerError::Duplicate`].
pub fn configure_markdown(
    engine: &mut MarkdownEngine,
    options: EmphasisOptions,
) -> Result<(), RulerError> {
    tracing::debug!(overrides = options.iter().count(), "Configuring emphasis tags");
    configure(engine.core_mut(), options)
}
