//! HTML renderer for token forests.
//!
//! Open and close tokens are written with their `tag` field verbatim, so tags
//! rewritten by core rules show up in the output as-is.

use std::fmt::Write;

use emtag_core::{Token, TokenKind};

use crate::util::escape_html;

/// Renders tokens to HTML.
///
/// Output has no newlines between blocks; soft breaks render as `\n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    /// Create a renderer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Render a root-level token sequence.
    #[must_use]
    pub fn render(&self, tokens: &[Token]) -> String {
        let mut out = String::with_capacity(4096);
        for token in tokens {
            self.render_token(token, &mut out);
        }
        out
    }

    fn render_token(&self, token: &Token, out: &mut String) {
        match token.kind {
            TokenKind::Inline => {
                for child in &token.children {
                    self.render_token(child, out);
                }
            }
            TokenKind::Text => out.push_str(&escape_html(&token.content)),
            TokenKind::CodeInline => {
                write!(out, "<{tag}>{}</{tag}>", escape_html(&token.content), tag = token.tag)
                    .unwrap();
            }
            TokenKind::HtmlInline | TokenKind::HtmlBlock => out.push_str(&token.content),
            TokenKind::Softbreak => out.push('\n'),
            TokenKind::Hardbreak | TokenKind::Hr => {
                write!(out, "<{}>", token.tag).unwrap();
            }
            TokenKind::Fence => {
                let lang = token.info.split_whitespace().next().unwrap_or_default();
                if lang.is_empty() {
                    write!(out, "<pre><code>{}</code></pre>", escape_html(&token.content)).unwrap();
                } else {
                    write!(
                        out,
                        r#"<pre><code class="language-{}">{}</code></pre>"#,
                        escape_html(lang),
                        escape_html(&token.content)
                    )
                    .unwrap();
                }
            }
            TokenKind::CodeBlock => {
                write!(out, "<pre><code>{}</code></pre>", escape_html(&token.content)).unwrap();
            }
            kind if kind == TokenKind::Image || kind.nesting() > 0 => {
                out.push('<');
                out.push_str(&token.tag);
                push_attrs(token, out);
                out.push('>');
            }
            kind if kind.nesting() < 0 => {
                write!(out, "</{}>", token.tag).unwrap();
            }
            _ => {}
        }
    }
}

fn push_attrs(token: &Token, out: &mut String) {
    for (name, value) in &token.attrs {
        write!(out, r#" {name}="{}""#, escape_html(value)).unwrap();
    }
}
