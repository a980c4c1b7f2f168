//! Token tree produced by the markdown engine.
//!
//! Tokens follow the markdown-it shape: block-level tokens form a flat
//! root-level sequence, and runs of inline content are wrapped in a single
//! [`TokenKind::Inline`] container whose children are inline leaves.

/// Token type.
///
/// Opening kinds have nesting `1`, closing kinds `-1`, and self-contained
/// kinds `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    ParagraphOpen,
    ParagraphClose,
    HeadingOpen,
    HeadingClose,
    BlockquoteOpen,
    BlockquoteClose,
    BulletListOpen,
    BulletListClose,
    OrderedListOpen,
    OrderedListClose,
    ListItemOpen,
    ListItemClose,
    TableOpen,
    TableClose,
    TheadOpen,
    TheadClose,
    TbodyOpen,
    TbodyClose,
    TrOpen,
    TrClose,
    ThOpen,
    ThClose,
    TdOpen,
    TdClose,
    Fence,
    CodeBlock,
    HtmlBlock,
    Hr,
    /// Container for a run of inline tokens.
    Inline,
    Text,
    CodeInline,
    HtmlInline,
    Softbreak,
    Hardbreak,
    LinkOpen,
    LinkClose,
    EmphasisOpen,
    EmphasisClose,
    StrongOpen,
    StrongClose,
    StrikethroughOpen,
    StrikethroughClose,
    /// Image; its children carry the alt text.
    Image,
}

impl TokenKind {
    /// markdown-it style type name (`em_open`, `paragraph_close`, ...).
    #[must_use]
    pub fn type_name(self) -> &'static str {
        match self {
            Self::ParagraphOpen => "paragraph_open",
            Self::ParagraphClose => "paragraph_close",
            Self::HeadingOpen => "heading_open",
            Self::HeadingClose => "heading_close",
            Self::BlockquoteOpen => "blockquote_open",
            Self::BlockquoteClose => "blockquote_close",
            Self::BulletListOpen => "bullet_list_open",
            Self::BulletListClose => "bullet_list_close",
            Self::OrderedListOpen => "ordered_list_open",
            Self::OrderedListClose => "ordered_list_close",
            Self::ListItemOpen => "list_item_open",
            Self::ListItemClose => "list_item_close",
            Self::TableOpen => "table_open",
            Self::TableClose => "table_close",
            Self::TheadOpen => "thead_open",
            Self::TheadClose => "thead_close",
            Self::TbodyOpen => "tbody_open",
            Self::TbodyClose => "tbody_close",
            Self::TrOpen => "tr_open",
            Self::TrClose => "tr_close",
            Self::ThOpen => "th_open",
            Self::ThClose => "th_close",
            Self::TdOpen => "td_open",
            Self::TdClose => "td_close",
            Self::Fence => "fence",
            Self::CodeBlock => "code_block",
            Self::HtmlBlock => "html_block",
            Self::Hr => "hr",
            Self::Inline => "inline",
            Self::Text => "text",
            Self::CodeInline => "code_inline",
            Self::HtmlInline => "html_inline",
            Self::Softbreak => "softbreak",
            Self::Hardbreak => "hardbreak",
            Self::LinkOpen => "link_open",
            Self::LinkClose => "link_close",
            Self::EmphasisOpen => "em_open",
            Self::EmphasisClose => "em_close",
            Self::StrongOpen => "strong_open",
            Self::StrongClose => "strong_close",
            Self::StrikethroughOpen => "s_open",
            Self::StrikethroughClose => "s_close",
            Self::Image => "image",
        }
    }

    /// Nesting level change: `1` opens, `-1` closes, `0` is self-contained.
    #[must_use]
    pub fn nesting(self) -> i8 {
        match self {
            Self::ParagraphOpen
            | Self::HeadingOpen
            | Self::BlockquoteOpen
            | Self::BulletListOpen
            | Self::OrderedListOpen
            | Self::ListItemOpen
            | Self::TableOpen
            | Self::TheadOpen
            | Self::TbodyOpen
            | Self::TrOpen
            | Self::ThOpen
            | Self::TdOpen
            | Self::LinkOpen
            | Self::EmphasisOpen
            | Self::StrongOpen
            | Self::StrikethroughOpen => 1,
            Self::ParagraphClose
            | Self::HeadingClose
            | Self::BlockquoteClose
            | Self::BulletListClose
            | Self::OrderedListClose
            | Self::ListItemClose
            | Self::TableClose
            | Self::TheadClose
            | Self::TbodyClose
            | Self::TrClose
            | Self::ThClose
            | Self::TdClose
            | Self::LinkClose
            | Self::EmphasisClose
            | Self::StrongClose
            | Self::StrikethroughClose => -1,
            Self::Fence
            | Self::CodeBlock
            | Self::HtmlBlock
            | Self::Hr
            | Self::Inline
            | Self::Text
            | Self::CodeInline
            | Self::HtmlInline
            | Self::Softbreak
            | Self::Hardbreak
            | Self::Image => 0,
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for TokenKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.type_name())
    }
}

/// Node in the parsed document tree.
///
/// Only [`tag`](Self::tag) is mutated by post-processing rules; the engine
/// owns creation of tokens and their structure.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Token {
    /// Token type.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: TokenKind,
    /// Output tag emitted by the renderer (`em`, `strong`, `p`, ...).
    pub tag: String,
    /// Source delimiter that produced this token (`*`, `__`, a fence, ...).
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "String::is_empty"))]
    pub markup: String,
    /// Literal content for text-like tokens.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "String::is_empty"))]
    pub content: String,
    /// Fence info string.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "String::is_empty"))]
    pub info: String,
    /// HTML attributes in source order.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub attrs: Vec<(String, String)>,
    /// Child tokens. A token with children is a container.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub children: Vec<Token>,
}

impl Token {
    /// Create a token of the given kind with its output tag.
    #[must_use]
    pub fn new(kind: TokenKind, tag: impl Into<String>) -> Self {
        Self {
            kind,
            tag: tag.into(),
            markup: String::new(),
            content: String::new(),
            info: String::new(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create a text token.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(TokenKind::Text, "").with_content(content)
    }

    /// Set markup.
    #[must_use]
    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.markup = markup.into();
        self
    }

    /// Set content.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Set fence info.
    #[must_use]
    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = info.into();
        self
    }

    /// Append an attribute.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Set children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Token>) -> Self {
        self.children = children;
        self
    }

    /// Get an attribute value by name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Whether this token owns a non-empty list of children.
    #[must_use]
    pub fn is_container(&self) -> bool {
        !self.children.is_empty()
    }

    /// Number of tokens in this subtree, including `self`.
    #[must_use]
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Token::count).sum::<usize>()
    }

    /// Leaves of this subtree in depth-first order.
    #[must_use]
    pub fn leaves(&self) -> Vec<&Token> {
        let mut leaves = Vec::new();
        collect_leaves(self, &mut leaves);
        leaves
    }

    /// Concatenated content of all text-like leaves.
    ///
    /// Used for image alt text.
    #[must_use]
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for leaf in self.children.iter().flat_map(Token::leaves) {
            match leaf.kind {
                TokenKind::Text | TokenKind::CodeInline => out.push_str(&leaf.content),
                TokenKind::Softbreak | TokenKind::Hardbreak => out.push('\n'),
                _ => {}
            }
        }
        out
    }
}

fn collect_leaves<'a>(token: &'a Token, leaves: &mut Vec<&'a Token>) {
    if token.is_container() {
        for child in &token.children {
            collect_leaves(child, leaves);
        }
    } else {
        leaves.push(token);
    }
}
