//! Converts pulldown-cmark events into a token forest.
//!
//! Block structure becomes a flat root-level sequence of open/close tokens.
//! Each run of inline content is wrapped in one [`TokenKind::Inline`]
//! container; images are containers holding their alt-text tokens.
//!
//! pulldown-cmark does not report which delimiter produced an emphasis, so
//! the marker is recovered from the source range of the start event.

use std::ops::Range;

use emtag_core::{Token, TokenKind};
use pulldown_cmark::{
    Alignment, BlockQuoteKind, CodeBlockKind, Event, LinkType, Parser, Tag, TagEnd,
};

use crate::util::heading_level_to_num;

/// Event-to-token converter for one document.
pub(crate) struct Tokenizer<'s> {
    src: &'s str,
    tokens: Vec<Token>,
    /// Children of the inline run being collected.
    inline: Option<Vec<Token>>,
    /// Source range covered by the current inline run.
    inline_range: Option<Range<usize>>,
    /// Open images; inline tokens go to the innermost one.
    images: Vec<Token>,
    /// Markup of open emphasis/strong/strikethrough spans.
    spans: Vec<String>,
    code: Option<CodeState>,
    html_block: Option<String>,
    table: Option<TableState>,
}

struct CodeState {
    token: Token,
}

struct TableState {
    alignments: Vec<Alignment>,
    in_head: bool,
    body_open: bool,
    cell: usize,
}

impl TableState {
    fn cell_style(&self) -> Option<&'static str> {
        match self.alignments.get(self.cell)? {
            Alignment::None => None,
            Alignment::Left => Some("text-align:left"),
            Alignment::Center => Some("text-align:center"),
            Alignment::Right => Some("text-align:right"),
        }
    }
}

impl<'s> Tokenizer<'s> {
    pub(crate) fn new(src: &'s str) -> Self {
        Self {
            src,
            tokens: Vec::new(),
            inline: None,
            inline_range: None,
            images: Vec::new(),
            spans: Vec::new(),
            code: None,
            html_block: None,
            table: None,
        }
    }

    /// Consume the parser and return root-level tokens.
    pub(crate) fn tokenize(mut self, parser: Parser<'s>) -> Vec<Token> {
        for (event, range) in parser.into_offset_iter() {
            self.event(event, range);
        }
        self.flush_inline();
        self.tokens
    }

    fn event(&mut self, event: Event<'_>, range: Range<usize>) {
        match event {
            Event::Start(tag) => self.start(tag, range),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text, range),
            Event::Code(code) => {
                let token = Token::new(TokenKind::CodeInline, "code")
                    .with_markup("`")
                    .with_content(code.as_ref());
                self.push_inline(token, range);
            }
            Event::InlineMath(math) | Event::DisplayMath(math) => {
                let token = Token::new(TokenKind::CodeInline, "code")
                    .with_markup("$")
                    .with_content(math.as_ref());
                self.push_inline(token, range);
            }
            Event::Html(html) => {
                if let Some(block) = self.html_block.as_mut() {
                    block.push_str(&html);
                } else {
                    self.flush_inline();
                    self.tokens
                        .push(Token::new(TokenKind::HtmlBlock, "").with_content(html.as_ref()));
                }
            }
            Event::InlineHtml(html) => {
                let token = Token::new(TokenKind::HtmlInline, "").with_content(html.as_ref());
                self.push_inline(token, range);
            }
            Event::FootnoteReference(name) => {
                self.text(&format!("[^{name}]"), range);
            }
            Event::SoftBreak => {
                if let Some(code) = self.code.as_mut() {
                    code.token.content.push('\n');
                } else {
                    self.push_inline(Token::new(TokenKind::Softbreak, "br"), range);
                }
            }
            Event::HardBreak => self.push_inline(Token::new(TokenKind::Hardbreak, "br"), range),
            Event::Rule => {
                self.flush_inline();
                let markup = self.source(&range).trim();
                self.tokens
                    .push(Token::new(TokenKind::Hr, "hr").with_markup(markup));
            }
            Event::TaskListMarker(checked) => {
                let html = if checked {
                    r#"<input type="checkbox" disabled checked> "#
                } else {
                    r#"<input type="checkbox" disabled> "#
                };
                self.push_inline(Token::new(TokenKind::HtmlInline, "").with_content(html), range);
            }
        }
    }

    fn start(&mut self, tag: Tag<'_>, range: Range<usize>) {
        match tag {
            Tag::Emphasis => self.open_span(TokenKind::EmphasisOpen, "em", 1, range),
            Tag::Strong => self.open_span(TokenKind::StrongOpen, "strong", 2, range),
            Tag::Strikethrough => {
                let markup = self.delimiter_run(&range, '~');
                self.spans.push(markup.clone());
                let token = Token::new(TokenKind::StrikethroughOpen, "s").with_markup(markup);
                self.push_inline(token, range);
            }
            Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            } => {
                let mut token =
                    Token::new(TokenKind::LinkOpen, "a").with_attr("href", dest_url.as_ref());
                if !title.is_empty() {
                    token = token.with_attr("title", title.as_ref());
                }
                if matches!(link_type, LinkType::Autolink | LinkType::Email) {
                    token = token.with_markup("autolink");
                }
                self.push_inline(token, range);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                self.extend_inline_range(&range);
                let mut token = Token::new(TokenKind::Image, "img")
                    .with_attr("src", dest_url.as_ref())
                    .with_attr("alt", "");
                if !title.is_empty() {
                    token = token.with_attr("title", title.as_ref());
                }
                self.images.push(token);
            }
            Tag::Superscript | Tag::Subscript => {}
            block => {
                self.flush_inline();
                self.start_block(block, range);
            }
        }
    }

    fn start_block(&mut self, tag: Tag<'_>, range: Range<usize>) {
        match tag {
            Tag::Paragraph => self.push_block(Token::new(TokenKind::ParagraphOpen, "p")),
            Tag::Heading { level, id, .. } => {
                let n = heading_level_to_num(level);
                let mut token = Token::new(TokenKind::HeadingOpen, format!("h{n}"))
                    .with_markup("#".repeat(usize::from(n)));
                if let Some(id) = id {
                    token = token.with_attr("id", id.as_ref());
                }
                self.push_block(token);
            }
            Tag::BlockQuote(kind) => {
                let mut token = Token::new(TokenKind::BlockquoteOpen, "blockquote").with_markup(">");
                if let Some(kind) = kind {
                    token = token.with_attr("class", format!("alert alert-{}", alert_name(kind)));
                }
                self.push_block(token);
            }
            Tag::CodeBlock(kind) => {
                let token = match kind {
                    CodeBlockKind::Fenced(info) => {
                        let fence = self.source(&range).trim_start();
                        let first = fence.chars().next().unwrap_or('`');
                        let markup: String = fence.chars().take_while(|&c| c == first).collect();
                        Token::new(TokenKind::Fence, "code")
                            .with_markup(markup)
                            .with_info(info.as_ref())
                    }
                    CodeBlockKind::Indented => Token::new(TokenKind::CodeBlock, "code"),
                };
                self.code = Some(CodeState { token });
            }
            Tag::HtmlBlock => self.html_block = Some(String::new()),
            Tag::List(Some(start)) => {
                let mut token = Token::new(TokenKind::OrderedListOpen, "ol");
                if start != 1 {
                    token = token.with_attr("start", start.to_string());
                }
                self.push_block(token);
            }
            Tag::List(None) => self.push_block(Token::new(TokenKind::BulletListOpen, "ul")),
            Tag::Item => {
                let markup = self.item_marker(&range);
                self.push_block(Token::new(TokenKind::ListItemOpen, "li").with_markup(markup));
            }
            Tag::Table(alignments) => {
                self.table = Some(TableState {
                    alignments,
                    in_head: false,
                    body_open: false,
                    cell: 0,
                });
                self.push_block(Token::new(TokenKind::TableOpen, "table"));
            }
            Tag::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.in_head = true;
                    table.cell = 0;
                }
                self.push_block(Token::new(TokenKind::TheadOpen, "thead"));
                self.push_block(Token::new(TokenKind::TrOpen, "tr"));
            }
            Tag::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    table.cell = 0;
                    if !table.body_open {
                        table.body_open = true;
                        self.tokens.push(Token::new(TokenKind::TbodyOpen, "tbody"));
                    }
                }
                self.push_block(Token::new(TokenKind::TrOpen, "tr"));
            }
            Tag::TableCell => {
                let (kind, tag) = if self.table.as_ref().is_some_and(|t| t.in_head) {
                    (TokenKind::ThOpen, "th")
                } else {
                    (TokenKind::TdOpen, "td")
                };
                let mut token = Token::new(kind, tag);
                if let Some(style) = self.table.as_ref().and_then(TableState::cell_style) {
                    token = token.with_attr("style", style);
                }
                self.push_block(token);
            }
            // Not enabled in the parser options; content still flows through.
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Emphasis => self.close_span(TokenKind::EmphasisClose, "em"),
            TagEnd::Strong => self.close_span(TokenKind::StrongClose, "strong"),
            TagEnd::Strikethrough => self.close_span(TokenKind::StrikethroughClose, "s"),
            TagEnd::Link => self.push_inline_at_end(Token::new(TokenKind::LinkClose, "a")),
            TagEnd::Image => {
                if let Some(mut image) = self.images.pop() {
                    let alt = image.plain_text();
                    if let Some(entry) = image.attrs.iter_mut().find(|(k, _)| k == "alt") {
                        entry.1.clone_from(&alt);
                    }
                    image.content = alt;
                    self.push_inline_at_end(image);
                }
            }
            TagEnd::Superscript | TagEnd::Subscript => {}
            block => {
                self.flush_inline();
                self.end_block(block);
            }
        }
    }

    fn end_block(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.push_block(Token::new(TokenKind::ParagraphClose, "p")),
            TagEnd::Heading(level) => {
                let n = heading_level_to_num(level);
                self.push_block(
                    Token::new(TokenKind::HeadingClose, format!("h{n}"))
                        .with_markup("#".repeat(usize::from(n))),
                );
            }
            TagEnd::BlockQuote(_) => {
                self.push_block(Token::new(TokenKind::BlockquoteClose, "blockquote").with_markup(">"));
            }
            TagEnd::CodeBlock => {
                if let Some(code) = self.code.take() {
                    self.tokens.push(code.token);
                }
            }
            TagEnd::HtmlBlock => {
                if let Some(html) = self.html_block.take() {
                    self.tokens
                        .push(Token::new(TokenKind::HtmlBlock, "").with_content(html));
                }
            }
            TagEnd::List(true) => self.push_block(Token::new(TokenKind::OrderedListClose, "ol")),
            TagEnd::List(false) => self.push_block(Token::new(TokenKind::BulletListClose, "ul")),
            TagEnd::Item => self.push_block(Token::new(TokenKind::ListItemClose, "li")),
            TagEnd::Table => {
                if self.table.take().is_some_and(|t| t.body_open) {
                    self.push_block(Token::new(TokenKind::TbodyClose, "tbody"));
                }
                self.push_block(Token::new(TokenKind::TableClose, "table"));
            }
            TagEnd::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.in_head = false;
                }
                self.push_block(Token::new(TokenKind::TrClose, "tr"));
                self.push_block(Token::new(TokenKind::TheadClose, "thead"));
            }
            TagEnd::TableRow => self.push_block(Token::new(TokenKind::TrClose, "tr")),
            TagEnd::TableCell => {
                let (kind, tag) = match self.table.as_mut() {
                    Some(table) => {
                        table.cell += 1;
                        if table.in_head {
                            (TokenKind::ThClose, "th")
                        } else {
                            (TokenKind::TdClose, "td")
                        }
                    }
                    None => (TokenKind::TdClose, "td"),
                };
                self.push_block(Token::new(kind, tag));
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str, range: Range<usize>) {
        if let Some(code) = self.code.as_mut() {
            code.token.content.push_str(text);
            return;
        }
        if let Some(block) = self.html_block.as_mut() {
            block.push_str(text);
            return;
        }

        self.extend_inline_range(&range);
        let siblings = match self.images.last_mut() {
            Some(image) => &mut image.children,
            None => self.inline.get_or_insert_with(Vec::new),
        };
        // Adjacent text events are merged into a single token.
        if let Some(last) = siblings.last_mut()
            && last.kind == TokenKind::Text
        {
            last.content.push_str(text);
        } else {
            siblings.push(Token::text(text));
        }
    }

    fn open_span(&mut self, kind: TokenKind, tag: &str, weight: usize, range: Range<usize>) {
        let delimiter = self
            .source(&range)
            .chars()
            .next()
            .filter(|c| matches!(c, '*' | '_'))
            .unwrap_or('*');
        let markup = delimiter.to_string().repeat(weight);
        self.spans.push(markup.clone());
        self.push_inline(Token::new(kind, tag).with_markup(markup), range);
    }

    fn close_span(&mut self, kind: TokenKind, tag: &str) {
        let markup = self.spans.pop().unwrap_or_default();
        self.push_inline_at_end(Token::new(kind, tag).with_markup(markup));
    }

    fn push_inline(&mut self, token: Token, range: Range<usize>) {
        self.extend_inline_range(&range);
        self.push_inline_at_end(token);
    }

    fn push_inline_at_end(&mut self, token: Token) {
        match self.images.last_mut() {
            Some(image) => image.children.push(token),
            None => self.inline.get_or_insert_with(Vec::new).push(token),
        }
    }

    fn push_block(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// Close the current inline run, if any, as an `inline` token.
    fn flush_inline(&mut self) {
        let range = self.inline_range.take();
        let Some(children) = self.inline.take() else {
            return;
        };
        if children.is_empty() {
            return;
        }
        let content = range.map_or("", |r| self.source(&r));
        self.tokens.push(
            Token::new(TokenKind::Inline, "")
                .with_content(content)
                .with_children(children),
        );
    }

    fn extend_inline_range(&mut self, range: &Range<usize>) {
        self.inline_range = Some(match self.inline_range.take() {
            Some(current) => current.start.min(range.start)..current.end.max(range.end),
            None => range.clone(),
        });
    }

    fn source(&self, range: &Range<usize>) -> &'s str {
        self.src.get(range.clone()).unwrap_or_default()
    }

    fn delimiter_run(&self, range: &Range<usize>, delimiter: char) -> String {
        let run: String = self
            .source(range)
            .chars()
            .take_while(|&c| c == delimiter)
            .collect();
        if run.is_empty() {
            delimiter.to_string()
        } else {
            run
        }
    }

    fn item_marker(&self, range: &Range<usize>) -> String {
        let item = self.source(range).trim_start();
        match item.chars().next() {
            Some(c @ ('-' | '*' | '+')) => c.to_string(),
            Some(c) if c.is_ascii_digit() => item
                .chars()
                .find(|c| !c.is_ascii_digit())
                .map(String::from)
                .unwrap_or_default(),
            _ => String::new(),
        }
    }
}

fn alert_name(kind: BlockQuoteKind) -> &'static str {
    match kind {
        BlockQuoteKind::Note => "note",
        BlockQuoteKind::Tip => "tip",
        BlockQuoteKind::Important => "important",
        BlockQuoteKind::Warning => "warning",
        BlockQuoteKind::Caution => "caution",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use pulldown_cmark::Options;

    fn tokenize(src: &str) -> Vec<Token> {
        let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
        Tokenizer::new(src).tokenize(Parser::new_ext(src, options))
    }

    fn kinds(tokens: &[Token]) -> Vec<&'static str> {
        tokens.iter().map(|t| t.kind.type_name()).collect()
    }

    fn inline_children(tokens: &[Token]) -> &[Token] {
        let inline = tokens
            .iter()
            .find(|t| t.kind == TokenKind::Inline)
            .expect("inline token");
        &inline.children
    }

    #[test]
    fn test_paragraph_shape() {
        let tokens = tokenize("Hello, world!");
        assert_eq!(kinds(&tokens), vec!["paragraph_open", "inline", "paragraph_close"]);
        assert_eq!(tokens[1].content, "Hello, world!");
        assert_eq!(tokens[1].children.len(), 1);
        assert_eq!(tokens[1].children[0].content, "Hello, world!");
    }

    #[test]
    fn test_emphasis_markers_recovered() {
        let tokens = tokenize("*hello* and _world_");
        let children = inline_children(&tokens);

        let markers: Vec<_> = children
            .iter()
            .map(|t| (t.kind.type_name(), t.markup.as_str(), t.tag.as_str()))
            .collect();
        assert_eq!(
            markers,
            vec![
                ("em_open", "*", "em"),
                ("text", "", ""),
                ("em_close", "*", "em"),
                ("text", "", ""),
                ("em_open", "_", "em"),
                ("text", "", ""),
                ("em_close", "_", "em"),
            ]
        );
    }

    #[test]
    fn test_strong_markers_recovered() {
        let tokens = tokenize("**a** __b__");
        let children = inline_children(&tokens);
        assert_eq!(children[0].kind, TokenKind::StrongOpen);
        assert_eq!(children[0].markup, "**");
        assert_eq!(children[0].tag, "strong");
        assert_eq!(children[2].markup, "**");
        assert_eq!(children[4].kind, TokenKind::StrongOpen);
        assert_eq!(children[4].markup, "__");
        assert_eq!(children[6].kind, TokenKind::StrongClose);
        assert_eq!(children[6].markup, "__");
    }

    #[test]
    fn test_nested_emphasis_is_flat_inside_inline() {
        let tokens = tokenize("*outer _inner_ outer*");
        let children = inline_children(&tokens);
        let markers: Vec<_> = children.iter().map(|t| t.markup.as_str()).collect();
        assert_eq!(markers, vec!["*", "", "_", "", "_", "", "*"]);
        assert!(children.iter().all(|t| !t.is_container()));
    }

    #[test]
    fn test_image_alt_is_container() {
        let tokens = tokenize("![an *alt*](pic.png \"Title\")");
        let children = inline_children(&tokens);
        assert_eq!(children.len(), 1);

        let image = &children[0];
        assert_eq!(image.kind, TokenKind::Image);
        assert!(image.is_container());
        assert_eq!(image.attr("src"), Some("pic.png"));
        assert_eq!(image.attr("alt"), Some("an alt"));
        assert_eq!(image.attr("title"), Some("Title"));
        assert_eq!(image.children[1].markup, "*");
    }

    #[test]
    fn test_heading_and_list() {
        let tokens = tokenize("## Title\n\n- one\n- two");
        assert_eq!(
            kinds(&tokens),
            vec![
                "heading_open",
                "inline",
                "heading_close",
                "bullet_list_open",
                "list_item_open",
                "inline",
                "list_item_close",
                "list_item_open",
                "inline",
                "list_item_close",
                "bullet_list_close",
            ]
        );
        assert_eq!(tokens[0].tag, "h2");
        assert_eq!(tokens[0].markup, "##");
        assert_eq!(tokens[4].markup, "-");
    }

    #[test]
    fn test_ordered_list_start() {
        let tokens = tokenize("3. three\n4. four");
        assert_eq!(tokens[0].kind, TokenKind::OrderedListOpen);
        assert_eq!(tokens[0].attr("start"), Some("3"));
        assert_eq!(tokens[1].markup, ".");
    }

    #[test]
    fn test_fence() {
        let tokens = tokenize("```rust\nfn main() {}\n```");
        assert_eq!(kinds(&tokens), vec!["fence"]);
        assert_eq!(tokens[0].info, "rust");
        assert_eq!(tokens[0].markup, "```");
        assert_eq!(tokens[0].content, "fn main() {}\n");
    }

    #[test]
    fn test_emphasis_like_text_in_code_is_not_emphasis() {
        let tokens = tokenize("`*not*` and\n\n    _indented_");
        let children = inline_children(&tokens);
        assert_eq!(children[0].kind, TokenKind::CodeInline);
        assert_eq!(children[0].content, "*not*");
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::CodeBlock));
    }

    #[test]
    fn test_table_shape() {
        let tokens = tokenize("| a | b |\n|:--|--:|\n| *c* | d |");
        assert_eq!(
            kinds(&tokens),
            vec![
                "table_open",
                "thead_open",
                "tr_open",
                "th_open",
                "inline",
                "th_close",
                "th_open",
                "inline",
                "th_close",
                "tr_close",
                "thead_close",
                "tbody_open",
                "tr_open",
                "td_open",
                "inline",
                "td_close",
                "td_open",
                "inline",
                "td_close",
                "tr_close",
                "tbody_close",
                "table_close",
            ]
        );
        assert_eq!(tokens[3].attr("style"), Some("text-align:left"));
        assert_eq!(tokens[6].attr("style"), Some("text-align:right"));
        assert_eq!(tokens[14].children[0].markup, "*");
    }

    #[test]
    fn test_strikethrough_markup() {
        let tokens = tokenize("~~gone~~");
        let children = inline_children(&tokens);
        assert_eq!(children[0].kind, TokenKind::StrikethroughOpen);
        assert_eq!(children[0].markup, "~~");
        assert_eq!(children[2].markup, "~~");
    }

    #[test]
    fn test_triple_delimiters() {
        let tokens = tokenize("***both***");
        let children = inline_children(&tokens);
        let markers: Vec<_> = children
            .iter()
            .filter(|t| t.kind != TokenKind::Text)
            .map(|t| t.markup.as_str())
            .collect();
        assert_eq!(markers.len(), 4);
        assert!(markers.iter().all(|m| m.chars().all(|c| c == '*')));
    }
}
