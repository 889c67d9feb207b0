//! Terminal rendering of the streamed markdown report.
//!
//! Block-level tags are styled through a [`StyleTable`]; anything without an
//! entry (H1, H5, H6, code blocks, quotes) uses the fallback style.

use std::collections::HashMap;

use colored::{Color, Colorize};
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockTag {
    Heading2,
    Heading3,
    Heading4,
    Paragraph,
    List,
    ListItem,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStyle {
    pub color: Option<Color>,
    pub bold: bool,
    /// Blank lines before the block. Adjacent margins collapse to the larger one.
    pub margin_top: usize,
    pub margin_bottom: usize,
    /// Columns per nesting level; only used by lists.
    pub indent: usize,
    pub bullet: &'static str,
}

impl Default for BlockStyle {
    fn default() -> Self {
        Self {
            color: None,
            bold: false,
            margin_top: 1,
            margin_bottom: 1,
            indent: 0,
            bullet: "",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyleTable {
    styles: HashMap<BlockTag, BlockStyle>,
    fallback: BlockStyle,
}

impl Default for StyleTable {
    fn default() -> Self {
        let mut styles = HashMap::new();
        styles.insert(
            BlockTag::Heading2,
            BlockStyle {
                color: Some(Color::BrightWhite),
                bold: true,
                ..BlockStyle::default()
            },
        );
        styles.insert(
            BlockTag::Heading3,
            BlockStyle {
                color: Some(Color::White),
                bold: true,
                margin_bottom: 0,
                ..BlockStyle::default()
            },
        );
        styles.insert(
            BlockTag::Heading4,
            BlockStyle {
                color: Some(Color::BrightBlack),
                bold: true,
                margin_bottom: 0,
                ..BlockStyle::default()
            },
        );
        styles.insert(
            BlockTag::Paragraph,
            BlockStyle {
                color: Some(Color::White),
                ..BlockStyle::default()
            },
        );
        styles.insert(
            BlockTag::List,
            BlockStyle {
                indent: 2,
                bullet: "• ",
                ..BlockStyle::default()
            },
        );
        styles.insert(
            BlockTag::ListItem,
            BlockStyle {
                color: Some(Color::White),
                margin_top: 0,
                margin_bottom: 0,
                ..BlockStyle::default()
            },
        );
        Self {
            styles,
            fallback: BlockStyle::default(),
        }
    }
}

impl StyleTable {
    pub fn get(&self, tag: BlockTag) -> &BlockStyle {
        self.styles.get(&tag).unwrap_or(&self.fallback)
    }

    pub fn fallback(&self) -> &BlockStyle {
        &self.fallback
    }

    #[cfg(test)]
    pub fn with_style(mut self, tag: BlockTag, style: BlockStyle) -> Self {
        self.styles.insert(tag, style);
        self
    }
}

#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    styles: StyleTable,
    color: bool,
}

impl MarkdownRenderer {
    pub fn new(styles: StyleTable, color: bool) -> Self {
        Self { styles, color }
    }

    /// Default styles without ANSI escapes.
    pub fn plain() -> Self {
        Self::new(StyleTable::default(), false)
    }

    pub fn render(&self, markdown: &str) -> String {
        let mut writer = BlockWriter::new(self);
        for event in Parser::new_ext(markdown, Options::ENABLE_STRIKETHROUGH) {
            writer.handle(event);
        }
        writer.finish()
    }

    /// Apply a colour and weight to free text, honouring the colour switch.
    pub fn paint(&self, text: &str, color: Option<Color>, bold: bool) -> String {
        if !self.color {
            return text.to_string();
        }
        let mut styled = text.normal();
        if let Some(color) = color {
            styled = styled.color(color);
        }
        if bold {
            styled = styled.bold();
        }
        styled.to_string()
    }
}

#[derive(Debug, Clone, Copy)]
enum Block {
    Styled(BlockTag),
    Plain,
}

struct ListFrame {
    next_number: Option<u64>,
}

#[derive(Default)]
struct Inline {
    bold: usize,
    italic: usize,
    code: bool,
    link: bool,
}

struct BlockWriter<'a> {
    renderer: &'a MarkdownRenderer,
    lines: Vec<String>,
    line: String,
    line_open: bool,
    pending_gap: usize,
    blocks: Vec<Block>,
    lists: Vec<ListFrame>,
    links: Vec<String>,
    inline: Inline,
    quote_depth: usize,
    in_code_block: bool,
}

impl<'a> BlockWriter<'a> {
    fn new(renderer: &'a MarkdownRenderer) -> Self {
        Self {
            renderer,
            lines: Vec::new(),
            line: String::new(),
            line_open: false,
            pending_gap: 0,
            blocks: Vec::new(),
            lists: Vec::new(),
            links: Vec::new(),
            inline: Inline::default(),
            quote_depth: 0,
            in_code_block: false,
        }
    }

    fn styles(&self) -> &'a StyleTable {
        &self.renderer.styles
    }

    fn style_of(&self, block: Block) -> &'a BlockStyle {
        match block {
            Block::Styled(tag) => self.styles().get(tag),
            Block::Plain => self.styles().fallback(),
        }
    }

    fn current_style(&self) -> &'a BlockStyle {
        self.blocks
            .last()
            .map_or(self.styles().fallback(), |block| self.style_of(*block))
    }

    fn in_item(&self) -> bool {
        matches!(self.blocks.last(), Some(Block::Styled(BlockTag::ListItem)))
    }

    fn list_indent(&self) -> usize {
        self.styles().get(BlockTag::List).indent * self.lists.len()
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                if self.in_code_block {
                    self.push_code_block_text(&text);
                } else {
                    self.push_text(&text);
                }
            }
            Event::Code(code) => {
                self.inline.code = true;
                self.push_text(&code);
                self.inline.code = false;
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                self.push_text(html.trim_end_matches('\n'));
            }
            Event::SoftBreak => self.push_text(" "),
            Event::HardBreak => self.close_line(),
            Event::Rule => {
                self.begin_block(1);
                let rule = "─".repeat(40);
                self.push_raw(&rule);
                self.end_block(1);
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                let block = match level {
                    HeadingLevel::H2 => Block::Styled(BlockTag::Heading2),
                    HeadingLevel::H3 => Block::Styled(BlockTag::Heading3),
                    HeadingLevel::H4 => Block::Styled(BlockTag::Heading4),
                    _ => {
                        self.inline.bold += 1;
                        Block::Plain
                    }
                };
                self.begin_block(self.style_of(block).margin_top);
                self.blocks.push(block);
            }
            Tag::Paragraph => {
                if self.in_item() {
                    return;
                }
                let block = Block::Styled(BlockTag::Paragraph);
                self.begin_block(self.style_of(block).margin_top);
                self.blocks.push(block);
            }
            Tag::List(first_number) => {
                if self.lists.is_empty() {
                    self.begin_block(self.styles().get(BlockTag::List).margin_top);
                } else {
                    self.close_line();
                }
                self.lists.push(ListFrame {
                    next_number: first_number,
                });
            }
            Tag::Item => {
                self.close_line();
                self.pending_gap = self
                    .pending_gap
                    .max(self.styles().get(BlockTag::ListItem).margin_top);
                let bullet = self.styles().get(BlockTag::List).bullet;
                let marker = match self.lists.last_mut() {
                    Some(ListFrame {
                        next_number: Some(n),
                    }) => {
                        let marker = format!("{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => bullet.to_string(),
                };
                let indent = self.list_indent();
                self.open_line(&format!("{}{}", " ".repeat(indent), marker));
                self.blocks.push(Block::Styled(BlockTag::ListItem));
            }
            Tag::CodeBlock(_) => {
                self.begin_block(1);
                self.in_code_block = true;
            }
            Tag::BlockQuote { .. } => {
                self.begin_block(1);
                self.quote_depth += 1;
            }
            Tag::Emphasis => self.inline.italic += 1,
            Tag::Strong => self.inline.bold += 1,
            Tag::Link { dest_url, .. } => {
                self.inline.link = true;
                self.links.push(dest_url.to_string());
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(level) => {
                if !matches!(level, HeadingLevel::H2 | HeadingLevel::H3 | HeadingLevel::H4) {
                    self.inline.bold = self.inline.bold.saturating_sub(1);
                }
                let margin = self.current_style().margin_bottom;
                self.blocks.pop();
                self.end_block(margin);
            }
            TagEnd::Paragraph => {
                if self.in_item() {
                    self.close_line();
                    return;
                }
                let margin = self.current_style().margin_bottom;
                self.blocks.pop();
                self.end_block(margin);
            }
            TagEnd::List(_) => {
                self.lists.pop();
                if self.lists.is_empty() {
                    self.end_block(self.styles().get(BlockTag::List).margin_bottom);
                } else {
                    self.close_line();
                }
            }
            TagEnd::Item => {
                self.blocks.pop();
                let margin = self.styles().get(BlockTag::ListItem).margin_bottom;
                self.end_block(margin);
            }
            TagEnd::CodeBlock => {
                self.in_code_block = false;
                self.end_block(1);
            }
            TagEnd::BlockQuote { .. } => {
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.end_block(1);
            }
            TagEnd::Emphasis => self.inline.italic = self.inline.italic.saturating_sub(1),
            TagEnd::Strong => self.inline.bold = self.inline.bold.saturating_sub(1),
            TagEnd::Link => {
                self.inline.link = false;
                if let Some(url) = self.links.pop().filter(|url| !url.is_empty()) {
                    let target = format!(" ({url})");
                    let painted = if self.renderer.color {
                        target.dimmed().to_string()
                    } else {
                        target
                    };
                    self.push_raw(&painted);
                }
            }
            _ => {}
        }
    }

    fn begin_block(&mut self, margin_top: usize) {
        self.close_line();
        self.pending_gap = self.pending_gap.max(margin_top);
    }

    fn end_block(&mut self, margin_bottom: usize) {
        self.close_line();
        self.pending_gap = self.pending_gap.max(margin_bottom);
    }

    fn open_line(&mut self, prefix: &str) {
        if !self.lines.is_empty() {
            for _ in 0..self.pending_gap {
                self.lines.push(String::new());
            }
        }
        self.pending_gap = 0;
        self.line = "│ ".repeat(self.quote_depth);
        self.line.push_str(prefix);
        self.line_open = true;
    }

    fn ensure_line(&mut self) {
        if self.line_open {
            return;
        }
        let continuation = if self.lists.is_empty() {
            0
        } else {
            self.list_indent() + self.styles().get(BlockTag::List).bullet.chars().count()
        };
        self.open_line(&" ".repeat(continuation));
    }

    fn close_line(&mut self) {
        if self.line_open {
            let line = std::mem::take(&mut self.line);
            self.lines.push(line.trim_end().to_string());
            self.line_open = false;
        }
    }

    fn push_raw(&mut self, text: &str) {
        self.ensure_line();
        self.line.push_str(text);
    }

    fn push_text(&mut self, text: &str) {
        let painted = self.paint_inline(text);
        self.push_raw(&painted);
    }

    fn push_code_block_text(&mut self, text: &str) {
        for piece in text.split_inclusive('\n') {
            if !self.line_open {
                self.open_line("    ");
            }
            let content = piece.trim_end_matches('\n');
            let painted = if self.renderer.color {
                content.dimmed().to_string()
            } else {
                content.to_string()
            };
            self.line.push_str(&painted);
            if piece.ends_with('\n') {
                self.close_line();
            }
        }
    }

    fn paint_inline(&self, text: &str) -> String {
        if !self.renderer.color {
            return text.to_string();
        }
        let style = self.current_style();
        let mut styled = text.normal();
        if let Some(color) = style.color {
            styled = styled.color(color);
        }
        if style.bold || self.inline.bold > 0 {
            styled = styled.bold();
        }
        if self.inline.italic > 0 {
            styled = styled.italic();
        }
        if self.inline.code {
            styled = styled.cyan();
        }
        if self.inline.link {
            styled = styled.underline();
        }
        styled.to_string()
    }

    fn finish(mut self) -> String {
        self.close_line();
        self.lines.join("\n")
    }
}
