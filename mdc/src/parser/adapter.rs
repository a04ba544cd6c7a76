use std::mem;
use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser as CmarkParser, Tag, TagEnd};

use crate::node::table::Table;

/// A completed block, as seen by the tree builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockEvent {
    Heading { level: u8, text: String },
    /// `nested` is set for paragraphs inside list items or block quotes.
    Paragraph { text: String, nested: bool },
    CodeBlock { info: String, content: String },
    TaskItem { checked: bool, text: String },
    Table(Table),
}

/// Tokenize `source` and collapse the token stream into block events.
pub fn block_events(source: &str) -> Vec<(BlockEvent, Range<usize>)> {
    let options =
        Options::ENABLE_TABLES | Options::ENABLE_TASKLISTS | Options::ENABLE_STRIKETHROUGH;
    let mut adapter = EventAdapter::default();
    for (event, range) in CmarkParser::new_ext(source, options).into_offset_iter() {
        adapter.feed(event, range);
    }
    adapter.finish()
}

#[derive(Debug, Default)]
struct ItemState {
    task: Option<bool>,
    text: String,
}

/// Per-block scratch state between tokenizer callbacks.
#[derive(Debug, Default)]
pub struct EventAdapter {
    /// Text since the last block boundary.
    text: String,
    /// Open list items, innermost last.
    items: Vec<ItemState>,
    /// Open block quotes and footnote definitions.
    quotes: usize,
    /// Info string of the open code block.
    code_info: Option<String>,
    table: Option<Table>,
    row: Vec<String>,
    out: Vec<(BlockEvent, Range<usize>)>,
}

impl EventAdapter {
    pub fn feed(&mut self, event: Event<'_>, range: Range<usize>) {
        match event {
            Event::Start(tag) => self.enter(tag),
            Event::End(tag_end) => self.leave(tag_end, range),
            Event::Text(s) | Event::Code(s) | Event::InlineHtml(s) => self.push_text(&s),
            Event::SoftBreak | Event::HardBreak => self.push_text("\n"),
            Event::TaskListMarker(checked) => {
                if let Some(item) = self.items.last_mut() {
                    item.task = Some(checked);
                }
            }
            _ => {}
        }
    }

    pub fn finish(self) -> Vec<(BlockEvent, Range<usize>)> {
        self.out
    }

    fn push_text(&mut self, s: &str) {
        self.text.push_str(s);
        if self.code_info.is_none() {
            if let Some(item) = self.items.last_mut() {
                item.text.push_str(s);
            }
        }
    }

    fn enter(&mut self, tag: Tag<'_>) {
        if is_inline(&tag) {
            return;
        }
        self.text.clear();

        match tag {
            Tag::Item => self.items.push(ItemState::default()),
            Tag::BlockQuote(_) | Tag::FootnoteDefinition(_) => self.quotes += 1,
            Tag::CodeBlock(kind) => {
                let info = match kind {
                    CodeBlockKind::Fenced(info) => info.to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                self.code_info = Some(info);
            }
            Tag::Table(alignments) => self.table = Some(Table::new(alignments.len())),
            Tag::TableHead | Tag::TableRow => self.row.clear(),
            _ => {}
        }
    }

    fn leave(&mut self, tag_end: TagEnd, range: Range<usize>) {
        if is_inline_end(&tag_end) {
            return;
        }

        match tag_end {
            TagEnd::Heading(level) => {
                let text = self.text.trim().to_string();
                self.emit(
                    BlockEvent::Heading {
                        level: heading_level_to_u8(level),
                        text,
                    },
                    range,
                );
            }
            TagEnd::Paragraph => {
                let nested = !self.items.is_empty() || self.quotes > 0;
                let text = mem::take(&mut self.text);
                self.emit(BlockEvent::Paragraph { text, nested }, range);
            }
            TagEnd::CodeBlock => {
                if let Some(info) = self.code_info.take() {
                    let content = mem::take(&mut self.text);
                    self.emit(BlockEvent::CodeBlock { info, content }, range);
                }
            }
            TagEnd::Item => {
                if let Some(ItemState {
                    task: Some(checked),
                    text,
                }) = self.items.pop()
                {
                    let text = text.trim().to_string();
                    self.emit(BlockEvent::TaskItem { checked, text }, range);
                }
            }
            TagEnd::BlockQuote(_) | TagEnd::FootnoteDefinition => {
                self.quotes = self.quotes.saturating_sub(1);
            }
            TagEnd::TableCell => self.row.push(self.text.trim().to_string()),
            TagEnd::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.head.push(mem::take(&mut self.row));
                }
            }
            TagEnd::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    table.body.push(mem::take(&mut self.row));
                }
            }
            TagEnd::Table => {
                if let Some(table) = self.table.take() {
                    self.emit(BlockEvent::Table(table), range);
                }
            }
            _ => {}
        }

        self.text.clear();
    }

    fn emit(&mut self, event: BlockEvent, range: Range<usize>) {
        self.out.push((event, range));
    }
}

fn is_inline(tag: &Tag<'_>) -> bool {
    matches!(
        tag,
        Tag::Emphasis | Tag::Strong | Tag::Strikethrough | Tag::Link { .. } | Tag::Image { .. }
    )
}

fn is_inline_end(tag_end: &TagEnd) -> bool {
    matches!(
        tag_end,
        TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link | TagEnd::Image
    )
}

fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
