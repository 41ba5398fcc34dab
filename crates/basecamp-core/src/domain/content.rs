//! The restricted markdown subset used by post bodies.
//!
//! Supported: `#`/`##`/`###` headings, `-`/`*` list items, fenced code blocks,
//! standalone `![alt](url)` images, and paragraphs separated by blank lines.

use serde::Serialize;

/// Reading speed used by [`read_time_minutes`].
pub const WORDS_PER_MINUTE: usize = 200;

/// A rendered unit of post content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Block {
    Heading { level: u8, text: String },
    List { items: Vec<String> },
    Code { language: Option<String>, body: String },
    Image { alt: String, url: String },
    Paragraph { text: String },
}

/// Split post content into blocks.
pub fn parse_blocks(content: &str) -> Vec<Block> {
    let mut parser = Parser::default();
    let mut lines = content.lines();

    while let Some(line) = lines.next() {
        let trimmed = line.trim_end();

        if let Some(info) = trimmed.trim_start().strip_prefix("```") {
            parser.flush();
            let language = Some(info.trim().to_string()).filter(|l| !l.is_empty());
            let mut body = Vec::new();
            for inner in lines.by_ref() {
                if inner.trim_start().starts_with("```") {
                    break;
                }
                body.push(inner);
            }
            parser.blocks.push(Block::Code {
                language,
                body: body.join("\n"),
            });
            continue;
        }

        if trimmed.trim().is_empty() {
            parser.flush();
        } else if let Some((level, text)) = heading(trimmed) {
            parser.flush();
            parser.blocks.push(Block::Heading {
                level,
                text: text.to_string(),
            });
        } else if let Some(item) = list_item(trimmed) {
            parser.flush_paragraph();
            parser.list.push(item.to_string());
        } else if let Some((alt, url)) = image(trimmed) {
            parser.flush();
            parser.blocks.push(Block::Image {
                alt: alt.to_string(),
                url: url.to_string(),
            });
        } else {
            parser.flush_list();
            parser.paragraph.push(trimmed.trim_start().to_string());
        }
    }

    parser.flush();
    parser.blocks
}

#[derive(Default)]
struct Parser {
    blocks: Vec<Block>,
    list: Vec<String>,
    paragraph: Vec<String>,
}

impl Parser {
    fn flush(&mut self) {
        self.flush_list();
        self.flush_paragraph();
    }

    fn flush_list(&mut self) {
        if !self.list.is_empty() {
            let items = std::mem::take(&mut self.list);
            self.blocks.push(Block::List { items });
        }
    }

    fn flush_paragraph(&mut self) {
        if !self.paragraph.is_empty() {
            let text = std::mem::take(&mut self.paragraph).join("\n");
            self.blocks.push(Block::Paragraph { text });
        }
    }
}

fn heading(line: &str) -> Option<(u8, &str)> {
    [("### ", 3), ("## ", 2), ("# ", 1)]
        .into_iter()
        .find_map(|(prefix, level)| line.strip_prefix(prefix).map(|t| (level, t.trim())))
}

fn list_item(line: &str) -> Option<&str> {
    let line = line.trim_start();
    line.strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .map(str::trim)
}

fn image(line: &str) -> Option<(&str, &str)> {
    let rest = line.trim().strip_prefix("![")?.strip_suffix(')')?;
    let (alt, url) = rest.split_once("](")?;
    Some((alt, url))
}

/// Markdown image reference for an inline image.
pub fn image_reference(alt: &str, url: &str) -> String {
    format!("![{}]({})", alt, url)
}

/// Insert an image reference at byte offset `cursor`, on its own line.
///
/// The cursor is clamped to the content and moved back to a char boundary.
pub fn insert_image_reference(content: &str, cursor: usize, alt: &str, url: &str) -> String {
    let mut at = cursor.min(content.len());
    while !content.is_char_boundary(at) {
        at -= 1;
    }

    let (before, after) = content.split_at(at);
    format!("{}\n{}\n{}", before, image_reference(alt, url), after)
}

/// Estimated reading time, at least one minute.
pub fn read_time_minutes(content: &str) -> usize {
    let words = content.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1)
}
