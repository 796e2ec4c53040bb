//! Flow directives embedded in content.
//!
//! Authors steer pagination with a small vocabulary of directives. In source
//! text they are written on a line of their own:
//!
//! | Directive                      | Effect                                  |
//! |--------------------------------|-----------------------------------------|
//! | `[[pagebreak]]`, `<!-- newpage -->`, ` `` ` | start a new page           |
//! | `[[colbreak]]`                 | move to the next column                 |
//! | `[[rowbreak]]`, `[[rowbreak 8mm]]` | insert vertical space               |
//! | `[[header: Chapter One]]`      | set the running header                  |
//! | `[[footer: zine #3]]`          | set the running footer                  |
//!
//! Once rendered to blocks, the same directives travel as sentinel elements
//! (`<div data-pagebreak>`, `<div data-rowbreak="8mm">`, ...).
//! [`Interpreter`] turns those back into marker [`Node`]s before the flow
//! controller sees them.

use crate::layout::DEFAULT_ROW_BREAK;
use crate::node::{Block, Node};
use crate::units::{parse_length, Pt};
use log::{debug, warn};

/// Elements that never render and are dropped from the stream
const NON_RENDERABLE: [&str; 4] = ["meta", "link", "script", "style"];

/// Recognizes sentinel blocks and rewrites them as marker nodes
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Interpreter {
    /// Height used when a row break has no usable size
    pub default_row_break: Pt,
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new(DEFAULT_ROW_BREAK)
    }
}

impl Interpreter {
    pub fn new(default_row_break: Pt) -> Interpreter {
        Interpreter { default_row_break }
    }

    /// Returns the node to lay out in place of `node`, or [None] when it
    /// should be skipped entirely
    pub fn interpret(&self, node: Node) -> Option<Node> {
        match node {
            Node::Block(block) => self.interpret_block(block),
            other => Some(other),
        }
    }

    fn interpret_block(&self, block: Block) -> Option<Node> {
        let attrs = &block.attrs;
        let tag = block.tag.to_ascii_lowercase();

        if NON_RENDERABLE.contains(&tag.as_str()) {
            debug!("dropping non-renderable <{tag}>");
            return None;
        }
        if attrs.has("data-pagebreak") || attrs.has_class("page-break-marker") {
            return Some(Node::PageBreak);
        }
        if attrs.has("data-colbreak") || attrs.has_class("col-break-marker") {
            return Some(Node::ColumnBreak);
        }
        if attrs.has("data-rowbreak") || attrs.has_class("row-break-marker") {
            let size = attrs.get("data-rowbreak").unwrap_or_default();
            return Some(Node::RowBreak(self.row_break(size)));
        }
        if let Some(text) = attrs.get("data-run-header") {
            return Some(Node::RunHeader(run_text(text, &block)));
        }
        if let Some(text) = attrs.get("data-run-footer") {
            return Some(Node::RunFooter(run_text(text, &block)));
        }
        Some(Node::Block(block))
    }

    /// Height of a row break written as `size`, falling back to the default
    /// when it is empty or malformed
    pub fn row_break(&self, size: &str) -> Pt {
        let size = size.trim();
        if size.is_empty() {
            return self.default_row_break;
        }
        parse_length(size).unwrap_or_else(|| {
            warn!(
                "malformed row break size `{size}`, using {}",
                self.default_row_break
            );
            self.default_row_break
        })
    }
}

fn run_text(attribute: &str, block: &Block) -> String {
    if attribute.trim().is_empty() {
        block.text()
    } else {
        attribute.trim().to_string()
    }
}

/// A piece of source text: either markup to hand to the renderer or a
/// directive already resolved to a marker
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Markup(String),
    Marker(Node),
}

/// Parses a single source line as a directive
pub fn parse_directive(line: &str, interpreter: &Interpreter) -> Option<Node> {
    let line = line.trim();

    if line == "``" {
        return Some(Node::PageBreak);
    }
    if let Some(comment) = line.strip_prefix("<!--").and_then(|l| l.strip_suffix("-->")) {
        return comment
            .trim()
            .eq_ignore_ascii_case("newpage")
            .then_some(Node::PageBreak);
    }

    let body = line.strip_prefix("[[")?.strip_suffix("]]")?.trim();
    let (keyword, rest) = match body.find(|c: char| c == ':' || c.is_whitespace()) {
        Some(at) => (&body[..at], body[at..].trim_start_matches(':').trim()),
        None => (body, ""),
    };

    match keyword.to_ascii_lowercase().as_str() {
        "pagebreak" if rest.is_empty() => Some(Node::PageBreak),
        "colbreak" if rest.is_empty() => Some(Node::ColumnBreak),
        "rowbreak" => Some(Node::RowBreak(interpreter.row_break(rest))),
        "header" => Some(Node::RunHeader(rest.to_string())),
        "footer" => Some(Node::RunFooter(rest.to_string())),
        _ => None,
    }
}

/// Splits source text into markup runs and directives, in source order.
/// Directive lines are removed from the markup around them.
pub fn split_directives(source: &str, interpreter: &Interpreter) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut buffer: Vec<&str> = Vec::new();

    for line in source.lines() {
        match parse_directive(line, interpreter) {
            Some(marker) => {
                flush(&mut buffer, &mut segments);
                segments.push(Segment::Marker(marker));
            }
            None => buffer.push(line),
        }
    }
    flush(&mut buffer, &mut segments);

    segments
}

fn flush(buffer: &mut Vec<&str>, segments: &mut Vec<Segment>) {
    if !buffer.is_empty() {
        segments.push(Segment::Markup(buffer.join("\n")));
        buffer.clear();
    }
}

/// The upstream collaborator that turns source markup into blocks
pub trait MarkupRenderer {
    fn render(&mut self, source: &str) -> Vec<Node>;
}

/// Builds the content stream for `source`: markup runs go through
/// `renderer`, directives become marker nodes between them
pub fn build_stream<R: MarkupRenderer + ?Sized>(
    source: &str,
    renderer: &mut R,
    interpreter: &Interpreter,
) -> Vec<Node> {
    split_directives(source, interpreter)
        .into_iter()
        .flat_map(|segment| match segment {
            Segment::Markup(markup) => renderer.render(&markup),
            Segment::Marker(marker) => vec![marker],
        })
        .collect()
}
