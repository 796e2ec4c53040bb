//! The block-level content stream the paginator consumes.
//!
//! Nodes arrive from whatever turns source markup into blocks. The engine
//! never edits a node it was given; splitting produces fresh head and tail
//! copies.

use crate::units::Pt;
use std::fmt::Write;

/// Ordered `name="value"` pairs on an element
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    pub fn new() -> Attributes {
        Attributes::default()
    }

    /// Builder-style [Attributes::set]
    pub fn with<N: Into<String>, V: Into<String>>(mut self, name: N, value: V) -> Attributes {
        self.set(name, value);
        self
    }

    /// Shorthand for a `class` attribute holding a single class
    pub fn class<C: Into<String>>(class: C) -> Attributes {
        Attributes::new().with("class", class)
    }

    /// Set an attribute, replacing any existing value with the same name.
    /// Names compare case-insensitively.
    pub fn set<N: Into<String>, V: Into<String>>(&mut self, name: N, value: V) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(&name)) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.get("class").unwrap_or_default().split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn write_to(&self, out: &mut String) {
        for (name, value) in &self.entries {
            let _ = write!(out, " {}=\"{}\"", name, escape(value, true));
        }
    }
}

/// Inline content of a paragraph or list item
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(String),
    Element {
        tag: String,
        attrs: Attributes,
        children: Vec<Inline>,
    },
}

impl Inline {
    pub fn text<S: Into<String>>(text: S) -> Inline {
        Inline::Text(text.into())
    }

    /// An element wrapping a single run of text, e.g. `<em>`
    pub fn styled<T: Into<String>, S: Into<String>>(tag: T, text: S) -> Inline {
        Inline::Element {
            tag: tag.into(),
            attrs: Attributes::new(),
            children: vec![Inline::text(text)],
        }
    }

    fn push_text(&self, out: &mut String) {
        match self {
            Inline::Text(text) => out.push_str(text),
            Inline::Element { children, .. } => children.iter().for_each(|c| c.push_text(out)),
        }
    }

    fn write_markup(&self, out: &mut String) {
        match self {
            Inline::Text(text) => out.push_str(&escape(text, false)),
            Inline::Element {
                tag,
                attrs,
                children,
            } => {
                let _ = write!(out, "<{tag}");
                attrs.write_to(out);
                out.push('>');
                if !is_void(tag) {
                    children.iter().for_each(|c| c.write_markup(out));
                    let _ = write!(out, "</{tag}>");
                }
            }
        }
    }
}

/// A text-bearing block
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Paragraph {
    pub attrs: Attributes,
    pub content: Vec<Inline>,
}

impl Paragraph {
    pub fn new<S: Into<String>>(text: S) -> Paragraph {
        Paragraph {
            attrs: Attributes::new(),
            content: vec![Inline::text(text)],
        }
    }

    /// A paragraph is plain when its whole content is one run of text
    pub fn is_plain(&self) -> bool {
        matches!(self.content.as_slice(), [Inline::Text(_)])
    }

    /// Whitespace-collapsed, trimmed text content
    pub fn text(&self) -> String {
        inline_text(&self.content)
    }

    /// A plain copy of this paragraph holding `text`, keeping the attributes
    pub fn with_text<S: Into<String>>(&self, text: S) -> Paragraph {
        Paragraph {
            attrs: self.attrs.clone(),
            content: vec![Inline::text(text)],
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ListKind {
    Ordered,
    Unordered,
}

impl ListKind {
    fn tag(self) -> &'static str {
        match self {
            ListKind::Ordered => "ol",
            ListKind::Unordered => "ul",
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ListItem {
    pub content: Vec<Inline>,
}

impl ListItem {
    pub fn new<S: Into<String>>(text: S) -> ListItem {
        ListItem {
            content: vec![Inline::text(text)],
        }
    }

    pub fn text(&self) -> String {
        inline_text(&self.content)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub kind: ListKind,
    pub attrs: Attributes,
    /// First ordinal of an ordered list; 1 when absent
    pub start: Option<u32>,
    pub items: Vec<ListItem>,
}

impl List {
    pub fn new(kind: ListKind, items: Vec<ListItem>) -> List {
        List {
            kind,
            attrs: Attributes::new(),
            start: None,
            items,
        }
    }

    /// A list of the same kind and attributes holding `items`, starting
    /// `skipped` ordinals after this one
    pub fn continued(&self, skipped: usize, items: Vec<ListItem>) -> List {
        let start = match self.kind {
            ListKind::Ordered if skipped > 0 => {
                Some(self.start.unwrap_or(1).saturating_add(skipped as u32))
            }
            _ => self.start,
        };
        List {
            kind: self.kind,
            attrs: self.attrs.clone(),
            start,
            items,
        }
    }
}

/// Any other block: images, figures, headings, sentinel markers. The inner
/// markup is carried through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub tag: String,
    pub attrs: Attributes,
    pub inner: String,
}

impl Block {
    pub fn new<T: Into<String>>(tag: T, attrs: Attributes) -> Block {
        Block {
            tag: tag.into(),
            attrs,
            inner: String::new(),
        }
    }

    pub fn with_inner<S: Into<String>>(mut self, inner: S) -> Block {
        self.inner = inner.into();
        self
    }

    /// Text of the inner markup with tags dropped and whitespace collapsed
    pub fn text(&self) -> String {
        collapse_whitespace(&strip_tags(&self.inner))
    }
}

/// One element of the content stream
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Paragraph(Paragraph),
    List(List),
    Block(Block),
    PageBreak,
    ColumnBreak,
    RowBreak(Pt),
    RunHeader(String),
    RunFooter(String),
}

impl Node {
    pub fn paragraph<S: Into<String>>(text: S) -> Node {
        Node::Paragraph(Paragraph::new(text))
    }

    pub fn block<T: Into<String>>(tag: T, attrs: Attributes) -> Node {
        Node::Block(Block::new(tag, attrs))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Node::Paragraph(_) => "paragraph",
            Node::List(_) => "list",
            Node::Block(_) => "block",
            Node::PageBreak => "page-break",
            Node::ColumnBreak => "column-break",
            Node::RowBreak(_) => "row-break",
            Node::RunHeader(_) => "run-header",
            Node::RunFooter(_) => "run-footer",
        }
    }

    /// Markers steer the flow; they are never content
    pub fn is_marker(&self) -> bool {
        !matches!(self, Node::Paragraph(_) | Node::List(_) | Node::Block(_))
    }

    pub fn attrs(&self) -> Option<&Attributes> {
        match self {
            Node::Paragraph(p) => Some(&p.attrs),
            Node::List(l) => Some(&l.attrs),
            Node::Block(b) => Some(&b.attrs),
            _ => None,
        }
    }

    /// Whitespace-collapsed text content; empty for markers
    pub fn text(&self) -> String {
        match self {
            Node::Paragraph(p) => p.text(),
            Node::List(l) => collapse_whitespace(
                &l.items.iter().map(ListItem::text).collect::<Vec<_>>().join(" "),
            ),
            Node::Block(b) => b.text(),
            _ => String::new(),
        }
    }

    /// Serialized markup for a page record
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        match self {
            Node::Paragraph(p) => {
                out.push_str("<p");
                p.attrs.write_to(&mut out);
                out.push('>');
                p.content.iter().for_each(|c| c.write_markup(&mut out));
                out.push_str("</p>");
            }
            Node::List(l) => {
                let tag = l.kind.tag();
                let _ = write!(out, "<{tag}");
                l.attrs.write_to(&mut out);
                if let (ListKind::Ordered, Some(start)) = (l.kind, l.start) {
                    let _ = write!(out, " start=\"{start}\"");
                }
                out.push('>');
                for item in &l.items {
                    out.push_str("<li>");
                    item.content.iter().for_each(|c| c.write_markup(&mut out));
                    out.push_str("</li>");
                }
                let _ = write!(out, "</{tag}>");
            }
            Node::Block(b) => {
                let _ = write!(out, "<{}", b.tag);
                b.attrs.write_to(&mut out);
                out.push('>');
                if !is_void(&b.tag) {
                    let _ = write!(out, "{}</{}>", b.inner, b.tag);
                }
            }
            Node::ColumnBreak => {
                out.push_str(r#"<div class="force-colbreak" aria-hidden="true"></div>"#)
            }
            Node::RowBreak(height) => {
                let _ = write!(
                    out,
                    r#"<div class="row-break" aria-hidden="true" style="height:{}pt"></div>"#,
                    height.0
                );
            }
            Node::PageBreak | Node::RunHeader(_) | Node::RunFooter(_) => {}
        }
        out
    }
}

fn inline_text(content: &[Inline]) -> String {
    let mut raw = String::new();
    content.iter().for_each(|c| c.push_text(&mut raw));
    collapse_whitespace(&raw)
}

fn is_void(tag: &str) -> bool {
    matches!(tag.to_ascii_lowercase().as_str(), "img" | "hr" | "br")
}

/// Collapses every whitespace run to a single space and trims both ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn escape(text: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Drops tags from a markup fragment and decodes the handful of entities
/// escaping produces. Tags become spaces so adjacent blocks don't run together.
pub fn strip_tags(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut in_tag = false;
    for ch in markup.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
