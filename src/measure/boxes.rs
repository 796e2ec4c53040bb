use super::{break_lines, Measure, Metrics, TextMetrics};
use crate::error::MeasureError;
use crate::node::{Block, List, Node};
use crate::units::{parse_length, Pt};

/// Typography and spacing for one kind of block
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BlockStyle {
    pub font_size: Pt,
    /// Multiplier on the font's natural line height
    pub line_height: f32,
    pub margin_top: Pt,
    pub margin_bottom: Pt,
}

impl BlockStyle {
    pub fn new(font_size: Pt) -> BlockStyle {
        BlockStyle {
            font_size,
            line_height: 1.0,
            margin_top: Pt::ZERO,
            margin_bottom: Pt::ZERO,
        }
    }

    pub fn with_line_height(mut self, factor: f32) -> BlockStyle {
        self.line_height = factor;
        self
    }

    pub fn with_margins(mut self, top: Pt, bottom: Pt) -> BlockStyle {
        self.margin_top = top;
        self.margin_bottom = bottom;
        self
    }

    fn metrics(&self, height: Pt) -> Metrics {
        Metrics::new(height, self.margin_top, self.margin_bottom)
    }
}

/// The styles a [BoxMeasurer] applies, by block kind
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStyles {
    pub paragraph: BlockStyle,
    pub list: BlockStyle,
    /// Horizontal space taken by list markers
    pub list_indent: Pt,
    /// Vertical space between list items
    pub item_spacing: Pt,
    /// `h1` through `h6`
    pub headings: [BlockStyle; 6],
    /// Everything else: figures, images, quotes, generic divs
    pub block: BlockStyle,
}

impl BlockStyles {
    /// Every block styled the same, with flush lists
    pub fn uniform(style: BlockStyle) -> BlockStyles {
        BlockStyles {
            paragraph: style,
            list: style,
            list_indent: Pt::ZERO,
            item_spacing: Pt::ZERO,
            headings: [style; 6],
            block: style,
        }
    }

    fn heading(&self, tag: &str) -> Option<&BlockStyle> {
        let tag = tag.to_ascii_lowercase();
        let level = tag.strip_prefix('h')?.parse::<usize>().ok()?;
        self.headings.get(level.checked_sub(1)?)
    }
}

impl Default for BlockStyles {
    fn default() -> Self {
        let body = Pt(10.0);
        let spacing = Pt(6.0);
        let heading = |scale: f32| {
            BlockStyle::new(body * scale)
                .with_line_height(1.2)
                .with_margins(spacing * scale, spacing)
        };
        BlockStyles {
            paragraph: BlockStyle::new(body)
                .with_line_height(1.4)
                .with_margins(Pt::ZERO, spacing),
            list: BlockStyle::new(body)
                .with_line_height(1.4)
                .with_margins(Pt::ZERO, spacing),
            list_indent: Pt(18.0),
            item_spacing: Pt(2.0),
            headings: [
                heading(2.0),
                heading(1.6),
                heading(1.3),
                heading(1.15),
                heading(1.0),
                heading(0.9),
            ],
            block: BlockStyle::new(body)
                .with_line_height(1.4)
                .with_margins(spacing, spacing),
        }
    }
}

/// Measures blocks by word-wrapping their text with [TextMetrics].
///
/// Paragraphs and headings are wrapped at the target width; list items at the
/// target width less [BlockStyles::list_indent]. Blocks carrying a `height`
/// attribute (images and the like) are treated as boxes of that height,
/// scaled down with their `width` when wider than the target.
pub struct BoxMeasurer<T: TextMetrics> {
    metrics: T,
    styles: BlockStyles,
}

impl<T: TextMetrics> BoxMeasurer<T> {
    pub fn new(metrics: T, styles: BlockStyles) -> BoxMeasurer<T> {
        BoxMeasurer { metrics, styles }
    }

    pub fn styles(&self) -> &BlockStyles {
        &self.styles
    }

    pub fn text_metrics(&self) -> &T {
        &self.metrics
    }

    /// Height of `text` wrapped at `width`
    pub fn text_height(&self, text: &str, width: Pt, style: &BlockStyle) -> Pt {
        let lines = break_lines(text, width, style.font_size, &self.metrics).len();
        self.metrics.line_height(style.font_size) * style.line_height * lines as f32
    }

    fn list_height(&self, list: &List, width: Pt) -> Pt {
        let style = &self.styles.list;
        let inner = (width - self.styles.list_indent).max(Pt::ZERO);
        let items: Pt = list
            .items
            .iter()
            .map(|item| self.text_height(&item.text(), inner, style))
            .sum();
        let gaps = list.items.len().saturating_sub(1) as f32;
        items + self.styles.item_spacing * gaps
    }

    fn block_metrics(&self, block: &Block, width: Pt) -> Metrics {
        if let Some(style) = self.styles.heading(&block.tag) {
            return style.metrics(self.text_height(&block.text(), width, style));
        }
        let style = &self.styles.block;
        match intrinsic_height(block, width) {
            Some(height) => style.metrics(height),
            None => style.metrics(self.text_height(&block.text(), width, style)),
        }
    }
}

impl<T: TextMetrics + Default> Default for BoxMeasurer<T> {
    fn default() -> Self {
        BoxMeasurer::new(T::default(), BlockStyles::default())
    }
}

impl<T: TextMetrics> Measure for BoxMeasurer<T> {
    fn measure(&mut self, node: &Node, width: Pt) -> Result<Metrics, MeasureError> {
        if !width.is_valid() {
            return Err(MeasureError::InvalidWidth(width));
        }

        let metrics = match node {
            Node::Paragraph(p) => {
                let style = &self.styles.paragraph;
                style.metrics(self.text_height(&p.text(), width, style))
            }
            Node::List(list) => self.styles.list.metrics(self.list_height(list, width)),
            Node::Block(block) => self.block_metrics(block, width),
            Node::RowBreak(height) => Metrics::new(*height, Pt::ZERO, Pt::ZERO),
            Node::PageBreak | Node::ColumnBreak | Node::RunHeader(_) | Node::RunFooter(_) => {
                Metrics::default()
            }
        };
        Ok(metrics)
    }
}

/// Height from `height`/`width` attributes, keeping the aspect ratio when the
/// box has to shrink to fit `width`
fn intrinsic_height(block: &Block, width: Pt) -> Option<Pt> {
    let height = parse_length(block.attrs.get("height")?)?;
    let natural_width = block.attrs.get("width").and_then(parse_length);
    match natural_width {
        Some(w) if w > width && w > Pt::ZERO => Some(height * (width.0 / w.0)),
        _ => Some(height),
    }
}
