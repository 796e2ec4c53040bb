//! The flow controller: walks the content stream and fills pages column by
//! column.
//!
//! Every block is measured once at the width it will be laid out at. A block
//! that fits the space left in the current column is placed there; one that
//! would fit a fresh column moves on to the next column (or page); one that
//! cannot fit any column is split, and its tail goes back to the front of the
//! work queue. A block that cannot be split is placed whole and the column is
//! closed behind it, so a pass always terminates.
//!
//! Page breaks close the current page even when it is empty, and the page
//! open when the stream runs out is always emitted.
//!
//! Spanning blocks open a new page unless the page is still empty, and
//! reserve their height at the top of every column of that page.

use crate::layout::Geometry;
use crate::markers::Interpreter;
use crate::measure::{Measure, Metrics, Probe};
use crate::node::Node;
use crate::page::{PageRecord, PlacedBlock, Placement};
use crate::span::is_span_all;
use crate::split::{split_block, Split};
use crate::units::Pt;
use log::{debug, trace, warn};
use std::collections::VecDeque;

/// Tolerance for floating point error in fit checks
const EPSILON: f32 = 0.01;

/// Lays `nodes` out on pages of the given geometry.
///
/// Sentinel blocks are interpreted into markers first, using the geometry's
/// row-break fallback. The result always holds at least one page, and the
/// last page is emitted even when it is only partially filled.
///
/// ```
/// use zine_flow::layout::{Geometry, Margins};
/// use zine_flow::measure::{BlockStyle, BlockStyles, BoxMeasurer, Monospace};
/// use zine_flow::{paginate, Node, Pt};
///
/// let geometry = Geometry::new((Pt(200.0), Pt(100.0)), Margins::all(Pt(10.0)));
/// let mut measurer = BoxMeasurer::new(
///     Monospace::default(),
///     BlockStyles::uniform(BlockStyle::new(Pt(10.0))),
/// );
/// let nodes = vec![
///     Node::paragraph("first"),
///     Node::PageBreak,
///     Node::paragraph("second"),
/// ];
/// let pages = paginate(nodes, &geometry, &mut measurer);
/// assert_eq!(pages.len(), 2);
/// assert_eq!(pages[1].markup, "<p>second</p>");
/// ```
pub fn paginate<M, I>(nodes: I, geometry: &Geometry, measurer: &mut M) -> Vec<PageRecord>
where
    M: Measure + ?Sized,
    I: IntoIterator<Item = Node>,
{
    let interpreter = Interpreter::new(geometry.row_break);
    let queue = nodes
        .into_iter()
        .filter_map(|node| interpreter.interpret(node))
        .collect();
    Flow::new(geometry, Probe::new(measurer), queue).run()
}

struct Flow<'g, 'm, M: Measure + ?Sized> {
    geometry: &'g Geometry,
    probe: Probe<'m, M>,
    queue: VecDeque<Node>,
    pages: Vec<PageRecord>,

    // cursor
    column: usize,
    height: Pt,
    prev_bottom: Option<Pt>,
    header: Option<String>,
    footer: Option<String>,

    // the open page
    blocks: Vec<PlacedBlock>,
    reserved: Pt,
    span_bottom: Option<Pt>,
    overflowed: bool,
}

impl<'g, 'm, M: Measure + ?Sized> Flow<'g, 'm, M> {
    fn new(geometry: &'g Geometry, probe: Probe<'m, M>, queue: VecDeque<Node>) -> Self {
        Flow {
            geometry,
            probe,
            queue,
            pages: Vec::new(),
            column: 0,
            height: Pt::ZERO,
            prev_bottom: None,
            header: None,
            footer: None,
            blocks: Vec::new(),
            reserved: Pt::ZERO,
            span_bottom: None,
            overflowed: false,
        }
    }

    fn run(mut self) -> Vec<PageRecord> {
        while let Some(node) = self.queue.pop_front() {
            self.step(node);
        }
        self.finish()
    }

    fn step(&mut self, node: Node) {
        match node {
            Node::PageBreak => self.close_page(),
            Node::ColumnBreak => {
                self.push(Node::ColumnBreak, Placement::Column(self.column), Pt::ZERO);
                self.advance();
            }
            Node::RowBreak(height) => self.place_flowing(
                Node::RowBreak(height),
                Metrics::new(height, Pt::ZERO, Pt::ZERO),
            ),
            Node::RunHeader(text) => self.header = non_empty(text),
            Node::RunFooter(text) => self.footer = non_empty(text),
            node if is_span_all(&node) => self.place_spanning(node),
            node => {
                let metrics = self.probe.measure(&node, self.geometry.column_width());
                self.place_flowing(node, metrics);
            }
        }
    }

    /// Space a block takes below the last one in the column, with the
    /// adjoining margins collapsed
    fn increment(&self, metrics: &Metrics) -> Pt {
        metrics.outer() - self.collapse(metrics)
    }

    fn collapse(&self, metrics: &Metrics) -> Pt {
        match self.prev_bottom {
            Some(bottom) => bottom.min(metrics.margin_top),
            None => Pt::ZERO,
        }
    }

    fn fits(&self, increment: Pt) -> bool {
        (self.height + increment).0 <= self.geometry.usable_height().0 + EPSILON
    }

    /// Whether the column still has its whole page budget
    fn is_fresh(&self) -> bool {
        self.prev_bottom.is_none() && self.height == Pt::ZERO
    }

    fn place_flowing(&mut self, node: Node, metrics: Metrics) {
        let increment = self.increment(&metrics);
        if self.fits(increment) {
            self.push(node, Placement::Column(self.column), increment);
            self.prev_bottom = Some(metrics.margin_bottom);
            return;
        }

        let capacity = self.geometry.usable_height() - self.reserved;
        if metrics.outer().0 <= capacity.0 + EPSILON && !self.is_fresh() {
            trace!("{} does not fit, moving on", node.kind());
            self.advance();
            self.queue.push_front(node);
            return;
        }

        let remaining = self.geometry.usable_height() - self.height + self.collapse(&metrics);
        if remaining > Pt::ZERO {
            let width = self.geometry.column_width();
            let split = split_block(&node, width, remaining, &mut self.probe);
            if let Split::Parts { head, tail } = split {
                let head_metrics = self.probe.measure(&head, width);
                let increment = self.increment(&head_metrics);
                self.push(head, Placement::Column(self.column), increment);
                self.prev_bottom = Some(head_metrics.margin_bottom);
                if let Some(tail) = tail {
                    self.queue.push_front(tail);
                }
                return;
            }
        }

        if !self.is_fresh() {
            trace!("{} cannot split here, retrying in a fresh column", node.kind());
            self.advance();
            self.queue.push_front(node);
            return;
        }

        warn!(
            "{} of height {} overflows a {} column and cannot be split",
            node.kind(),
            metrics.outer(),
            self.geometry.usable_height()
        );
        self.overflowed = true;
        self.push(node, Placement::Column(self.column), increment);
        self.advance();
    }

    fn place_spanning(&mut self, node: Node) {
        if !self.blocks.is_empty() {
            self.close_page();
        }

        let metrics = self.probe.measure(&node, self.geometry.content_width());
        let height = metrics.outer();
        let usable = self.geometry.usable_height();
        self.push(node, Placement::Spanning, height);

        if height.0 > usable.0 + EPSILON {
            warn!("spanning block of height {height} overflows a {usable} page");
            self.overflowed = true;
            self.close_page();
        } else if height.0 >= usable.0 - EPSILON {
            self.close_page();
        } else {
            self.reserved = height;
            self.span_bottom = Some(metrics.margin_bottom);
            self.height = height;
            self.prev_bottom = self.span_bottom;
        }
    }

    fn push(&mut self, node: Node, placement: Placement, increment: Pt) {
        trace!(
            "placing {} in {:?} at {} (+{})",
            node.kind(),
            placement,
            self.height,
            increment
        );
        if let Placement::Column(_) = placement {
            self.height += increment;
        }
        self.blocks.push(PlacedBlock {
            node,
            placement,
            increment,
        });
    }

    /// Moves to the next column, or to a new page from the last one
    fn advance(&mut self) {
        if self.column + 1 < self.geometry.column_count() {
            self.column += 1;
            self.height = self.reserved;
            self.prev_bottom = self.span_bottom;
        } else {
            self.close_page();
        }
    }

    fn close_page(&mut self) {
        debug!(
            "closing page {} with {} blocks",
            self.pages.len() + 1,
            self.blocks.len()
        );
        let blocks = std::mem::take(&mut self.blocks);
        self.pages.push(PageRecord::new(
            blocks,
            self.header.clone(),
            self.footer.clone(),
            self.overflowed,
        ));

        self.column = 0;
        self.height = Pt::ZERO;
        self.prev_bottom = None;
        self.reserved = Pt::ZERO;
        self.span_bottom = None;
        self.overflowed = false;
    }

    fn finish(mut self) -> Vec<PageRecord> {
        self.close_page();
        if self.probe.failures() > 0 {
            warn!(
                "{} of {} measurements failed and were laid out as zero height",
                self.probe.failures(),
                self.probe.calls()
            );
        }
        debug!(
            "laid out {} pages with {} measurements",
            self.pages.len(),
            self.probe.calls()
        );
        self.pages
    }
}

fn non_empty(text: String) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeasureError;
    use crate::layout::Margins;
    use crate::node::Attributes;
    use pretty_assertions::assert_eq;

    /// Heights come from a `data-h` attribute, or 10pt per word of text
    struct Exact;

    impl Measure for Exact {
        fn measure(&mut self, node: &Node, _width: Pt) -> Result<Metrics, MeasureError> {
            let fixed = node
                .attrs()
                .and_then(|a| a.get("data-h"))
                .and_then(|h| h.parse::<f32>().ok());
            let height = match fixed {
                Some(h) => h,
                None => 10.0 * node.text().split_whitespace().count() as f32,
            };
            Ok(Metrics::new(Pt(height), Pt::ZERO, Pt::ZERO))
        }
    }

    fn geometry(columns: usize) -> Geometry {
        Geometry::new((Pt(220.0), Pt(120.0)), Margins::all(Pt(10.0)))
            .with_columns(columns, Pt(20.0))
    }

    fn tall(height: f32) -> Node {
        Node::block("div", Attributes::new().with("data-h", height.to_string()))
    }

    fn spanning(height: f32) -> Node {
        Node::block(
            "figure",
            Attributes::class("img-wide").with("data-h", height.to_string()),
        )
    }

    fn placements(page: &PageRecord) -> Vec<Placement> {
        page.blocks.iter().map(|b| b.placement).collect()
    }

    #[test]
    fn empty_stream_gives_one_empty_page() {
        let pages = paginate(Vec::new(), &geometry(1), &mut Exact);
        assert_eq!(pages, vec![PageRecord::default()]);
    }

    #[test]
    fn blocks_fill_columns_then_pages() {
        let nodes = (0..5).map(|_| tall(50.0));
        let pages = paginate(nodes, &geometry(2), &mut Exact);
        assert_eq!(pages.len(), 2);
        assert_eq!(
            placements(&pages[0]),
            vec![
                Placement::Column(0),
                Placement::Column(0),
                Placement::Column(1),
                Placement::Column(1)
            ]
        );
        assert_eq!(placements(&pages[1]), vec![Placement::Column(0)]);
    }

    #[test]
    fn margins_collapse_between_blocks() {
        struct Margined;
        impl Measure for Margined {
            fn measure(&mut self, _node: &Node, _width: Pt) -> Result<Metrics, MeasureError> {
                Ok(Metrics::new(Pt(30.0), Pt(10.0), Pt(10.0)))
            }
        }
        // 50 + 40 + 40 = 130 > 100, but only after the third
        let nodes = (0..3).map(|i| Node::paragraph(format!("p{i}")));
        let pages = paginate(nodes, &geometry(1), &mut Margined);
        assert_eq!(pages.len(), 2);
        let increments: Vec<Pt> = pages[0].blocks.iter().map(|b| b.increment).collect();
        assert_eq!(increments, vec![Pt(50.0), Pt(40.0)]);
    }

    #[test]
    fn column_break_emits_spacer_and_advances() {
        let nodes = vec![tall(10.0), Node::ColumnBreak, tall(10.0)];
        let pages = paginate(nodes, &geometry(2), &mut Exact);
        assert_eq!(pages.len(), 1);
        assert_eq!(
            placements(&pages[0]),
            vec![Placement::Column(0), Placement::Column(0), Placement::Column(1)]
        );
        assert!(pages[0].markup.contains("force-colbreak"));
    }

    #[test]
    fn column_break_in_last_column_closes_page() {
        let nodes = vec![tall(10.0), Node::ColumnBreak, tall(10.0)];
        let pages = paginate(nodes, &geometry(1), &mut Exact);
        assert_eq!(pages.len(), 2);
    }

    #[test]
    fn row_break_takes_space() {
        let nodes = vec![tall(50.0), Node::RowBreak(Pt(40.0)), tall(20.0)];
        let pages = paginate(nodes, &geometry(1), &mut Exact);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].column_usage(1), vec![Pt(90.0)]);
    }

    #[test]
    fn page_break_after_overflow_closes_the_empty_page() {
        let nodes = vec![tall(150.0), Node::PageBreak, tall(10.0)];
        let pages = paginate(nodes, &geometry(1), &mut Exact);
        assert_eq!(pages.len(), 3);
        assert!(pages[0].overflowed);
        assert!(pages[1].is_empty());
        assert_eq!(pages[2].blocks.len(), 1);
    }

    #[test]
    fn consecutive_page_breaks_leave_a_blank_page() {
        let nodes = vec![tall(10.0), Node::PageBreak, Node::PageBreak, tall(10.0)];
        let pages = paginate(nodes, &geometry(1), &mut Exact);
        assert_eq!(pages.len(), 3);
        assert!(pages[1].is_empty());
    }

    #[test]
    fn leading_page_break_emits_a_blank_first_page() {
        let pages = paginate(vec![Node::PageBreak, tall(10.0)], &geometry(1), &mut Exact);
        assert_eq!(pages.len(), 2);
        assert!(pages[0].is_empty());
        assert_eq!(pages[1].blocks.len(), 1);
    }

    #[test]
    fn trailing_page_break_emits_a_blank_last_page() {
        let pages = paginate(vec![tall(10.0), Node::PageBreak], &geometry(1), &mut Exact);
        assert_eq!(pages.len(), 2);
        assert!(pages[1].is_empty());
    }

    #[test]
    fn overflowing_last_block_still_emits_the_final_page() {
        let pages = paginate(vec![tall(150.0)], &geometry(1), &mut Exact);
        assert_eq!(pages.len(), 2);
        assert!(pages[0].overflowed);
        assert!(pages[1].is_empty());
    }

    #[test]
    fn full_height_spanning_block_at_the_end_still_emits_the_final_page() {
        let pages = paginate(vec![spanning(100.0)], &geometry(2), &mut Exact);
        assert_eq!(pages.len(), 2);
        assert!(!pages[0].overflowed);
        assert!(pages[1].is_empty());
    }

    #[test]
    fn spanning_block_opens_a_new_page() {
        let nodes = vec![tall(10.0), spanning(30.0), tall(60.0), tall(60.0)];
        let pages = paginate(nodes, &geometry(2), &mut Exact);
        assert_eq!(pages.len(), 2);
        assert_eq!(placements(&pages[0]), vec![Placement::Column(0)]);
        assert_eq!(
            placements(&pages[1]),
            vec![Placement::Spanning, Placement::Column(0), Placement::Column(1)]
        );
        // both columns start below the spanning block
        assert_eq!(pages[1].column_usage(2), vec![Pt(90.0), Pt(90.0)]);
    }

    #[test]
    fn spanning_block_first_on_page_stays() {
        let pages = paginate(vec![spanning(30.0), tall(10.0)], &geometry(2), &mut Exact);
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn oversized_spanning_block_overflows_alone() {
        let nodes = vec![spanning(150.0), tall(10.0)];
        let pages = paginate(nodes, &geometry(2), &mut Exact);
        assert_eq!(pages.len(), 2);
        assert!(pages[0].overflowed);
        assert!(!pages[1].overflowed);
    }

    #[test]
    fn unsplittable_block_overflows_and_closes_column() {
        let nodes = vec![tall(10.0), tall(150.0), tall(10.0)];
        let pages = paginate(nodes, &geometry(1), &mut Exact);
        assert_eq!(pages.len(), 3);
        assert!(!pages[0].overflowed);
        assert!(pages[1].overflowed);
        assert_eq!(pages[1].blocks.len(), 1);
    }

    #[test]
    fn oversized_paragraph_splits_into_remaining_space() {
        // 15 words at 10pt each against a 100pt column, 30pt already used
        let words: Vec<String> = (0..15).map(|i| format!("w{i}")).collect();
        let nodes = vec![tall(30.0), Node::paragraph(words.join(" "))];
        let pages = paginate(nodes, &geometry(1), &mut Exact);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].text(), words[..7].join(" "));
        assert_eq!(pages[1].text(), words[7..].join(" "));
    }

    #[test]
    fn headers_apply_when_pages_close() {
        let nodes = vec![
            Node::RunHeader("One".into()),
            tall(10.0),
            Node::PageBreak,
            Node::RunFooter("foot".into()),
            tall(10.0),
            Node::RunHeader("Two".into()),
            Node::RunHeader(" ".into()),
        ];
        let pages = paginate(nodes, &geometry(1), &mut Exact);
        assert_eq!(pages[0].header.as_deref(), Some("One"));
        assert_eq!(pages[0].footer, None);
        assert_eq!(pages[1].header, None);
        assert_eq!(pages[1].footer.as_deref(), Some("foot"));
    }

    #[test]
    fn sentinel_blocks_are_interpreted() {
        let nodes = vec![
            tall(10.0),
            Node::block("div", Attributes::new().with("data-pagebreak", "")),
            Node::block("script", Attributes::new()),
            tall(10.0),
        ];
        let pages = paginate(nodes, &geometry(1), &mut Exact);
        assert_eq!(pages.len(), 2);
        assert!(!pages[1].markup.contains("script"));
    }
}
