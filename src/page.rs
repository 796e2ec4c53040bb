use crate::node::Node;
use crate::units::Pt;

/// Where on its page a block was put
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Placement {
    /// Flowed into the column with this 0-based index
    Column(usize),
    /// Across the full content width, above the columns
    Spanning,
}

/// A block as placed on a page
#[derive(Clone, PartialEq, Debug)]
pub struct PlacedBlock {
    pub node: Node,
    pub placement: Placement,
    /// Vertical space the block consumed, after margin collapsing
    pub increment: Pt,
}

/// One finished page: its markup plus the running header and footer that
/// were active when it closed.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct PageRecord {
    /// Markup of every block on the page, in placement order
    pub markup: String,
    pub header: Option<String>,
    pub footer: Option<String>,
    /// The blocks the markup was built from
    pub blocks: Vec<PlacedBlock>,
    /// Whether a block had to be placed even though it did not fit
    pub overflowed: bool,
}

impl PageRecord {
    pub(crate) fn new(
        blocks: Vec<PlacedBlock>,
        header: Option<String>,
        footer: Option<String>,
        overflowed: bool,
    ) -> PageRecord {
        let markup = blocks.iter().map(|b| b.node.to_markup()).collect();
        PageRecord {
            markup,
            header,
            footer,
            blocks,
            overflowed,
        }
    }

    /// Whether nothing at all was placed on the page
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Text of the page's content blocks, space separated
    pub fn text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.node.text())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Height used in each of `columns` columns. Spanning blocks sit above
    /// every column, so they count towards all of them.
    pub fn column_usage(&self, columns: usize) -> Vec<Pt> {
        let mut usage = vec![Pt::ZERO; columns.max(1)];
        for block in &self.blocks {
            match block.placement {
                Placement::Spanning => usage.iter_mut().for_each(|u| *u += block.increment),
                Placement::Column(i) => {
                    if let Some(u) = usage.get_mut(i) {
                        *u += block.increment;
                    }
                }
            }
        }
        usage
    }
}
