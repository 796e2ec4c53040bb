use super::Margins;
use crate::pagesize::PageSize;
use crate::units::Pt;
use serde::{Deserialize, Serialize};

/// Height given to a row break whose size is missing or unreadable.
pub const DEFAULT_ROW_BREAK: Pt = Pt(12.0);

/// The fixed frame every page is cut from: paper size, margins and the
/// column grid inside the margins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub page: PageSize,
    pub margins: Margins,
    /// Number of columns; anything below 1 is treated as 1
    pub columns: usize,
    pub column_gap: Pt,
    /// Fallback height for row breaks that do not carry a usable size
    pub row_break: Pt,
}

impl Geometry {
    /// A single-column geometry
    pub fn new(page: PageSize, margins: Margins) -> Geometry {
        Geometry {
            page,
            margins,
            columns: 1,
            column_gap: Pt::ZERO,
            row_break: DEFAULT_ROW_BREAK,
        }
    }

    pub fn with_columns(mut self, columns: usize, gap: Pt) -> Geometry {
        self.columns = columns;
        self.column_gap = gap;
        self
    }

    pub fn with_row_break(mut self, height: Pt) -> Geometry {
        self.row_break = height;
        self
    }

    pub fn column_count(&self) -> usize {
        self.columns.max(1)
    }

    /// Page height between the top and bottom margins
    pub fn usable_height(&self) -> Pt {
        (self.page.1 - self.margins.vertical()).max(Pt::ZERO)
    }

    /// Page width between the left and right margins; spanning blocks are
    /// laid out at this width
    pub fn content_width(&self) -> Pt {
        (self.page.0 - self.margins.horizontal()).max(Pt::ZERO)
    }

    /// Width of a single column once the gaps are taken out
    pub fn column_width(&self) -> Pt {
        let columns = self.column_count();
        if columns == 1 {
            return self.content_width();
        }
        let gaps = self.column_gap.max(Pt::ZERO) * (columns - 1) as f32;
        ((self.content_width() - gaps) / columns as f32).max(Pt::ZERO)
    }
}
