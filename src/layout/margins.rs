use crate::units::Pt;
use serde::{Deserialize, Serialize};

/// Space kept clear around the content box of every page. Content flows
/// only inside the margins; headers and footers are expected to be drawn in
/// them by whatever renders the [`PageRecord`](crate::PageRecord)s.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: Pt,
    pub right: Pt,
    pub bottom: Pt,
    pub left: Pt,
}

impl Margins {
    /// Create margins by specifying individual components in a clockwise fashion
    /// starting at the top (in the same order as CSS margins)
    pub fn trbl(top: Pt, right: Pt, bottom: Pt, left: Pt) -> Margins {
        Margins {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Create margins where all values are equal
    pub fn all<D: Into<Pt>>(value: D) -> Margins {
        let value: Pt = value.into();
        Margins::trbl(value, value, value, value)
    }

    /// Create margins by specifying different values for vertical (top and bottom)
    /// and horizontal (left and right) margins
    pub fn symmetric(vertical: Pt, horizontal: Pt) -> Margins {
        Margins::trbl(vertical, horizontal, vertical, horizontal)
    }

    /// Create margins where all values are 0.0
    pub fn empty() -> Margins {
        Margins::all(Pt::ZERO)
    }

    /// Left plus right
    pub fn horizontal(&self) -> Pt {
        self.left + self.right
    }

    /// Top plus bottom
    pub fn vertical(&self) -> Pt {
        self.top + self.bottom
    }
}
