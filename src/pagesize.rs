//! Pre-defined page sizes for common paper formats.
//!
//! All sizes are provided in portrait orientation (width, height) where width ≤ height.
//! Use the [`PageOrientation`](crate::pagesize::PageOrientation) trait to convert between
//! portrait and landscape.
//!
//! [`PageFormat`] bundles the sizes a zine is usually printed on with the
//! margins that suit them.
//!
//! # Example
//!
//! ```
//! use zine_flow::pagesize::{PageFormat, PageOrientation, A4};
//!
//! let landscape = A4.landscape();
//! assert!(landscape.0 > landscape.1);
//!
//! let a5: PageFormat = "a5".parse().unwrap();
//! assert_eq!(a5.label(), "A5 (148×210mm)");
//! ```

use crate::error::FlowError;
use crate::layout::Margins;
use crate::units::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Page dimensions as (width, height) in points.
pub type PageSize = (Pt, Pt);

// north american sizes
pub const LETTER: PageSize = (Pt(8.5 * 72.0), Pt(11.0 * 72.0));
pub const HALF_LETTER: PageSize = (Pt(5.5 * 72.0), Pt(8.5 * 72.0));
pub const LEGAL: PageSize = (Pt(8.5 * 72.0), Pt(13.0 * 72.0));
pub const TABLOID: PageSize = (Pt(11.0 * 72.0), Pt(17.0 * 72.0));

// iso a-series (converted from mm to points)
pub const A0: PageSize = (Pt(841.0 * 72.0 / 25.4), Pt(1189.0 * 72.0 / 25.4));
pub const A1: PageSize = (Pt(594.0 * 72.0 / 25.4), Pt(841.0 * 72.0 / 25.4));
pub const A2: PageSize = (Pt(420.0 * 72.0 / 25.4), Pt(594.0 * 72.0 / 25.4));
pub const A3: PageSize = (Pt(297.0 * 72.0 / 25.4), Pt(420.0 * 72.0 / 25.4));
pub const A4: PageSize = (Pt(210.0 * 72.0 / 25.4), Pt(297.0 * 72.0 / 25.4));
pub const A5: PageSize = (Pt(148.0 * 72.0 / 25.4), Pt(210.0 * 72.0 / 25.4));
pub const A6: PageSize = (Pt(105.0 * 72.0 / 25.4), Pt(148.0 * 72.0 / 25.4));
pub const A7: PageSize = (Pt(74.0 * 72.0 / 25.4), Pt(105.0 * 72.0 / 25.4));

/// Convert page sizes between portrait and landscape orientations.
pub trait PageOrientation {
    /// Returns the size in portrait orientation (width ≤ height).
    fn portrait(self) -> Self;
    /// Returns the size in landscape orientation (width ≥ height).
    fn landscape(self) -> Self;
}

impl PageOrientation for PageSize {
    fn portrait(self) -> Self {
        if self.0 <= self.1 {
            self
        } else {
            (self.1, self.0)
        }
    }

    fn landscape(self) -> PageSize {
        if self.0 >= self.1 {
            self
        } else {
            (self.1, self.0)
        }
    }
}

/// The paper formats offered for zines, each with a recommended set of margins.
///
/// Note that `Letter` here is the 216×279mm trim, a hair off [LETTER].
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageFormat {
    A7,
    A6,
    #[default]
    A5,
    A4,
    Letter,
}

impl PageFormat {
    pub const ALL: [PageFormat; 5] = [
        PageFormat::A7,
        PageFormat::A6,
        PageFormat::A5,
        PageFormat::A4,
        PageFormat::Letter,
    ];

    /// Human readable name including the trim size
    pub fn label(self) -> &'static str {
        match self {
            PageFormat::A7 => "A7 (74×105mm)",
            PageFormat::A6 => "A6 (105×148mm)",
            PageFormat::A5 => "A5 (148×210mm)",
            PageFormat::A4 => "A4 (210×297mm)",
            PageFormat::Letter => "Letter (216×279mm)",
        }
    }

    /// Portrait page size
    pub fn size(self) -> PageSize {
        let (w, h) = self.size_mm();
        (Mm(w).into(), Mm(h).into())
    }

    fn size_mm(self) -> (f32, f32) {
        match self {
            PageFormat::A7 => (74.0, 105.0),
            PageFormat::A6 => (105.0, 148.0),
            PageFormat::A5 => (148.0, 210.0),
            PageFormat::A4 => (210.0, 297.0),
            PageFormat::Letter => (216.0, 279.0),
        }
    }

    /// Margins that suit the format; smaller pages get tighter margins
    pub fn default_margins(self) -> Margins {
        let mm = |v: f32| -> Pt { Mm(v).into() };
        match self {
            PageFormat::A7 => Margins::all(mm(10.0)),
            PageFormat::A6 => Margins::symmetric(mm(15.0), mm(12.0)),
            PageFormat::A5 => Margins::symmetric(mm(20.0), mm(15.0)),
            PageFormat::A4 | PageFormat::Letter => Margins::all(mm(20.0)),
        }
    }
}

impl FromStr for PageFormat {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PageFormat::ALL
            .into_iter()
            .find(|format| format!("{format:?}").eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FlowError::UnknownFormat(s.to_string()))
    }
}
