//! Page setup: the user-facing description of a layout run, loaded from JSON
//! and resolved into a [`Geometry`].
//!
//! ```
//! use zine_flow::config::PageSetup;
//!
//! let setup = PageSetup::from_json(r#"{
//!     "format": "a6",
//!     "orientation": "landscape",
//!     "columns": 2,
//!     "column_gap": "4mm"
//! }"#).unwrap();
//! let geometry = setup.geometry().unwrap();
//! assert_eq!(geometry.column_count(), 2);
//! assert!(geometry.page.0 > geometry.page.1);
//! ```

use crate::error::FlowError;
use crate::layout::{Geometry, Margins};
use crate::pagesize::{PageFormat, PageOrientation};
use crate::units::{parse_length, Pt};
use serde::{Deserialize, Serialize};

/// A length as written in a setup file: a number of points, or a string
/// with a unit such as `"12mm"`. Unitless strings are CSS pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Length {
    Points(f32),
    Text(String),
}

impl Length {
    pub fn to_pt(&self) -> Result<Pt, FlowError> {
        match self {
            Length::Points(points) if points.is_finite() && *points >= 0.0 => Ok(Pt(*points)),
            Length::Points(points) => Err(FlowError::InvalidLength(points.to_string())),
            Length::Text(text) => {
                parse_length(text).ok_or_else(|| FlowError::InvalidLength(text.clone()))
            }
        }
    }
}

impl From<Pt> for Length {
    fn from(value: Pt) -> Self {
        Length::Points(value.0)
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Per-side margin overrides; sides left out keep the format's margin
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarginSetup {
    pub top: Option<Length>,
    pub right: Option<Length>,
    pub bottom: Option<Length>,
    pub left: Option<Length>,
}

impl MarginSetup {
    /// The same margin on every side
    pub fn all<L: Into<Length>>(length: L) -> MarginSetup {
        let length = length.into();
        MarginSetup {
            top: Some(length.clone()),
            right: Some(length.clone()),
            bottom: Some(length.clone()),
            left: Some(length),
        }
    }

    fn resolve(&self, base: Margins) -> Result<Margins, FlowError> {
        let side = |length: &Option<Length>, fallback: Pt| -> Result<Pt, FlowError> {
            length.as_ref().map_or(Ok(fallback), Length::to_pt)
        };
        Ok(Margins::trbl(
            side(&self.top, base.top)?,
            side(&self.right, base.right)?,
            side(&self.bottom, base.bottom)?,
            side(&self.left, base.left)?,
        ))
    }
}

/// Everything needed to build the page [Geometry] for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageSetup {
    /// Name of a [PageFormat], matched case-insensitively
    pub format: String,
    /// Overrides the format's width
    pub width: Option<Length>,
    /// Overrides the format's height
    pub height: Option<Length>,
    pub orientation: Orientation,
    /// Overrides the format's recommended margins
    pub margins: Option<MarginSetup>,
    pub columns: usize,
    pub column_gap: Length,
    /// Height of row breaks that do not say how tall they are
    pub row_break: Length,
}

impl Default for PageSetup {
    fn default() -> Self {
        PageSetup {
            format: format!("{:?}", PageFormat::default()),
            width: None,
            height: None,
            orientation: Orientation::Portrait,
            margins: None,
            columns: 1,
            column_gap: Length::Text("5mm".to_string()),
            row_break: Length::Points(12.0),
        }
    }
}

impl PageSetup {
    pub fn from_json(json: &str) -> Result<PageSetup, FlowError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn format(&self) -> Result<PageFormat, FlowError> {
        self.format.parse()
    }

    /// Resolves the setup into a page geometry
    pub fn geometry(&self) -> Result<Geometry, FlowError> {
        let format = self.format()?;

        let (mut width, mut height) = format.size();
        if let Some(w) = &self.width {
            width = w.to_pt()?;
        }
        if let Some(h) = &self.height {
            height = h.to_pt()?;
        }
        let page = match self.orientation {
            Orientation::Portrait => (width, height).portrait(),
            Orientation::Landscape => (width, height).landscape(),
        };

        let margins = match &self.margins {
            Some(overrides) => overrides.resolve(format.default_margins())?,
            None => format.default_margins(),
        };

        Ok(Geometry::new(page, margins)
            .with_columns(self.columns, self.column_gap.to_pt()?)
            .with_row_break(self.row_break.to_pt()?))
    }
}
