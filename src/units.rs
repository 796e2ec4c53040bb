//! Length units used throughout layout.
//!
//! All layout happens in [`Pt`] (1/72 of an inch). The other units exist so
//! that callers can speak in whatever the source material uses and convert
//! with `.into()`.

use derive_more::{
    Add, AddAssign, Display, Div, DivAssign, From, Into, Mul, MulAssign, Sub, SubAssign, Sum,
};
use serde::{Deserialize, Serialize};

/// CSS pixels per millimetre (96 pixels per inch).
pub const PX_PER_MM: f32 = 96.0 / 25.4;

/// Points per millimetre.
pub const PT_PER_MM: f32 = 72.0 / 25.4;

/// A typographic point, the unit every layout quantity is expressed in
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Mul,
    MulAssign,
    Div,
    DivAssign,
    Sum,
    From,
    Into,
    Display,
    Serialize,
    Deserialize,
)]
#[display("{_0}pt")]
#[serde(transparent)]
pub struct Pt(pub f32);

impl Pt {
    pub const ZERO: Pt = Pt(0.0);

    pub fn min(self, other: Pt) -> Pt {
        Pt(self.0.min(other.0))
    }

    pub fn max(self, other: Pt) -> Pt {
        Pt(self.0.max(other.0))
    }

    /// Whether this is a usable length: finite and not negative
    pub fn is_valid(self) -> bool {
        self.0.is_finite() && self.0 >= 0.0
    }
}

/// Millimetres
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Add, Sub, Mul, Div, From, Into)]
pub struct Mm(pub f32);

/// Inches
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Add, Sub, Mul, Div, From, Into)]
pub struct In(pub f32);

/// CSS pixels (1/96 of an inch)
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Add, Sub, Mul, Div, From, Into)]
pub struct Px(pub f32);

impl From<Mm> for Pt {
    fn from(value: Mm) -> Self {
        Pt(value.0 * PT_PER_MM)
    }
}

impl From<In> for Pt {
    fn from(value: In) -> Self {
        Pt(value.0 * 72.0)
    }
}

impl From<Px> for Pt {
    fn from(value: Px) -> Self {
        Pt(value.0 * 0.75)
    }
}

impl From<Pt> for Mm {
    fn from(value: Pt) -> Self {
        Mm(value.0 / PT_PER_MM)
    }
}

impl From<Pt> for Px {
    fn from(value: Pt) -> Self {
        Px(value.0 / 0.75)
    }
}

/// Parses a CSS-like length such as `12mm`, `0.5in` or `18pt` into points.
///
/// A bare number is read as CSS pixels. Returns [None] for anything that is
/// not a finite, non-negative length in a known unit.
pub fn parse_length(input: &str) -> Option<Pt> {
    let input = input.trim();
    let split = input
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(input.len());
    let (number, unit) = input.split_at(split);
    let value: f32 = number.trim().parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }

    let pt: Pt = match unit.trim().to_ascii_lowercase().as_str() {
        "" | "px" => Px(value).into(),
        "pt" => Pt(value),
        "mm" => Mm(value).into(),
        "cm" => Mm(value * 10.0).into(),
        "in" => In(value).into(),
        _ => return None,
    };
    Some(pt)
}
