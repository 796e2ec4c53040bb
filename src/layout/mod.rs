//! Page geometry: the frame content is paginated into.
//!
//! A [`Geometry`] fixes the paper size, the [`Margins`] and the column grid.
//! Everything the flow controller needs to know about space is derived from
//! it: the usable height of a column, the width a column is measured at and
//! the full content width used by spanning blocks.
//!
//! # Example
//!
//! ```
//! use zine_flow::layout::{Geometry, Margins};
//! use zine_flow::pagesize::A5;
//! use zine_flow::{Mm, Pt};
//!
//! let geometry = Geometry::new(A5, Margins::all(Mm(15.0)))
//!     .with_columns(2, Mm(5.0).into());
//! assert!(geometry.column_width() < geometry.content_width() / 2.0);
//! assert!(geometry.usable_height() > Pt(0.0));
//! ```

mod geometry;
mod margins;

pub use geometry::*;
pub use margins::*;
