//! Measurement-driven pagination of block content into fixed-size,
//! multi-column pages.
//!
//! Content arrives as a stream of [`Node`]s: paragraphs, lists, opaque blocks
//! and flow markers. [`paginate`] measures each block through a
//! [`Measure`](measure::Measure) implementation, places it in the current
//! column, moves on to the next column or page when it does not fit, and
//! splits paragraphs and lists that cannot fit any column. The result is a
//! list of [`PageRecord`]s, each holding the markup of its blocks and the
//! running header and footer active when it closed.

mod units;
pub use units::*;

mod error;
pub use error::*;

pub mod pagesize;

/// Utility structures describing the space pages are laid out in
pub mod layout;

mod node;
pub use node::*;

mod span;
pub use span::*;

pub mod measure;

pub mod split;

pub mod markers;

mod page;
pub use page::*;

mod flow;
pub use flow::*;

pub mod config;
