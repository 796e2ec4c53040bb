//! Measurement: how tall a block is when laid out at a given width.
//!
//! The paginator never looks at glyphs itself. Everything it knows about
//! space comes through a [`Measure`] implementation, which it calls through a
//! [`Probe`] so that failures degrade to zero-height blocks instead of
//! aborting the layout pass.
//!
//! [`BoxMeasurer`] is a ready-made implementation that word-wraps text with
//! any [`TextMetrics`]: fixed-advance [`Monospace`] metrics or a real
//! [`Font`].

mod boxes;
mod font;
mod wrap;

pub use boxes::*;
pub use font::*;
pub use wrap::*;

use crate::error::MeasureError;
use crate::node::Node;
use crate::units::Pt;
use log::warn;

/// Rendered size of a block laid out in isolation
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Metrics {
    /// Border-box height, excluding margins
    pub height: Pt,
    pub margin_top: Pt,
    pub margin_bottom: Pt,
}

impl Metrics {
    pub fn new(height: Pt, margin_top: Pt, margin_bottom: Pt) -> Metrics {
        Metrics {
            height,
            margin_top,
            margin_bottom,
        }
    }

    /// Height plus both margins: the space the block takes at the top of an
    /// empty column
    pub fn outer(&self) -> Pt {
        self.height + self.margin_top + self.margin_bottom
    }

    fn is_valid(&self) -> bool {
        self.height.is_valid() && self.margin_top.is_valid() && self.margin_bottom.is_valid()
    }
}

/// The box-metrics oracle the paginator depends on.
///
/// Implementations must be deterministic for a fixed environment, and the
/// height of a plain paragraph must not decrease as its text grows: the
/// paragraph splitter binary-searches on it. Taking `&mut self` means a
/// shared measuring surface is never used by two callers at once.
pub trait Measure {
    fn measure(&mut self, node: &Node, width: Pt) -> Result<Metrics, MeasureError>;
}

/// Wraps a [Measure] for the layout pass: counts calls and turns every
/// failure or nonsensical result into zero metrics, with a warning.
pub struct Probe<'m, M: Measure + ?Sized> {
    measurer: &'m mut M,
    calls: usize,
    failures: usize,
}

impl<'m, M: Measure + ?Sized> Probe<'m, M> {
    pub fn new(measurer: &'m mut M) -> Probe<'m, M> {
        Probe {
            measurer,
            calls: 0,
            failures: 0,
        }
    }

    pub fn measure(&mut self, node: &Node, width: Pt) -> Metrics {
        self.calls += 1;
        match self.measurer.measure(node, width) {
            Ok(metrics) if metrics.is_valid() => metrics,
            Ok(metrics) => {
                self.failures += 1;
                warn!(
                    "{} node measured as {:?}; treating it as zero height",
                    node.kind(),
                    metrics
                );
                Metrics::default()
            }
            Err(err) => {
                self.failures += 1;
                warn!("{err}; treating {} node as zero height", node.kind());
                Metrics::default()
            }
        }
    }

    /// Number of measurements taken so far
    pub fn calls(&self) -> usize {
        self.calls
    }

    /// Number of measurements that failed and were zeroed
    pub fn failures(&self) -> usize {
        self.failures
    }
}
