//! Splitting blocks that cannot fit into the space left in a column.
//!
//! Only paragraphs and lists can be split. A paragraph is cut at the last
//! word that fits ([`split_paragraph`]); a list between whole items
//! ([`split_list`]). Everything else reports [`Split::CannotSplit`] and the
//! flow controller has to move or overflow it.

mod list;
mod paragraph;

pub use list::*;
pub use paragraph::*;

use crate::measure::{Measure, Probe};
use crate::node::Node;
use crate::units::Pt;

/// Outcome of trying to fit part of a block into a height budget
#[derive(Debug, Clone, PartialEq)]
pub enum Split<T> {
    /// `head` fits the budget; `tail` is whatever is left over, if anything
    Parts { head: T, tail: Option<T> },
    /// Not even the smallest piece fits; retry in a fresh column or page
    CannotSplit,
}

impl<T> Split<T> {
    pub fn map<U, F: Fn(T) -> U>(self, f: F) -> Split<U> {
        match self {
            Split::Parts { head, tail } => Split::Parts {
                head: f(head),
                tail: tail.map(f),
            },
            Split::CannotSplit => Split::CannotSplit,
        }
    }
}

/// Splits `node` so that its head, measured at `width`, fits in `budget`
pub fn split_block<M: Measure + ?Sized>(
    node: &Node,
    width: Pt,
    budget: Pt,
    probe: &mut Probe<'_, M>,
) -> Split<Node> {
    match node {
        Node::Paragraph(p) => split_paragraph(p, width, budget, probe).map(Node::Paragraph),
        Node::List(l) => split_list(l, width, budget, probe).map(Node::List),
        _ => Split::CannotSplit,
    }
}
