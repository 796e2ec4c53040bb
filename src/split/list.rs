use super::Split;
use crate::measure::{Measure, Probe};
use crate::node::{List, Node};
use crate::units::Pt;
use log::debug;

/// Fits as many whole items of `list` as `budget` allows.
///
/// Items are added to the head one at a time and the head re-measured after
/// each; the first item that pushes it over budget starts the tail. Items are
/// never split. An ordered tail continues the numbering of its head.
///
/// Reports [Split::CannotSplit] when not even the first item fits.
pub fn split_list<M: Measure + ?Sized>(
    list: &List,
    width: Pt,
    budget: Pt,
    probe: &mut Probe<'_, M>,
) -> Split<List> {
    let mut head = list.continued(0, Vec::with_capacity(list.items.len()));

    for (index, item) in list.items.iter().enumerate() {
        head.items.push(item.clone());
        if probe.measure(&Node::List(head.clone()), width).outer() <= budget {
            continue;
        }

        if index == 0 {
            debug!("first list item does not fit in {budget}");
            return Split::CannotSplit;
        }
        head.items.pop();
        debug!(
            "split list after {index} of {} items to fit {budget}",
            list.items.len()
        );
        return Split::Parts {
            head,
            tail: Some(list.continued(index, list.items[index..].to_vec())),
        };
    }

    Split::Parts {
        head: list.clone(),
        tail: None,
    }
}
