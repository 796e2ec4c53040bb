use crate::node::Node;

/// Classes that pull a block out of the column flow and across the whole
/// content width.
pub const SPAN_CLASSES: [&str; 6] = [
    "full",
    "cols-1",
    "cols-2",
    "img-wide",
    "figure-wide",
    "img-page",
];

/// Whether `node` must occupy the full content width rather than a single
/// column. Markers and unmarked blocks flow in-column.
pub fn is_span_all(node: &Node) -> bool {
    node.attrs()
        .map(|attrs| attrs.classes().any(|class| SPAN_CLASSES.contains(&class)))
        .unwrap_or(false)
}
