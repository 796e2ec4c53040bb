use super::Split;
use crate::measure::{Measure, Probe};
use crate::node::{Node, Paragraph};
use crate::units::Pt;
use log::debug;

/// A paragraph resolved once into the form the splitter works on
enum Resolved<'p> {
    /// Already a single run of text
    Plain(&'p Paragraph),
    /// Had inline markup; flattened to its text
    Flattened(Paragraph),
}

impl<'p> Resolved<'p> {
    fn resolve(paragraph: &'p Paragraph) -> Option<Resolved<'p>> {
        if paragraph.is_plain() {
            return Some(Resolved::Plain(paragraph));
        }
        let flattened = paragraph.with_text(paragraph.text());
        // an empty paragraph flattens to an empty run, which has nothing to split
        (flattened.is_plain() && !flattened.text().is_empty())
            .then_some(Resolved::Flattened(flattened))
    }

    fn paragraph(&self) -> &Paragraph {
        match self {
            Resolved::Plain(p) => p,
            Resolved::Flattened(p) => p,
        }
    }
}

/// Finds the longest word-aligned prefix of `paragraph` whose height at
/// `width` is within `budget`.
///
/// When the whole paragraph fits, it comes back untouched as the head. When
/// it does not, the text is flattened (inline markup is dropped from both
/// halves) and the cut point is binary-searched over character offsets, then
/// moved back to the preceding space so no word is broken. The head loses its
/// trailing whitespace and the tail its leading whitespace; `head + " " +
/// tail` equals the paragraph's whitespace-collapsed text.
///
/// Reports [Split::CannotSplit] when not even the first word fits.
pub fn split_paragraph<M: Measure + ?Sized>(
    paragraph: &Paragraph,
    width: Pt,
    budget: Pt,
    probe: &mut Probe<'_, M>,
) -> Split<Paragraph> {
    let Some(resolved) = Resolved::resolve(paragraph) else {
        return Split::CannotSplit;
    };
    let plain = resolved.paragraph();
    let text = plain.text();
    if text.is_empty() {
        return Split::CannotSplit;
    }

    let mut fits = |candidate: &str| -> bool {
        let node = Node::Paragraph(plain.with_text(candidate));
        probe.measure(&node, width).outer() <= budget
    };

    if fits(&text) {
        return Split::Parts {
            head: paragraph.clone(),
            tail: None,
        };
    }

    // byte offset of every character boundary, including the end
    let offsets: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();

    // longest prefix (in characters) known to fit; the full text does not
    let mut lo = 0usize;
    let mut hi = offsets.len() - 2;
    while lo < hi {
        let mid = (lo + hi + 1) / 2;
        if fits(text[..offsets[mid]].trim_end()) {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }

    let cut = offsets[lo];
    let boundary = if text[cut..].starts_with(char::is_whitespace) {
        Some(cut)
    } else {
        text[..cut].rfind(char::is_whitespace)
    };
    let Some(boundary) = boundary else {
        debug!("no word of the paragraph fits in {budget}");
        return Split::CannotSplit;
    };

    let head = text[..boundary].trim_end();
    let tail = text[boundary..].trim_start();
    if head.is_empty() {
        return Split::CannotSplit;
    }
    debug!(
        "split paragraph at byte {boundary} of {} to fit {budget}",
        text.len()
    );

    Split::Parts {
        head: plain.with_text(head),
        tail: (!tail.is_empty()).then(|| plain.with_text(tail)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeasureError;
    use crate::measure::{BlockStyle, BlockStyles, BoxMeasurer, Metrics, Monospace};
    use crate::node::Inline;

    // 1pt per character, 10pt per line
    fn measurer() -> BoxMeasurer<Monospace> {
        BoxMeasurer::new(
            Monospace::new(0.1, 1.0),
            BlockStyles::uniform(BlockStyle::new(Pt(10.0))),
        )
    }

    fn parts(split: Split<Paragraph>) -> (String, Option<String>) {
        match split {
            Split::Parts { head, tail } => (head.text(), tail.map(|t| t.text())),
            Split::CannotSplit => panic!("expected a split"),
        }
    }

    #[test]
    fn whole_paragraph_fits() {
        let mut m = measurer();
        let mut probe = Probe::new(&mut m);
        let p = Paragraph::new("short text");
        let split = split_paragraph(&p, Pt(100.0), Pt(10.0), &mut probe);
        assert_eq!(
            split,
            Split::Parts {
                head: p,
                tail: None
            }
        );
        assert_eq!(probe.calls(), 1);
    }

    #[test]
    fn splits_on_word_boundary() {
        let mut m = measurer();
        let mut probe = Probe::new(&mut m);
        // 10 characters per line, 2 lines available
        let p = Paragraph::new("alpha beta gamma delta epsilon zeta");
        let (head, tail) = parts(split_paragraph(&p, Pt(10.0), Pt(20.0), &mut probe));
        assert_eq!(head, "alpha beta gamma");
        assert_eq!(tail.as_deref(), Some("delta epsilon zeta"));
    }

    #[test]
    fn head_and_tail_rebuild_the_text() {
        let mut m = measurer();
        let mut probe = Probe::new(&mut m);
        let text = lipsum::lipsum(80);
        let p = Paragraph::new(text.clone());
        let (head, tail) = parts(split_paragraph(&p, Pt(30.0), Pt(50.0), &mut probe));
        let tail = tail.expect("text is longer than five lines");
        assert_eq!(format!("{head} {tail}"), crate::node::collapse_whitespace(&text));
        assert!(!head.ends_with(' '));
        assert!(!tail.starts_with(' '));
    }

    #[test]
    fn measurements_are_logarithmic() {
        let mut m = measurer();
        let mut probe = Probe::new(&mut m);
        let p = Paragraph::new(lipsum::lipsum(400));
        let _ = split_paragraph(&p, Pt(40.0), Pt(100.0), &mut probe);
        let chars = p.text().chars().count() as f64;
        assert!((probe.calls() as f64) <= chars.log2().ceil() + 2.0);
    }

    #[test]
    fn rich_paragraphs_are_flattened() {
        let mut m = measurer();
        let mut probe = Probe::new(&mut m);
        let p = Paragraph {
            attrs: crate::node::Attributes::class("lead"),
            content: vec![
                Inline::text("alpha "),
                Inline::styled("em", "beta gamma"),
                Inline::text(" delta"),
            ],
        };
        let split = split_paragraph(&p, Pt(10.0), Pt(10.0), &mut probe);
        let Split::Parts { head, tail } = split else {
            panic!("expected a split");
        };
        assert!(head.is_plain());
        assert!(head.attrs.has_class("lead"));
        assert_eq!(head.text(), "alpha beta");
        assert_eq!(tail.map(|t| t.text()).as_deref(), Some("gamma delta"));
    }

    #[test]
    fn rich_paragraph_that_fits_is_returned_as_is() {
        let mut m = measurer();
        let mut probe = Probe::new(&mut m);
        let p = Paragraph {
            attrs: Default::default(),
            content: vec![Inline::styled("strong", "bold")],
        };
        let split = split_paragraph(&p, Pt(10.0), Pt(10.0), &mut probe);
        assert_eq!(
            split,
            Split::Parts {
                head: p,
                tail: None
            }
        );
    }

    #[test]
    fn first_word_too_long() {
        let mut m = measurer();
        let mut probe = Probe::new(&mut m);
        let p = Paragraph::new("incomprehensibilities abound");
        // one 10-char line fits, but that is the middle of the first word
        let split = split_paragraph(&p, Pt(10.0), Pt(10.0), &mut probe);
        assert_eq!(split, Split::CannotSplit);
    }

    #[test]
    fn nothing_fits_in_no_space() {
        let mut m = measurer();
        let mut probe = Probe::new(&mut m);
        let p = Paragraph::new("a b c");
        assert_eq!(
            split_paragraph(&p, Pt(1.0), Pt(0.0), &mut probe),
            Split::CannotSplit
        );
    }

    #[test]
    fn empty_paragraphs_cannot_split() {
        let mut m = measurer();
        let mut probe = Probe::new(&mut m);
        let p = Paragraph {
            attrs: Default::default(),
            content: vec![],
        };
        assert_eq!(
            split_paragraph(&p, Pt(10.0), Pt(10.0), &mut probe),
            Split::CannotSplit
        );
    }

    /// Height grows one unit per character: exercises the search directly
    struct Linear;

    impl Measure for Linear {
        fn measure(&mut self, node: &Node, _width: Pt) -> Result<Metrics, MeasureError> {
            let chars = node.text().chars().count() as f32;
            Ok(Metrics::new(Pt(chars), Pt::ZERO, Pt::ZERO))
        }
    }

    #[test]
    fn backs_off_to_preceding_space() {
        let mut linear = Linear;
        let mut probe = Probe::new(&mut linear);
        let p = Paragraph::new("one two three four");
        // 9 characters fit: "one two t" -> back off to "one two"
        let (head, tail) = parts(split_paragraph(&p, Pt(100.0), Pt(9.0), &mut probe));
        assert_eq!(head, "one two");
        assert_eq!(tail.as_deref(), Some("three four"));
    }

    #[test]
    fn cut_exactly_at_a_space() {
        let mut linear = Linear;
        let mut probe = Probe::new(&mut linear);
        let p = Paragraph::new("one two three four");
        let (head, _) = parts(split_paragraph(&p, Pt(100.0), Pt(7.0), &mut probe));
        assert_eq!(head, "one two");
    }
}
