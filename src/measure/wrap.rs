use crate::units::Pt;

/// Horizontal and vertical text metrics at a given font size
pub trait TextMetrics {
    /// Horizontal advance of a single character
    fn advance(&self, ch: char, size: Pt) -> Pt;

    /// Distance from one baseline to the next
    fn line_height(&self, size: Pt) -> Pt;
}

/// Every character is the same width. Handy for tests and for plain-text
/// previews where real font data isn't available.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Monospace {
    /// Advance of every character, as a fraction of the font size
    pub advance_em: f32,
    /// Line height as a fraction of the font size
    pub line_height_em: f32,
}

impl Monospace {
    pub fn new(advance_em: f32, line_height_em: f32) -> Monospace {
        Monospace {
            advance_em,
            line_height_em,
        }
    }
}

impl Default for Monospace {
    fn default() -> Self {
        Monospace::new(0.6, 1.2)
    }
}

impl TextMetrics for Monospace {
    fn advance(&self, _ch: char, size: Pt) -> Pt {
        size * self.advance_em
    }

    fn line_height(&self, size: Pt) -> Pt {
        size * self.line_height_em
    }
}

/// Calculate the width of a given string of text at the given font size
pub fn width_of_text<M: TextMetrics + ?Sized>(text: &str, metrics: &M, size: Pt) -> Pt {
    text.chars().map(|ch| metrics.advance(ch, size)).sum()
}

/// A position in the current line where we can safely break.
#[derive(Clone, Copy)]
struct BreakPoint {
    /// byte offset where the line's content ends (the whitespace itself)
    line_end: usize,
    /// character index to resume from on the next line
    resume: usize,
}

/// Breaks `text` into lines no wider than `max_width`.
///
/// Lines break at whitespace where possible. When a line would overflow, the
/// layout rewinds to the most recent whitespace on that line and continues
/// from there on the next one, keeping words intact. A word with no earlier
/// break point on its line (a single very long word) is broken between
/// characters instead. Newlines force a break. Whitespace at a break is
/// dropped, so the returned lines carry no trailing or leading spaces.
///
/// Every line holds at least one character, so this terminates for any
/// width, including zero.
pub fn break_lines<'t, M: TextMetrics + ?Sized>(
    text: &'t str,
    max_width: Pt,
    size: Pt,
    metrics: &M,
) -> Vec<&'t str> {
    let mut lines: Vec<&'t str> = Vec::new();
    if text.is_empty() {
        return lines;
    }

    for segment in text.split('\n') {
        if segment.trim().is_empty() {
            lines.push("");
            continue;
        }

        let chars: Vec<(usize, char)> = segment.char_indices().collect();
        let byte_at = |ci: usize| chars.get(ci).map(|&(b, _)| b).unwrap_or(segment.len());

        let mut ci = 0usize;
        let mut line_start = 0usize;
        let mut x = Pt::ZERO;
        let mut last_break: Option<BreakPoint> = None;

        while ci < chars.len() {
            let (byte, ch) = chars[ci];
            let advance = metrics.advance(ch, size);

            if x + advance > max_width && byte > line_start {
                let (line_end, resume) = if ch.is_whitespace() {
                    // the overflowing character is itself a break point
                    (byte, ci)
                } else if let Some(bp) = last_break {
                    (bp.line_end, bp.resume)
                } else {
                    // no break point - force a character break
                    (byte, ci)
                };

                let line = segment[line_start..line_end].trim_end();
                if !line.is_empty() {
                    lines.push(line);
                }

                ci = resume;
                while ci < chars.len() && chars[ci].1.is_whitespace() {
                    ci += 1;
                }
                line_start = byte_at(ci);
                x = Pt::ZERO;
                last_break = None;
                continue;
            }

            x += advance;
            if ch.is_whitespace() {
                last_break = Some(BreakPoint {
                    line_end: byte,
                    resume: ci + 1,
                });
            }
            ci += 1;
        }

        let rest = segment[line_start..].trim_end();
        if !rest.is_empty() {
            lines.push(rest);
        }
    }

    lines
}
