//! Painting styled ranges onto text
//!
//! Syntax spans, search matches and diagnostics all end up as byte ranges
//! with a style. They are computed against some snapshot of the buffer
//! which may no longer match the text being drawn, so each range is
//! checked and applied on its own: a bad range is counted and logged, and
//! the rest still paint.

use std::fmt;
use std::ops::Range;

use thiserror::Error;

use crate::syntax::Style;

/// A styled byte range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    pub range: Range<usize>,
    pub style: Style,
}

impl Decoration {
    pub fn new(range: Range<usize>, style: Style) -> Self {
        Self { range, style }
    }
}

/// Why a range could not be applied
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("range {start}..{end} is inverted")]
    Inverted { start: usize, end: usize },

    #[error("range {start}..{end} exceeds text length {len}")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("offset {0} is not on a character boundary")]
    NotCharBoundary(usize),
}

/// Check that `range` can be sliced out of `text`
pub fn check_range(text: &str, range: &Range<usize>) -> Result<(), RangeError> {
    let (start, end) = (range.start, range.end);
    if start > end {
        return Err(RangeError::Inverted { start, end });
    }
    if end > text.len() {
        return Err(RangeError::OutOfBounds {
            start,
            end,
            len: text.len(),
        });
    }
    for offset in [start, end] {
        if !text.is_char_boundary(offset) {
            return Err(RangeError::NotCharBoundary(offset));
        }
    }
    Ok(())
}

/// Tally of a batch application
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub applied: usize,
    pub failed: usize,
}

impl ApplyReport {
    pub fn merge(&mut self, other: ApplyReport) {
        self.applied += other.applied;
        self.failed += other.failed;
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for ApplyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} applied, {} failed", self.applied, self.failed)
    }
}

/// Apply every item independently, counting failures
pub fn apply_each<T, E, F>(items: impl IntoIterator<Item = T>, mut apply: F) -> ApplyReport
where
    E: fmt::Display,
    F: FnMut(T) -> Result<(), E>,
{
    items
        .into_iter()
        .fold(ApplyReport::default(), |mut report, item| {
            match apply(item) {
                Ok(()) => report.applied += 1,
                Err(err) => {
                    tracing::warn!(%err, "decoration skipped");
                    report.failed += 1;
                }
            }
            report
        })
}

/// Per-byte styles for a window of the text
///
/// Decorations are overlaid in the order they are painted, so later layers
/// win where they set an attribute.
#[derive(Debug)]
pub struct StyleMap<'a> {
    text: &'a str,
    window: Range<usize>,
    styles: Vec<Style>,
}

impl<'a> StyleMap<'a> {
    /// Style map over `window` of `text`; the window is clamped to the text
    pub fn new(text: &'a str, window: Range<usize>) -> Self {
        let end = window.end.min(text.len());
        let start = window.start.min(end);
        Self {
            text,
            window: start..end,
            styles: vec![Style::default(); end - start],
        }
    }

    /// Paint a batch of decorations
    pub fn paint(&mut self, decorations: impl IntoIterator<Item = Decoration>) -> ApplyReport {
        apply_each(decorations, |decoration| self.paint_one(&decoration))
    }

    fn paint_one(&mut self, decoration: &Decoration) -> Result<(), RangeError> {
        check_range(self.text, &decoration.range)?;
        let start = decoration.range.start.max(self.window.start);
        let end = decoration.range.end.min(self.window.end);
        for offset in start..end {
            let slot = &mut self.styles[offset - self.window.start];
            *slot = slot.overlay(decoration.style);
        }
        Ok(())
    }

    /// Style at a byte offset inside the window
    pub fn style_at(&self, offset: usize) -> Style {
        offset
            .checked_sub(self.window.start)
            .and_then(|i| self.styles.get(i))
            .copied()
            .unwrap_or_default()
    }

    pub fn window(&self) -> Range<usize> {
        self.window.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Color;

    fn red() -> Style {
        Style::fg(Color::Red)
    }

    #[test]
    fn test_check_range() {
        let text = "héllo";
        assert!(check_range(text, &(0..1)).is_ok());
        assert!(check_range(text, &(0..text.len())).is_ok());
        assert_eq!(
            check_range(text, &(0..99)),
            Err(RangeError::OutOfBounds {
                start: 0,
                end: 99,
                len: 6
            })
        );
        assert_eq!(check_range(text, &(2..3)), Err(RangeError::NotCharBoundary(2)));
        assert!(matches!(
            check_range(text, &(4..2)),
            Err(RangeError::Inverted { .. })
        ));
    }

    #[test]
    fn test_failures_do_not_stop_the_batch() {
        let text = "short";
        let mut map = StyleMap::new(text, 0..text.len());
        let report = map.paint(vec![
            Decoration::new(0..2, red()),
            Decoration::new(10..20, red()),
            Decoration::new(3..5, red()),
        ]);
        assert_eq!(report, ApplyReport { applied: 2, failed: 1 });
        assert_eq!(map.style_at(0), red());
        assert_eq!(map.style_at(2), Style::default());
        assert_eq!(map.style_at(4), red());
    }

    #[test]
    fn test_window_clips_painting() {
        let text = "abcdefghij";
        let mut map = StyleMap::new(text, 4..8);
        let report = map.paint(vec![Decoration::new(0..6, red())]);
        assert!(report.is_clean());
        assert_eq!(map.style_at(3), Style::default());
        assert_eq!(map.style_at(4), red());
        assert_eq!(map.style_at(5), red());
        assert_eq!(map.style_at(6), Style::default());
    }

    #[test]
    fn test_later_layers_overlay() {
        let text = "abc";
        let mut map = StyleMap::new(text, 0..3);
        map.paint(vec![Decoration::new(0..3, red())]);
        map.paint(vec![Decoration::new(1..2, Style::reverse())]);
        let middle = map.style_at(1);
        assert_eq!(middle.fg, Color::Red);
        assert!(middle.reverse);
    }

    #[test]
    fn test_apply_each_counts() {
        let report = apply_each(1..=10, |n| if n % 3 == 0 { Err("bad") } else { Ok(()) });
        assert_eq!(report.applied, 7);
        assert_eq!(report.failed, 3);

        let mut total = ApplyReport::default();
        total.merge(report);
        total.merge(ApplyReport { applied: 1, failed: 0 });
        assert_eq!(total.to_string(), "8 applied, 3 failed");
    }

    #[test]
    fn test_window_clamped_to_text() {
        let map = StyleMap::new("abc", 2..50);
        assert_eq!(map.window(), 2..3);
    }
}
