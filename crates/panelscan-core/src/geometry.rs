//! Column geometry for the fixed schedule layout.
//!
//! The schedule template has four field columns at known positions. Positions
//! are stored as fractions of the reference page width and scaled to the
//! concrete page at runtime, so any rasterization DPI lands on the same
//! columns.

use serde::{Deserialize, Serialize};

/// Page width of the reference schedule template, in pixels.
pub const REF_PAGE_WIDTH: f32 = 2037.0;

// Column boundaries measured on the reference template.
const SYMBOL_X: (f32, f32) = (180.0, 620.0);
const KUVAUS_X: (f32, f32) = (853.0, 1410.0);
const SUOJA_X: (f32, f32) = (1420.0, 1530.0);
const KAAPELI_X: (f32, f32) = (1655.0, 1950.0);

/// A horizontal pixel interval `[x1, x2)` on a concrete page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpan {
    pub x1: u32,
    pub x2: u32,
}

impl ColumnSpan {
    /// Width of the span in pixels; zero for degenerate spans.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.x2.saturating_sub(self.x1)
    }

    /// True when the span covers no pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width() == 0
    }
}

/// The four field-column spans resolved for one page width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRanges {
    pub symbol: ColumnSpan,
    pub kuvaus: ColumnSpan,
    pub suoja: ColumnSpan,
    pub kaapeli: ColumnSpan,
}

/// Fractional column layout, referenced against [`REF_PAGE_WIDTH`].
///
/// The default layout is the production schedule template. A custom layout
/// can be supplied for a different form revision; fractions must satisfy
/// `0.0 <= start < end` for each column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnLayout {
    pub symbol: (f32, f32),
    pub kuvaus: (f32, f32),
    pub suoja: (f32, f32),
    pub kaapeli: (f32, f32),
}

impl Default for ColumnLayout {
    fn default() -> Self {
        let frac = |x: (f32, f32)| (x.0 / REF_PAGE_WIDTH, x.1 / REF_PAGE_WIDTH);
        Self {
            symbol: frac(SYMBOL_X),
            kuvaus: frac(KUVAUS_X),
            suoja: frac(SUOJA_X),
            kaapeli: frac(KAAPELI_X),
        }
    }
}

impl ColumnLayout {
    /// Resolve the fractional layout to pixel spans for a page width.
    ///
    /// Pure scaling, no error conditions: a pathological width (0, 1, ...)
    /// yields zero-width spans which downstream crops tolerate as empty.
    #[must_use]
    pub fn resolve(&self, page_width: u32) -> ColumnRanges {
        let w = page_width as f32;
        let span = |f: (f32, f32)| ColumnSpan {
            x1: (f.0 * w).round() as u32,
            x2: (f.1 * w).round() as u32,
        };
        ColumnRanges {
            symbol: span(self.symbol),
            kuvaus: span(self.kuvaus),
            suoja: span(self.suoja),
            kaapeli: span(self.kaapeli),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reference_width_resolves_to_reference_absolutes() {
        let ranges = ColumnLayout::default().resolve(2037);
        assert_eq!(ranges.symbol, ColumnSpan { x1: 180, x2: 620 });
        assert_eq!(ranges.kuvaus, ColumnSpan { x1: 853, x2: 1410 });
        assert_eq!(ranges.suoja, ColumnSpan { x1: 1420, x2: 1530 });
        assert_eq!(ranges.kaapeli, ColumnSpan { x1: 1655, x2: 1950 });
    }

    #[test]
    fn test_columns_ordered_and_disjoint() {
        let r = ColumnLayout::default().resolve(2037);
        assert!(r.symbol.x2 <= r.kuvaus.x1);
        assert!(r.kuvaus.x2 <= r.suoja.x1);
        assert!(r.suoja.x2 <= r.kaapeli.x1);
    }

    #[test]
    fn test_double_width_doubles_boundaries() {
        let r = ColumnLayout::default().resolve(4074);
        assert_eq!(r.symbol, ColumnSpan { x1: 360, x2: 1240 });
        assert_eq!(r.suoja, ColumnSpan { x1: 2840, x2: 3060 });
    }

    #[test]
    fn test_zero_width_degenerates_to_empty_spans() {
        let r = ColumnLayout::default().resolve(0);
        assert!(r.symbol.is_empty());
        assert!(r.kuvaus.is_empty());
        assert!(r.suoja.is_empty());
        assert!(r.kaapeli.is_empty());
    }

    #[test]
    fn test_tiny_width_never_inverts() {
        for w in 0..32 {
            let r = ColumnLayout::default().resolve(w);
            for span in [r.symbol, r.kuvaus, r.suoja, r.kaapeli] {
                assert!(span.x1 <= span.x2, "inverted span at width {w}");
            }
        }
    }

    #[test]
    fn test_span_width() {
        let span = ColumnSpan { x1: 10, x2: 25 };
        assert_eq!(span.width(), 15);
        assert!(!span.is_empty());
        assert!(ColumnSpan { x1: 7, x2: 7 }.is_empty());
    }

    proptest! {
        // Resolved boundaries stay within rounding distance of the exact
        // fraction at every page width.
        #[test]
        fn prop_scale_invariance(width in 100u32..20_000) {
            let layout = ColumnLayout::default();
            let ranges = layout.resolve(width);
            let w = width as f32;
            let checks = [
                (ranges.symbol.x1, layout.symbol.0),
                (ranges.symbol.x2, layout.symbol.1),
                (ranges.kuvaus.x1, layout.kuvaus.0),
                (ranges.kuvaus.x2, layout.kuvaus.1),
                (ranges.suoja.x1, layout.suoja.0),
                (ranges.suoja.x2, layout.suoja.1),
                (ranges.kaapeli.x1, layout.kaapeli.0),
                (ranges.kaapeli.x2, layout.kaapeli.1),
            ];
            for (pixel, fraction) in checks {
                let resolved_fraction = pixel as f32 / w;
                prop_assert!((resolved_fraction - fraction).abs() <= 0.6 / w);
            }
        }
    }
}
