//! Row-band segmentation.
//!
//! Two interchangeable strategies split a page into table rows. The adaptive
//! strategy finds the printed ruling lines from a horizontal ink projection;
//! the fixed strategy scales a known band list when the row count of the
//! document is contractually fixed.

use image::GrayImage;

use crate::imaging;

/// Page height of the reference schedule template, in pixels.
pub const REF_PAGE_HEIGHT: f32 = 2480.0;

/// The eleven data-row bands of the reference template, header excluded.
/// 189 px row pitch with 2 px rule gaps, measured at [`REF_PAGE_HEIGHT`].
pub const REFERENCE_ROW_BANDS: [(u32, u32); 11] = [
    (332, 521),
    (523, 712),
    (714, 903),
    (905, 1094),
    (1096, 1285),
    (1287, 1476),
    (1478, 1667),
    (1669, 1858),
    (1860, 2049),
    (2051, 2240),
    (2242, 2431),
];

/// One table row's vertical extent, pixel rows `y_top..y_bottom`.
///
/// Indices are 1-based in top-to-bottom reading order and never include the
/// table header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBand {
    pub index: usize,
    pub y_top: u32,
    pub y_bottom: u32,
}

impl RowBand {
    /// Band height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.y_bottom.saturating_sub(self.y_top)
    }
}

/// Ruling-line based segmentation.
///
/// Scanlines whose normalized ink sum exceeds `line_threshold` are ruling
/// lines; the bands between adjacent lines become rows. The first surviving
/// band is the table header and is dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveSegmenter {
    /// Normalized row-ink cutoff for calling a scanline a ruling line.
    pub line_threshold: f32,
    /// Lines this close to the top or bottom edge are page-frame artifacts.
    pub border_margin: u32,
    /// Bands at most this tall are rule bleed, not rows.
    pub min_band_height: u32,
}

impl Default for AdaptiveSegmenter {
    fn default() -> Self {
        Self {
            line_threshold: 0.4,
            border_margin: 50,
            min_band_height: 15,
        }
    }
}

impl AdaptiveSegmenter {
    /// Detect ruling line positions (run midpoints), border lines excluded.
    #[must_use]
    pub fn detect_ruling_lines(&self, page: &GrayImage) -> Vec<u32> {
        let height = page.height();
        if page.width() == 0 || height == 0 {
            return Vec::new();
        }

        let ink = imaging::binarize_inverted(page);
        let mut sums = vec![0u32; height as usize];
        for (_, y, pixel) in ink.enumerate_pixels() {
            if pixel[0] > 0 {
                sums[y as usize] += 1;
            }
        }
        let max = sums.iter().copied().max().unwrap_or(0);
        if max == 0 {
            return Vec::new();
        }
        let cutoff = self.line_threshold * max as f32;

        // Collapse each run of marked scanlines to its midpoint.
        let mut lines = Vec::new();
        let mut run_start: Option<usize> = None;
        for y in 0..sums.len() + 1 {
            let marked = y < sums.len() && sums[y] as f32 > cutoff;
            match (marked, run_start) {
                (true, None) => run_start = Some(y),
                (false, Some(start)) => {
                    lines.push(((start + y - 1) / 2) as u32);
                    run_start = None;
                }
                _ => {}
            }
        }

        lines.retain(|&y| y > self.border_margin && y + self.border_margin < height);
        lines
    }

    /// Segment a page into data-row bands (header dropped, indices from 1).
    #[must_use]
    pub fn segment(&self, page: &GrayImage) -> Vec<RowBand> {
        let lines = self.detect_ruling_lines(page);

        let mut bands: Vec<(u32, u32)> = lines
            .windows(2)
            .map(|pair| (pair[0] + 1, pair[1].saturating_sub(1)))
            .filter(|&(top, bottom)| bottom > top && bottom - top > self.min_band_height)
            .collect();

        // First surviving band is the column-header row.
        if !bands.is_empty() {
            bands.remove(0);
        }

        bands
            .into_iter()
            .enumerate()
            .map(|(i, (y_top, y_bottom))| RowBand {
                index: i + 1,
                y_top,
                y_bottom,
            })
            .collect()
    }
}

/// Fixed proportional segmentation for documents with a contractual row
/// count: the reference band list scaled by `actual_height / reference_height`.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedBandSegmenter {
    pub reference_height: f32,
    pub reference_bands: Vec<(u32, u32)>,
}

impl Default for FixedBandSegmenter {
    fn default() -> Self {
        Self {
            reference_height: REF_PAGE_HEIGHT,
            reference_bands: REFERENCE_ROW_BANDS.to_vec(),
        }
    }
}

impl FixedBandSegmenter {
    /// Scale the reference bands to the page height.
    #[must_use]
    pub fn segment(&self, page: &GrayImage) -> Vec<RowBand> {
        let height = page.height();
        if height == 0 || self.reference_height <= 0.0 {
            return Vec::new();
        }
        let scale = height as f32 / self.reference_height;

        self.reference_bands
            .iter()
            .enumerate()
            .filter_map(|(i, &(top, bottom))| {
                let y_top = (top as f32 * scale).round() as u32;
                let y_bottom = ((bottom as f32 * scale).round() as u32).min(height);
                (y_bottom > y_top).then_some(RowBand {
                    index: i + 1,
                    y_top,
                    y_bottom,
                })
            })
            .collect()
    }
}

/// Row segmentation strategy selector.
#[derive(Debug, Clone, PartialEq)]
pub enum RowSegmenter {
    Adaptive(AdaptiveSegmenter),
    Fixed(FixedBandSegmenter),
}

impl Default for RowSegmenter {
    fn default() -> Self {
        Self::Adaptive(AdaptiveSegmenter::default())
    }
}

impl RowSegmenter {
    /// Partition a page into row bands with the selected strategy.
    #[must_use]
    pub fn segment(&self, page: &GrayImage) -> Vec<RowBand> {
        match self {
            Self::Adaptive(s) => s.segment(page),
            Self::Fixed(s) => s.segment(page),
        }
    }
}
