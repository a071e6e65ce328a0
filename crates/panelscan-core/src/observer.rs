//! Observation hooks into page classification.
//!
//! [`PageObserver`] lets callers watch the intermediate artifacts of a
//! classification pass without changing its behavior. The CLI uses it to
//! dump annotated debug images; tests use it to count what the classifier
//! actually did. Every hook has an empty default body, so implementors
//! override only what they need.

use image::GrayImage;

use crate::matcher::Detection;
use crate::segmenter::RowBand;

/// Receives intermediate artifacts during page classification.
pub trait PageObserver: Send + Sync {
    /// Called once per page after row segmentation.
    fn on_row_bands(&self, _page_number: usize, _page: &GrayImage, _bands: &[RowBand]) {}

    /// Called with the symbol-column crop of each row before matching.
    fn on_symbol_region(&self, _page_number: usize, _row_index: usize, _region: &GrayImage) {}

    /// Called with the raw detections of each row before conflict
    /// resolution.
    fn on_detections(
        &self,
        _page_number: usize,
        _row_index: usize,
        _region: &GrayImage,
        _detections: &[Detection],
    ) {
    }
}
