//! Text-field extraction from row bands.
//!
//! Each row band carries three text columns: the free-text description
//! (kuvaus), the protection rating (suoja) and the cable type (kaapeli).
//! [`TextFieldExtractor`] crops each column span from the page, binarizes
//! the crop and hands it to a [`TextRecognizer`] implementation. The OCR
//! engine itself lives behind the trait so the core stays free of native
//! dependencies.

use image::GrayImage;

use crate::error::Result;
use crate::geometry::{ColumnRanges, ColumnSpan};
use crate::imaging::{binarize, crop_region};
use crate::segmenter::RowBand;

/// Character whitelist for the protection-rating column.
///
/// Ratings read like `C16` or `3/25`, so the recognizer is restricted to
/// digits, the slash and the letter C.
pub const SUOJA_WHITELIST: &str = "/0123456789C";

/// Per-field recognition settings passed through to the OCR engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecognizeOptions {
    /// Restrict recognition to these characters when set.
    pub whitelist: Option<String>,
    /// Treat the crop as a single line of text.
    pub single_line: bool,
}

/// Text recognition seam implemented by the OCR adapter.
pub trait TextRecognizer: Send + Sync {
    /// Recognizes text in a binarized single-field crop.
    fn recognize(&self, region: &GrayImage, options: &RecognizeOptions) -> Result<String>;
}

/// Recognition settings for the three text columns of a row.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldOptions {
    pub kuvaus: RecognizeOptions,
    pub suoja: RecognizeOptions,
    pub kaapeli: RecognizeOptions,
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            kuvaus: RecognizeOptions {
                whitelist: None,
                single_line: true,
            },
            suoja: RecognizeOptions {
                whitelist: Some(SUOJA_WHITELIST.to_string()),
                single_line: true,
            },
            kaapeli: RecognizeOptions {
                whitelist: None,
                single_line: true,
            },
        }
    }
}

/// Recognized text for one row, already trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextFields {
    pub kuvaus: String,
    pub suoja: String,
    pub kaapeli: String,
}

/// Crops and recognizes the text columns of a row band.
#[derive(Debug, Clone, Default)]
pub struct TextFieldExtractor {
    options: FieldOptions,
}

impl TextFieldExtractor {
    pub fn new(options: FieldOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FieldOptions {
        &self.options
    }

    /// Extracts all three text fields for one band.
    ///
    /// A field whose crop falls outside the page, or whose recognition
    /// fails, comes back as an empty string; one bad field never aborts
    /// the row.
    pub fn extract(
        &self,
        page: &GrayImage,
        band: &RowBand,
        columns: &ColumnRanges,
        ocr: &dyn TextRecognizer,
    ) -> TextFields {
        TextFields {
            kuvaus: self.field(page, band, columns.kuvaus, &self.options.kuvaus, "kuvaus", ocr),
            suoja: self.field(page, band, columns.suoja, &self.options.suoja, "suoja", ocr),
            kaapeli: self.field(page, band, columns.kaapeli, &self.options.kaapeli, "kaapeli", ocr),
        }
    }

    fn field(
        &self,
        page: &GrayImage,
        band: &RowBand,
        span: ColumnSpan,
        options: &RecognizeOptions,
        name: &str,
        ocr: &dyn TextRecognizer,
    ) -> String {
        let Some(crop) = crop_region(page, span.x1, band.y_top, span.x2, band.y_bottom) else {
            return String::new();
        };
        let mask = binarize(&crop);
        match ocr.recognize(&mask, options) {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                log::warn!("OCR failed for {name} field in row {}: {e}", band.index);
                String::new()
            }
        }
    }
}
