//! Tesseract OCR adapter for panelscan
//!
//! Implements the [`TextRecognizer`] seam from panelscan-core on top of
//! Tesseract 5.x via leptess. Field crops arrive already binarized; this
//! crate only configures the engine per field (segmentation mode, optional
//! character whitelist) and hands back the raw recognized text.
//!
//! A fresh `LepTess` instance is created per recognition call. Engine
//! handles are cheap next to the recognition itself, they are not `Sync`,
//! and per-call instances keep whitelist settings from leaking between
//! fields.

use std::io::Cursor;
use std::path::PathBuf;

use image::{DynamicImage, GrayImage, ImageFormat};
use leptess::{LepTess, Variable};
use panelscan_core::{PanelscanError, RecognizeOptions, TextRecognizer};
use thiserror::Error;

/// Configuration for the Tesseract engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrConfig {
    /// Tesseract language codes (e.g., "eng", "fin+eng").
    pub language: String,
    /// Override for the tessdata directory. `None` uses the system default.
    pub datapath: Option<PathBuf>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            datapath: None,
        }
    }
}

impl OcrConfig {
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    #[must_use]
    pub fn with_datapath(mut self, datapath: impl Into<PathBuf>) -> Self {
        self.datapath = Some(datapath.into());
        self
    }
}

/// Errors raised while driving Tesseract.
#[derive(Error, Debug)]
pub enum OcrError {
    #[error("failed to initialize Tesseract: {0}")]
    Init(String),

    #[error("failed to run OCR: {0}")]
    Recognition(String),
}

impl From<OcrError> for PanelscanError {
    fn from(e: OcrError) -> Self {
        PanelscanError::Ocr(e.to_string())
    }
}

/// [`TextRecognizer`] backed by Tesseract.
pub struct TesseractRecognizer {
    config: OcrConfig,
}

impl TesseractRecognizer {
    /// Creates the recognizer, verifying that Tesseract can initialize
    /// with the configured language.
    pub fn new(config: OcrConfig) -> Result<Self, OcrError> {
        let recognizer = Self { config };
        let _probe = recognizer.engine()?;
        Ok(recognizer)
    }

    pub fn config(&self) -> &OcrConfig {
        &self.config
    }

    fn engine(&self) -> Result<LepTess, OcrError> {
        let datapath = self
            .config
            .datapath
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned());
        LepTess::new(datapath.as_deref(), &self.config.language).map_err(|e| {
            OcrError::Init(format!(
                "language '{}' unavailable: {e}. Install the Tesseract \
                 language data (e.g. tesseract-ocr-eng)",
                self.config.language
            ))
        })
    }
}

/// Single line for field crops, automatic segmentation otherwise.
fn page_seg_mode(options: &RecognizeOptions) -> &'static str {
    if options.single_line {
        "7"
    } else {
        "3"
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(
        &self,
        region: &GrayImage,
        options: &RecognizeOptions,
    ) -> panelscan_core::Result<String> {
        let mut engine = self.engine()?;

        engine
            .set_variable(Variable::TesseditPagesegMode, page_seg_mode(options))
            .map_err(|e| OcrError::Init(format!("failed to set segmentation mode: {e}")))?;
        if let Some(whitelist) = &options.whitelist {
            engine
                .set_variable(Variable::TesseditCharWhitelist, whitelist)
                .map_err(|e| OcrError::Init(format!("failed to set whitelist: {e}")))?;
        }

        // leptess expects encoded image data, so round the crop through PNG.
        let mut png_buf = Cursor::new(Vec::new());
        DynamicImage::ImageLuma8(region.clone())
            .write_to(&mut png_buf, ImageFormat::Png)
            .map_err(|e| OcrError::Recognition(format!("failed to encode crop: {e}")))?;
        engine
            .set_image_from_mem(png_buf.get_ref())
            .map_err(|e| OcrError::Recognition(format!("failed to load crop: {e}")))?;

        let text = engine
            .get_utf8_text()
            .map_err(|e| OcrError::Recognition(format!("recognition failed: {e}")))?;
        log::trace!(
            "recognized {} char(s) from a {}x{} crop",
            text.trim().len(),
            region.width(),
            region.height()
        );
        Ok(text)
    }
}
