//! End-to-end schedule extraction: PDF in, row records out.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use panelscan_core::{
    ClassifierConfig, ConflictPolicy, ExtractionPipeline, ExtractionResult, PageClassifier,
    PageObserver, Result, TemplateLibrary,
};
use panelscan_ocr::{OcrConfig, TesseractRecognizer};

use crate::rasterizer::{PdfRasterizer, RasterConfig};

/// Template images are loaded from this directory unless overridden.
pub const DEFAULT_TEMPLATE_DIR: &str = "templates";

/// Breaker glyphs drawn in the same cell: a row carries either the
/// one-line or the three-line variant, never both.
pub const DEFAULT_EXCLUSIVE_GROUPS: [[&str; 2]; 1] = [["basic1line", "basic3line"]];

/// Configuration for a [`ScheduleExtractor`].
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Directory of symbol template images, one file per symbol.
    pub template_dir: PathBuf,
    pub classifier: ClassifierConfig,
    pub raster: RasterConfig,
    pub ocr: OcrConfig,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        let mut conflicts = ConflictPolicy::default();
        for group in DEFAULT_EXCLUSIVE_GROUPS {
            conflicts = conflicts.with_exclusive_group(group);
        }
        Self {
            template_dir: PathBuf::from(DEFAULT_TEMPLATE_DIR),
            classifier: ClassifierConfig {
                conflicts,
                ..ClassifierConfig::default()
            },
            raster: RasterConfig::default(),
            ocr: OcrConfig::default(),
        }
    }
}

impl ExtractorConfig {
    #[must_use]
    pub fn with_template_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.template_dir = dir.into();
        self
    }
}

/// Extracts panel-schedule rows from PDF documents.
///
/// Owns the pdfium binding, the Tesseract adapter and the classification
/// pipeline. The template library is loaded lazily on the first extraction,
/// so a misconfigured template directory surfaces as warnings and empty
/// symbol sets rather than a construction failure.
pub struct ScheduleExtractor {
    rasterizer: PdfRasterizer,
    pipeline: ExtractionPipeline,
    ocr: TesseractRecognizer,
    template_dir: PathBuf,
    templates: OnceLock<TemplateLibrary>,
}

impl ScheduleExtractor {
    /// Creates the extractor, binding pdfium and probing Tesseract.
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        Self::build(config, None)
    }

    /// Creates the extractor with an observer attached to the classifier.
    pub fn with_observer(config: ExtractorConfig, observer: Box<dyn PageObserver>) -> Result<Self> {
        Self::build(config, Some(observer))
    }

    fn build(config: ExtractorConfig, observer: Option<Box<dyn PageObserver>>) -> Result<Self> {
        let rasterizer = PdfRasterizer::new(config.raster.clone())?;
        let ocr = TesseractRecognizer::new(config.ocr.clone())?;
        let mut classifier = PageClassifier::new(config.classifier.clone());
        if let Some(observer) = observer {
            classifier = classifier.with_observer(observer);
        }
        Ok(Self {
            rasterizer,
            pipeline: ExtractionPipeline::new(classifier),
            ocr,
            template_dir: config.template_dir,
            templates: OnceLock::new(),
        })
    }

    /// Extracts all rows from a PDF file.
    ///
    /// A document that cannot be loaded or rendered yields the error
    /// result rather than an `Err`; per-row problems are already absorbed
    /// into empty fields further down the pipeline.
    pub fn extract_file(&self, path: impl AsRef<Path>) -> ExtractionResult {
        let path = path.as_ref();
        let filename = path.file_name().map_or_else(
            || path.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        );
        match self.rasterizer.rasterize_file(path) {
            Ok(pages) => self.pipeline.run(&filename, &pages, self.templates(), &self.ocr),
            Err(e) => {
                log::error!("failed to rasterize {}: {e}", path.display());
                ExtractionResult::error(filename)
            }
        }
    }

    /// Extracts all rows from an in-memory PDF.
    pub fn extract_bytes(&self, filename: &str, bytes: &[u8]) -> ExtractionResult {
        match self.rasterizer.rasterize_bytes(bytes) {
            Ok(pages) => self.pipeline.run(filename, &pages, self.templates(), &self.ocr),
            Err(e) => {
                log::error!("failed to rasterize {filename}: {e}");
                ExtractionResult::error(filename)
            }
        }
    }

    /// The lazily loaded template library.
    pub fn templates(&self) -> &TemplateLibrary {
        self.templates
            .get_or_init(|| TemplateLibrary::load(&self.template_dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Skips end-to-end tests when pdfium or Tesseract is missing.
    fn extractor() -> Option<ScheduleExtractor> {
        match ScheduleExtractor::new(ExtractorConfig::default()) {
            Ok(e) => Some(e),
            Err(e) => {
                eprintln!("skipping: engine unavailable ({e})");
                None
            }
        }
    }

    #[test]
    fn test_default_config_wiring() {
        let config = ExtractorConfig::default();
        assert_eq!(config.template_dir, PathBuf::from("templates"));
        assert_eq!(
            config.classifier.conflicts.exclusive_groups,
            vec![vec!["basic1line".to_string(), "basic3line".to_string()]]
        );
        assert_eq!(config.raster.dpi, 300.0);
        assert_eq!(config.ocr.language, "eng");
    }

    #[test]
    fn test_template_dir_override() {
        let config = ExtractorConfig::default().with_template_dir("/tmp/symbols");
        assert_eq!(config.template_dir, PathBuf::from("/tmp/symbols"));
    }

    #[test]
    fn test_missing_file_yields_error_result() {
        let Some(extractor) = extractor() else {
            return;
        };
        let result = extractor.extract_file("no/such/panel.pdf");
        assert!(!result.is_success());
        assert_eq!(result.filename, "panel.pdf");
        assert_eq!(result.total_pages, 0);
    }

    #[test]
    fn test_garbage_bytes_yield_error_result() {
        let Some(extractor) = extractor() else {
            return;
        };
        let result = extractor.extract_bytes("upload.pdf", b"not a pdf");
        assert!(!result.is_success());
        assert_eq!(result.filename, "upload.pdf");
    }

    #[test]
    fn test_missing_template_dir_gives_empty_library() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = ExtractorConfig::default().with_template_dir(dir.path().join("missing"));
        let Ok(extractor) = ScheduleExtractor::new(config) else {
            eprintln!("skipping: engine unavailable");
            return;
        };
        assert!(extractor.templates().is_empty());
    }
}
