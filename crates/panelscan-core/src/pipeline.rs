//! Document-level extraction over already rasterized pages.

use image::DynamicImage;

use crate::classifier::PageClassifier;
use crate::record::ExtractionResult;
use crate::template::TemplateLibrary;
use crate::textfield::TextRecognizer;

/// Runs a [`PageClassifier`] over every page of a document and assembles
/// the [`ExtractionResult`].
pub struct ExtractionPipeline {
    classifier: PageClassifier,
}

impl ExtractionPipeline {
    pub fn new(classifier: PageClassifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &PageClassifier {
        &self.classifier
    }

    /// Classifies all pages in order. Page numbers start at 1.
    pub fn run(
        &self,
        filename: &str,
        pages: &[DynamicImage],
        templates: &TemplateLibrary,
        ocr: &dyn TextRecognizer,
    ) -> ExtractionResult {
        log::debug!("extracting {filename}: {} page(s)", pages.len());
        let records = pages
            .iter()
            .enumerate()
            .map(|(i, page)| self.classifier.classify_page(i + 1, page, templates, ocr))
            .collect();
        ExtractionResult::success(filename, records)
    }
}
