//! Page classification: bands to row records.
//!
//! [`PageClassifier`] ties the stages together for a single page. It
//! resolves the column layout at the page's width, segments the page into
//! row bands, matches symbol templates inside each band's symbol column,
//! resolves conflicts and recognizes the text fields. The output is one
//! [`PageRecord`] per page regardless of how many stages found anything.

use image::{DynamicImage, GrayImage};

use crate::geometry::{ColumnLayout, ColumnSpan};
use crate::imaging::crop_region;
use crate::matcher::{MatcherConfig, SymbolMatcher};
use crate::observer::PageObserver;
use crate::record::{PageRecord, RowRecord};
use crate::resolver::{ConflictPolicy, ResolvedSymbolSet};
use crate::segmenter::{RowBand, RowSegmenter};
use crate::template::TemplateLibrary;
use crate::textfield::{FieldOptions, TextFieldExtractor, TextRecognizer};

/// Rows hug their ruling lines, so the symbol strip is inset from the band
/// edges before matching. Values are in pixels at the reference resolution.
pub const SYMBOL_MARGIN_TOP: u32 = 4;
pub const SYMBOL_MARGIN_BOTTOM: u32 = 2;

/// Which bands become row records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowPolicy {
    /// Every band becomes a row, with or without symbols.
    #[default]
    AllBands,
    /// Bands without a confirmed symbol are dropped before OCR runs.
    SymbolRowsOnly,
}

/// Complete configuration of a classification pass.
#[derive(Debug, Clone, Default)]
pub struct ClassifierConfig {
    pub columns: ColumnLayout,
    pub segmenter: RowSegmenter,
    pub matcher: MatcherConfig,
    pub conflicts: ConflictPolicy,
    pub fields: FieldOptions,
    pub row_policy: RowPolicy,
}

/// Classifies one rasterized page into a [`PageRecord`].
pub struct PageClassifier {
    config: ClassifierConfig,
    matcher: SymbolMatcher,
    fields: TextFieldExtractor,
    observer: Option<Box<dyn PageObserver>>,
}

impl PageClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        let matcher = SymbolMatcher::new(config.matcher);
        let fields = TextFieldExtractor::new(config.fields.clone());
        Self {
            config,
            matcher,
            fields,
            observer: None,
        }
    }

    /// Attaches an observer that receives intermediate artifacts.
    #[must_use]
    pub fn with_observer(mut self, observer: Box<dyn PageObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Runs the full pipeline on one page.
    ///
    /// `page_number` is 1-based and only used for records and observer
    /// callbacks.
    pub fn classify_page(
        &self,
        page_number: usize,
        image: &DynamicImage,
        templates: &TemplateLibrary,
        ocr: &dyn TextRecognizer,
    ) -> PageRecord {
        let page = image.to_luma8();
        let columns = self.config.columns.resolve(page.width());
        let bands = self.config.segmenter.segment(&page);
        if let Some(observer) = &self.observer {
            observer.on_row_bands(page_number, &page, &bands);
        }

        let mut rows = Vec::with_capacity(bands.len());
        for band in &bands {
            let symbols = self.row_symbols(page_number, &page, band, columns.symbol, templates);
            if self.config.row_policy == RowPolicy::SymbolRowsOnly && symbols.is_empty() {
                continue;
            }
            let fields = self.fields.extract(&page, band, &columns, ocr);
            rows.push(RowRecord {
                row_index: band.index,
                y_top: band.y_top,
                y_bottom: band.y_bottom,
                symbols,
                kuvaus: fields.kuvaus,
                suoja: fields.suoja,
                kaapeli: fields.kaapeli,
            });
        }

        log::debug!(
            "page {page_number}: {} band(s), {} row record(s)",
            bands.len(),
            rows.len()
        );
        PageRecord { page_number, rows }
    }

    /// Matches templates in the symbol column of one band and resolves the
    /// detections into the final symbol set.
    fn row_symbols(
        &self,
        page_number: usize,
        page: &GrayImage,
        band: &RowBand,
        span: ColumnSpan,
        templates: &TemplateLibrary,
    ) -> ResolvedSymbolSet {
        let y_top = band.y_top + SYMBOL_MARGIN_TOP;
        let y_bottom = band.y_bottom.saturating_sub(SYMBOL_MARGIN_BOTTOM);
        let Some(region) = crop_region(page, span.x1, y_top, span.x2, y_bottom) else {
            return ResolvedSymbolSet::new();
        };

        if let Some(observer) = &self.observer {
            observer.on_symbol_region(page_number, band.index, &region);
        }
        let detections = self.matcher.match_region(&region, templates);
        if let Some(observer) = &self.observer {
            observer.on_detections(page_number, band.index, &region, &detections);
        }

        let mut symbols = self.config.conflicts.resolve(&detections);
        for score in symbols.values_mut() {
            *score = round3(*score);
        }
        symbols
    }
}

/// Confidence scores are reported with three decimals.
fn round3(score: f32) -> f32 {
    (score * 1000.0).round() / 1000.0
}
