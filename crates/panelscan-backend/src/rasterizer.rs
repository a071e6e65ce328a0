//! PDF rasterization through pdfium.
//!
//! Pages are rendered at a fixed DPI so the reference column geometry
//! lands where the classifier expects it. The pdfium shared library is
//! resolved at construction time: system library first, then the working
//! directory, unless an explicit directory is configured.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use panelscan_core::{PanelscanError, Result};
use pdfium_render::prelude::*;

/// Default rendering resolution. 300 DPI puts an A4 portrait page at
/// roughly the reference width the column layout was calibrated on.
pub const DEFAULT_DPI: f32 = 300.0;

/// PDF points per inch.
const POINTS_PER_INCH: f32 = 72.0;

/// Configuration for page rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterConfig {
    /// Resolution for rendering PDF pages.
    pub dpi: f32,
    /// Directory holding the pdfium shared library. `None` tries the
    /// system library, then the working directory.
    pub pdfium_dir: Option<PathBuf>,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            pdfium_dir: None,
        }
    }
}

impl RasterConfig {
    #[must_use]
    pub fn with_dpi(mut self, dpi: f32) -> Self {
        self.dpi = dpi;
        self
    }

    #[must_use]
    pub fn with_pdfium_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.pdfium_dir = Some(dir.into());
        self
    }
}

/// Renders PDF documents to page images.
pub struct PdfRasterizer {
    pdfium: Pdfium,
    config: RasterConfig,
}

impl PdfRasterizer {
    pub fn new(config: RasterConfig) -> Result<Self> {
        let bindings = match &config.pdfium_dir {
            Some(dir) => {
                let dir = dir.to_string_lossy();
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir.as_ref()))
            }
            None => Pdfium::bind_to_system_library().or_else(|_| {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            }),
        }
        .map_err(|e| PanelscanError::Raster(format!("failed to bind pdfium library: {e}")))?;

        Ok(Self {
            pdfium: Pdfium::new(bindings),
            config,
        })
    }

    pub fn config(&self) -> &RasterConfig {
        &self.config
    }

    /// Renders every page of a PDF file at the configured DPI.
    pub fn rasterize_file(&self, path: impl AsRef<Path>) -> Result<Vec<DynamicImage>> {
        let path = path.as_ref();
        let document = self
            .pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| {
                PanelscanError::Raster(format!("failed to load {}: {e}", path.display()))
            })?;
        self.render_document(&document)
    }

    /// Renders every page of an in-memory PDF at the configured DPI.
    pub fn rasterize_bytes(&self, bytes: &[u8]) -> Result<Vec<DynamicImage>> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(|e| PanelscanError::Raster(format!("failed to parse PDF: {e}")))?;
        self.render_document(&document)
    }

    fn render_document(&self, document: &PdfDocument) -> Result<Vec<DynamicImage>> {
        let scale = self.config.dpi / POINTS_PER_INCH;
        let mut pages = Vec::with_capacity(document.pages().len() as usize);

        for (index, page) in document.pages().iter().enumerate() {
            let width = (page.width().value * scale) as i32;
            let height = (page.height().value * scale) as i32;

            let bitmap = page
                .render_with_config(
                    &PdfRenderConfig::new()
                        .set_target_width(width)
                        .set_target_height(height)
                        .render_form_data(true)
                        .render_annotations(true),
                )
                .map_err(|e| {
                    PanelscanError::Raster(format!("failed to render page {}: {e}", index + 1))
                })?;
            pages.push(bitmap.as_image());
        }

        log::debug!(
            "rasterized {} page(s) at {} dpi",
            pages.len(),
            self.config.dpi
        );
        Ok(pages)
    }
}
