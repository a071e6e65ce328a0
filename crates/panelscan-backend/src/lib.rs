//! # Panelscan Backend - Document-Level Extraction
//!
//! Wires the panelscan-core pipeline to real engines: pdfium for PDF
//! rasterization and Tesseract (via panelscan-ocr) for text recognition.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use panelscan_backend::{ExtractorConfig, ScheduleExtractor};
//!
//! fn main() -> anyhow::Result<()> {
//!     let extractor = ScheduleExtractor::new(ExtractorConfig::default())?;
//!     let result = extractor.extract_file("panel.pdf");
//!
//!     println!("{}", result.to_json_pretty()?);
//!     Ok(())
//! }
//! ```
//!
//! Construction binds the pdfium shared library and probes the Tesseract
//! language data; both report typed errors when missing. Extraction itself
//! never fails: an unreadable document yields the error-status result.

pub mod extractor;
pub mod rasterizer;

// Re-exports for convenience
pub use extractor::*;
pub use rasterizer::*;
