//! # Panelscan Core - Panel Schedule Recognition Library
//!
//! Panelscan converts rasterized electrical panel-schedule pages into
//! structured row records: the circuit symbols drawn in each row together
//! with the row's text fields (description, protection rating, cable type).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! // Note: ScheduleExtractor is in panelscan-backend crate
//! use panelscan_backend::{ExtractorConfig, ScheduleExtractor};
//!
//! fn main() -> anyhow::Result<()> {
//!     let extractor = ScheduleExtractor::new(ExtractorConfig::default())?;
//!     let result = extractor.extract_file("panel.pdf");
//!
//!     println!("{}", result.to_json_pretty()?);
//!     println!("Rows: {}", result.total_rows);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline Stages
//!
//! - **Row segmentation**: horizontal ruling lines partition the page into
//!   row bands, adaptively or from a fixed reference grid
//! - **Symbol matching**: normalized cross-correlation of binarized symbol
//!   templates inside each band's symbol column
//! - **Conflict resolution**: best score per symbol, exclusive groups
//!   reduced to their strongest member
//! - **Text fields**: per-column crops recognized through a pluggable OCR
//!   seam (Tesseract adapter in panelscan-ocr)
//!
//! This crate is pure image processing; rasterization (pdfium) and OCR
//! (Tesseract) live behind seams in the backend and ocr crates.

// Core modules
pub mod classifier;
pub mod error;
pub mod geometry;
/// Binarization and cropping primitives shared by the pipeline stages.
pub mod imaging;
pub mod matcher;
pub mod observer;
pub mod pipeline;
pub mod record;
pub mod resolver;
pub mod segmenter;
pub mod template;
pub mod textfield;

// Re-exports for convenience
pub use classifier::*;
pub use error::*;
pub use geometry::*;
pub use matcher::*;
pub use observer::*;
pub use pipeline::*;
pub use record::*;
pub use resolver::*;
pub use segmenter::*;
pub use template::*;
pub use textfield::*;
