//! Error types for schedule extraction operations.
//!
//! Extraction follows a two-level failure model: document-level faults
//! (nothing rasterizable, engine unavailable) surface as [`PanelscanError`],
//! while cell-level faults (one OCR call failing, one degenerate crop) are
//! absorbed into empty values and never abort a page.

use thiserror::Error;

/// Error types that can occur while building or running the extraction
/// pipeline.
///
/// # Examples
///
/// ```
/// use panelscan_core::{PanelscanError, Result};
///
/// fn load_mask(path: &str) -> Result<image::DynamicImage> {
///     let img = image::open(path)?;
///     Ok(img)
/// }
///
/// match load_mask("missing.png") {
///     Err(PanelscanError::Image(e)) => eprintln!("decode failed: {e}"),
///     Err(e) => eprintln!("other error: {e}"),
///     Ok(_) => {}
/// }
/// ```
#[derive(Error, Debug)]
pub enum PanelscanError {
    /// File I/O error, e.g. an unreadable template directory entry.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decode or encode error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// JSON serialization error when emitting an extraction result.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Rasterizer collaborator failure: the document produced no page
    /// images. The pipeline converts this into the terminal error result
    /// rather than surfacing it to result consumers.
    #[error("rasterization error: {0}")]
    Raster(String),

    /// OCR collaborator failure. Local to one text cell; the text-field
    /// extractor absorbs it into an empty string.
    #[error("OCR error: {0}")]
    Ocr(String),

    /// Invalid configuration, e.g. a zero match threshold or an unusable
    /// engine setting detected at construction time.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Type alias for [`Result<T, PanelscanError>`].
///
/// ```
/// use panelscan_core::Result;
///
/// fn parse_count(s: &str) -> Result<usize> {
///     s.trim()
///         .parse()
///         .map_err(|e| panelscan_core::PanelscanError::Config(format!("bad count: {e}")))
/// }
///
/// assert!(parse_count("3").is_ok());
/// assert!(parse_count("three").is_err());
/// ```
pub type Result<T> = std::result::Result<T, PanelscanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_error_display() {
        let error = PanelscanError::Raster("no pages decoded".to_string());
        let display = format!("{error}");
        assert_eq!(display, "rasterization error: no pages decoded");
    }

    #[test]
    fn test_ocr_error_display() {
        let error = PanelscanError::Ocr("engine init failed".to_string());
        let display = format!("{error}");
        assert!(display.starts_with("OCR error:"));
        assert!(display.contains("engine init failed"));
    }

    #[test]
    fn test_config_error_display() {
        let error = PanelscanError::Config("match threshold must be positive".to_string());
        assert_eq!(
            format!("{error}"),
            "configuration error: match threshold must be positive"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PanelscanError = io_err.into();

        match err {
            PanelscanError::Io(e) => {
                assert_eq!(e.kind(), std::io::ErrorKind::NotFound);
                assert!(e.to_string().contains("file not found"));
            }
            _ => panic!("Expected Io variant"),
        }
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let err: PanelscanError = json_err.into();

        match err {
            PanelscanError::Json(e) => assert!(!e.to_string().is_empty()),
            _ => panic!("Expected Json variant"),
        }
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn inner() -> Result<()> {
            Err(PanelscanError::Raster("corrupt header".to_string()))
        }

        fn outer() -> Result<()> {
            inner()?;
            Ok(())
        }

        match outer() {
            Err(PanelscanError::Raster(msg)) => assert_eq!(msg, "corrupt header"),
            _ => panic!("Expected Raster error to propagate"),
        }
    }

    #[test]
    fn test_error_debug_format() {
        let error = PanelscanError::Ocr("test error".to_string());
        let debug = format!("{error:?}");
        assert!(debug.contains("Ocr"));
        assert!(debug.contains("test error"));
    }

    #[test]
    fn test_error_size() {
        use std::mem::size_of;
        let size = size_of::<PanelscanError>();

        // Errors should stay small; box large variants if this trips.
        assert!(
            size < 256,
            "PanelscanError size is {size} bytes, consider boxing large variants"
        );
    }
}
