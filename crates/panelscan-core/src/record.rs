//! Output records produced by an extraction run.
//!
//! The JSON shape is part of the public contract: downstream tooling keys
//! on the field names emitted here, including the Finnish column names
//! `kuvaus`, `suoja` and `kaapeli`.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::resolver::ResolvedSymbolSet;

/// Outcome of a document-level extraction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStatus {
    Success,
    Error,
}

/// One schedule row: its band position, recognized symbols and text fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowRecord {
    /// 1-based row index within the page.
    pub row_index: usize,
    pub y_top: u32,
    pub y_bottom: u32,
    /// Confirmed symbols with their confidence scores.
    pub symbols: ResolvedSymbolSet,
    /// Circuit description.
    pub kuvaus: String,
    /// Protection rating.
    pub suoja: String,
    /// Cable type.
    pub kaapeli: String,
}

/// All rows recognized on one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    /// 1-based page number within the document.
    pub page_number: usize,
    pub rows: Vec<RowRecord>,
}

impl PageRecord {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Document-level result with per-page rows and summary totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub status: ExtractionStatus,
    pub filename: String,
    pub total_pages: usize,
    pub total_rows: usize,
    pub pages: Vec<PageRecord>,
}

impl ExtractionResult {
    /// Builds a successful result, deriving the totals from `pages`.
    pub fn success(filename: impl Into<String>, pages: Vec<PageRecord>) -> Self {
        let total_rows = pages.iter().map(PageRecord::row_count).sum();
        Self {
            status: ExtractionStatus::Success,
            filename: filename.into(),
            total_pages: pages.len(),
            total_rows,
            pages,
        }
    }

    /// Builds the terminal error result for a document that could not be
    /// processed at all.
    pub fn error(filename: impl Into<String>) -> Self {
        Self {
            status: ExtractionStatus::Error,
            filename: filename.into(),
            total_pages: 0,
            total_rows: 0,
            pages: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ExtractionStatus::Success
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn sample_row() -> RowRecord {
        let mut symbols = BTreeMap::new();
        symbols.insert("basic1line".to_string(), 0.92);
        RowRecord {
            row_index: 1,
            y_top: 302,
            y_bottom: 500,
            symbols,
            kuvaus: "Valaistus".to_string(),
            suoja: "C16".to_string(),
            kaapeli: "MMJ 3x1.5S".to_string(),
        }
    }

    #[test]
    fn test_success_totals() {
        let result = ExtractionResult::success(
            "panel.pdf",
            vec![
                PageRecord {
                    page_number: 1,
                    rows: vec![sample_row(), sample_row()],
                },
                PageRecord {
                    page_number: 2,
                    rows: vec![sample_row()],
                },
            ],
        );

        assert!(result.is_success());
        assert_eq!(result.total_pages, 2);
        assert_eq!(result.total_rows, 3);
    }

    #[test]
    fn test_error_result_shape() {
        let result = ExtractionResult::error("broken.pdf");

        assert!(!result.is_success());
        assert_eq!(result.filename, "broken.pdf");
        assert_eq!(result.total_pages, 0);
        assert_eq!(result.total_rows, 0);
        assert!(result.pages.is_empty());
    }

    #[test]
    fn test_json_field_names() {
        let result = ExtractionResult::success(
            "panel.pdf",
            vec![PageRecord {
                page_number: 1,
                rows: vec![sample_row()],
            }],
        );
        let json = result.to_json().unwrap();

        assert!(json.contains("\"status\":\"success\""));
        assert!(json.contains("\"filename\":\"panel.pdf\""));
        assert!(json.contains("\"total_pages\":1"));
        assert!(json.contains("\"total_rows\":1"));
        assert!(json.contains("\"page_number\":1"));
        assert!(json.contains("\"row_index\":1"));
        assert!(json.contains("\"kuvaus\":\"Valaistus\""));
        assert!(json.contains("\"suoja\":\"C16\""));
        assert!(json.contains("\"kaapeli\":\"MMJ 3x1.5S\""));
        assert!(json.contains("\"basic1line\":0.92"));
    }

    #[test]
    fn test_error_status_serializes_lowercase() {
        let json = ExtractionResult::error("x.pdf").to_json().unwrap();
        assert!(json.contains("\"status\":\"error\""));
    }

    #[test]
    fn test_round_trip() {
        let result = ExtractionResult::success(
            "panel.pdf",
            vec![PageRecord {
                page_number: 1,
                rows: vec![sample_row()],
            }],
        );
        let json = result.to_json_pretty().unwrap();
        let back: ExtractionResult = serde_json::from_str(&json).unwrap();

        assert_eq!(back, result);
    }
}
