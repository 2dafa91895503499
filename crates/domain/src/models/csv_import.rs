//! CSV import result models.

use serde::Serialize;

/// Maximum accepted upload size for a CSV import (5 MB).
pub const MAX_IMPORT_FILE_BYTES: usize = 5 * 1024 * 1024;

/// Number of row error messages surfaced in the summary header.
pub const MAX_ERROR_MESSAGES: usize = 10;

/// Error recorded for a single rejected row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportRowError {
    /// 1-based file row number; the header row is row 1.
    pub row: usize,
    pub message: String,
}

impl ImportRowError {
    pub fn new(row: usize, message: impl Into<String>) -> Self {
        Self {
            row,
            message: message.into(),
        }
    }
}

/// Summary of a completed best-effort import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    /// Number of data rows in the file (excluding the header).
    pub total_rows: usize,
    pub imported: usize,
    /// Blank rows silently skipped.
    pub skipped: usize,
    pub error_count: usize,
    /// First few error messages for display.
    pub error_messages: Vec<String>,
    /// Full per-row error list.
    pub row_errors: Vec<ImportRowError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_summary_serializes() {
        let summary = ImportSummary {
            total_rows: 5,
            imported: 3,
            skipped: 1,
            error_count: 1,
            error_messages: vec!["Row 4: Client name is required".to_string()],
            row_errors: vec![ImportRowError::new(4, "Client name is required")],
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["imported"], 3);
        assert_eq!(json["row_errors"][0]["row"], 4);
    }
}
