//! # timed-export
//!
//! Tabular file encoders for report exports. The engine hands an ordered
//! row set to one of these writers; everything about bytes, headers, and
//! container formats lives here. Format selection is validated before any
//! row is materialized, upstream of this crate.

mod csv;
mod ods;
mod xlsx;

use thiserror::Error;
use timed_models::ReportExportRow;

/// Column headers shared by every encoder.
pub(crate) const HEADERS: [&str; 7] = [
    "user", "customer", "project", "task", "date", "duration", "comment",
];

/// Supported tabular encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Ods,
}

impl ExportFormat {
    /// Parse a `file_type` request parameter. Unknown values yield `None`
    /// and must be rejected by the caller before rows are fetched.
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "csv" => Some(Self::Csv),
            "xlsx" => Some(Self::Xlsx),
            "ods" => Some(Self::Ods),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
            Self::Ods => "ods",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            Self::Ods => "application/vnd.oasis.opendocument.spreadsheet",
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv encoding failed: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("xlsx encoding failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("ods encoding failed: {0}")]
    Zip(#[from] ::zip::result::ZipError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Encode the rows (plus a header row) into the requested format.
pub fn render(format: ExportFormat, rows: &[ReportExportRow]) -> Result<Vec<u8>, ExportError> {
    match format {
        ExportFormat::Csv => csv::write_csv(rows),
        ExportFormat::Xlsx => xlsx::write_xlsx(rows),
        ExportFormat::Ods => ods::write_ods(rows),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!(ExportFormat::from_param("csv"), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::from_param("xlsx"), Some(ExportFormat::Xlsx));
        assert_eq!(ExportFormat::from_param("ods"), Some(ExportFormat::Ods));
        assert_eq!(ExportFormat::from_param("pdf"), None);
        assert_eq!(ExportFormat::from_param(""), None);
    }

    #[test]
    fn test_render_dispatches_all_formats() {
        let rows = testing::rows();
        for format in [ExportFormat::Csv, ExportFormat::Xlsx, ExportFormat::Ods] {
            let bytes = render(format, &rows).unwrap();
            assert!(!bytes.is_empty());
        }
    }
}
