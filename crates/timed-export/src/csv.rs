//! CSV encoder

use chrono::Duration;
use csv::WriterBuilder;
use timed_core::format_duration;
use timed_models::ReportExportRow;

use crate::{ExportError, HEADERS};

pub(crate) fn write_csv(rows: &[ReportExportRow]) -> Result<Vec<u8>, ExportError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(HEADERS)?;

    for row in rows {
        writer.write_record([
            row.user.as_str(),
            row.customer.as_str(),
            row.project.as_str(),
            row.task.as_str(),
            &row.date.format("%Y-%m-%d").to_string(),
            &format_duration(Duration::seconds(row.duration_secs)),
            row.comment.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))
}
