//! XLSX encoder
//!
//! One worksheet, header row bold, durations written as text so values
//! above 24 hours keep the same HH:MM:SS rendering as every other format.

use chrono::Duration;
use rust_xlsxwriter::{Format, Workbook};
use timed_core::format_duration;
use timed_models::ReportExportRow;

use crate::{ExportError, HEADERS};

pub(crate) fn write_xlsx(rows: &[ReportExportRow]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name("reports")?;

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_with_format(0, col as u16, *header, &bold)?;
    }

    for (idx, row) in rows.iter().enumerate() {
        let r = (idx + 1) as u32;
        worksheet.write(r, 0, row.user.as_str())?;
        worksheet.write(r, 1, row.customer.as_str())?;
        worksheet.write(r, 2, row.project.as_str())?;
        worksheet.write(r, 3, row.task.as_str())?;
        worksheet.write(r, 4, row.date.format("%Y-%m-%d").to_string())?;
        worksheet.write(r, 5, format_duration(Duration::seconds(row.duration_secs)))?;
        worksheet.write(r, 6, row.comment.as_str())?;
    }

    Ok(workbook.save_to_buffer()?)
}
