//! ODS encoder
//!
//! Writes a minimal OpenDocument spreadsheet by hand: a zip container
//! whose first entry is the uncompressed `mimetype` marker, followed by
//! the manifest and a single-table `content.xml`. All cells are string
//! typed, mirroring the other encoders.

use std::io::{Cursor, Write};

use chrono::Duration;
use timed_core::format_duration;
use timed_models::ReportExportRow;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::{ExportError, HEADERS};

const MIMETYPE: &str = "application/vnd.oasis.opendocument.spreadsheet";

const MANIFEST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<manifest:manifest xmlns:manifest="urn:oasis:names:tc:opendocument:xmlns:manifest:1.0" manifest:version="1.2">
 <manifest:file-entry manifest:full-path="/" manifest:media-type="application/vnd.oasis.opendocument.spreadsheet"/>
 <manifest:file-entry manifest:full-path="content.xml" manifest:media-type="text/xml"/>
</manifest:manifest>
"#;

pub(crate) fn write_ods(rows: &[ReportExportRow]) -> Result<Vec<u8>, ExportError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    // The mimetype entry must come first and stay uncompressed, otherwise
    // consumers refuse to sniff the container as ODS.
    zip.start_file(
        "mimetype",
        FileOptions::default().compression_method(CompressionMethod::Stored),
    )?;
    zip.write_all(MIMETYPE.as_bytes())?;

    let deflated = FileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("META-INF/manifest.xml", deflated)?;
    zip.write_all(MANIFEST.as_bytes())?;

    zip.start_file("content.xml", deflated)?;
    zip.write_all(content_xml(rows).as_bytes())?;

    Ok(zip.finish()?.into_inner())
}

fn content_xml(rows: &[ReportExportRow]) -> String {
    let mut xml = String::with_capacity(1024 + rows.len() * 256);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push_str(
        r#"<office:document-content xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:table="urn:oasis:names:tc:opendocument:xmlns:table:1.0" xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0" office:version="1.2">"#,
    );
    xml.push_str(r#"<office:body><office:spreadsheet><table:table table:name="reports">"#);

    push_row(&mut xml, HEADERS.iter().copied());
    for row in rows {
        let cells = [
            row.user.clone(),
            row.customer.clone(),
            row.project.clone(),
            row.task.clone(),
            row.date.format("%Y-%m-%d").to_string(),
            format_duration(Duration::seconds(row.duration_secs)),
            row.comment.clone(),
        ];
        push_row(&mut xml, cells.iter().map(String::as_str));
    }

    xml.push_str("</table:table></office:spreadsheet></office:body></office:document-content>");
    xml
}

fn push_row<'a>(xml: &mut String, cells: impl Iterator<Item = &'a str>) {
    xml.push_str("<table:table-row>");
    for cell in cells {
        xml.push_str(r#"<table:table-cell office:value-type="string"><text:p>"#);
        xml.push_str(&escape(cell));
        xml.push_str("</text:p></table:table-cell>");
    }
    xml.push_str("</table:table-row>");
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;
    use crate::testing;

    #[test]
    fn test_mimetype_is_first_and_stored() {
        let bytes = write_ods(&testing::rows()).unwrap();
        assert!(bytes.starts_with(b"PK"));

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let first = archive.by_index(0).unwrap();
        assert_eq!(first.name(), "mimetype");
        assert_eq!(first.compression(), CompressionMethod::Stored);
    }

    #[test]
    fn test_content_lists_header_and_rows() {
        let rows = testing::rows();
        let bytes = write_ods(&rows).unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut content = String::new();
        archive
            .by_name("content.xml")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();

        let row_count = content.matches("<table:table-row>").count();
        assert_eq!(row_count, rows.len() + 1);
        assert!(content.contains("Jane Doe"));
        assert!(content.contains("01:00:00"));
    }

    #[test]
    fn test_markup_in_comments_is_escaped() {
        let bytes = write_ods(&testing::rows()).unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut content = String::new();
        archive
            .by_name("content.xml")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();

        assert!(content.contains("&lt;angle&gt; &amp; &quot;quotes&quot;"));
        assert!(!content.contains("<angle>"));
    }
}
