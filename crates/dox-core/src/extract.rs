//! Text extraction for supported file formats.
//!
//! Every format except PDF is a single-call adapter over its parsing
//! library:
//! - plain text: encoding-detected read
//! - CSV: `csv`
//! - XLSX/XLS/XLSM/XLSB/ODS: `calamine`
//! - HTML: `html2text`
//! - DOCX: `docx-lite`
//!
//! PDF goes through the classifier/acquirer in [`crate::pdf`], which is
//! why the dispatch takes the OCR collaborator.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use crate::encoding::decode_to_utf8;
use crate::error::{ExtractError, Result};
use crate::file_types::extension_of;
use crate::ocr::{OcrService, PollPolicy};
use crate::pdf;

/// Extract text content from a file, dispatching on extension.
///
/// Unknown extensions are read as plain text with encoding detection.
pub fn extract_file(
    path: &Path,
    service: &dyn OcrService,
    policy: &PollPolicy,
) -> Result<String> {
    match extension_of(path).as_str() {
        "pdf" => pdf::extract_pdf_content(path, service, policy),
        "csv" => extract_csv(path),
        "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => extract_xlsx(path),
        "html" | "htm" => extract_html(path),
        "docx" => extract_docx(path),
        _ => extract_txt(path),
    }
}

/// Read a plain text file, converting to UTF-8 from whatever encoding it
/// actually uses.
pub fn extract_txt(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(decode_to_utf8(&bytes))
}

/// Extract text from a CSV file.
///
/// Rows come out one per line with cells joined by tabs, header row
/// included. Ragged rows are accepted.
pub fn extract_csv(path: &Path) -> Result<String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| ExtractError::Extraction(format!("Failed to open CSV: {e}")))?;

    let mut text = String::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| ExtractError::Extraction(format!("Failed to parse CSV: {e}")))?;
        text.push_str(&record.iter().collect::<Vec<_>>().join("\t"));
        text.push('\n');
    }
    Ok(text)
}

/// Extract text from a spreadsheet file.
///
/// Every sheet contributes its name as a `## name` header followed by its
/// non-empty rows, cells joined by tabs.
pub fn extract_xlsx(path: &Path) -> Result<String> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| ExtractError::Extraction(format!("Failed to open spreadsheet: {e}")))?;

    let mut text = String::new();
    for sheet_name in workbook.sheet_names().to_vec() {
        let Ok(range) = workbook.worksheet_range(&sheet_name) else {
            continue;
        };

        text.push_str(&format!("## {sheet_name}\n\n"));
        for row in range.rows() {
            let cells: Vec<String> = row.iter().map(format_cell).collect();
            if cells.iter().all(String::is_empty) {
                continue;
            }
            text.push_str(&cells.join("\t"));
            text.push('\n');
        }
        text.push('\n');
    }
    Ok(text)
}

fn format_cell(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::Error(e) => format!("#ERR:{e:?}"),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

/// Extract the visible text of an HTML file.
pub fn extract_html(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(html2text::from_read(&bytes[..], 80))
}

/// Extract text from a DOCX file.
pub fn extract_docx(path: &Path) -> Result<String> {
    docx_lite::extract_text(path).map_err(|e| {
        ExtractError::Extraction(format!(
            "Failed to extract text from DOCX {}: {e}",
            path.display()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_extract_txt_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "Hello, world!").unwrap();

        let text = extract_txt(&path).unwrap();
        assert!(text.contains("Hello, world!"));
    }

    #[test]
    fn test_extract_txt_latin1() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.txt");
        // "café" in ISO-8859-1
        std::fs::write(&path, [0x63, 0x61, 0x66, 0xE9]).unwrap();

        let text = extract_txt(&path).unwrap();
        assert!(!text.contains('\u{FFFD}'));
    }

    #[test]
    fn test_extract_csv_tab_joined_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "name,age\nalice,30\nbob,41\n").unwrap();

        let text = extract_csv(&path).unwrap();
        assert_eq!(text, "name\tage\nalice\t30\nbob\t41\n");
    }

    #[test]
    fn test_extract_csv_ragged_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ragged.csv");
        std::fs::write(&path, "a,b,c\nd,e\n").unwrap();

        let text = extract_csv(&path).unwrap();
        assert_eq!(text, "a\tb\tc\nd\te\n");
    }

    #[test]
    fn test_extract_html_strips_markup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        std::fs::write(
            &path,
            "<html><body><h1>Title</h1><p>Some <b>bold</b> text.</p></body></html>",
        )
        .unwrap();

        let text = extract_html(&path).unwrap();
        assert!(text.contains("Title"));
        assert!(text.contains("bold"));
        assert!(!text.contains("<p>"));
    }

    #[test]
    fn test_extract_missing_file_is_io_error() {
        let err = extract_txt(Path::new("/nonexistent/notes.txt")).unwrap_err();
        assert!(matches!(err, ExtractError::Io(_)));
    }
}
