//! File type classification by extension.

use std::path::Path;

/// Document file extensions that require special text extraction (not plain text)
/// - PDF: pdfium-render (embedded text or OCR fallback)
/// - DOCX: docx-lite
/// - XLSX/XLS/XLSM/XLSB/ODS: calamine
/// - CSV: csv
/// - HTML: html2text
const DOCUMENT_EXTENSIONS: &[&str] = &[
    "pdf", "docx", "xlsx", "xls", "xlsm", "xlsb", "ods", "csv", "html", "htm",
];

/// Outlook mail-message extensions, handled by the metadata extractor
/// rather than the text dispatch.
const MESSAGE_EXTENSIONS: &[&str] = &["msg"];

/// Lowercased extension of a path, empty string if none.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}

/// Check if a path is a document format with a dedicated extractor.
pub fn is_document_file(path: &Path) -> bool {
    DOCUMENT_EXTENSIONS.contains(&extension_of(path).as_str())
}

/// Check if a path is an Outlook mail-message file.
pub fn is_message_file(path: &Path) -> bool {
    MESSAGE_EXTENSIONS.contains(&extension_of(path).as_str())
}

/// Check if a path carries a recognized PDF extension.
///
/// This is an extension check only; no file I/O happens here.
pub fn is_pdf_path(path: &Path) -> bool {
    extension_of(path) == "pdf"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pdf_path() {
        assert!(is_pdf_path(Path::new("/tmp/report.pdf")));
        assert!(is_pdf_path(Path::new("/tmp/REPORT.PDF"))); // Case insensitive
        assert!(!is_pdf_path(Path::new("/tmp/report.docx")));
        assert!(!is_pdf_path(Path::new("/tmp/pdf"))); // No extension
        assert!(!is_pdf_path(Path::new("/tmp/report.pdf.txt")));
    }

    #[test]
    fn test_is_document_file() {
        assert!(is_document_file(Path::new("sheet.xlsx")));
        assert!(is_document_file(Path::new("page.html")));
        assert!(is_document_file(Path::new("data.csv")));
        assert!(!is_document_file(Path::new("notes.txt")));
        assert!(!is_document_file(Path::new("mail.msg")));
    }

    #[test]
    fn test_is_message_file() {
        assert!(is_message_file(Path::new("mail.msg")));
        assert!(is_message_file(Path::new("MAIL.MSG")));
        assert!(!is_message_file(Path::new("mail.eml")));
    }
}
