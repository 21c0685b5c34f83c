//! dox-core: Core library for dox document text extraction
//!
//! This crate provides:
//! - Text extraction adapters for plain text, CSV, XLSX, HTML and DOCX
//! - PDF text acquisition: text-based/scanned classification, embedded
//!   text extraction, and OCR fallback through a cloud Read service
//! - Metadata extraction from Outlook .msg mail messages

pub mod config;
pub mod encoding;
pub mod error;
pub mod extract;
pub mod file_types;
pub mod msg;
pub mod ocr;
pub mod pdf;

pub use config::OcrConfig;
pub use error::{ExtractError, Result};
pub use extract::{extract_csv, extract_docx, extract_file, extract_html, extract_txt, extract_xlsx};
pub use msg::{extract_msg_metadata, MsgMetadata};
pub use ocr::{JobState, OcrJob, OcrService, PollPolicy, ReadOcrClient};
pub use pdf::{extract_pdf, extract_pdf_content, is_text_based, PdfExtraction};
