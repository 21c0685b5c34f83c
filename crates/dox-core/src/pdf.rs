//! PDF text acquisition: classification plus embedded-text or OCR extraction.
//!
//! A PDF is either text-based (its content stream carries extractable text
//! objects) or scanned (image-only pages, requiring OCR). [`is_text_based`]
//! decides which; [`extract_pdf`] then pulls embedded text directly, or
//! rasterizes each page to a transient PNG and runs it through the injected
//! [`OcrService`].
//!
//! Uses `pdfium-render` for page text and rasterization.

use std::fs;
use std::path::{Path, PathBuf};

use pdfium_render::prelude::*;

use crate::error::{ExtractError, Result};
use crate::file_types::is_pdf_path;
use crate::ocr::{poll_to_completion, JobState, OcrService, PollPolicy};

/// Outcome of one PDF acquisition.
#[derive(Debug)]
pub enum PdfExtraction {
    /// Embedded text, concatenated in page order with no added separators.
    Embedded(String),
    /// Text recognized from rasterized pages. Pages whose OCR job ended in
    /// a non-success terminal state are listed by 1-based index and
    /// contribute no text; the loop continues past them.
    Recognized {
        text: String,
        failed_pages: Vec<usize>,
    },
    /// An unexpected rasterize/submit/poll error abandoned the scanned
    /// branch. Text recognized before the failure is carried here so
    /// callers can decide what to do with it; [`extract_pdf_content`]
    /// discards it.
    PipelineFailed {
        error: String,
        partial_text: String,
    },
}

/// Check whether a PDF is text-based: true iff at least one page yields
/// non-whitespace extractable text.
///
/// Open and parse errors propagate; classification never silently
/// defaults. This is a heuristic, not a guarantee: a document mixing one
/// text page with many scanned pages classifies as text-based, and the
/// scanned pages will contribute nothing on the embedded-text path.
pub fn is_text_based(path: &Path) -> Result<bool> {
    let pdfium = bind_pdfium()?;
    let document = load_document(&pdfium, path)?;

    for page in document.pages().iter() {
        let text = page_text(&page)?;
        if !text.trim().is_empty() {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Extract the text content of a PDF.
///
/// The path must carry a `.pdf` extension; that check happens before any
/// file I/O. Text-based documents get their embedded text concatenated in
/// page order, and any per-page read failure is fatal for the whole
/// document. Scanned documents are rasterized page by page (transient
/// `page_<n>.png` files in the working directory, removed on every exit
/// path) and recognized through `service` under `policy`.
pub fn extract_pdf(
    path: &Path,
    service: &dyn OcrService,
    policy: &PollPolicy,
) -> Result<PdfExtraction> {
    if !is_pdf_path(path) {
        return Err(ExtractError::InvalidInput(format!(
            "not a PDF file: {}",
            path.display()
        )));
    }

    if is_text_based(path)? {
        tracing::debug!("PDF is text-based, extracting embedded text: {}", path.display());
        return Ok(PdfExtraction::Embedded(extract_embedded_text(path)?));
    }

    tracing::debug!("PDF looks scanned, performing OCR: {}", path.display());
    let images = match rasterize_pages(path) {
        Ok(images) => images,
        Err(err) => {
            return Ok(PdfExtraction::PipelineFailed {
                error: err.to_string(),
                partial_text: String::new(),
            })
        }
    };

    Ok(recognize_images(service, policy, images))
}

/// String-level entry point preserving the legacy contract: scanned-path
/// pipeline failures are reported once and collapse to an empty string,
/// discarding any text already recognized. Callers that need to tell an
/// empty scanned document from a crashed pipeline use [`extract_pdf`].
pub fn extract_pdf_content(
    path: &Path,
    service: &dyn OcrService,
    policy: &PollPolicy,
) -> Result<String> {
    match extract_pdf(path, service, policy)? {
        PdfExtraction::Embedded(text) => Ok(text),
        PdfExtraction::Recognized { text, .. } => Ok(text),
        PdfExtraction::PipelineFailed { error, .. } => {
            tracing::warn!("Image quality was not sufficient for text extraction: {error}");
            Ok(String::new())
        }
    }
}

/// Pull embedded text from every page, in page order, with no separator
/// beyond what each page yields.
fn extract_embedded_text(path: &Path) -> Result<String> {
    let pdfium = bind_pdfium()?;
    let document = load_document(&pdfium, path)?;

    let mut full_text = String::new();
    for page in document.pages().iter() {
        full_text.push_str(&page_text(&page)?);
    }
    Ok(full_text)
}

/// Rasterized page image on disk; the file is removed when the guard
/// drops, so cleanup holds on every exit path out of the OCR loop.
struct TransientImage {
    path: PathBuf,
}

impl TransientImage {
    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TransientImage {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    "Failed to remove transient image {}: {}",
                    self.path.display(),
                    err
                );
            }
        }
    }
}

/// Transient file name for a 1-based page index.
fn transient_image_name(page_number: usize) -> String {
    format!("page_{page_number}.png")
}

/// Render every page to `page_<n>.png` in the working directory at the
/// renderer's default resolution (one pixel per PDF point).
fn rasterize_pages(path: &Path) -> Result<Vec<TransientImage>> {
    let pdfium = bind_pdfium()?;
    let document = load_document(&pdfium, path)?;

    let mut images = Vec::new();
    for (index, page) in document.pages().iter().enumerate() {
        let page_number = index + 1;
        let config = PdfRenderConfig::new()
            .set_target_width(page.width().value as i32)
            .set_target_height(page.height().value as i32);

        let bitmap = page.render_with_config(&config).map_err(|e| {
            ExtractError::Extraction(format!("Failed to render page {page_number}: {e}"))
        })?;

        let image_path = PathBuf::from(transient_image_name(page_number));
        bitmap.as_image().save(&image_path).map_err(|e| {
            ExtractError::Extraction(format!(
                "Failed to write {}: {e}",
                image_path.display()
            ))
        })?;

        images.push(TransientImage { path: image_path });
    }

    tracing::debug!("Rasterized {} pages from {}", images.len(), path.display());
    Ok(images)
}

/// Outcome for one rasterized page.
enum PageOutcome {
    Recognized(String),
    InsufficientQuality,
}

/// Submit one image and poll its job to a terminal status.
///
/// A non-success terminal status is absorbed as `InsufficientQuality`;
/// transport and I/O errors propagate.
fn recognize_image(
    service: &dyn OcrService,
    policy: &PollPolicy,
    image: &Path,
) -> Result<PageOutcome> {
    let png = fs::read(image)?;
    let job = service.submit(&png)?;

    match poll_to_completion(service, &job, policy)? {
        JobState::Succeeded(lines) => Ok(PageOutcome::Recognized(lines.join(" "))),
        state => {
            tracing::warn!(
                "OCR did not succeed for {} ({:?}); image quality insufficient",
                image.display(),
                state
            );
            Ok(PageOutcome::InsufficientQuality)
        }
    }
}

/// Run every transient image through the OCR service, in page order.
///
/// Per-page quality failures are tolerated; any transport or I/O error
/// abandons the remaining pages as a pipeline failure. Consuming the
/// guards means every image file is removed no matter how the loop exits.
fn recognize_images(
    service: &dyn OcrService,
    policy: &PollPolicy,
    images: Vec<TransientImage>,
) -> PdfExtraction {
    let mut pages: Vec<String> = Vec::new();
    let mut failed_pages = Vec::new();

    for (index, image) in images.into_iter().enumerate() {
        match recognize_image(service, policy, image.path()) {
            Ok(PageOutcome::Recognized(text)) => {
                if !text.is_empty() {
                    pages.push(text);
                }
            }
            Ok(PageOutcome::InsufficientQuality) => failed_pages.push(index + 1),
            Err(err) => {
                return PdfExtraction::PipelineFailed {
                    error: err.to_string(),
                    partial_text: pages.join(" "),
                }
            }
        }
    }

    PdfExtraction::Recognized {
        text: pages.join(" "),
        failed_pages,
    }
}

fn bind_pdfium() -> Result<Pdfium> {
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| ExtractError::Extraction(format!("Failed to bind pdfium library: {e}")))?;
    Ok(Pdfium::new(bindings))
}

fn load_document<'a>(pdfium: &'a Pdfium, path: &Path) -> Result<PdfDocument<'a>> {
    pdfium.load_pdf_from_file(path, None).map_err(|e| {
        ExtractError::Extraction(format!("Failed to open PDF {}: {e}", path.display()))
    })
}

fn page_text(page: &PdfPage) -> Result<String> {
    Ok(page
        .text()
        .map_err(|e| ExtractError::Extraction(format!("Failed to read page text: {e}")))?
        .all())
}
