//! OCR stage: rasterizes PDF pages with pdfium and reads them with the
//! system `tesseract` binary.
//!
//! Binary-dependency discovery lives entirely in this module: pdfium binding
//! is a single rasterize-or-fail capability, and tesseract is located on
//! PATH with `which`. The chain in `extraction::mod` stays platform-agnostic.

use std::path::Path;
use std::process::Command;

use pdfium_render::prelude::*;
use thiserror::Error;
use tracing::{info, warn};

/// Target raster width in pixels. Wide enough for tesseract to resolve
/// 10pt body text on a letter-size page.
const RENDER_TARGET_WIDTH: i32 = 1600;

#[derive(Debug, Error)]
pub(crate) enum OcrError {
    #[error("pdfium library unavailable: {0}")]
    PdfiumUnavailable(String),

    #[error("failed to open PDF for rasterization: {0}")]
    OpenDocument(String),

    #[error("tesseract binary not found on PATH")]
    TesseractMissing,

    #[error("tesseract exited with failure: {0}")]
    TesseractFailed(String),

    #[error("failed to encode page image: {0}")]
    Image(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Rasterizes every page of `bytes` and OCRs each image, concatenating
/// per-page text in page order. A page that fails to render or OCR is
/// logged and skipped; the loop continues.
///
/// Scratch images live in a `TempDir`, so they are deleted on every exit
/// path including errors.
pub(crate) fn ocr_pdf(bytes: &[u8], pdfium_lib_path: Option<&str>) -> Result<String, OcrError> {
    let tesseract = which::which("tesseract").map_err(|_| OcrError::TesseractMissing)?;

    let pdfium = bind_pdfium(pdfium_lib_path)?;
    let document = pdfium
        .load_pdf_from_byte_slice(bytes, None)
        .map_err(|e| OcrError::OpenDocument(format!("{e:?}")))?;

    let scratch = tempfile::tempdir()?;
    let render_config = PdfRenderConfig::new().set_target_width(RENDER_TARGET_WIDTH);

    let mut text = String::new();
    for (index, page) in document.pages().iter().enumerate() {
        let png_path = scratch.path().join(format!("page-{index}.png"));

        let bitmap = match page.render_with_config(&render_config) {
            Ok(b) => b,
            Err(e) => {
                warn!("skipping page {index}: rasterization failed: {e:?}");
                continue;
            }
        };

        if let Err(e) = bitmap.as_image().save(&png_path) {
            warn!("skipping page {index}: {}", OcrError::Image(e.to_string()));
            continue;
        }

        match run_tesseract(&tesseract, &png_path) {
            Ok(page_text) => {
                info!("OCR processed page {index} ({} chars)", page_text.len());
                text.push_str(page_text.trim_end());
                text.push('\n');
            }
            Err(e) => warn!("skipping page {index}: {e}"),
        }
    }

    Ok(text)
}

/// Binds the pdfium dynamic library: explicit configured path first, then
/// the system library, then the working directory. Failure here fails the
/// whole OCR stage.
fn bind_pdfium(configured_path: Option<&str>) -> Result<Pdfium, OcrError> {
    if let Some(dir) = configured_path {
        let lib = Pdfium::pdfium_platform_library_name_at_path(Path::new(dir));
        return Pdfium::bind_to_library(lib)
            .map(Pdfium::new)
            .map_err(|e| OcrError::PdfiumUnavailable(format!("{e:?}")));
    }

    Pdfium::bind_to_system_library()
        .or_else(|_| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(Path::new(".")))
        })
        .map(Pdfium::new)
        .map_err(|e| OcrError::PdfiumUnavailable(format!("{e:?}")))
}

fn run_tesseract(tesseract: &Path, image_path: &Path) -> Result<String, OcrError> {
    let output = Command::new(tesseract)
        .arg(image_path)
        .arg("stdout")
        .output()?;

    if !output.status.success() {
        return Err(OcrError::TesseractFailed(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
