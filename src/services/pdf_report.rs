use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use printpdf::image_crate::{self, GenericImageView};
use printpdf::{BuiltinFont, Image, ImageTransform, Mm, PdfDocument};
use thiserror::Error;
use tracing::info;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 15.0;
const TITLE_SIZE: f32 = 16.0;
const BODY_SIZE: f32 = 10.0;
const LINE_HEIGHT_MM: f32 = 5.0;

#[derive(Error, Debug)]
pub enum PdfReportError {
    #[error("failed to read chart image {path}: {source}")]
    ReadChart { path: PathBuf, source: io::Error },
    #[error("failed to decode chart image {path}: {message}")]
    DecodeChart { path: PathBuf, message: String },
    #[error("failed to build pdf report: {0}")]
    Render(String),
    #[error("failed to write pdf report {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Writes a single A4 page: the title, the text report in a monospace font
/// and, when given, the chart scaled to the page width below it.
pub fn write_pdf_report(
    output_path: &str,
    title: &str,
    report_text: &str,
    chart_png: Option<&Path>,
) -> Result<(), PdfReportError> {
    let (document, page, layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Report");
    let layer = document.get_page(page).get_layer(layer);
    let title_font = document
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|error| PdfReportError::Render(format!("{error:?}")))?;
    let body_font = document
        .add_builtin_font(BuiltinFont::Courier)
        .map_err(|error| PdfReportError::Render(format!("{error:?}")))?;

    let mut cursor = PAGE_HEIGHT_MM - MARGIN_MM;
    layer.use_text(title, TITLE_SIZE, Mm(MARGIN_MM), Mm(cursor), &title_font);
    cursor -= 2.0 * LINE_HEIGHT_MM;
    for line in report_text.lines() {
        if !line.trim().is_empty() {
            layer.use_text(line, BODY_SIZE, Mm(MARGIN_MM), Mm(cursor), &body_font);
        }
        cursor -= LINE_HEIGHT_MM;
    }

    if let Some(chart_path) = chart_png {
        let bytes = std::fs::read(chart_path).map_err(|source| PdfReportError::ReadChart {
            path: chart_path.to_path_buf(),
            source,
        })?;
        let chart = image_crate::load_from_memory(&bytes).map_err(|error| PdfReportError::DecodeChart {
            path: chart_path.to_path_buf(),
            message: error.to_string(),
        })?;
        let (width_px, height_px) = chart.dimensions();
        // Fit the chart to the text width.
        let dpi = width_px as f32 * 25.4 / (PAGE_WIDTH_MM - 2.0 * MARGIN_MM);
        let height_mm = height_px as f32 * 25.4 / dpi;
        let bottom = (cursor - LINE_HEIGHT_MM - height_mm).max(MARGIN_MM);

        Image::from_dynamic_image(&chart).add_to_layer(
            layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(MARGIN_MM)),
                translate_y: Some(Mm(bottom)),
                dpi: Some(dpi),
                ..Default::default()
            },
        );
    }

    let file = File::create(output_path).map_err(|source| PdfReportError::Write {
        path: PathBuf::from(output_path),
        source,
    })?;
    document
        .save(&mut BufWriter::new(file))
        .map_err(|error| PdfReportError::Render(format!("{error:?}")))?;
    info!(path = output_path, "pdf report written");
    Ok(())
}
