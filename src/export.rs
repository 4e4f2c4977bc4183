//! Standalone SVG and PNG exports.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;

use crate::consts::{PNG_FILE_NAME, SVG_FILE_NAME, XML_PROLOG};
use crate::layout::Measurer;

pub const SVG_MIME: &str = "image/svg+xml";
pub const PNG_MIME: &str = "image/png";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to lay out SVG for rasterization: {0}")]
    Layout(String),
    #[error("cannot allocate a {width}x{height} pixmap")]
    PixmapAlloc { width: u32, height: u32 },
    #[error("failed to encode PNG: {0}")]
    Encode(String),
    #[error("PNG export needs the raster feature")]
    Unsupported,
}

/// A file ready to be offered for download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedFile {
    pub file_name: String,
    pub mime: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
    /// `data:` URI carrying `bytes` in base64.
    pub data_uri: String,
}

impl ExportedFile {
    fn new(file_name: &str, mime: &str, bytes: Vec<u8>) -> Self {
        let data_uri = format!("data:{mime};base64,{}", STANDARD.encode(&bytes));
        Self { file_name: file_name.to_string(), mime: mime.to_string(), bytes, data_uri }
    }
}

/// Wrap core markup as `image.svg` with an XML prolog.
#[must_use]
pub fn svg_file(markup: &str) -> ExportedFile {
    ExportedFile::new(SVG_FILE_NAME, SVG_MIME, format!("{XML_PROLOG}{markup}").into_bytes())
}

/// Rasterize standalone markup (with explicit width and height) as `image.png`,
/// reusing the fonts `measurer` has loaded.
///
/// # Errors
///
/// Fails when the markup does not lay out, the pixmap cannot be allocated or
/// PNG encoding fails.
#[cfg(feature = "raster")]
pub fn png_file(markup: &str, measurer: &Measurer) -> Result<ExportedFile, ExportError> {
    Ok(ExportedFile::new(PNG_FILE_NAME, PNG_MIME, png_bytes(markup, measurer.options())?))
}

#[cfg(not(feature = "raster"))]
pub fn png_file(_markup: &str, _measurer: &Measurer) -> Result<ExportedFile, ExportError> {
    Err(ExportError::Unsupported)
}

#[cfg(feature = "raster")]
fn png_bytes(markup: &str, opt: &usvg::Options<'static>) -> Result<Vec<u8>, ExportError> {
    let tree = usvg::Tree::from_str(markup, opt).map_err(|e| ExportError::Layout(e.to_string()))?;

    let size = tree.size().to_int_size();
    let (width, height) = (size.width(), size.height());
    let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or(ExportError::PixmapAlloc { width, height })?;
    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());
    pixmap.encode_png().map_err(|e| ExportError::Encode(e.to_string()))
}
