use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};
use leptess::LepTess;
use log::debug;
use thiserror::Error;

use crate::wordlist::clean_lines;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("could not read {path}: {source}")]
    UnreadableImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("text recognition unavailable: {0}")]
    EngineInit(String),
    #[error("text recognition failed: {0}")]
    Recognition(String),
}

/// Turns a photographed list into cleaned, ordered text lines.
///
/// Lines come back trimmed, top to bottom, with anything of one character or
/// less dropped (stray marks and bullet points recognize as single glyphs).
pub trait TextExtractor {
    fn extract_lines(&self, image: &DynamicImage) -> Result<Vec<String>, ScanError>;
}

/// Decode a photo from disk.
pub fn load_image(path: &Path) -> Result<DynamicImage, ScanError> {
    image::open(path).map_err(|source| ScanError::UnreadableImage {
        path: path.to_path_buf(),
        source,
    })
}

/// Tesseract-backed extractor.
pub struct TesseractExtractor {
    lang: String,
}

impl TesseractExtractor {
    pub fn new() -> Self {
        Self {
            lang: "eng".to_string(),
        }
    }
}

impl Default for TesseractExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for TesseractExtractor {
    fn extract_lines(&self, image: &DynamicImage) -> Result<Vec<String>, ScanError> {
        let mut engine =
            LepTess::new(None, &self.lang).map_err(|e| ScanError::EngineInit(e.to_string()))?;

        // Phone cameras hand back all sorts of channel layouts; recognition
        // wants plain RGB in a standard container, so recode before handing
        // the pixels over.
        let rgb = image.to_rgb8();
        let mut png = Vec::new();
        rgb.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| ScanError::Recognition(e.to_string()))?;

        engine
            .set_image_from_mem(&png)
            .map_err(|e| ScanError::Recognition(e.to_string()))?;
        // must follow set_image; handwriting shots are rarely tagged with a DPI
        engine.set_source_resolution(300);

        let text = engine
            .get_utf8_text()
            .map_err(|e| ScanError::Recognition(e.to_string()))?;

        let lines = clean_lines(text.lines());
        debug!("recognized {} usable lines", lines.len());
        Ok(lines)
    }
}
