use crate::error::{AccentError, Result};
use image::RgbaImage;
use std::path::{Path, PathBuf};

/// Decodes an image file into row-major RGBA8.
pub fn load_rgba(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).map_err(|source| AccentError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_rgba8())
}

/// Decodes encoded image bytes (e.g. embedded cover art) into RGBA8.
pub fn load_rgba_from_memory(bytes: &[u8]) -> Result<RgbaImage> {
    let img = image::load_from_memory(bytes).map_err(|source| AccentError::Decode {
        path: PathBuf::from("<memory>"),
        source,
    })?;
    Ok(img.to_rgba8())
}
