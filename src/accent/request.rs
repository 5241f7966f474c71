use crate::accent::histogram::BYTES_PER_PIXEL;
use crate::error::{AccentError, Result};
use image::RgbaImage;

/// A validated view of a row-major RGBA8 buffer.
#[derive(Debug, Clone, Copy)]
pub struct AccentRequest<'a> {
    pixels: &'a [u8],
    width: u32,
    height: u32,
    downsample_factor: usize,
}

impl<'a> AccentRequest<'a> {
    pub fn new(pixels: &'a [u8], width: u32, height: u32, downsample_factor: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(AccentError::invalid_input(format!("image is {width}x{height}")));
        }
        if pixels.is_empty() {
            return Err(AccentError::invalid_input("pixel buffer is empty"));
        }
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if pixels.len() != expected {
            return Err(AccentError::invalid_input(format!(
                "{width}x{height} RGBA8 needs {expected} bytes, got {}",
                pixels.len()
            )));
        }

        Ok(Self {
            pixels,
            width,
            height,
            downsample_factor: downsample_factor.max(1),
        })
    }

    pub fn from_image(image: &'a RgbaImage, downsample_factor: usize) -> Result<Self> {
        let (width, height) = image.dimensions();
        Self::new(image.as_raw(), width, height, downsample_factor)
    }

    pub fn pixels(&self) -> &'a [u8] {
        self.pixels
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.pixels.len() / BYTES_PER_PIXEL
    }

    pub fn downsample_factor(&self) -> usize {
        self.downsample_factor
    }
}

/// Maps a signed stride, as it may appear in config files, onto a usable one.
pub fn clamp_downsample(factor: i64) -> usize {
    if factor <= 0 {
        1
    } else {
        usize::try_from(factor).unwrap_or(usize::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_dimensions() {
        let px = [0u8; 16];
        assert!(matches!(AccentRequest::new(&px, 0, 4, 1), Err(AccentError::InvalidInput { .. })));
        assert!(matches!(AccentRequest::new(&px, 4, 0, 1), Err(AccentError::InvalidInput { .. })));
    }

    #[test]
    fn rejects_empty_and_mismatched_buffers() {
        assert!(AccentRequest::new(&[], 1, 1, 1).is_err());
        let px = [0u8; 12];
        let err = AccentRequest::new(&px, 2, 2, 1).unwrap_err();
        assert!(err.to_string().contains("needs 16 bytes"));
    }

    #[test]
    fn accepts_image_buffer() {
        let img = RgbaImage::from_pixel(3, 2, image::Rgba([1, 2, 3, 4]));
        let req = AccentRequest::from_image(&img, 0).unwrap();
        assert_eq!(req.pixel_count(), 6);
        assert_eq!((req.width(), req.height()), (3, 2));
        assert_eq!(req.downsample_factor(), 1);
    }

    #[test]
    fn signed_downsample_is_clamped() {
        assert_eq!(clamp_downsample(-3), 1);
        assert_eq!(clamp_downsample(0), 1);
        assert_eq!(clamp_downsample(4), 4);
    }
}
