use std::path::Path;

use anyhow::{Context, Result};

/// Decoded image ready for texture upload: straight RGBA8, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSource {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl ImageSource {
    /// Decodes any format the `image` crate was built with.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let decoded = image::open(path)
            .with_context(|| format!("failed to decode image {}", path.display()))?;
        let rgba = decoded.to_rgba8();
        log::info!("loaded {} ({}x{})", path.display(), rgba.width(), rgba.height());
        Ok(Self::from_image(rgba))
    }

    pub fn from_image(rgba: image::RgbaImage) -> Self {
        let (width, height) = rgba.dimensions();
        Self { width, height, pixels: rgba.into_raw() }
    }

    /// Wraps raw pixels; `pixels.len()` must equal `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        anyhow::ensure!(width > 0 && height > 0, "image has zero size ({width}x{height})");
        let expected = width as usize * height as usize * 4;
        anyhow::ensure!(
            pixels.len() == expected,
            "expected {expected} bytes for {width}x{height} RGBA8, got {}",
            pixels.len()
        );
        Ok(Self { width, height, pixels })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgba_checks_length() {
        assert!(ImageSource::from_rgba(2, 2, vec![0; 16]).is_ok());
        assert!(ImageSource::from_rgba(2, 2, vec![0; 15]).is_err());
        assert!(ImageSource::from_rgba(0, 2, vec![]).is_err());
    }

    #[test]
    fn from_image_keeps_row_order() {
        let mut img = image::RgbaImage::new(1, 2);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        img.put_pixel(0, 1, image::Rgba([0, 0, 255, 255]));

        let src = ImageSource::from_image(img);
        assert_eq!((src.width(), src.height()), (1, 2));
        assert_eq!(&src.pixels()[..4], &[255, 0, 0, 255]);
        assert_eq!(&src.pixels()[4..], &[0, 0, 255, 255]);
    }

    #[test]
    fn open_missing_file_names_path() {
        let err = ImageSource::open("/nonexistent/quadmirror.png").unwrap_err();
        assert!(format!("{err:#}").contains("quadmirror.png"));
    }
}
