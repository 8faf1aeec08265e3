//! Offscreen rendering without a window.

use std::path::Path;

use anyhow::{Context, Result};

use crate::device::{Canvas, Gpu, GpuInit};
use crate::gl::wgpu_gl::WgpuGl;
use crate::image_source::ImageSource;
use crate::scene::draw_mirrored;

/// Renders `image` mirrored into a `width` x `height` canvas and reads it back.
pub fn render_image(
    image: &ImageSource,
    width: u32,
    height: u32,
    init: &GpuInit,
) -> Result<image::RgbaImage> {
    anyhow::ensure!(width > 0 && height > 0, "canvas size must be non-zero");

    let gpu = pollster::block_on(Gpu::headless(init))?;
    render_with(&gpu, image, width, height)
}

/// Same as [`render_image`] on an existing device.
pub fn render_with(
    gpu: &Gpu,
    image: &ImageSource,
    width: u32,
    height: u32,
) -> Result<image::RgbaImage> {
    anyhow::ensure!(width > 0 && height > 0, "canvas size must be non-zero");

    let canvas = Canvas::new(gpu.device(), width, height, Canvas::HEADLESS_FORMAT);
    {
        let mut gl = WgpuGl::new(gpu.device(), gpu.queue(), &canvas);
        draw_mirrored(&mut gl, image).context("render aborted")?;
    }

    canvas.read_rgba(gpu.device(), gpu.queue())
}

/// Writes `image` as PNG regardless of the extension of `path`.
pub fn write_png(image: &image::RgbaImage, path: &Path) -> Result<()> {
    image
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sized_canvas_is_rejected_before_gpu_init() {
        let image = ImageSource::from_rgba(1, 1, vec![0; 4]).unwrap();
        let err = render_image(&image, 0, 16, &GpuInit::default()).unwrap_err();
        assert!(err.to_string().contains("non-zero"));
    }

    // ── GPU ───────────────────────────────────────────────────────────────

    const RED: [u8; 4] = [255, 0, 0, 255];
    const GREEN: [u8; 4] = [0, 255, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];
    const WHITE: [u8; 4] = [255, 255, 255, 255];

    #[test]
    fn quadrants_show_their_mirrors() {
        let gpu = match pollster::block_on(Gpu::headless(&GpuInit::default())) {
            Ok(gpu) => gpu,
            Err(e) => {
                log::warn!("no adapter, skipping GPU render test: {e:#}");
                return;
            }
        };

        // Top row red, green; bottom row blue, white.
        let pixels = [RED, GREEN, BLUE, WHITE].concat();
        let image = ImageSource::from_rgba(2, 2, pixels).unwrap();
        let out = render_with(&gpu, &image, 100, 100).unwrap();

        // Quadrants span pixels 5..45 and 55..95 on each axis. Sample just
        // inside each quadrant's top-left corner.
        let at = |x, y| out.get_pixel(x, y).0;
        assert_eq!(at(8, 8), RED, "top-left is upright");
        assert_eq!(at(58, 8), GREEN, "top-right is mirrored horizontally");
        assert_eq!(at(8, 58), BLUE, "bottom-left is mirrored vertically");
        assert_eq!(at(58, 58), WHITE, "bottom-right is mirrored both ways");
        assert_eq!(at(50, 50), [0, 0, 0, 255], "gap keeps the clear colour");
    }

    #[test]
    fn write_png_round_trips() {
        let dir = std::env::temp_dir().join(format!("quadmirror-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("out.data");

        let mut img = image::RgbaImage::new(2, 1);
        img.put_pixel(1, 0, image::Rgba([10, 20, 30, 255]));
        write_png(&img, &path).unwrap();

        let back = image::ImageReader::open(&path)
            .unwrap()
            .with_guessed_format()
            .unwrap()
            .decode()
            .unwrap()
            .to_rgba8();
        assert_eq!(back, img);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
