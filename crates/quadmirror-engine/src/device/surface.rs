use anyhow::{Context, Result};
use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;

use super::{Canvas, Gpu, GpuInit, SurfaceErrorAction};

/// A configured window surface that the canvas is presented onto.
///
/// Surface lifetime is tied to the window; the owner must ensure the window
/// outlives the `WindowSurface`.
pub struct WindowSurface<'w> {
    surface: wgpu::Surface<'w>,
    config: wgpu::SurfaceConfiguration,
}

impl<'w> WindowSurface<'w> {
    /// Configures `surface` for copy-based presentation at `size`.
    pub fn new(
        surface: wgpu::Surface<'w>,
        gpu: &Gpu,
        size: PhysicalSize<u32>,
        init: &GpuInit,
    ) -> Result<Self> {
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let caps = surface.get_capabilities(gpu.adapter());
        let format = choose_surface_format(&caps, init.prefer_srgb)
            .context("no supported surface formats")?;
        anyhow::ensure!(
            caps.usages.contains(wgpu::TextureUsages::COPY_DST),
            "surface does not accept copies (usages: {:?})",
            caps.usages
        );

        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_DST,
            format,
            width: size.width,
            height: size.height,
            present_mode: init.present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(gpu.device(), &config);

        Ok(Self { surface, config })
    }

    /// Returns the active surface format. Canvases presented here must use it.
    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Copies `canvas` into the next surface texture and presents it.
    pub fn present(&self, gpu: &Gpu, canvas: &Canvas) -> std::result::Result<(), SurfaceError> {
        let frame = self.surface.get_current_texture()?;

        let mut encoder = gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("quadmirror present encoder"),
            });
        canvas.copy_to(&mut encoder, &frame.texture);
        gpu.queue().submit(std::iter::once(encoder.finish()));

        frame.present();
        Ok(())
    }

    /// Converts a `SurfaceError` into a higher-level action.
    pub fn handle_surface_error(&self, gpu: &Gpu, err: SurfaceError) -> SurfaceErrorAction {
        match err {
            SurfaceError::Lost | SurfaceError::Outdated => {
                self.surface.configure(gpu.device(), &self.config);
                SurfaceErrorAction::Reconfigured
            }
            SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
            SurfaceError::Timeout => SurfaceErrorAction::SkipFrame,
            SurfaceError::Other => SurfaceErrorAction::SkipFrame,
        }
    }
}

fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if caps.formats.is_empty() {
        return None;
    }

    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        for f in preferred {
            if caps.formats.contains(&f) {
                return Some(f);
            }
        }
    }

    Some(caps.formats[0])
}
