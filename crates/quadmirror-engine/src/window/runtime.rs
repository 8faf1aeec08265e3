use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::device::{Canvas, Gpu, GpuInit, SurfaceErrorAction, WindowSurface};
use crate::gl::wgpu_gl::WgpuGl;
use crate::image_source::ImageSource;
use crate::scene::draw_mirrored;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    /// Canvas and window size in physical pixels. The window is not resizable.
    pub canvas_size: PhysicalSize<u32>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "quadmirror".to_string(),
            canvas_size: PhysicalSize::new(512, 512),
        }
    }
}

/// User event delivered to the event loop.
pub enum RuntimeEvent {
    /// The loader thread finished, successfully or not.
    ImageReady(Result<ImageSource>),
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window, runs `loader` on a background thread and renders
    /// its image once when it arrives.
    ///
    /// Returns the loader or render error, if any, after the window closes.
    pub fn run<L>(config: RuntimeConfig, gpu_init: GpuInit, loader: L) -> Result<()>
    where
        L: FnOnce() -> Result<ImageSource> + Send + 'static,
    {
        let event_loop = EventLoop::<RuntimeEvent>::with_user_event()
            .build()
            .context("failed to create winit EventLoop")?;

        let proxy = event_loop.create_proxy();
        std::thread::Builder::new()
            .name("quadmirror-loader".to_string())
            .spawn(move || {
                let result = loader();
                if proxy.send_event(RuntimeEvent::ImageReady(result)).is_err() {
                    log::warn!("event loop closed before the image was ready");
                }
            })
            .context("failed to spawn image loader thread")?;

        let mut state = AppState::new(config, gpu_init);
        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    surface: WindowSurface<'this>,
}

/// Everything tied to the open window.
struct Target {
    entry: WindowEntry,
    gpu: Gpu,
    canvas: Canvas,
    rendered: bool,
}

struct AppState {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    instance: wgpu::Instance,

    target: Option<Target>,
    pending: Option<ImageSource>,
    failure: Option<anyhow::Error>,
}

impl AppState {
    fn new(config: RuntimeConfig, gpu_init: GpuInit) -> Self {
        let instance = Gpu::instance(&gpu_init);
        Self {
            config,
            gpu_init,
            instance,
            target: None,
            pending: None,
            failure: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.failure.get_or_insert(err);
        self.target = None;
        event_loop.exit();
    }

    fn create_target(&mut self, event_loop: &ActiveEventLoop) -> Result<Target> {
        let size = self.config.canvas_size;
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(size)
            .with_resizable(false);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let instance = &self.instance;
        let init = &self.gpu_init;
        let mut gpu = None;

        let entry = WindowEntryTryBuilder {
            window,
            surface_builder: |w| configure_surface(w, instance, init, &mut gpu),
        }
        .try_build()?;

        let gpu = gpu.context("GPU was not initialized with the surface")?;
        let format = entry.with_surface(|s| s.format());
        let canvas = Canvas::new(gpu.device(), size.width, size.height, format);
        log::debug!("canvas {}x{} ({format:?})", size.width, size.height);

        Ok(Target { entry, gpu, canvas, rendered: false })
    }

    /// Renders `image` into the canvas once and schedules a present.
    fn render(&mut self, event_loop: &ActiveEventLoop, image: ImageSource) {
        let Some(target) = self.target.as_mut() else {
            self.pending = Some(image);
            return;
        };

        let outcome = {
            let mut gl = WgpuGl::new(target.gpu.device(), target.gpu.queue(), &target.canvas);
            draw_mirrored(&mut gl, &image)
        };

        match outcome {
            Ok(_) => {
                target.rendered = true;
                target.entry.with_window(|w| w.request_redraw());
            }
            Err(e) => self.fail(event_loop, anyhow::Error::new(e).context("render aborted")),
        }
    }

    fn present(&mut self, event_loop: &ActiveEventLoop) {
        let Some(target) = self.target.as_ref() else { return };
        if !target.rendered {
            return;
        }

        let action = target.entry.with_surface(|surface| {
            match surface.present(&target.gpu, &target.canvas) {
                Ok(()) => None,
                Err(err) => {
                    log::warn!("surface error: {err}");
                    Some(surface.handle_surface_error(&target.gpu, err))
                }
            }
        });

        match action {
            None | Some(SurfaceErrorAction::SkipFrame) => {}
            Some(SurfaceErrorAction::Reconfigured) => {
                target.entry.with_window(|w| w.request_redraw());
            }
            Some(SurfaceErrorAction::Fatal) => {
                self.fail(event_loop, anyhow::anyhow!("surface lost beyond recovery"));
            }
        }
    }
}

fn configure_surface<'w>(
    window: &'w Window,
    instance: &wgpu::Instance,
    init: &GpuInit,
    gpu_out: &mut Option<Gpu>,
) -> Result<WindowSurface<'w>> {
    let surface = instance
        .create_surface(window)
        .context("failed to create wgpu surface")?;
    let gpu = pollster::block_on(Gpu::new(instance, Some(&surface), init))?;
    let surface = WindowSurface::new(surface, &gpu, window.inner_size(), init)?;
    *gpu_out = Some(gpu);
    Ok(surface)
}

impl ApplicationHandler<RuntimeEvent> for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.target.is_some() || self.failure.is_some() {
            return;
        }

        match self.create_target(event_loop) {
            Ok(target) => self.target = Some(target),
            Err(e) => {
                self.fail(event_loop, e.context("failed to create window"));
                return;
            }
        }

        if let Some(image) = self.pending.take() {
            self.render(event_loop, image);
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: RuntimeEvent) {
        match event {
            RuntimeEvent::ImageReady(Ok(image)) => self.render(event_loop, image),
            RuntimeEvent::ImageReady(Err(e)) => self.fail(event_loop, e),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let ours = self
            .target
            .as_ref()
            .is_some_and(|t| t.entry.with_window(|w| w.id()) == window_id);
        if !ours {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                self.target = None;
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => self.present(event_loop),
            _ => {}
        }
    }
}
