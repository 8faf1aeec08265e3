use std::path::PathBuf;

use clap::Parser;

use quadmirror_engine::device::GpuInit;
use quadmirror_engine::headless::{render_image, write_png};
use quadmirror_engine::image_source::ImageSource;
use quadmirror_engine::logging::{init_logging, LoggingConfig};
use quadmirror_engine::window::{PhysicalSize, Runtime, RuntimeConfig};

/// Draw an image mirrored into the four quadrants of a canvas.
#[derive(Parser, Debug)]
#[command(name = "quadmirror", version)]
struct Cli {
    /// Image to display (PNG, JPEG, BMP, GIF, ICO, TIFF or WebP).
    image: PathBuf,

    /// Render without a window and write the canvas to this PNG.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Canvas width in pixels.
    #[arg(long, default_value_t = 512, value_parser = clap::value_parser!(u32).range(1..))]
    width: u32,

    /// Canvas height in pixels.
    #[arg(long, default_value_t = 512, value_parser = clap::value_parser!(u32).range(1..))]
    height: u32,

    /// Log filter in `env_logger` syntax (overrides RUST_LOG).
    #[arg(long)]
    log: Option<String>,

    /// Force a software adapter.
    #[arg(long)]
    software: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(LoggingConfig {
        env_filter: cli.log.clone(),
        ..Default::default()
    });

    let gpu_init = GpuInit {
        force_fallback_adapter: cli.software,
        ..Default::default()
    };

    match cli.output {
        Some(out) => {
            let image = ImageSource::open(&cli.image)?;
            let canvas = render_image(&image, cli.width, cli.height, &gpu_init)?;
            write_png(&canvas, &out)?;
            log::info!("wrote {}", out.display());
            Ok(())
        }
        None => {
            let config = RuntimeConfig {
                title: window_title(&cli.image),
                canvas_size: PhysicalSize::new(cli.width, cli.height),
            };
            let path = cli.image;
            Runtime::run(config, gpu_init, move || ImageSource::open(path))
        }
    }
}

fn window_title(path: &std::path::Path) -> String {
    match path.file_name() {
        Some(name) => format!("quadmirror - {}", name.to_string_lossy()),
        None => "quadmirror".to_string(),
    }
}
