use clap::Parser;
use rgbd::image::{ImageSize, PixelFormat};
use rgbd::io::{
    error::CaptureError,
    playback::PlaybackSource,
    png::write_image_png_rgb8,
    source::{FrameSource, StreamConfig, StreamKind},
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
struct Args {
    /// Raw recorded capture to play back (interleaved packed Z16 + RGB8
    /// frame pairs)
    #[arg(long)]
    file: PathBuf,

    /// Color width
    #[arg(long, default_value_t = 1920)]
    color_width: usize,

    /// Color height
    #[arg(long, default_value_t = 1080)]
    color_height: usize,

    /// Depth width
    #[arg(long, default_value_t = 640)]
    depth_width: usize,

    /// Depth height
    #[arg(long, default_value_t = 480)]
    depth_height: usize,

    /// Number of frames for playback
    #[arg(long, default_value_t = 200)]
    frames: usize,

    /// Directory receiving the PNG files
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let depth_config = StreamConfig {
        size: ImageSize {
            width: args.depth_width,
            height: args.depth_height,
        },
        format: PixelFormat::Z16,
        fps: 30,
    };
    let color_config = StreamConfig {
        size: ImageSize {
            width: args.color_width,
            height: args.color_height,
        },
        format: PixelFormat::Rgb8,
        fps: 30,
    };

    let mut source = PlaybackSource::open(&args.file, depth_config, color_config)?;
    source.enable_stream(StreamKind::Depth, &depth_config)?;
    source.enable_stream(StreamKind::Color, &color_config)?;
    source.start()?;

    let running = Arc::new(AtomicBool::new(true));
    let running_ctrlc = running.clone();
    ctrlc::set_handler(move || {
        running_ctrlc.store(false, Ordering::SeqCst);
    })?;

    let mut written = 0;
    for frame in 0..args.frames {
        if !running.load(Ordering::SeqCst) {
            println!("interrupted");
            break;
        }

        let pair = match source.wait_for_frames(Duration::from_secs(5)) {
            Ok(pair) => pair,
            Err(CaptureError::EndOfStream) => break,
            Err(e) => return Err(e.into()),
        };

        let path = args.output_dir.join(format!("streaming_color_{frame}.png"));
        write_image_png_rgb8(&path, &pair.color.to_rgb8_image()?)?;
        written += 1;
    }

    source.stop()?;
    println!(
        "wrote {} color frames to {}",
        written,
        args.output_dir.display()
    );

    Ok(())
}
