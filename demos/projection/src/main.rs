use clap::Parser;
use rgbd::align::{CameraExtrinsic, CameraIntrinsic, PinholeProjector, RigCalibration};
use rgbd::image::{FrameBuffer, ImageSize, PixelFormat};
use rgbd::io::{
    playback::PlaybackSource,
    session::CaptureSession,
    sink::PngDirSink,
    source::{FramePair, SessionConfig, StreamConfig},
};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
struct Args {
    /// Raw recorded capture to play back (interleaved packed Z16 + RGB8
    /// frame pairs). Without it a short synthetic recording is generated.
    #[arg(long)]
    file: Option<PathBuf>,

    /// Color width
    #[arg(long, default_value_t = 1920)]
    color_width: usize,

    /// Color height
    #[arg(long, default_value_t = 1080)]
    color_height: usize,

    /// Depth width
    #[arg(long, default_value_t = 628)]
    depth_width: usize,

    /// Depth height
    #[arg(long, default_value_t = 468)]
    depth_height: usize,

    /// Number of frames for playback
    #[arg(long, default_value_t = 5)]
    frames: usize,

    /// Directory receiving the PNG pairs
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

/// A plausible rig for the demo: principal points at the image centers, a
/// 25 mm stereo baseline, millimeter depth units.
fn demo_calibration(depth_size: ImageSize, color_size: ImageSize) -> RigCalibration {
    RigCalibration {
        depth: CameraIntrinsic {
            fx: depth_size.width as f64 * 0.92,
            fy: depth_size.height as f64 * 1.23,
            cx: (depth_size.width as f64 - 1.0) / 2.0,
            cy: (depth_size.height as f64 - 1.0) / 2.0,
        },
        color: CameraIntrinsic {
            fx: color_size.width as f64 * 0.72,
            fy: color_size.height as f64 * 1.28,
            cx: (color_size.width as f64 - 1.0) / 2.0,
            cy: (color_size.height as f64 - 1.0) / 2.0,
        },
        color_size,
        depth_to_color: CameraExtrinsic {
            rotation: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            translation: [0.025, 0.0, 0.0],
        },
        depth_scale: 1e-3,
    }
}

/// Generate a synthetic recording: a tilted depth plane with scattered holes
/// under a color gradient that shifts from frame to frame.
fn synthetic_recording(
    depth: &StreamConfig,
    color: &StreamConfig,
    frames: usize,
) -> Result<Vec<FramePair>, Box<dyn std::error::Error>> {
    let mut pairs = Vec::with_capacity(frames);
    for i in 0..frames {
        let mut depth_data = Vec::with_capacity(depth.size.num_pixels() * 2);
        for y in 0..depth.size.height {
            for x in 0..depth.size.width {
                let z: u16 = if (x + y * depth.size.width) % 13 == 0 {
                    0
                } else {
                    (600 + 800 * x / depth.size.width + 400 * y / depth.size.height) as u16
                };
                depth_data.extend_from_slice(&z.to_le_bytes());
            }
        }

        let mut color_data = Vec::with_capacity(color.size.num_pixels() * 3);
        for y in 0..color.size.height {
            for x in 0..color.size.width {
                color_data.extend_from_slice(&[
                    (255 * x / color.size.width) as u8,
                    (255 * y / color.size.height) as u8,
                    (40 * i) as u8,
                ]);
            }
        }

        let timestamp = Duration::from_secs_f64(i as f64 / depth.fps as f64);
        pairs.push(FramePair {
            depth: FrameBuffer::new_packed(
                depth.size,
                depth.format,
                depth_data,
                timestamp,
                i as u32,
            )?,
            color: FrameBuffer::new_packed(
                color.size,
                color.format,
                color_data,
                timestamp,
                i as u32,
            )?,
        });
    }
    Ok(pairs)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let config = SessionConfig {
        depth: StreamConfig {
            size: ImageSize {
                width: args.depth_width,
                height: args.depth_height,
            },
            format: PixelFormat::Z16,
            fps: 30,
        },
        color: StreamConfig {
            size: ImageSize {
                width: args.color_width,
                height: args.color_height,
            },
            format: PixelFormat::Rgb8,
            fps: 30,
        },
    };

    let source = match &args.file {
        Some(path) => PlaybackSource::open(path, config.depth, config.color)?,
        None => PlaybackSource::from_frames(
            config.depth,
            config.color,
            synthetic_recording(&config.depth, &config.color, args.frames)?,
        )?,
    };

    let calibration = demo_calibration(config.depth.size, config.color.size);

    let mut session = CaptureSession::new(source);
    session.configure(&config, PinholeProjector::new(calibration))?;
    session.start()?;

    let mut sink = PngDirSink::new(&args.output_dir, "projection");
    let produced = session.run(&mut sink, args.frames)?;
    session.stop()?;

    println!(
        "wrote {} aligned frame pairs to {}",
        produced,
        args.output_dir.display()
    );

    Ok(())
}
