use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Log levels selectable on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Built-in demo scenes
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneChoice {
    /// Ground plus a grid of small random spheres, the diffuse ones in motion
    BouncingSpheres,
    /// Two large checkered spheres
    CheckeredSpheres,
    /// An image-textured globe
    Earth,
    /// Ground plus a single metal sphere
    Simple,
}

#[derive(Parser, Debug)]
#[command(name = "lumen")]
#[command(about = "Render sphere scenes with a Monte Carlo path tracer")]
pub struct Args {
    /// Built-in scene to render
    #[arg(long, value_enum, default_value = "bouncing-spheres")]
    pub scene: SceneChoice,

    /// Load the scene from a JSON file instead of a built-in one
    #[arg(long, conflicts_with = "scene")]
    pub scene_file: Option<PathBuf>,

    /// Image used by the earth scene
    #[arg(long, default_value = "earthmap.png")]
    pub earth_texture: PathBuf,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Samples per pixel
    #[arg(long, short = 's')]
    pub samples: Option<u32>,

    /// Maximum number of ray bounces
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Seed for scene generation and sampling
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Worker threads; 1 renders serially, 0 uses every core
    #[arg(long, short = 'j', default_value_t = 1)]
    pub threads: usize,

    /// Output file (.ppm or .png)
    #[arg(short, long, default_value = "image.ppm")]
    pub output: PathBuf,

    /// Logging level; RUST_LOG still applies per module
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

/// Initialize the logger with the given level
pub fn init_logger(level: LevelFilter) {
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}
