use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Physics and pacing constants for one match.
///
/// Distances are in world units: the play field is `field_height` units tall
/// and as wide as the terminal's aspect ratio allows.
#[derive(Debug, Clone, PartialEq)]
pub struct Tuning {
    pub gravity: f64,
    pub jump_impulse: f64,
    pub bird_size: f64,
    pub bird_x: f64,
    pub bird_start_y: f64,
    pub obstacle_width: f64,
    pub gap: f64,
    /// Smallest spike segment allowed above or below the gap.
    pub spawn_margin: f64,
    pub initial_speed: f64,
    pub speed_increment: f64,
    pub speed_cap: f64,
    /// Points between speed increases.
    pub points_per_level: u32,
    pub spawn_interval: Duration,
    /// World units an obstacle moves per tick at speed 1.0.
    pub scroll_factor: f64,
    pub rotation_gain: f64,
    pub rotation_min: f64,
    pub rotation_max: f64,
    pub flap_duration: Duration,
    pub field_height: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.6,
            jump_impulse: -12.0,
            bird_size: 50.0,
            bird_x: 100.0,
            bird_start_y: 300.0,
            obstacle_width: 80.0,
            gap: 200.0,
            spawn_margin: 50.0,
            initial_speed: 1.0,
            speed_increment: 0.02,
            speed_cap: 3.0,
            points_per_level: 5,
            spawn_interval: Duration::from_millis(1800),
            scroll_factor: 5.0,
            rotation_gain: 3.0,
            rotation_min: -30.0,
            rotation_max: 90.0,
            flap_duration: Duration::from_millis(300),
            field_height: 600.0,
        }
    }
}

impl Tuning {
    /// Smallest gap that still lets the bird through with room to spare.
    pub fn min_gap(&self) -> f64 {
        self.bird_size + 10.0
    }

    /// Largest gap that leaves a margin-sized spike on both sides.
    pub fn max_gap(&self) -> f64 {
        self.field_height - 2.0 * self.spawn_margin
    }
}

#[derive(Parser, Debug)]
#[command(name = "anyo-flappy")]
#[command(about = "Help the ANYO fly through obstacles!")]
pub struct Args {
    /// Target frames per second
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Seed for obstacle placement (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Disable sound effects
    #[arg(long)]
    pub mute: bool,

    /// Where the high score is kept (defaults to the platform data directory)
    #[arg(long)]
    pub high_score_file: Option<PathBuf>,

    /// Write logs to this file (filtered by RUST_LOG)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Vertical opening between the spikes, in world units
    #[arg(long)]
    pub gap: Option<f64>,
}

/// Settings resolved from the command line.
#[derive(Debug, Clone)]
pub struct Config {
    pub tuning: Tuning,
    pub frame_duration: Duration,
    pub seed: Option<u64>,
    pub mute: bool,
    pub high_score_file: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

const MIN_FPS: u32 = 10;
const MAX_FPS: u32 = 240;

impl Config {
    pub fn from_args(args: Args) -> Self {
        let mut tuning = Tuning::default();

        let fps = args.fps.clamp(MIN_FPS, MAX_FPS);
        if fps != args.fps {
            tracing::warn!("fps {} out of range, using {}", args.fps, fps);
        }

        if let Some(gap) = args.gap.filter(|g| {
            if !g.is_finite() {
                tracing::warn!("gap {} is not a number, using {}", g, tuning.gap);
            }
            g.is_finite()
        }) {
            let clamped = gap.clamp(tuning.min_gap(), tuning.max_gap());
            if clamped != gap {
                tracing::warn!("gap {} out of range, using {}", gap, clamped);
            }
            tuning.gap = clamped;
        }

        Self {
            tuning,
            frame_duration: Duration::from_secs_f64(1.0 / fps as f64),
            seed: args.seed,
            mute: args.mute,
            high_score_file: args.high_score_file,
            log_file: args.log_file,
        }
    }
}
