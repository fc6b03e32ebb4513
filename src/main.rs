use std::collections::HashMap;
use std::error::Error;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use clap::Parser;
use instant::Instant;

use chibi_pets::ecs::components::PetId;
use chibi_pets::error::AudioError;
use chibi_pets::host::{Assets, DirHost, Speaker, Sprite, Stage};
use chibi_pets::page::{DomSnapshot, Page};
use chibi_pets::{logging, App, Config, FrameOutcome};

/// Target frame rate (seconds per frame).
const TICK_RATE: f64 = 1.0 / 60.0;
/// Max accumulated time before we clamp (prevents spiral of death).
const MAX_ACCUMULATOR: f64 = 0.25;
/// How often to log frame stats (seconds).
const STATS_LOG_INTERVAL: f64 = 5.0;
/// Frames between config file checks.
const CONFIG_POLL_FRAMES: u64 = 60;
/// Assumed clip length for the logging speaker, in frames.
const CLIP_FRAMES: u64 = 90;

/// Run the pets headless against a page snapshot
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Page snapshot (JSON)
    #[arg(long)]
    page: PathBuf,

    /// Config file (JSON); reloaded when it changes
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of frames to run
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Base directory or URL for character assets
    #[arg(long, default_value = "assets")]
    assets: String,

    /// Don't pace frames at 60 Hz
    #[arg(long)]
    fast: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    logging::init(args.verbose);
    log::info!("chibi-pets starting up");

    if let Err(e) = run(args) {
        log::error!("Fatal error: {e}");
        let mut source = e.source();
        while let Some(cause) = source {
            log::error!("  caused by: {cause}");
            source = cause.source();
        }
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let page = DomSnapshot::load(&args.page)?;
    log::info!(
        "page {}{} ({} elements, viewport {})",
        page.hostname(),
        page.path(),
        page.len(),
        page.viewport()
    );

    let assets = Assets::new(Box::new(DirHost::new(args.assets.clone())));
    let mut app = match args.seed {
        Some(seed) => App::with_seed(assets, seed),
        None => App::new(assets),
    };

    let mut stage = LogStage::default();
    let mut speaker = LogSpeaker::default();

    let mut watcher = args.config.clone().map(ConfigWatcher::new);
    let config = match watcher.as_mut() {
        Some(w) => w.load()?,
        None => Config::default(),
    };
    app.apply_config(config, &mut stage, &mut speaker);

    let mut stats = FrameStats::new();
    let mut last_frame_time = Instant::now();
    let mut accumulator = 0.0;
    let mut frame = 0;

    while frame < args.frames {
        if !args.fast {
            let now = Instant::now();
            accumulator += now.duration_since(last_frame_time).as_secs_f64();
            last_frame_time = now;
            accumulator = accumulator.min(MAX_ACCUMULATOR);
            if accumulator < TICK_RATE {
                std::thread::sleep(Duration::from_secs_f64(TICK_RATE - accumulator));
                continue;
            }
            accumulator -= TICK_RATE;
        }

        if frame > 0 && frame % CONFIG_POLL_FRAMES == 0 {
            if let Some(config) = watcher.as_mut().and_then(ConfigWatcher::poll) {
                app.apply_config(config, &mut stage, &mut speaker);
            }
        }

        let started = Instant::now();
        speaker.advance();
        let outcome = app.frame(&page, &mut stage, &mut speaker);
        stats.record_frame(started.elapsed().as_secs_f64(), app.pet_count());
        frame += 1;

        if outcome == FrameOutcome::Stop {
            log::info!("host context lost, stopping at frame {frame}");
            break;
        }
    }

    log::info!("ran {} frames, {} ticks", frame, app.tick_count());
    println!("{}", serde_json::to_string_pretty(&app.snapshot())?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Config reload
// ---------------------------------------------------------------------------

struct ConfigWatcher {
    path: PathBuf,
    modified: Option<SystemTime>,
}

impl ConfigWatcher {
    fn new(path: PathBuf) -> Self {
        Self { path, modified: None }
    }

    fn mtime(&self) -> Option<SystemTime> {
        std::fs::metadata(&self.path).and_then(|m| m.modified()).ok()
    }

    fn load(&mut self) -> Result<Config, chibi_pets::error::LoadError> {
        self.modified = self.mtime();
        Config::load(&self.path)
    }

    /// A fresh config if the file changed since the last load. A broken
    /// edit keeps the current config.
    fn poll(&mut self) -> Option<Config> {
        let modified = self.mtime();
        if modified.is_none() || modified == self.modified {
            return None;
        }
        match self.load() {
            Ok(config) => {
                log::info!("config reloaded from {}", self.path.display());
                Some(config)
            }
            Err(e) => {
                log::warn!("{e}, keeping current config");
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Frame timing
// ---------------------------------------------------------------------------

struct FrameStats {
    frame_count: u64,
    last_log_time: Instant,
    frame_time_sum: f64,
    frame_time_max: f64,
    frames_since_log: u32,
}

impl FrameStats {
    fn new() -> Self {
        Self {
            frame_count: 0,
            last_log_time: Instant::now(),
            frame_time_sum: 0.0,
            frame_time_max: 0.0,
            frames_since_log: 0,
        }
    }

    fn record_frame(&mut self, dt: f64, pets: usize) {
        self.frame_count += 1;
        self.frames_since_log += 1;
        self.frame_time_sum += dt;
        self.frame_time_max = self.frame_time_max.max(dt);

        let elapsed = self.last_log_time.elapsed().as_secs_f64();
        if elapsed >= STATS_LOG_INTERVAL {
            let avg_us = (self.frame_time_sum / self.frames_since_log as f64) * 1e6;
            let fps = self.frames_since_log as f64 / elapsed;
            log::info!(
                "FPS: {:.0} | frame avg: {:.1}us | max: {:.1}us | pets: {} | total frames: {}",
                fps,
                avg_us,
                self.frame_time_max * 1e6,
                pets,
                self.frame_count,
            );
            self.last_log_time = Instant::now();
            self.frame_time_sum = 0.0;
            self.frame_time_max = 0.0;
            self.frames_since_log = 0;
        }
    }
}

// ---------------------------------------------------------------------------
// Logging collaborators
// ---------------------------------------------------------------------------

/// Logs image changes instead of drawing.
#[derive(Default)]
struct LogStage {
    images: HashMap<PetId, String>,
}

impl Stage for LogStage {
    fn show(&mut self, id: PetId, sprite: &Sprite<'_>) {
        let changed = self.images.get(&id).map_or(true, |url| url != sprite.image_url);
        if changed {
            log::debug!("{:?} shows {} at {}", id, sprite.image_url, sprite.transform.translate);
            self.images.insert(id, sprite.image_url.to_string());
        }
    }

    fn hide(&mut self, id: PetId) {
        if self.images.remove(&id).is_some() {
            log::debug!("{:?} hidden", id);
        }
    }

    fn release(&mut self, id: PetId) {
        self.images.remove(&id);
    }
}

/// Pretends every clip lasts `CLIP_FRAMES`.
#[derive(Default)]
struct LogSpeaker {
    frame: u64,
    playing_until: HashMap<PetId, u64>,
}

impl LogSpeaker {
    fn advance(&mut self) {
        self.frame += 1;
        let now = self.frame;
        self.playing_until.retain(|_, until| *until > now);
    }
}

impl Speaker for LogSpeaker {
    fn play(&mut self, id: PetId, url: &str) -> Result<(), AudioError> {
        log::debug!("{:?} plays {}", id, url);
        self.playing_until.insert(id, self.frame + CLIP_FRAMES);
        Ok(())
    }

    fn is_playing(&self, id: PetId) -> bool {
        self.playing_until.contains_key(&id)
    }

    fn release(&mut self, id: PetId) {
        self.playing_until.remove(&id);
    }
}
