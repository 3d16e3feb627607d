mod display;
mod keyboard;

use std::fs::File;
use std::io::{stdout, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};

use rover_mission::assets::{default_assets_dir, load_visuals, AssetStore, FsAssetLoader};
use rover_mission::clock::{Clock, SystemClock};
use rover_mission::config::GameConfig;
use rover_mission::game_loop;
use rover_mission::session::GameSession;

use display::TerminalPresenter;
use keyboard::KeyboardInput;

#[derive(Parser)]
#[command(name = "rover_mission")]
#[command(about = "Drive a rover across the crater, collect science targets, avoid hazards")]
struct Args {
    /// TOML file overriding gameplay tuning
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for reproducible target and hazard layouts
    #[arg(long)]
    seed: Option<u64>,

    /// Mission length in seconds (overrides the config file)
    #[arg(long)]
    duration: Option<f32>,

    /// Directory holding background.txt and rover.txt
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Where log output goes; the terminal itself is busy drawing the game
    #[arg(long, default_value = "rover_mission.log")]
    log_file: PathBuf,
}

fn init_tracing(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
    Ok(())
}

fn load_config(args: &Args) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(duration) = args.duration {
        config.mission_duration_seconds = duration;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Leaves raw mode and the alternate screen on drop.
#[derive(Default)]
struct TerminalGuard {
    keyboard_enhanced: bool,
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = stdout();
        if self.keyboard_enhanced {
            let _ = out.execute(PopKeyboardEnhancementFlags);
        }
        let _ = out.execute(cursor::Show);
        let _ = out.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();
    let args = Args::parse();
    init_tracing(&args.log_file)?;

    let config = load_config(&args)?;
    tracing::info!(?config, "configuration loaded");

    let mut store = AssetStore::default();
    let assets_dir = args.assets.clone().unwrap_or_else(default_assets_dir);
    let visuals = load_visuals(&FsAssetLoader, &mut store, &assets_dir, &config);

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode().context("enabling raw mode")?;
    // From here on the terminal is restored when `guard` drops, early
    // returns included.
    let mut guard = TerminalGuard::default();
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Terminals without the kitty protocol fall back to the hold window.
    guard.keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the frame loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let mut clock = SystemClock::new();
    let mut session = GameSession::new(config, visuals.rover, args.seed, clock.now_ms());
    let mut input = KeyboardInput::new(rx);
    let mut presenter = TerminalPresenter::new(out, store, visuals.background);

    let result = game_loop::run(&mut session, &mut clock, &mut input, &mut presenter, None);

    drop(guard);

    let summary = result.context("terminal output failed")?;
    tracing::info!(
        frames = summary.frames,
        final_score = session.score(),
        "exited"
    );
    Ok(())
}
