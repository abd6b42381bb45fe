use anyhow::{Context, Result};
use anyo_flappy::config::{Args, Config};
use anyo_flappy::input::{self, Action};
use anyo_flappy::notify::Toasts;
use anyo_flappy::render::Renderer;
use anyo_flappy::sound::{Effect, Sound};
use anyo_flappy::store::{FileStore, HighScoreStore, MemoryStore};
use anyo_flappy::{Game, Phase};
use clap::Parser;
use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute, terminal,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs::File;
use std::io::{self, Write, stdout};
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing_subscriber::filter::EnvFilter;

/// `RUST_LOG` when it parses, `info` otherwise.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Logs go to a file when asked for; the terminal belongs to the game.
fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(
            std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref(),
        ))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn open_store(config: &Config) -> Box<dyn HighScoreStore> {
    if let Some(path) = &config.high_score_file {
        return Box::new(FileStore::new(path));
    }
    match FileStore::in_data_dir() {
        Ok(store) => {
            tracing::info!("high score file {}", store.path().display());
            Box::new(store)
        }
        Err(err) => {
            tracing::warn!("high score will not persist: {:#}", err);
            Box::new(MemoryStore::default())
        }
    }
}

fn open_sound(config: &Config) -> Option<Sound> {
    if config.mute {
        return None;
    }
    match Sound::open() {
        Ok(sound) => Some(sound),
        Err(err) => {
            tracing::warn!("sound disabled: {:#}", err);
            None
        }
    }
}

fn run(out: &mut impl Write, config: &Config, game: &mut Game, sound: Option<&Sound>) -> Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut renderer = Renderer::new(cols, rows);
    game.resize(Renderer::field_width(cols, rows, config.tuning.field_height));
    let mut toasts = Toasts::new();
    let clock = Instant::now();

    loop {
        let frame_start = Instant::now();
        let now = clock.elapsed();

        // Input
        while event::poll(Duration::ZERO)? {
            let Some(action) = input::map_event(&event::read()?) else {
                continue;
            };
            match action {
                Action::Quit => return Ok(()),
                Action::Jump => game.jump(now),
                Action::Start => {
                    if game.phase() != Phase::Running {
                        game.start();
                    }
                }
                Action::Resize { cols, rows } => {
                    renderer.resize(cols, rows);
                    game.resize(Renderer::field_width(cols, rows, config.tuning.field_height));
                }
            }
        }

        // Update
        game.frame(now);
        for event in game.drain_events() {
            toasts.on_event(&event, now);
            if let (Some(sound), Some(effect)) = (sound, Effect::for_event(&event)) {
                sound.play(effect);
            }
        }
        toasts.expire(now);

        // Render
        renderer.draw(game, &toasts, now);
        renderer.present(out)?;

        // Frame pacing
        let elapsed = frame_start.elapsed();
        if elapsed < config.frame_duration {
            std::thread::sleep(config.frame_duration - elapsed);
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;
    let config = Config::from_args(args);

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut game = Game::new(config.tuning.clone(), 0.0, open_store(&config), rng);
    let sound = open_sound(&config);

    terminal::enable_raw_mode()?;
    let mut out = stdout();
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
        EnableMouseCapture,
    )?;

    let result = run(&mut out, &config, &mut game, sound.as_ref());
    game.stop();

    let cleanup = |out: &mut io::Stdout| -> io::Result<()> {
        execute!(
            out,
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        )?;
        terminal::disable_raw_mode()
    };
    cleanup(&mut out)?;
    result
}
