mod app;
mod components;
mod config;
mod error;
mod event;
mod fs;
mod handler;
mod nav;
mod tui;
mod ui;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use tracing::{info, Level};

use crate::app::App;
use crate::config::{AppConfig, GeneralConfig, LogConfig};
use crate::error::{AppError, Result};
use crate::event::{Event, EventHandler};
use crate::fs::source::LocalFs;
use crate::nav::orchestrator::Navigator;
use crate::tui::{install_panic_hook, Tui};

/// A dual-pane terminal file browser.
#[derive(Parser, Debug)]
#[command(name = "dpfm", version, about)]
struct Cli {
    /// Starting directory of the left pane (defaults to current directory)
    left: Option<PathBuf>,

    /// Starting directory of the right pane (defaults to the left one)
    right: Option<PathBuf>,

    /// Path to a config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Show hidden files
    #[arg(short = 'a', long)]
    all: bool,

    /// Disable mouse capture
    #[arg(long)]
    no_mouse: bool,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level: error, warn, info, debug or trace
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    /// Flags that were given, as a partial config laid over the files.
    fn overrides(&self) -> AppConfig {
        let as_string = |p: &Option<PathBuf>| p.as_ref().map(|p| p.display().to_string());
        AppConfig {
            general: GeneralConfig {
                left_path: as_string(&self.left),
                right_path: as_string(&self.right),
                show_hidden: self.all.then_some(true),
                mouse: self.no_mouse.then_some(false),
            },
            log: LogConfig {
                level: self.log_level.clone(),
                file: as_string(&self.log_file),
            },
            ..AppConfig::default()
        }
    }
}

fn init_logging(config: &AppConfig) -> Result<()> {
    let Some(path) = config.log_file() else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    let level = config.log_level().parse::<Level>().unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .init();
    Ok(())
}

fn start_dir(configured: Option<PathBuf>, fallback: &Path) -> PathBuf {
    configured
        .and_then(|p| p.canonicalize().ok())
        .unwrap_or_else(|| fallback.to_path_buf())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));
    init_logging(&config)?;

    let cwd = std::env::current_dir()
        .and_then(|p| p.canonicalize())
        .map_err(|e| AppError::InvalidPath(format!("current directory: {e}")))?;
    let left = start_dir(config.left_path(), &cwd);
    let right = start_dir(config.right_path(), &left);

    let mut events = EventHandler::new(Duration::from_millis(250));
    let mut navigator = Navigator::new(Arc::new(LocalFs), events.sender());
    let options = config.pane_options();
    let left_id = navigator.open_pane(&left, options)?;
    navigator.open_pane(&right, options)?;
    let mut app = App::new(navigator, left_id);

    install_panic_hook();
    let mut tui = Tui::new(config.mouse_enabled())?;
    info!(left = %left.display(), right = %right.display(), "started");

    loop {
        tui.draw(&mut app)?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(&mut app, key),
            Event::Mouse(mouse) => handler::handle_mouse_event(&mut app, mouse),
            Event::Tick => app.clear_expired_status(),
            Event::Resize(_, _) => {}
            Event::DirLoaded(load) => app.handle_dir_loaded(load),
        }

        if app.should_quit {
            break;
        }
    }

    tui.restore()?;
    info!("stopped");
    Ok(())
}
