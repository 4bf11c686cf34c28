#![deny(unsafe_code)]

mod animation;
mod autostart;
mod calendar;
mod cli;
mod config;
mod constants;
mod gui;
mod notification;
mod persistence;
mod state;
mod theme;
mod todo;
mod types;
mod urls;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::FmtSubscriber;

use config::Settings;
use persistence::DataDir;
use state::AppData;
use urls::SystemOpener;

/// Desktop widget with a URL launcher, todo list and calendar
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Run the text menu instead of the window
    #[arg(long)]
    cli: bool,

    /// Directory holding todos.json, urls.json and settings.json
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace); overrides the saved setting
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

fn init_logging(level: &str) -> Result<()> {
    let level = config::parse_level(level).unwrap_or(tracing::Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Whether a graphical session is reachable
fn display_available() -> bool {
    if cfg!(all(unix, not(target_os = "macos"))) {
        ["DISPLAY", "WAYLAND_DISPLAY"]
            .iter()
            .any(|var| std::env::var_os(var).is_some_and(|v| !v.is_empty()))
    } else {
        true
    }
}

fn open_data(data_dir: &DataDir) -> Result<AppData> {
    let settings = Settings::load(&data_dir.settings());
    AppData::open(data_dir.clone(), settings, AppData::platform_autostart())
}

fn run_cli(mut data: AppData) -> Result<()> {
    let settings_path = data.data_dir.settings();
    let mut opener = SystemOpener;
    let ctx = cli::Context {
        todos: &mut data.todos,
        urls: &mut data.urls,
        settings: &mut data.settings,
        settings_path: &settings_path,
        autostart: data.autostart.as_ref(),
        opener: &mut opener,
    };
    let stdin = std::io::stdin();
    cli::run(ctx, stdin.lock(), std::io::stdout())
}

fn main() -> Result<()> {
    let args = Cli::parse();
    let data_dir = DataDir::resolve(args.data_dir);

    // Settings carry the saved log level, so they are read before logging starts
    let settings = Settings::load(&data_dir.settings());
    let level = args.log_level.as_deref().unwrap_or(&settings.log_level);
    init_logging(level)?;
    info!(version = env!("CARGO_PKG_VERSION"), "Starting sticky-widget");

    let data = AppData::open(data_dir.clone(), settings, AppData::platform_autostart())?;

    if args.cli {
        return run_cli(data);
    }
    if !display_available() {
        warn!("No display found, falling back to the text menu");
        return run_cli(data);
    }

    if let Err(e) = gui::run_gui(data) {
        error!(error = %e, "GUI failed, falling back to the text menu");
        // The window may have taken the stores with it; reload from disk
        return run_cli(open_data(&data_dir)?);
    }
    Ok(())
}
