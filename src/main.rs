mod ai;
mod game;
mod i18n;
mod storage;
mod ui;

use std::path::PathBuf;

use clap::Parser;
use gtk4::prelude::*;
use gtk4::Application;
use tracing_subscriber::EnvFilter;

use ui::app::LaunchOptions;

/// Tic Tac Toe against a bot that plays random moves.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// Seed for the bot's choices, for reproducible games.
    #[arg(long)]
    seed: Option<u64>,

    /// Pause before the bot answers, in milliseconds (overrides saved settings).
    #[arg(long)]
    bot_delay_ms: Option<u64>,

    /// Disable sound cues for this run.
    #[arg(long)]
    mute: bool,

    /// Directory holding images, sounds and translations.
    #[arg(long)]
    resources: Option<PathBuf>,
}

fn main() -> glib::ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let opts = LaunchOptions {
        resources_dir: cli.resources.unwrap_or_else(find_resources_dir),
        seed: cli.seed,
        bot_delay_ms: cli.bot_delay_ms,
        mute: cli.mute,
    };
    tracing::debug!(?opts, "launch options");

    let app = Application::builder()
        .application_id("io.github.tictacbot.TicTacBot")
        .build();

    app.connect_activate(move |app| {
        ui::app::build_ui(app, &opts);
    });

    // Flags were consumed by clap; GTK only sees the program name.
    let argv0: Vec<String> = std::env::args().take(1).collect();
    app.run_with_args(&argv0)
}

/// Locate the `resources/` directory.
fn find_resources_dir() -> PathBuf {
    let candidates = [
        // cargo run from project root
        std::env::current_dir().ok().map(|d| d.join("resources")),
        // next to executable
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|d| d.join("resources"))),
    ];

    candidates
        .into_iter()
        .flatten()
        .find(|c| c.is_dir())
        .unwrap_or_else(|| PathBuf::from("resources"))
}
