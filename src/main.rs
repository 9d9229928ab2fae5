#![warn(clippy::perf)]
#![warn(clippy::unwrap_used)]

mod cli;

mod food;

mod framework;

mod frontend;

/// Round state machine, sessions and pre-fetching.
mod game;

mod leaderboard;

/// Talking to the generative model.
mod service;

use std::sync::Arc;

use clap::Parser;
use tokio::io::BufReader;
#[allow(unused_imports)]
use tracing::{debug, info, trace};
use tracing_unwrap::ResultExt;

use cli::{Cli, Command};
use framework::Config;
use frontend::Terminal;
use game::RoundController;
use leaderboard::{JsonFile, LeaderboardStore};
use service::Gemini;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    framework::logging::init_tracing();

    info!("gourmet quest {}", env!("CARGO_PKG_VERSION"));

    let config = Config::load(cli.config.as_deref()).expect_or_log("config should load");

    if let Some(flavor_text) = config.logs.flavor_text() {
        info!("{flavor_text}");
    }

    let store = JsonFile::new(config.leaderboard.file());

    match cli.action() {
        Command::Config => println!("{config:#?}"),
        Command::Ranking => {
            let leaderboard = store.load().await;
            for line in frontend::ranking_lines(&leaderboard) {
                println!("{line}");
            }
        }
        Command::Play { difficulty } => {
            let service = Gemini::new(&config.service).expect_or_log("service client should build");

            let mut game =
                RoundController::new(Arc::new(service), store, config.game.total_rounds).await;

            if let Some(nickname) = cli.nickname.or(config.game.nickname) {
                game.set_nickname(nickname);
            }

            let mut terminal = Terminal::new(
                game,
                BufReader::new(tokio::io::stdin()),
                tokio::io::stdout(),
            )
            .default_difficulty(config.game.difficulty)
            .quick_start(difficulty)
            .images_dir(config.frontend.images_dir);

            terminal.run().await.expect_or_log("terminal should stay readable");

            debug!(score = terminal.game().score(), "bye");
        }
    }
}
