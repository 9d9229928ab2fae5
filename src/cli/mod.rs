use std::path::PathBuf;

use crate::food::Difficulty;

#[derive(clap::Parser)]
#[command(version, about = "A ten-round food trivia game with an AI head chef")]
pub struct Cli {
    /// Config file, overriding `$GOURMET_QUEST_TOML`.
    #[arg(long, env = "GOURMET_QUEST_TOML")]
    pub config: Option<PathBuf>,

    /// Name recorded on the leaderboard.
    #[arg(long)]
    pub nickname: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    pub fn action(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Play { difficulty: None })
    }
}

#[derive(clap::Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Play in the terminal.
    Play {
        /// Skip the start screen and begin at this difficulty.
        #[arg(long, value_enum)]
        difficulty: Option<Difficulty>,
    },

    /// Print the leaderboard and exit.
    Ranking,

    /// Print the loaded config and exit.
    Config,
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;

    use super::{Cli, Command};
    use crate::food::Difficulty;

    #[test]
    fn defaults_to_play() {
        let cli = Cli::parse_from(["gourmet-quest"]);
        assert_eq!(cli.action(), Command::Play { difficulty: None });
        assert!(cli.nickname.is_none());
    }

    #[test]
    fn play_takes_a_difficulty() {
        let cli = Cli::parse_from([
            "gourmet-quest",
            "--nickname",
            "remy",
            "play",
            "--difficulty",
            "hard",
        ]);
        assert_eq!(
            cli.action(),
            Command::Play {
                difficulty: Some(Difficulty::Hard)
            }
        );
        assert_eq!(cli.nickname.as_deref(), Some("remy"));
    }
}
