use crate::food::Difficulty;

/// What the player typed on the start screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuCommand {
    Start(Difficulty),
    Ranking,
    Name(String),
    Quit,
    Unknown(String),
}

impl MenuCommand {
    /// A blank line starts a game at `default`.
    pub fn parse(line: &str, default: Difficulty) -> Self {
        let line = line.trim();

        if line.is_empty() {
            return Self::Start(default);
        }

        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(word, rest)| (word, rest.trim()));

        match word.to_lowercase().as_str() {
            "ranking" | "rank" | "leaderboard" => Self::Ranking,
            "quit" | "exit" | "q" => Self::Quit,
            "name" if !rest.is_empty() => Self::Name(rest.to_owned()),
            _ => line
                .parse()
                .map_or_else(|_| Self::Unknown(line.to_owned()), Self::Start),
        }
    }
}
