//! Line-based terminal screens over a [`RoundController`].

use std::path::PathBuf;

use rand::seq::SliceRandom;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tracing::{debug, warn};

use crate::{
    food::Difficulty,
    game::{Error as GameError, GameState, GuessOutcome, RoundController},
    leaderboard::{Leaderboard, LeaderboardStore, ANONYMOUS_NAME},
    service::FoodService,
};

mod command;
pub use command::MenuCommand;

mod image;

const LOADING_MESSAGES: [&str; 5] = [
    "Following a delicious smell...",
    "Finishing the dish with fresh ingredients.",
    "Plating it up with love.",
    "Unfolding the world map of great restaurants.",
    "The head chef is adding the secret sauce.",
];

type Result<T = bool> = std::io::Result<T>;

/// One line per entry, best first.
pub fn ranking_lines(leaderboard: &Leaderboard) -> Vec<String> {
    if leaderboard.is_empty() {
        return vec!["No legends yet.".to_owned()];
    }

    leaderboard
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let medal = if index == 0 { "👑" } else { "  " };
            format!(
                "{medal} {rank:>2}. {name:<20} {score:>2}  {difficulty:<6} {date}",
                rank = index + 1,
                name = entry.name,
                score = entry.score,
                difficulty = entry.difficulty,
                date = entry.date,
            )
        })
        .collect()
}

pub struct Terminal<S, L, R, W> {
    game: RoundController<S, L>,
    input: Lines<R>,
    output: W,
    default_difficulty: Difficulty,
    quick_start: Option<Difficulty>,
    images_dir: Option<PathBuf>,
    shown_round: Option<u32>,
}

impl<S, L, R, W> Terminal<S, L, R, W>
where
    S: FoodService,
    L: LeaderboardStore,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(game: RoundController<S, L>, input: R, output: W) -> Self {
        Self {
            game,
            input: input.lines(),
            output,
            default_difficulty: Difficulty::default(),
            quick_start: None,
            images_dir: None,
            shown_round: None,
        }
    }

    pub fn default_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.default_difficulty = difficulty;
        self
    }

    /// Skips the start screen for the first game.
    pub fn quick_start(mut self, difficulty: Option<Difficulty>) -> Self {
        self.quick_start = difficulty;
        self
    }

    pub fn images_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.images_dir = dir;
        self
    }

    pub const fn game(&self) -> &RoundController<S, L> {
        &self.game
    }

    pub const fn output(&self) -> &W {
        &self.output
    }

    async fn say(&mut self, text: impl AsRef<str>) -> Result<()> {
        self.output.write_all(text.as_ref().as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        self.output.flush().await
    }

    /// `None` once input is closed.
    async fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        self.output.write_all(prompt.as_bytes()).await?;
        self.output.flush().await?;

        let line = self.input.next_line().await?;

        if self.game.poll_prefetch() {
            debug!("next dish is ready");
        }

        Ok(line)
    }

    async fn loading(&mut self) -> Result<()> {
        let message = LOADING_MESSAGES
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or_default();

        self.say(format!("🍳 {message}")).await
    }

    /// Runs screens until the player quits or input ends.
    pub async fn run(&mut self) -> Result<()> {
        self.say(format!(
            "GOURMET QUEST: a {}-round challenge for gourmets",
            self.game.total_rounds()
        ))
        .await?;

        if let Some(difficulty) = self.quick_start.take() {
            self.start(difficulty).await?;
        }

        loop {
            let keep_going = match self.game.state() {
                GameState::Idle => self.start_screen().await?,
                GameState::Ranking => self.ranking_screen().await?,
                GameState::Playing => self.playing_screen().await?,
                GameState::Result => self.result_screen().await?,
                GameState::Finished => self.finished_screen().await?,
                GameState::Loading => {
                    warn!("controller left in loading state");
                    false
                }
            };

            if !keep_going {
                return Ok(());
            }
        }
    }

    async fn report(&mut self, err: &GameError) -> Result<()> {
        match err {
            GameError::Generation(_) => {
                self.say("The kitchen couldn't prepare a dish. Back to the start - try again!")
                    .await
            }
            GameError::InvalidTransition(err) => self.say(format!("⚠️ {err}")).await,
        }
    }

    async fn start(&mut self, difficulty: Difficulty) -> Result<()> {
        self.shown_round = None;
        self.loading().await?;

        if let Err(err) = self.game.start_game(difficulty).await {
            self.report(&err).await?;
        }

        Ok(())
    }

    async fn start_screen(&mut self) -> Result {
        self.say(format!(
            "\nPick a difficulty (easy, medium, hard - enter for {}), `ranking`, `name <nickname>` or `quit`.",
            self.default_difficulty.label()
        ))
        .await?;

        let Some(line) = self.ask("> ").await? else {
            return Ok(false);
        };

        match MenuCommand::parse(&line, self.default_difficulty) {
            MenuCommand::Start(difficulty) => self.start(difficulty).await?,
            MenuCommand::Ranking => {
                if let Err(err) = self.game.show_ranking() {
                    self.report(&err).await?;
                }
            }
            MenuCommand::Name(name) => {
                self.say(format!("Hello, {name}!")).await?;
                self.game.set_nickname(name);
            }
            MenuCommand::Quit => return Ok(false),
            MenuCommand::Unknown(text) => {
                self.say(format!("I don't know what `{text}` means.")).await?;
            }
        }

        Ok(true)
    }

    async fn ranking_screen(&mut self) -> Result {
        self.say("\n🏆 Hall of fame").await?;
        for line in ranking_lines(self.game.leaderboard()) {
            self.say(line).await?;
        }

        if self.ask("(enter to go back) ").await?.is_none() {
            return Ok(false);
        }

        if let Err(err) = self.game.close_ranking() {
            self.report(&err).await?;
        }

        Ok(true)
    }

    async fn playing_screen(&mut self) -> Result {
        let Some(food) = self.game.current_food().cloned() else {
            warn!("playing without a dish");
            return Ok(false);
        };

        let round = self.game.round();

        if self.shown_round != Some(round) {
            self.shown_round = Some(round);

            self.say(format!(
                "\nRound {round}/{total} ({difficulty}) - score {score}",
                total = self.game.total_rounds(),
                difficulty = self.game.difficulty().label(),
                score = self.game.score(),
            ))
            .await?;
            self.say(food.description()).await?;

            if let (Some(dir), Some(url)) = (self.images_dir.clone(), food.image()) {
                if let Some(path) = image::save(&dir, round, url).await {
                    self.say(format!("🖼️ {}", path.display())).await?;
                }
            }
        }

        let hint = self.game.hint().map(|hint| format!("💡 Chef's hint: {hint}"));
        let prompt = if let Some(hint) = hint {
            self.say(hint).await?;
            "Last chance! > "
        } else {
            "What is this dish? > "
        };

        let Some(guess) = self.ask(prompt).await? else {
            return Ok(false);
        };

        if !guess.trim().is_empty() {
            self.say("👨‍🍳 The chef is grading your answer...").await?;
        }

        match self.game.submit_guess(&guess).await {
            Ok(GuessOutcome::Empty) => self.say("Type a guess first.").await?,
            Ok(GuessOutcome::HintRevealed) => self.say("Not quite...").await?,
            Ok(GuessOutcome::Correct | GuessOutcome::Missed) => (),
            Err(err) => self.report(&err).await?,
        }

        Ok(true)
    }

    async fn result_screen(&mut self) -> Result {
        let correct = self
            .game
            .last_result()
            .is_some_and(|result| result.is_correct());
        let feedback = self
            .game
            .last_result()
            .map(|result| result.feedback().to_owned())
            .unwrap_or_default();
        let name = self
            .game
            .current_food()
            .map(|food| food.name().to_owned())
            .unwrap_or_default();

        if correct {
            self.say("🌟 A genius palate!").await?;
        } else {
            self.say("🍛 So close!").await?;
        }
        self.say(format!("It was {name}. {feedback}")).await?;

        let last = self.game.round() >= self.game.total_rounds();
        let prompt = if last {
            "(enter for your final score) "
        } else {
            "(enter for the next round) "
        };

        if self.ask(prompt).await?.is_none() {
            return Ok(false);
        }

        if !last {
            self.loading().await?;
        }

        if let Err(err) = self.game.advance().await {
            self.report(&err).await?;
        }

        Ok(true)
    }

    async fn finished_screen(&mut self) -> Result {
        let nickname = match self.game.nickname().trim() {
            "" => ANONYMOUS_NAME.to_owned(),
            name => name.to_owned(),
        };

        self.say(format!(
            "\n🏅 The challenge is over! {nickname} ({difficulty}) scored {score}/{total}.",
            difficulty = self.game.difficulty().label(),
            score = self.game.score(),
            total = self.game.total_rounds(),
        ))
        .await?;

        if let Some(rating) = self.game.rating() {
            self.say(rating.message()).await?;
        }

        let again = self
            .ask("Play again? [y/N] ")
            .await?
            .is_some_and(|answer| answer.trim().eq_ignore_ascii_case("y"));

        if again {
            if let Err(err) = self.game.restart() {
                self.report(&err).await?;
            }
        }

        Ok(again)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{ranking_lines, Terminal};
    use crate::{
        food::Difficulty,
        game::{GameState, RoundController},
        leaderboard::{Leaderboard, LeaderboardEntry, Memory},
        service::mock::MockService,
    };
    use pretty_assertions::assert_eq;
    use tokio::io::BufReader;

    type Screen = Terminal<MockService, Memory, BufReader<&'static [u8]>, Vec<u8>>;

    async fn play(script: &'static str, service: MockService) -> Screen {
        let game = RoundController::new(Arc::new(service), Memory::default(), 2).await;
        let mut terminal = Terminal::new(game, BufReader::new(script.as_bytes()), Vec::new())
            .default_difficulty(Difficulty::Easy);

        terminal.run().await.expect("in-memory io can't fail");
        terminal
    }

    fn printed(terminal: &Screen) -> String {
        String::from_utf8_lossy(terminal.output()).into_owned()
    }

    #[tokio::test]
    async fn scripted_game_reaches_the_leaderboard() {
        let terminal = play(
            "name chef\n\nfood-0\n\n\nwrong\nwrong again\n\nn\n",
            MockService::new(),
        )
        .await;
        let output = printed(&terminal);

        assert!(output.contains("Hello, chef!"));
        assert!(output.contains("Round 1/2 (easy)"));
        assert!(output.contains("🌟 A genius palate!"));
        assert!(output.contains("It was food-0."));
        assert!(output.contains("Type a guess first."));
        // once per non-blank guess: food-0, wrong, wrong again
        assert_eq!(output.matches("The chef is grading your answer").count(), 3);
        assert!(output.contains("💡 Chef's hint:"));
        assert!(output.contains("chef (easy) scored 1/2."));

        let game = terminal.game();
        assert_eq!(game.state(), GameState::Finished);

        let entries: Vec<_> = game.leaderboard().iter().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "chef");
        assert_eq!(entries[0].score, 1);
        assert_eq!(entries[0].difficulty, Difficulty::Easy);
    }

    #[test]
    fn ranking_lines_put_the_best_first() {
        let mut leaderboard = Leaderboard::new();
        assert_eq!(ranking_lines(&leaderboard), vec!["No legends yet.".to_owned()]);

        leaderboard.insert(LeaderboardEntry::today("remy", 4, Difficulty::Easy));
        leaderboard.insert(LeaderboardEntry::today("colette", 9, Difficulty::Hard));

        let lines = ranking_lines(&leaderboard);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("👑  1. colette"));
        assert!(lines[0].contains(" 9  HARD  "));
        assert!(lines[1].contains("remy"));
    }

    #[tokio::test]
    async fn ranking_and_unknown_commands() {
        let terminal = play("ranking\n\ndance\nquit\n", MockService::new()).await;
        let output = printed(&terminal);

        assert!(output.contains("No legends yet."));
        assert!(output.contains("I don't know what `dance` means."));
        assert_eq!(terminal.game().state(), GameState::Idle);
    }

    #[tokio::test]
    async fn failed_load_returns_to_the_menu() {
        let terminal = play("hard\nquit\n", MockService::new().fail_generation(0)).await;
        let output = printed(&terminal);

        assert!(output.contains("The kitchen couldn't prepare a dish."));
        assert_eq!(terminal.game().state(), GameState::Idle);
    }

    #[tokio::test]
    async fn quick_start_skips_the_menu() {
        let game = RoundController::new(Arc::new(MockService::new()), Memory::default(), 2).await;
        let mut terminal = Terminal::new(game, BufReader::new(&b""[..]), Vec::new())
            .quick_start(Some(Difficulty::Hard));

        terminal.run().await.expect("in-memory io can't fail");

        assert!(printed(&terminal).contains("Round 1/2 (hard)"));
        assert!(!printed(&terminal).contains("Pick a difficulty"));
        assert_eq!(terminal.game().state(), GameState::Playing);
    }

    #[tokio::test]
    async fn closed_input_ends_the_game() {
        let terminal = play("medium\n", MockService::new()).await;

        assert_eq!(terminal.game().state(), GameState::Playing);
        assert_eq!(terminal.game().difficulty(), Difficulty::Medium);
    }
}
