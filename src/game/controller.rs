use std::sync::Arc;

use thisslime::TracingError;
use tracing::{debug, error, info, instrument, warn};

use super::{
    Error, GameState, InvalidTransitionError, Prefetcher, Rating, Session,
    VERIFY_FAILED_FEEDBACK,
};
use crate::{
    food::{self, Difficulty, FoodItem, QuizResult},
    leaderboard::{Leaderboard, LeaderboardEntry, LeaderboardStore},
    service::{self, FoodService},
};

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    /// Blank input, nothing was sent.
    Empty,
    /// First miss; the hint is now visible and the round continues.
    HintRevealed,
    Correct,
    Missed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    NextRound,
    Finished,
}

/// Runs one game at a time: loads dishes, judges guesses, keeps score and
/// records finished games.
#[derive(Debug)]
pub struct RoundController<S, L> {
    service: Arc<S>,
    store: L,
    leaderboard: Leaderboard,

    state: GameState,
    session: Session,
    prefetch: Prefetcher,
    last_result: Option<QuizResult>,

    nickname: String,
    total_rounds: u32,
}

impl<S, L> RoundController<S, L>
where
    S: FoodService,
    L: LeaderboardStore,
{
    /// Reads the leaderboard from `store` once, up front.
    pub async fn new(service: Arc<S>, store: L, total_rounds: u32) -> Self {
        let leaderboard = store.load().await;
        debug!(entries = leaderboard.len(), "leaderboard loaded");

        Self {
            service,
            store,
            leaderboard,
            state: GameState::Idle,
            session: Session::new(Difficulty::default()),
            prefetch: Prefetcher::new(),
            last_result: None,
            nickname: String::new(),
            total_rounds: total_rounds.max(1),
        }
    }

    pub const fn state(&self) -> GameState {
        self.state
    }

    pub const fn session(&self) -> &Session {
        &self.session
    }

    pub const fn round(&self) -> u32 {
        self.session.round()
    }

    pub const fn score(&self) -> u32 {
        self.session.score()
    }

    pub const fn difficulty(&self) -> Difficulty {
        self.session.difficulty()
    }

    pub const fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    pub const fn current_food(&self) -> Option<&FoodItem> {
        self.session.current()
    }

    /// The hint, once a first miss has revealed it.
    pub fn hint(&self) -> Option<&str> {
        self.session
            .hint_visible()
            .then(|| self.session.current().map(FoodItem::hint))
            .flatten()
    }

    pub const fn last_result(&self) -> Option<&QuizResult> {
        self.last_result.as_ref()
    }

    pub const fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub const fn store(&self) -> &L {
        &self.store
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn set_nickname(&mut self, nickname: impl Into<String>) {
        self.nickname = nickname.into();
    }

    pub fn rating(&self) -> Option<Rating> {
        (self.state == GameState::Finished)
            .then(|| Rating::new(self.session.score(), self.total_rounds))
    }

    pub const fn prefetch_in_flight(&self) -> bool {
        self.prefetch.in_flight()
    }

    /// Collects a finished pre-fetch; returns whether a dish is queued.
    pub fn poll_prefetch(&mut self) -> bool {
        self.prefetch.poll();
        self.prefetch.queued().is_some()
    }

    /// Waits for an outstanding pre-fetch to report back.
    pub async fn settle_prefetch(&mut self) {
        self.prefetch.settle().await;
    }

    fn expect_state(&self, expected: GameState, action: &'static str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            let err = InvalidTransitionError {
                state: self.state,
                action,
            };
            err.trace();
            Err(err.into())
        }
    }

    pub fn show_ranking(&mut self) -> Result<()> {
        self.expect_state(GameState::Idle, "show the ranking")?;
        self.state = GameState::Ranking;
        Ok(())
    }

    pub fn close_ranking(&mut self) -> Result<()> {
        self.expect_state(GameState::Ranking, "close the ranking")?;
        self.state = GameState::Idle;
        Ok(())
    }

    pub fn restart(&mut self) -> Result<()> {
        self.expect_state(GameState::Finished, "restart")?;
        self.state = GameState::Idle;
        Ok(())
    }

    /// Starts a fresh session and loads its first dish.
    ///
    /// A failed first load puts the controller back in [`GameState::Idle`].
    #[instrument(skip(self))]
    pub async fn start_game(&mut self, difficulty: Difficulty) -> Result<()> {
        self.expect_state(GameState::Idle, "start a game")?;

        info!(%difficulty, rounds = self.total_rounds, "starting game");

        self.session = Session::new(difficulty);
        self.prefetch.new_session();
        self.last_result = None;

        self.load_round().await
    }

    #[instrument(skip(self), fields(round = self.session.round()))]
    async fn load_round(&mut self) -> Result<()> {
        self.state = GameState::Loading;
        self.last_result = None;
        self.session.begin_round();

        let food = if let Some(food) = self.take_queued() {
            food
        } else {
            match self.fresh_food().await {
                Ok(food) => food,
                Err(err) => return Err(self.abort(err)),
            }
        };

        debug!(name = food.name(), "serving dish");
        self.session.serve(food);
        self.state = GameState::Playing;

        if self.session.round() < self.total_rounds {
            let exclude = self
                .session
                .history()
                .excluding(self.session.current().map(FoodItem::name));

            self.prefetch
                .trigger(&self.service, self.session.difficulty(), exclude);
        }

        Ok(())
    }

    fn take_queued(&mut self) -> Option<FoodItem> {
        let food = self.prefetch.take()?;

        if self.session.history().contains(food.name()) {
            warn!(name = food.name(), "queued dish was already served, loading another");
            None
        } else {
            debug!(name = food.name(), "using pre-fetched dish");
            Some(food)
        }
    }

    async fn fresh_food(&self) -> service::Result<FoodItem> {
        let category = food::random_category(&mut rand::thread_rng());
        debug!(category, "requesting dish");

        self.service
            .generate_food_item(
                category,
                self.session.difficulty(),
                self.session.history().as_slice(),
            )
            .await
    }

    fn abort(&mut self, err: service::Error) -> Error {
        err.trace();
        error!("couldn't load a dish, returning to the start screen");

        self.session = Session::new(self.session.difficulty());
        self.state = GameState::Idle;

        Error::Generation(err)
    }

    /// Judges one guess. Blank guesses are ignored without asking the service.
    #[instrument(skip(self), fields(round = self.session.round()))]
    pub async fn submit_guess(&mut self, guess: &str) -> Result<GuessOutcome> {
        self.expect_state(GameState::Playing, "submit a guess")?;

        let guess = guess.trim();
        if guess.is_empty() {
            return Ok(GuessOutcome::Empty);
        }

        let Some(target) = self.session.current().map(|food| food.name().to_owned()) else {
            return Err(InvalidTransitionError {
                state: self.state,
                action: "submit a guess without a dish",
            }
            .into());
        };

        self.state = GameState::Loading;

        let result = match self.service.verify_answer(&target, guess).await {
            Ok(result) => result,
            Err(err) => {
                err.trace();
                warn!("grading failed, counting the guess as a miss");

                self.resolve(QuizResult::new(false, VERIFY_FAILED_FEEDBACK));
                return Ok(GuessOutcome::Missed);
            }
        };

        if result.is_correct() {
            self.session.award_point();
            self.resolve(result);
            Ok(GuessOutcome::Correct)
        } else if self.session.is_first_attempt() {
            self.session.reveal_hint();
            self.state = GameState::Playing;
            Ok(GuessOutcome::HintRevealed)
        } else {
            self.resolve(result);
            Ok(GuessOutcome::Missed)
        }
    }

    fn resolve(&mut self, result: QuizResult) {
        debug!(correct = result.is_correct(), score = self.session.score());
        self.last_result = Some(result);
        self.state = GameState::Result;
    }

    /// Moves past a resolved round: loads the next dish, or records the game
    /// after the last round.
    #[instrument(skip(self), fields(round = self.session.round()))]
    pub async fn advance(&mut self) -> Result<Advance> {
        self.expect_state(GameState::Result, "advance")?;

        if self.session.round() < self.total_rounds {
            self.session.next_round();
            self.load_round().await?;
            Ok(Advance::NextRound)
        } else {
            self.finish().await;
            Ok(Advance::Finished)
        }
    }

    async fn finish(&mut self) {
        let entry = LeaderboardEntry::today(
            &self.nickname,
            self.session.score(),
            self.session.difficulty(),
        );

        info!(name = entry.name, score = entry.score, "game finished");

        self.leaderboard.insert(entry);
        if let Err(err) = self.store.save(&self.leaderboard).await {
            err.trace();
            warn!("couldn't save the leaderboard, keeping it in memory");
        }

        self.state = GameState::Finished;
    }
}
