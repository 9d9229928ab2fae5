use std::{future::Future, path::PathBuf};

use thisslime::TracingError;
use tracing::{debug, instrument, warn};

use super::Leaderboard;

/// Fixed name of the leaderboard file inside the data directory.
pub const STORE_FILE_NAME: &str = "gourmet_leaderboard.json";

#[derive(Debug, thiserror::Error, TracingError)]
#[span]
pub enum Error {
    #[error("leaderboard io error: {0}")]
    #[event(level = ERROR)]
    Io(#[from] std::io::Error),

    #[error("leaderboard could not be encoded: {0}")]
    #[event(level = ERROR)]
    Encode(#[from] serde_json::Error),
}

/// Where the leaderboard lives between games.
///
/// `load` never fails: an unreadable record is logged and treated as empty.
pub trait LeaderboardStore: Send + Sync {
    fn load(&self) -> impl Future<Output = Leaderboard> + Send;

    /// Replaces the stored record with `leaderboard`.
    fn save(&self, leaderboard: &Leaderboard) -> impl Future<Output = Result<(), Error>> + Send;
}

fn decode(json: &str) -> Leaderboard {
    serde_json::from_str(json).unwrap_or_else(|err| {
        warn!(%err, "failed to parse leaderboard, starting empty");
        Leaderboard::new()
    })
}

#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LeaderboardStore for JsonFile {
    #[instrument(skip_all, fields(path = %self.path.display()))]
    async fn load(&self) -> Leaderboard {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(json) => decode(&json),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("no leaderboard yet");
                Leaderboard::new()
            }
            Err(err) => {
                Error::from(err).trace();
                warn!("failed to read leaderboard, starting empty");
                Leaderboard::new()
            }
        }
    }

    #[instrument(skip_all, fields(path = %self.path.display(), entries = leaderboard.len()))]
    async fn save(&self, leaderboard: &Leaderboard) -> Result<(), Error> {
        let json = serde_json::to_string(leaderboard)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        tokio::fs::write(&self.path, json).await?;
        debug!("leaderboard saved");

        Ok(())
    }
}

/// Keeps the encoded record in memory.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct Memory {
    json: std::sync::Mutex<Option<String>>,
    saves: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl Memory {
    pub fn with_json(json: &str) -> Self {
        Self {
            json: std::sync::Mutex::new(Some(json.to_owned())),
            ..Self::default()
        }
    }

    pub fn saves(&self) -> usize {
        self.saves.load(std::sync::atomic::Ordering::SeqCst)
    }

    pub fn stored(&self) -> Leaderboard {
        self.json
            .lock()
            .expect("memory store lock poisoned")
            .as_deref()
            .map(decode)
            .unwrap_or_default()
    }
}

#[cfg(test)]
impl LeaderboardStore for Memory {
    async fn load(&self) -> Leaderboard {
        self.stored()
    }

    async fn save(&self, leaderboard: &Leaderboard) -> Result<(), Error> {
        let json = serde_json::to_string(leaderboard)?;
        *self.json.lock().expect("memory store lock poisoned") = Some(json);
        self.saves.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{JsonFile, LeaderboardStore, Memory};
    use crate::{
        food::Difficulty,
        leaderboard::{Leaderboard, LeaderboardEntry},
    };
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    fn temp_path(test: &str) -> std::path::PathBuf {
        std::env::temp_dir()
            .join(format!("gourmet-quest-{test}-{}", std::process::id()))
            .join(super::STORE_FILE_NAME)
    }

    #[tokio::test]
    #[traced_test]
    async fn corrupt_record_loads_empty() {
        let store = Memory::with_json("{ not json");

        assert!(store.load().await.is_empty());
        assert!(logs_contain("failed to parse leaderboard"));
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let store = JsonFile::new(temp_path("missing"));
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn file_round_trip_rewrites_in_full() {
        let path = temp_path("round-trip");
        let store = JsonFile::new(&path);

        let mut board = Leaderboard::new();
        board.insert(LeaderboardEntry::today("chef", 6, Difficulty::Hard));
        store.save(&board).await.expect("temp dir is writable");

        board.insert(LeaderboardEntry::today("cook", 8, Difficulty::Easy));
        store.save(&board).await.expect("temp dir is writable");

        assert_eq!(store.load().await, board);

        if let Some(dir) = path.parent() {
            tokio::fs::remove_dir_all(dir).await.ok();
        }
    }

    #[tokio::test]
    async fn memory_counts_saves() {
        let store = Memory::default();
        store.save(&Leaderboard::new()).await.expect("memory save");

        assert_eq!(store.saves(), 1);
        assert!(store.stored().is_empty());
    }
}
