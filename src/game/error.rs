use thisslime::TracingError;

use super::GameState;
use crate::service;

#[derive(Debug, thiserror::Error, TracingError)]
#[span]
pub enum Error {
    #[error(transparent)]
    Generation(#[from] service::Error),

    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransitionError),
}

#[derive(Debug, Clone, thiserror::Error, TracingError)]
#[error("can't {action} while {state}")]
#[event(level = WARN)]
pub struct InvalidTransitionError {
    #[field(print = Display)]
    pub(crate) state: GameState,

    #[field(print = Display)]
    pub(crate) action: &'static str,
}
