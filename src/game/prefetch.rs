use std::sync::Arc;

use thisslime::TracingError;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, warn};

use crate::{
    food::{self, Difficulty, FoodItem},
    service::{self, FoodService},
};

type Outcome = Option<service::Result<FoodItem>>;

#[derive(Debug)]
struct InFlight {
    session: u64,
    rx: oneshot::Receiver<service::Result<FoodItem>>,
}

/// Speculatively generates the next round's dish while the current one is
/// being played.
///
/// At most one request is outstanding at a time; its result lands in a
/// single slot that the next round consumes.
#[derive(Debug, Default)]
pub struct Prefetcher {
    slot: Option<FoodItem>,
    in_flight: Option<InFlight>,
    session: u64,
}

impl Prefetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub const fn queued(&self) -> Option<&FoodItem> {
        self.slot.as_ref()
    }

    /// Drops the queued dish and orphans any outstanding request.
    ///
    /// The in-flight guard survives: an orphaned request still counts until
    /// it reports back, and its dish is then thrown away.
    pub fn new_session(&mut self) {
        self.session += 1;
        self.slot = None;
    }

    /// Fires off a request unless one is already outstanding or a dish is
    /// already queued. Returns whether a request was spawned.
    pub fn trigger<S: FoodService>(
        &mut self,
        service: &Arc<S>,
        difficulty: Difficulty,
        exclude: Vec<String>,
    ) -> bool {
        self.poll();

        if self.in_flight() {
            debug!("pre-fetch already in flight, skipping");
            return false;
        }

        // a late dish landed while the round loaded fresh
        if let Some(queued) = &self.slot {
            debug!(name = queued.name(), "dish already queued, skipping pre-fetch");
            return false;
        }

        let category = food::random_category(&mut rand::thread_rng());
        debug!(category, %difficulty, excluded = exclude.len(), "pre-fetching next dish");

        let (tx, rx) = oneshot::channel();
        let service = Arc::clone(service);

        tokio::spawn(async move {
            let result = service
                .generate_food_item(category, difficulty, &exclude)
                .await;

            // receiver is gone when the controller was dropped
            tx.send(result).ok();
        });

        self.in_flight = Some(InFlight {
            session: self.session,
            rx,
        });

        true
    }

    /// Collects a finished request without waiting.
    pub fn poll(&mut self) {
        let Some(ref mut flight) = self.in_flight else {
            return;
        };

        let outcome = match flight.rx.try_recv() {
            Err(TryRecvError::Empty) => return,
            Ok(result) => Some(result),
            Err(TryRecvError::Closed) => None,
        };

        let session = flight.session;
        self.in_flight = None;
        self.complete(session, outcome);
    }

    /// Waits for the outstanding request, if any, to report back.
    pub async fn settle(&mut self) {
        if let Some(flight) = self.in_flight.take() {
            let outcome = flight.rx.await.ok();
            self.complete(flight.session, outcome);
        }
    }

    /// Empties the slot.
    pub fn take(&mut self) -> Option<FoodItem> {
        self.poll();
        self.slot.take()
    }

    fn complete(&mut self, session: u64, outcome: Outcome) {
        match outcome {
            Some(Ok(food)) if session == self.session => {
                debug!(name = food.name(), "pre-fetched dish queued");

                debug_assert!(
                    self.slot.is_none(),
                    "pre-fetch slot overwritten while a dish was queued"
                );
                if let Some(stale) = self.slot.replace(food) {
                    warn!(name = stale.name(), "overwrote a queued dish");
                }
            }
            Some(Ok(food)) => {
                debug!(name = food.name(), "discarding pre-fetch from an earlier session");
            }
            Some(Err(err)) => {
                err.trace();
                warn!("pre-fetch failed, next round will load directly");
            }
            None => {
                warn!("pre-fetch task ended without reporting back");
            }
        }
    }
}
