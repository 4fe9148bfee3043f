//! Live player poller: fetch now, then on a fixed interval.
//!
//! DESIGN
//! ======
//! One tokio task owns the fetch loop and publishes a [`LiveState`] through a
//! `watch` channel, so any number of readers see the latest snapshot without
//! queueing stale ones. Each fetch is bounded by the poll interval: a request
//! still running when the next tick is due is dropped and replaced.
//!
//! ERROR HANDLING
//! ==============
//! A failed fetch keeps the last good snapshot and only sets `error`. The
//! error is cleared again when the next fetch starts. Dropping the
//! [`LivePoller`] aborts the task, which cancels any request in flight.

#[cfg(test)]
#[path = "poll_test.rs"]
mod poll_test;

use std::time::Duration;

use async_trait::async_trait;
use livemap::entity::GameState;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::api::ApiError;

/// Message published when a fetch fails.
pub const LOAD_ERROR: &str = "Failed to load live players";

/// Anything that can produce a live snapshot.
#[async_trait]
pub trait PlayerSource: Send + Sync + 'static {
    async fn fetch_players(&self) -> Result<GameState, ApiError>;
}

/// What readers see: last good data, whether the first fetch is pending, and
/// the last error.
///
/// `generation` counts completed fetches. Clearing the error at the start of
/// a fetch also notifies readers but leaves it unchanged, so a reader that
/// only cares about finished fetches compares generations.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveState {
    pub data: Option<GameState>,
    pub loading: bool,
    pub error: Option<String>,
    pub generation: u64,
}

impl Default for LiveState {
    fn default() -> Self {
        Self { data: None, loading: true, error: None, generation: 0 }
    }
}

/// Handle to a running poll loop.
pub struct LivePoller {
    rx: watch::Receiver<LiveState>,
    task: JoinHandle<()>,
}

impl LivePoller {
    /// Start polling `source` every `interval`. The first fetch runs immediately.
    pub fn spawn<S: PlayerSource>(source: S, interval: Duration) -> Self {
        let (tx, rx) = watch::channel(LiveState::default());
        let task = tokio::spawn(poll_loop(source, interval, tx));
        Self { rx, task }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LiveState> {
        self.rx.clone()
    }
}

impl Drop for LivePoller {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn poll_loop<S: PlayerSource>(source: S, interval: Duration, tx: watch::Sender<LiveState>) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        tx.send_if_modified(|state| state.error.take().is_some());

        match tokio::time::timeout(interval, source.fetch_players()).await {
            Ok(Ok(snapshot)) => {
                debug!(servers = snapshot.servers.len(), "live players refreshed");
                tx.send_modify(|state| {
                    state.data = Some(snapshot);
                    state.loading = false;
                    state.error = None;
                    state.generation += 1;
                });
            }
            Ok(Err(e)) => {
                warn!(error = %e, "live player fetch failed");
                tx.send_modify(|state| {
                    state.loading = false;
                    state.error = Some(LOAD_ERROR.to_owned());
                    state.generation += 1;
                });
            }
            Err(_) => {
                debug!(interval_ms = interval.as_millis(), "live player fetch superseded");
            }
        }

        if tx.is_closed() {
            break;
        }
    }
}
