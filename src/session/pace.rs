use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use log::debug;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::metrics::format::format_pace;
use crate::metrics::sink::MetricsSink;

use super::state::{RunSessionState, RunStatus};

/// Owns the periodic pace recomputation task. Same lifecycle discipline as
/// the clock: one task at most, cancel-and-join on stop.
pub struct PaceEstimator {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl PaceEstimator {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    pub fn start(
        &mut self,
        state: Arc<Mutex<RunSessionState>>,
        sink: Arc<dyn MetricsSink>,
        period: Duration,
    ) -> Result<()> {
        if self.handle.is_some() {
            bail!("pace estimator already running");
        }

        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();
        let handle = tokio::spawn(pace_loop(state, sink, period, token_clone));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle.await.context("pace task failed to join")?;
        }
        Ok(())
    }
}

impl Default for PaceEstimator {
    fn default() -> Self {
        Self::new()
    }
}

/// Recomputes the average pace from the elapsed/distance pair read under a
/// single lock, so the estimate never mixes values from different ticks.
async fn pace_loop(
    state: Arc<Mutex<RunSessionState>>,
    sink: Arc<dyn MetricsSink>,
    period: Duration,
    cancel_token: CancellationToken,
) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let formatted = {
                    let mut guard = state.lock().await;
                    if guard.status != RunStatus::Running {
                        break;
                    }
                    let formatted = format_pace(guard.elapsed_seconds, guard.distance_km);
                    guard.pace_text = formatted.clone();
                    formatted
                };
                sink.set_running_pace(&formatted);
            }
            _ = cancel_token.cancelled() => {
                debug!("pace loop shutting down");
                break;
            }
        }
    }
}
