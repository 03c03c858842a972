use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use log::debug;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::metrics::format::format_clock;
use crate::metrics::sink::MetricsSink;

use super::state::{RunSessionState, RunStatus};

/// Owns the 1-second clock task for the active session. At most one task is
/// live at a time; stopping cancels it and waits for the join, so a
/// cancelled tick can never fire afterwards.
pub struct ClockProcess {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl ClockProcess {
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
        tick: Duration,
    ) -> Result<()> {
        if self.handle.is_some() {
            bail!("clock already ticking");
        }

        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();
        let handle = tokio::spawn(clock_loop(state, sink, tick, token_clone));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle.await.context("clock task failed to join")?;
        }
        Ok(())
    }
}

impl Default for ClockProcess {
    fn default() -> Self {
        Self::new()
    }
}

/// One increment per tick. Each tick is a single-shot sleep armed only
/// after the previous tick completed, so ticks never overlap and no drift
/// correction is needed. Exits when the session leaves `Running` or the
/// token is cancelled.
async fn clock_loop(
    state: Arc<Mutex<RunSessionState>>,
    sink: Arc<dyn MetricsSink>,
    tick: Duration,
    cancel_token: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = time::sleep(tick) => {
                let formatted = {
                    let mut guard = state.lock().await;
                    if guard.status != RunStatus::Running {
                        break;
                    }
                    guard.elapsed_seconds += 1;
                    format_clock(guard.elapsed_seconds)
                };
                sink.set_running_time(&formatted);
            }
            _ = cancel_token.cancelled() => {
                debug!("clock loop shutting down");
                break;
            }
        }
    }
}
