use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use chrono::Utc;
use log::{debug, info};
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::geo::GeoPoint;
use crate::metrics::format::format_clock;
use crate::metrics::sink::MetricsSink;
use crate::settings::EngineSettings;

use super::clock::ClockProcess;
use super::pace::PaceEstimator;
use super::state::{RunSessionState, RunStatus};

/// Read surface for a presentation layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSnapshot {
    pub status: RunStatus,
    pub elapsed_seconds: u64,
    pub time_text: String,
    pub km_text: String,
    pub pace_text: String,
}

impl From<&RunSessionState> for RunSnapshot {
    fn from(state: &RunSessionState) -> Self {
        Self {
            status: state.status,
            elapsed_seconds: state.elapsed_seconds,
            time_text: format_clock(state.elapsed_seconds),
            km_text: state.km_text.clone(),
            pace_text: state.pace_text.clone(),
        }
    }
}

/// Drives one run session at a time: owns the state machine, feeds the
/// clock and pace workers, recomputes distance on every sample and flushes
/// the final metrics on stop.
///
/// Control signals inconsistent with the current status are ignored (logged
/// at debug level), never errors.
#[derive(Clone)]
pub struct RunController {
    state: Arc<Mutex<RunSessionState>>,
    sink: Arc<dyn MetricsSink>,
    clock: Arc<Mutex<ClockProcess>>,
    pace: Arc<Mutex<PaceEstimator>>,
    clock_tick: Duration,
    pace_refresh: Duration,
}

impl RunController {
    pub fn new(sink: Arc<dyn MetricsSink>, settings: &EngineSettings) -> Self {
        Self {
            state: Arc::new(Mutex::new(RunSessionState::new())),
            sink,
            clock: Arc::new(Mutex::new(ClockProcess::new())),
            pace: Arc::new(Mutex::new(PaceEstimator::new())),
            clock_tick: settings.clock_tick(),
            pace_refresh: settings.pace_refresh(),
        }
    }

    pub async fn snapshot(&self) -> RunSnapshot {
        let guard = self.state.lock().await;
        RunSnapshot::from(&*guard)
    }

    /// `Idle -> Preparing`: allocate a fresh session and wait for the
    /// countdown.
    pub async fn begin_run(&self) -> Result<()> {
        let mut guard = self.state.lock().await;
        if guard.status != RunStatus::Idle {
            debug!("begin ignored while {:?}", guard.status);
            return Ok(());
        }

        let session_id = Uuid::new_v4().to_string();
        guard.begin_preparing(session_id.clone(), Utc::now());
        info!("run session {session_id} preparing");
        Ok(())
    }

    /// Countdown progress from the external pre-run component. The
    /// `Preparing -> Running` edge fires when it reaches zero.
    pub async fn countdown(&self, remaining: u32) -> Result<()> {
        if remaining > 0 {
            return Ok(());
        }

        {
            let mut guard = self.state.lock().await;
            if guard.status != RunStatus::Preparing {
                debug!("countdown finish ignored while {:?}", guard.status);
                return Ok(());
            }
            guard.activate();
        }

        self.spawn_workers().await?;
        info!("countdown reached zero, run session is live");
        Ok(())
    }

    /// Freeze the session: both workers are cancelled and joined before
    /// this returns, so no tick lands afterwards. Idempotent.
    pub async fn pause(&self) -> Result<()> {
        let frozen = {
            let mut guard = self.state.lock().await;
            if guard.status != RunStatus::Running {
                debug!("pause ignored while {:?}", guard.status);
                return Ok(());
            }
            guard.pause();
            format_clock(guard.elapsed_seconds)
        };

        self.halt_workers().await?;
        self.sink.set_running_time(&frozen);
        info!("run session paused at {frozen}");
        Ok(())
    }

    pub async fn resume(&self) -> Result<()> {
        {
            let mut guard = self.state.lock().await;
            if guard.status != RunStatus::Paused {
                debug!("resume ignored while {:?}", guard.status);
                return Ok(());
            }
            guard.resume();
        }

        self.spawn_workers().await?;
        info!("run session resumed");
        Ok(())
    }

    /// End the session: flush the final three metrics to the sink, tear
    /// down both workers, then reset to `Idle`. The returned snapshot is
    /// the final reading (status `Stopped`); the sink keeps it after the
    /// reset.
    pub async fn stop(&self) -> Result<RunSnapshot> {
        let finals = {
            let mut guard = self.state.lock().await;
            match guard.status {
                RunStatus::Running | RunStatus::Paused => {}
                RunStatus::Preparing => {
                    guard.reset();
                    return Ok(RunSnapshot::from(&*guard));
                }
                _ => {
                    debug!("stop ignored while {:?}", guard.status);
                    return Ok(RunSnapshot::from(&*guard));
                }
            }
            guard.mark_stopped();
            RunSnapshot::from(&*guard)
        };

        self.sink.set_running_time(&finals.time_text);
        self.sink.set_distance_run(&finals.km_text);
        self.sink.set_running_pace(&finals.pace_text);

        self.halt_workers().await?;

        {
            let mut guard = self.state.lock().await;
            let session_id = guard.session_id.take();
            guard.reset();
            if let Some(id) = session_id {
                info!(
                    "run session {id} stopped at {} / {} km",
                    finals.time_text, finals.km_text
                );
            }
        }

        Ok(finals)
    }

    /// A new sample from the position provider. Only acted on while
    /// `Running`; the recomputed distance text is pushed to the sink on
    /// every sample.
    pub async fn update_position(&self, point: GeoPoint) -> Result<()> {
        if !point.is_finite() {
            bail!(
                "non-finite coordinate ({}, {})",
                point.latitude,
                point.longitude
            );
        }

        let formatted = {
            let mut guard = self.state.lock().await;
            if guard.status != RunStatus::Running {
                debug!("position ignored while {:?}", guard.status);
                return Ok(());
            }
            guard.record_position(point);
            guard.km_text.clone()
        };

        self.sink.set_distance_run(&formatted);
        Ok(())
    }

    /// Boolean control surface: maps an `(is_run, is_pause)` pair from the
    /// UI onto the state-machine edges relative to the current status.
    pub async fn apply_controls(&self, is_run: bool, is_pause: bool) -> Result<()> {
        let status = self.state.lock().await.status;

        match (is_run, is_pause) {
            (false, _) => {
                if status != RunStatus::Idle {
                    self.stop().await?;
                }
            }
            (true, true) => self.pause().await?,
            (true, false) => match status {
                RunStatus::Paused => self.resume().await?,
                RunStatus::Idle => {
                    self.begin_run().await?;
                    self.countdown(0).await?;
                }
                _ => {}
            },
        }
        Ok(())
    }

    async fn spawn_workers(&self) -> Result<()> {
        self.clock
            .lock()
            .await
            .start(self.state.clone(), self.sink.clone(), self.clock_tick)?;
        self.pace
            .lock()
            .await
            .start(self.state.clone(), self.sink.clone(), self.pace_refresh)?;
        Ok(())
    }

    async fn halt_workers(&self) -> Result<()> {
        self.clock.lock().await.stop().await?;
        self.pace.lock().await.stop().await?;
        Ok(())
    }
}
