use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use super::format::{DEFAULT_DISTANCE_TEXT, DEFAULT_PACE_TEXT};

/// The engine's write contract with the external store. The engine is the
/// sole writer of these three fields during an active session.
pub trait MetricsSink: Send + Sync {
    fn set_running_time(&self, text: &str);
    fn set_distance_run(&self, text: &str);
    fn set_running_pace(&self, text: &str);
}

/// Latest formatted metric values held by a sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMetrics {
    pub running_time: String,
    pub distance_run: String,
    pub running_pace: String,
}

impl Default for RunMetrics {
    fn default() -> Self {
        Self {
            running_time: "00:00".to_string(),
            distance_run: DEFAULT_DISTANCE_TEXT.to_string(),
            running_pace: DEFAULT_PACE_TEXT.to_string(),
        }
    }
}

/// In-memory store binding: keeps the latest values plus per-field write
/// counters so callers can observe publication cadence.
pub struct MemoryMetrics {
    inner: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    metrics: RunMetrics,
    time_writes: u64,
    distance_writes: u64,
    pace_writes: u64,
}

impl MemoryMetrics {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MemoryState::default()),
        }
    }

    pub fn snapshot(&self) -> RunMetrics {
        self.inner.lock().unwrap().metrics.clone()
    }

    /// (time, distance, pace) write counts since construction.
    pub fn write_counts(&self) -> (u64, u64, u64) {
        let state = self.inner.lock().unwrap();
        (state.time_writes, state.distance_writes, state.pace_writes)
    }
}

impl Default for MemoryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsSink for MemoryMetrics {
    fn set_running_time(&self, text: &str) {
        let mut state = self.inner.lock().unwrap();
        state.metrics.running_time = text.to_string();
        state.time_writes += 1;
    }

    fn set_distance_run(&self, text: &str) {
        let mut state = self.inner.lock().unwrap();
        state.metrics.distance_run = text.to_string();
        state.distance_writes += 1;
    }

    fn set_running_pace(&self, text: &str) {
        let mut state = self.inner.lock().unwrap();
        state.metrics.running_pace = text.to_string();
        state.pace_writes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_display_contract() {
        let metrics = RunMetrics::default();
        assert_eq!(metrics.running_time, "00:00");
        assert_eq!(metrics.distance_run, "0.00");
        assert_eq!(metrics.running_pace, "0:00");
    }

    #[test]
    fn writes_update_values_and_counters() {
        let sink = MemoryMetrics::new();
        sink.set_running_time("01:05");
        sink.set_distance_run("0.42");
        sink.set_distance_run("0.48");
        sink.set_running_pace("05:30");

        let metrics = sink.snapshot();
        assert_eq!(metrics.running_time, "01:05");
        assert_eq!(metrics.distance_run, "0.48");
        assert_eq!(metrics.running_pace, "05:30");
        assert_eq!(sink.write_counts(), (1, 2, 1));
    }
}
