use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::geo::{distance_km, GeoPoint};
use crate::metrics::format::{
    format_distance_km, round_distance_km, DEFAULT_DISTANCE_TEXT, DEFAULT_PACE_TEXT,
};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RunStatus {
    Idle,
    Preparing,
    Running,
    Paused,
    Stopped,
}

impl Default for RunStatus {
    fn default() -> Self {
        RunStatus::Idle
    }
}

/// The session aggregate. All reads and writes go through the controller's
/// lock; the transition methods below are the only mutation points.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSessionState {
    pub status: RunStatus,
    pub session_id: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    /// Whole seconds counted by the clock process. Advances only while
    /// `Running`, frozen while `Paused`, 0 for a fresh session.
    pub elapsed_seconds: u64,
    /// First sample recorded for this session. Set once, cleared on reset.
    pub origin: Option<GeoPoint>,
    /// Most recent sample.
    pub marker: Option<GeoPoint>,
    #[serde(skip)]
    pub path: Vec<GeoPoint>,
    /// Straight-line distance from the origin to the marker, rounded to two
    /// decimals. Deliberately not a sum of per-sample deltas: a runner who
    /// loops back to the start reads near zero.
    pub distance_km: f64,
    pub km_text: String,
    pub pace_text: String,
}

impl Default for RunSessionState {
    fn default() -> Self {
        Self {
            status: RunStatus::Idle,
            session_id: None,
            started_at: None,
            elapsed_seconds: 0,
            origin: None,
            marker: None,
            path: Vec::new(),
            distance_km: 0.0,
            km_text: DEFAULT_DISTANCE_TEXT.to_string(),
            pace_text: DEFAULT_PACE_TEXT.to_string(),
        }
    }
}

impl RunSessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_preparing(&mut self, session_id: String, started_at: DateTime<Utc>) {
        *self = Self {
            status: RunStatus::Preparing,
            session_id: Some(session_id),
            started_at: Some(started_at),
            ..Self::default()
        };
    }

    pub fn activate(&mut self) {
        self.status = RunStatus::Running;
    }

    pub fn pause(&mut self) {
        self.status = RunStatus::Paused;
    }

    pub fn resume(&mut self) {
        self.status = RunStatus::Running;
    }

    pub fn mark_stopped(&mut self) {
        self.status = RunStatus::Stopped;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Record a sample: the first one becomes the session origin, every one
    /// becomes the marker, and the distance display is recomputed.
    pub fn record_position(&mut self, point: GeoPoint) {
        let origin = match self.origin {
            Some(origin) => origin,
            None => {
                self.origin = Some(point);
                point
            }
        };
        self.path.push(point);
        self.marker = Some(point);
        self.distance_km = round_distance_km(distance_km(origin, point));
        self.km_text = format_distance_km(self.distance_km);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_holds_display_defaults() {
        let state = RunSessionState::new();
        assert_eq!(state.status, RunStatus::Idle);
        assert_eq!(state.elapsed_seconds, 0);
        assert_eq!(state.km_text, "0.00");
        assert_eq!(state.pace_text, "0:00");
        assert!(state.origin.is_none());
    }

    #[test]
    fn origin_is_set_once_per_session() {
        let mut state = RunSessionState::new();
        state.begin_preparing("abc".into(), Utc::now());
        state.activate();

        let first = GeoPoint::new(37.5, 127.0);
        let second = GeoPoint::new(37.51, 127.0);
        state.record_position(first);
        state.record_position(second);

        assert_eq!(state.origin, Some(first));
        assert_eq!(state.marker, Some(second));
        assert_eq!(state.path.len(), 2);
        assert!((state.distance_km - 1.11).abs() < 1e-9);
        assert_eq!(state.km_text, "1.11");
    }

    #[test]
    fn distance_is_measured_from_the_origin_not_along_the_path() {
        let mut state = RunSessionState::new();
        state.begin_preparing("abc".into(), Utc::now());
        state.activate();

        let start = GeoPoint::new(37.5, 127.0);
        state.record_position(start);
        state.record_position(GeoPoint::new(37.51, 127.0));
        // Back at the start: straight-line distance collapses to zero.
        state.record_position(start);

        assert_eq!(state.distance_km, 0.0);
        assert_eq!(state.km_text, "0.00");
    }

    #[test]
    fn preparing_a_new_session_clears_the_previous_one() {
        let mut state = RunSessionState::new();
        state.begin_preparing("first".into(), Utc::now());
        state.activate();
        state.record_position(GeoPoint::new(37.5, 127.0));
        state.elapsed_seconds = 42;

        state.begin_preparing("second".into(), Utc::now());
        assert_eq!(state.status, RunStatus::Preparing);
        assert_eq!(state.session_id.as_deref(), Some("second"));
        assert_eq!(state.elapsed_seconds, 0);
        assert!(state.origin.is_none());
        assert!(state.path.is_empty());
    }

    #[test]
    fn reset_returns_everything_to_defaults() {
        let mut state = RunSessionState::new();
        state.begin_preparing("abc".into(), Utc::now());
        state.activate();
        state.record_position(GeoPoint::new(37.5, 127.0));
        state.elapsed_seconds = 7;
        state.mark_stopped();

        state.reset();
        assert_eq!(state.status, RunStatus::Idle);
        assert_eq!(state.elapsed_seconds, 0);
        assert_eq!(state.km_text, "0.00");
        assert!(state.session_id.is_none());
    }
}
