//! Run session tracking engine: consumes a stream of geolocation samples
//! and run control signals, derives elapsed time, distance and pace, and
//! publishes the formatted metrics to an injected sink.

pub mod geo;
pub mod metrics;
pub mod session;
pub mod settings;

pub use geo::{distance_km, GeoPoint};
pub use metrics::{MemoryMetrics, MetricsSink, RunMetrics};
pub use session::{RunController, RunSnapshot, RunStatus};
pub use settings::EngineSettings;
