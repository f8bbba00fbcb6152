//! FlipScout engine: executes navigation, scheduling and analytics effects.
mod analytics;
mod engine;
mod handoff;
mod navigator;
mod scheduler;
mod types;

pub use analytics::{AnalyticsError, AnalyticsSink, HttpCollector, LogSink};
pub use engine::{EngineHandle, EngineSettings};
pub use handoff::perform_handoff;
pub use navigator::{ContextRelay, Navigation, Navigator, RecordingNavigator, SystemBrowser};
pub use scheduler::{Job, Scheduler};
pub use types::{EngineEvent, NavigationError, WindowTarget};
