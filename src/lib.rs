// Library interface for framesight
// This allows integration tests to access internal modules

pub mod capture;
pub mod charts;
pub mod engine;
pub mod errors;
pub mod ui;

// Re-export commonly used types
pub use capture::{EventDataPoint, FrameRange, Session, SessionStatistics};
pub use charts::{ChartKind, MetricKind, MissedFramesMode};
pub use engine::VisualizationState;
pub use errors::FramesightError;
