// Renderable chart models derived from loaded sessions
//
// Builders in the submodules are pure functions over the session collection.
// The models they produce are plain data consumed both by the egui plot
// layer and by the SVG exporter; none of them hold references back into the
// sessions they were built from.

pub mod frame_detail;
pub mod frame_times;
pub mod missed_frames;
pub mod reprojections;
pub mod svg;

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::capture::{EventDataPoint, FrameRange};

/// Which chart the UI currently shows. Kinds are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum ChartKind {
    FrameTimes,
    Reprojections,
    MissedFrames,
    FrameDetail,
}

impl ChartKind {
    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::FrameTimes => "Frame times",
            ChartKind::Reprojections => "Reprojections",
            ChartKind::MissedFrames => "Missed frames",
            ChartKind::FrameDetail => "Frame detail",
        }
    }
}

/// Scalar shown by the missed-frames chart in metric mode. Cycling moves
/// through the declaration order and wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum MetricKind {
    AverageFps,
    AverageFrameTime,
    AverageReprojectionTime,
    FrameTime99th,
}

impl MetricKind {
    pub fn next(&self) -> Self {
        match self {
            MetricKind::AverageFps => MetricKind::AverageFrameTime,
            MetricKind::AverageFrameTime => MetricKind::AverageReprojectionTime,
            MetricKind::AverageReprojectionTime => MetricKind::FrameTime99th,
            MetricKind::FrameTime99th => MetricKind::AverageFps,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::AverageFps => "Average FPS",
            MetricKind::AverageFrameTime => "Average frame time (ms)",
            MetricKind::AverageReprojectionTime => "Average reprojection time (ms)",
            MetricKind::FrameTime99th => "99th percentile frame time (ms)",
        }
    }
}

/// Sub-mode of the missed-frames chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissedFramesMode {
    Percentages,
    Metric,
}

/// Inclusive axis bounds observed while building a model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl AxisBounds {
    pub fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    pub fn update(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }

    pub fn is_finite(&self) -> bool {
        self.min_x.is_finite()
            && self.max_x.is_finite()
            && self.min_y.is_finite()
            && self.max_y.is_finite()
    }
}

#[derive(Debug, Clone)]
pub struct LineSeries {
    pub name: String,
    pub color: Color32,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone)]
pub struct ScatterSeries {
    pub name: String,
    pub color: Color32,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone)]
pub struct FrameTimesModel {
    pub series: Vec<LineSeries>,
    pub bounds: AxisBounds,
}

#[derive(Debug, Clone)]
pub struct ReprojectionsModel {
    pub series: Vec<LineSeries>,
    /// Legend order is fixed: app misses first, then warp misses.
    pub app_misses: ScatterSeries,
    pub warp_misses: ScatterSeries,
    pub bounds: AxisBounds,
}

/// One session's 100%-stacked bar. Segments sum to 100 within floating
/// point tolerance; `warp_pct` is absent for sessions without reprojection
/// data.
#[derive(Debug, Clone)]
pub struct StackedBar {
    pub label: String,
    pub color: Color32,
    pub success_pct: f64,
    pub app_miss_pct: f64,
    pub warp_miss_pct: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct MetricBar {
    pub label: String,
    pub color: Color32,
    pub value: f64,
}

#[derive(Debug, Clone)]
pub enum MissedFramesModel {
    Percentages(Vec<StackedBar>),
    Metric {
        metric: MetricKind,
        bars: Vec<MetricBar>,
    },
}

/// The events of one frame in the detail chart, already placed in a lane.
#[derive(Debug, Clone)]
pub struct FrameEventSeries {
    pub frame_index: usize,
    pub color: Color32,
    pub events: Vec<EventDataPoint>,
}

#[derive(Debug, Clone)]
pub struct FrameDetailModel {
    pub session_index: usize,
    pub range: FrameRange,
    pub frames: Vec<FrameEventSeries>,
    /// VSync timestamps inside the window, rendered as stems. Empty for
    /// non-VR sessions.
    pub vsyncs: Vec<f64>,
    pub bounds: AxisBounds,
}

/// Borrowing wrapper handed to the SVG exporter so one entry point can
/// serve every chart kind.
#[derive(Debug, Clone, Copy)]
pub enum ChartModelRef<'a> {
    FrameTimes(&'a FrameTimesModel),
    Reprojections(&'a ReprojectionsModel),
    MissedFrames(&'a MissedFramesModel),
    FrameDetail(&'a FrameDetailModel),
}
