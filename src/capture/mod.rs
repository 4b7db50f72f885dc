// Per-frame timing model for loaded capture logs

pub mod columns;
pub mod loader;

use egui::Color32;

/// Colors handed out to sessions in load order, wrapping when exhausted.
/// A session keeps its color until it is removed; colors are not reassigned
/// when earlier sessions disappear.
pub const SESSION_PALETTE: [Color32; 8] = [
    Color32::from_rgb(242, 97, 63),
    Color32::from_rgb(64, 140, 212),
    Color32::from_rgb(92, 176, 92),
    Color32::from_rgb(196, 88, 188),
    Color32::from_rgb(222, 186, 60),
    Color32::from_rgb(120, 112, 222),
    Color32::from_rgb(84, 188, 190),
    Color32::from_rgb(155, 57, 34),
];

/// Sessions at or below this frame count show their whole timeline in the
/// detail chart; anything longer starts windowed.
pub const DETAIL_FULL_VIEW_FRAMES: usize = 600;
/// Width of the initial detail window for long sessions.
pub const DETAIL_WINDOW_FRAMES: usize = 500;
/// How far a single detail navigation jump moves the window.
pub const DETAIL_JUMP_FRAMES: usize = 400;

/// One loaded capture log. All per-frame sequences are parallel: index `i`
/// in any of them refers to frame `i`, and they always have equal length.
#[derive(Debug, Clone)]
pub struct Session {
    pub path: String,
    pub filename: String,
    /// True when the log carried a `VSync` column, which only the VR capture
    /// path writes.
    pub is_vr: bool,

    pub frame_start: Vec<f64>,
    pub frame_end: Vec<f64>,
    /// Milliseconds between presents.
    pub frame_times: Vec<f64>,
    pub reprojection_start: Vec<f64>,
    pub reprojection_end: Vec<f64>,
    pub reprojection_times: Vec<f64>,
    pub vsync: Vec<f64>,
    pub app_missed: Vec<bool>,
    pub warp_missed: Vec<bool>,

    pub stats: SessionStatistics,
    pub color: Color32,
}

impl Session {
    pub fn frame_count(&self) -> usize {
        self.frame_start.len()
    }
}

/// Aggregate counters derived from a session's sequences, computed once at
/// load time and never updated afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStatistics {
    pub app_misses: usize,
    pub warp_misses: usize,
    pub valid_app_frames: usize,
    pub valid_repro_frames: usize,
    /// Timestamp of the last nonzero frame start seen during the load scan.
    /// This is a running last-seen value, strictly in row order, not a max.
    pub last_frame_time: f64,
    pub last_reprojection_time: f64,
    /// 99th-percentile frame time in milliseconds, taken from a sorted copy
    /// of the frame-time sequence.
    pub frame_time_99th: f64,
}

impl SessionStatistics {
    pub fn compute(
        frame_start: &[f64],
        frame_times: &[f64],
        reprojection_start: &[f64],
        app_missed: &[bool],
        warp_missed: &[bool],
    ) -> Self {
        let mut stats = SessionStatistics {
            app_misses: app_missed.iter().filter(|m| **m).count(),
            warp_misses: warp_missed.iter().filter(|m| **m).count(),
            ..Default::default()
        };

        for start in frame_start {
            if *start != 0. {
                stats.valid_app_frames += 1;
                stats.last_frame_time = *start;
            }
        }
        for start in reprojection_start {
            if *start != 0. {
                stats.valid_repro_frames += 1;
                stats.last_reprojection_time = *start;
            }
        }

        // percentile on a sorted copy so the session keeps its row ordering
        if !frame_times.is_empty() {
            let mut sorted = frame_times.to_vec();
            sorted.sort_by(|a, b| a.total_cmp(b));
            let idx = (0.99 * sorted.len() as f64).floor() as usize;
            stats.frame_time_99th = sorted[idx.min(sorted.len() - 1)];
        }

        stats
    }

    pub fn average_fps(&self) -> f64 {
        if self.last_frame_time == 0. {
            return 0.;
        }
        self.valid_app_frames as f64 / self.last_frame_time
    }

    pub fn average_frame_time_ms(&self) -> f64 {
        if self.valid_app_frames == 0 {
            return 0.;
        }
        self.last_frame_time * 1000. / self.valid_app_frames as f64
    }

    pub fn average_reprojection_time_ms(&self) -> f64 {
        if self.valid_repro_frames == 0 {
            return 0.;
        }
        self.last_reprojection_time * 1000. / self.valid_repro_frames as f64
    }
}

/// Pagination window over a session's frame indices, inclusive on both ends.
/// The detail chart never renders frames outside the current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRange {
    pub start: usize,
    pub end: usize,
}

impl FrameRange {
    pub fn new(frame_count: usize) -> Self {
        if frame_count <= DETAIL_FULL_VIEW_FRAMES {
            Self {
                start: 0,
                end: frame_count.saturating_sub(1),
            }
        } else {
            Self {
                start: 0,
                end: DETAIL_WINDOW_FRAMES,
            }
        }
    }

    /// Advances the window by the jump step. The window collapses against
    /// the last frame instead of running past it.
    pub fn jump_forward(&mut self, frame_count: usize) {
        let last = frame_count.saturating_sub(1);
        self.start = (self.start + DETAIL_JUMP_FRAMES).min(last);
        self.end = (self.start + DETAIL_WINDOW_FRAMES).min(last);
    }

    /// Retreats the window by the jump step, clamping the start at frame 0.
    pub fn jump_backward(&mut self, frame_count: usize) {
        let last = frame_count.saturating_sub(1);
        self.start = self.start.saturating_sub(DETAIL_JUMP_FRAMES);
        self.end = (self.start + DETAIL_WINDOW_FRAMES).min(last);
    }
}

/// A chart-plottable event: a timestamp, a lane coordinate, and the label
/// shown when the point is hovered.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDataPoint {
    pub x: f64,
    pub y: f64,
    pub label: String,
}

impl EventDataPoint {
    pub fn new(x: f64, y: f64, label: impl Into<String>) -> Self {
        Self {
            x,
            y,
            label: label.into(),
        }
    }

    /// Sentinel for an event the capture did not record.
    pub fn undefined() -> Self {
        Self {
            x: f64::NAN,
            y: f64::NAN,
            label: String::new(),
        }
    }

    pub fn is_defined(&self) -> bool {
        !self.x.is_nan() && !self.y.is_nan()
    }
}
