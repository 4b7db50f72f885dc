// The visualization engine: session collection, selection, and chart state
//
// A single `VisualizationState` owns every piece of mutable visualization
// state. Operations run to completion on the calling thread; the
// presentation layer decides when to re-render by calling the chart
// builders again, there is no change-notification machinery.

use std::path::Path;

use log::{debug, info};

use crate::capture::{FrameRange, SESSION_PALETTE, Session, loader};
use crate::charts::{
    ChartKind, FrameDetailModel, FrameTimesModel, MetricKind, MissedFramesMode, MissedFramesModel,
    ReprojectionsModel, frame_detail, frame_times, missed_frames, reprojections,
};
use crate::errors::FramesightError;

struct DetailCache {
    session_index: usize,
    range: FrameRange,
    model: FrameDetailModel,
}

pub struct VisualizationState {
    sessions: Vec<Session>,
    /// Pagination window per session, parallel to `sessions`.
    ranges: Vec<FrameRange>,
    selected: Option<usize>,
    detail_cache: Option<DetailCache>,
    chart_kind: ChartKind,
    metric: MetricKind,
    missed_frames_mode: MissedFramesMode,
    /// Monotonic counter driving palette assignment so removed sessions do
    /// not recycle the colors of surviving ones.
    palette_cursor: usize,
}

impl Default for VisualizationState {
    fn default() -> Self {
        Self::new()
    }
}

impl VisualizationState {
    pub fn new() -> Self {
        Self {
            sessions: Vec::new(),
            ranges: Vec::new(),
            selected: None,
            detail_cache: None,
            chart_kind: ChartKind::FrameTimes,
            metric: MetricKind::AverageFps,
            missed_frames_mode: MissedFramesMode::Percentages,
            palette_cursor: 0,
        }
    }

    /// Loads a capture file and appends it as a new session. On any error
    /// the collection is left untouched. Returns the new session's index.
    pub fn load_capture(&mut self, path: &Path) -> Result<usize, FramesightError> {
        let path_string = path.display().to_string();
        if path_string.is_empty() {
            return Err(FramesightError::EmptyCapturePath);
        }
        // duplicate detection is by exact path string, not canonicalized
        if self.sessions.iter().any(|s| s.path == path_string) {
            return Err(FramesightError::DuplicateSession { path: path_string });
        }

        let color = SESSION_PALETTE[self.palette_cursor % SESSION_PALETTE.len()];
        let session = loader::load_session(path, color)?;
        self.palette_cursor += 1;
        self.ranges.push(FrameRange::new(session.frame_count()));
        self.sessions.push(session);
        let index = self.sessions.len() - 1;
        if self.selected.is_none() {
            self.selected = Some(index);
        }
        Ok(index)
    }

    /// Removes the session at `index`, shifting any held detail-view
    /// reference to keep pointing at the same session.
    pub fn remove_session(&mut self, index: usize) -> Result<(), FramesightError> {
        if index >= self.sessions.len() {
            return Err(FramesightError::InvalidSessionIndex { index });
        }
        let removed = self.sessions.remove(index);
        self.ranges.remove(index);
        info!("removed session {:?}", removed.filename);

        self.selected = match self.selected {
            Some(selected) if selected == index => None,
            Some(selected) if selected > index => Some(selected - 1),
            other => other,
        };
        self.detail_cache = match self.detail_cache.take() {
            Some(cache) if cache.session_index == index => None,
            Some(mut cache) if cache.session_index > index => {
                cache.session_index -= 1;
                cache.model.session_index -= 1;
                Some(cache)
            }
            other => other,
        };
        Ok(())
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn select_session(&mut self, index: usize) -> Result<(), FramesightError> {
        if index >= self.sessions.len() {
            return Err(FramesightError::InvalidSessionIndex { index });
        }
        self.selected = Some(index);
        Ok(())
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_session(&self) -> Option<&Session> {
        self.selected.and_then(|i| self.sessions.get(i))
    }

    pub fn session_selected(&self) -> bool {
        self.selected.is_some()
    }

    pub fn selected_range(&self) -> Option<FrameRange> {
        self.selected.and_then(|i| self.ranges.get(i)).copied()
    }

    pub fn chart_kind(&self) -> ChartKind {
        self.chart_kind
    }

    pub fn set_chart_kind(&mut self, kind: ChartKind) {
        self.chart_kind = kind;
    }

    pub fn metric(&self) -> MetricKind {
        self.metric
    }

    pub fn set_metric(&mut self, metric: MetricKind) {
        self.metric = metric;
    }

    /// Advances the metric sub-mode selection, wrapping at the end.
    pub fn cycle_metric(&mut self) {
        self.metric = self.metric.next();
    }

    pub fn missed_frames_mode(&self) -> MissedFramesMode {
        self.missed_frames_mode
    }

    pub fn set_missed_frames_mode(&mut self, mode: MissedFramesMode) {
        self.missed_frames_mode = mode;
    }

    pub fn frame_times(&self) -> FrameTimesModel {
        frame_times::build(&self.sessions)
    }

    pub fn reprojections(&self) -> ReprojectionsModel {
        reprojections::build(&self.sessions)
    }

    pub fn missed_frames(&self) -> MissedFramesModel {
        match self.missed_frames_mode {
            MissedFramesMode::Percentages => missed_frames::build_percentages(&self.sessions),
            MissedFramesMode::Metric => missed_frames::build_metric(&self.sessions, self.metric),
        }
    }

    /// Returns the detail model for the selected session, rebuilding only
    /// when the selection or its range changed since the last build.
    pub fn frame_detail(&mut self) -> Result<&FrameDetailModel, FramesightError> {
        let selected = self.selected.ok_or(FramesightError::NoSessionSelected)?;
        let range = self.ranges[selected];

        let cache_valid = self
            .detail_cache
            .as_ref()
            .is_some_and(|cache| cache.session_index == selected && cache.range == range);
        if !cache_valid {
            debug!("rebuilding frame detail for session {}", selected);
            let model = frame_detail::build(&self.sessions[selected], selected, range);
            self.detail_cache = Some(DetailCache {
                session_index: selected,
                range,
                model,
            });
        }
        Ok(&self.detail_cache.as_ref().unwrap().model)
    }

    /// Advances the selected session's detail window and drops the cached
    /// detail model.
    pub fn jump_forward(&mut self) -> Result<(), FramesightError> {
        let selected = self.selected.ok_or(FramesightError::NoSessionSelected)?;
        let frame_count = self.sessions[selected].frame_count();
        self.ranges[selected].jump_forward(frame_count);
        self.detail_cache = None;
        Ok(())
    }

    pub fn jump_backward(&mut self) -> Result<(), FramesightError> {
        let selected = self.selected.ok_or(FramesightError::NoSessionSelected)?;
        let frame_count = self.sessions[selected].frame_count();
        self.ranges[selected].jump_backward(frame_count);
        self.detail_cache = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn capture_file(frames: usize) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "TimeInSeconds,MsBetweenPresents,Dropped").unwrap();
        for i in 0..frames {
            writeln!(file, "{},16.6,0", 1. + i as f64 * 0.0166).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_assigns_palette_colors_in_order() {
        let mut state = VisualizationState::new();
        let first = capture_file(10);
        let second = capture_file(10);
        state.load_capture(first.path()).unwrap();
        state.load_capture(second.path()).unwrap();

        assert_eq!(state.sessions()[0].color, SESSION_PALETTE[0]);
        assert_eq!(state.sessions()[1].color, SESSION_PALETTE[1]);
    }

    #[test]
    fn test_duplicate_path_is_rejected_and_collection_unchanged() {
        let mut state = VisualizationState::new();
        let file = capture_file(10);
        state.load_capture(file.path()).unwrap();
        let result = state.load_capture(file.path());

        assert!(matches!(
            result,
            Err(FramesightError::DuplicateSession { .. })
        ));
        assert_eq!(state.sessions().len(), 1);
    }

    #[test]
    fn test_first_load_selects_the_session() {
        let mut state = VisualizationState::new();
        let file = capture_file(10);
        state.load_capture(file.path()).unwrap();
        assert!(state.session_selected());
        assert_eq!(state.selected_index(), Some(0));
    }

    #[test]
    fn test_failed_load_leaves_state_untouched() {
        let mut state = VisualizationState::new();
        let result = state.load_capture(Path::new("/nonexistent/capture.csv"));
        assert!(result.is_err());
        assert!(state.sessions().is_empty());
        assert!(!state.session_selected());
    }

    #[test]
    fn test_removing_only_session_clears_selection_and_charts() {
        let mut state = VisualizationState::new();
        let file = capture_file(10);
        state.load_capture(file.path()).unwrap();
        state.frame_detail().unwrap();
        state.remove_session(0).unwrap();

        assert!(!state.session_selected());
        assert!(state.frame_times().series.is_empty());
        assert!(state.reprojections().series.is_empty());
        assert!(matches!(state.frame_detail(), Err(FramesightError::NoSessionSelected)));
    }

    #[test]
    fn test_removal_below_selection_shifts_indices() {
        let mut state = VisualizationState::new();
        let files: Vec<NamedTempFile> = (0..3).map(|_| capture_file(10)).collect();
        for file in &files {
            state.load_capture(file.path()).unwrap();
        }
        state.select_session(2).unwrap();
        state.frame_detail().unwrap();
        state.remove_session(0).unwrap();

        assert_eq!(state.selected_index(), Some(1));
        // the cached model still refers to the same session data
        let model = state.frame_detail().unwrap();
        assert_eq!(model.session_index, 1);
    }

    #[test]
    fn test_removal_of_cached_session_invalidates_cache() {
        let mut state = VisualizationState::new();
        let files: Vec<NamedTempFile> = (0..2).map(|_| capture_file(10)).collect();
        for file in &files {
            state.load_capture(file.path()).unwrap();
        }
        state.select_session(0).unwrap();
        state.frame_detail().unwrap();
        state.remove_session(0).unwrap();

        assert!(state.detail_cache.is_none());
        assert!(!state.session_selected());
    }

    #[test]
    fn test_detail_cache_reused_until_navigation() {
        let mut state = VisualizationState::new();
        let file = capture_file(1000);
        state.load_capture(file.path()).unwrap();

        let first = state.frame_detail().unwrap().range;
        assert_eq!(first, FrameRange { start: 0, end: 500 });
        // switching chart kinds and back does not rebuild
        state.set_chart_kind(ChartKind::FrameTimes);
        state.set_chart_kind(ChartKind::FrameDetail);
        assert!(state.detail_cache.is_some());

        state.jump_forward().unwrap();
        assert!(state.detail_cache.is_none());
        let second = state.frame_detail().unwrap().range;
        assert_eq!(second, FrameRange { start: 400, end: 900 });
    }

    #[test]
    fn test_metric_cycle_wraps_through_all_metrics() {
        let mut state = VisualizationState::new();
        let start = state.metric();
        for _ in 0..4 {
            state.cycle_metric();
        }
        assert_eq!(state.metric(), start);
    }

    #[test]
    fn test_invalid_indices_are_rejected() {
        let mut state = VisualizationState::new();
        assert!(matches!(
            state.remove_session(0),
            Err(FramesightError::InvalidSessionIndex { .. })
        ));
        assert!(matches!(
            state.select_session(3),
            Err(FramesightError::InvalidSessionIndex { .. })
        ));
    }
}
