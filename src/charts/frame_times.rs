// Frame-times chart: one line per session over (frame start, frame time)

use crate::capture::Session;

use super::{AxisBounds, FrameTimesModel, LineSeries};

/// Builds the frame-times model over every loaded session.
///
/// The backend writes a zero frame time when it recorded a gap; for those
/// rows the frame time is reconstructed from the distance to the previous
/// nonzero frame start. A zero frame time before any nonzero start has been
/// seen cannot be reconstructed and is skipped, as are rows whose frame
/// start itself is zero.
pub fn build(sessions: &[Session]) -> FrameTimesModel {
    let mut model = FrameTimesModel {
        series: Vec::with_capacity(sessions.len()),
        bounds: AxisBounds::empty(),
    };

    for session in sessions {
        let mut series = LineSeries {
            name: session.filename.clone(),
            color: session.color,
            points: Vec::new(),
        };

        let mut last_start: Option<f64> = None;
        for (start, time) in session.frame_start.iter().zip(&session.frame_times) {
            if *start == 0. {
                continue;
            }
            let frame_time = if *time != 0. {
                *time
            } else if let Some(previous) = last_start {
                1000. * (*start - previous)
            } else {
                last_start = Some(*start);
                continue;
            };
            series.points.push([*start, frame_time]);
            model.bounds.update(*start, frame_time);
            last_start = Some(*start);
        }

        model.series.push(series);
    }

    model
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::SessionStatistics;
    use egui::Color32;

    fn session(frame_start: Vec<f64>, frame_times: Vec<f64>) -> Session {
        let n = frame_start.len();
        Session {
            path: "test.csv".to_string(),
            filename: "test.csv".to_string(),
            is_vr: false,
            frame_start,
            frame_end: vec![0.; n],
            frame_times,
            reprojection_start: vec![0.; n],
            reprojection_end: vec![0.; n],
            reprojection_times: vec![0.; n],
            vsync: vec![0.; n],
            app_missed: vec![false; n],
            warp_missed: vec![false; n],
            stats: SessionStatistics::default(),
            color: Color32::WHITE,
        }
    }

    #[test]
    fn test_one_series_per_session_with_nonzero_rows() {
        let sessions = vec![
            session(vec![1.0, 1.016, 1.033], vec![16.6, 16.7, 16.8]),
            session(vec![2.0, 2.02], vec![20.0, 20.1]),
        ];
        let model = build(&sessions);

        assert_eq!(model.series.len(), 2);
        assert_eq!(model.series[0].points.len(), 3);
        assert_eq!(model.series[0].points[1], [1.016, 16.7]);
        assert_eq!(model.series[1].points.len(), 2);
    }

    #[test]
    fn test_zero_frame_time_reconstructed_from_previous_start() {
        let sessions = vec![session(vec![1.0, 1.020], vec![16.6, 0.])];
        let model = build(&sessions);

        let points = &model.series[0].points;
        assert_eq!(points.len(), 2);
        assert!((points[1][1] - 20.).abs() < 1e-9);
    }

    #[test]
    fn test_leading_zero_frame_time_is_skipped() {
        let sessions = vec![session(vec![1.0, 1.016], vec![0., 16.7])];
        let model = build(&sessions);
        // the first row only seeds the reconstruction baseline
        assert_eq!(model.series[0].points, vec![[1.016, 16.7]]);
    }

    #[test]
    fn test_zero_frame_start_rows_are_skipped() {
        let sessions = vec![session(vec![1.0, 0., 1.033], vec![16.6, 16.7, 16.8])];
        let model = build(&sessions);
        assert_eq!(model.series[0].points.len(), 2);
    }

    #[test]
    fn test_bounds_cover_all_series() {
        let sessions = vec![
            session(vec![1.0], vec![10.]),
            session(vec![5.0], vec![40.]),
        ];
        let model = build(&sessions);
        assert_eq!(model.bounds.min_x, 1.0);
        assert_eq!(model.bounds.max_x, 5.0);
        assert_eq!(model.bounds.min_y, 10.);
        assert_eq!(model.bounds.max_y, 40.);
    }

    #[test]
    fn test_empty_collection_builds_empty_model() {
        let model = build(&[]);
        assert!(model.series.is_empty());
        assert!(!model.bounds.is_finite());
    }
}
