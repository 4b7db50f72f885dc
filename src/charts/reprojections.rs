// Reprojections chart: per-session lines plus miss markers

use egui::Color32;

use crate::capture::Session;

use super::{AxisBounds, LineSeries, ReprojectionsModel, ScatterSeries};

pub const APP_MISS_COLOR: Color32 = Color32::from_rgb(255, 165, 0);
pub const WARP_MISS_COLOR: Color32 = Color32::from_rgb(220, 40, 40);

/// Builds the reprojections model: one line per session over
/// (reprojection start, reprojection time), with two overlaid scatter
/// series marking app-missed and warp-missed frames at the same
/// coordinates. The scatter series are shared across sessions so the legend
/// always reads app misses first, warp misses second.
pub fn build(sessions: &[Session]) -> ReprojectionsModel {
    let mut model = ReprojectionsModel {
        series: Vec::with_capacity(sessions.len()),
        app_misses: ScatterSeries {
            name: "App misses".to_string(),
            color: APP_MISS_COLOR,
            points: Vec::new(),
        },
        warp_misses: ScatterSeries {
            name: "Warp misses".to_string(),
            color: WARP_MISS_COLOR,
            points: Vec::new(),
        },
        bounds: AxisBounds::empty(),
    };

    for session in sessions {
        let mut series = LineSeries {
            name: session.filename.clone(),
            color: session.color,
            points: Vec::new(),
        };

        for i in 0..session.frame_count() {
            let start = session.reprojection_start[i];
            if start == 0. {
                continue;
            }
            let time = session.reprojection_times[i];
            series.points.push([start, time]);
            model.bounds.update(start, time);
            if session.app_missed[i] {
                model.app_misses.points.push([start, time]);
            }
            if session.warp_missed[i] {
                model.warp_misses.points.push([start, time]);
            }
        }

        model.series.push(series);
    }

    model
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::SessionStatistics;

    fn vr_session(
        reprojection_start: Vec<f64>,
        reprojection_times: Vec<f64>,
        app_missed: Vec<bool>,
        warp_missed: Vec<bool>,
    ) -> Session {
        let n = reprojection_start.len();
        Session {
            path: "vr.csv".to_string(),
            filename: "vr.csv".to_string(),
            is_vr: true,
            frame_start: vec![1.; n],
            frame_end: vec![0.; n],
            frame_times: vec![11.; n],
            reprojection_start,
            reprojection_end: vec![0.; n],
            reprojection_times,
            vsync: vec![0.; n],
            app_missed,
            warp_missed,
            stats: SessionStatistics::default(),
            color: Color32::WHITE,
        }
    }

    #[test]
    fn test_miss_markers_sit_on_the_line_coordinates() {
        let sessions = vec![vr_session(
            vec![1.0, 1.011, 1.022],
            vec![2.0, 2.1, 2.2],
            vec![false, true, false],
            vec![false, false, true],
        )];
        let model = build(&sessions);

        assert_eq!(model.series[0].points.len(), 3);
        assert_eq!(model.app_misses.points, vec![[1.011, 2.1]]);
        assert_eq!(model.warp_misses.points, vec![[1.022, 2.2]]);
    }

    #[test]
    fn test_zero_reprojection_starts_are_skipped() {
        let sessions = vec![vr_session(
            vec![1.0, 0., 1.022],
            vec![2.0, 2.1, 2.2],
            vec![false, true, false],
            vec![false; 3],
        )];
        let model = build(&sessions);
        assert_eq!(model.series[0].points.len(), 2);
        // the skipped row's miss flag leaves no marker either
        assert!(model.app_misses.points.is_empty());
    }

    #[test]
    fn test_legend_order_is_app_then_warp() {
        let model = build(&[]);
        assert_eq!(model.app_misses.name, "App misses");
        assert_eq!(model.warp_misses.name, "Warp misses");
    }
}
