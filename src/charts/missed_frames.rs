// Missed-frames summary chart: stacked percentages or a single metric bar

use crate::capture::Session;

use super::{MetricBar, MetricKind, MissedFramesModel, StackedBar};

/// Builds the 100%-stacked percentages model: per session, the share of
/// frames delivered on time, missed by the application, and missed by the
/// compositor. Sessions without reprojection data get no warp segment; its
/// share folds into the success segment so every bar still sums to 100.
pub fn build_percentages(sessions: &[Session]) -> MissedFramesModel {
    let bars = sessions
        .iter()
        .map(|session| {
            let total = session.frame_count() as f64;
            let app = session.stats.app_misses as f64;
            let has_reprojections = session.stats.valid_repro_frames > 0;
            let warp = if has_reprojections {
                session.stats.warp_misses as f64
            } else {
                0.
            };
            StackedBar {
                label: session.filename.clone(),
                color: session.color,
                success_pct: (total - app - warp) / total * 100.,
                app_miss_pct: app / total * 100.,
                warp_miss_pct: has_reprojections.then(|| warp / total * 100.),
            }
        })
        .collect();
    MissedFramesModel::Percentages(bars)
}

/// Builds the metric sub-mode model: one unstacked bar per session showing
/// the selected aggregate scalar.
pub fn build_metric(sessions: &[Session], metric: MetricKind) -> MissedFramesModel {
    let bars = sessions
        .iter()
        .map(|session| {
            let value = match metric {
                MetricKind::AverageFps => session.stats.average_fps(),
                MetricKind::AverageFrameTime => session.stats.average_frame_time_ms(),
                MetricKind::AverageReprojectionTime => {
                    session.stats.average_reprojection_time_ms()
                }
                MetricKind::FrameTime99th => session.stats.frame_time_99th,
            };
            MetricBar {
                label: session.filename.clone(),
                color: session.color,
                value,
            }
        })
        .collect();
    MissedFramesModel::Metric { metric, bars }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::SessionStatistics;
    use egui::Color32;

    fn session(n: usize, app_misses: usize, warp_misses: usize, vr: bool) -> Session {
        let mut app_missed = vec![false; n];
        let mut warp_missed = vec![false; n];
        for flag in app_missed.iter_mut().take(app_misses) {
            *flag = true;
        }
        for flag in warp_missed.iter_mut().take(warp_misses) {
            *flag = true;
        }
        let frame_start: Vec<f64> = (1..=n).map(|i| i as f64 / 90.).collect();
        let reprojection_start: Vec<f64> = if vr {
            frame_start.iter().map(|s| s + 0.002).collect()
        } else {
            vec![0.; n]
        };
        let stats = SessionStatistics::compute(
            &frame_start,
            &vec![11.1; n],
            &reprojection_start,
            &app_missed,
            &warp_missed,
        );
        Session {
            path: "s.csv".to_string(),
            filename: "s.csv".to_string(),
            is_vr: vr,
            frame_start,
            frame_end: vec![0.; n],
            frame_times: vec![11.1; n],
            reprojection_start,
            reprojection_end: vec![0.; n],
            reprojection_times: vec![2.; n],
            vsync: vec![0.; n],
            app_missed,
            warp_missed,
            stats,
            color: Color32::WHITE,
        }
    }

    #[test]
    fn test_stacked_percentages_sum_to_100() {
        let sessions = vec![session(200, 13, 7, true), session(50, 3, 0, true)];
        let MissedFramesModel::Percentages(bars) = build_percentages(&sessions) else {
            panic!("expected percentages model");
        };
        for bar in &bars {
            let sum = bar.success_pct + bar.app_miss_pct + bar.warp_miss_pct.unwrap_or(0.);
            assert!((sum - 100.).abs() < 1e-9);
        }
        assert!((bars[0].app_miss_pct - 6.5).abs() < 1e-9);
    }

    #[test]
    fn test_non_vr_session_has_no_warp_segment() {
        let sessions = vec![session(100, 5, 0, false)];
        let MissedFramesModel::Percentages(bars) = build_percentages(&sessions) else {
            panic!("expected percentages model");
        };
        assert!(bars[0].warp_miss_pct.is_none());
        assert!((bars[0].success_pct + bars[0].app_miss_pct - 100.).abs() < 1e-9);
    }

    #[test]
    fn test_metric_bars_use_session_statistics() {
        let sessions = vec![session(90, 0, 0, false)];
        let MissedFramesModel::Metric { metric, bars } =
            build_metric(&sessions, MetricKind::AverageFps)
        else {
            panic!("expected metric model");
        };
        assert_eq!(metric, MetricKind::AverageFps);
        // 90 valid frames, last frame start at 90/90 = 1.0s
        assert!((bars[0].value - 90.).abs() < 1e-9);
    }

    #[test]
    fn test_percentile_metric_reads_precomputed_statistic() {
        let sessions = vec![session(10, 0, 0, false)];
        let MissedFramesModel::Metric { bars, .. } =
            build_metric(&sessions, MetricKind::FrameTime99th)
        else {
            panic!("expected metric model");
        };
        assert!((bars[0].value - 11.1).abs() < 1e-9);
    }
}
