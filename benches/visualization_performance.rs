use criterion::{Criterion, black_box, criterion_group, criterion_main};
use framesight::VisualizationState;
use framesight::capture::{FrameRange, loader};
use framesight::charts::{frame_detail, frame_times, missed_frames, reprojections};
use std::io::Write;
use std::time::Duration;

fn write_vr_capture(rows: usize) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "AppRenderStart,AppRenderEnd,AppRenderTime,ReprojectionStart,ReprojectionEnd,ReprojectionTime,VSync,AppMissed,WarpMissed"
    )
    .unwrap();
    for i in 0..rows {
        let start = 1. + i as f64 * 0.011;
        writeln!(
            file,
            "{},{},11.1,{},{},2.2,{},{},{}",
            start,
            start + 0.004,
            start + 0.005,
            start + 0.009,
            start + 0.010,
            if i % 7 == 0 { 1 } else { 0 },
            if i % 11 == 0 { 1 } else { 0 },
        )
        .unwrap();
    }
    file.flush().unwrap();
    file
}

fn bench_capture_ingestion(c: &mut Criterion) {
    let mut group = c.benchmark_group("capture_ingestion");
    group.measurement_time(Duration::from_secs(10));

    for rows in [1_000usize, 30_000] {
        let file = write_vr_capture(rows);
        group.bench_function(format!("load_{}_rows", rows), |b| {
            b.iter(|| black_box(loader::load_session(file.path(), egui::Color32::WHITE).unwrap()));
        });
    }

    group.finish();
}

fn bench_chart_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("chart_construction");

    let file = write_vr_capture(30_000);
    let mut engine = VisualizationState::new();
    engine.load_capture(file.path()).unwrap();
    let sessions = engine.sessions().to_vec();

    group.bench_function("frame_times_30k", |b| {
        b.iter(|| black_box(frame_times::build(&sessions)));
    });
    group.bench_function("reprojections_30k", |b| {
        b.iter(|| black_box(reprojections::build(&sessions)));
    });
    group.bench_function("missed_frames_30k", |b| {
        b.iter(|| black_box(missed_frames::build_percentages(&sessions)));
    });
    // the detail builder only ever sees one pagination window
    group.bench_function("frame_detail_window", |b| {
        let range = FrameRange::new(sessions[0].frame_count());
        b.iter(|| black_box(frame_detail::build(&sessions[0], 0, range)));
    });

    group.finish();
}

criterion_group!(benches, bench_capture_ingestion, bench_chart_construction);
criterion_main!(benches);
