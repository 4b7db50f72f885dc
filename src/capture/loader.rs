// CSV ingestion for capture logs

use std::fs::File;
use std::path::Path;

use egui::Color32;
use log::{debug, info, warn};

use super::columns::ColumnSchema;
use super::{Session, SessionStatistics};
use crate::errors::FramesightError;

/// Parses a capture CSV into a `Session`. The caller (the visualization
/// engine) owns duplicate detection, palette assignment, and range setup;
/// this function only produces the per-frame model.
pub fn load_session(path: &Path, color: Color32) -> Result<Session, FramesightError> {
    // open the file ourselves so open failures classify as I/O errors
    let file = File::open(path).map_err(|e| FramesightError::CaptureIoError { source: e })?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| FramesightError::CaptureCsvError { source: e })?;
    let header_fields: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let schema = ColumnSchema::resolve(&header_fields);
    if !schema.has_core_columns() {
        return Err(FramesightError::UnrecognizedCaptureLayout {
            path: path.display().to_string(),
        });
    }
    let is_vr = schema.is_vr();
    debug!("capture layout for {:?}: vr={} {:?}", path, is_vr, schema);

    let mut session = Session {
        path: path.display().to_string(),
        filename: path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string()),
        is_vr,
        frame_start: Vec::new(),
        frame_end: Vec::new(),
        frame_times: Vec::new(),
        reprojection_start: Vec::new(),
        reprojection_end: Vec::new(),
        reprojection_times: Vec::new(),
        vsync: Vec::new(),
        app_missed: Vec::new(),
        warp_missed: Vec::new(),
        stats: SessionStatistics::default(),
        color,
    };

    let mut skipped_rows = 0usize;
    for record in reader.records() {
        let record = record.map_err(|e| FramesightError::CaptureCsvError { source: e })?;

        // the backend appends a truncated warning line on shutdown; any row
        // whose width differs from the header is dropped, never an error
        if record.len() != schema.width {
            continue;
        }

        // the core group must parse as numbers or the row is skipped
        let Some(frame_start) = parse_column(&record, schema.frame_start) else {
            skipped_rows += 1;
            continue;
        };
        let Some(frame_time) = parse_column(&record, schema.frame_time) else {
            skipped_rows += 1;
            continue;
        };
        let frame_end_raw = match schema.frame_end {
            Some(index) => match parse_column(&record, Some(index)) {
                Some(value) => value,
                None => {
                    skipped_rows += 1;
                    continue;
                }
            },
            None => 0.,
        };
        let app_missed = match schema.app_missed {
            Some(index) => match parse_column(&record, Some(index)) {
                Some(value) => value != 0.,
                None => {
                    skipped_rows += 1;
                    continue;
                }
            },
            None => false,
        };
        let warp_missed = match schema.warp_missed {
            Some(index) => match parse_column(&record, Some(index)) {
                Some(value) => value != 0.,
                None => {
                    skipped_rows += 1;
                    continue;
                }
            },
            None => false,
        };

        // the reprojection group falls back to zero so every sequence keeps
        // one entry per admitted row
        let reprojection_start = parse_column(&record, schema.reprojection_start).unwrap_or(0.);
        let reprojection_end_raw = parse_column(&record, schema.reprojection_end).unwrap_or(0.);
        let reprojection_time = parse_column(&record, schema.reprojection_time).unwrap_or(0.);
        let vsync = parse_column(&record, schema.vsync).unwrap_or(0.);

        // VR layouts carry absolute end timestamps; non-VR layouts carry
        // millisecond deltas from the frame start
        let frame_end = if is_vr {
            frame_end_raw
        } else if schema.frame_end.is_some() {
            frame_start + frame_end_raw / 1000.
        } else {
            0.
        };
        let reprojection_end = if is_vr {
            reprojection_end_raw
        } else if schema.reprojection_end.is_some() {
            frame_start + reprojection_end_raw / 1000.
        } else {
            0.
        };

        session.frame_start.push(frame_start);
        session.frame_end.push(frame_end);
        session.frame_times.push(frame_time);
        session.reprojection_start.push(reprojection_start);
        session.reprojection_end.push(reprojection_end);
        session.reprojection_times.push(reprojection_time);
        session.vsync.push(vsync);
        session.app_missed.push(app_missed);
        session.warp_missed.push(warp_missed);
    }

    if skipped_rows > 0 {
        warn!("skipped {} unparsable rows in {:?}", skipped_rows, path);
    }
    if session.frame_count() == 0 {
        return Err(FramesightError::NoFramesCaptured {
            path: path.display().to_string(),
        });
    }

    session.stats = SessionStatistics::compute(
        &session.frame_start,
        &session.frame_times,
        &session.reprojection_start,
        &session.app_missed,
        &session.warp_missed,
    );
    info!(
        "loaded {:?}: {} frames, vr={}, {} app misses, {} warp misses",
        path,
        session.frame_count(),
        session.is_vr,
        session.stats.app_misses,
        session.stats.warp_misses
    );
    Ok(session)
}

fn parse_column(record: &csv::StringRecord, index: Option<usize>) -> Option<f64> {
    record.get(index?)?.trim().parse::<f64>().ok()
}
