// Header-name resolution for capture CSV files
//
// The upstream capture tool renamed its CSV columns across versions and
// writes different layouts for VR and non-VR captures, so every logical
// field maps to a set of accepted header names. The table is resolved once
// per file; unknown columns are ignored.

use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalColumn {
    FrameStart,
    FrameEnd,
    FrameTime,
    ReprojectionStart,
    ReprojectionEnd,
    ReprojectionTime,
    VSync,
    AppMissed,
    WarpMissed,
}

const COLUMN_ALIASES: &[(LogicalColumn, &[&str])] = &[
    (LogicalColumn::FrameStart, &["AppRenderStart", "TimeInSeconds"]),
    (
        LogicalColumn::FrameEnd,
        &["AppRenderEnd", "MsUntilRenderComplete"],
    ),
    (
        LogicalColumn::FrameTime,
        &["AppRenderTime", "MsBetweenPresents"],
    ),
    (LogicalColumn::ReprojectionStart, &["ReprojectionStart"]),
    (
        LogicalColumn::ReprojectionEnd,
        &["ReprojectionEnd", "MsUntilDisplayed"],
    ),
    (
        LogicalColumn::ReprojectionTime,
        &["ReprojectionTime", "MsBetweenLsrs"],
    ),
    (LogicalColumn::VSync, &["VSync"]),
    (LogicalColumn::AppMissed, &["AppMissed", "Dropped"]),
    (LogicalColumn::WarpMissed, &["WarpMissed", "LsrMissed"]),
];

/// Resolved column positions for one capture file.
#[derive(Debug, Clone, Default)]
pub struct ColumnSchema {
    pub frame_start: Option<usize>,
    pub frame_end: Option<usize>,
    pub frame_time: Option<usize>,
    pub reprojection_start: Option<usize>,
    pub reprojection_end: Option<usize>,
    pub reprojection_time: Option<usize>,
    pub vsync: Option<usize>,
    pub app_missed: Option<usize>,
    pub warp_missed: Option<usize>,
    /// Field count of the header row; data rows with any other width are
    /// dropped (the backend appends a truncated warning line on shutdown).
    pub width: usize,
}

impl ColumnSchema {
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> Self {
        let mut schema = ColumnSchema {
            width: headers.len(),
            ..Default::default()
        };

        for (index, header) in headers.iter().enumerate() {
            let header = header.as_ref().trim();
            let Some((column, _)) = COLUMN_ALIASES
                .iter()
                .find(|(_, aliases)| aliases.contains(&header))
            else {
                continue;
            };
            debug!("resolved column {:?} at index {}: {}", column, index, header);
            let slot = match column {
                LogicalColumn::FrameStart => &mut schema.frame_start,
                LogicalColumn::FrameEnd => &mut schema.frame_end,
                LogicalColumn::FrameTime => &mut schema.frame_time,
                LogicalColumn::ReprojectionStart => &mut schema.reprojection_start,
                LogicalColumn::ReprojectionEnd => &mut schema.reprojection_end,
                LogicalColumn::ReprojectionTime => &mut schema.reprojection_time,
                LogicalColumn::VSync => &mut schema.vsync,
                LogicalColumn::AppMissed => &mut schema.app_missed,
                LogicalColumn::WarpMissed => &mut schema.warp_missed,
            };
            // first match wins if a file repeats a name
            if slot.is_none() {
                *slot = Some(index);
            }
        }

        schema
    }

    /// Only VR captures carry a VSync column.
    pub fn is_vr(&self) -> bool {
        self.vsync.is_some()
    }

    /// A layout we can chart needs at least frame starts and frame times.
    pub fn has_core_columns(&self) -> bool {
        self.frame_start.is_some() && self.frame_time.is_some()
    }
}
