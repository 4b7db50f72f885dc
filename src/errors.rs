// Error types for framesight

use snafu::Snafu;
use std::io;

#[derive(Debug, Snafu)]
pub enum FramesightError {
    // Errors while loading capture files
    #[snafu(display("No capture file path provided"))]
    EmptyCapturePath,
    #[snafu(display("Session already loaded: {path}"))]
    DuplicateSession { path: String },
    #[snafu(display("Could not access capture file"))]
    CaptureIoError { source: io::Error },
    #[snafu(display("Error reading capture file"))]
    CaptureCsvError { source: csv::Error },
    #[snafu(display("Unrecognized capture layout: {path}"))]
    UnrecognizedCaptureLayout { path: String },
    #[snafu(display("File has wrong format, no frames captured: {path}"))]
    NoFramesCaptured { path: String },

    // Errors for session bookkeeping in the visualization engine
    #[snafu(display("No session at index {index}"))]
    InvalidSessionIndex { index: usize },
    #[snafu(display("No session selected for the frame detail chart"))]
    NoSessionSelected,

    // Chart export errors
    #[snafu(display("SVG export failed: {reason}"))]
    SvgExportError { reason: String },
    #[snafu(display("Error writing exported chart"))]
    ExportIoError { source: io::Error },

    // Config management errors
    #[snafu(display("Could not find application data directory to save config file"))]
    NoConfigDir,
    #[snafu(display("Error writing config file"))]
    ConfigIoError { source: io::Error },
    #[snafu(display("Error serializing config file"))]
    ConfigSerializeError { source: serde_json::Error },
}
