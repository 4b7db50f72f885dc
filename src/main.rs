use std::path::PathBuf;

use clap::{Parser, Subcommand};
use egui::Vec2;

use framesight::charts::svg::{SvgExportConfig, SvgExporter};
use framesight::charts::{ChartKind, ChartModelRef, MetricKind, MissedFramesMode};
use framesight::engine::VisualizationState;
use framesight::errors::FramesightError;
use framesight::ui::analysis::{CaptureAnalysisApp, config::AppConfig};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the analysis window, preloading any capture files given
    View {
        inputs: Vec<PathBuf>,
    },
    /// Render one chart from capture files straight to an SVG document
    Export {
        #[arg(short, long)]
        output: PathBuf,

        #[arg(short, long, value_enum, default_value_t = ChartKind::FrameTimes)]
        chart: ChartKind,

        #[arg(short, long, value_enum)]
        metric: Option<MetricKind>,

        /// Session index shown by the frame-detail chart
        #[arg(short, long)]
        session: Option<usize>,

        #[arg(long, default_value_t = 1200)]
        width: u32,

        #[arg(long, default_value_t = 800)]
        height: u32,

        inputs: Vec<PathBuf>,
    },
    /// Print aggregate statistics for each capture file
    Summary {
        inputs: Vec<PathBuf>,
    },
}

fn load_all(inputs: &[PathBuf]) -> Result<VisualizationState, FramesightError> {
    if inputs.is_empty() {
        return Err(FramesightError::EmptyCapturePath);
    }
    let mut engine = VisualizationState::new();
    for input in inputs {
        engine.load_capture(input)?;
    }
    Ok(engine)
}

fn view(inputs: Vec<PathBuf>) -> Result<(), FramesightError> {
    let app_config = AppConfig::from_local_file().unwrap_or_default();
    let window_position = app_config.window_position.clone();
    let window_size = app_config.window_size();

    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = native_options
        .viewport
        .with_inner_size(Vec2::new(window_size.x, window_size.y))
        .with_position(window_position);

    eframe::run_native(
        "Framesight",
        native_options,
        Box::new(|cc| Ok(Box::new(CaptureAnalysisApp::new(cc, app_config, inputs)))),
    )
    .expect("could not start app");
    Ok(())
}

fn export(
    output: &PathBuf,
    chart: ChartKind,
    metric: Option<MetricKind>,
    session: Option<usize>,
    width: u32,
    height: u32,
    inputs: &[PathBuf],
) -> Result<(), FramesightError> {
    let mut engine = load_all(inputs)?;
    if let Some(metric) = metric {
        engine.set_metric(metric);
        engine.set_missed_frames_mode(MissedFramesMode::Metric);
    }
    if let Some(index) = session {
        engine.select_session(index)?;
    }

    let exporter = SvgExporter::with_config(SvgExportConfig {
        canvas_size: (width, height),
        ..Default::default()
    });
    match chart {
        ChartKind::FrameTimes => {
            let model = engine.frame_times();
            exporter.export(ChartModelRef::FrameTimes(&model), output)
        }
        ChartKind::Reprojections => {
            let model = engine.reprojections();
            exporter.export(ChartModelRef::Reprojections(&model), output)
        }
        ChartKind::MissedFrames => {
            let model = engine.missed_frames();
            exporter.export(ChartModelRef::MissedFrames(&model), output)
        }
        ChartKind::FrameDetail => {
            let model = engine.frame_detail()?.clone();
            exporter.export(ChartModelRef::FrameDetail(&model), output)
        }
    }
}

fn summary(inputs: &[PathBuf]) -> Result<(), FramesightError> {
    let engine = load_all(inputs)?;
    for session in engine.sessions() {
        let stats = &session.stats;
        println!("{}", session.filename);
        println!("  frames:                  {}", session.frame_count());
        println!("  vr capture:              {}", session.is_vr);
        println!("  average fps:             {:.2}", stats.average_fps());
        println!("  average frame time:     {:.3} ms", stats.average_frame_time_ms());
        println!("  99th pct frame time:    {:.3} ms", stats.frame_time_99th);
        println!("  app misses:              {}", stats.app_misses);
        println!("  warp misses:             {}", stats.warp_misses);
        if session.is_vr {
            println!(
                "  average reprojection:   {:.3} ms",
                stats.average_reprojection_time_ms()
            );
        }
        println!();
    }
    Ok(())
}

fn main() {
    #[cfg(debug_assertions)]
    colog::init();

    let cli = Args::parse();
    ctrlc::set_handler(move || {
        println!("Exiting...");
        std::process::exit(0);
    })
    .expect("Could not set Ctrl-C handler");
    match &cli.command {
        Commands::View { inputs } => {
            view(inputs.clone()).expect("Error while running the analysis window");
        }
        Commands::Export {
            output,
            chart,
            metric,
            session,
            width,
            height,
            inputs,
        } => {
            export(output, *chart, *metric, *session, *width, *height, inputs)
                .expect("Error while exporting chart");
        }
        Commands::Summary { inputs } => {
            summary(inputs).expect("Error while summarizing capture files");
        }
    };
}
