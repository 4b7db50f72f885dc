// Desktop analysis shell: session list, chart panels, export controls

use std::path::PathBuf;

use egui::{Color32, Direction, Frame, Layout, Margin, RichText, Ui, Vec2b};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points, VLine};
use log::error;

pub mod config;

use crate::charts::svg::{SvgExportConfig, SvgExporter};
use crate::charts::{ChartKind, ChartModelRef, MissedFramesMode, MissedFramesModel};
use crate::engine::VisualizationState;
use crate::ui::PALETTE_BLACK;
use config::AppConfig;

pub struct CaptureAnalysisApp {
    engine: VisualizationState,
    config: AppConfig,
    error_message: Option<String>,
}

impl CaptureAnalysisApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: AppConfig,
        preload: Vec<PathBuf>,
    ) -> Self {
        // This gives us image support:
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let mut engine = VisualizationState::new();
        engine.set_chart_kind(config.chart_kind);
        engine.set_metric(config.metric);
        engine.set_missed_frames_mode(config.missed_frames_mode);

        let mut error_message = None;
        for path in preload {
            if let Err(e) = engine.load_capture(&path) {
                error!("could not preload {:?}: {}", path, e);
                error_message = Some(format!("{}", e));
            }
        }

        Self {
            engine,
            config,
            error_message,
        }
    }

    fn show_toolbar(&mut self, ui: &mut Ui) {
        ui.horizontal_wrapped(|ui| {
            ui.visuals_mut().button_frame = false;
            if ui.button("📂 Load capture").clicked()
                && let Some(path) = rfd::FileDialog::new()
                    .add_filter("Capture CSV", &["csv"])
                    .pick_file()
                && let Err(e) = self.engine.load_capture(&path)
            {
                self.error_message = Some(format!("{}", e));
            }
            ui.separator();

            for kind in [
                ChartKind::FrameTimes,
                ChartKind::Reprojections,
                ChartKind::MissedFrames,
                ChartKind::FrameDetail,
            ] {
                if ui
                    .selectable_label(self.engine.chart_kind() == kind, kind.label())
                    .clicked()
                {
                    self.engine.set_chart_kind(kind);
                }
            }
            ui.separator();

            match self.engine.chart_kind() {
                ChartKind::MissedFrames => {
                    let mode_label = match self.engine.missed_frames_mode() {
                        MissedFramesMode::Percentages => "Mode: percentages",
                        MissedFramesMode::Metric => "Mode: metric",
                    };
                    if ui.button(mode_label).clicked() {
                        let next = match self.engine.missed_frames_mode() {
                            MissedFramesMode::Percentages => MissedFramesMode::Metric,
                            MissedFramesMode::Metric => MissedFramesMode::Percentages,
                        };
                        self.engine.set_missed_frames_mode(next);
                    }
                    if self.engine.missed_frames_mode() == MissedFramesMode::Metric
                        && ui.button(self.engine.metric().label()).clicked()
                    {
                        self.engine.cycle_metric();
                    }
                }
                ChartKind::FrameDetail => {
                    if ui.button("⏴ Back 400 frames").clicked()
                        && let Err(e) = self.engine.jump_backward()
                    {
                        self.error_message = Some(format!("{}", e));
                    }
                    if ui.button("Forward 400 frames ⏵").clicked()
                        && let Err(e) = self.engine.jump_forward()
                    {
                        self.error_message = Some(format!("{}", e));
                    }
                    if let Some(range) = self.engine.selected_range() {
                        ui.label(format!("Frames {} – {}", range.start, range.end));
                    }
                }
                _ => {}
            }
            ui.separator();

            if ui.button("💾 Export SVG").clicked()
                && let Some(path) = rfd::FileDialog::new()
                    .add_filter("SVG", &["svg"])
                    .save_file()
                && let Err(e) = self.export_current_chart(&path)
            {
                self.error_message = Some(format!("{}", e));
            }
        });
    }

    fn export_current_chart(&mut self, path: &std::path::Path) -> Result<(), crate::errors::FramesightError> {
        let exporter = SvgExporter::with_config(SvgExportConfig {
            canvas_size: (self.config.export_width, self.config.export_height),
            ..Default::default()
        });
        match self.engine.chart_kind() {
            ChartKind::FrameTimes => {
                let model = self.engine.frame_times();
                exporter.export(ChartModelRef::FrameTimes(&model), path)
            }
            ChartKind::Reprojections => {
                let model = self.engine.reprojections();
                exporter.export(ChartModelRef::Reprojections(&model), path)
            }
            ChartKind::MissedFrames => {
                let model = self.engine.missed_frames();
                exporter.export(ChartModelRef::MissedFrames(&model), path)
            }
            ChartKind::FrameDetail => {
                let model = self.engine.frame_detail()?.clone();
                exporter.export(ChartModelRef::FrameDetail(&model), path)
            }
        }
    }

    fn show_session_list(&mut self, ui: &mut Ui) {
        ui.label(RichText::new("Sessions").color(Color32::WHITE).strong());
        ui.separator();

        let mut select: Option<usize> = None;
        let mut remove: Option<usize> = None;
        for (index, session) in self.engine.sessions().iter().enumerate() {
            ui.horizontal(|ui| {
                ui.label(RichText::new("■").color(session.color));
                let selected = self.engine.selected_index() == Some(index);
                if ui.selectable_label(selected, &session.filename).clicked() {
                    select = Some(index);
                }
                if ui.small_button("✖").clicked() {
                    remove = Some(index);
                }
            });
            ui.label(
                RichText::new(format!(
                    "{} frames{} · {:.1} fps avg · {:.2} ms p99",
                    session.frame_count(),
                    if session.is_vr { " (VR)" } else { "" },
                    session.stats.average_fps(),
                    session.stats.frame_time_99th,
                ))
                .color(Color32::GRAY)
                .small(),
            );
            ui.label(
                RichText::new(format!(
                    "{} app misses · {} warp misses",
                    session.stats.app_misses, session.stats.warp_misses
                ))
                .color(Color32::GRAY)
                .small(),
            );
            ui.add_space(4.);
        }

        if let Some(index) = select
            && let Err(e) = self.engine.select_session(index)
        {
            self.error_message = Some(format!("{}", e));
        }
        if let Some(index) = remove
            && let Err(e) = self.engine.remove_session(index)
        {
            self.error_message = Some(format!("{}", e));
        }
    }

    fn show_chart(&mut self, ui: &mut Ui) {
        ui.with_layout(Layout::centered_and_justified(Direction::TopDown), |ui| {
            match self.engine.chart_kind() {
                ChartKind::FrameTimes => self.show_frame_times(ui),
                ChartKind::Reprojections => self.show_reprojections(ui),
                ChartKind::MissedFrames => self.show_missed_frames(ui),
                ChartKind::FrameDetail => self.show_frame_detail(ui),
            }
        });
    }

    fn show_frame_times(&mut self, ui: &mut Ui) {
        let model = self.engine.frame_times();
        let mut plot = Plot::new("frame_times")
            .show_background(false)
            .legend(Legend::default());
        if model.bounds.is_finite() {
            plot = plot
                .include_x(model.bounds.min_x)
                .include_x(model.bounds.max_x)
                .include_y(0.)
                .include_y(model.bounds.max_y * 1.05)
                .auto_bounds(Vec2b::new(false, false));
        }
        plot.show(ui, |plot_ui| {
            for series in &model.series {
                plot_ui.line(
                    Line::new(series.name.clone(), PlotPoints::new(series.points.clone()))
                        .color(series.color),
                );
            }
        });
    }

    fn show_reprojections(&mut self, ui: &mut Ui) {
        let model = self.engine.reprojections();
        let mut plot = Plot::new("reprojections")
            .show_background(false)
            .legend(Legend::default());
        if model.bounds.is_finite() {
            plot = plot
                .include_x(model.bounds.min_x)
                .include_x(model.bounds.max_x)
                .include_y(0.)
                .include_y(model.bounds.max_y * 1.05)
                .auto_bounds(Vec2b::new(false, false));
        }
        plot.show(ui, |plot_ui| {
            for series in &model.series {
                plot_ui.line(
                    Line::new(series.name.clone(), PlotPoints::new(series.points.clone()))
                        .color(series.color),
                );
            }
            for scatter in [&model.app_misses, &model.warp_misses] {
                plot_ui.points(
                    Points::new(scatter.name.clone(), PlotPoints::new(scatter.points.clone()))
                        .color(scatter.color)
                        .radius(3.),
                );
            }
        });
    }

    fn show_missed_frames(&mut self, ui: &mut Ui) {
        let model = self.engine.missed_frames();
        let plot = Plot::new("missed_frames")
            .show_background(false)
            .legend(Legend::default());
        plot.show(ui, |plot_ui| match &model {
            MissedFramesModel::Percentages(bars) => {
                let mut success = Vec::new();
                let mut app = Vec::new();
                let mut warp = Vec::new();
                for (slot, bar) in bars.iter().enumerate() {
                    let x = slot as f64;
                    success.push(Bar::new(x, bar.success_pct).name(&bar.label).fill(bar.color));
                    app.push(
                        Bar::new(x, bar.app_miss_pct)
                            .base_offset(bar.success_pct)
                            .fill(crate::charts::reprojections::APP_MISS_COLOR),
                    );
                    if let Some(warp_pct) = bar.warp_miss_pct {
                        warp.push(
                            Bar::new(x, warp_pct)
                                .base_offset(bar.success_pct + bar.app_miss_pct)
                                .fill(crate::charts::reprojections::WARP_MISS_COLOR),
                        );
                    }
                }
                plot_ui.bar_chart(BarChart::new("Delivered %", success));
                plot_ui.bar_chart(BarChart::new("App misses %", app));
                plot_ui.bar_chart(BarChart::new("Warp misses %", warp));
            }
            MissedFramesModel::Metric { metric, bars } => {
                let bars = bars
                    .iter()
                    .enumerate()
                    .map(|(slot, bar)| {
                        Bar::new(slot as f64, bar.value).name(&bar.label).fill(bar.color)
                    })
                    .collect();
                plot_ui.bar_chart(BarChart::new(metric.label(), bars));
            }
        });
    }

    fn show_frame_detail(&mut self, ui: &mut Ui) {
        let model = match self.engine.frame_detail() {
            Ok(model) => model.clone(),
            Err(_) => {
                ui.label(
                    RichText::new("Select a session to inspect its frames")
                        .color(Color32::WHITE)
                        .strong(),
                );
                return;
            }
        };

        let plot = Plot::new("frame_detail")
            .show_background(false)
            .legend(Legend::default())
            .include_x(model.bounds.min_x)
            .include_x(model.bounds.max_x)
            .include_y(model.bounds.min_y)
            .include_y(model.bounds.max_y)
            .auto_bounds(Vec2b::new(false, false));
        plot.show(ui, |plot_ui| {
            for frame in &model.frames {
                let points: Vec<[f64; 2]> = frame
                    .events
                    .iter()
                    .filter(|e| e.is_defined())
                    .map(|e| [e.x, e.y])
                    .collect();
                plot_ui.line(
                    Line::new(format!("Frame {}", frame.frame_index), PlotPoints::new(points))
                        .color(frame.color),
                );
            }
            for vsync in &model.vsyncs {
                plot_ui.vline(VLine::new("VSync", *vsync).color(Color32::LIGHT_BLUE));
            }
        });
    }
}

impl eframe::App for CaptureAnalysisApp {
    fn save(&mut self, _storage: &mut dyn eframe::Storage) {
        self.config.chart_kind = self.engine.chart_kind();
        self.config.metric = self.engine.metric();
        self.config.missed_frames_mode = self.engine.missed_frames_mode();
        if let Err(e) = self.config.save() {
            error!("could not save config: {}", e);
        }
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(rect) = ctx.input(|i| i.viewport().outer_rect) {
            self.config.window_position = rect.min.into();
        }

        egui::TopBottomPanel::top("capture_toolbar")
            .frame(egui::Frame::new().inner_margin(4))
            .show(ctx, |ui| {
                self.show_toolbar(ui);
            });

        egui::SidePanel::left("session_list")
            .frame(
                Frame::default()
                    .fill(PALETTE_BLACK)
                    .inner_margin(Margin::same(5)),
            )
            .resizable(true)
            .min_width(220.0)
            .max_width(380.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.show_session_list(ui);
                });
            });

        egui::CentralPanel::default()
            .frame(
                Frame::default()
                    .fill(Color32::TRANSPARENT)
                    .inner_margin(Margin::same(5)),
            )
            .show(ctx, |ui| {
                self.show_chart(ui);
            });

        // blocking notification analog: the operation already aborted, the
        // window just reports it
        if let Some(message) = self.error_message.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(RichText::new(message).color(Color32::RED));
                    if ui.button("OK").clicked() {
                        self.error_message = None;
                    }
                });
        }
    }
}
