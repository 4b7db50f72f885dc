// SVG export of the currently displayed chart

use std::fs::File;
use std::io::Write;
use std::path::Path;

use egui::Color32;
use itertools::Itertools;
use log::info;

use super::{
    AxisBounds, ChartModelRef, FrameDetailModel, FrameTimesModel, MissedFramesModel,
    ReprojectionsModel,
};
use crate::errors::FramesightError;

/// Configuration for exported chart documents
#[derive(Debug, Clone)]
pub struct SvgExportConfig {
    /// Canvas dimensions (width, height) in pixels
    pub canvas_size: (u32, u32),
    /// Stroke width for data series
    pub stroke_width: f32,
    /// Margin around the plot area as a fraction of the canvas size
    pub margin_fraction: f32,
}

impl Default for SvgExportConfig {
    fn default() -> Self {
        Self {
            canvas_size: (1200, 800),
            stroke_width: 1.5,
            margin_fraction: 0.08,
        }
    }
}

pub struct SvgExporter {
    config: SvgExportConfig,
}

impl SvgExporter {
    pub fn new() -> Self {
        Self {
            config: SvgExportConfig::default(),
        }
    }

    pub fn with_config(config: SvgExportConfig) -> Self {
        Self { config }
    }

    /// Renders `chart` to standalone SVG markup and writes it to `path`.
    /// Degenerate models (nothing plottable) fail instead of producing an
    /// empty document.
    pub fn export(&self, chart: ChartModelRef<'_>, path: &Path) -> Result<(), FramesightError> {
        let markup = match chart {
            ChartModelRef::FrameTimes(model) => self.render_frame_times(model)?,
            ChartModelRef::Reprojections(model) => self.render_reprojections(model)?,
            ChartModelRef::MissedFrames(model) => self.render_missed_frames(model)?,
            ChartModelRef::FrameDetail(model) => self.render_frame_detail(model)?,
        };

        let mut file =
            File::create(path).map_err(|e| FramesightError::ExportIoError { source: e })?;
        file.write_all(markup.as_bytes())
            .map_err(|e| FramesightError::ExportIoError { source: e })?;
        info!("exported chart to {:?}", path);
        Ok(())
    }

    fn plot_area(&self) -> PlotArea {
        let (width, height) = self.config.canvas_size;
        let margin = (width.min(height) as f64) * self.config.margin_fraction as f64;
        PlotArea {
            x0: margin,
            y0: margin,
            width: width as f64 - 2. * margin,
            height: height as f64 - 2. * margin,
        }
    }

    fn document_open(&self) -> String {
        format!(
            r##"<svg width="{}" height="{}" xmlns="http://www.w3.org/2000/svg">
  <rect width="100%" height="100%" fill="#ffffff" />"##,
            self.config.canvas_size.0, self.config.canvas_size.1
        )
    }

    fn plot_frame(&self, area: &PlotArea, bounds: &AxisBounds) -> String {
        let mut svg = format!(
            "\n  <rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"none\" stroke=\"#333333\" stroke-width=\"1\" />",
            area.x0, area.y0, area.width, area.height
        );
        // min/max labels on both axes
        svg.push_str(&format!(
            "\n  <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"12\">{:.4}</text>\
             \n  <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"12\" text-anchor=\"end\">{:.4}</text>\
             \n  <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"12\">{:.2}</text>\
             \n  <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"12\">{:.2}</text>",
            area.x0,
            area.y0 + area.height + 16.,
            bounds.min_x,
            area.x0 + area.width,
            area.y0 + area.height + 16.,
            bounds.max_x,
            area.x0 - 4.,
            area.y0 + area.height,
            bounds.min_y,
            area.x0 - 4.,
            area.y0 + 10.,
            bounds.max_y,
        ));
        svg
    }

    fn legend(&self, area: &PlotArea, entries: &[(String, Color32)]) -> String {
        let mut svg = String::new();
        for (slot, (name, color)) in entries.iter().enumerate() {
            let y = area.y0 + 14. + slot as f64 * 16.;
            svg.push_str(&format!(
                "\n  <rect x=\"{:.1}\" y=\"{:.1}\" width=\"10\" height=\"10\" fill=\"{}\" />\
                 \n  <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"12\">{}</text>",
                area.x0 + 8.,
                y - 9.,
                color_hex(*color),
                area.x0 + 22.,
                y,
                name
            ));
        }
        svg
    }

    fn polyline(&self, points: &[(f64, f64)], color: Color32) -> String {
        let joined = points
            .iter()
            .map(|(x, y)| format!("{:.2},{:.2}", x, y))
            .join(" ");
        format!(
            "\n  <polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" />",
            joined,
            color_hex(color),
            self.config.stroke_width
        )
    }

    fn render_frame_times(&self, model: &FrameTimesModel) -> Result<String, FramesightError> {
        if !model.bounds.is_finite() {
            return Err(FramesightError::SvgExportError {
                reason: "frame-times chart has no plottable points".to_string(),
            });
        }
        let area = self.plot_area();
        let mut svg = self.document_open();
        svg.push_str(&self.plot_frame(&area, &model.bounds));
        for series in &model.series {
            let mapped: Vec<(f64, f64)> = series
                .points
                .iter()
                .map(|p| area.map(p[0], p[1], &model.bounds))
                .collect();
            if !mapped.is_empty() {
                svg.push_str(&self.polyline(&mapped, series.color));
            }
        }
        let entries: Vec<(String, Color32)> = model
            .series
            .iter()
            .map(|s| (s.name.clone(), s.color))
            .collect();
        svg.push_str(&self.legend(&area, &entries));
        svg.push_str("\n</svg>\n");
        Ok(svg)
    }

    fn render_reprojections(&self, model: &ReprojectionsModel) -> Result<String, FramesightError> {
        if !model.bounds.is_finite() {
            return Err(FramesightError::SvgExportError {
                reason: "reprojections chart has no plottable points".to_string(),
            });
        }
        let area = self.plot_area();
        let mut svg = self.document_open();
        svg.push_str(&self.plot_frame(&area, &model.bounds));
        for series in &model.series {
            let mapped: Vec<(f64, f64)> = series
                .points
                .iter()
                .map(|p| area.map(p[0], p[1], &model.bounds))
                .collect();
            if !mapped.is_empty() {
                svg.push_str(&self.polyline(&mapped, series.color));
            }
        }
        for scatter in [&model.app_misses, &model.warp_misses] {
            for point in &scatter.points {
                let (x, y) = area.map(point[0], point[1], &model.bounds);
                svg.push_str(&format!(
                    "\n  <circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"3\" fill=\"{}\" />",
                    x,
                    y,
                    color_hex(scatter.color)
                ));
            }
        }
        let mut entries: Vec<(String, Color32)> = model
            .series
            .iter()
            .map(|s| (s.name.clone(), s.color))
            .collect();
        entries.push((model.app_misses.name.clone(), model.app_misses.color));
        entries.push((model.warp_misses.name.clone(), model.warp_misses.color));
        svg.push_str(&self.legend(&area, &entries));
        svg.push_str("\n</svg>\n");
        Ok(svg)
    }

    fn render_missed_frames(&self, model: &MissedFramesModel) -> Result<String, FramesightError> {
        let area = self.plot_area();
        let mut svg = self.document_open();

        match model {
            MissedFramesModel::Percentages(bars) => {
                if bars.is_empty() {
                    return Err(FramesightError::SvgExportError {
                        reason: "missed-frames chart has no sessions".to_string(),
                    });
                }
                let bounds = AxisBounds {
                    min_x: 0.,
                    max_x: bars.len() as f64,
                    min_y: 0.,
                    max_y: 100.,
                };
                svg.push_str(&self.plot_frame(&area, &bounds));
                let slot_width = area.width / bars.len() as f64;
                for (slot, bar) in bars.iter().enumerate() {
                    let x = area.x0 + slot as f64 * slot_width + slot_width * 0.2;
                    let width = slot_width * 0.6;
                    let mut base = 0.;
                    let mut segments = vec![
                        (bar.success_pct, bar.color),
                        (bar.app_miss_pct, super::reprojections::APP_MISS_COLOR),
                    ];
                    if let Some(warp_pct) = bar.warp_miss_pct {
                        segments.push((warp_pct, super::reprojections::WARP_MISS_COLOR));
                    }
                    for (pct, color) in segments {
                        let height = area.height * pct / 100.;
                        let y = area.y0 + area.height - base - height;
                        svg.push_str(&format!(
                            "\n  <rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\" />",
                            x, y, width, height, color_hex(color)
                        ));
                        base += height;
                    }
                    svg.push_str(&format!(
                        "\n  <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"12\" text-anchor=\"middle\">{}</text>",
                        x + width / 2.,
                        area.y0 + area.height + 16.,
                        bar.label
                    ));
                }
            }
            MissedFramesModel::Metric { metric, bars } => {
                if bars.is_empty() {
                    return Err(FramesightError::SvgExportError {
                        reason: "missed-frames chart has no sessions".to_string(),
                    });
                }
                let max_value = bars.iter().map(|b| b.value).fold(0., f64::max);
                let bounds = AxisBounds {
                    min_x: 0.,
                    max_x: bars.len() as f64,
                    min_y: 0.,
                    max_y: max_value.max(f64::EPSILON),
                };
                svg.push_str(&self.plot_frame(&area, &bounds));
                svg.push_str(&format!(
                    "\n  <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"14\">{}</text>",
                    area.x0,
                    area.y0 - 6.,
                    metric.label()
                ));
                let slot_width = area.width / bars.len() as f64;
                for (slot, bar) in bars.iter().enumerate() {
                    let x = area.x0 + slot as f64 * slot_width + slot_width * 0.2;
                    let height = area.height * bar.value / bounds.max_y;
                    svg.push_str(&format!(
                        "\n  <rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\" />\
                         \n  <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"12\" text-anchor=\"middle\">{}</text>",
                        x,
                        area.y0 + area.height - height,
                        slot_width * 0.6,
                        height,
                        color_hex(bar.color),
                        x + slot_width * 0.3,
                        area.y0 + area.height + 16.,
                        bar.label
                    ));
                }
            }
        }

        svg.push_str("\n</svg>\n");
        Ok(svg)
    }

    fn render_frame_detail(&self, model: &FrameDetailModel) -> Result<String, FramesightError> {
        if !model.bounds.is_finite() || model.frames.is_empty() {
            return Err(FramesightError::SvgExportError {
                reason: "frame-detail chart has no frames in range".to_string(),
            });
        }
        let area = self.plot_area();
        let mut svg = self.document_open();
        svg.push_str(&self.plot_frame(&area, &model.bounds));

        for frame in &model.frames {
            let mapped: Vec<(f64, f64)> = frame
                .events
                .iter()
                .filter(|e| e.is_defined())
                .map(|e| area.map(e.x, e.y, &model.bounds))
                .collect();
            if !mapped.is_empty() {
                svg.push_str(&self.polyline(&mapped, frame.color));
            }
        }
        for vsync in &model.vsyncs {
            let (x, _) = area.map(*vsync, 0., &model.bounds);
            svg.push_str(&format!(
                "\n  <line x1=\"{:.2}\" y1=\"{:.1}\" x2=\"{:.2}\" y2=\"{:.1}\" stroke=\"#3377cc\" stroke-width=\"1\" stroke-dasharray=\"3,3\" />",
                x,
                area.y0,
                x,
                area.y0 + area.height
            ));
        }
        svg.push_str("\n</svg>\n");
        Ok(svg)
    }
}

impl Default for SvgExporter {
    fn default() -> Self {
        Self::new()
    }
}

struct PlotArea {
    x0: f64,
    y0: f64,
    width: f64,
    height: f64,
}

impl PlotArea {
    /// Maps a data point into canvas coordinates, flipping the y axis.
    fn map(&self, x: f64, y: f64, bounds: &AxisBounds) -> (f64, f64) {
        let span_x = (bounds.max_x - bounds.min_x).max(f64::EPSILON);
        let span_y = (bounds.max_y - bounds.min_y).max(f64::EPSILON);
        (
            self.x0 + (x - bounds.min_x) / span_x * self.width,
            self.y0 + self.height - (y - bounds.min_y) / span_y * self.height,
        )
    }
}

fn color_hex(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}
