//! Plotters-powered chart widgets for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - less manual work for ticks/labels
//! - easy to extend later (legend, annotations, exportable PNG/SVG backends, etc.)
//!
//! We render Plotters output into the Ratatui buffer using
//! `plotters-ratatui-backend`. All widgets are render-only: series, bounds,
//! and labels are computed outside the render call, which keeps `render()`
//! focused on drawing and makes the data prep testable separately.

use plotters::prelude::*;
use plotters::style::Color as _;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Palette used for category coloring (vehicle types), in category order.
///
/// High-contrast colors that survive low-resolution terminal rendering.
pub const CATEGORY_COLORS: [RGBColor; 6] = [
    RGBColor(0, 255, 255),  // cyan
    RGBColor(255, 255, 0),  // yellow
    RGBColor(0, 255, 0),    // green
    RGBColor(255, 0, 255),  // magenta
    RGBColor(255, 128, 0),  // orange
    RGBColor(128, 128, 255), // periwinkle
];

pub fn category_color(index: usize) -> RGBColor {
    CATEGORY_COLORS[index % CATEGORY_COLORS.len()]
}

/// Shared guard: Plotters may fail to build a chart in a tiny area, so we
/// render a hint instead of panicking.
fn area_too_small(area: Rect, buf: &mut Buffer) -> bool {
    if area.width < 16 || area.height < 6 {
        buf.set_string(
            area.x,
            area.y,
            "Chart area too small (resize terminal).",
            Style::default().fg(Color::Yellow),
        );
        return true;
    }
    false
}

fn bounds_valid(x: [f64; 2], y: [f64; 2]) -> bool {
    x.iter().chain(y.iter()).all(|v| v.is_finite()) && x[1] > x[0] && y[1] > y[0]
}

/// Line chart over a labeled category axis (years or months).
///
/// X positions are the category indices; tick labels are looked up from
/// `labels` so the axis shows "2019" / "Jan" instead of raw indices.
pub struct SeriesLineChart<'a> {
    pub points: &'a [(f64, f64)],
    pub labels: &'a [String],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
}

impl Widget for SeriesLineChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area_too_small(area, buf) || !bounds_valid(self.x_bounds, self.y_bounds) {
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        let labels = self.labels;
        let points = self.points;
        let x_label = self.x_label.to_string();
        let y_label = self.y_label.to_string();

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 7)
                .set_label_area_size(LabelAreaPosition::Bottom, 2)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(x_label.as_str())
                .y_desc(y_label.as_str())
                .x_labels(labels.len().min(6))
                .y_labels(4)
                .x_label_formatter(&|v| label_at(labels, *v))
                .y_label_formatter(&|v| fmt_value(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .draw()?;

            let line_color = RGBColor(0, 255, 255);
            chart.draw_series(LineSeries::new(points.iter().copied(), &line_color))?;
            // Mark the actual observations on top of the line.
            chart.draw_series(points.iter().map(|&(x, y)| Pixel::new((x, y), WHITE)))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Vertical bar chart over a labeled category axis.
///
/// Bars are drawn as filled rectangles; the Plotters histogram series is not
/// available under our trimmed feature set and is unnecessary here.
pub struct SeriesBarChart<'a> {
    pub values: &'a [f64],
    pub labels: &'a [String],
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
}

impl Widget for SeriesBarChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let n = self.values.len();
        if n == 0 || area_too_small(area, buf) {
            return;
        }
        let x_bounds = [0.0, n as f64];
        if !bounds_valid(x_bounds, self.y_bounds) {
            return;
        }

        let [y0, y1] = self.y_bounds;
        let labels = self.labels;
        let values = self.values.to_vec();
        let x_label = self.x_label.to_string();
        let y_label = self.y_label.to_string();

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 7)
                .set_label_area_size(LabelAreaPosition::Bottom, 2)
                .build_cartesian_2d(0.0..n as f64, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(x_label.as_str())
                .y_desc(y_label.as_str())
                .x_labels(n.min(6))
                .y_labels(4)
                // Ticks land between bar centers; show the bar the tick falls in.
                .x_label_formatter(&|v| label_at(labels, v.floor()))
                .y_label_formatter(&|v| fmt_value(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .draw()?;

            chart.draw_series(values.iter().enumerate().map(|(i, &v)| {
                let color = category_color(i);
                Rectangle::new([(i as f64 + 0.15, 0.0), (i as f64 + 0.85, v)], color.filled())
            }))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// One pre-positioned scatter dot.
#[derive(Debug, Clone, Copy)]
pub struct ScatterDot {
    pub x: f64,
    pub y: f64,
    /// Category index into the shared palette.
    pub color_index: usize,
    /// 0..=2, mapped from the size field (sales).
    pub size_level: u8,
}

/// Scatter plot with per-point category color and a coarse size encoding.
///
/// We intentionally avoid `Circle` markers. The underlying
/// `plotters-ratatui-backend` currently maps circle radii incorrectly
/// (pixel radius -> normalized canvas units), producing huge circles.
/// Instead, larger points are drawn as a small cross/cluster of pixels.
pub struct ScatterChart<'a> {
    pub dots: &'a [ScatterDot],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
}

impl Widget for ScatterChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area_too_small(area, buf) || !bounds_valid(self.x_bounds, self.y_bounds) {
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        let dots = self.dots.to_vec();
        let x_label = self.x_label.to_string();
        let y_label = self.y_label.to_string();

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 7)
                .set_label_area_size(LabelAreaPosition::Bottom, 2)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(x_label.as_str())
                .y_desc(y_label.as_str())
                .x_labels(5)
                .y_labels(4)
                .x_label_formatter(&|v| fmt_value(*v))
                .y_label_formatter(&|v| fmt_value(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .draw()?;

            // Offsets in data coordinates for the size-level pixel clusters.
            let dx = (x1 - x0) * 0.012;
            let dy = (y1 - y0) * 0.02;

            for dot in &dots {
                let color = category_color(dot.color_index);
                let mut pixels = vec![(dot.x, dot.y)];
                if dot.size_level >= 1 {
                    pixels.push((dot.x - dx, dot.y));
                    pixels.push((dot.x + dx, dot.y));
                }
                if dot.size_level >= 2 {
                    pixels.push((dot.x, dot.y - dy));
                    pixels.push((dot.x, dot.y + dy));
                }
                chart.draw_series(pixels.into_iter().map(|p| Pixel::new(p, color)))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Tick label lookup for category axes: nearest index, empty when outside.
fn label_at(labels: &[String], v: f64) -> String {
    if v < -0.5 {
        return String::new();
    }
    let idx = v.round();
    if idx < 0.0 {
        return String::new();
    }
    match labels.get(idx as usize) {
        Some(label) => label.clone(),
        None => String::new(),
    }
}

/// Compact tick formatting: whole numbers stay whole, the rest get 1 decimal.
fn fmt_value(v: f64) -> String {
    if v.abs() >= 1000.0 {
        format!("{:.0}", v)
    } else if (v - v.round()).abs() < 1e-9 {
        format!("{:.0}", v)
    } else {
        format!("{v:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_lookup_handles_out_of_range() {
        let labels = vec!["Jan".to_string(), "Feb".to_string()];
        assert_eq!(label_at(&labels, 0.0), "Jan");
        assert_eq!(label_at(&labels, 1.2), "Feb");
        assert_eq!(label_at(&labels, 5.0), "");
        assert_eq!(label_at(&labels, -1.0), "");
    }

    #[test]
    fn value_formatting_is_compact() {
        assert_eq!(fmt_value(2019.0), "2019");
        assert_eq!(fmt_value(4.5), "4.5");
        assert_eq!(fmt_value(12500.0), "12500");
    }

    #[test]
    fn palette_wraps_around() {
        assert_eq!(category_color(0), category_color(CATEGORY_COLORS.len()));
    }
}
