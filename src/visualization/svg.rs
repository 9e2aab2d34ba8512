// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-refractive-index project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Minimal SVG line charts

use anyhow::{anyhow, Result};

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 400.0;
const MARGIN: f64 = 60.0;
const X_TICKS: usize = 10;
const Y_TICKS: usize = 8;

/// One line of a chart
#[derive(Debug, Clone)]
pub struct Series<'a> {
    pub label: &'a str,
    pub x: &'a [f64],
    pub y: &'a [f64],
    /// CSS class of the path, one of `line-primary`, `line-secondary`
    pub class: &'a str,
}

/// Line chart with a shared x axis
#[derive(Debug, Clone)]
pub struct LineChart<'a> {
    pub title: &'a str,
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub series: Vec<Series<'a>>,
}

/// Data-to-pixel mapping of the plot area
struct Frame {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Frame {
    fn plot_width() -> f64 {
        WIDTH - 2.0 * MARGIN
    }

    fn plot_height() -> f64 {
        HEIGHT - 2.0 * MARGIN
    }

    fn px(&self, x: f64) -> f64 {
        MARGIN + (x - self.x_min) / (self.x_max - self.x_min) * Self::plot_width()
    }

    fn py(&self, y: f64) -> f64 {
        MARGIN + Self::plot_height() - (y - self.y_min) / (self.y_max - self.y_min) * Self::plot_height()
    }
}

/// Widen a degenerate or padded range so that the mapping never divides by 0
fn padded_range(min: f64, max: f64, padding: f64) -> (f64, f64) {
    let span = max - min;
    if span <= f64::EPSILON * max.abs().max(1.0) {
        let half = if min == 0.0 { 0.5 } else { min.abs() * 0.05 };
        return (min - half, max + half);
    }
    (min - span * padding, max + span * padding)
}

impl<'a> LineChart<'a> {
    pub fn new(title: &'a str, x_label: &'a str, y_label: &'a str) -> Self {
        Self {
            title,
            x_label,
            y_label,
            series: Vec::new(),
        }
    }

    pub fn with_series(mut self, series: Series<'a>) -> Self {
        self.series.push(series);
        self
    }

    fn frame(&self) -> Result<Frame> {
        let points = self
            .series
            .iter()
            .flat_map(|s| s.x.iter().copied().zip(s.y.iter().copied()))
            .filter(|(x, y)| x.is_finite() && y.is_finite());

        let mut bounds: Option<(f64, f64, f64, f64)> = None;
        for (x, y) in points {
            bounds = Some(match bounds {
                None => (x, x, y, y),
                Some((x0, x1, y0, y1)) => (x0.min(x), x1.max(x), y0.min(y), y1.max(y)),
            });
        }
        let (x_min, x_max, y_min, y_max) =
            bounds.ok_or_else(|| anyhow!("No data to plot in '{}'", self.title))?;

        let (x_min, x_max) = padded_range(x_min, x_max, 0.0);
        let (y_min, y_max) = padded_range(y_min, y_max, 0.1);
        Ok(Frame {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    fn line_path(frame: &Frame, series: &Series) -> String {
        let mut path = String::new();
        let mut pen_down = false;
        for (&x, &y) in series.x.iter().zip(series.y) {
            if !x.is_finite() || !y.is_finite() {
                pen_down = false;
                continue;
            }
            let command = if pen_down { " L" } else { " M" };
            path.push_str(&format!("{} {:.1} {:.1}", command, frame.px(x), frame.py(y)));
            pen_down = true;
        }
        path.trim_start().to_string()
    }

    fn grid_and_axes(&self, frame: &Frame) -> String {
        let mut out = String::new();
        let bottom = MARGIN + Frame::plot_height();
        let right = MARGIN + Frame::plot_width();

        for i in 0..=X_TICKS {
            let x = frame.x_min + (frame.x_max - frame.x_min) * i as f64 / X_TICKS as f64;
            let px = frame.px(x);
            out.push_str(&format!(
                "<line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" class=\"grid-line\"/>",
                px, MARGIN, px, bottom
            ));
            out.push_str(&format!(
                "<text x=\"{:.1}\" y=\"{:.1}\" class=\"axis-tick\">{:.3e}</text>",
                px,
                bottom + 15.0,
                x
            ));
        }
        for i in 0..=Y_TICKS {
            let y = frame.y_min + (frame.y_max - frame.y_min) * i as f64 / Y_TICKS as f64;
            let py = frame.py(y);
            out.push_str(&format!(
                "<line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" class=\"grid-line\"/>",
                MARGIN, py, right, py
            ));
            out.push_str(&format!(
                "<text x=\"{:.1}\" y=\"{:.1}\" class=\"axis-tick\" text-anchor=\"end\">{:.3}</text>",
                MARGIN - 5.0,
                py + 3.0,
                y
            ));
        }

        out.push_str(&format!(
            "<line x1=\"{m:.1}\" y1=\"{m:.1}\" x2=\"{m:.1}\" y2=\"{b:.1}\" class=\"axis-line\"/>\
             <line x1=\"{m:.1}\" y1=\"{b:.1}\" x2=\"{r:.1}\" y2=\"{b:.1}\" class=\"axis-line\"/>",
            m = MARGIN,
            b = bottom,
            r = right
        ));
        out.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" class=\"axis-label\">{}</text>",
            MARGIN + Frame::plot_width() / 2.0,
            bottom + 35.0,
            escape(self.x_label)
        ));
        out.push_str(&format!(
            "<text x=\"15\" y=\"{y:.1}\" class=\"axis-label\" transform=\"rotate(-90, 15, {y:.1})\">{}</text>",
            escape(self.y_label),
            y = MARGIN + Frame::plot_height() / 2.0
        ));
        out
    }

    fn legend(&self) -> String {
        let mut out = format!(
            "<g transform=\"translate({:.1}, 40)\"><rect x=\"0\" y=\"0\" width=\"150\" height=\"{:.1}\" fill=\"white\" stroke=\"#ccc\"/>",
            WIDTH - 160.0,
            10.0 + 15.0 * self.series.len() as f64
        );
        for (i, series) in self.series.iter().enumerate() {
            let y = 15.0 + 15.0 * i as f64;
            out.push_str(&format!(
                "<line x1=\"10\" y1=\"{y:.1}\" x2=\"30\" y2=\"{y:.1}\" class=\"{class}\"/>\
                 <text x=\"35\" y=\"{text_y:.1}\" class=\"legend\">{label}</text>",
                y = y,
                text_y = y + 4.0,
                class = series.class,
                label = escape(series.label)
            ));
        }
        out.push_str("</g>");
        out
    }

    /// Render the chart as a standalone SVG document
    pub fn render(&self) -> Result<String> {
        let frame = self.frame()?;
        let paths: String = self
            .series
            .iter()
            .map(|s| format!("<path d=\"{}\" class=\"{}\"/>", Self::line_path(&frame, s), s.class))
            .collect();

        Ok(format!(
            "<svg width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" xmlns=\"http://www.w3.org/2000/svg\">\
                <defs><style>\
                    .chart-title {{ font: bold 16px Arial, sans-serif; text-anchor: middle; }}\
                    .axis-label {{ font: 12px Arial, sans-serif; text-anchor: middle; }}\
                    .axis-tick {{ font: 10px Arial, sans-serif; text-anchor: middle; }}\
                    .legend {{ font: 12px Arial, sans-serif; }}\
                    .grid-line {{ stroke: #e0e0e0; stroke-width: 0.5; }}\
                    .axis-line {{ stroke: #333; stroke-width: 1; }}\
                    .line-primary {{ stroke: #ff6b6b; stroke-width: 2; fill: none; }}\
                    .line-secondary {{ stroke: #45b7d1; stroke-width: 1.5; fill: none; }}\
                </style></defs>\
                <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\
                <text x=\"{title_x}\" y=\"25\" class=\"chart-title\">{title}</text>\
                {grid}{paths}{legend}\
            </svg>",
            w = WIDTH,
            h = HEIGHT,
            title_x = WIDTH / 2.0,
            title = escape(self.title),
            grid = self.grid_and_axes(&frame),
            paths = paths,
            legend = self.legend()
        ))
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_contains_paths_and_labels() {
        let x = [0.0, 1.0, 2.0];
        let y = [1.0, 4.0, 2.0];
        let svg = LineChart::new("Air <FFT>", "Frequency (Hz)", "Amplitude")
            .with_series(Series {
                label: "air",
                x: &x,
                y: &y,
                class: "line-primary",
            })
            .render()
            .unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("Air &lt;FFT&gt;"));
        assert!(svg.contains("class=\"line-primary\""));
        assert_eq!(svg.matches(" L ").count(), 2);
    }

    #[test]
    fn test_flat_series_does_not_divide_by_zero() {
        let x = [5.0];
        let y = [1.0];
        let svg = LineChart::new("flat", "x", "y")
            .with_series(Series {
                label: "one point",
                x: &x,
                y: &y,
                class: "line-secondary",
            })
            .render()
            .unwrap();
        assert!(!svg.contains("NaN"));
        assert!(!svg.contains("inf"));
    }

    #[test]
    fn test_non_finite_points_break_the_line() {
        let frame = Frame {
            x_min: 0.0,
            x_max: 3.0,
            y_min: 0.0,
            y_max: 1.0,
        };
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [0.0, f64::NAN, 0.5, 1.0];
        let path = LineChart::line_path(
            &frame,
            &Series {
                label: "",
                x: &x,
                y: &y,
                class: "line-primary",
            },
        );
        assert_eq!(path.matches('M').count(), 2);
        assert_eq!(path.matches('L').count(), 1);
    }

    #[test]
    fn test_empty_chart_is_an_error() {
        assert!(LineChart::new("empty", "x", "y").render().is_err());
    }
}
