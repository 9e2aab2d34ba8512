// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-refractive-index project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! HTML report of an analysis run
//!
//! The report embeds the two amplitude spectra, the selected ratio window and
//! the fitted index as inline SVG charts, followed by the fit table.

use std::path::Path;

use anyhow::{anyhow, Result};
use handlebars::Handlebars;
use serde_json::{json, Value};

use super::svg::{LineChart, Series};
use super::{ratio_chart, spectrum_chart};
use crate::fitting::{FitReport, N_LOWER_BOUND, N_UPPER_BOUND};
use crate::selection::Selection;
use crate::spectral::Spectrum;

/// Everything the report shows
pub struct ReportContext<'a> {
    pub data_file: &'a Path,
    pub air: &'a Spectrum,
    pub medium: &'a Spectrum,
    pub selection: &'a Selection,
    pub fit: &'a FitReport,
}

/// HTML report generator
pub struct HtmlReportGenerator<'a> {
    handlebars: Handlebars<'a>,
}

impl<'a> HtmlReportGenerator<'a> {
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars
            .register_template_string("report", include_str!("report_template.hbs"))
            .map_err(|e| anyhow!("Failed to register template: {}", e))?;
        Ok(Self { handlebars })
    }

    /// Render the report and write it to `output_path`
    pub fn generate_report(&self, context: &ReportContext, output_path: &Path) -> Result<()> {
        let html = self.build_html_report(context)?;
        std::fs::write(output_path, html)
            .map_err(|e| anyhow!("Failed to write HTML report {}: {}", output_path.display(), e))
    }

    fn build_html_report(&self, context: &ReportContext) -> Result<String> {
        self.handlebars
            .render("report", &self.template_data(context)?)
            .map_err(|e| anyhow!("Failed to render template: {}", e))
    }

    fn template_data(&self, context: &ReportContext) -> Result<Value> {
        let fit = context.fit;
        let window = context.selection.window;

        let rows: Vec<Value> = fit
            .results
            .iter()
            .map(|r| {
                json!({
                    "INDEX": r.index,
                    "FREQUENCY": format!("{:.6e}", r.frequency),
                    "RATIO": format!("{:.6}", r.ratio),
                    "N": format!("{:.6}", r.n),
                    "RESIDUAL": format!("{:.3e}", r.residual),
                    "AT_BOUND": r.at_bound,
                })
            })
            .collect();

        let failures: Vec<String> = fit.failures.iter().map(|e| e.to_string()).collect();

        // Bin whose fit matches its ratio most closely
        let best_guess = fit
            .results
            .iter()
            .min_by(|a, b| a.residual.total_cmp(&b.residual))
            .map(|r| format!("{:.6} (f={:.6e} Hz, ratio={:.6})", r.n, r.frequency, r.ratio))
            .unwrap_or_else(|| "none".to_string());

        let status_class = if fit.is_complete() {
            "status-success"
        } else {
            "status-warning"
        };

        Ok(json!({
            "GENERATION_TIME": chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            "DATA_FILE": context.data_file.display().to_string(),
            "AIR_BINS": context.air.len(),
            "MEDIUM_BINS": context.medium.len(),
            "WINDOW_LOWER": window.lower,
            "WINDOW_UPPER": window.upper,
            "N_LOWER": N_LOWER_BOUND,
            "N_UPPER": N_UPPER_BOUND,
            "BEST_GUESS": best_guess,
            "FITTED_COUNT": fit.results.len(),
            "FAILED_COUNT": fit.failures.len(),
            "STATUS_CLASS": status_class,
            "AIR_SVG": spectrum_chart("Air FFT", context.air)?,
            "MEDIUM_SVG": spectrum_chart("Medium FFT", context.medium)?,
            "RATIO_SVG": ratio_chart(&context.selection.series)?,
            "INDEX_SVG": self.index_chart(fit)?,
            "ROWS": rows,
            "FAILURES": failures,
        }))
    }

    /// Fitted index against frequency, empty when no bin was fitted
    fn index_chart(&self, fit: &FitReport) -> Result<String> {
        if fit.results.is_empty() {
            return Ok(String::new());
        }
        let frequencies: Vec<f64> = fit.results.iter().map(|r| r.frequency).collect();
        let indices: Vec<f64> = fit.results.iter().map(|r| r.n).collect();
        LineChart::new("Refractive index", "Frequency (Hz)", "n")
            .with_series(Series {
                label: "fitted n",
                x: &frequencies,
                y: &indices,
                class: "line-primary",
            })
            .render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use crate::fitting::FitResult;
    use crate::preprocessing::RatioSeries;
    use crate::selection::Window;
    use tempfile::tempdir;

    fn spectrum() -> Spectrum {
        Spectrum::new(vec![0.0, 1.0e11, 2.0e11], vec![3.0, 2.0, 1.0]).unwrap()
    }

    fn fit_report() -> FitReport {
        FitReport {
            results: vec![FitResult {
                index: 1,
                frequency: 1.0e11,
                ratio: 0.9,
                n: 1.9,
                residual: 1.0e-7,
                iterations: 12,
                at_bound: false,
            }],
            failures: vec![AnalysisError::FitNotConverged {
                index: 2,
                frequency: 2.0e11,
                ratio: 0.4,
                iterations: 500,
            }],
        }
    }

    fn selection() -> Selection {
        let series = RatioSeries::new(vec![0.0, 1.0e11, 2.0e11], vec![1.0, 0.9, 0.4]).unwrap();
        let window = Window { lower: 1, upper: 3 };
        Selection {
            window,
            series: window.apply(&series).unwrap(),
        }
    }

    #[test]
    fn test_report_contains_table_and_charts() {
        let air = spectrum();
        let medium = spectrum();
        let selection = selection();
        let fit = fit_report();
        let context = ReportContext {
            data_file: Path::new("data.txt"),
            air: &air,
            medium: &medium,
            selection: &selection,
            fit: &fit,
        };

        let html = HtmlReportGenerator::new()
            .unwrap()
            .build_html_report(&context)
            .unwrap();

        assert!(html.contains("<svg"));
        assert!(html.contains("1.900000"));
        assert!(html.contains("[1, 3)"));
        assert!(html.contains("class=\"status status-warning\""));
        assert!(html.contains("Fit did not converge at bin 2"));
    }

    #[test]
    fn test_best_fit_is_smallest_residual() {
        let air = spectrum();
        let selection = selection();
        let mut fit = fit_report();
        fit.results.push(FitResult {
            index: 2,
            frequency: 2.0e11,
            ratio: 0.4,
            n: 4.2,
            residual: 1.0e-9,
            iterations: 20,
            at_bound: false,
        });
        let context = ReportContext {
            data_file: Path::new("data.txt"),
            air: &air,
            medium: &air,
            selection: &selection,
            fit: &fit,
        };

        let html = HtmlReportGenerator::new()
            .unwrap()
            .build_html_report(&context)
            .unwrap();
        assert!(html.contains("Best fit (smallest residual): 4.200000"));
    }

    #[test]
    fn test_report_file_generation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.html");
        let air = spectrum();
        let selection = selection();
        let fit = FitReport::default();
        let context = ReportContext {
            data_file: Path::new("data.txt"),
            air: &air,
            medium: &air,
            selection: &selection,
            fit: &fit,
        };

        HtmlReportGenerator::new()
            .unwrap()
            .generate_report(&context, &path)
            .unwrap();
        let html = std::fs::read_to_string(path).unwrap();
        assert!(html.contains("class=\"status status-success\""));
        assert!(html.contains("Best fit (smallest residual): none"));
    }
}
