// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-refractive-index project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).
//!
//! Visualization module
//!
//! Plots are side effects of the analysis and never feed back into it. The
//! pipeline talks to a [`PlotSink`]; [`NullPlotSink`] discards everything,
//! [`SvgPlotSink`] writes one SVG file per plot. [`report`] renders the
//! final HTML report.

pub mod report;
pub mod svg;

pub use report::HtmlReportGenerator;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;

use crate::preprocessing::RatioSeries;
use crate::spectral::Spectrum;
use svg::{LineChart, Series};

/// Destination of the diagnostic plots
pub trait PlotSink {
    /// Amplitude spectrum of one trace
    fn plot_spectrum(&mut self, title: &str, spectrum: &Spectrum) -> Result<()>;

    /// Ratio series of a candidate window
    fn plot_ratio_window(&mut self, series: &RatioSeries) -> Result<()>;
}

/// Sink that draws nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPlotSink;

impl PlotSink for NullPlotSink {
    fn plot_spectrum(&mut self, _title: &str, _spectrum: &Spectrum) -> Result<()> {
        Ok(())
    }

    fn plot_ratio_window(&mut self, _series: &RatioSeries) -> Result<()> {
        Ok(())
    }
}

/// Chart of an amplitude spectrum
pub fn spectrum_chart(title: &str, spectrum: &Spectrum) -> Result<String> {
    LineChart::new(title, "Frequency (Hz)", "Amplitude")
        .with_series(Series {
            label: title,
            x: spectrum.frequencies(),
            y: spectrum.magnitudes(),
            class: "line-primary",
        })
        .render()
}

/// Chart of a ratio series
pub fn ratio_chart(series: &RatioSeries) -> Result<String> {
    let title = format!(
        "Ratio, bins [{}, {})",
        series.first_bin(),
        series.first_bin() + series.len()
    );
    LineChart::new(&title, "Frequency (Hz)", "Ratio")
        .with_series(Series {
            label: "ratio",
            x: series.frequencies(),
            y: series.ratios(),
            class: "line-secondary",
        })
        .render()
}

/// Sink writing SVG files into a directory
///
/// Spectra land in `<slug of title>.svg`, the candidate window in
/// `ratio_window.svg`, overwritten at every new candidate.
#[derive(Debug, Clone)]
pub struct SvgPlotSink {
    directory: PathBuf,
    written: Vec<PathBuf>,
}

impl SvgPlotSink {
    /// Create the sink, creating `directory` if needed
    pub fn new<P: AsRef<Path>>(directory: P) -> Result<Self> {
        let directory = directory.as_ref().to_path_buf();
        fs::create_dir_all(&directory).with_context(|| {
            format!("Failed to create plot directory {}", directory.display())
        })?;
        Ok(Self {
            directory,
            written: Vec::new(),
        })
    }

    /// Files written so far, in order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn write(&mut self, file_name: &str, svg: String) -> Result<()> {
        let path = self.directory.join(file_name);
        fs::write(&path, svg).with_context(|| format!("Failed to write {}", path.display()))?;
        debug!("Plot written to {}", path.display());
        if !self.written.contains(&path) {
            self.written.push(path);
        }
        Ok(())
    }
}

/// `"Air FFT"` -> `"air_fft"`
fn slug(title: &str) -> String {
    title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

impl PlotSink for SvgPlotSink {
    fn plot_spectrum(&mut self, title: &str, spectrum: &Spectrum) -> Result<()> {
        let svg = spectrum_chart(title, spectrum)?;
        self.write(&format!("{}.svg", slug(title)), svg)
    }

    fn plot_ratio_window(&mut self, series: &RatioSeries) -> Result<()> {
        let svg = ratio_chart(series)?;
        self.write("ratio_window.svg", svg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_slug() {
        assert_eq!(slug("Air FFT"), "air_fft");
        assert_eq!(slug("  Medium -- FFT "), "medium_fft");
    }

    #[test]
    fn test_svg_sink_writes_files() {
        let dir = tempdir().unwrap();
        let mut sink = SvgPlotSink::new(dir.path().join("plots")).unwrap();

        let spectrum = Spectrum::new(vec![0.0, 1.0, 2.0], vec![3.0, 1.0, 0.5]).unwrap();
        sink.plot_spectrum("Air FFT", &spectrum).unwrap();

        let series = RatioSeries::new(vec![0.0, 1.0], vec![1.1, 1.2]).unwrap();
        sink.plot_ratio_window(&series).unwrap();
        sink.plot_ratio_window(&series).unwrap();

        assert_eq!(sink.written().len(), 2);
        let air = fs::read_to_string(dir.path().join("plots/air_fft.svg")).unwrap();
        assert!(air.contains("Air FFT"));
        assert!(dir.path().join("plots/ratio_window.svg").exists());
    }

    #[test]
    fn test_empty_series_cannot_be_plotted() {
        let mut sink = NullPlotSink;
        assert!(sink.plot_ratio_window(&RatioSeries::default()).is_ok());
        assert!(ratio_chart(&RatioSeries::default()).is_err());
    }
}
