// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-refractive-index project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! End-to-end analysis
//!
//! ```text
//! DataFile -> air/medium Trace -> Spectrum (x2) -> RatioSeries
//!          -> Window (operator or preset) -> FitReport -> tables, plots, report
//! ```
//!
//! [`Pipeline::analyze`] is the pure part working on in-memory traces;
//! [`Pipeline::run`] wraps it with the data file reads and appends.

use std::io::Write;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::acquisition::data_file::{AIR_FFT_TITLE, MEDIUM_FFT_TITLE};
use crate::acquisition::{DataFile, Trace, TracePair};
use crate::config::{Config, OutputConfig};
use crate::error::AnalysisError;
use crate::fitting::{create_parameter_fitter, FitReport, FitResult, ParameterFitter};
use crate::preprocessing::{create_ratio_builder, RatioBuilder, RatioSeries};
use crate::selection::{preset_selection, OperatorInput, Selection, WindowSelector};
use crate::spectral::{create_spectral_analyzer, SpectralAnalyzer, Spectrum};
use crate::visualization::report::ReportContext;
use crate::visualization::{HtmlReportGenerator, NullPlotSink, PlotSink, SvgPlotSink};

/// Everything a run produced
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub air: Spectrum,
    pub medium: Spectrum,
    /// Full ratio series, before windowing
    pub ratio: RatioSeries,
    pub selection: Selection,
    pub fit: FitReport,
}

impl AnalysisOutcome {
    /// Fitted bins, in bin order
    pub fn results(&self) -> &[FitResult] {
        &self.fit.results
    }
}

/// Composition of the analysis stages
pub struct Pipeline {
    analyzer: Box<dyn SpectralAnalyzer>,
    ratio_builder: RatioBuilder,
    fitter: ParameterFitter,
    preset_window: Option<(i64, i64)>,
    output: OutputConfig,
}

impl Pipeline {
    pub fn new(
        analyzer: Box<dyn SpectralAnalyzer>,
        ratio_builder: RatioBuilder,
        fitter: ParameterFitter,
    ) -> Self {
        Self {
            analyzer,
            ratio_builder,
            fitter,
            preset_window: None,
            output: OutputConfig::default(),
        }
    }

    /// Build every stage from the configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            create_spectral_analyzer(config.spectral.window_function),
            create_ratio_builder(config.ratio.orientation, config.ratio.strict_alignment),
            create_parameter_fitter(config.fit.options(), config.fit.parallel),
        )
        .with_preset_window(config.selection.preset())
        .with_output(config.output.clone())
    }

    /// Use a fixed window instead of asking the operator
    pub fn with_preset_window(mut self, window: Option<(i64, i64)>) -> Self {
        self.preset_window = window;
        self
    }

    pub fn with_output(mut self, output: OutputConfig) -> Self {
        self.output = output;
        self
    }

    fn spectrum(
        &self,
        title: &str,
        trace: &Trace,
        plots: &mut dyn PlotSink,
    ) -> Result<Spectrum, AnalysisError> {
        let spectrum = self.analyzer.analyze(trace)?;
        info!(
            "{}: {} samples -> {} bins (peak at bin {:?})",
            title,
            trace.len(),
            spectrum.len(),
            spectrum.peak_index()
        );
        if let Err(e) = plots.plot_spectrum(title, &spectrum) {
            warn!("Failed to plot {}: {:#}", title, e);
        }
        Ok(spectrum)
    }

    fn select(
        &self,
        ratio: &RatioSeries,
        operator: &mut dyn OperatorInput,
        plots: &mut dyn PlotSink,
    ) -> Result<Selection, AnalysisError> {
        match self.preset_window {
            Some((lower, upper)) => {
                let selection = preset_selection(ratio, lower, upper)?;
                info!("Using preset window [{}, {})", lower, upper);
                if let Err(e) = plots.plot_ratio_window(&selection.series) {
                    warn!("Failed to plot the ratio window: {:#}", e);
                }
                Ok(selection)
            }
            None => WindowSelector::new(ratio).run(operator, plots),
        }
    }

    /// Run every numeric stage on in-memory traces
    pub fn analyze(
        &self,
        traces: &TracePair,
        operator: &mut dyn OperatorInput,
        plots: &mut dyn PlotSink,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        let air = self.spectrum("Air FFT", &traces.air, plots)?;
        let medium = self.spectrum("Medium FFT", &traces.medium, plots)?;
        self.finish(air, medium, operator, plots)
    }

    fn finish(
        &self,
        air: Spectrum,
        medium: Spectrum,
        operator: &mut dyn OperatorInput,
        plots: &mut dyn PlotSink,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        let ratio = self.ratio_builder.build(&air, &medium)?;
        let selection = self.select(&ratio, operator, plots)?;
        let fit = self.fitter.fit(&selection.series);
        Ok(AnalysisOutcome {
            air,
            medium,
            ratio,
            selection,
            fit,
        })
    }

    /// Read the data file, analyze it and write the configured outputs
    ///
    /// Each FFT table is appended as soon as its spectrum is known, so a run
    /// cancelled during the window selection still leaves them in the file.
    pub fn run(
        &self,
        data_file: &DataFile,
        operator: &mut dyn OperatorInput,
        plots: &mut dyn PlotSink,
    ) -> Result<AnalysisOutcome> {
        let traces = data_file.read_raw_data()?.traces;

        let air = self.spectrum("Air FFT", &traces.air, plots)?;
        if self.output.append_tables {
            data_file.append_spectrum(AIR_FFT_TITLE, &air)?;
        }
        let medium = self.spectrum("Medium FFT", &traces.medium, plots)?;
        if self.output.append_tables {
            data_file.append_spectrum(MEDIUM_FFT_TITLE, &medium)?;
        }

        let outcome = self.finish(air, medium, operator, plots)?;

        if self.output.append_fit {
            data_file.append_fit_table(&outcome.fit.results)?;
        }

        if let Some(report_path) = &self.output.report {
            let context = ReportContext {
                data_file: data_file.path(),
                air: &outcome.air,
                medium: &outcome.medium,
                selection: &outcome.selection,
                fit: &outcome.fit,
            };
            HtmlReportGenerator::new()?
                .generate_report(&context, report_path)
                .with_context(|| format!("Failed to generate report {:?}", report_path))?;
            info!("HTML report written to {:?}", report_path);
        }

        Ok(outcome)
    }
}

/// Plot sink described by the output configuration
pub fn create_plot_sink(output: &OutputConfig) -> Result<Box<dyn PlotSink>> {
    Ok(match &output.plot_dir {
        Some(directory) => Box::new(SvgPlotSink::new(directory)?),
        None => Box::new(NullPlotSink),
    })
}

/// Print one `Best guess` line per fitted bin
pub fn print_results<W: Write>(results: &[FitResult], out: &mut W) -> std::io::Result<()> {
    for result in results {
        writeln!(
            out,
            "Best guess for n (f={:?}, RHS={:?}): {:?}",
            result.frequency, result.ratio, result.n
        )?;
    }
    Ok(())
}
