// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-refractive-index project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Plain-text measurement file
//!
//! The file holds two raw-data sections introduced by the markers
//! [`AIR_RAW_MARKER`] and [`MEDIUM_RAW_MARKER`]. Every line of a section that
//! carries at least two numeric tokens contributes one `(x, y)` sample, the
//! other lines are skipped and counted.
//!
//! Results are appended to the same file as tab-separated tables. Tables
//! written by a previous run end the raw-data section they follow, so a file
//! parses the same way before and after an append.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use log::{debug, info};
use regex::Regex;

use super::{Trace, TracePair, TraceSource};
use crate::error::AnalysisError;
use crate::fitting::FitResult;
use crate::spectral::Spectrum;

pub const AIR_RAW_MARKER: &str = "Air Raw Data";
pub const MEDIUM_RAW_MARKER: &str = "Medium Raw Data";

pub const AIR_FFT_TITLE: &str = "\nAir FFT Table\nFrequency           Amplitude\n";
pub const MEDIUM_FFT_TITLE: &str = "\nMedium FFT Table\nFrequency           Amplitude\n";
pub const FIT_TABLE_TITLE: &str =
    "\nRefractive Index Fit Table\nFrequency           Ratio           n\n";

/// Any line containing one of these ends the current raw-data section
const SECTION_END_MARKERS: [&str; 2] = ["FFT Table", "Fit Table"];

fn number_regex() -> &'static Regex {
    static NUMBER: OnceLock<Regex> = OnceLock::new();
    NUMBER.get_or_init(|| {
        Regex::new(r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?").expect("valid number regex")
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Air,
    Medium,
}

/// Outcome of parsing the raw-data sections of a file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawData {
    pub traces: TracePair,
    /// Non-blank section lines that did not hold two numeric tokens
    pub skipped_lines: usize,
}

/// Extract the first two numeric tokens of a line
fn parse_pair(line: &str) -> Option<(f64, f64)> {
    let mut numbers = number_regex()
        .find_iter(line)
        .filter_map(|m| m.as_str().parse::<f64>().ok());
    let x = numbers.next()?;
    let y = numbers.next()?;
    Some((x, y))
}

/// Parse the air and medium raw-data sections out of the file contents
///
/// # Errors
///
/// [`AnalysisError::InvalidInput`] when either section is missing or empty.
pub fn parse_raw_data(contents: &str) -> Result<RawData, AnalysisError> {
    let mut raw = RawData::default();
    let mut section: Option<Section> = None;

    for (line_number, line) in contents.lines().enumerate() {
        if line.contains(AIR_RAW_MARKER) {
            section = Some(Section::Air);
        } else if line.contains(MEDIUM_RAW_MARKER) {
            section = Some(Section::Medium);
        } else if SECTION_END_MARKERS.iter().any(|m| line.contains(m)) {
            section = None;
        } else if let Some(current) = section {
            match parse_pair(line) {
                Some((x, y)) => match current {
                    Section::Air => raw.traces.air.push(x, y),
                    Section::Medium => raw.traces.medium.push(x, y),
                },
                None if line.trim().is_empty() => {}
                None => {
                    debug!(
                        "Skipping line {} without two numeric tokens: {:?}",
                        line_number + 1,
                        line
                    );
                    raw.skipped_lines += 1;
                }
            }
        }
    }

    if raw.traces.air.is_empty() {
        return Err(AnalysisError::InvalidInput(format!(
            "No samples found in the '{}' section",
            AIR_RAW_MARKER
        )));
    }
    if raw.traces.medium.is_empty() {
        return Err(AnalysisError::InvalidInput(format!(
            "No samples found in the '{}' section",
            MEDIUM_RAW_MARKER
        )));
    }

    Ok(raw)
}

/// Render `(a, b)` rows as `"{a}\t{b}\n"` lines
pub fn format_pairs<I>(pairs: I) -> String
where
    I: IntoIterator<Item = (f64, f64)>,
{
    pairs
        .into_iter()
        .map(|(a, b)| format!("{:?}\t{:?}\n", a, b))
        .collect()
}

/// Render a trace pair as the two raw-data sections
pub fn format_raw_data(traces: &TracePair) -> String {
    format!(
        "{}\n{}\n{}\n{}",
        AIR_RAW_MARKER,
        format_pairs(traces.air.samples().iter().copied()),
        MEDIUM_RAW_MARKER,
        format_pairs(traces.medium.samples().iter().copied())
    )
}

/// Render fit results as `"{frequency}\t{ratio}\t{n}\n"` lines
pub fn format_fit_results(results: &[FitResult]) -> String {
    results
        .iter()
        .map(|r| format!("{:?}\t{:?}\t{:?}\n", r.frequency, r.ratio, r.n))
        .collect()
}

/// Measurement file on disk
#[derive(Debug, Clone)]
pub struct DataFile {
    path: PathBuf,
}

impl DataFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the raw-data sections
    pub fn read_raw_data(&self) -> Result<RawData> {
        debug!("Reading raw data from {:?}", self.path);
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read data file at {:?}", self.path))?;

        let raw = parse_raw_data(&contents)
            .with_context(|| format!("Invalid data file {:?}", self.path))?;

        info!(
            "Loaded {} air samples and {} medium samples from {:?} ({} lines skipped)",
            raw.traces.air.len(),
            raw.traces.medium.len(),
            self.path,
            raw.skipped_lines
        );
        Ok(raw)
    }

    /// Replace the file with the raw-data sections of `traces`
    pub fn write_raw_data(&self, traces: &TracePair) -> Result<()> {
        fs::write(&self.path, format_raw_data(traces))
            .with_context(|| format!("Failed to write raw data to {:?}", self.path))?;
        info!(
            "Wrote {} air samples and {} medium samples to {:?}",
            traces.air.len(),
            traces.medium.len(),
            self.path
        );
        Ok(())
    }

    /// Append a title followed by a block of text, opening and closing the file
    fn append(&self, title: &str, body: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open {:?} for appending", self.path))?;

        file.write_all(title.as_bytes())
            .and_then(|_| file.write_all(body.as_bytes()))
            .with_context(|| format!("Failed to append to {:?}", self.path))?;

        Ok(())
    }

    /// Append a spectrum table under the given title
    pub fn append_spectrum(&self, title: &str, spectrum: &Spectrum) -> Result<()> {
        debug!(
            "Appending {} bins to {:?} under {:?}",
            spectrum.len(),
            self.path,
            title.trim()
        );
        self.append(title, &format_pairs(spectrum.iter()))
    }

    /// Append the refractive index fit table
    pub fn append_fit_table(&self, results: &[FitResult]) -> Result<()> {
        debug!("Appending {} fit results to {:?}", results.len(), self.path);
        self.append(FIT_TABLE_TITLE, &format_fit_results(results))
    }
}

impl TraceSource for DataFile {
    fn read_traces(&self) -> Result<TracePair> {
        Ok(self.read_raw_data()?.traces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Header line\n\
Air Raw Data\n\
Time Amplitude\n\
0 1.5\n\
1 -2\n\
2.5 +3.25\n\
\n\
Medium Raw Data\n\
0.0\t0.5\n\
only 1 number\n\
1.0\t-0.25\n";

    #[test]
    fn test_parse_sections_and_skipped_lines() {
        let raw = parse_raw_data(SAMPLE).unwrap();
        assert_eq!(
            raw.traces.air.samples(),
            &[(0.0, 1.5), (1.0, -2.0), (2.5, 3.25)]
        );
        assert_eq!(raw.traces.medium.samples(), &[(0.0, 0.5), (1.0, -0.25)]);
        // "Time Amplitude" and "only 1 number"
        assert_eq!(raw.skipped_lines, 2);
    }

    #[test]
    fn test_parse_pair_tokens() {
        assert_eq!(parse_pair("1.5e-12 -3E2"), Some((1.5e-12, -300.0)));
        assert_eq!(parse_pair(".5 7."), Some((0.5, 7.0)));
        assert_eq!(parse_pair("x=3, y=4, z=5"), Some((3.0, 4.0)));
        assert_eq!(parse_pair("no numbers"), None);
        assert_eq!(parse_pair("42"), None);
    }

    #[test]
    fn test_lines_before_any_marker_are_ignored() {
        let raw = parse_raw_data("1 2\nAir Raw Data\n3 4\nMedium Raw Data\n5 6\n").unwrap();
        assert_eq!(raw.traces.air.samples(), &[(3.0, 4.0)]);
        assert_eq!(raw.traces.medium.samples(), &[(5.0, 6.0)]);
        assert_eq!(raw.skipped_lines, 0);
    }

    #[test]
    fn test_appended_tables_end_sections() {
        let contents = format!(
            "{}{}{}{}",
            SAMPLE,
            AIR_FFT_TITLE,
            format_pairs(vec![(0.0, 10.0), (1.0, 2.0)]),
            MEDIUM_FFT_TITLE
        );
        let raw = parse_raw_data(&contents).unwrap();
        assert_eq!(raw.traces.medium.len(), 2);
    }

    #[test]
    fn test_missing_sections_are_errors() {
        assert!(matches!(
            parse_raw_data("Medium Raw Data\n1 2\n"),
            Err(AnalysisError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_raw_data("Air Raw Data\n1 2\nMedium Raw Data\n"),
            Err(AnalysisError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_raw_data_written_is_read_back() {
        let traces = TracePair {
            air: Trace::new(vec![(0.0, 1.5), (1.0e-13, -2.0e-3)]),
            medium: Trace::new(vec![(0.0, 0.25), (1.0e-13, 4.0)]),
        };
        let raw = parse_raw_data(&format_raw_data(&traces)).unwrap();
        assert_eq!(raw.traces, traces);
        assert_eq!(raw.skipped_lines, 0);
    }

    #[test]
    fn test_format_pairs() {
        assert_eq!(
            format_pairs(vec![(0.0, 2.5), (0.125, 1.0)]),
            "0.0\t2.5\n0.125\t1.0\n"
        );
    }
}
