// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-refractive-index project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Operator side of the window selection
//!
//! [`OperatorInput`] is what the selection state machine talks to. The
//! terminal implementation reads answers line by line; the scripted one
//! replays canned answers and records what it was shown.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use super::window::Window;
use crate::error::AnalysisError;
use crate::preprocessing::RatioSeries;

/// Words that abort the selection at any prompt
const ABORT_WORDS: [&str; 4] = ["q", "quit", "abort", "exit"];

/// Answer to a range request
#[derive(Debug, Clone, PartialEq)]
pub enum RangeReply {
    Range { lower: i64, upper: i64 },
    /// The answer was not an integer
    Unparsable(String),
    Abort,
}

/// Answer to a confirmation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Accept,
    Reject,
    Abort,
}

/// The human in the loop
#[cfg_attr(test, mockall::automock)]
pub trait OperatorInput {
    /// Ask for a `[lower, upper)` index range over the given frequency axis
    fn request_range(&mut self, frequencies: &[f64]) -> Result<RangeReply, AnalysisError>;

    /// Show the truncated ratio series of a candidate window
    fn show_candidate(&mut self, window: &Window, candidate: &RatioSeries);

    /// Ask whether the candidate window is good
    fn confirm(&mut self, window: &Window) -> Result<Confirmation, AnalysisError>;

    /// Report a recoverable problem before asking again
    fn report_error(&mut self, error: &AnalysisError);
}

fn is_abort(answer: &str) -> bool {
    ABORT_WORDS
        .iter()
        .any(|word| answer.eq_ignore_ascii_case(word))
}

/// Operator answering on a text terminal
pub struct TerminalOperator<R: BufRead, W: Write> {
    input: R,
    output: W,
    axis_shown: bool,
}

impl TerminalOperator<std::io::StdinLock<'static>, std::io::Stdout> {
    /// Operator on the process standard input and output
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalOperator<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            axis_shown: false,
        }
    }

    /// Print a prompt and read one trimmed line, `None` at end of input
    fn ask(&mut self, prompt: &str) -> Result<Option<String>, AnalysisError> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn ask_index(&mut self, prompt: &str) -> Result<Result<i64, RangeReply>, AnalysisError> {
        Ok(match self.ask(prompt)? {
            None => Err(RangeReply::Abort),
            Some(answer) if is_abort(&answer) => Err(RangeReply::Abort),
            Some(answer) => answer
                .parse::<i64>()
                .map_err(|_| RangeReply::Unparsable(answer)),
        })
    }

    fn print_axis(&mut self, frequencies: &[f64]) -> Result<(), AnalysisError> {
        writeln!(
            self.output,
            "{} frequency bins (type 'q' at any prompt to abort):",
            frequencies.len()
        )?;
        for (i, frequency) in frequencies.iter().enumerate() {
            writeln!(self.output, "  [{:>5}] {:e}", i, frequency)?;
        }
        Ok(())
    }
}

impl<R: BufRead, W: Write> OperatorInput for TerminalOperator<R, W> {
    fn request_range(&mut self, frequencies: &[f64]) -> Result<RangeReply, AnalysisError> {
        if !self.axis_shown {
            self.print_axis(frequencies)?;
            self.axis_shown = true;
        }

        let lower =
            match self.ask_index("Enter the lower limit for frequency (index of data point): ")? {
                Ok(value) => value,
                Err(reply) => return Ok(reply),
            };
        let upper =
            match self.ask_index("Enter the upper limit for frequency (index of data point): ")? {
                Ok(value) => value,
                Err(reply) => return Ok(reply),
            };
        Ok(RangeReply::Range { lower, upper })
    }

    fn show_candidate(&mut self, window: &Window, candidate: &RatioSeries) {
        let mut render = || -> std::io::Result<()> {
            writeln!(
                self.output,
                "Ratio vs. frequency for bins [{}, {}):",
                window.lower, window.upper
            )?;
            writeln!(self.output, "  {:>7}  {:>14}  {:>14}", "bin", "frequency", "ratio")?;
            for (i, (frequency, ratio)) in candidate.iter().enumerate() {
                writeln!(
                    self.output,
                    "  {:>7}  {:>14.6e}  {:>14.6}",
                    candidate.first_bin() + i,
                    frequency,
                    ratio
                )?;
            }
            Ok(())
        };
        if let Err(e) = render() {
            log::warn!("Failed to display candidate window: {}", e);
        }
    }

    fn confirm(&mut self, _window: &Window) -> Result<Confirmation, AnalysisError> {
        Ok(match self.ask("Type 'Y' if the fit is good: ")? {
            None => Confirmation::Abort,
            Some(answer) if is_abort(&answer) => Confirmation::Abort,
            Some(answer)
                if answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes") =>
            {
                Confirmation::Accept
            }
            Some(_) => Confirmation::Reject,
        })
    }

    fn report_error(&mut self, error: &AnalysisError) {
        if let Err(e) = writeln!(self.output, "Invalid limits ({}). Please try again.", error) {
            log::warn!("Failed to report error to operator: {}", e);
        }
    }
}

/// Operator replaying canned answers
///
/// Once a script runs out the operator aborts, so a selection driven by it
/// always terminates.
#[derive(Debug, Default)]
pub struct ScriptedOperator {
    ranges: VecDeque<RangeReply>,
    confirmations: VecDeque<Confirmation>,
    /// Messages of every reported error, in order
    pub reported_errors: Vec<String>,
    /// Windows shown as candidates, in order
    pub shown_windows: Vec<Window>,
}

impl ScriptedOperator {
    pub fn new(ranges: Vec<RangeReply>, confirmations: Vec<Confirmation>) -> Self {
        Self {
            ranges: ranges.into(),
            confirmations: confirmations.into(),
            ..Default::default()
        }
    }

    /// Operator that picks `[lower, upper)` and accepts it
    pub fn accepting(lower: i64, upper: i64) -> Self {
        Self::new(
            vec![RangeReply::Range { lower, upper }],
            vec![Confirmation::Accept],
        )
    }
}

impl OperatorInput for ScriptedOperator {
    fn request_range(&mut self, _frequencies: &[f64]) -> Result<RangeReply, AnalysisError> {
        Ok(self.ranges.pop_front().unwrap_or(RangeReply::Abort))
    }

    fn show_candidate(&mut self, window: &Window, _candidate: &RatioSeries) {
        self.shown_windows.push(*window);
    }

    fn confirm(&mut self, _window: &Window) -> Result<Confirmation, AnalysisError> {
        Ok(self
            .confirmations
            .pop_front()
            .unwrap_or(Confirmation::Abort))
    }

    fn report_error(&mut self, error: &AnalysisError) {
        self.reported_errors.push(error.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn terminal(script: &str) -> TerminalOperator<Cursor<Vec<u8>>, Vec<u8>> {
        TerminalOperator::new(Cursor::new(script.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_terminal_reads_range() {
        let mut operator = terminal("2\n 7 \n");
        let reply = operator.request_range(&[0.0, 1.0, 2.0]).unwrap();
        assert_eq!(reply, RangeReply::Range { lower: 2, upper: 7 });

        let printed = String::from_utf8(operator.output.clone()).unwrap();
        assert!(printed.contains("3 frequency bins"));
        assert!(printed.contains("Enter the lower limit"));
        assert!(printed.contains("Enter the upper limit"));
    }

    #[test]
    fn test_terminal_unparsable_and_abort() {
        let mut operator = terminal("abc\n");
        assert_eq!(
            operator.request_range(&[0.0]).unwrap(),
            RangeReply::Unparsable("abc".to_string())
        );

        let mut operator = terminal("1\nQuit\n");
        assert_eq!(operator.request_range(&[0.0]).unwrap(), RangeReply::Abort);

        // End of input never blocks
        let mut operator = terminal("");
        assert_eq!(operator.request_range(&[0.0]).unwrap(), RangeReply::Abort);
    }

    #[test]
    fn test_terminal_confirmation() {
        let window = Window { lower: 0, upper: 1 };
        let mut operator = terminal("y\nYES\nn\nabort\n");
        assert_eq!(operator.confirm(&window).unwrap(), Confirmation::Accept);
        assert_eq!(operator.confirm(&window).unwrap(), Confirmation::Accept);
        assert_eq!(operator.confirm(&window).unwrap(), Confirmation::Reject);
        assert_eq!(operator.confirm(&window).unwrap(), Confirmation::Abort);
        assert_eq!(operator.confirm(&window).unwrap(), Confirmation::Abort);
    }

    #[test]
    fn test_terminal_shows_candidate_table() {
        let mut operator = terminal("");
        let series = RatioSeries::new(vec![0.0, 1.0e12, 2.0e12], vec![1.0, 1.25, 1.5])
            .unwrap()
            .slice(1..3);
        operator.show_candidate(&Window { lower: 1, upper: 3 }, &series);

        let printed = String::from_utf8(operator.output).unwrap();
        assert!(printed.contains("bins [1, 3)"));
        assert!(printed.contains("1.250000"));
        assert_eq!(printed.lines().count(), 4);
    }

    #[test]
    fn test_scripted_operator_aborts_when_exhausted() {
        let mut operator = ScriptedOperator::accepting(0, 2);
        assert_eq!(
            operator.request_range(&[]).unwrap(),
            RangeReply::Range { lower: 0, upper: 2 }
        );
        assert_eq!(operator.request_range(&[]).unwrap(), RangeReply::Abort);
        let window = Window { lower: 0, upper: 2 };
        assert_eq!(operator.confirm(&window).unwrap(), Confirmation::Accept);
        assert_eq!(operator.confirm(&window).unwrap(), Confirmation::Abort);
    }
}
