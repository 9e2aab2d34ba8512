// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-refractive-index project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Frequency window and its selection state machine
//!
//! ```text
//!            range rejected / unparsable
//!              +-------+
//!              v       |
//!       AwaitingRange -+---- valid range ----> AwaitingConfirmation
//!              ^                                   |        |
//!              +------------- reject --------------+     accept
//!                                                           v
//!                                                         Done
//! ```
//!
//! An abort at any prompt leaves the machine with [`AnalysisError::Cancelled`].

use std::ops::Range;

use log::{debug, info, warn};

use super::operator::{Confirmation, OperatorInput, RangeReply};
use crate::error::AnalysisError;
use crate::preprocessing::RatioSeries;
use crate::visualization::PlotSink;

/// Inclusive-start, exclusive-end bin range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub lower: usize,
    pub upper: usize,
}

impl Window {
    /// Check a raw `[lower, upper)` range against a series length
    ///
    /// # Errors
    ///
    /// [`AnalysisError::InvalidRange`] when `lower < 0`, `upper > length` or
    /// `lower >= upper`.
    pub fn validate(lower: i64, upper: i64, length: usize) -> Result<Self, AnalysisError> {
        let invalid = || AnalysisError::InvalidRange {
            lower,
            upper,
            length,
        };

        let lower_index = usize::try_from(lower).map_err(|_| invalid())?;
        let upper_index = usize::try_from(upper).map_err(|_| invalid())?;
        if upper_index > length || lower_index >= upper_index {
            return Err(invalid());
        }

        Ok(Self {
            lower: lower_index,
            upper: upper_index,
        })
    }

    pub fn len(&self) -> usize {
        self.upper - self.lower
    }

    pub fn is_empty(&self) -> bool {
        self.upper <= self.lower
    }

    pub fn range(&self) -> Range<usize> {
        self.lower..self.upper
    }

    /// Truncate a series to this window
    pub fn apply(&self, series: &RatioSeries) -> Result<RatioSeries, AnalysisError> {
        let checked = Self::validate(self.lower as i64, self.upper as i64, series.len())?;
        Ok(series.slice(checked.range()))
    }
}

/// State of the interactive selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    AwaitingRange,
    AwaitingConfirmation(Window),
    Done(Window),
}

/// Confirmed window and the truncated series it selects
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub window: Window,
    pub series: RatioSeries,
}

/// Drives the operator through range entry and confirmation
pub struct WindowSelector<'a> {
    series: &'a RatioSeries,
    state: SelectionState,
    attempts: usize,
}

impl<'a> WindowSelector<'a> {
    pub fn new(series: &'a RatioSeries) -> Self {
        Self {
            series,
            state: SelectionState::AwaitingRange,
            attempts: 0,
        }
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// Number of range entries made so far
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Advance the state machine by one operator interaction
    pub fn step(
        &mut self,
        operator: &mut dyn OperatorInput,
        plots: &mut dyn PlotSink,
    ) -> Result<SelectionState, AnalysisError> {
        self.state = match self.state {
            SelectionState::AwaitingRange => {
                self.attempts += 1;
                match operator.request_range(self.series.frequencies())? {
                    RangeReply::Abort => return Err(AnalysisError::Cancelled),
                    RangeReply::Unparsable(answer) => {
                        operator.report_error(&AnalysisError::InvalidInput(format!(
                            "'{}' is not an integer index",
                            answer
                        )));
                        SelectionState::AwaitingRange
                    }
                    RangeReply::Range { lower, upper } => {
                        match Window::validate(lower, upper, self.series.len()) {
                            Ok(window) => {
                                let candidate = window.apply(self.series)?;
                                operator.show_candidate(&window, &candidate);
                                if let Err(e) = plots.plot_ratio_window(&candidate) {
                                    warn!("Failed to plot candidate window: {:#}", e);
                                }
                                SelectionState::AwaitingConfirmation(window)
                            }
                            Err(e) if e.is_recoverable() => {
                                debug!("Rejected range: {}", e);
                                operator.report_error(&e);
                                SelectionState::AwaitingRange
                            }
                            Err(e) => return Err(e),
                        }
                    }
                }
            }
            SelectionState::AwaitingConfirmation(window) => match operator.confirm(&window)? {
                Confirmation::Accept => SelectionState::Done(window),
                Confirmation::Reject => SelectionState::AwaitingRange,
                Confirmation::Abort => return Err(AnalysisError::Cancelled),
            },
            done @ SelectionState::Done(_) => done,
        };
        Ok(self.state)
    }

    /// Run the selection until the operator confirms a window or aborts
    pub fn run(
        mut self,
        operator: &mut dyn OperatorInput,
        plots: &mut dyn PlotSink,
    ) -> Result<Selection, AnalysisError> {
        loop {
            if let SelectionState::Done(window) = self.step(operator, plots)? {
                info!(
                    "Window [{}, {}) confirmed after {} attempt(s)",
                    window.lower, window.upper, self.attempts
                );
                return Ok(Selection {
                    window,
                    series: window.apply(self.series)?,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::operator::{MockOperatorInput, ScriptedOperator};
    use crate::visualization::NullPlotSink;
    use mockall::predicate::*;
    use mockall::Sequence;

    fn series(length: usize) -> RatioSeries {
        RatioSeries::new(
            (0..length).map(|i| i as f64 * 1.0e11).collect(),
            (0..length).map(|i| 1.0 + i as f64 * 0.01).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_validate_rejects_out_of_bounds() {
        for &(lower, upper) in &[(-1, 10), (5, 3), (0, 11), (4, 4)] {
            assert!(
                matches!(
                    Window::validate(lower, upper, 10),
                    Err(AnalysisError::InvalidRange { .. })
                ),
                "({}, {}) should be rejected",
                lower,
                upper
            );
        }
        let window = Window::validate(0, 10, 10).unwrap();
        assert_eq!(window, Window { lower: 0, upper: 10 });
        assert_eq!(window.len(), 10);
    }

    #[test]
    fn test_apply_keeps_bin_numbering() {
        let windowed = Window { lower: 2, upper: 5 }.apply(&series(10)).unwrap();
        assert_eq!(windowed.len(), 3);
        assert_eq!(windowed.first_bin(), 2);
        assert_eq!(windowed.frequencies()[0], 2.0e11);
        assert!(Window { lower: 2, upper: 11 }.apply(&series(10)).is_err());
    }

    #[test]
    fn test_retry_then_accept() {
        let data = series(10);
        let mut operator = ScriptedOperator::new(
            vec![
                RangeReply::Range {
                    lower: -1,
                    upper: 10,
                },
                RangeReply::Unparsable("ten".to_string()),
                RangeReply::Range { lower: 2, upper: 6 },
                RangeReply::Range { lower: 0, upper: 10 },
            ],
            vec![Confirmation::Reject, Confirmation::Accept],
        );

        let selection = WindowSelector::new(&data)
            .run(&mut operator, &mut NullPlotSink)
            .unwrap();

        assert_eq!(selection.window, Window { lower: 0, upper: 10 });
        assert_eq!(selection.series, data);
        assert_eq!(operator.reported_errors.len(), 2);
        assert_eq!(
            operator.shown_windows,
            vec![Window { lower: 2, upper: 6 }, Window { lower: 0, upper: 10 }]
        );
    }

    #[test]
    fn test_abort_cancels() {
        let data = series(4);
        let mut operator = ScriptedOperator::new(vec![RangeReply::Range { lower: 0, upper: 2 }], vec![]);
        let result = WindowSelector::new(&data).run(&mut operator, &mut NullPlotSink);
        assert!(matches!(result, Err(AnalysisError::Cancelled)));
    }

    #[test]
    fn test_state_transitions_with_mock_operator() {
        let data = series(8);
        let mut seq = Sequence::new();
        let mut operator = MockOperatorInput::new();

        operator
            .expect_request_range()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(RangeReply::Range { lower: 5, upper: 3 }));
        operator
            .expect_report_error()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| ());
        operator
            .expect_request_range()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(RangeReply::Range { lower: 1, upper: 4 }));
        operator
            .expect_show_candidate()
            .with(eq(Window { lower: 1, upper: 4 }), always())
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| ());
        operator
            .expect_confirm()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Confirmation::Accept));

        let mut plots = NullPlotSink;
        let mut selector = WindowSelector::new(&data);
        assert_eq!(selector.state(), SelectionState::AwaitingRange);
        assert_eq!(
            selector.step(&mut operator, &mut plots).unwrap(),
            SelectionState::AwaitingRange
        );
        assert_eq!(
            selector.step(&mut operator, &mut plots).unwrap(),
            SelectionState::AwaitingConfirmation(Window { lower: 1, upper: 4 })
        );
        assert_eq!(
            selector.step(&mut operator, &mut plots).unwrap(),
            SelectionState::Done(Window { lower: 1, upper: 4 })
        );
        // Done is terminal and asks nothing more
        assert_eq!(
            selector.step(&mut operator, &mut plots).unwrap(),
            SelectionState::Done(Window { lower: 1, upper: 4 })
        );
        assert_eq!(selector.attempts(), 2);
    }
}
