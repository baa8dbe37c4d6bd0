// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use crate::{
    builder::{ConstraintFamily, ModelLedger},
    error::ScheduleError,
    monitor::schedule_monitor::ScheduleMonitor,
    result::ScheduleOutcome,
};
use sowplan_model::problem::Problem;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Reports the lifecycle of a run through `tracing`.
#[derive(Debug, Clone)]
pub struct LogMonitor {
    start_time: Option<Instant>,
    budget: Duration,
}

impl LogMonitor {
    pub fn new() -> Self {
        Self {
            start_time: None,
            budget: Duration::ZERO,
        }
    }
}

impl Default for LogMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LogMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LogMonitor(budget: {:.3}s)", self.budget.as_secs_f64())
    }
}

impl ScheduleMonitor for LogMonitor {
    fn name(&self) -> &str {
        "LogMonitor"
    }

    fn on_model_built(&mut self, problem: &Problem, ledger: &ModelLedger) {
        debug!(
            crops = problem.num_crops(),
            constraints = ledger.num_constraints(),
            water_rows = ledger.family(ConstraintFamily::Water).count(),
            off_season_rows = ledger.family(ConstraintFamily::OffSeason).count(),
            "model built"
        );
    }

    fn on_enter_search(&mut self, budget: Duration) {
        self.start_time = Some(Instant::now());
        self.budget = budget;
        info!(budget_secs = budget.as_secs_f64(), "searching for a schedule");
    }

    fn on_exit_search(&mut self, result: &Result<ScheduleOutcome, ScheduleError>) {
        let elapsed = self
            .start_time
            .map(|t| t.elapsed())
            .unwrap_or(Duration::ZERO)
            .as_secs_f64();

        match result {
            Ok(outcome) => info!(
                status = %outcome.status(),
                reason = %outcome.reason(),
                profit_millions = outcome.schedule().profit_millions(),
                elapsed_secs = elapsed,
                "Total profit: {} million.",
                outcome.schedule().profit_millions()
            ),
            Err(e) => warn!(error = %e, elapsed_secs = elapsed, "search ended without a schedule"),
        }
    }
}
