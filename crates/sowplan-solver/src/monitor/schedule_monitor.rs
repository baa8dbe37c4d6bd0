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

use crate::{builder::ModelLedger, error::ScheduleError, result::ScheduleOutcome};
use sowplan_model::problem::Problem;
use std::time::Duration;

/// Observes one optimizer run.
///
/// Hooks fire in order: `on_model_built`, `on_enter_search`, `on_exit_search`.
/// A run that fails validation or model building fires none of them.
pub trait ScheduleMonitor {
    fn name(&self) -> &str;
    fn on_model_built(&mut self, problem: &Problem, ledger: &ModelLedger);
    fn on_enter_search(&mut self, budget: Duration);
    fn on_exit_search(&mut self, result: &Result<ScheduleOutcome, ScheduleError>);
}

impl std::fmt::Debug for dyn ScheduleMonitor + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ScheduleMonitor({})", self.name())
    }
}

impl std::fmt::Display for dyn ScheduleMonitor + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ScheduleMonitor({})", self.name())
    }
}
