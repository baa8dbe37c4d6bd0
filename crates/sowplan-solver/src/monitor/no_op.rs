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
    builder::ModelLedger, error::ScheduleError, monitor::schedule_monitor::ScheduleMonitor,
    result::ScheduleOutcome,
};
use sowplan_model::problem::Problem;
use std::time::Duration;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct NoOperationMonitor;

impl NoOperationMonitor {
    /// Creates a new `NoOperationMonitor`.
    #[inline(always)]
    pub fn new() -> Self {
        Self
    }
}

impl ScheduleMonitor for NoOperationMonitor {
    #[inline(always)]
    fn name(&self) -> &str {
        "NoOperationMonitor"
    }

    #[inline(always)]
    fn on_model_built(&mut self, _problem: &Problem, _ledger: &ModelLedger) {}

    #[inline(always)]
    fn on_enter_search(&mut self, _budget: Duration) {}

    #[inline(always)]
    fn on_exit_search(&mut self, _result: &Result<ScheduleOutcome, ScheduleError>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name() {
        let monitor = NoOperationMonitor::new();
        assert_eq!(monitor.name(), "NoOperationMonitor");
        let boxed: Box<dyn ScheduleMonitor> = Box::new(monitor);
        assert_eq!(format!("{:?}", boxed), "ScheduleMonitor(NoOperationMonitor)");
    }
}
