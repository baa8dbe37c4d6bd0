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

use crate::stats::SolveStatistics;
use sowplan_model::schedule::Schedule;

/// How good the returned schedule is known to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolveStatus {
    /// The solver proved that no better schedule exists.
    Optimal,
    /// The budget expired while a schedule was at hand; it may be improvable.
    Feasible,
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveStatus::Optimal => write!(f, "Optimal"),
            SolveStatus::Feasible => write!(f, "Feasible"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// The solver found and proved optimality of a schedule.
    OptimalityProven,
    /// The solver stopped at a search limit.
    /// The string describes the limit that was hit.
    Aborted(String),
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::OptimalityProven => write!(f, "Optimality Proven"),
            TerminationReason::Aborted(reason) => write!(f, "Aborted: {}", reason),
        }
    }
}

/// A successful optimizer run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleOutcome {
    status: SolveStatus,
    reason: TerminationReason,
    statistics: SolveStatistics,
    schedule: Schedule,
}

impl ScheduleOutcome {
    #[inline]
    pub fn optimal(schedule: Schedule, statistics: SolveStatistics) -> Self {
        Self {
            status: SolveStatus::Optimal,
            reason: TerminationReason::OptimalityProven,
            statistics,
            schedule,
        }
    }

    #[inline]
    pub fn feasible(
        schedule: Schedule,
        reason: TerminationReason,
        statistics: SolveStatistics,
    ) -> Self {
        Self {
            status: SolveStatus::Feasible,
            reason,
            statistics,
            schedule,
        }
    }

    #[inline]
    pub fn status(&self) -> SolveStatus {
        self.status
    }

    #[inline]
    pub fn reason(&self) -> &TerminationReason {
        &self.reason
    }

    #[inline]
    pub fn statistics(&self) -> &SolveStatistics {
        &self.statistics
    }

    #[inline]
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Consumes the outcome and returns its schedule.
    #[inline]
    pub fn into_schedule(self) -> Schedule {
        self.schedule
    }

    #[inline]
    pub fn is_optimal(&self) -> bool {
        matches!(self.status, SolveStatus::Optimal)
    }

    /// Returns `true` if the schedule is not proven optimal.
    #[inline]
    pub fn is_feasible(&self) -> bool {
        matches!(self.status, SolveStatus::Feasible)
    }

    #[inline]
    pub fn total_profit(&self) -> i64 {
        self.schedule.total_profit()
    }
}

impl std::fmt::Display for ScheduleOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Status: {} ({})", self.status, self.reason)?;
        write!(f, "{}", self.schedule)?;
        write!(f, "{}", self.statistics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::SolveStatisticsBuilder;
    use sowplan_model::schedule::Allocation;

    fn schedule() -> Schedule {
        Schedule::new(vec!["c1".into()], vec![Allocation::new(true, 1); 12], 12)
    }

    #[test]
    fn test_optimal_constructor_sets_reason() {
        let outcome = ScheduleOutcome::optimal(schedule(), SolveStatisticsBuilder::new().build());
        assert!(outcome.is_optimal());
        assert!(!outcome.is_feasible());
        assert_eq!(outcome.reason(), &TerminationReason::OptimalityProven);
        assert_eq!(outcome.total_profit(), 12);
    }

    #[test]
    fn test_feasible_keeps_abort_reason() {
        let outcome = ScheduleOutcome::feasible(
            schedule(),
            TerminationReason::Aborted("time budget exhausted".into()),
            SolveStatisticsBuilder::new().build(),
        );
        assert_eq!(outcome.status(), SolveStatus::Feasible);
        assert_eq!(
            outcome.reason().to_string(),
            "Aborted: time budget exhausted"
        );
    }

    #[test]
    fn test_display_contains_status_table_and_statistics() {
        let outcome = ScheduleOutcome::optimal(schedule(), SolveStatisticsBuilder::new().build());
        let rendered = outcome.to_string();
        assert!(rendered.starts_with("Status: Optimal (Optimality Proven)\n"));
        assert!(rendered.contains("Total Profit: 12"));
        assert!(rendered.contains("Solve Statistics:"));
    }
}
