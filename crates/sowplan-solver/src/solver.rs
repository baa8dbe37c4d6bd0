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
    builder::{Incumbent, ScheduleModel},
    error::ScheduleError,
    monitor::{composite::CompositeMonitor, schedule_monitor::ScheduleMonitor},
    result::{ScheduleOutcome, SolveStatus, TerminationReason},
    stats::SolveStatisticsBuilder,
    verify,
};
use sowplan_model::{config::ScheduleConfig, problem::Problem, schedule::Schedule};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Runs the normalize, build, search and extract pipeline.
///
/// Every call builds a fresh model; nothing is shared between runs.
#[derive(Debug, Default)]
pub struct CropScheduler<'a> {
    monitor: CompositeMonitor<'a>,
    time_limit: Option<Duration>,
}

/// Configures a `CropScheduler`.
#[derive(Debug, Default)]
pub struct SchedulerBuilder<'a> {
    monitor: CompositeMonitor<'a>,
    time_limit: Option<Duration>,
}

impl<'a> SchedulerBuilder<'a> {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the time budget of every problem solved.
    #[inline]
    pub fn time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }

    #[inline]
    pub fn add_monitor<M>(mut self, monitor: M) -> Self
    where
        M: ScheduleMonitor + 'a,
    {
        self.monitor.add_monitor(monitor);
        self
    }

    #[inline]
    pub fn build(self) -> CropScheduler<'a> {
        CropScheduler {
            monitor: self.monitor,
            time_limit: self.time_limit,
        }
    }
}

impl<'a> CropScheduler<'a> {
    /// Creates a scheduler without monitors that honours each problem's budget.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn builder() -> SchedulerBuilder<'a> {
        SchedulerBuilder::new()
    }

    #[inline]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    /// Normalizes `config` and solves it.
    ///
    /// # Errors
    ///
    /// Configuration problems are returned as `ScheduleError::Config` before
    /// any model is built. See `solve` for the remaining errors.
    pub fn solve_config(
        &mut self,
        config: &ScheduleConfig,
    ) -> Result<ScheduleOutcome, ScheduleError> {
        let problem = Problem::from_config(config)?;
        self.solve(&problem)
    }

    /// Solves `problem` and returns the best schedule found.
    ///
    /// # Errors
    ///
    /// - `ScheduleError::InfeasibleModel` if no schedule exists.
    /// - `ScheduleError::SolveTimeLimit` if the budget expired with no schedule.
    /// - `ScheduleError::ValueOutOfRange` if the problem does not fit the
    ///   engine's integer domains.
    pub fn solve(&mut self, problem: &Problem) -> Result<ScheduleOutcome, ScheduleError> {
        let build_start = Instant::now();
        let model = ScheduleModel::build(problem)?;
        let build_duration = build_start.elapsed();

        self.monitor.on_model_built(problem, model.ledger());

        let statistics = SolveStatisticsBuilder::new()
            .area_variables(model.num_cells())
            .sow_literals(model.num_cells())
            .constraints(model.ledger().num_constraints())
            .build_duration(build_duration);

        let budget = self.time_limit.unwrap_or_else(|| problem.time_budget());
        self.monitor.on_enter_search(budget);
        debug!(budget_secs = budget.as_secs_f64(), "handing model to the solver");

        let search_start = Instant::now();
        let result = model.optimise(budget).map(|incumbent| {
            let statistics = statistics
                .solve_duration(search_start.elapsed())
                .build();
            Self::construct_outcome(problem, incumbent, budget, statistics)
        });

        self.monitor.on_exit_search(&result);
        if let Ok(outcome) = &result {
            info!(
                status = %outcome.status(),
                total_profit = outcome.total_profit(),
                "Total profit: {} million.",
                outcome.schedule().profit_millions()
            );
        }
        result
    }

    fn construct_outcome(
        problem: &Problem,
        incumbent: Incumbent,
        budget: Duration,
        statistics: crate::stats::SolveStatistics,
    ) -> ScheduleOutcome {
        let names = problem
            .crop_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let schedule = Schedule::new(names, incumbent.cells, incumbent.objective);

        debug_assert_eq!(
            verify::check_schedule(problem, &schedule),
            Ok(()),
            "solver returned a schedule that violates the model"
        );

        match incumbent.status {
            SolveStatus::Optimal => ScheduleOutcome::optimal(schedule, statistics),
            SolveStatus::Feasible => ScheduleOutcome::feasible(
                schedule,
                TerminationReason::Aborted(format!(
                    "time budget of {:.3}s exhausted",
                    budget.as_secs_f64()
                )),
                statistics,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        builder::ModelLedger,
        error::ErrorKind,
        monitor::{log::LogMonitor, no_op::NoOperationMonitor},
    };
    use sowplan_model::{
        calendar::months,
        error::ConfigError,
        index::{CropIndex, MonthIndex},
    };
    use std::cell::RefCell;

    fn mi(i: usize) -> MonthIndex {
        MonthIndex::new(i)
    }

    fn ci(i: usize) -> CropIndex {
        CropIndex::new(i)
    }

    struct RecordingMonitor<'a> {
        events: &'a RefCell<Vec<&'static str>>,
    }

    impl ScheduleMonitor for RecordingMonitor<'_> {
        fn name(&self) -> &str {
            "RecordingMonitor"
        }

        fn on_model_built(&mut self, _problem: &Problem, _ledger: &ModelLedger) {
            self.events.borrow_mut().push("model_built");
        }

        fn on_enter_search(&mut self, _budget: Duration) {
            self.events.borrow_mut().push("enter_search");
        }

        fn on_exit_search(&mut self, _result: &Result<ScheduleOutcome, ScheduleError>) {
            self.events.borrow_mut().push("exit_search");
        }
    }

    fn single_crop() -> ScheduleConfig {
        ScheduleConfig::new()
            .with_crop_count(1)
            .with_crop_cycle(vec![1])
            .with_water_use(vec![0])
            .with_crop_profit(vec![1000])
            .with_land_available(10)
    }

    #[test]
    fn test_single_crop_plants_all_land_every_month() {
        let mut scheduler = CropScheduler::new();
        let outcome = scheduler.solve_config(&single_crop()).unwrap();

        assert!(outcome.is_optimal());
        assert_eq!(outcome.reason(), &TerminationReason::OptimalityProven);
        assert_eq!(outcome.total_profit(), 120_000);
        let schedule = outcome.schedule();
        for m in months() {
            let cell = schedule.allocation(m, ci(0));
            assert!(cell.sown, "not sown in {}", m);
            assert_eq!(cell.area, 10);
        }
        assert!((schedule.profit_millions() - 0.12).abs() < 1e-12);
    }

    #[test]
    fn test_short_cycle_crop_takes_all_land() {
        let config = ScheduleConfig::new()
            .with_crop_count(2)
            .with_crop_cycle(vec![1, 2])
            .with_water_use(vec![0, 0])
            .with_crop_profit(vec![100, 100])
            .with_land_available(10);
        let outcome = CropScheduler::new().solve_config(&config).unwrap();

        assert!(outcome.is_optimal());
        assert_eq!(outcome.total_profit(), 12 * 10 * 100);
        let schedule = outcome.schedule();
        assert_eq!(schedule.crop_names(), &["c1".to_string(), "c2".to_string()]);
        for m in months() {
            assert_eq!(schedule.allocation(m, ci(0)).area, 10);
            assert_eq!(schedule.allocation(m, ci(1)).area, 0);
            assert!(!schedule.allocation(m, ci(1)).sown);
        }
    }

    #[test]
    fn test_december_sowing_carries_into_next_year() {
        // Only December, January and February are open; a three month crop
        // fits solely when sown in December.
        let config = ScheduleConfig::new()
            .with_crop_count(1)
            .with_crop_cycle(vec![3])
            .with_water_use(vec![0])
            .with_crop_profit(vec![1000])
            .with_land_available(10)
            .with_off_season(1u32, 3..=11);
        let outcome = CropScheduler::new().solve_config(&config).unwrap();
        let schedule = outcome.schedule();

        assert!(schedule.allocation(mi(11), ci(0)).sown);
        assert!(!schedule.allocation(mi(0), ci(0)).sown);
        assert!(!schedule.allocation(mi(1), ci(0)).sown);
        for m in [mi(11), mi(0), mi(1)] {
            assert_eq!(schedule.allocation(m, ci(0)).area, 10);
        }
        for m in 2..11 {
            assert_eq!(schedule.allocation(mi(m), ci(0)), Default::default());
        }
        assert_eq!(outcome.total_profit(), 30 * (1000 / 3));
    }

    #[test]
    fn test_default_configuration_is_valid() {
        let problem = Problem::from_config(&ScheduleConfig::default()).unwrap();
        let outcome = CropScheduler::builder()
            .time_limit(Duration::from_secs(2))
            .build()
            .solve(&problem)
            .unwrap();
        assert_eq!(verify::check_schedule(&problem, outcome.schedule()), Ok(()));
        assert!(outcome.total_profit() > 0);
        assert_eq!(outcome.statistics().area_variables, 48);
    }

    #[test]
    fn test_default_crops_solve_on_large_land_and_multi_year_horizons() {
        for config in [
            ScheduleConfig::default().with_land_available(2400),
            ScheduleConfig::default().with_land_available(10_000),
            ScheduleConfig::default().with_total_years(2),
        ] {
            let problem = Problem::from_config(&config).unwrap();
            let outcome = CropScheduler::builder()
                .time_limit(Duration::from_secs(2))
                .build()
                .solve(&problem)
                .unwrap();
            assert_eq!(verify::check_schedule(&problem, outcome.schedule()), Ok(()));
            assert!(outcome.total_profit() > 0);
        }
    }

    #[test]
    fn test_multi_year_single_crop_reports_unscaled_profit() {
        let config = ScheduleConfig::new()
            .with_crop_count(1)
            .with_crop_cycle(vec![1])
            .with_water_use(vec![0])
            .with_crop_profit(vec![1000])
            .with_land_available(2500)
            .with_total_years(3);
        let problem = Problem::from_config(&config).unwrap();
        let outcome = CropScheduler::new().solve(&problem).unwrap();
        assert_eq!(outcome.total_profit(), 3000 * 2500 * 12);
        assert_eq!(verify::check_schedule(&problem, outcome.schedule()), Ok(()));
    }

    #[test]
    fn test_zero_budget_never_returns_an_invalid_schedule() {
        let config = ScheduleConfig::new()
            .with_crop_count(8)
            .with_crop_cycle(vec![3, 4, 5, 4, 1, 2, 6, 12])
            .with_water_use(vec![300, 200, 350, 400, 50, 100, 250, 10])
            .with_crop_profit(vec![
                75_000, 60_000, 100_000, 150_000, 5_000, 20_000, 90_000, 200_000,
            ])
            .with_max_solve_seconds(0.0);
        let problem = Problem::from_config(&config).unwrap();

        match CropScheduler::new().solve(&problem) {
            Ok(outcome) => {
                assert_eq!(verify::check_schedule(&problem, outcome.schedule()), Ok(()));
            }
            Err(e) => assert!(
                matches!(
                    e.kind(),
                    ErrorKind::SolveTimeLimit | ErrorKind::InfeasibleModel
                ),
                "unexpected error {e}"
            ),
        }
    }

    #[test]
    fn test_water_list_of_wrong_length_never_reaches_the_solver() {
        let events = RefCell::new(Vec::new());
        let mut scheduler = CropScheduler::builder()
            .add_monitor(RecordingMonitor { events: &events })
            .build();

        let config = ScheduleConfig::default().with_water_available(vec![100; 11]);
        let err = scheduler.solve_config(&config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DimensionMismatch);
        assert!(matches!(
            err,
            ScheduleError::Config(ConfigError::DimensionMismatch {
                parameter: "waterAvailable",
                expected: 12,
                actual: 11
            })
        ));
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_unknown_off_season_crop_never_reaches_the_solver() {
        let events = RefCell::new(Vec::new());
        let mut scheduler = CropScheduler::builder()
            .add_monitor(RecordingMonitor { events: &events })
            .build();

        let config = ScheduleConfig::default().with_off_season(99u32, [2, 3]);
        let err = scheduler.solve_config(&config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownCrop);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_crop_array_mismatch_is_dimension_mismatch() {
        let config = ScheduleConfig::default().with_crop_profit(vec![1, 2, 3]);
        let err = CropScheduler::new().solve_config(&config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DimensionMismatch);
    }

    #[test]
    fn test_monitors_see_the_full_lifecycle() {
        let events = RefCell::new(Vec::new());
        let mut scheduler = CropScheduler::builder()
            .add_monitor(NoOperationMonitor::new())
            .add_monitor(LogMonitor::new())
            .add_monitor(RecordingMonitor { events: &events })
            .build();

        scheduler.solve_config(&single_crop()).unwrap();
        assert_eq!(
            *events.borrow(),
            vec!["model_built", "enter_search", "exit_search"]
        );
    }

    #[test]
    fn test_negative_water_capacity_is_infeasible() {
        let config = single_crop()
            .with_water_use(vec![1])
            .with_water_available(-5);
        let err = CropScheduler::new().solve_config(&config).unwrap_err();
        assert!(matches!(err, ScheduleError::InfeasibleModel));
    }

    #[test]
    fn test_negative_land_capacity_is_infeasible() {
        let config = single_crop().with_land_available(-1);
        let err = CropScheduler::new().solve_config(&config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InfeasibleModel);
    }

    #[test]
    fn test_time_limit_override() {
        let scheduler = CropScheduler::builder()
            .time_limit(Duration::from_millis(250))
            .build();
        assert_eq!(scheduler.time_limit(), Some(Duration::from_millis(250)));
        assert_eq!(CropScheduler::new().time_limit(), None);
    }

    #[test]
    fn test_zero_weight_crop_may_stay_unplanted() {
        let config = ScheduleConfig::new()
            .with_crop_count(2)
            .with_crop_cycle(vec![1, 1])
            .with_water_use(vec![0, 0])
            .with_crop_profit(vec![10, 50])
            .with_multi_year_lag(vec![0, 1])
            .with_land_available(5);
        let outcome = CropScheduler::new().solve_config(&config).unwrap();
        assert_eq!(outcome.total_profit(), 12 * 5 * 10);
    }
}
