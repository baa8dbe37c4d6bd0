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

//! The model builder.
//!
//! `ScheduleModel::build` turns a validated `Problem` into a constraint
//! program over the `pumpkin-solver` engine. Every (crop, month) cell gets a
//! bounded integer for its planted area and a literal for "a planting starts
//! here". The constraint families are posted in a fixed order and recorded in
//! a `ModelLedger`, so two builds of the same problem produce the same
//! structure.
//!
//! ## Families
//!
//! | Family            | Posted as                                                     |
//! |-------------------|---------------------------------------------------------------|
//! | `Water`           | `sum(use_c * area[c][m]) <= water[m]` per month               |
//! | `Land`            | `sum(area[c][m]) <= land` per month                           |
//! | `OffSeason`       | `area[c][m] <= 0`                                             |
//! | `CycleCarry`      | `sow[c][m] -> area[c][f] == area[c][m]` for the following `f` |
//! | `NoOverlap`       | `!sow[c][m] \/ !sow[c][f]` for the following `f`              |
//! | `SowCommitsArea`  | `sow[c][m] -> area[c][m] >= 1`                                |
//! | `AreaRequiresSow` | `area[c][m] > 0 -> OR(sow[c][o])` for originating `o`         |
//! | `MonthlyProfit`   | `profit[m] == sum(weight_c * area[c][m])`                     |
//! | `Objective`       | `objective == sum(profit[m])`, maximized                      |
//!
//! The engine works on `i32` domains. Coefficients, bounds and the largest
//! magnitude any linear sum can reach are checked up front, and a problem
//! that does not fit is rejected with `ScheduleError::ValueOutOfRange`.

use crate::{error::ScheduleError, result::SolveStatus};
use pumpkin_solver::{
    constraints,
    optimisation::{linear_sat_unsat::LinearSatUnsat, OptimisationDirection},
    results::{OptimisationResult, ProblemSolution, SolutionReference},
    termination::TimeBudget,
    variables::{DomainId, Literal, TransformableVariable},
    Solver,
};
use sowplan_model::{
    calendar::{months, occupied_months, originating_months, MONTHS_PER_YEAR},
    index::{CropIndex, MonthIndex},
    problem::Problem,
    schedule::Allocation,
};
use std::time::Duration;
use tracing::debug;

/// Upper bound on the planted area of any single cell.
pub const AREA_CAP: i64 = 100_000;

/// The area upper bound used for the given land capacity.
///
/// This is deliberately tighter than `AREA_CAP` whenever the land capacity is
/// smaller. No cell can exceed the land capacity in a feasible schedule, so the
/// tightening removes no solution, and it keeps every linear sum in the model
/// proportional to the land instead of to the cap.
#[inline]
pub fn area_upper_bound(land_capacity: i64) -> i64 {
    AREA_CAP.min(land_capacity.max(0))
}

/// The greatest common divisor of the profit weights, or `1` when all are zero.
pub fn weight_scale<I>(weights: I) -> i64
where
    I: IntoIterator<Item = i64>,
{
    let divisor = weights
        .into_iter()
        .map(i64::unsigned_abs)
        .fold(0u64, |mut a, mut b| {
            while b != 0 {
                (a, b) = (b, a % b);
            }
            a
        });
    match i64::try_from(divisor) {
        Ok(0) | Err(_) => 1,
        Ok(d) => d,
    }
}

#[inline]
fn to_i32(what: &'static str, value: i128) -> Result<i32, ScheduleError> {
    i32::try_from(value).map_err(|_| ScheduleError::ValueOutOfRange { what, value })
}

#[inline]
fn conflict<E>(_: E) -> ScheduleError {
    ScheduleError::InfeasibleModel
}

fn noop_callback<B>(_: &Solver, _: SolutionReference, _: &B) {}

/// A family of constraints, in posting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConstraintFamily {
    Water,
    Land,
    OffSeason,
    CycleCarry,
    NoOverlap,
    SowCommitsArea,
    AreaRequiresSow,
    MonthlyProfit,
    Objective,
}

/// One posted constraint group, identified by what it ranges over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintRecord {
    pub family: ConstraintFamily,
    pub crop: Option<CropIndex>,
    pub month: Option<MonthIndex>,
    /// Other months the group links `month` with, in linking order.
    pub linked_months: Vec<MonthIndex>,
    /// Number of solver constraints this record stands for.
    pub posted: usize,
}

/// The structure of a built model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelLedger {
    records: Vec<ConstraintRecord>,
}

impl ModelLedger {
    #[inline]
    fn record(
        &mut self,
        family: ConstraintFamily,
        crop: Option<CropIndex>,
        month: Option<MonthIndex>,
        linked_months: Vec<MonthIndex>,
        posted: usize,
    ) {
        self.records.push(ConstraintRecord {
            family,
            crop,
            month,
            linked_months,
            posted,
        });
    }

    /// Returns all records in posting order.
    #[inline]
    pub fn records(&self) -> &[ConstraintRecord] {
        &self.records
    }

    /// Returns the number of records.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the total number of solver constraints posted.
    #[inline]
    pub fn num_constraints(&self) -> usize {
        self.records.iter().map(|r| r.posted).sum()
    }

    /// Iterates over the records of one family.
    #[inline]
    pub fn family(&self, family: ConstraintFamily) -> impl Iterator<Item = &ConstraintRecord> {
        self.records.iter().filter(move |r| r.family == family)
    }

    /// Returns the record of `family` for `crop` in `month`, if any.
    pub fn find(
        &self,
        family: ConstraintFamily,
        crop: CropIndex,
        month: MonthIndex,
    ) -> Option<&ConstraintRecord> {
        self.family(family)
            .find(|r| r.crop == Some(crop) && r.month == Some(month))
    }
}

/// The decision variables of one (crop, month) cell.
#[derive(Debug, Clone, Copy)]
pub struct CellVars {
    pub area: DomainId,
    pub sow: Literal,
}

/// A solved assignment, taken from the engine before it is discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incumbent {
    pub status: SolveStatus,
    /// Month-major cells, `12 * num_crops` entries.
    pub cells: Vec<Allocation>,
    pub objective: i64,
}

/// A built constraint program, ready to be optimised once.
pub struct ScheduleModel {
    solver: Solver,
    num_crops: usize,
    /// Crop-major: `crop * 12 + month`.
    cells: Vec<CellVars>,
    objective: DomainId,
    /// Common divisor taken out of the profit weights.
    objective_scale: i64,
    ledger: ModelLedger,
}

impl std::fmt::Debug for ScheduleModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduleModel")
            .field("num_crops", &self.num_crops)
            .field("num_cells", &self.cells.len())
            .field("num_constraints", &self.ledger.num_constraints())
            .finish()
    }
}

struct ModelBuilder<'p> {
    problem: &'p Problem,
    solver: Solver,
    cells: Vec<CellVars>,
    area_ub: i32,
    ledger: ModelLedger,
}

impl<'p> ModelBuilder<'p> {
    fn new(problem: &'p Problem) -> Result<Self, ScheduleError> {
        let mut solver = Solver::default();
        let area_ub = to_i32(
            "area upper bound",
            area_upper_bound(problem.land_capacity()) as i128,
        )?;

        let mut cells = Vec::with_capacity(problem.num_crops() * MONTHS_PER_YEAR);
        for _ in problem.crop_indices() {
            for _ in months() {
                let area = solver.new_bounded_integer(0, area_ub);
                let sow = solver.new_literal();
                cells.push(CellVars { area, sow });
            }
        }

        Ok(Self {
            problem,
            solver,
            cells,
            area_ub,
            ledger: ModelLedger::default(),
        })
    }

    #[inline]
    fn cell(&self, crop: CropIndex, month: MonthIndex) -> CellVars {
        self.cells[crop.get() * MONTHS_PER_YEAR + month.get()]
    }

    #[inline]
    fn area_ub(&self) -> i128 {
        self.area_ub as i128
    }

    fn post_water(&mut self) -> Result<(), ScheduleError> {
        let tag = self.solver.new_constraint_tag();
        for m in months() {
            let mut terms = Vec::with_capacity(self.problem.num_crops());
            let mut max_use: i128 = 0;
            for c in self.problem.crop_indices() {
                let water_use = self.problem.crop(c).water_use();
                if water_use == 0 {
                    continue;
                }
                let coefficient = to_i32("water use", water_use as i128)?;
                max_use += water_use as i128 * self.area_ub();
                terms.push(self.cell(c, m).area.scaled(coefficient));
            }
            to_i32("monthly water demand bound", max_use)?;

            let capacity = self.problem.water_capacity(m);
            if terms.is_empty() {
                if capacity < 0 {
                    return Err(ScheduleError::InfeasibleModel);
                }
                continue;
            }

            let rhs = (capacity as i128).clamp(-1, max_use) as i32;
            self.solver
                .add_constraint(constraints::less_than_or_equals(terms, rhs, tag))
                .post()
                .map_err(conflict)?;
            self.ledger
                .record(ConstraintFamily::Water, None, Some(m), Vec::new(), 1);
        }
        Ok(())
    }

    fn post_land(&mut self) -> Result<(), ScheduleError> {
        let tag = self.solver.new_constraint_tag();
        let max_land = self.problem.num_crops() as i128 * self.area_ub();
        to_i32("monthly land use bound", max_land)?;
        let rhs = (self.problem.land_capacity() as i128).clamp(-1, max_land) as i32;

        for m in months() {
            let terms: Vec<_> = self
                .problem
                .crop_indices()
                .map(|c| self.cell(c, m).area.scaled(1))
                .collect();
            self.solver
                .add_constraint(constraints::less_than_or_equals(terms, rhs, tag))
                .post()
                .map_err(conflict)?;
            self.ledger
                .record(ConstraintFamily::Land, None, Some(m), Vec::new(), 1);
        }
        Ok(())
    }

    fn post_off_season(&mut self) -> Result<(), ScheduleError> {
        let tag = self.solver.new_constraint_tag();
        for c in self.problem.crop_indices() {
            for m in self.problem.crop(c).off_season().iter() {
                let area = self.cell(c, m).area;
                self.solver
                    .add_constraint(constraints::less_than_or_equals(
                        vec![area.scaled(1)],
                        0,
                        tag,
                    ))
                    .post()
                    .map_err(conflict)?;
                self.ledger
                    .record(ConstraintFamily::OffSeason, Some(c), Some(m), Vec::new(), 1);
            }
        }
        Ok(())
    }

    fn post_cycles(&mut self) -> Result<(), ScheduleError> {
        let tag = self.solver.new_constraint_tag();
        for c in self.problem.crop_indices() {
            let cycle = self.problem.crop(c).cycle_months();
            for m in months() {
                let here = self.cell(c, m);
                let following: Vec<MonthIndex> = occupied_months(m, cycle).skip(1).collect();

                for &f in &following {
                    let area = self.cell(c, f).area;
                    self.solver
                        .add_constraint(constraints::equals(
                            vec![here.area.scaled(1), area.scaled(-1)],
                            0,
                            tag,
                        ))
                        .implied_by(here.sow)
                        .map_err(conflict)?;
                }
                for &f in &following {
                    let sow = self.cell(c, f).sow;
                    self.solver
                        .add_constraint(constraints::clause(vec![!here.sow, !sow], tag))
                        .post()
                        .map_err(conflict)?;
                }
                if !following.is_empty() {
                    let posted = following.len();
                    self.ledger.record(
                        ConstraintFamily::CycleCarry,
                        Some(c),
                        Some(m),
                        following.clone(),
                        posted,
                    );
                    self.ledger.record(
                        ConstraintFamily::NoOverlap,
                        Some(c),
                        Some(m),
                        following,
                        posted,
                    );
                }

                self.solver
                    .add_constraint(constraints::greater_than_or_equals(
                        vec![here.area.scaled(1)],
                        1,
                        tag,
                    ))
                    .implied_by(here.sow)
                    .map_err(conflict)?;
                self.ledger.record(
                    ConstraintFamily::SowCommitsArea,
                    Some(c),
                    Some(m),
                    Vec::new(),
                    1,
                );

                // `planted` holds whenever the cell carries area.
                let planted = self.solver.new_literal();
                self.solver
                    .add_constraint(constraints::less_than_or_equals(
                        vec![here.area.scaled(1)],
                        0,
                        tag,
                    ))
                    .implied_by(!planted)
                    .map_err(conflict)?;
                let origins: Vec<MonthIndex> = originating_months(m, cycle).collect();
                let clause: Vec<Literal> = std::iter::once(!planted)
                    .chain(origins.iter().map(|&o| self.cell(c, o).sow))
                    .collect();
                self.solver
                    .add_constraint(constraints::clause(clause, tag))
                    .post()
                    .map_err(conflict)?;
                self.ledger.record(
                    ConstraintFamily::AreaRequiresSow,
                    Some(c),
                    Some(m),
                    origins,
                    2,
                );
            }
        }
        Ok(())
    }

    /// Posts the profit rows and returns the objective with its scale.
    ///
    /// Weights are divided by their common divisor before posting, and the
    /// engine maximises `total / scale`.
    fn post_objective(&mut self) -> Result<(DomainId, i64), ScheduleError> {
        let tag = self.solver.new_constraint_tag();
        let land = self.problem.land_capacity().max(0) as i128;
        let ub = self.area_ub();

        let scale = weight_scale(self.problem.crops().iter().map(|c| c.profit_weight()));
        let mut weights = Vec::with_capacity(self.problem.num_crops());
        for crop in self.problem.crops() {
            let weight = (crop.profit_weight() / scale) as i128;
            to_i32("profit weight", weight)?;
            to_i32("monthly profit term", weight.abs() * ub)?;
            weights.push(weight);
        }

        let max_weight = weights.iter().copied().max().unwrap_or(0).max(0);
        let min_weight = weights.iter().copied().min().unwrap_or(0).min(0);
        let positive_sum: i128 = weights.iter().map(|&w| w.max(0) * ub).sum();
        let negative_sum: i128 = weights.iter().map(|&w| w.min(0) * ub).sum();
        to_i32("monthly profit sum", positive_sum)?;
        to_i32("monthly profit sum", negative_sum)?;

        let hi = to_i32("monthly profit bound", positive_sum.min(land * max_weight))?;
        let lo = to_i32("monthly profit bound", negative_sum.max(land * min_weight))?;

        let mut monthly = Vec::with_capacity(MONTHS_PER_YEAR);
        for m in months() {
            let profit = self.solver.new_bounded_integer(lo, hi);
            let mut terms = Vec::with_capacity(weights.len() + 1);
            for (c, &w) in self.problem.crop_indices().zip(&weights) {
                if w != 0 {
                    terms.push(self.cell(c, m).area.scaled(w as i32));
                }
            }
            terms.push(profit.scaled(-1));
            self.solver
                .add_constraint(constraints::equals(terms, 0, tag))
                .post()
                .map_err(conflict)?;
            self.ledger
                .record(ConstraintFamily::MonthlyProfit, None, Some(m), Vec::new(), 1);
            monthly.push(profit);
        }

        let months_len = MONTHS_PER_YEAR as i128;
        let total_lo = to_i32("total profit bound", lo as i128 * months_len)?;
        let total_hi = to_i32("total profit bound", hi as i128 * months_len)?;
        for total in [total_lo, total_hi] {
            let value = total as i128 * scale as i128;
            if i64::try_from(value).is_err() {
                return Err(ScheduleError::ValueOutOfRange {
                    what: "total profit",
                    value,
                });
            }
        }

        let objective = self.solver.new_bounded_integer(total_lo, total_hi);
        let mut terms: Vec<_> = monthly.iter().map(|p| p.scaled(1)).collect();
        terms.push(objective.scaled(-1));
        self.solver
            .add_constraint(constraints::equals(terms, 0, tag))
            .post()
            .map_err(conflict)?;
        self.ledger
            .record(ConstraintFamily::Objective, None, None, Vec::new(), 1);

        Ok((objective, scale))
    }

    fn finish(mut self) -> Result<ScheduleModel, ScheduleError> {
        self.post_water()?;
        self.post_land()?;
        self.post_off_season()?;
        self.post_cycles()?;
        let (objective, objective_scale) = self.post_objective()?;

        debug!(
            crops = self.problem.num_crops(),
            cells = self.cells.len(),
            area_upper_bound = self.area_ub,
            constraints = self.ledger.num_constraints(),
            "built schedule model"
        );

        Ok(ScheduleModel {
            solver: self.solver,
            num_crops: self.problem.num_crops(),
            cells: self.cells,
            objective,
            objective_scale,
            ledger: self.ledger,
        })
    }
}

impl ScheduleModel {
    /// Builds the constraint program for `problem`.
    ///
    /// # Errors
    ///
    /// - `ScheduleError::ValueOutOfRange` if a coefficient or bound does not
    ///   fit the engine's 32-bit domains.
    /// - `ScheduleError::InfeasibleModel` if posting already proves that no
    ///   schedule exists, as with a negative capacity.
    pub fn build(problem: &Problem) -> Result<Self, ScheduleError> {
        ModelBuilder::new(problem)?.finish()
    }

    /// Returns the structure of the model.
    #[inline]
    pub fn ledger(&self) -> &ModelLedger {
        &self.ledger
    }

    #[inline]
    pub fn num_crops(&self) -> usize {
        self.num_crops
    }

    /// Returns the number of (crop, month) cells.
    #[inline]
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// Returns the variables of `crop` in `month`.
    #[inline]
    pub fn cell(&self, crop: CropIndex, month: MonthIndex) -> CellVars {
        debug_assert!(
            crop.get() < self.num_crops,
            "called `ScheduleModel::cell` with crop index out of bounds: the len is {} but the index is {}",
            self.num_crops,
            crop.get()
        );

        self.cells[crop.get() * MONTHS_PER_YEAR + month.get()]
    }

    fn extract<S>(&self, solution: &S) -> Vec<Allocation>
    where
        S: ProblemSolution,
    {
        let mut cells = Vec::with_capacity(self.cells.len());
        for m in months() {
            for c in CropIndex::range(self.num_crops) {
                let vars = self.cell(c, m);
                cells.push(Allocation::new(
                    solution.get_literal_value(vars.sow),
                    solution.get_integer_value(vars.area) as i64,
                ));
            }
        }
        cells
    }

    /// Maximises total profit within `budget` and consumes the model.
    ///
    /// # Errors
    ///
    /// - `ScheduleError::InfeasibleModel` if the engine proves infeasibility.
    /// - `ScheduleError::SolveTimeLimit` if the budget expires before any
    ///   feasible assignment is found.
    pub fn optimise(mut self, budget: Duration) -> Result<Incumbent, ScheduleError> {
        let mut brancher = self.solver.default_brancher();
        let mut termination = TimeBudget::starting_now(budget);
        let objective = self.objective;
        let scale = self.objective_scale;

        let result = self.solver.optimise(
            &mut brancher,
            &mut termination,
            LinearSatUnsat::new(OptimisationDirection::Maximise, objective, noop_callback),
        );

        match result {
            OptimisationResult::Optimal(solution) => Ok(Incumbent {
                status: SolveStatus::Optimal,
                cells: self.extract(&solution),
                objective: solution.get_integer_value(objective) as i64 * scale,
            }),
            OptimisationResult::Satisfiable(solution) => Ok(Incumbent {
                status: SolveStatus::Feasible,
                cells: self.extract(&solution),
                objective: solution.get_integer_value(objective) as i64 * scale,
            }),
            OptimisationResult::Unsatisfiable => Err(ScheduleError::InfeasibleModel),
            OptimisationResult::Unknown => Err(ScheduleError::SolveTimeLimit { budget }),
        }
    }
}
