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

//! Independent checking of a schedule against the problem it answers.
//!
//! The checks walk the plain result table and never touch the engine, so a
//! modelling mistake in the builder surfaces here as an `InvariantViolation`.

use sowplan_model::{
    calendar::{months, occupied_months, originating_months},
    index::{CropIndex, MonthIndex},
    problem::Problem,
    schedule::Schedule,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("schedule has {actual} crop columns, the problem declares {expected}")]
    ShapeMismatch { expected: usize, actual: usize },
    #[error("{crop} has negative area {area} in {month}")]
    NegativeArea {
        crop: CropIndex,
        month: MonthIndex,
        area: i64,
    },
    #[error("{month} uses {used} water, capacity is {capacity}")]
    WaterExceeded {
        month: MonthIndex,
        used: i128,
        capacity: i64,
    },
    #[error("{month} uses {used} land, capacity is {capacity}")]
    LandExceeded {
        month: MonthIndex,
        used: i128,
        capacity: i64,
    },
    #[error("{crop} sown in {sow_month} has area {actual} in {month}, expected {expected}")]
    CycleBroken {
        crop: CropIndex,
        sow_month: MonthIndex,
        month: MonthIndex,
        expected: i64,
        actual: i64,
    },
    #[error("{crop} is sown again in {month} while the planting from {sow_month} is growing")]
    OverlappingSow {
        crop: CropIndex,
        sow_month: MonthIndex,
        month: MonthIndex,
    },
    #[error("{crop} has area {area} in {month} without a sowing in its cycle window")]
    OrphanArea {
        crop: CropIndex,
        month: MonthIndex,
        area: i64,
    },
    #[error("{crop} is sown in {month} without committing any area")]
    EmptySow { crop: CropIndex, month: MonthIndex },
    #[error("{crop} has area {area} in off-season {month}")]
    OffSeasonArea {
        crop: CropIndex,
        month: MonthIndex,
        area: i64,
    },
    #[error("reported profit {reported} differs from the weighted area sum {expected}")]
    ProfitMismatch { expected: i128, reported: i64 },
}

/// Checks `schedule` against every constraint `problem` places on it.
///
/// Returns the first violation found. Capacities are checked month by month
/// before the per-crop rules, and the profit check comes last.
pub fn check_schedule(problem: &Problem, schedule: &Schedule) -> Result<(), InvariantViolation> {
    if schedule.num_crops() != problem.num_crops() {
        return Err(InvariantViolation::ShapeMismatch {
            expected: problem.num_crops(),
            actual: schedule.num_crops(),
        });
    }

    for m in months() {
        let mut water: i128 = 0;
        let mut land: i128 = 0;
        for c in problem.crop_indices() {
            let area = schedule.allocation(m, c).area;
            if area < 0 {
                return Err(InvariantViolation::NegativeArea {
                    crop: c,
                    month: m,
                    area,
                });
            }
            water += area as i128 * problem.crop(c).water_use() as i128;
            land += area as i128;
        }
        if water > problem.water_capacity(m) as i128 {
            return Err(InvariantViolation::WaterExceeded {
                month: m,
                used: water,
                capacity: problem.water_capacity(m),
            });
        }
        if land > problem.land_capacity() as i128 {
            return Err(InvariantViolation::LandExceeded {
                month: m,
                used: land,
                capacity: problem.land_capacity(),
            });
        }
    }

    for c in problem.crop_indices() {
        let crop = problem.crop(c);
        let cycle = crop.cycle_months();
        for m in months() {
            let cell = schedule.allocation(m, c);

            if cell.sown {
                if cell.area <= 0 {
                    return Err(InvariantViolation::EmptySow { crop: c, month: m });
                }
                for f in occupied_months(m, cycle).skip(1) {
                    let next = schedule.allocation(f, c);
                    if next.area != cell.area {
                        return Err(InvariantViolation::CycleBroken {
                            crop: c,
                            sow_month: m,
                            month: f,
                            expected: cell.area,
                            actual: next.area,
                        });
                    }
                    if next.sown {
                        return Err(InvariantViolation::OverlappingSow {
                            crop: c,
                            sow_month: m,
                            month: f,
                        });
                    }
                }
            }

            if cell.area > 0 {
                if crop.off_season().contains(m) {
                    return Err(InvariantViolation::OffSeasonArea {
                        crop: c,
                        month: m,
                        area: cell.area,
                    });
                }
                if !originating_months(m, cycle).any(|o| schedule.allocation(o, c).sown) {
                    return Err(InvariantViolation::OrphanArea {
                        crop: c,
                        month: m,
                        area: cell.area,
                    });
                }
            }
        }
    }

    let expected: i128 = problem
        .crop_indices()
        .map(|c| {
            let weight = problem.crop(c).profit_weight() as i128;
            schedule
                .crop_column(c)
                .map(|a| a.area as i128 * weight)
                .sum::<i128>()
        })
        .sum();
    if expected != schedule.total_profit() as i128 {
        return Err(InvariantViolation::ProfitMismatch {
            expected,
            reported: schedule.total_profit(),
        });
    }

    Ok(())
}
