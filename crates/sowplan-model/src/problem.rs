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

//! The input normalizer.
//!
//! `Problem::from_config` validates a `ScheduleConfig` and broadcasts it into
//! fixed-length structures: twelve monthly water capacities, one `Crop` record
//! per declared crop, and a typed off-season set per crop. Validation runs in
//! a fixed order and stops at the first fatal error, so no partially
//! normalized problem ever escapes. Unknown configuration keys only produce
//! warnings.
//!
//! The normalized problem also fixes each crop's effective profit weight,
//! `profit * (total_years - lag)` floor-divided by the cycle length. Short
//! cycles are harvested more often within the year, and crops that only yield
//! after several years earn a proportionally smaller share.

use crate::{
    calendar::{month_from_number, MonthSet, MONTHS_PER_YEAR},
    config::{CropRef, ScheduleConfig, WaterAvailability},
    error::{ConfigError, ConfigWarning},
    index::{CropIndex, MonthIndex},
};
use std::{collections::BTreeMap, time::Duration};
use tracing::{info, warn};

/// A single validated crop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crop {
    name: String,
    cycle_months: usize,
    water_use: i64,
    profit: i64,
    multi_year_lag: i64,
    profit_weight: i64,
    off_season: MonthSet,
}

impl Crop {
    /// Returns the display name of the crop.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of months from sowing to harvest (`1..=12`).
    #[inline]
    pub fn cycle_months(&self) -> usize {
        self.cycle_months
    }

    /// Returns the water used per unit of area per month.
    #[inline]
    pub fn water_use(&self) -> i64 {
        self.water_use
    }

    /// Returns the profit per unit of area per harvest.
    #[inline]
    pub fn profit(&self) -> i64 {
        self.profit
    }

    /// Returns the whole years between sowing and first harvest.
    #[inline]
    pub fn multi_year_lag(&self) -> i64 {
        self.multi_year_lag
    }

    /// Returns the objective weight of one unit of area in one month.
    #[inline]
    pub fn profit_weight(&self) -> i64 {
        self.profit_weight
    }

    /// Returns the months in which this crop may not be planted.
    #[inline]
    pub fn off_season(&self) -> MonthSet {
        self.off_season
    }
}

/// The validated, immutable planting problem.
///
/// Construction:
/// - Use `Problem::from_config` to obtain a validated `Problem`.
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    water_capacity: [i64; MONTHS_PER_YEAR],
    land_capacity: i64,
    crops: Vec<Crop>,
    total_years: i64,
    time_budget: Duration,
    warnings: Vec<ConfigWarning>,
}

/// Keys a configuration document may carry.
pub const RECOGNIZED_OPTIONS: [&str; 11] = [
    "waterAvailable",
    "landAvailable",
    "cropCount",
    "cropCycle",
    "waterUse",
    "cropProfit",
    "cropNames",
    "cropOffSeason",
    "totalYears",
    "multiYearLag",
    "maxSolveSeconds",
];

fn check_per_crop<T>(
    values: &[T],
    parameter: &'static str,
    crop_count: usize,
) -> Result<(), ConfigError> {
    if values.len() != crop_count {
        return Err(ConfigError::DimensionMismatch {
            parameter,
            expected: crop_count,
            actual: values.len(),
        });
    }
    Ok(())
}

fn invalid(parameter: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        parameter,
        reason: reason.into(),
    }
}

fn normalize_water(water: &WaterAvailability) -> Result<[i64; MONTHS_PER_YEAR], ConfigError> {
    match water {
        WaterAvailability::Uniform(value) => Ok([*value; MONTHS_PER_YEAR]),
        WaterAvailability::Monthly(values) if values.len() == 1 => {
            Ok([values[0]; MONTHS_PER_YEAR])
        }
        WaterAvailability::Monthly(values) => {
            values
                .as_slice()
                .try_into()
                .map_err(|_| ConfigError::DimensionMismatch {
                    parameter: "waterAvailable",
                    expected: MONTHS_PER_YEAR,
                    actual: values.len(),
                })
        }
    }
}

fn resolve_crop(key: &CropRef, crop_count: usize) -> Result<CropIndex, ConfigError> {
    let unknown = || ConfigError::UnknownCrop {
        key: key.to_string(),
        crop_count,
    };
    match key {
        CropRef::Id(id) if *id >= 1 && *id <= crop_count as u64 => {
            Ok(CropIndex::new(*id as usize - 1))
        }
        _ => Err(unknown()),
    }
}

fn normalize_off_season(
    raw: &BTreeMap<CropRef, Vec<u32>>,
    crop_count: usize,
) -> Result<Vec<MonthSet>, ConfigError> {
    let mut sets = vec![MonthSet::empty(); crop_count];
    for (key, months) in raw {
        let crop = resolve_crop(key, crop_count)?;
        for &number in months {
            let month: MonthIndex =
                month_from_number(number).ok_or(ConfigError::InvalidMonth {
                    crop: crop.get() + 1,
                    month: number,
                })?;
            sets[crop.get()].insert(month);
        }
    }
    Ok(sets)
}

fn profit_weight(profit: i64, total_years: i64, lag: i64, cycle_months: usize) -> Option<i64> {
    let yielding_years = total_years.checked_sub(lag)?;
    let scaled = profit.checked_mul(yielding_years)?;
    Some(scaled.div_euclid(cycle_months as i64))
}

impl Problem {
    /// Validates and broadcasts a raw configuration.
    ///
    /// Checks run in this order: water availability, crop count, then the
    /// lengths of names, cycles, water use and profit. Unrecognized options
    /// are logged next, followed by the off-season map, horizon, multi-year
    /// lag lengths and the time budget. Per-crop values are checked last, in
    /// crop order.
    ///
    /// # Errors
    ///
    /// - `ConfigError::DimensionMismatch` if a monthly list does not have 12
    ///   (or 1) entries, or a per-crop list does not have `crop_count` entries.
    /// - `ConfigError::UnknownCrop` if an off-season key names no declared crop.
    /// - `ConfigError::InvalidMonth` if an off-season month is outside `1..=12`.
    /// - `ConfigError::InvalidValue` for out-of-range scalars.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sowplan_model::{config::ScheduleConfig, problem::Problem};
    /// let problem = Problem::from_config(&ScheduleConfig::default()).unwrap();
    /// assert_eq!(problem.num_crops(), 4);
    /// assert_eq!(problem.crop_names(), vec!["c1", "c2", "c3", "c4"]);
    /// ```
    pub fn from_config(config: &ScheduleConfig) -> Result<Self, ConfigError> {
        let water_capacity = normalize_water(&config.water_available)?;

        let crop_count = config.crop_count;
        if crop_count == 0 {
            return Err(invalid("cropCount", "at least one crop must be declared"));
        }

        let names: Vec<String> = match &config.crop_names {
            Some(names) => {
                check_per_crop(names, "cropNames", crop_count)?;
                names.clone()
            }
            None => (1..=crop_count).map(|i| format!("c{}", i)).collect(),
        };

        check_per_crop(&config.crop_cycle, "cropCycle", crop_count)?;
        check_per_crop(&config.water_use, "waterUse", crop_count)?;
        check_per_crop(&config.crop_profit, "cropProfit", crop_count)?;

        let mut warnings = Vec::new();
        for key in config.unrecognized.keys() {
            warn!(
                option = %key,
                "option is not recognized; recognized options are {:?}",
                RECOGNIZED_OPTIONS
            );
            warnings.push(ConfigWarning::UnrecognizedOption { key: key.clone() });
        }

        let off_season = normalize_off_season(&config.crop_off_season, crop_count)?;

        let total_years = config.total_years;
        if total_years < 1 {
            return Err(invalid(
                "totalYears",
                format!("must be at least 1, got {}", total_years),
            ));
        }

        let lags: Vec<i64> = match &config.multi_year_lag {
            Some(lags) => {
                check_per_crop(lags, "multiYearLag", crop_count)?;
                lags.clone()
            }
            None => vec![0; crop_count],
        };

        let seconds = config.max_solve_seconds;
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(invalid(
                "maxSolveSeconds",
                format!("must be a finite, non-negative number of seconds, got {}", seconds),
            ));
        }
        let time_budget = Duration::try_from_secs_f64(seconds).map_err(|_| {
            invalid(
                "maxSolveSeconds",
                format!("{} seconds exceeds the largest representable budget", seconds),
            )
        })?;

        for (month, &capacity) in water_capacity.iter().enumerate() {
            if capacity < 0 {
                warn!(
                    month = month + 1,
                    capacity, "negative water capacity makes every schedule infeasible"
                );
            }
        }
        if config.land_available < 0 {
            warn!(
                land = config.land_available,
                "negative land capacity makes every schedule infeasible"
            );
        }

        let mut crops = Vec::with_capacity(crop_count);
        for i in 0..crop_count {
            let cycle = config.crop_cycle[i];
            if !(1..=MONTHS_PER_YEAR as u32).contains(&cycle) {
                return Err(invalid(
                    "cropCycle",
                    format!(
                        "crop {} has a cycle of {} months; cycles must be within 1..={}",
                        i + 1,
                        cycle,
                        MONTHS_PER_YEAR
                    ),
                ));
            }
            let cycle_months = cycle as usize;

            let water_use = config.water_use[i];
            if water_use < 0 {
                return Err(invalid(
                    "waterUse",
                    format!("crop {} has negative water use {}", i + 1, water_use),
                ));
            }

            let lag = lags[i];
            if lag < 0 {
                return Err(invalid(
                    "multiYearLag",
                    format!("crop {} has a negative lag of {} years", i + 1, lag),
                ));
            }

            let profit = config.crop_profit[i];
            let weight = profit_weight(profit, total_years, lag, cycle_months).ok_or_else(|| {
                invalid(
                    "cropProfit",
                    format!("profit weight of crop {} overflows", i + 1),
                )
            })?;

            if !off_season[i].is_empty() {
                info!(
                    crop = %names[i],
                    months = %off_season[i],
                    "crop will not be grown in the listed months"
                );
            }

            crops.push(Crop {
                name: names[i].clone(),
                cycle_months,
                water_use,
                profit,
                multi_year_lag: lag,
                profit_weight: weight,
                off_season: off_season[i],
            });
        }

        Ok(Self {
            water_capacity,
            land_capacity: config.land_available,
            crops,
            total_years,
            time_budget,
            warnings,
        })
    }

    /// Returns the number of crops in the problem.
    #[inline]
    pub fn num_crops(&self) -> usize {
        self.crops.len()
    }

    /// Iterates over every crop index in declaration order.
    #[inline]
    pub fn crop_indices(&self) -> impl DoubleEndedIterator<Item = CropIndex> + ExactSizeIterator {
        CropIndex::range(self.num_crops())
    }

    /// Returns all crops in declaration order.
    #[inline]
    pub fn crops(&self) -> &[Crop] {
        &self.crops
    }

    /// Returns the crop at `crop_index`.
    ///
    /// # Panics
    ///
    /// Panics if `crop_index` is not in `0..num_crops()`.
    #[inline]
    pub fn crop(&self, crop_index: CropIndex) -> &Crop {
        let index = crop_index.get();
        debug_assert!(
            index < self.num_crops(),
            "called `Problem::crop` with crop index out of bounds: the len is {} but the index is {}",
            self.num_crops(),
            index
        );

        &self.crops[index]
    }

    /// Returns the off-season months of every crop that has any.
    pub fn off_season_map(&self) -> BTreeMap<CropIndex, MonthSet> {
        self.crop_indices()
            .map(|c| (c, self.crop(c).off_season()))
            .filter(|(_, months)| !months.is_empty())
            .collect()
    }

    /// Returns the crop display names in declaration order.
    #[inline]
    pub fn crop_names(&self) -> Vec<&str> {
        self.crops.iter().map(Crop::name).collect()
    }

    /// Returns the water capacity of every month.
    #[inline]
    pub fn water_capacities(&self) -> &[i64; MONTHS_PER_YEAR] {
        &self.water_capacity
    }

    /// Returns the water capacity of `month`.
    #[inline]
    pub fn water_capacity(&self, month: MonthIndex) -> i64 {
        self.water_capacity[month.get()]
    }

    /// Returns the land capacity shared by all crops in every month.
    #[inline]
    pub fn land_capacity(&self) -> i64 {
        self.land_capacity
    }

    /// Returns the number of years the schedule represents.
    #[inline]
    pub fn total_years(&self) -> i64 {
        self.total_years
    }

    /// Returns the wall-clock budget for the solver.
    #[inline]
    pub fn time_budget(&self) -> Duration {
        self.time_budget
    }

    /// Returns the non-fatal warnings raised during normalization.
    #[inline]
    pub fn warnings(&self) -> &[ConfigWarning] {
        &self.warnings
    }
}
