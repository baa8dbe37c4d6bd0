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
    calendar::{month_number, months, MONTHS_PER_YEAR},
    index::{CropIndex, MonthIndex},
    problem::Problem,
};
use serde::Serialize;

/// The solved state of one (crop, month) cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    /// Whether a new planting begins in this month.
    pub sown: bool,
    /// Area under cultivation in this month.
    pub area: i64,
}

impl Allocation {
    #[inline]
    pub const fn new(sown: bool, area: i64) -> Self {
        Self { sown, area }
    }

    #[inline]
    pub const fn idle() -> Self {
        Self::new(false, 0)
    }
}

impl std::fmt::Display for Allocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", u8::from(self.sown), self.area)
    }
}

/// One row of the long-format report: a single (crop, month) cell together
/// with the crop parameters that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub crop: String,
    /// Calendar month number, `1..=12`.
    pub month: u32,
    pub water_use: i64,
    pub profit: i64,
    pub cycle_months: usize,
    pub multi_year_lag: i64,
    pub sown: bool,
    pub area: i64,
}

/// A month-by-crop table of allocations plus the achieved total profit.
///
/// Rows are calendar months in order; columns follow the declared crop order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    crop_names: Vec<String>,
    cells: Vec<Allocation>,
    total_profit: i64,
}

impl Schedule {
    /// Creates a schedule from month-major cells.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `cells` does not hold exactly
    /// `12 * crop_names.len()` entries.
    pub fn new(crop_names: Vec<String>, cells: Vec<Allocation>, total_profit: i64) -> Self {
        debug_assert_eq!(
            cells.len(),
            MONTHS_PER_YEAR * crop_names.len(),
            "called `Schedule::new` with a cell count that does not match 12 months of {} crops",
            crop_names.len()
        );

        Self {
            crop_names,
            cells,
            total_profit,
        }
    }

    #[inline]
    fn flat_index(&self, month: MonthIndex, crop: CropIndex) -> usize {
        month.get() * self.num_crops() + crop.get()
    }

    /// Returns the number of crop columns.
    #[inline]
    pub fn num_crops(&self) -> usize {
        self.crop_names.len()
    }

    /// Returns the column names in declaration order.
    #[inline]
    pub fn crop_names(&self) -> &[String] {
        &self.crop_names
    }

    /// Returns the allocation of `crop` in `month`.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `crop` is out of bounds.
    #[inline]
    pub fn allocation(&self, month: MonthIndex, crop: CropIndex) -> Allocation {
        debug_assert!(
            crop.get() < self.num_crops(),
            "called `Schedule::allocation` with crop index out of bounds: the len is {} but the index is {}",
            self.num_crops(),
            crop.get()
        );

        self.cells[self.flat_index(month, crop)]
    }

    /// Returns every crop's allocation in `month`, in column order.
    #[inline]
    pub fn month_row(&self, month: MonthIndex) -> &[Allocation] {
        let start = month.get() * self.num_crops();
        &self.cells[start..start + self.num_crops()]
    }

    /// Iterates over the twelve monthly allocations of `crop`.
    #[inline]
    pub fn crop_column(&self, crop: CropIndex) -> impl Iterator<Item = Allocation> + '_ {
        months().map(move |m| self.allocation(m, crop))
    }

    /// Returns the area under cultivation in `month`, summed over crops.
    #[inline]
    pub fn land_in_use(&self, month: MonthIndex) -> i64 {
        self.month_row(month).iter().map(|a| a.area).sum()
    }

    /// Returns the achieved objective value.
    #[inline]
    pub fn total_profit(&self) -> i64 {
        self.total_profit
    }

    /// Returns the achieved objective value in millions.
    #[inline]
    pub fn profit_millions(&self) -> f64 {
        self.total_profit as f64 / 1_000_000.0
    }

    /// Flattens the table into one entry per (crop, month), crop-major.
    ///
    /// `problem` must be the problem this schedule was solved from.
    pub fn entries(&self, problem: &Problem) -> Vec<ScheduleEntry> {
        debug_assert_eq!(
            problem.num_crops(),
            self.num_crops(),
            "called `Schedule::entries` with a problem of a different crop count"
        );

        problem
            .crop_indices()
            .flat_map(|c| {
                let crop = problem.crop(c);
                months().map(move |m| {
                    let cell = self.allocation(m, c);
                    ScheduleEntry {
                        crop: crop.name().to_string(),
                        month: month_number(m),
                        water_use: crop.water_use(),
                        profit: crop.profit(),
                        cycle_months: crop.cycle_months(),
                        multi_year_lag: crop.multi_year_lag(),
                        sown: cell.sown,
                        area: cell.area,
                    }
                })
            })
            .collect()
    }
}

impl std::fmt::Display for Schedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const MONTH_HEADER: &str = "Month";

        let widths: Vec<usize> = CropIndex::range(self.num_crops())
            .map(|c| {
                self.crop_column(c)
                    .map(|a| a.to_string().len())
                    .chain(std::iter::once(self.crop_names[c.get()].len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{}", MONTH_HEADER)?;
        for (name, width) in self.crop_names.iter().zip(&widths) {
            write!(f, " | {:>width$}", name, width = *width)?;
        }
        writeln!(f)?;

        for m in months() {
            write!(f, "{:>width$}", month_number(m), width = MONTH_HEADER.len())?;
            for (cell, width) in self.month_row(m).iter().zip(&widths) {
                write!(f, " | {:>width$}", cell.to_string(), width = *width)?;
            }
            writeln!(f)?;
        }

        writeln!(
            f,
            "Total Profit: {} ({:.3} million)",
            self.total_profit,
            self.profit_millions()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScheduleConfig;

    fn single_crop_schedule(area: i64) -> Schedule {
        let cells = vec![Allocation::new(true, area); MONTHS_PER_YEAR];
        Schedule::new(vec!["c1".into()], cells, area * 1000 * 12)
    }

    #[test]
    fn test_allocation_lookup_is_month_major() {
        let mut cells = vec![Allocation::idle(); MONTHS_PER_YEAR * 2];
        // month 3, crop 2
        cells[2 * 2 + 1] = Allocation::new(true, 5);
        let schedule = Schedule::new(vec!["a".into(), "b".into()], cells, 0);

        assert_eq!(
            schedule.allocation(MonthIndex::new(2), CropIndex::new(1)),
            Allocation::new(true, 5)
        );
        assert_eq!(
            schedule.allocation(MonthIndex::new(2), CropIndex::new(0)),
            Allocation::idle()
        );
        assert_eq!(schedule.month_row(MonthIndex::new(2)).len(), 2);
        assert_eq!(schedule.land_in_use(MonthIndex::new(2)), 5);
        assert_eq!(
            schedule
                .crop_column(CropIndex::new(1))
                .filter(|a| a.sown)
                .count(),
            1
        );
    }

    #[test]
    fn test_profit_millions() {
        let schedule = single_crop_schedule(10);
        assert_eq!(schedule.total_profit(), 120_000);
        assert!((schedule.profit_millions() - 0.12).abs() < 1e-12);
    }

    #[test]
    fn test_display_renders_month_rows_and_total() {
        let rendered = format!("{}", single_crop_schedule(10));
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 14);
        assert_eq!(lines[0], "Month |      c1");
        assert_eq!(lines[1], "    1 | (1, 10)");
        assert_eq!(lines[12], "   12 | (1, 10)");
        assert_eq!(lines[13], "Total Profit: 120000 (0.120 million)");
    }

    #[test]
    fn test_display_pads_to_longest_name() {
        let cells = vec![Allocation::idle(); MONTHS_PER_YEAR];
        let schedule = Schedule::new(vec!["sorghum".into()], cells, 0);
        let rendered = format!("{}", schedule);
        assert!(rendered.starts_with("Month | sorghum\n    1 |  (0, 0)\n"));
    }

    #[test]
    fn test_entries_are_crop_major_with_parameters() {
        let config = ScheduleConfig::new()
            .with_crop_count(2)
            .with_crop_cycle(vec![1, 2])
            .with_water_use(vec![0, 5])
            .with_crop_profit(vec![100, 200])
            .with_crop_names(["millet", "teff"]);
        let problem = Problem::from_config(&config).unwrap();

        let mut cells = vec![Allocation::idle(); MONTHS_PER_YEAR * 2];
        cells[0] = Allocation::new(true, 3);
        let names = problem.crop_names().iter().map(|s| s.to_string()).collect();
        let schedule = Schedule::new(names, cells, 300);

        let entries = schedule.entries(&problem);
        assert_eq!(entries.len(), 24);
        assert_eq!(entries[0].crop, "millet");
        assert_eq!(entries[0].month, 1);
        assert!(entries[0].sown);
        assert_eq!(entries[0].area, 3);
        assert_eq!(entries[11].month, 12);
        assert_eq!(entries[12].crop, "teff");
        assert_eq!(entries[12].water_use, 5);
        assert_eq!(entries[12].cycle_months, 2);
        assert_eq!(entries[12].profit, 200);
        assert!(!entries[12].sown);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(single_crop_schedule(1)).unwrap();
        assert_eq!(json["totalProfit"], 12_000);
        assert_eq!(json["cropNames"][0], "c1");
        assert_eq!(json["cells"][0]["sown"], true);
    }

    #[test]
    #[should_panic(expected = "called `Schedule::new` with a cell count")]
    fn test_new_rejects_wrong_cell_count() {
        let _ = Schedule::new(vec!["c1".into()], vec![Allocation::idle(); 3], 0);
    }
}
