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

//! The cyclic planting calendar.
//!
//! The year has `MONTHS_PER_YEAR` positions and wraps around: the month after
//! the twelfth is the first. Month indices are zero-based (`MonthIndex`),
//! month numbers are the human-facing `1..=12`.
//!
//! Cycle windows express a crop's occupancy of the calendar. A crop sown in
//! month `m` with cycle length `c` occupies `m, m + 1, ..., m + c - 1` taken
//! modulo the year, and a month `m` can only carry area if a sowing happened
//! somewhere in `m, m - 1, ..., m - c + 1`.

use crate::index::MonthIndex;
use sowplan_core::math::cyclic::CyclicWindow;

/// Number of months in the planting calendar.
pub const MONTHS_PER_YEAR: usize = 12;

/// Iterates over every month of the calendar in order.
#[inline]
pub fn months() -> impl DoubleEndedIterator<Item = MonthIndex> + ExactSizeIterator {
    MonthIndex::range(MONTHS_PER_YEAR)
}

/// Returns the human-facing number (`1..=12`) of a month.
///
/// # Examples
///
/// ```rust
/// # use sowplan_model::{calendar::month_number, index::MonthIndex};
/// assert_eq!(month_number(MonthIndex::new(0)), 1);
/// assert_eq!(month_number(MonthIndex::new(11)), 12);
/// ```
#[inline]
pub fn month_number(month: MonthIndex) -> u32 {
    debug_assert!(
        month.get() < MONTHS_PER_YEAR,
        "called `month_number` with month index out of bounds: the len is {} but the index is {}",
        MONTHS_PER_YEAR,
        month.get()
    );

    month.get() as u32 + 1
}

/// Converts a human-facing month number (`1..=12`) into a `MonthIndex`.
///
/// Returns `None` for numbers outside the calendar.
///
/// # Examples
///
/// ```rust
/// # use sowplan_model::calendar::month_from_number;
/// assert_eq!(month_from_number(1).map(|m| m.get()), Some(0));
/// assert!(month_from_number(0).is_none());
/// assert!(month_from_number(13).is_none());
/// ```
#[inline]
pub fn month_from_number(number: u32) -> Option<MonthIndex> {
    if (1..=MONTHS_PER_YEAR as u32).contains(&number) {
        Some(MonthIndex::new(number as usize - 1))
    } else {
        None
    }
}

/// Months occupied by a sowing in `sow_month` lasting `cycle_months`,
/// starting with the sowing month itself.
///
/// # Examples
///
/// ```rust
/// # use sowplan_model::{calendar::occupied_months, index::MonthIndex};
/// let months: Vec<usize> = occupied_months(MonthIndex::new(10), 4).map(|m| m.get()).collect();
/// assert_eq!(months, vec![10, 11, 0, 1]);
/// ```
#[inline]
pub fn occupied_months(
    sow_month: MonthIndex,
    cycle_months: usize,
) -> impl ExactSizeIterator<Item = MonthIndex> {
    CyclicWindow::forward(sow_month.get(), cycle_months, MONTHS_PER_YEAR).map(MonthIndex::new)
}

/// Months whose sowing would still occupy `month` for a crop lasting
/// `cycle_months`, starting with `month` itself and walking backward.
///
/// # Examples
///
/// ```rust
/// # use sowplan_model::{calendar::originating_months, index::MonthIndex};
/// let months: Vec<usize> = originating_months(MonthIndex::new(1), 3).map(|m| m.get()).collect();
/// assert_eq!(months, vec![1, 0, 11]);
/// ```
#[inline]
pub fn originating_months(
    month: MonthIndex,
    cycle_months: usize,
) -> impl ExactSizeIterator<Item = MonthIndex> {
    CyclicWindow::backward(month.get(), cycle_months, MONTHS_PER_YEAR).map(MonthIndex::new)
}

/// A set of calendar months, stored as a twelve bit mask.
#[repr(transparent)]
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthSet {
    bits: u16,
}

impl MonthSet {
    const FULL_MASK: u16 = (1 << MONTHS_PER_YEAR) - 1;

    /// Creates an empty set.
    #[inline]
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Creates the set holding every month of the year.
    #[inline]
    pub const fn full() -> Self {
        Self {
            bits: Self::FULL_MASK,
        }
    }

    /// Adds a month to the set. Returns `true` if it was not present yet.
    #[inline]
    pub fn insert(&mut self, month: MonthIndex) -> bool {
        debug_assert!(
            month.get() < MONTHS_PER_YEAR,
            "called `MonthSet::insert` with month index out of bounds: the len is {} but the index is {}",
            MONTHS_PER_YEAR,
            month.get()
        );

        let bit = 1u16 << month.get();
        let fresh = self.bits & bit == 0;
        self.bits |= bit;
        fresh
    }

    /// Checks if a month is in the set.
    #[inline]
    pub fn contains(&self, month: MonthIndex) -> bool {
        month.get() < MONTHS_PER_YEAR && self.bits & (1u16 << month.get()) != 0
    }

    /// Returns the number of months in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Checks if the set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Iterates over the months in the set in calendar order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = MonthIndex> + '_ {
        months().filter(move |m| self.contains(*m))
    }
}

impl FromIterator<MonthIndex> for MonthSet {
    fn from_iter<I: IntoIterator<Item = MonthIndex>>(iter: I) -> Self {
        let mut set = MonthSet::empty();
        for month in iter {
            set.insert(month);
        }
        set
    }
}

impl std::fmt::Debug for MonthSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set()
            .entries(self.iter().map(month_number))
            .finish()
    }
}

impl std::fmt::Display for MonthSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for month in self.iter() {
            if !first {
                write!(f, ",")?;
            }
            write!(f, "{}", month_number(month))?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mi(i: usize) -> MonthIndex {
        MonthIndex::new(i)
    }

    #[test]
    fn test_months_covers_the_year() {
        let all: Vec<usize> = months().map(|m| m.get()).collect();
        assert_eq!(all, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn test_month_number_round_trip_on_bounds() {
        assert_eq!(month_number(mi(0)), 1);
        assert_eq!(month_number(mi(11)), 12);
        assert_eq!(month_from_number(12), Some(mi(11)));
        assert_eq!(month_from_number(0), None);
        assert_eq!(month_from_number(13), None);
    }

    #[test]
    fn test_november_sowing_reserves_into_february() {
        let occupied: Vec<u32> = occupied_months(mi(10), 4).map(month_number).collect();
        assert_eq!(occupied, vec![11, 12, 1, 2]);
    }

    #[test]
    fn test_december_sowing_with_three_month_cycle_wraps() {
        let occupied: Vec<u32> = occupied_months(mi(11), 3).map(month_number).collect();
        assert_eq!(occupied, vec![12, 1, 2]);
    }

    #[test]
    fn test_originating_months_wrap_backward() {
        let origins: Vec<u32> = originating_months(mi(0), 3).map(month_number).collect();
        assert_eq!(origins, vec![1, 12, 11]);
    }

    #[test]
    fn test_single_month_cycle_is_only_the_month_itself() {
        assert_eq!(occupied_months(mi(5), 1).count(), 1);
        assert_eq!(originating_months(mi(5), 1).next(), Some(mi(5)));
    }

    #[test]
    fn test_month_set_insert_contains_iter() {
        let mut set = MonthSet::empty();
        assert!(set.is_empty());
        assert!(set.insert(mi(2)));
        assert!(set.insert(mi(0)));
        assert!(!set.insert(mi(2)));
        assert_eq!(set.len(), 2);
        assert!(set.contains(mi(0)));
        assert!(!set.contains(mi(1)));
        assert!(!set.contains(mi(40)));
        let members: Vec<usize> = set.iter().map(|m| m.get()).collect();
        assert_eq!(members, vec![0, 2]);
    }

    #[test]
    fn test_month_set_full_and_from_iter() {
        assert_eq!(MonthSet::full().len(), 12);
        let set: MonthSet = [mi(11), mi(3), mi(3)].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_month_set_display_uses_month_numbers() {
        let set: MonthSet = [mi(1), mi(2)].into_iter().collect();
        assert_eq!(format!("{}", set), "2,3");
        assert_eq!(format!("{:?}", set), "{2, 3}");
        assert_eq!(format!("{}", MonthSet::empty()), "");
    }
}
