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

//! # Cyclic Index Arithmetic
//!
//! Positions on a closed loop of `period` slots, where stepping past the last
//! slot lands back on the first one. A planting calendar is the motivating
//! case: a crop sown in the eleventh month with a four month cycle occupies
//! months eleven, twelve, one and two.
//!
//! ## Highlights
//!
//! - `wrapping_forward` / `wrapping_backward`: move a position by an offset,
//!   rolling over the period boundary in either direction.
//! - `CyclicWindow<T>`: an exact-size iterator over `len` consecutive positions
//!   starting at a given slot, walking forward or backward.
//!
//! All functions assume `0 <= position < period` and `period > 0`. These
//! preconditions are checked with debug assertions only.
//!
//! ## Usage
//!
//! ```rust
//! use sowplan_core::math::cyclic::{wrapping_forward, CyclicWindow};
//!
//! assert_eq!(wrapping_forward(10usize, 3, 12), 1);
//! let window: Vec<usize> = CyclicWindow::forward(10usize, 4, 12).collect();
//! assert_eq!(window, vec![10, 11, 0, 1]);
//! ```

use num_traits::{PrimInt, Unsigned};

/// Moves `position` forward by `offset` slots on a loop of `period` slots.
///
/// # Examples
///
/// ```rust
/// # use sowplan_core::math::cyclic::wrapping_forward;
/// assert_eq!(wrapping_forward(11usize, 1, 12), 0);
/// assert_eq!(wrapping_forward(4usize, 24, 12), 4);
/// ```
#[inline]
pub fn wrapping_forward<T>(position: T, offset: T, period: T) -> T
where
    T: PrimInt + Unsigned,
{
    debug_assert!(
        period > T::zero(),
        "called `wrapping_forward` with a zero period"
    );
    debug_assert!(
        position < period,
        "called `wrapping_forward` with position outside of the period"
    );

    let step = offset % period;
    let headroom = period - position;
    if step < headroom {
        position + step
    } else {
        step - headroom
    }
}

/// Moves `position` backward by `offset` slots on a loop of `period` slots.
///
/// # Examples
///
/// ```rust
/// # use sowplan_core::math::cyclic::wrapping_backward;
/// assert_eq!(wrapping_backward(0usize, 1, 12), 11);
/// assert_eq!(wrapping_backward(5usize, 2, 12), 3);
/// ```
#[inline]
pub fn wrapping_backward<T>(position: T, offset: T, period: T) -> T
where
    T: PrimInt + Unsigned,
{
    debug_assert!(
        period > T::zero(),
        "called `wrapping_backward` with a zero period"
    );
    debug_assert!(
        position < period,
        "called `wrapping_backward` with position outside of the period"
    );

    let step = offset % period;
    if step <= position {
        position - step
    } else {
        period - (step - position)
    }
}

/// The walking direction of a `CyclicWindow`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WindowDirection {
    Forward,
    Backward,
}

/// Iterates over `len` consecutive positions of a cyclic period, starting at
/// (and including) `start`.
///
/// A `len` larger than the period revisits positions; callers that need each
/// slot at most once must keep `len <= period`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CyclicWindow<T> {
    period: T,
    next: T,
    remaining: usize,
    direction: WindowDirection,
}

impl<T> CyclicWindow<T>
where
    T: PrimInt + Unsigned,
{
    /// Creates a window walking forward from `start`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sowplan_core::math::cyclic::CyclicWindow;
    /// let w: Vec<u8> = CyclicWindow::forward(11u8, 3, 12).collect();
    /// assert_eq!(w, vec![11, 0, 1]);
    /// ```
    #[inline]
    pub fn forward(start: T, len: usize, period: T) -> Self {
        Self::new(start, len, period, WindowDirection::Forward)
    }

    /// Creates a window walking backward from `start`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sowplan_core::math::cyclic::CyclicWindow;
    /// let w: Vec<u8> = CyclicWindow::backward(1u8, 3, 12).collect();
    /// assert_eq!(w, vec![1, 0, 11]);
    /// ```
    #[inline]
    pub fn backward(start: T, len: usize, period: T) -> Self {
        Self::new(start, len, period, WindowDirection::Backward)
    }

    #[inline]
    fn new(start: T, len: usize, period: T, direction: WindowDirection) -> Self {
        debug_assert!(
            period > T::zero(),
            "called `CyclicWindow::new` with a zero period"
        );
        debug_assert!(
            start < period,
            "called `CyclicWindow::new` with start outside of the period"
        );

        Self {
            period,
            next: start,
            remaining: len,
            direction,
        }
    }

    /// Returns the direction this window walks in.
    #[inline]
    pub fn direction(&self) -> WindowDirection {
        self.direction
    }
}

impl<T> Iterator for CyclicWindow<T>
where
    T: PrimInt + Unsigned,
{
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let current = self.next;
        self.remaining -= 1;
        self.next = match self.direction {
            WindowDirection::Forward => wrapping_forward(current, T::one(), self.period),
            WindowDirection::Backward => wrapping_backward(current, T::one(), self.period),
        };
        Some(current)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for CyclicWindow<T> where T: PrimInt + Unsigned {}

impl<T> std::iter::FusedIterator for CyclicWindow<T> where T: PrimInt + Unsigned {}
