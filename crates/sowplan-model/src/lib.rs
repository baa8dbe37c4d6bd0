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

//! # Sowplan Model
//!
//! **The domain model for the annual crop planting optimizer.**
//!
//! This crate turns loosely shaped user configuration into a validated,
//! fixed-length planting problem and defines the table a solved schedule is
//! reported in. It is the interchange layer between the caller and the
//! constraint model built by `sowplan_solver`.
//!
//! ## Architecture
//!
//! * **`index`**: Strongly typed `CropIndex` and `MonthIndex`.
//! * **`calendar`**: The twelve month cyclic calendar, month numbering, cycle
//!   windows that wrap over the year boundary, and the `MonthSet` bitset.
//! * **`config`**: `ScheduleConfig`, the raw (serde-loadable) configuration with
//!   scalar-or-list fields and a ready-to-solve default setup.
//! * **`problem`**: The input normalizer. `Problem::from_config` validates and
//!   broadcasts the configuration into per-month and per-crop arrays.
//! * **`schedule`**: The month-by-crop result table of `(sown, area)` pairs.
//! * **`error`**: Configuration errors and non-fatal warnings.
//!
//! ## Design Philosophy
//!
//! 1.  **Fail-Fast**: Every dimension and value is checked before a model is
//!     built, so the solver never sees a malformed problem.
//! 2.  **Typed Identity**: Crops are addressed by `CropIndex`, never by names
//!     assembled from strings. Display names live in a side table.
//! 3.  **Determinism**: Ordered containers only; iteration order never depends
//!     on hashing.

pub mod calendar;
pub mod config;
pub mod error;
pub mod index;
pub mod problem;
pub mod schedule;
