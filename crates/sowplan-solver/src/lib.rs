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

//! # Sowplan Solver
//!
//! Builds and solves the crop planting model. A validated `Problem` is turned
//! into a constraint program over `pumpkin-solver`, optimised within a wall
//! clock budget, and read back into a `Schedule`.
//!
//! ## Modules
//!
//! - `builder`: The model builder. Area variables and sow literals per
//!   (crop, month) cell, the constraint families, and the `ModelLedger`.
//! - `solver`: `CropScheduler`, the pipeline from configuration to outcome.
//! - `result`: `ScheduleOutcome`, `SolveStatus` and `TerminationReason`.
//! - `stats`: Model size and timing of one run.
//! - `monitor`: Lifecycle hooks, with no-op, logging and composite monitors.
//! - `verify`: Checks a schedule against the problem without the engine.
//! - `error`: `ScheduleError` and its `ErrorKind`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sowplan_model::config::ScheduleConfig;
//! use sowplan_solver::solver::CropScheduler;
//!
//! let config = ScheduleConfig::default().with_off_season(2u32, [2, 3]);
//! let outcome = CropScheduler::new().solve_config(&config)?;
//! println!("{}", outcome.schedule());
//! # Ok::<(), sowplan_solver::error::ScheduleError>(())
//! ```

pub mod builder;
pub mod error;
pub mod monitor;
pub mod result;
pub mod solver;
pub mod stats;
pub mod verify;
