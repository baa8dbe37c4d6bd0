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

//! Errors raised while building or solving a schedule.

use sowplan_model::error::ConfigError;
use std::time::Duration;
use thiserror::Error;

/// A fatal failure of one optimizer run.
///
/// No partial schedule accompanies any of these.
#[derive(Debug, Clone, Error)]
pub enum ScheduleError {
    /// The configuration was rejected before a model was built.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The solver proved that no assignment satisfies every constraint.
    #[error("no schedule satisfies the water, land and cycle constraints")]
    InfeasibleModel,
    /// The budget expired before any feasible schedule was found.
    #[error("no feasible schedule was found within the solve budget of {budget:?}")]
    SolveTimeLimit { budget: Duration },
    /// A coefficient or bound does not fit the solver's 32-bit domains.
    #[error("{what} is {value}, which does not fit the solver's 32-bit integer domains")]
    ValueOutOfRange { what: &'static str, value: i128 },
}

/// A machine-distinguishable error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    DimensionMismatch,
    UnknownCrop,
    InvalidMonth,
    InvalidValue,
    Parse,
    InfeasibleModel,
    SolveTimeLimit,
    ValueOutOfRange,
}

impl ScheduleError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScheduleError::Config(e) => match e {
                ConfigError::DimensionMismatch { .. } => ErrorKind::DimensionMismatch,
                ConfigError::UnknownCrop { .. } => ErrorKind::UnknownCrop,
                ConfigError::InvalidMonth { .. } => ErrorKind::InvalidMonth,
                ConfigError::InvalidValue { .. } => ErrorKind::InvalidValue,
                ConfigError::Parse(_) => ErrorKind::Parse,
            },
            ScheduleError::InfeasibleModel => ErrorKind::InfeasibleModel,
            ScheduleError::SolveTimeLimit { .. } => ErrorKind::SolveTimeLimit,
            ScheduleError::ValueOutOfRange { .. } => ErrorKind::ValueOutOfRange,
        }
    }

    /// Returns `true` if the error was raised before any model was built.
    #[inline]
    pub fn is_config(&self) -> bool {
        matches!(self, ScheduleError::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_keep_their_kind() {
        let err: ScheduleError = ConfigError::UnknownCrop {
            key: "99".into(),
            crop_count: 4,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::UnknownCrop);
        assert!(err.is_config());
        assert_eq!(
            err.to_string(),
            "off-season key `99` does not name one of the 4 declared crops (use 1..=4)"
        );
    }

    #[test]
    fn test_solver_errors_are_not_config_errors() {
        let err = ScheduleError::SolveTimeLimit {
            budget: Duration::from_secs(1),
        };
        assert_eq!(err.kind(), ErrorKind::SolveTimeLimit);
        assert!(!err.is_config());
        assert!(!ScheduleError::InfeasibleModel.is_config());
    }

    #[test]
    fn test_value_out_of_range_message() {
        let err = ScheduleError::ValueOutOfRange {
            what: "profit weight",
            value: 3_000_000_000,
        };
        assert_eq!(err.kind(), ErrorKind::ValueOutOfRange);
        assert!(err.to_string().starts_with("profit weight is 3000000000"));
    }
}
