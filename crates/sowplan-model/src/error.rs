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

//! Configuration errors and warnings.
//!
//! Every `ConfigError` is raised by the input normalizer before any model is
//! built. `ConfigWarning`s never abort; they are logged and carried on the
//! normalized problem so callers can inspect them.

use std::sync::Arc;
use thiserror::Error;

/// A fatal problem with the supplied configuration.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// A per-month or per-crop sequence has the wrong number of entries.
    #[error("`{parameter}` must have {expected} values, got {actual}")]
    DimensionMismatch {
        parameter: &'static str,
        expected: usize,
        actual: usize,
    },
    /// An off-season entry references a crop that was not declared.
    #[error("off-season key `{key}` does not name one of the {crop_count} declared crops (use 1..={crop_count})")]
    UnknownCrop { key: String, crop_count: usize },
    /// An off-season entry lists a month outside `1..=12`.
    #[error("off-season month {month} for crop {crop} is not a calendar month (use 1..=12)")]
    InvalidMonth { crop: usize, month: u32 },
    /// A value is outside its admissible range.
    #[error("invalid `{parameter}`: {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
    /// The configuration document could not be parsed.
    #[error("could not parse schedule configuration: {0}")]
    Parse(#[source] Arc<serde_json::Error>),
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(Arc::new(e))
    }
}

/// A non-fatal remark about the supplied configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigWarning {
    /// A configuration key that the optimizer does not understand.
    #[error("option `{key}` is not recognized and was ignored")]
    UnrecognizedOption { key: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_names_parameter_and_length() {
        let e = ConfigError::DimensionMismatch {
            parameter: "cropCycle",
            expected: 4,
            actual: 3,
        };
        assert_eq!(e.to_string(), "`cropCycle` must have 4 values, got 3");
    }

    #[test]
    fn test_unknown_crop_message() {
        let e = ConfigError::UnknownCrop {
            key: "99".into(),
            crop_count: 4,
        };
        let msg = e.to_string();
        assert!(msg.contains("`99`"));
        assert!(msg.contains("1..=4"));
    }

    #[test]
    fn test_parse_error_from_serde_json() {
        let err = serde_json::from_str::<serde_json::Value>("{ not json").unwrap_err();
        let line = err.line();
        let e: ConfigError = err.into();
        assert!(matches!(&e, ConfigError::Parse(inner) if inner.line() == line));

        let source = std::error::Error::source(&e).expect("parse errors keep their source");
        assert!(source.downcast_ref::<Arc<serde_json::Error>>().is_some());
    }

    #[test]
    fn test_warning_message() {
        let w = ConfigWarning::UnrecognizedOption {
            key: "maxTime".into(),
        };
        assert_eq!(w.to_string(), "option `maxTime` is not recognized and was ignored");
    }
}
