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

use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveStatistics {
    /// Number of planted-area variables in the model.
    pub area_variables: usize,
    /// Number of sow literals in the model.
    pub sow_literals: usize,
    /// Number of constraints posted to the solver.
    pub constraints: usize,
    /// Time spent building the model.
    pub build_duration: Duration,
    /// Time spent searching.
    pub solve_duration: Duration,
}

impl std::fmt::Display for SolveStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solve Statistics:")?;
        writeln!(f, "  Area Variables: {}", self.area_variables)?;
        writeln!(f, "  Sow Literals: {}", self.sow_literals)?;
        writeln!(f, "  Constraints: {}", self.constraints)?;
        writeln!(
            f,
            "  Build Duration (secs): {:.3}",
            self.build_duration.as_secs_f64()
        )?;
        writeln!(
            f,
            "  Solve Duration (secs): {:.3}",
            self.solve_duration.as_secs_f64()
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolveStatisticsBuilder {
    area_variables: usize,
    sow_literals: usize,
    constraints: usize,
    build_duration: Duration,
    solve_duration: Duration,
}

impl SolveStatisticsBuilder {
    /// Creates a new `SolveStatisticsBuilder` with zeroed values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn area_variables(mut self, area_variables: usize) -> Self {
        self.area_variables = area_variables;
        self
    }

    #[inline]
    pub fn sow_literals(mut self, sow_literals: usize) -> Self {
        self.sow_literals = sow_literals;
        self
    }

    #[inline]
    pub fn constraints(mut self, constraints: usize) -> Self {
        self.constraints = constraints;
        self
    }

    #[inline]
    pub fn build_duration(mut self, build_duration: Duration) -> Self {
        self.build_duration = build_duration;
        self
    }

    #[inline]
    pub fn solve_duration(mut self, solve_duration: Duration) -> Self {
        self.solve_duration = solve_duration;
        self
    }

    /// Builds the `SolveStatistics` instance.
    #[inline]
    pub fn build(self) -> SolveStatistics {
        SolveStatistics {
            area_variables: self.area_variables,
            sow_literals: self.sow_literals,
            constraints: self.constraints,
            build_duration: self.build_duration,
            solve_duration: self.solve_duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_constructs_expected_struct() {
        let stats = SolveStatisticsBuilder::new()
            .area_variables(48)
            .sow_literals(48)
            .constraints(250)
            .build_duration(Duration::from_millis(3))
            .solve_duration(Duration::from_millis(1234))
            .build();

        assert_eq!(stats.area_variables, 48);
        assert_eq!(stats.sow_literals, 48);
        assert_eq!(stats.constraints, 250);
        assert_eq!(stats.build_duration, Duration::from_millis(3));
        assert_eq!(stats.solve_duration, Duration::from_millis(1234));
    }

    #[test]
    fn test_display_formats_all_fields() {
        let stats = SolveStatisticsBuilder::new()
            .area_variables(12)
            .sow_literals(12)
            .constraints(40)
            .solve_duration(Duration::from_millis(1234))
            .build();

        let rendered = format!("{}", stats);
        assert!(rendered.contains("Solve Statistics:"));
        assert!(rendered.contains("Area Variables: 12"));
        assert!(rendered.contains("Sow Literals: 12"));
        assert!(rendered.contains("Constraints: 40"));
        assert!(rendered.contains("Build Duration (secs): 0.000"));
        assert!(rendered.contains("Solve Duration (secs): 1.234"));
    }
}
