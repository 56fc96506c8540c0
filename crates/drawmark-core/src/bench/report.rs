// Copyright 2025 the drawmark authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Flush reports and the sink they are delivered to.

use std::fmt;

/// The result of one flush: every scenario's median, in fixed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlushReport {
    /// The instance count the medians were measured with.
    pub instance_count: usize,
    /// `(scenario label, median microseconds)` pairs in report order.
    pub medians: Vec<(&'static str, u64)>,
}

impl fmt::Display for FlushReport {
    /// Renders the single `key=value` report line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={}", self.instance_count)?;
        for (label, median_us) in &self.medians {
            write!(f, " {label}={median_us}")?;
        }
        Ok(())
    }
}

/// A destination for flush reports.
///
/// The session emits exactly one report per full sample window; where it
/// goes (a log line, a test vector, a file) is the host's choice.
pub trait ReportSink {
    /// Delivers one flush report.
    fn emit(&mut self, report: &FlushReport);
}

/// The default sink: one structured `log::info!` line per flush.
#[derive(Debug, Default)]
pub struct LogSink;

impl ReportSink for LogSink {
    fn emit(&mut self, report: &FlushReport) {
        log::info!("benchmark medians (us): {report}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_line_is_ordered_key_value_pairs() {
        let report = FlushReport {
            instance_count: 100,
            medians: vec![("single_batch", 42), ("same_mesh_same_range", 311)],
        };
        assert_eq!(
            format!("{report}"),
            "n=100 single_batch=42 same_mesh_same_range=311"
        );
    }

    #[test]
    fn report_line_with_no_medians_is_just_the_count() {
        let report = FlushReport {
            instance_count: 7,
            medians: Vec::new(),
        };
        assert_eq!(format!("{report}"), "n=7");
    }
}
