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

//! Per-scenario sample accumulation and windowed median reduction.

use crate::bench::report::FlushReport;
use crate::bench::scenario::Scenario;

/// A fixed-capacity buffer of elapsed-microsecond samples.
///
/// Append-only until full; an explicit [`clear`](SampleBuffer::clear) is the
/// only way samples leave the buffer. Length never exceeds the capacity.
#[derive(Debug)]
pub struct SampleBuffer {
    samples: Vec<u64>,
    capacity: usize,
}

impl SampleBuffer {
    /// Creates an empty buffer with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a sample. Samples past capacity are dropped with a warning,
    /// as the flush counter should have drained the buffer first.
    pub fn record(&mut self, elapsed_us: u64) {
        if self.samples.len() >= self.capacity {
            log::warn!(
                "SampleBuffer: dropping sample, buffer already holds {} entries",
                self.capacity
            );
            return;
        }
        self.samples.push(elapsed_us);
    }

    /// Number of samples currently held.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Whether the buffer has reached its capacity.
    pub fn is_full(&self) -> bool {
        self.samples.len() >= self.capacity
    }

    /// Sorts the samples ascending and returns the upper-middle element.
    ///
    /// For an even count this is index `len >> 1`, not an interpolated
    /// median. The tie-break is intentional and load-bearing: downstream
    /// tooling compares these numbers across runs, so they must stay
    /// reproducible integers.
    pub fn median_us(&mut self) -> Option<u64> {
        if self.samples.is_empty() {
            return None;
        }
        self.samples.sort_unstable();
        Some(self.samples[self.samples.len() >> 1])
    }

    /// Removes all samples.
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

/// All scenario sample buffers plus the shared flush counter.
///
/// One counter gates every buffer: a flush happens only when the counter
/// reaches the window size, and it then reduces and clears all buffers at
/// once. Buffers are never flushed early or individually.
#[derive(Debug)]
pub struct SampleSet {
    buffers: Vec<SampleBuffer>,
    flush_counter: usize,
    window: usize,
    instance_count: usize,
}

impl SampleSet {
    /// Creates one buffer per measured scenario, each sized to `window`.
    pub fn new(window: usize, instance_count: usize) -> Self {
        Self {
            buffers: Scenario::MEASURED
                .iter()
                .map(|_| SampleBuffer::new(window))
                .collect(),
            flush_counter: 0,
            window,
            instance_count,
        }
    }

    /// Appends a sample to the buffer of the given scenario.
    ///
    /// Recording against the flush scenario is a programming error and is
    /// ignored with a warning.
    pub fn record(&mut self, scenario: Scenario, elapsed_us: u64) {
        match scenario.measured_index() {
            Some(index) => self.buffers[index].record(elapsed_us),
            None => log::warn!("SampleSet: ignoring sample for unmeasured scenario {scenario:?}"),
        }
    }

    /// Number of samples held for a scenario (zero for unmeasured ones).
    pub fn len(&self, scenario: Scenario) -> usize {
        scenario
            .measured_index()
            .map(|index| self.buffers[index].len())
            .unwrap_or(0)
    }

    /// Whether no buffer holds any sample.
    pub fn is_empty(&self) -> bool {
        self.buffers.iter().all(SampleBuffer::is_empty)
    }

    /// Called once per rotation when the scheduler lands on the flush slot.
    ///
    /// Increments the shared flush counter; once it reaches the window
    /// size, reduces every buffer to its median, clears them all, resets
    /// the counter, and returns the report. Otherwise returns `None`.
    pub fn note_flush_slot(&mut self) -> Option<FlushReport> {
        self.flush_counter += 1;
        if self.flush_counter < self.window {
            return None;
        }

        let mut medians = Vec::with_capacity(self.buffers.len());
        for (scenario, buffer) in Scenario::MEASURED.iter().zip(self.buffers.iter_mut()) {
            // A missing median here means a scenario body never ran; report
            // zero rather than skewing the fixed key order.
            let median = buffer.median_us().unwrap_or_else(|| {
                log::warn!("SampleSet: no samples for {scenario:?} at flush");
                0
            });
            medians.push((scenario.label(), median));
            buffer.clear();
        }
        self.flush_counter = 0;

        Some(FlushReport {
            instance_count: self.instance_count,
            medians,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_buffer_caps_at_capacity() {
        let mut buffer = SampleBuffer::new(3);
        for i in 0..5 {
            buffer.record(i);
        }
        assert_eq!(buffer.len(), 3);
        assert!(buffer.is_full());
    }

    #[test]
    fn median_picks_upper_middle_of_even_count() {
        // sorted = [10, 20, 30, 50], index 4 >> 1 = 2.
        let mut buffer = SampleBuffer::new(4);
        for sample in [50, 10, 30, 20] {
            buffer.record(sample);
        }
        assert_eq!(buffer.median_us(), Some(30));
    }

    #[test]
    fn median_of_odd_count_is_middle() {
        let mut buffer = SampleBuffer::new(5);
        for sample in [5, 1, 9, 3, 7] {
            buffer.record(sample);
        }
        assert_eq!(buffer.median_us(), Some(5));
    }

    #[test]
    fn median_of_empty_buffer_is_none() {
        let mut buffer = SampleBuffer::new(4);
        assert_eq!(buffer.median_us(), None);
    }

    #[test]
    fn flush_only_fires_when_window_reached() {
        let mut set = SampleSet::new(3, 100);
        for round in 0..2 {
            for scenario in Scenario::MEASURED {
                set.record(scenario, round);
            }
            assert!(set.note_flush_slot().is_none());
        }
        for scenario in Scenario::MEASURED {
            set.record(scenario, 2);
        }
        let report = set.note_flush_slot().expect("third flush slot completes window");
        assert_eq!(report.medians.len(), Scenario::MEASURED.len());
        // Samples were [0, 1, 2] per scenario; upper-middle of 3 is index 1.
        assert!(report.medians.iter().all(|(_, median)| *median == 1));
        assert!(set.is_empty());
    }

    #[test]
    fn buffers_are_cleared_and_counter_reset_after_flush() {
        let mut set = SampleSet::new(2, 100);
        for round in 0..2 {
            for scenario in Scenario::MEASURED {
                set.record(scenario, round * 10);
            }
            let report = set.note_flush_slot();
            assert_eq!(report.is_some(), round == 1);
        }
        // A fresh window starts counting from zero again.
        for scenario in Scenario::MEASURED {
            set.record(scenario, 7);
        }
        assert!(set.note_flush_slot().is_none());
    }

    #[test]
    fn scenario_buffers_are_isolated() {
        let mut set = SampleSet::new(1, 100);
        for scenario in Scenario::MEASURED {
            let value = scenario.measured_index().unwrap() as u64 * 100;
            set.record(scenario, value);
        }
        let report = set.note_flush_slot().expect("window of one flushes immediately");
        for (index, (label, median)) in report.medians.iter().enumerate() {
            assert_eq!(*label, Scenario::MEASURED[index].label());
            assert_eq!(*median, index as u64 * 100);
        }
    }

    #[test]
    fn recording_against_flush_is_ignored() {
        let mut set = SampleSet::new(2, 100);
        set.record(Scenario::Flush, 123);
        assert!(set.is_empty());
    }
}
