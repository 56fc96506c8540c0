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

//! Wall-clock timing for the measured submission windows.

use std::time::{Duration, Instant};

/// A simple stopwatch that starts counting on creation.
///
/// The benchmark brackets every measured submission loop with one of these;
/// the elapsed microsecond count is what lands in the sample buffers.
#[derive(Debug, Clone)]
pub struct Stopwatch {
    start_time: Instant,
}

impl Stopwatch {
    /// Creates a new stopwatch and starts it immediately.
    #[inline]
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    /// Returns the time elapsed since the stopwatch was created.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Returns the elapsed time in whole milliseconds.
    #[inline]
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }

    /// Returns the elapsed time in whole microseconds.
    #[inline]
    pub fn elapsed_us(&self) -> u64 {
        self.elapsed().as_micros() as u64
    }

    /// Returns the elapsed time in seconds as an `f64`.
    #[inline]
    pub fn elapsed_secs_f64(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn stopwatch_starts_near_zero() {
        let watch = Stopwatch::new();
        assert!(
            watch.elapsed() < Duration::from_millis(15),
            "initial elapsed duration should be very small"
        );
    }

    #[test]
    fn stopwatch_reports_elapsed_time_after_delay() {
        let watch = Stopwatch::new();
        thread::sleep(Duration::from_millis(50));

        let elapsed_us = watch.elapsed_us();
        assert!(
            elapsed_us >= 50_000,
            "elapsed us ({elapsed_us}) should cover the sleep"
        );
        assert!(
            watch.elapsed_ms() >= 50,
            "elapsed ms should cover the sleep"
        );
        assert!(watch.elapsed_secs_f64() >= 0.05);
    }

    #[test]
    fn stopwatch_clone_shares_start_time() {
        let watch1 = Stopwatch::new();
        thread::sleep(Duration::from_millis(10));
        let watch2 = watch1.clone();

        let difference = watch1.elapsed_us().abs_diff(watch2.elapsed_us());
        assert!(
            difference < 1_000,
            "clones should report nearly identical elapsed time (diff: {difference} us)"
        );
    }
}
