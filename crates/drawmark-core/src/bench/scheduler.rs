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

//! Cyclic scenario scheduling.

use crate::bench::scenario::Scenario;

/// Advances a step counter modulo the slot count, one tick per frame.
///
/// Selection is a pure function of the counter and cannot fail; a full
/// cycle visits every slot exactly once in fixed order.
#[derive(Debug, Default)]
pub struct ScenarioScheduler {
    step: usize,
}

impl ScenarioScheduler {
    /// Creates a scheduler positioned on slot 0.
    pub fn new() -> Self {
        Self { step: 0 }
    }

    /// Returns the frame slot for the current frame.
    pub fn current_slot(&self) -> usize {
        self.step
    }

    /// Returns the scenario that owns the current slot.
    pub fn current_scenario(&self) -> Scenario {
        Scenario::for_slot(self.step)
    }

    /// Moves to the next slot, wrapping after the last one.
    pub fn advance(&mut self) {
        self.step = (self.step + 1) % Scenario::SLOT_COUNT;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advancing_a_full_cycle_returns_to_start() {
        let mut scheduler = ScenarioScheduler::new();
        let start = scheduler.current_slot();
        for _ in 0..Scenario::SLOT_COUNT {
            scheduler.advance();
        }
        assert_eq!(scheduler.current_slot(), start);
    }

    #[test]
    fn slots_are_visited_in_order_without_skips() {
        let mut scheduler = ScenarioScheduler::new();
        for expected in 0..Scenario::SLOT_COUNT {
            assert_eq!(scheduler.current_slot(), expected);
            scheduler.advance();
        }
        // Eleventh frame wraps back to slot 0.
        assert_eq!(scheduler.current_slot(), 0);
        assert_eq!(scheduler.current_scenario(), Scenario::SingleBatch);
    }

    #[test]
    fn every_scenario_selected_once_per_cycle() {
        let mut scheduler = ScenarioScheduler::new();
        let mut visited = Vec::new();
        for _ in 0..Scenario::SLOT_COUNT {
            visited.push(scheduler.current_scenario());
            scheduler.advance();
        }
        for slot in 0..Scenario::SLOT_COUNT {
            assert_eq!(
                visited.iter().filter(|s| **s == Scenario::for_slot(slot)).count(),
                1
            );
        }
    }
}
