use log::debug;
use rand::Rng;

use crate::constants::*;
use crate::entities::Star;

/// One spawn check. Fires only when `accumulator` is strictly past `interval`;
/// then it returns a fresh batch, a zeroed accumulator and the shrunk
/// interval. Otherwise the inputs come back untouched.
pub fn maybe_spawn(
    accumulator: u64,
    interval: u64,
    rng: &mut impl Rng,
    screen_width: i32,
) -> (Vec<Star>, u64, u64) {
    if accumulator <= interval {
        return (Vec::new(), accumulator, interval);
    }

    let max_x = (screen_width - STAR_WIDTH).max(0);
    let stars = (0..STARS_PER_SPAWN)
        .map(|_| Star::new(rng.gen_range(0..=max_x)))
        .collect();
    let next_interval = interval
        .saturating_sub(SPAWN_INTERVAL_DECREMENT_MS)
        .max(MIN_SPAWN_INTERVAL_MS);

    (stars, 0, next_interval)
}

// --- Spawner: difficulty ramp carried across frames ---
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Spawner {
    pub accumulator_ms: u64,
    pub interval_ms: u64,
    pub screen_width: i32,
}

impl Spawner {
    pub fn new(screen_width: i32) -> Self {
        Spawner {
            accumulator_ms: 0,
            interval_ms: INITIAL_SPAWN_INTERVAL_MS,
            screen_width,
        }
    }

    pub fn accumulate(&mut self, delta_ms: u64) {
        self.accumulator_ms = self.accumulator_ms.saturating_add(delta_ms);
    }

    pub fn maybe_spawn(&mut self, rng: &mut impl Rng) -> Vec<Star> {
        let (stars, accumulator, interval) =
            maybe_spawn(self.accumulator_ms, self.interval_ms, rng, self.screen_width);
        if !stars.is_empty() {
            debug!("Spawned {} stars, next interval {} ms", stars.len(), interval);
        }
        self.accumulator_ms = accumulator;
        self.interval_ms = interval;
        stars
    }
}
