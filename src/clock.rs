use std::thread;
use std::time::{Duration, Instant};

/// Seconds between `start` and `now`; zero if `now` is earlier.
pub fn elapsed_since(start: Instant, now: Instant) -> f64 {
    now.saturating_duration_since(start).as_secs_f64()
}

/// Frame pacing for the game loop.
///
/// `Realtime` sleeps to keep the loop at or under the target rate.
/// `Simulated` never sleeps: every tick is exactly one frame period long, so
/// headless runs are reproducible.
pub enum FrameClock {
    Realtime {
        start: Instant,
        last_tick: Instant,
        frame_period: Duration,
    },
    Simulated {
        elapsed: Duration,
        frame_period: Duration,
    },
}

impl FrameClock {
    pub fn realtime(fps: u64) -> Self {
        let now = Instant::now();
        FrameClock::Realtime {
            start: now,
            last_tick: now,
            frame_period: frame_period(fps),
        }
    }

    pub fn simulated(fps: u64) -> Self {
        FrameClock::Simulated {
            elapsed: Duration::ZERO,
            frame_period: frame_period(fps),
        }
    }

    /// Starts a new session at the current moment.
    pub fn restart(&mut self) {
        match self {
            FrameClock::Realtime { start, last_tick, .. } => {
                let now = Instant::now();
                *start = now;
                *last_tick = now;
            }
            FrameClock::Simulated { elapsed, .. } => *elapsed = Duration::ZERO,
        }
    }

    /// Milliseconds since the previous tick, waiting first if the frame
    /// finished early.
    pub fn tick(&mut self) -> u64 {
        match self {
            FrameClock::Realtime { last_tick, frame_period, .. } => {
                let busy = last_tick.elapsed();
                if busy < *frame_period {
                    thread::sleep(*frame_period - busy);
                }
                let now = Instant::now();
                let delta = now.duration_since(*last_tick);
                *last_tick = now;
                delta.as_millis() as u64
            }
            FrameClock::Simulated { elapsed, frame_period } => {
                let before = elapsed.as_millis();
                *elapsed += *frame_period;
                (elapsed.as_millis() - before) as u64
            }
        }
    }

    /// Seconds since the clock was created.
    pub fn elapsed_secs(&self) -> f64 {
        match self {
            FrameClock::Realtime { start, .. } => elapsed_since(*start, Instant::now()),
            FrameClock::Simulated { elapsed, .. } => elapsed.as_secs_f64(),
        }
    }

    /// Blocks for `ms`. The simulated clock only moves its time forward.
    pub fn hold(&mut self, ms: u64) {
        let span = Duration::from_millis(ms);
        match self {
            FrameClock::Realtime { last_tick, .. } => {
                thread::sleep(span);
                *last_tick = Instant::now();
            }
            FrameClock::Simulated { elapsed, .. } => *elapsed += span,
        }
    }
}

fn frame_period(fps: u64) -> Duration {
    Duration::from_nanos(1_000_000_000 / fps.max(1))
}
