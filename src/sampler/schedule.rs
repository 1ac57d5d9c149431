//! Inter-sample delays and drift handling.

use log::warn;
use std::time::{Duration, Instant};

/// Supplies the desired delay between the starts of two sampling cycles.
///
/// Asked once per cycle, so the delay may change while sampling runs.
/// Closures returning milliseconds implement this directly.
pub trait DelaySource: Send {
    fn next_delay(&mut self) -> Duration;
}

impl<F> DelaySource for F
where
    F: FnMut() -> u64 + Send,
{
    fn next_delay(&mut self) -> Duration {
        Duration::from_millis(self())
    }
}

/// The same delay every cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelay(pub Duration);

impl DelaySource for FixedDelay {
    fn next_delay(&mut self) -> Duration {
        self.0
    }
}

/// How long to sleep so the next cycle starts `delay` after `cycle_start`.
///
/// An overrun is logged and yields a zero sleep; missed cycles are not
/// caught up.
pub fn time_until_next_run(cycle_start: Instant, delay: Duration, now: Instant) -> Duration {
    let next_run = cycle_start + delay;

    if next_run < now {
        warn!(
            "Next scheduled sample is {:?} overdue (cycle took {:?}, delay {:?})",
            now - next_run,
            now - cycle_start,
            delay
        );
    }

    next_run.saturating_duration_since(now)
}
