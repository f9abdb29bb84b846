//! Wall-clock timing helpers.

use std::time::{Duration, Instant};

/// Stopwatch for one named phase of a run.
///
/// Reports its elapsed time at `level` when dropped, so a phase that exits
/// early through `?` is still logged:
///
/// ```text
/// let _t = Timed::new("equivalence harness", Level::Info);
///   ...
/// → "equivalence harness: 4.812s"
/// ```
pub struct Timed {
    name: &'static str,
    level: log::Level,
    start: Instant,
}

impl Timed {
    pub fn new(name: &'static str, level: log::Level) -> Self {
        log::trace!("{name} started");
        Self {
            name,
            level,
            start: Instant::now(),
        }
    }

    /// Time since [`new`](Timed::new), without stopping the clock.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Timed {
    fn drop(&mut self) {
        log::log!(self.level, "{}: {:.3?}", self.name, self.elapsed());
    }
}

/// Runs `f` and returns its output with the wall-clock time it took.
///
/// The duration is also logged at DEBUG under `name`.
pub fn timed<T>(name: &'static str, f: impl FnOnce() -> T) -> (T, Duration) {
    let timer = Timed::new(name, log::Level::Debug);
    let out = f();
    (out, timer.elapsed())
}
