//! Monotonic timestamps and elapsed-time arithmetic.

use std::sync::OnceLock;
use std::time::{Duration, Instant};

const NANOS_PER_SEC: i64 = 1_000_000_000;

static ANCHOR: OnceLock<Instant> = OnceLock::new();

/// Seconds and nanoseconds on a monotonic clock, measured from a process-wide anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct MonotonicStamp {
    pub secs: u64,
    pub nanos: u32,
}

impl MonotonicStamp {
    pub fn new(secs: u64, nanos: u32) -> Self {
        Self { secs, nanos }
    }

    pub fn now() -> Self {
        let since = ANCHOR.get_or_init(Instant::now).elapsed();
        Self {
            secs: since.as_secs(),
            nanos: since.subsec_nanos(),
        }
    }
}

/// `finish - start`, borrowing a whole second when the nanosecond part
/// underflows. A finish before start yields zero.
pub fn time_difference(start: MonotonicStamp, finish: MonotonicStamp) -> Duration {
    let mut ds = finish.secs as i128 - start.secs as i128;
    let mut dn = finish.nanos as i64 - start.nanos as i64;

    if dn < 0 {
        ds -= 1;
        dn += NANOS_PER_SEC;
    }
    if ds < 0 {
        return Duration::ZERO;
    }

    Duration::new(ds as u64, dn as u32)
}

/// Brackets a piece of work between two monotonic stamps.
#[derive(Clone, Copy, Debug)]
pub struct Stopwatch {
    start: MonotonicStamp,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            start: MonotonicStamp::now(),
        }
    }

    pub fn started_at(&self) -> MonotonicStamp {
        self.start
    }

    pub fn stop(&self) -> Duration {
        time_difference(self.start, MonotonicStamp::now())
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use super::{time_difference, MonotonicStamp, Stopwatch};

    #[test]
    fn borrows_a_second() {
        let start = MonotonicStamp::new(10, 900_000_000);
        let finish = MonotonicStamp::new(11, 100_000_000);

        assert_eq!(time_difference(start, finish), Duration::from_nanos(200_000_000));
    }

    #[test]
    fn plain_difference() {
        let start = MonotonicStamp::new(3, 250);
        let finish = MonotonicStamp::new(5, 1_250);

        assert_eq!(time_difference(start, finish), Duration::new(2, 1_000));
    }

    #[test]
    fn never_negative() {
        let start = MonotonicStamp::new(11, 100_000_000);
        let finish = MonotonicStamp::new(10, 900_000_000);

        assert_eq!(time_difference(start, finish), Duration::ZERO);
        assert_eq!(time_difference(start, start), Duration::ZERO);
    }

    #[test]
    fn stamps_are_monotonic() {
        let first = MonotonicStamp::now();
        let second = MonotonicStamp::now();
        let watch = Stopwatch::start();

        assert!(second >= first);
        assert!(watch.started_at() >= second);
        assert!(watch.stop() < Duration::from_secs(60));
    }
}
