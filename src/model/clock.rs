use chrono::{NaiveDateTime, NaiveTime};

/// Source of "now" in the host's local calendar.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;

    /// Midnight at the start of the current day.
    fn today(&self) -> NaiveDateTime {
        self.now().date().and_time(NaiveTime::MIN)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
