//! A source of the current time, injected so that time-dependent behaviour can be tested.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, Utc};
use std::fmt::Debug;
use std::sync::{Arc, Mutex};

/// Provides the current moment.
pub trait Clock: Debug {
    fn now(&self) -> DateTime<Utc>;

    /// The current wall-clock time in the local timezone.
    fn local_now(&self) -> NaiveDateTime {
        self.now().with_timezone(&Local).naive_local()
    }

    /// Today's date in the local timezone.
    fn today(&self) -> NaiveDate {
        self.local_now().date()
    }
}

/// The system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to. Clones share the same time.
///
/// Local dates and times are taken to be UTC so that results do not depend on the timezone of
/// the machine.
#[derive(Debug, Clone)]
pub struct FixedClock(Arc<Mutex<DateTime<Utc>>>);

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Arc::new(Mutex::new(now)))
    }

    pub fn set(&self, now: DateTime<Utc>) {
        match self.0.lock() {
            Ok(mut guard) => *guard = now,
            Err(poisoned) => *poisoned.into_inner() = now,
        }
    }

    pub fn advance(&self, by: Duration) {
        self.set(self.now() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        match self.0.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn local_now(&self) -> NaiveDateTime {
        self.now().naive_utc()
    }
}
