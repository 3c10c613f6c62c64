#![forbid(unsafe_code)]

use crate::timestamp::Timestamp;
use time::OffsetDateTime;

pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Local wall clock; falls back to UTC when the local offset is unknown.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        Timestamp::from_offset(now)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
