//! # Clock
//!
//! Time source for offer expiry.
//!
//! The pricing engine never calls `Utc::now()` itself. Callers hand it a
//! `Clock`, which is sampled once per pricing call, so a fixed clock makes
//! every expiry decision reproducible in tests.

use chrono::{DateTime, Utc};

/// Something that can tell the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
