//! Clock port.
//!
//! Billing periods and reactivation windows depend on "now". Handlers read
//! it through this port so tests can pin or advance time.

use crate::domain::foundation::Timestamp;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}
