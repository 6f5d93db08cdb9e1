//! Time source abstraction
//!
//! The engine never reads the wall clock directly; it asks a `Clock` for the
//! current monotonic instant. Production uses `SystemClock`, tests drive time
//! by hand with `ManualClock`.

use std::time::Instant;

/// Monotonic time source for the timer engine
pub trait Clock: Send {
    /// Current monotonic instant
    fn now(&self) -> Instant;
}

/// Clock backed by `std::time::Instant`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
