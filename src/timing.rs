//! Millisecond timing primitives shared by the state machine and drivers.
//!
//! Every wait in the firmware (sensor warm-up, activation hold, siren
//! cadence, remote debounce) is a timestamp comparison against a
//! monotonic millisecond counter.  Nothing here blocks.
//!
//! Timestamps are `u32` milliseconds since boot and are compared with
//! wrapping subtraction, so the ~49.7 day rollover is harmless as long as
//! no single interval exceeds it.

/// Milliseconds since boot, wrapping at `u32::MAX`.
pub type Millis = u32;

/// Source of monotonic time.  Injected at the call site so every timing
/// path can be driven deterministically in tests.
pub trait Clock {
    fn now_ms(&self) -> Millis;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> Millis {
        (**self).now_ms()
    }
}

/// Wrap-safe `now - since`.
#[inline]
pub const fn elapsed(now: Millis, since: Millis) -> Millis {
    now.wrapping_sub(since)
}

/// `true` once at least `period` has passed since `since`.
#[inline]
pub const fn has_elapsed(now: Millis, since: Millis, period: Millis) -> bool {
    elapsed(now, since) >= period
}

// ---------------------------------------------------------------------------
// ToggleLatch
// ---------------------------------------------------------------------------

/// Debounced one-shot event latch.
///
/// An edge is accepted only if `window` has elapsed since the previously
/// accepted edge (the very first edge is always accepted).  An accepted
/// edge sets the latch; it stays set until [`check_and_clear`] consumes
/// it.  Dropped edges neither extend nor reset anything.
///
/// [`check_and_clear`]: ToggleLatch::check_and_clear
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleLatch {
    window: Millis,
    last_accepted: Option<Millis>,
    latched: bool,
}

impl ToggleLatch {
    pub const fn new(window: Millis) -> Self {
        Self {
            window,
            last_accepted: None,
            latched: false,
        }
    }

    /// Offer an edge observed at `now`.  Returns `true` if it was accepted.
    pub fn trigger(&mut self, now: Millis) -> bool {
        let accept = match self.last_accepted {
            None => true,
            Some(prev) => has_elapsed(now, prev, self.window),
        };
        if accept {
            self.latched = true;
            self.last_accepted = Some(now);
        }
        accept
    }

    /// Read and clear the latch.  `true` at most once per accepted edge.
    pub fn check_and_clear(&mut self) -> bool {
        core::mem::take(&mut self.latched)
    }

    pub fn is_latched(&self) -> bool {
        self.latched
    }

    pub fn last_accepted(&self) -> Option<Millis> {
        self.last_accepted
    }
}
