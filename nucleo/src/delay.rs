//! Busy-wait delays in SYSCLK cycles.

use crate::clock::SPEED;

const MILLIS_COUNT: u32 = SPEED / 1_000;

/// Blocks program for *atleast* `count` milliseconds.
#[inline]
pub fn millis(count: u32) {
    cortex_m::asm::delay(MILLIS_COUNT.saturating_mul(count));
}
