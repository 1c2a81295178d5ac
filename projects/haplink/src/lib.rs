//! Haplink motor driver.
//!
//! The Haplink board drives its DC motors through H-bridges: one PWM channel sets the voltage and
//! a pair of direction pins selects which way the bridge conducts. Vibration motors share the
//! same timers, without direction pins.
//!
//! Hardware is reached through the [nucleo] traits, so everything here runs unchanged against
//! the in-memory models in host tests.

#![cfg_attr(not(test), no_std)]

pub mod board;
pub mod direction;
pub mod duty;
pub mod motors;

pub use direction::{Direction, DirectionPins};
pub use motors::Motors;
