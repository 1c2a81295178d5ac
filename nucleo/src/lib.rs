//! Minimal HAL crate for the STM32F446 microcontroller (Nucleo-144 board).
//!
//! Allows for flexible peripheral access, without direct interaction with registers.
//! Timers and GPIO are reached through the [timer::Registers] and [gpio::Pins] traits, so the
//! same driver code runs against the hardware or against the in-memory models of the `model`
//! feature.

#![cfg_attr(not(any(test, feature = "model")), no_std)]

pub mod clock;
#[cfg(all(target_arch = "arm", target_os = "none"))]
pub mod delay;
pub mod gpio;
pub mod timer;

mod led;

pub use led::Led;
