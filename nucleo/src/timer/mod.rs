//! General purpose and advanced control timers.
//!
//! Example usage:
//!
//! ```ignore
//! let config = pwm::Config::new(4, 665);
//! let mut pwm = config.make(TIM3);
//! pwm.configure_pwm(Channel::C1, 0);
//! pwm.start();
//! pwm.write_ccr(Channel::C1, 333);
//! ```

#[cfg(any(test, feature = "model"))]
pub mod model;
#[cfg(all(target_arch = "arm", target_os = "none"))]
mod pac;
pub mod pwm;
pub mod registers;
mod timer;

pub use timer::{
    Channel, ClockDivision, CounterMode, Kind, OutputCompareMode, Registers, TimeBase, Timer,
};

pub const TIM1: Timer = Timer::Tim1;
pub const TIM2: Timer = Timer::Tim2;
pub const TIM3: Timer = Timer::Tim3;
pub const TIM4: Timer = Timer::Tim4;
pub const TIM5: Timer = Timer::Tim5;
pub const TIM6: Timer = Timer::Tim6;
pub const TIM7: Timer = Timer::Tim7;
pub const TIM8: Timer = Timer::Tim8;
