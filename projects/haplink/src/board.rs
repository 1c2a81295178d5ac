//! Haplink board layout.
//!
//! Four motor channels on TIM3 (PC6 to PC9), motors 1 to 3 with direction pins, and three more
//! DC motors on the TIM4 extension header (PD12 to PD14). Motors 3 and 4 carry the vibration
//! motors on the stock board.

use nucleo::gpio;
use nucleo::timer::{self, pwm};

use crate::direction::DirectionPins;

/// Hardware layout:

/// PWM timer auto reload register, the compare count of a full duty cycle:
pub const PERIOD_PWM: u32 = 665;

/// PWM timer prescaler:
pub const PRESCALER: u16 = 4;

/// Torque to duty cycle gain in 1/Nm, calibrated for the stock motors:
pub const TORQUE_GAIN: f64 = 65.13;

/// LED - heartbeat:
pub const LED: gpio::Gpio = gpio::PB0;

/// Motor timers:
pub const PRIMARY_TIMER: timer::Timer = timer::TIM3;
pub const EXTENSION_TIMER: timer::Timer = timer::TIM4;

/// One motor channel of a timer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChannelBinding {
    pub channel: timer::Channel,
    /// Pin carrying the channel output.
    pub pwm_pin: gpio::Gpio,
    /// H-bridge direction pins, [None] for unidirectional motors.
    pub direction: Option<DirectionPins>,
    /// Torque to duty cycle gain of the motor, in 1/Nm.
    pub torque_gain: f64,
}

/// Motor channels driven by one timer.
#[derive(Clone, Copy, Debug)]
pub struct Layout {
    pub config: pwm::Config,
    /// Alternate function routing the timer to the PWM pins.
    pub af: gpio::Af,
    pub channels: &'static [ChannelBinding],
}

impl ChannelBinding {
    /// Motor with an H-bridge.
    pub const fn bridge(
        channel: timer::Channel,
        pwm_pin: gpio::Gpio,
        forward: gpio::Gpio,
        reverse: gpio::Gpio,
    ) -> Self {
        Self {
            channel,
            pwm_pin,
            direction: Some(DirectionPins::new(forward, reverse)),
            torque_gain: TORQUE_GAIN,
        }
    }

    /// Motor without direction pins.
    pub const fn unidirectional(channel: timer::Channel, pwm_pin: gpio::Gpio) -> Self {
        Self {
            channel,
            pwm_pin,
            direction: None,
            torque_gain: TORQUE_GAIN,
        }
    }
}

/// Motors 1 to 4.
///
/// Motor 2 has its forward pin on port D, the others keep both pins on one port.
pub const PRIMARY_CHANNELS: [ChannelBinding; 4] = [
    ChannelBinding::bridge(timer::Channel::C1, gpio::PC6, gpio::PC10, gpio::PC11),
    ChannelBinding::bridge(timer::Channel::C2, gpio::PC7, gpio::PD2, gpio::PC12),
    ChannelBinding::bridge(timer::Channel::C3, gpio::PC8, gpio::PD1, gpio::PD0),
    ChannelBinding::unidirectional(timer::Channel::C4, gpio::PC9),
];

/// Motors 5 to 7.
pub const EXTENSION_CHANNELS: [ChannelBinding; 3] = [
    ChannelBinding::bridge(timer::Channel::C1, gpio::PD12, gpio::PG3, gpio::PG2),
    ChannelBinding::bridge(timer::Channel::C2, gpio::PD13, gpio::PG5, gpio::PG4),
    ChannelBinding::bridge(timer::Channel::C3, gpio::PD14, gpio::PG9, gpio::PG8),
];

/// TIM3 bank.
pub static PRIMARY: Layout = Layout {
    config: pwm::Config::new(PRESCALER, PERIOD_PWM),
    af: gpio::af::TIM3_5,
    channels: &PRIMARY_CHANNELS,
};

/// TIM4 bank.
pub static EXTENSION: Layout = Layout {
    config: pwm::Config::new(PRESCALER, PERIOD_PWM),
    af: gpio::af::TIM3_5,
    channels: &EXTENSION_CHANNELS,
};
