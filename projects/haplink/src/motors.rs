//! Motor bank driver.
//!
//! One [Motors] value owns a timer and drives every channel of a board [Layout]. Motors are
//! numbered from 1, in layout order.

use nucleo::gpio::{self, Pins};
use nucleo::timer::pwm::Pwm;
use nucleo::timer::Registers;

use crate::board::{ChannelBinding, Layout};
use crate::direction::{self, Direction};
use crate::duty;

/// Output driver of the PWM pins.
const PWM_PIN: gpio::AlternateFunctionOutputMode =
    gpio::AlternateFunctionOutputMode::PushPull(gpio::Speed::High);

/// GPIO mode of the PWM pins, pulled up.
#[inline]
fn pwm_pin_mode() -> gpio::Mode {
    let mode: gpio::Mode = PWM_PIN.into();
    mode.with_pull(gpio::Pull::Up)
}

/// Maximum number of channels of a timer.
const MAX_CHANNELS: usize = 4;

/// Motors PWM driver.
///
/// Keeps the last duty cycle, direction and vibration amplitude of each motor for telemetry.
pub struct Motors<T: Registers, G: Pins> {
    pwm: Pwm<T>,
    pins: G,
    layout: &'static Layout,
    duty: [f64; MAX_CHANNELS],
    direction: [Option<Direction>; MAX_CHANNELS],
    amplitude: [f64; MAX_CHANNELS],
}

impl<T: Registers, G: Pins> Motors<T, G> {
    /// New motor driver.
    ///
    /// Configures the pins, releases all direction pins, and starts the timer once every channel
    /// is set up with a zero duty cycle.
    pub fn new(timer: T, mut pins: G, layout: &'static Layout) -> Self {
        assert!(
            !layout.channels.is_empty() && layout.channels.len() <= MAX_CHANNELS,
            "layout must have 1 to {} channels, got {}",
            MAX_CHANNELS,
            layout.channels.len()
        );

        for binding in layout.channels.iter() {
            pins.enable_port(binding.pwm_pin.0);
            if let Some(pair) = binding.direction {
                pins.enable_port(pair.forward.0);
                pins.enable_port(pair.reverse.0);
            }
        }

        // PWM outputs.
        let mode = pwm_pin_mode();
        for binding in layout.channels.iter() {
            pins.alternate_function(binding.pwm_pin, layout.af);
            pins.configure(binding.pwm_pin, mode);
        }

        // Direction pins, both low until the first command.
        for pair in layout.channels.iter().filter_map(|b| b.direction) {
            pair.configure(&mut pins);
        }
        for pair in layout.channels.iter().filter_map(|b| b.direction) {
            pair.release(&mut pins);
        }

        let mut pwm = layout.config.make(timer);
        for binding in layout.channels.iter() {
            pwm.configure_pwm(binding.channel, 0);
        }
        pwm.start();

        log::info!(
            "{} motors ready, psc {} arr {}",
            layout.channels.len(),
            layout.config.psc,
            layout.config.arr
        );

        Self {
            pwm,
            pins,
            layout,
            duty: [0.0; MAX_CHANNELS],
            direction: [None; MAX_CHANNELS],
            amplitude: [0.0; MAX_CHANNELS],
        }
    }

    /// Index and binding of the motor. Panics if there is no such motor.
    fn binding(&self, motor: u8) -> (usize, ChannelBinding) {
        let count = self.layout.channels.len();
        assert!(
            motor >= 1 && motor as usize <= count,
            "motor {} out of range 1..={}",
            motor,
            count
        );
        let index = motor as usize - 1;
        (index, self.layout.channels[index])
    }

    /// Number of motors.
    #[inline]
    pub fn count(&self) -> usize {
        self.layout.channels.len()
    }

    /// Set the duty cycle of the motor.
    ///
    /// With direction pins the sign selects the direction and the magnitude is written. Without,
    /// negative values give a zero duty cycle. Magnitudes above 1 saturate.
    pub fn set_duty_cycle(&mut self, motor: u8, duty: f64) {
        let (index, binding) = self.binding(motor);
        let magnitude = match binding.direction {
            Some(pair) => {
                let (direction, magnitude) = direction::apply_sign(&mut self.pins, &pair, duty);
                self.direction[index] = Some(direction);
                magnitude
            }
            None => duty.max(0.0),
        };
        self.duty[index] = magnitude;
        duty::set_duty_cycle(&mut self.pwm, binding.channel, magnitude);
    }

    /// Set the motor torque in Nm, through the motor calibration gain.
    ///
    /// The resulting duty cycle saturates like [Motors::set_duty_cycle]. Panics if the motor
    /// has no direction pins.
    pub fn set_torque(&mut self, motor: u8, torque: f64) {
        let (index, binding) = self.binding(motor);
        let pair = binding
            .direction
            .unwrap_or_else(|| panic!("motor {} has no direction pins", motor));
        let (direction, magnitude) = direction::apply_sign(&mut self.pins, &pair, torque);
        self.direction[index] = Some(direction);

        let duty = duty::torque_to_duty(magnitude, binding.torque_gain);
        self.duty[index] = duty;
        duty::set_duty_cycle(&mut self.pwm, binding.channel, duty);
    }

    /// Run a vibration motor at the given amplitude, clamped to `[0, 1]`.
    ///
    /// Direction pins are left alone.
    pub fn vibrate(&mut self, motor: u8, amplitude: f64) {
        let (index, binding) = self.binding(motor);
        let amplitude = if amplitude.is_nan() {
            0.0
        } else {
            amplitude.clamp(0.0, 1.0)
        };
        duty::set_duty_cycle(&mut self.pwm, binding.channel, amplitude);
        self.amplitude[index] = amplitude;
    }

    /// Turn a vibration motor off.
    pub fn stop_vibration(&mut self, motor: u8) {
        let (index, binding) = self.binding(motor);
        duty::set_duty_cycle(&mut self.pwm, binding.channel, 0.0);
        self.amplitude[index] = 0.0;
    }

    /// Last duty cycle magnitude commanded, before saturation. Never negative.
    #[inline]
    pub fn duty(&self, motor: u8) -> f64 {
        self.duty[self.binding(motor).0]
    }

    /// Compare register of the motor channel.
    #[inline]
    pub fn compare(&self, motor: u8) -> u32 {
        self.pwm.read_ccr(self.binding(motor).1.channel)
    }

    /// Direction selected by the last command, [None] before the first one.
    #[inline]
    pub fn direction(&self, motor: u8) -> Option<Direction> {
        self.direction[self.binding(motor).0]
    }

    /// Last vibration amplitude, zero once stopped.
    #[inline]
    pub fn vibration_amplitude(&self, motor: u8) -> f64 {
        self.amplitude[self.binding(motor).0]
    }

    #[inline]
    pub fn layout(&self) -> &'static Layout {
        self.layout
    }

    #[inline]
    pub fn pwm(&self) -> &Pwm<T> {
        &self.pwm
    }

    /// Mutable access to the timer, for the update flag.
    #[inline]
    pub fn timer_mut(&mut self) -> &mut T {
        self.pwm.timer_mut()
    }

    #[inline]
    pub fn pins(&self) -> &G {
        &self.pins
    }
}
