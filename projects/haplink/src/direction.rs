//! H-bridge direction control.
//!
//! Each DC motor has two direction pins. Exactly one of them is driven high once the motor has
//! been commanded, both are low only after power-up.

use nucleo::gpio::{self, Gpio, Pins};

/// Direction of rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

impl Direction {
    /// Split a signed command in direction and magnitude.
    ///
    /// Negative values are reversed, everything else (zero included) runs forward.
    #[inline]
    pub fn split(value: f64) -> (Direction, f64) {
        if value < 0.0 {
            (Direction::Reverse, -value)
        } else {
            (Direction::Forward, value)
        }
    }
}

/// Direction pin pair of one H-bridge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirectionPins {
    /// Driven high for [Direction::Forward].
    pub forward: Gpio,
    /// Driven high for [Direction::Reverse].
    pub reverse: Gpio,
}

/// GPIO mode of the direction pins.
const MODE: gpio::Mode = gpio::Mode::Output(
    gpio::OutputType::PushPull,
    gpio::Speed::High,
    gpio::Pull::None,
);

impl DirectionPins {
    pub const fn new(forward: Gpio, reverse: Gpio) -> Self {
        Self { forward, reverse }
    }

    /// Pin driven high for the direction.
    #[inline]
    pub fn pin(&self, direction: Direction) -> Gpio {
        match direction {
            Direction::Forward => self.forward,
            Direction::Reverse => self.reverse,
        }
    }

    /// Configure both pins as outputs. Port clocks must be enabled.
    pub fn configure<G: Pins>(&self, pins: &mut G) {
        pins.configure(self.forward, MODE);
        pins.configure(self.reverse, MODE);
    }

    /// Drive both pins low.
    #[inline]
    pub fn release<G: Pins>(&self, pins: &mut G) {
        pins.clear(self.forward);
        pins.clear(self.reverse);
    }

    /// Select the direction.
    ///
    /// The opposite pin is cleared before the selected one is set, so both are never high at
    /// the same time. Both pins are written on every call.
    #[inline]
    pub fn assert<G: Pins>(&self, pins: &mut G, direction: Direction) {
        let (on, off) = match direction {
            Direction::Forward => (self.forward, self.reverse),
            Direction::Reverse => (self.reverse, self.forward),
        };
        pins.clear(off);
        pins.set(on);
    }
}

/// Select the direction from the sign of `value`, and return the magnitude.
#[inline]
pub fn apply_sign<G: Pins>(pins: &mut G, pair: &DirectionPins, value: f64) -> (Direction, f64) {
    let (direction, magnitude) = Direction::split(value);
    pair.assert(pins, direction);
    (direction, magnitude)
}
