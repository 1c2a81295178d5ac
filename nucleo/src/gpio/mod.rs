//! GPIO peripheral.
//!
//! Example usage:
//!
//! ```ignore
//! let mut pins = gpio::Hardware;
//! pins.enable_port(Port::B);
//!
//! pins.configure(PB0, gpio::OutputMode::PushPull(gpio::Speed::Low).into());
//! pins.set(PB0);
//! let value: bool = pins.read(PB0);
//! ```

mod mode;
#[cfg(any(test, feature = "model"))]
pub mod model;
#[cfg(all(target_arch = "arm", target_os = "none"))]
mod pac;
mod pinout;

pub use mode::*;
pub use pinout::*;

use crate::clock::Peripheral;

/// Available GPIO ports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Port {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

/// Available GPIO pins.
#[repr(u8)]
#[rustfmt::skip]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pin {
    P0  = 0,
    P1  = 1,
    P2  = 2,
    P3  = 3,
    P4  = 4,
    P5  = 5,
    P6  = 6,
    P7  = 7,
    P8  = 8,
    P9  = 9,
    P10 = 10,
    P11 = 11,
    P12 = 12,
    P13 = 13,
    P14 = 14,
    P15 = 15,
}

impl Port {
    /// Number of ports.
    pub const COUNT: usize = 8;

    /// Clock gate of the port.
    #[inline]
    pub fn peripheral(self) -> Peripheral {
        match self {
            Port::A => Peripheral::GpioA,
            Port::B => Peripheral::GpioB,
            Port::C => Peripheral::GpioC,
            Port::D => Peripheral::GpioD,
            Port::E => Peripheral::GpioE,
            Port::F => Peripheral::GpioF,
            Port::G => Peripheral::GpioG,
            Port::H => Peripheral::GpioH,
        }
    }
}

impl Pin {
    /// Single bit mask of the pin within its port.
    #[inline]
    pub fn mask(self) -> u16 {
        1 << self as u8
    }
}

/// GPIO pin tuple struct.
///
/// Can be used to [configure][Pins::configure()], [read][Pins::read()] from or
/// [write][Pins::write()] to a pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gpio(pub Port, pub Pin);

/// Access to the GPIO ports.
///
/// Implemented by [Hardware] for the real ports, and by [model::PinModel] in host tests.
pub trait Pins {
    /// Enable the clock of the port.
    fn enable_port(&mut self, port: Port);

    /// Configure the given GPIO pin mode.
    fn configure(&mut self, pin: Gpio, mode: Mode);

    /// Select the alternate function routed to the pin.
    fn alternate_function(&mut self, pin: Gpio, af: Af);

    /// Drive the pin high.
    ///
    /// Assumes pin was [configured][Pins::configure] as output before calling this.
    fn set(&mut self, pin: Gpio);

    /// Drive the pin low.
    fn clear(&mut self, pin: Gpio);

    /// Read the GPIO pin value.
    fn read(&self, pin: Gpio) -> bool;

    /// Set the GPIO pin value.
    #[inline]
    fn write(&mut self, pin: Gpio, value: bool) {
        if value {
            self.set(pin);
        } else {
            self.clear(pin);
        }
    }
}

/// The GPIO ports of the microcontroller.
#[derive(Clone, Copy, Debug, Default)]
pub struct Hardware;

#[cfg(all(target_arch = "arm", target_os = "none"))]
impl Pins for Hardware {
    #[inline]
    fn enable_port(&mut self, port: Port) {
        crate::clock::enable(port.peripheral());
    }

    #[inline]
    fn configure(&mut self, pin: Gpio, mode: Mode) {
        pac::configure(pin.0, pin.1, mode);
    }

    #[inline]
    fn alternate_function(&mut self, pin: Gpio, af: Af) {
        pac::alternate_function(pin.0, pin.1, af);
    }

    #[inline]
    fn set(&mut self, pin: Gpio) {
        pac::set(pin.0, pin.1);
    }

    #[inline]
    fn clear(&mut self, pin: Gpio) {
        pac::clear(pin.0, pin.1);
    }

    #[inline]
    fn read(&self, pin: Gpio) -> bool {
        pac::read(pin.0, pin.1)
    }
}
