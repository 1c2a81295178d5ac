use crate::gpio::{self, Pins};

/// Led controller.
///
/// Assumes led is on when pin is high, as the Nucleo user LEDs are wired.
#[derive(Debug)]
pub struct Led<G: Pins> {
    pins: G,
    pin: gpio::Gpio,
    on: bool,
}

impl<G: Pins> Led<G> {
    /// Configure the pin as output, with the led off.
    #[inline]
    pub fn new(mut pins: G, pin: gpio::Gpio, mode: gpio::OutputMode) -> Self {
        pins.enable_port(pin.0);
        let mut led = Self {
            pins,
            pin,
            on: false,
        };
        led.update();
        led.pins.configure(pin, mode.into());
        led
    }

    #[inline]
    fn update(&mut self) {
        self.pins.write(self.pin, self.on);
    }

    #[inline]
    pub fn on(&mut self) {
        self.on = true;
        self.update();
    }

    #[inline]
    pub fn off(&mut self) {
        self.on = false;
        self.update();
    }

    #[inline]
    pub fn toggle(&mut self) {
        self.on = !self.on;
        self.update();
    }

    #[inline]
    pub fn write(&mut self, on: bool) {
        if on {
            self.on();
        } else {
            self.off();
        }
    }

    #[inline]
    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Give the pins back.
    #[inline]
    pub fn release(self) -> G {
        self.pins
    }
}
