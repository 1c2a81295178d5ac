//! In-memory GPIO ports.
//!
//! Keeps the mode, alternate function and output level of every pin, plus the ordered list of
//! level writes, so tests can check both the final state and the sequence that produced it.

use super::{Af, Gpio, Mode, Pins, Port};

#[derive(Clone, Copy, Debug, Default)]
struct PortState {
    enabled: bool,
    odr: u16,
    modes: [Option<Mode>; 16],
    af: [u8; 16],
}

/// GPIO test double.
#[derive(Clone, Debug, Default)]
pub struct PinModel {
    ports: [PortState; Port::COUNT],
    writes: Vec<(Gpio, bool)>,
}

impl PinModel {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn port(&self, port: Port) -> &PortState {
        &self.ports[port as usize]
    }

    #[inline]
    fn port_mut(&mut self, port: Port) -> &mut PortState {
        &mut self.ports[port as usize]
    }

    /// Whether the port clock was enabled.
    pub fn is_enabled(&self, port: Port) -> bool {
        self.port(port).enabled
    }

    /// Mode the pin was last configured with.
    pub fn mode(&self, pin: Gpio) -> Option<Mode> {
        self.port(pin.0).modes[pin.1 as usize]
    }

    /// Alternate function routed to the pin.
    pub fn af(&self, pin: Gpio) -> Af {
        Af(self.port(pin.0).af[pin.1 as usize])
    }

    /// Every level written, in order.
    pub fn writes(&self) -> &[(Gpio, bool)] {
        &self.writes
    }

    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }
}

impl Pins for PinModel {
    fn enable_port(&mut self, port: Port) {
        self.port_mut(port).enabled = true;
    }

    fn configure(&mut self, pin: Gpio, mode: Mode) {
        self.port_mut(pin.0).modes[pin.1 as usize] = Some(mode);
    }

    fn alternate_function(&mut self, pin: Gpio, af: Af) {
        self.port_mut(pin.0).af[pin.1 as usize] = af.0 & 0xF;
    }

    fn set(&mut self, pin: Gpio) {
        self.port_mut(pin.0).odr |= pin.1.mask();
        self.writes.push((pin, true));
    }

    fn clear(&mut self, pin: Gpio) {
        self.port_mut(pin.0).odr &= !pin.1.mask();
        self.writes.push((pin, false));
    }

    fn read(&self, pin: Gpio) -> bool {
        self.port(pin.0).odr & pin.1.mask() > 0
    }
}
