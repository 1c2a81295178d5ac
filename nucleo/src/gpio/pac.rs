use stm32f4xx_hal::pac::{GPIOA, GPIOB, GPIOC, GPIOD, GPIOE, GPIOF, GPIOG, GPIOH};

use super::{Af, Mode, Pin, Port};

/// Every port shares the register layout of port A.
type GpioPtr = stm32f4xx_hal::pac::gpioa::RegisterBlock;

impl Port {
    #[inline]
    fn ptr(self) -> *const GpioPtr {
        match self {
            Port::A => GPIOA::ptr(),
            Port::B => GPIOB::ptr() as *const GpioPtr,
            Port::C => GPIOC::ptr() as *const GpioPtr,
            Port::D => GPIOD::ptr() as *const GpioPtr,
            Port::E => GPIOE::ptr() as *const GpioPtr,
            Port::F => GPIOF::ptr() as *const GpioPtr,
            Port::G => GPIOG::ptr() as *const GpioPtr,
            Port::H => GPIOH::ptr() as *const GpioPtr,
        }
    }
}

/// Replace the `width` bits field of the pin in `value`.
#[inline]
fn field(value: u32, width: usize, slot: usize, bits: u32) -> u32 {
    let shift = slot * width;
    let mask = ((1 << width) - 1) << shift;
    (value & !mask) | ((bits << shift) & mask)
}

/// Configure this gpio pin with the given mode.
#[inline]
pub(crate) fn configure(port: Port, pin: Pin, mode: Mode) {
    let nr = pin as usize;
    let port_ptr = port.ptr();
    unsafe {
        (*port_ptr)
            .otyper
            .modify(|r, w| w.bits(field(r.bits(), 1, nr, mode.otyper())));
        (*port_ptr)
            .ospeedr
            .modify(|r, w| w.bits(field(r.bits(), 2, nr, mode.ospeedr())));
        (*port_ptr)
            .pupdr
            .modify(|r, w| w.bits(field(r.bits(), 2, nr, mode.pupdr())));
        (*port_ptr)
            .moder
            .modify(|r, w| w.bits(field(r.bits(), 2, nr, mode.moder())));
    }
}

/// Route the alternate function to the pin.
#[inline]
pub(crate) fn alternate_function(port: Port, pin: Pin, af: Af) {
    let nr = pin as usize;
    let af = af.0 as u32 & 0xF;
    let port_ptr = port.ptr();
    unsafe {
        if nr < 8 {
            (*port_ptr)
                .afrl
                .modify(|r, w| w.bits(field(r.bits(), 4, nr, af)));
        } else {
            (*port_ptr)
                .afrh
                .modify(|r, w| w.bits(field(r.bits(), 4, nr - 8, af)));
        }
    }
}

/// Sets the pin, atomically through BSRR.
#[inline]
pub(crate) fn set(port: Port, pin: Pin) {
    unsafe { (*port.ptr()).bsrr.write(|w| w.bits(pin.mask() as u32)) };
}

/// Clears the pin, atomically through BSRR.
#[inline]
pub(crate) fn clear(port: Port, pin: Pin) {
    unsafe { (*port.ptr()).bsrr.write(|w| w.bits((pin.mask() as u32) << 16)) };
}

/// Read the pin value.
#[inline]
pub(crate) fn read(port: Port, pin: Pin) -> bool {
    let value = unsafe { (*port.ptr()).idr.read().bits() };
    (value & pin.mask() as u32) > 0
}
