//! System clock setup and peripheral clock gating.

/// System clock speed in Hertz.
pub const SPEED: u32 = 168_000_000;

/// Clock speed of the timers connected to APB1 (TIM2..TIM7).
///
/// APB1 runs at `SPEED / 4`, timers on a divided bus see twice the bus clock.
pub const APB1_TIMER_SPEED: u32 = SPEED / 2;

/// Clock speed of the timers connected to APB2 (TIM1, TIM8).
pub const APB2_TIMER_SPEED: u32 = SPEED;

/// Peripheral buses with a clock enable register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bus {
    Ahb1,
    Apb1,
    Apb2,
}

impl Bus {
    /// Input clock of the timers hanging off this bus.
    #[inline]
    pub fn timer_speed(self) -> u32 {
        match self {
            Bus::Ahb1 => SPEED,
            Bus::Apb1 => APB1_TIMER_SPEED,
            Bus::Apb2 => APB2_TIMER_SPEED,
        }
    }
}

/// Peripherals whose clock can be enabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Peripheral {
    GpioA,
    GpioB,
    GpioC,
    GpioD,
    GpioE,
    GpioF,
    GpioG,
    GpioH,
    Tim1,
    Tim2,
    Tim3,
    Tim4,
    Tim5,
    Tim6,
    Tim7,
    Tim8,
}

impl Peripheral {
    /// Bus the peripheral is connected to.
    #[inline]
    pub fn bus(self) -> Bus {
        use Peripheral::*;
        match self {
            GpioA | GpioB | GpioC | GpioD | GpioE | GpioF | GpioG | GpioH => Bus::Ahb1,
            Tim2 | Tim3 | Tim4 | Tim5 | Tim6 | Tim7 => Bus::Apb1,
            Tim1 | Tim8 => Bus::Apb2,
        }
    }

    /// Bit of the enable flag in the bus enable register.
    #[inline]
    pub fn bit(self) -> u8 {
        use Peripheral::*;
        match self {
            GpioA => 0,
            GpioB => 1,
            GpioC => 2,
            GpioD => 3,
            GpioE => 4,
            GpioF => 5,
            GpioG => 6,
            GpioH => 7,
            Tim2 => 0,
            Tim3 => 1,
            Tim4 => 2,
            Tim5 => 3,
            Tim6 => 4,
            Tim7 => 5,
            Tim1 => 0,
            Tim8 => 1,
        }
    }
}

#[cfg(all(target_arch = "arm", target_os = "none"))]
pub use self::hw::{enable, init};

#[cfg(all(target_arch = "arm", target_os = "none"))]
mod hw {
    use super::{Bus, Peripheral};
    use stm32f4xx_hal::pac::Peripherals as DevicePeripherals;

    /// Setup of the system clock.
    ///
    /// Runs the PLL from the internal 16MHz oscillator: SYSCLK = 168MHz, APB1 = 42MHz,
    /// APB2 = 84MHz.
    pub unsafe fn init() {
        let dp = DevicePeripherals::steal();

        dp.FLASH.acr.write(|w| {
            // Latency: five wait states at 168MHz and 3.3V.
            w.latency().bits(5);
            // Prefetch, instruction and data cache.
            w.prften().set_bit();
            w.icen().set_bit();
            w.dcen().set_bit()
        });

        while dp.FLASH.acr.read().latency().bits() != 5 {}

        dp.RCC.pllcfgr.write(|w| {
            // HSI oscillator clock selected as PLL input clock.
            w.pllsrc().hsi();
            // HSI / 16 = 1MHz into the VCO.
            w.pllm().bits(16);
            // VCO at 336MHz.
            w.plln().bits(336);
            // SYSCLK = VCO / 2 = 168MHz.
            w.pllp().div2();
            // 48MHz for USB.
            w.pllq().bits(7)
        });

        dp.RCC.cfgr.write(|w| {
            // AHB prescaler: div 1
            w.hpre().div1();
            // APB low-speed prescaler: div 4
            w.ppre1().div4();
            // APB high-speed prescaler: div 2
            w.ppre2().div2()
        });

        // Enable the PLL.
        dp.RCC.cr.modify(|_, w| w.pllon().set_bit());

        // Wait for PLL to become ready.
        while dp.RCC.cr.read().pllrdy().bit_is_clear() {}

        // Switch to PLL as system clock.
        dp.RCC.cfgr.modify(|_, w| w.sw().pll());

        // Wait for switch to complete.
        while !dp.RCC.cfgr.read().sws().is_pll() {}
    }

    /// Enable the clock of the given peripheral.
    #[inline]
    pub fn enable(peripheral: Peripheral) {
        let mask = 1 << peripheral.bit();
        unsafe {
            let dp = DevicePeripherals::steal();
            match peripheral.bus() {
                Bus::Ahb1 => dp.RCC.ahb1enr.modify(|r, w| w.bits(r.bits() | mask)),
                Bus::Apb1 => dp.RCC.apb1enr.modify(|r, w| w.bits(r.bits() | mask)),
                Bus::Apb2 => dp.RCC.apb2enr.modify(|r, w| w.bits(r.bits() | mask)),
            }
        }
    }
}
