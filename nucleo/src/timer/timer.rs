use super::registers::{bdtr, ccer, ccmr, cr1, egr, sr, Register, Slot, SLOTS};
use crate::clock::Peripheral;
use crate::gpio::{self, Af};

/// Timer instances of the STM32F446 with a time base.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Timer {
    Tim1,
    Tim2,
    Tim3,
    Tim4,
    Tim5,
    Tim6,
    Tim7,
    Tim8,
}

/// Feature set of a timer instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    /// TIM1 and TIM8: complementary outputs, break input, main output enable.
    Advanced,
    /// 16-bit general purpose timers.
    GeneralPurpose,
    /// 32-bit general purpose timers (TIM2 and TIM5).
    GeneralPurpose32,
    /// TIM6 and TIM7: time base only.
    Basic,
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    C1 = 0,
    C2 = 1,
    C3 = 2,
    C4 = 3,
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputCompareMode {
    Frozen = 0,
    ActiveMatch = 1,
    InactiveMatch = 2,
    Toggle = 3,
    ForceInactive = 4,
    ForceActive = 5,
    Pwm1 = 6,
    Pwm2 = 7,
}

/// Counting direction, CR1 DIR and CMS fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CounterMode {
    Up,
    Down,
    CenterAligned1,
    CenterAligned2,
    CenterAligned3,
}

/// Dead-time and filter clock division, CR1 CKD field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockDivision {
    Div1,
    Div2,
    Div4,
}

/// Time base configuration.
///
/// The counter runs at `timer clock / (psc + 1)` and wraps after `arr + 1` counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeBase {
    pub psc: u16,
    pub arr: u32,
    pub clock_division: ClockDivision,
    pub counter_mode: CounterMode,
}

impl Timer {
    /// Clock gate of the timer.
    #[inline]
    pub fn peripheral(self) -> Peripheral {
        match self {
            Timer::Tim1 => Peripheral::Tim1,
            Timer::Tim2 => Peripheral::Tim2,
            Timer::Tim3 => Peripheral::Tim3,
            Timer::Tim4 => Peripheral::Tim4,
            Timer::Tim5 => Peripheral::Tim5,
            Timer::Tim6 => Peripheral::Tim6,
            Timer::Tim7 => Peripheral::Tim7,
            Timer::Tim8 => Peripheral::Tim8,
        }
    }

    /// Feature set of the instance.
    #[inline]
    pub fn features(self) -> Kind {
        match self {
            Timer::Tim1 | Timer::Tim8 => Kind::Advanced,
            Timer::Tim2 | Timer::Tim5 => Kind::GeneralPurpose32,
            Timer::Tim3 | Timer::Tim4 => Kind::GeneralPurpose,
            Timer::Tim6 | Timer::Tim7 => Kind::Basic,
        }
    }

    /// Alternate function connecting the timer channels to their pins.
    ///
    /// Returns [None] for the basic timers, which have no outputs.
    #[inline]
    pub fn alternate_function(self) -> Option<Af> {
        match self {
            Timer::Tim1 | Timer::Tim2 => Some(gpio::af::TIM1_2),
            Timer::Tim3 | Timer::Tim4 | Timer::Tim5 => Some(gpio::af::TIM3_5),
            Timer::Tim8 => Some(gpio::af::TIM8_11),
            Timer::Tim6 | Timer::Tim7 => None,
        }
    }
}

impl Kind {
    /// Whether CR1 has the DIR and CMS fields.
    #[inline]
    pub fn has_counter_mode(self) -> bool {
        self != Kind::Basic
    }

    /// Whether CR1 has the CKD field.
    #[inline]
    pub fn has_clock_division(self) -> bool {
        self != Kind::Basic
    }

    /// Whether outputs are gated by BDTR MOE.
    #[inline]
    pub fn has_main_output(self) -> bool {
        self == Kind::Advanced
    }

    /// Number of capture/compare channels.
    #[inline]
    pub fn channels(self) -> usize {
        match self {
            Kind::Basic => 0,
            _ => 4,
        }
    }

    /// Whether the register exists on this kind of timer.
    ///
    /// Reads of a missing register give zero and writes are dropped.
    #[inline]
    pub fn implements(self, register: Register) -> bool {
        use Register::*;
        match register {
            Cr1 | Cr2 | Dier | Sr | Egr | Cnt | Psc | Arr => true,
            Smcr | Ccmr1 | Ccmr2 | Ccer | Ccr1 | Ccr2 | Ccr3 | Ccr4 => self != Kind::Basic,
            Rcr | Bdtr => self == Kind::Advanced,
        }
    }

    /// Implemented bits of the counter, ARR and CCR registers.
    #[inline]
    pub fn counter_mask(self) -> u32 {
        match self {
            Kind::GeneralPurpose32 => u32::MAX,
            _ => 0xFFFF,
        }
    }
}

impl Channel {
    pub const ALL: [Channel; 4] = [Channel::C1, Channel::C2, Channel::C3, Channel::C4];

    /// Channel from its 1-based number, as printed in the reference manual.
    ///
    /// Panics if `number` is not in `1..=4`.
    #[inline]
    pub fn from_number(number: u8) -> Self {
        assert!(
            (1..=4).contains(&number),
            "timer channel {} out of range 1..=4",
            number
        );
        Self::ALL[number as usize - 1]
    }

    /// 1-based channel number.
    #[inline]
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    /// Register location of the channel.
    #[inline]
    pub fn slot(self) -> Slot {
        SLOTS[self as usize]
    }
}

impl OutputCompareMode {
    /// Decode the three bit OCxM field.
    #[inline]
    pub fn from_bits(bits: u32) -> Self {
        match bits & 0b111 {
            0 => Self::Frozen,
            1 => Self::ActiveMatch,
            2 => Self::InactiveMatch,
            3 => Self::Toggle,
            4 => Self::ForceInactive,
            5 => Self::ForceActive,
            6 => Self::Pwm1,
            _ => Self::Pwm2,
        }
    }
}

impl CounterMode {
    /// DIR and CMS bits of CR1.
    #[inline]
    pub fn bits(self) -> u32 {
        match self {
            CounterMode::Up => 0x00,
            CounterMode::Down => 0x10,
            CounterMode::CenterAligned1 => 0x20,
            CounterMode::CenterAligned2 => 0x40,
            CounterMode::CenterAligned3 => 0x60,
        }
    }
}

impl ClockDivision {
    /// CKD bits of CR1.
    #[inline]
    pub fn bits(self) -> u32 {
        match self {
            ClockDivision::Div1 => 0x000,
            ClockDivision::Div2 => 0x100,
            ClockDivision::Div4 => 0x200,
        }
    }
}

impl TimeBase {
    /// Up-counting time base without clock division.
    pub const fn new(psc: u16, arr: u32) -> Self {
        Self {
            psc,
            arr,
            clock_division: ClockDivision::Div1,
            counter_mode: CounterMode::Up,
        }
    }

    /// Update event frequency for the given timer input clock, in Hertz.
    ///
    /// This is the PWM frequency of edge-aligned modes.
    #[inline]
    pub fn frequency(&self, timer_clock: u32) -> u32 {
        let counts = (self.psc as u64 + 1) * (self.arr as u64 + 1);
        (timer_clock as u64 / counts) as u32
    }
}

/// Register access to a timer instance.
///
/// Implementors provide raw register reads and writes. The time base and output compare
/// operations are built on top of those as provided methods.
pub trait Registers {
    /// Feature set of the instance.
    fn kind(&self) -> Kind;

    fn read(&self, register: Register) -> u32;

    fn write(&mut self, register: Register, value: u32);

    /// Enable the peripheral clock.
    #[inline]
    fn enable_clock(&mut self) {}

    #[inline]
    fn modify<F: FnOnce(u32) -> u32>(&mut self, register: Register, f: F) {
        let value = self.read(register);
        self.write(register, f(value));
    }

    /// Program counter mode, clock division, period and prescaler.
    ///
    /// Ends with an update event, so the buffered prescaler is loaded right away instead of at
    /// the next overflow.
    fn init_time_base(&mut self, config: &TimeBase) {
        let kind = self.kind();
        let mut value = self.read(Register::Cr1);
        if kind.has_counter_mode() {
            value &= !(cr1::DIR | cr1::CMS);
            value |= config.counter_mode.bits();
        }
        if kind.has_clock_division() {
            value &= !cr1::CKD;
            value |= config.clock_division.bits();
        }
        self.write(Register::Cr1, value);
        self.write_arr(config.arr);
        self.write_psc(config.psc);
        self.generate_update();
    }

    #[inline]
    fn write_arr(&mut self, arr: u32) {
        self.write(Register::Arr, arr);
    }

    #[inline]
    fn read_arr(&self) -> u32 {
        self.read(Register::Arr)
    }

    #[inline]
    fn write_psc(&mut self, psc: u16) {
        self.write(Register::Psc, psc as u32);
    }

    #[inline]
    fn read_psc(&self) -> u16 {
        self.read(Register::Psc) as u16
    }

    /// Reinitialize the counter and load the preloaded registers.
    #[inline]
    fn generate_update(&mut self) {
        self.write(Register::Egr, egr::UG);
    }

    /// Buffer ARR writes until the next update event.
    #[inline]
    fn arr_preload(&mut self, enable: bool) {
        self.modify(Register::Cr1, |r| {
            if enable {
                r | cr1::ARPE
            } else {
                r & !cr1::ARPE
            }
        });
    }

    /// Start the counter.
    #[inline]
    fn enable(&mut self) {
        self.modify(Register::Cr1, |r| r | cr1::CEN);
    }

    /// Stop the counter.
    #[inline]
    fn disable(&mut self) {
        self.modify(Register::Cr1, |r| r & !cr1::CEN);
    }

    #[inline]
    fn read_counter_value(&self) -> u32 {
        self.read(Register::Cnt)
    }

    /// Select the output compare mode, and configure the channel as output.
    #[inline]
    fn output_compare_mode(&mut self, channel: Channel, mode: OutputCompareMode) {
        let slot = channel.slot();
        let mask = (ccmr::OCM | ccmr::CCS) << slot.ccmr_shift;
        let field = (mode as u32) << (ccmr::OCM_SHIFT + slot.ccmr_shift);
        self.modify(slot.ccmr, |r| (r & !mask) | field);
    }

    /// Buffer CCR writes of the channel until the next update event.
    #[inline]
    fn ccr_preload(&mut self, channel: Channel, enable: bool) {
        let slot = channel.slot();
        let bit = ccmr::OCPE << slot.ccmr_shift;
        self.modify(slot.ccmr, |r| if enable { r | bit } else { r & !bit });
    }

    #[inline]
    fn output_enable(&mut self, channel: Channel) {
        if self.kind().has_main_output() {
            // Main output enable.
            self.modify(Register::Bdtr, |r| r | bdtr::MOE);
        }
        let bit = ccer::CCE << channel.slot().ccer_shift;
        self.modify(Register::Ccer, |r| r | bit);
    }

    #[inline]
    fn output_disable(&mut self, channel: Channel) {
        let bit = ccer::CCE << channel.slot().ccer_shift;
        self.modify(Register::Ccer, |r| r & !bit);
    }

    /// Set the output polarity, `true` for active low.
    #[inline]
    fn polarity(&mut self, channel: Channel, pol: bool) {
        let shift = channel.slot().ccer_shift;
        let mask = !(ccer::CCP << shift);
        let x = (pol as u32) << (shift + 1);
        self.modify(Register::Ccer, |r| (r & mask) | x);
    }

    #[inline]
    fn write_ccr(&mut self, channel: Channel, ccr: u32) {
        self.write(channel.slot().ccr, ccr);
    }

    #[inline]
    fn read_ccr(&self, channel: Channel) -> u32 {
        self.read(channel.slot().ccr)
    }

    #[inline]
    fn read_update_interrupt_flag(&self) -> bool {
        self.read(Register::Sr) & sr::UIF != 0
    }

    /// Clear the update flag. SR bits are cleared by writing zero.
    #[inline]
    fn clear_update_interrupt_flag(&mut self) {
        self.write(Register::Sr, !sr::UIF);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_numbers_are_one_based() {
        assert_eq!(Channel::from_number(1), Channel::C1);
        assert_eq!(Channel::from_number(4), Channel::C4);
        assert_eq!(Channel::C3.number(), 3);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn channel_zero_is_rejected() {
        Channel::from_number(0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn channel_five_is_rejected() {
        Channel::from_number(5);
    }

    #[test]
    fn output_compare_mode_decodes_all_fields() {
        for bits in 0..8 {
            assert_eq!(OutputCompareMode::from_bits(bits) as u32, bits);
        }
    }

    #[test]
    fn stock_pwm_frequency() {
        let config = TimeBase::new(4, 665);
        assert_eq!(config.frequency(84_000_000), 25_225);
    }

    #[test]
    fn full_width_time_base_does_not_overflow() {
        let config = TimeBase::new(u16::MAX, u32::MAX);
        assert_eq!(config.frequency(84_000_000), 0);
    }

    #[test]
    fn instance_features() {
        assert_eq!(Timer::Tim1.features(), Kind::Advanced);
        assert_eq!(Timer::Tim2.features(), Kind::GeneralPurpose32);
        assert_eq!(Timer::Tim3.features(), Kind::GeneralPurpose);
        assert_eq!(Timer::Tim6.features(), Kind::Basic);
        assert_eq!(Timer::Tim4.alternate_function(), Some(gpio::af::TIM3_5));
        assert_eq!(Timer::Tim7.alternate_function(), None);
        assert_eq!(Timer::Tim8.peripheral(), Peripheral::Tim8);
    }

    #[test]
    fn basic_kind_has_no_mode_fields() {
        assert!(!Kind::Basic.has_counter_mode());
        assert!(!Kind::Basic.has_clock_division());
        assert_eq!(Kind::Basic.channels(), 0);
        assert!(Kind::GeneralPurpose.has_counter_mode());
        assert_eq!(Kind::GeneralPurpose32.counter_mask(), u32::MAX);
        assert_eq!(Kind::Advanced.counter_mask(), 0xFFFF);
    }

    #[test]
    fn channel_registers_exist_with_channels() {
        let kinds = [
            Kind::Advanced,
            Kind::GeneralPurpose,
            Kind::GeneralPurpose32,
            Kind::Basic,
        ];
        for kind in kinds.iter() {
            for channel in Channel::ALL.iter() {
                let slot = channel.slot();
                assert_eq!(kind.implements(slot.ccmr), kind.channels() > 0);
                assert_eq!(kind.implements(slot.ccr), kind.channels() > 0);
                assert_eq!(kind.implements(Register::Ccer), kind.channels() > 0);
            }
            assert_eq!(kind.implements(Register::Bdtr), kind.has_main_output());
            assert!(kind.implements(Register::Arr));
            assert!(kind.implements(Register::Sr));
        }
        assert!(!Kind::GeneralPurpose.implements(Register::Rcr));
        assert!(!Kind::Basic.implements(Register::Smcr));
    }
}
