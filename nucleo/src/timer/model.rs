//! In-memory timer peripheral.
//!
//! [RegisterModel] behaves like one TIM instance as far as the time base and output compare
//! logic go: preloaded registers only take effect at update events, the counter follows the
//! configured counting mode and prescaler, and every channel produces an output level from its
//! compare mode, compare value and polarity.

use super::registers::{bdtr, ccer, ccmr, cr1, egr, sr, Register};
use super::timer::{Channel, Kind, OutputCompareMode, Registers};

/// Timer test double.
#[derive(Clone, Debug)]
pub struct RegisterModel {
    kind: Kind,
    registers: [u32; Register::COUNT],
    active_arr: u32,
    active_psc: u32,
    active_ccr: [u32; 4],
    prescaler_count: u32,
    counting_down: bool,
    oc_ref: [bool; 4],
    clock_enabled: bool,
    updates: usize,
    writes: Vec<(Register, u32)>,
}

impl RegisterModel {
    /// A timer in its reset state.
    pub fn new(kind: Kind) -> Self {
        let mut registers = [0; Register::COUNT];
        registers[Register::Arr.index()] = kind.counter_mask();
        Self {
            kind,
            registers,
            active_arr: kind.counter_mask(),
            active_psc: 0,
            active_ccr: [0; 4],
            prescaler_count: 0,
            counting_down: false,
            oc_ref: [false; 4],
            clock_enabled: false,
            updates: 0,
            writes: Vec::new(),
        }
    }

    #[inline]
    fn get(&self, register: Register) -> u32 {
        self.registers[register.index()]
    }

    #[inline]
    fn set(&mut self, register: Register, value: u32) {
        self.registers[register.index()] = value;
    }

    fn ccr_preloaded(&self, channel: Channel) -> bool {
        let slot = channel.slot();
        self.get(slot.ccmr) & (ccmr::OCPE << slot.ccmr_shift) != 0
    }

    fn compare_mode(&self, channel: Channel) -> OutputCompareMode {
        let slot = channel.slot();
        OutputCompareMode::from_bits(self.get(slot.ccmr) >> (ccmr::OCM_SHIFT + slot.ccmr_shift))
    }

    fn is_counting_down(&self) -> bool {
        let cr1 = self.get(Register::Cr1);
        if !self.kind.has_counter_mode() {
            false
        } else if cr1 & cr1::CMS != 0 {
            self.counting_down
        } else {
            cr1 & cr1::DIR != 0
        }
    }

    /// Transfer the preload registers to the active ones and raise the update flag.
    fn update_event(&mut self) {
        self.active_arr = self.get(Register::Arr);
        self.active_psc = self.get(Register::Psc);
        for channel in Channel::ALL.iter() {
            self.active_ccr[*channel as usize] = self.get(channel.slot().ccr);
        }
        let status = self.get(Register::Sr) | sr::UIF;
        self.set(Register::Sr, status);
        self.updates += 1;
    }

    /// Software update, also reinitializes the counter and the prescaler.
    fn generate(&mut self) {
        self.update_event();
        self.prescaler_count = 0;
        self.counting_down = false;
        let start = if self.is_counting_down() { self.active_arr } else { 0 };
        self.set(Register::Cnt, start);
    }

    /// Advance the counter by one counter clock.
    fn step(&mut self) {
        let cnt = self.get(Register::Cnt);
        let arr = self.active_arr;
        let cr1 = self.get(Register::Cr1);
        let center = self.kind.has_counter_mode() && cr1 & cr1::CMS != 0;

        let next = if center {
            if !self.counting_down {
                if cnt + 1 >= arr {
                    self.counting_down = true;
                    self.update_event();
                    arr
                } else {
                    cnt + 1
                }
            } else if cnt <= 1 {
                self.counting_down = false;
                self.update_event();
                0
            } else {
                cnt - 1
            }
        } else if self.is_counting_down() {
            if cnt == 0 {
                self.update_event();
                self.active_arr
            } else {
                cnt - 1
            }
        } else if cnt >= arr {
            self.update_event();
            0
        } else {
            cnt + 1
        };
        self.set(Register::Cnt, next);

        for channel in Channel::ALL.iter() {
            let index = *channel as usize;
            if next != self.active_ccr[index] {
                continue;
            }
            match self.compare_mode(*channel) {
                OutputCompareMode::ActiveMatch => self.oc_ref[index] = true,
                OutputCompareMode::InactiveMatch => self.oc_ref[index] = false,
                OutputCompareMode::Toggle => self.oc_ref[index] = !self.oc_ref[index],
                _ => {}
            }
        }
    }

    /// Advance the model by one timer input clock.
    pub fn tick(&mut self) {
        if self.get(Register::Cr1) & cr1::CEN == 0 {
            return;
        }
        if self.prescaler_count < self.active_psc {
            self.prescaler_count += 1;
            return;
        }
        self.prescaler_count = 0;
        self.step();
    }

    /// Advance the model by `ticks` timer input clocks.
    pub fn run(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Output compare reference of the channel, before polarity.
    fn reference(&self, channel: Channel) -> bool {
        let index = channel as usize;
        let cnt = self.get(Register::Cnt);
        let ccr = self.active_ccr[index];
        let pwm1 = if self.is_counting_down() {
            cnt <= ccr
        } else {
            cnt < ccr
        };
        match self.compare_mode(channel) {
            OutputCompareMode::Pwm1 => pwm1,
            OutputCompareMode::Pwm2 => !pwm1,
            OutputCompareMode::ForceActive => true,
            OutputCompareMode::ForceInactive => false,
            _ => self.oc_ref[index],
        }
    }

    /// Level on the channel pin. Disabled outputs read low.
    pub fn output_level(&self, channel: Channel) -> bool {
        if self.kind.channels() == 0 {
            return false;
        }
        if self.kind.has_main_output() && self.get(Register::Bdtr) & bdtr::MOE == 0 {
            return false;
        }
        let shift = channel.slot().ccer_shift;
        let ccer = self.get(Register::Ccer) >> shift;
        if ccer & ccer::CCE == 0 {
            return false;
        }
        self.reference(channel) ^ (ccer & ccer::CCP != 0)
    }

    /// Counter register.
    pub fn counter(&self) -> u32 {
        self.get(Register::Cnt)
    }

    /// Compare value in use by the channel, as opposed to its preload register.
    pub fn active_compare(&self, channel: Channel) -> u32 {
        self.active_ccr[channel as usize]
    }

    /// Auto-reload value in use by the counter.
    pub fn active_period(&self) -> u32 {
        self.active_arr
    }

    /// Prescaler value in use by the counter.
    pub fn active_prescaler(&self) -> u32 {
        self.active_psc
    }

    pub fn clock_enabled(&self) -> bool {
        self.clock_enabled
    }

    /// Number of update events so far.
    pub fn update_events(&self) -> usize {
        self.updates
    }

    /// Every register write, in order.
    pub fn writes(&self) -> &[(Register, u32)] {
        &self.writes
    }

    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }
}

impl Registers for RegisterModel {
    fn kind(&self) -> Kind {
        self.kind
    }

    fn read(&self, register: Register) -> u32 {
        match register {
            Register::Egr => 0,
            _ if !self.kind.implements(register) => 0,
            _ => self.get(register),
        }
    }

    fn write(&mut self, register: Register, value: u32) {
        self.writes.push((register, value));
        if !self.kind.implements(register) {
            return;
        }
        let mask = self.kind.counter_mask();
        match register {
            Register::Egr => {
                if value & egr::UG != 0 {
                    self.generate();
                }
            }
            Register::Sr => {
                let status = self.get(Register::Sr) & value;
                self.set(Register::Sr, status);
            }
            Register::Arr => {
                self.set(Register::Arr, value & mask);
                if self.get(Register::Cr1) & cr1::ARPE == 0 {
                    self.active_arr = value & mask;
                }
            }
            Register::Psc => self.set(Register::Psc, value & 0xFFFF),
            Register::Cnt => self.set(Register::Cnt, value & mask),
            Register::Ccr1 | Register::Ccr2 | Register::Ccr3 | Register::Ccr4 => {
                let channel = Channel::ALL[register.index() - Register::Ccr1.index()];
                self.set(register, value & mask);
                if !self.ccr_preloaded(channel) {
                    self.active_ccr[channel as usize] = value & mask;
                }
            }
            _ => self.set(register, value),
        }
    }

    fn enable_clock(&mut self) {
        self.clock_enabled = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::{CounterMode, TimeBase};

    fn pwm_timer(kind: Kind, psc: u16, arr: u32) -> RegisterModel {
        let mut timer = RegisterModel::new(kind);
        timer.init_time_base(&TimeBase::new(psc, arr));
        timer.output_compare_mode(Channel::C1, OutputCompareMode::Pwm1);
        timer.output_enable(Channel::C1);
        timer
    }

    /// Timer input clocks during which the channel output was high, over `ticks` clocks.
    fn high_ticks(timer: &mut RegisterModel, channel: Channel, ticks: u32) -> u32 {
        let mut high = 0;
        for _ in 0..ticks {
            if timer.output_level(channel) {
                high += 1;
            }
            timer.tick();
        }
        high
    }

    #[test]
    fn reset_state() {
        let timer = RegisterModel::new(Kind::GeneralPurpose);
        assert_eq!(timer.read_arr(), 0xFFFF);
        assert_eq!(timer.counter(), 0);
        assert!(!timer.clock_enabled());
        assert!(!timer.output_level(Channel::C1));

        let timer = RegisterModel::new(Kind::GeneralPurpose32);
        assert_eq!(timer.active_period(), u32::MAX);
    }

    #[test]
    fn prescaler_waits_for_update_event() {
        let mut timer = RegisterModel::new(Kind::GeneralPurpose);
        timer.write_psc(4);
        assert_eq!(timer.read_psc(), 4);
        assert_eq!(timer.active_prescaler(), 0);
        timer.generate_update();
        assert_eq!(timer.active_prescaler(), 4);
        assert_eq!(timer.update_events(), 1);
        assert!(timer.read_update_interrupt_flag());
    }

    #[test]
    fn status_flag_clears_on_zero_write() {
        let mut timer = RegisterModel::new(Kind::GeneralPurpose);
        timer.generate_update();
        assert!(timer.read_update_interrupt_flag());
        timer.clear_update_interrupt_flag();
        assert!(!timer.read_update_interrupt_flag());
    }

    #[test]
    fn sixteen_bit_registers_truncate() {
        let mut timer = RegisterModel::new(Kind::GeneralPurpose);
        timer.write_arr(0x1_2345);
        timer.write_ccr(Channel::C2, 0x1_0001);
        assert_eq!(timer.read_arr(), 0x2345);
        assert_eq!(timer.read_ccr(Channel::C2), 1);

        let mut wide = RegisterModel::new(Kind::GeneralPurpose32);
        wide.write_arr(0x1_2345);
        assert_eq!(wide.read_arr(), 0x1_2345);
    }

    #[test]
    fn counter_stays_put_until_enabled() {
        let mut timer = pwm_timer(Kind::GeneralPurpose, 0, 9);
        timer.run(5);
        assert_eq!(timer.counter(), 0);
        timer.enable();
        timer.run(5);
        assert_eq!(timer.counter(), 5);
        timer.disable();
        timer.run(5);
        assert_eq!(timer.counter(), 5);
    }

    #[test]
    fn up_counter_wraps_after_period() {
        let mut timer = pwm_timer(Kind::GeneralPurpose, 0, 9);
        timer.enable();
        let before = timer.update_events();
        timer.run(10);
        assert_eq!(timer.counter(), 0);
        assert_eq!(timer.update_events(), before + 1);
    }

    #[test]
    fn prescaler_divides_counter_clock() {
        let mut timer = pwm_timer(Kind::GeneralPurpose, 4, 665);
        timer.enable();
        timer.run(5 * 100);
        assert_eq!(timer.counter(), 100);
        let before = timer.update_events();
        timer.run(5 * 566);
        assert_eq!(timer.counter(), 0);
        assert_eq!(timer.update_events(), before + 1);
    }

    #[test]
    fn pwm1_high_time_matches_compare() {
        let mut timer = pwm_timer(Kind::GeneralPurpose, 0, 9);
        timer.write_ccr(Channel::C1, 3);
        timer.enable();
        assert_eq!(high_ticks(&mut timer, Channel::C1, 10), 3);
        assert_eq!(high_ticks(&mut timer, Channel::C1, 20), 6);
    }

    #[test]
    fn compare_above_period_is_always_high() {
        let mut timer = pwm_timer(Kind::GeneralPurpose, 0, 9);
        timer.write_ccr(Channel::C1, 10);
        timer.enable();
        assert_eq!(high_ticks(&mut timer, Channel::C1, 10), 10);
    }

    #[test]
    fn zero_compare_is_always_low() {
        let mut timer = pwm_timer(Kind::GeneralPurpose, 0, 9);
        timer.write_ccr(Channel::C1, 0);
        timer.enable();
        assert_eq!(high_ticks(&mut timer, Channel::C1, 10), 0);
    }

    #[test]
    fn pwm2_and_polarity_invert() {
        let mut timer = pwm_timer(Kind::GeneralPurpose, 0, 9);
        timer.write_ccr(Channel::C1, 3);
        timer.output_compare_mode(Channel::C1, OutputCompareMode::Pwm2);
        timer.enable();
        assert_eq!(high_ticks(&mut timer, Channel::C1, 10), 7);
        timer.polarity(Channel::C1, true);
        assert_eq!(high_ticks(&mut timer, Channel::C1, 10), 3);
    }

    #[test]
    fn forced_modes_ignore_counter() {
        let mut timer = pwm_timer(Kind::GeneralPurpose, 0, 9);
        timer.output_compare_mode(Channel::C1, OutputCompareMode::ForceActive);
        timer.enable();
        assert_eq!(high_ticks(&mut timer, Channel::C1, 10), 10);
        timer.output_compare_mode(Channel::C1, OutputCompareMode::ForceInactive);
        assert_eq!(high_ticks(&mut timer, Channel::C1, 10), 0);
    }

    #[test]
    fn toggle_mode_flips_on_match() {
        let mut timer = pwm_timer(Kind::GeneralPurpose, 0, 9);
        timer.output_compare_mode(Channel::C1, OutputCompareMode::Toggle);
        timer.write_ccr(Channel::C1, 5);
        timer.enable();
        assert_eq!(high_ticks(&mut timer, Channel::C1, 10), 5);
        assert_eq!(high_ticks(&mut timer, Channel::C1, 10), 5);
    }

    #[test]
    fn down_counter_reloads_from_period() {
        let mut timer = RegisterModel::new(Kind::GeneralPurpose);
        let mut config = TimeBase::new(0, 9);
        config.counter_mode = CounterMode::Down;
        timer.init_time_base(&config);
        assert_eq!(timer.counter(), 9);
        timer.output_compare_mode(Channel::C1, OutputCompareMode::Pwm1);
        timer.output_enable(Channel::C1);
        timer.write_ccr(Channel::C1, 3);
        timer.enable();
        // Active while CNT <= CCR when counting down.
        assert_eq!(high_ticks(&mut timer, Channel::C1, 10), 4);
    }

    #[test]
    fn center_aligned_counts_up_then_down() {
        let mut timer = RegisterModel::new(Kind::GeneralPurpose);
        let mut config = TimeBase::new(0, 4);
        config.counter_mode = CounterMode::CenterAligned1;
        timer.init_time_base(&config);
        timer.enable();
        let mut seen = Vec::new();
        for _ in 0..8 {
            timer.tick();
            seen.push(timer.counter());
        }
        assert_eq!(seen, vec![1, 2, 3, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn advanced_timer_needs_main_output() {
        let mut timer = RegisterModel::new(Kind::Advanced);
        timer.init_time_base(&TimeBase::new(0, 9));
        timer.output_compare_mode(Channel::C1, OutputCompareMode::ForceActive);
        timer.write(Register::Ccer, ccer::CCE);
        assert!(!timer.output_level(Channel::C1));
        timer.output_enable(Channel::C1);
        assert!(timer.output_level(Channel::C1));
    }

    #[test]
    fn basic_timer_ignores_compare_registers() {
        let mut timer = RegisterModel::new(Kind::Basic);
        timer.write_ccr(Channel::C1, 7);
        assert_eq!(timer.read_ccr(Channel::C1), 0);
        assert_eq!(timer.active_compare(Channel::C1), 0);
    }

    #[test]
    fn missing_registers_read_zero() {
        let mut timer = RegisterModel::new(Kind::GeneralPurpose);
        timer.write(Register::Bdtr, bdtr::MOE);
        timer.write(Register::Rcr, 3);
        assert_eq!(timer.read(Register::Bdtr), 0);
        assert_eq!(timer.read(Register::Rcr), 0);
        assert_eq!(timer.writes().len(), 2);

        let mut timer = RegisterModel::new(Kind::Advanced);
        timer.write(Register::Bdtr, bdtr::MOE);
        assert_eq!(timer.read(Register::Bdtr), bdtr::MOE);
    }

    #[test]
    fn preloaded_registers_change_on_period_boundary() {
        let mut timer = pwm_timer(Kind::GeneralPurpose, 0, 9);
        timer.ccr_preload(Channel::C1, true);
        timer.arr_preload(true);
        timer.write_ccr(Channel::C1, 2);
        timer.generate_update();
        timer.enable();

        timer.run(4);
        timer.write_arr(19);
        timer.write_ccr(Channel::C1, 8);
        assert_eq!(timer.active_period(), 9);
        assert_eq!(timer.active_compare(Channel::C1), 2);

        // Rest of the current period still runs on the old values.
        assert_eq!(high_ticks(&mut timer, Channel::C1, 6), 0);
        assert_eq!(timer.active_period(), 19);
        assert_eq!(timer.active_compare(Channel::C1), 8);
        assert_eq!(high_ticks(&mut timer, Channel::C1, 20), 8);
    }

    #[test]
    fn unbuffered_compare_applies_immediately() {
        let mut timer = pwm_timer(Kind::GeneralPurpose, 0, 9);
        timer.write_ccr(Channel::C1, 4);
        assert_eq!(timer.active_compare(Channel::C1), 4);
    }

    #[test]
    fn writes_are_recorded_in_order() {
        let mut timer = RegisterModel::new(Kind::GeneralPurpose);
        timer.write_arr(9);
        timer.write_psc(1);
        assert_eq!(
            timer.writes(),
            &[(Register::Arr, 9), (Register::Psc, 1)]
        );
        timer.clear_writes();
        assert!(timer.writes().is_empty());
    }
}
