use stm32f4xx_hal::pac::{tim1, tim2, tim3, tim5, tim6};
use stm32f4xx_hal::pac::{TIM1, TIM2, TIM3, TIM4, TIM5, TIM6, TIM7, TIM8};

use super::registers::Register;
use super::timer::{Kind, Registers, Timer};

/// Pointer to the register block of each timer family.
#[derive(Clone, Copy)]
enum TimerPtr {
    Tim18(*const tim1::RegisterBlock),
    Tim2(*const tim2::RegisterBlock),
    Tim34(*const tim3::RegisterBlock),
    Tim5(*const tim5::RegisterBlock),
    Tim67(*const tim6::RegisterBlock),
}

/// Register access of one register block family.
///
/// Plain registers map to block fields, the mode registers go through their output compare
/// view and the compare registers are indexed. EGR is write only. Registers missing from the
/// block read as zero and ignore writes, matching [Kind::implements].
macro_rules! block {
    (
        $read:ident, $write:ident, $block:ty,
        [$($register:ident => $field:ident),*],
        [$($mode:ident => $view:ident),*],
        [$($compare:ident => $index:expr),*]
    ) => {
        #[inline]
        unsafe fn $read(ptr: *const $block, register: Register) -> u32 {
            #[allow(unreachable_patterns)]
            match register {
                $(Register::$register => (*ptr).$field.read().bits(),)*
                $(Register::$mode => (*ptr).$view().read().bits(),)*
                $(Register::$compare => (*ptr).ccr[$index].read().bits(),)*
                _ => 0,
            }
        }

        #[inline]
        #[allow(unused_unsafe)]
        unsafe fn $write(ptr: *const $block, register: Register, value: u32) {
            #[allow(unreachable_patterns)]
            match register {
                Register::Egr => (*ptr).egr.write(|w| unsafe { w.bits(value) }),
                $(Register::$register => (*ptr).$field.write(|w| unsafe { w.bits(value) }),)*
                $(Register::$mode => (*ptr).$view().write(|w| unsafe { w.bits(value) }),)*
                $(Register::$compare => (*ptr).ccr[$index].write(|w| unsafe { w.bits(value) }),)*
                _ => (),
            }
        }
    };
}

block!(
    read_tim18, write_tim18, tim1::RegisterBlock,
    [Cr1 => cr1, Cr2 => cr2, Smcr => smcr, Dier => dier, Sr => sr, Ccer => ccer, Cnt => cnt,
     Psc => psc, Arr => arr, Rcr => rcr, Bdtr => bdtr],
    [Ccmr1 => ccmr1_output, Ccmr2 => ccmr2_output],
    [Ccr1 => 0, Ccr2 => 1, Ccr3 => 2, Ccr4 => 3]
);

block!(
    read_tim2, write_tim2, tim2::RegisterBlock,
    [Cr1 => cr1, Cr2 => cr2, Smcr => smcr, Dier => dier, Sr => sr, Ccer => ccer, Cnt => cnt,
     Psc => psc, Arr => arr],
    [Ccmr1 => ccmr1_output, Ccmr2 => ccmr2_output],
    [Ccr1 => 0, Ccr2 => 1, Ccr3 => 2, Ccr4 => 3]
);

block!(
    read_tim34, write_tim34, tim3::RegisterBlock,
    [Cr1 => cr1, Cr2 => cr2, Smcr => smcr, Dier => dier, Sr => sr, Ccer => ccer, Cnt => cnt,
     Psc => psc, Arr => arr],
    [Ccmr1 => ccmr1_output, Ccmr2 => ccmr2_output],
    [Ccr1 => 0, Ccr2 => 1, Ccr3 => 2, Ccr4 => 3]
);

block!(
    read_tim5, write_tim5, tim5::RegisterBlock,
    [Cr1 => cr1, Cr2 => cr2, Smcr => smcr, Dier => dier, Sr => sr, Ccer => ccer, Cnt => cnt,
     Psc => psc, Arr => arr],
    [Ccmr1 => ccmr1_output, Ccmr2 => ccmr2_output],
    [Ccr1 => 0, Ccr2 => 1, Ccr3 => 2, Ccr4 => 3]
);

block!(
    read_tim67, write_tim67, tim6::RegisterBlock,
    [Cr1 => cr1, Cr2 => cr2, Dier => dier, Sr => sr, Cnt => cnt, Psc => psc, Arr => arr],
    [],
    []
);

impl Timer {
    #[inline]
    fn ptr(self) -> TimerPtr {
        match self {
            Timer::Tim1 => TimerPtr::Tim18(TIM1::ptr()),
            Timer::Tim8 => TimerPtr::Tim18(TIM8::ptr()),
            Timer::Tim2 => TimerPtr::Tim2(TIM2::ptr()),
            Timer::Tim3 => TimerPtr::Tim34(TIM3::ptr()),
            Timer::Tim4 => TimerPtr::Tim34(TIM4::ptr()),
            Timer::Tim5 => TimerPtr::Tim5(TIM5::ptr()),
            Timer::Tim6 => TimerPtr::Tim67(TIM6::ptr()),
            Timer::Tim7 => TimerPtr::Tim67(TIM7::ptr()),
        }
    }
}

/// The timer peripherals themselves.
impl Registers for Timer {
    #[inline]
    fn kind(&self) -> Kind {
        self.features()
    }

    #[inline]
    fn read(&self, register: Register) -> u32 {
        unsafe {
            match self.ptr() {
                TimerPtr::Tim18(ptr) => read_tim18(ptr, register),
                TimerPtr::Tim2(ptr) => read_tim2(ptr, register),
                TimerPtr::Tim34(ptr) => read_tim34(ptr, register),
                TimerPtr::Tim5(ptr) => read_tim5(ptr, register),
                TimerPtr::Tim67(ptr) => read_tim67(ptr, register),
            }
        }
    }

    #[inline]
    fn write(&mut self, register: Register, value: u32) {
        unsafe {
            match self.ptr() {
                TimerPtr::Tim18(ptr) => write_tim18(ptr, register, value),
                TimerPtr::Tim2(ptr) => write_tim2(ptr, register, value),
                TimerPtr::Tim34(ptr) => write_tim34(ptr, register, value),
                TimerPtr::Tim5(ptr) => write_tim5(ptr, register, value),
                TimerPtr::Tim67(ptr) => write_tim67(ptr, register, value),
            }
        }
    }

    #[inline]
    fn enable_clock(&mut self) {
        crate::clock::enable(self.peripheral());
    }
}
