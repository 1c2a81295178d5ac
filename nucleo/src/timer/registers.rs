//! Timer register map and bit fields.
//!
//! Registers are named after the fields of the device register blocks, basic timers simply
//! leave the capture/compare registers unimplemented.

/// Timer registers.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Register {
    Cr1,
    Cr2,
    Smcr,
    Dier,
    Sr,
    Egr,
    Ccmr1,
    Ccmr2,
    Ccer,
    Cnt,
    Psc,
    Arr,
    Rcr,
    Ccr1,
    Ccr2,
    Ccr3,
    Ccr4,
    Bdtr,
}

impl Register {
    /// Number of registers in the map.
    pub const COUNT: usize = 18;

    /// Position in a register array.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Control register 1.
pub mod cr1 {
    pub const CEN: u32 = 1 << 0;
    pub const DIR: u32 = 1 << 4;
    pub const CMS: u32 = 0b11 << 5;
    pub const ARPE: u32 = 1 << 7;
    pub const CKD: u32 = 0b11 << 8;
}

/// Status register.
pub mod sr {
    pub const UIF: u32 = 1 << 0;
}

/// Event generation register.
pub mod egr {
    pub const UG: u32 = 1 << 0;
}

/// Output compare half of a capture/compare mode register.
///
/// Fields of channel 1 and 3, shift by [Slot::ccmr_shift] for the others.
pub mod ccmr {
    pub const CCS: u32 = 0b11 << 0;
    pub const OCPE: u32 = 1 << 3;
    pub const OCM: u32 = 0b111 << 4;
    pub const OCM_SHIFT: u8 = 4;
}

/// Capture/compare enable register.
///
/// Fields of channel 1, shift by [Slot::ccer_shift] for the others.
pub mod ccer {
    pub const CCE: u32 = 1 << 0;
    pub const CCP: u32 = 1 << 1;
}

/// Break and dead-time register.
pub mod bdtr {
    pub const MOE: u32 = 1 << 15;
}

/// Register location of one capture/compare channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot {
    /// Mode register holding the channel.
    pub ccmr: Register,
    /// Shift of the channel byte in [Slot::ccmr].
    pub ccmr_shift: u8,
    /// Shift of the channel nibble in CCER.
    pub ccer_shift: u8,
    /// Compare register.
    pub ccr: Register,
}

/// Slots of channels 1 to 4.
///
/// Odd channels take the low byte and even channels the high byte of their mode register,
/// CCER has one nibble per channel.
pub const SLOTS: [Slot; 4] = [
    Slot {
        ccmr: Register::Ccmr1,
        ccmr_shift: 0,
        ccer_shift: 0,
        ccr: Register::Ccr1,
    },
    Slot {
        ccmr: Register::Ccmr1,
        ccmr_shift: 8,
        ccer_shift: 4,
        ccr: Register::Ccr2,
    },
    Slot {
        ccmr: Register::Ccmr2,
        ccmr_shift: 0,
        ccer_shift: 8,
        ccr: Register::Ccr3,
    },
    Slot {
        ccmr: Register::Ccmr2,
        ccmr_shift: 8,
        ccer_shift: 12,
        ccr: Register::Ccr4,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ccer_nibble_follows_channel_number() {
        for (i, slot) in SLOTS.iter().enumerate() {
            assert_eq!(slot.ccer_shift as usize, 4 * i);
        }
    }

    #[test]
    fn odd_channels_use_low_byte() {
        assert_eq!(SLOTS[0].ccmr, Register::Ccmr1);
        assert_eq!(SLOTS[0].ccmr_shift, 0);
        assert_eq!(SLOTS[1].ccmr, Register::Ccmr1);
        assert_eq!(SLOTS[1].ccmr_shift, 8);
        assert_eq!(SLOTS[2].ccmr, Register::Ccmr2);
        assert_eq!(SLOTS[2].ccmr_shift, 0);
        assert_eq!(SLOTS[3].ccmr, Register::Ccmr2);
        assert_eq!(SLOTS[3].ccmr_shift, 8);
    }

    #[test]
    fn compare_registers_follow_channel_order() {
        let ccr: Vec<usize> = SLOTS.iter().map(|s| s.ccr.index()).collect();
        let first = Register::Ccr1.index();
        assert_eq!(ccr, vec![first, first + 1, first + 2, first + 3]);
    }

    #[test]
    fn index_covers_the_map() {
        assert_eq!(Register::Cr1.index(), 0);
        assert_eq!(Register::Bdtr.index(), Register::COUNT - 1);
    }
}
