/// GPIO pin mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Input(Pull),
    Output(OutputType, Speed, Pull),
    AlternateFunction(OutputType, Speed, Pull),
    Analog,
}

/// GPIO switching speed.
///
/// Lower speeds can reduce ringing.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Speed {
    Low = 0,
    Medium = 1,
    High = 2,
    VeryHigh = 3,
}

/// GPIO pull resistor.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pull {
    None = 0,
    Up = 1,
    Down = 2,
}

/// GPIO output driver.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputType {
    PushPull = 0,
    OpenDrain = 1,
}

/// GPIO alternate function mode.
///
/// Subset of the GPIO [modes][Mode].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlternateFunctionOutputMode {
    PushPull(Speed),
    OpenDrain(Speed),
}

/// GPIO output mode.
///
/// Subset of the GPIO [modes][Mode].
#[derive(Clone, Copy, Debug)]
pub enum OutputMode {
    PushPull(Speed),
    OpenDrain(Speed),
}

/// Alternate function number, as selected in the AFRL/AFRH registers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Af(pub u8);

/// Alternate functions of the timer outputs.
pub mod af {
    use super::Af;

    pub const TIM1_2: Af = Af(1);
    pub const TIM3_5: Af = Af(2);
    pub const TIM8_11: Af = Af(3);
}

impl Mode {
    /// Two bit MODER field.
    #[inline]
    pub fn moder(self) -> u32 {
        match self {
            Mode::Input(_) => 0b00,
            Mode::Output(..) => 0b01,
            Mode::AlternateFunction(..) => 0b10,
            Mode::Analog => 0b11,
        }
    }

    /// One bit OTYPER field.
    #[inline]
    pub fn otyper(self) -> u32 {
        match self {
            Mode::Output(otype, ..) | Mode::AlternateFunction(otype, ..) => otype as u32,
            _ => 0,
        }
    }

    /// Two bit OSPEEDR field.
    #[inline]
    pub fn ospeedr(self) -> u32 {
        match self {
            Mode::Output(_, speed, _) | Mode::AlternateFunction(_, speed, _) => speed as u32,
            _ => 0,
        }
    }

    /// Two bit PUPDR field.
    #[inline]
    pub fn pupdr(self) -> u32 {
        match self {
            Mode::Input(pull) | Mode::Output(_, _, pull) | Mode::AlternateFunction(_, _, pull) => {
                pull as u32
            }
            Mode::Analog => 0,
        }
    }

    /// Same mode with a different pull resistor.
    #[inline]
    pub fn with_pull(self, pull: Pull) -> Self {
        match self {
            Mode::Input(_) => Mode::Input(pull),
            Mode::Output(otype, speed, _) => Mode::Output(otype, speed, pull),
            Mode::AlternateFunction(otype, speed, _) => Mode::AlternateFunction(otype, speed, pull),
            Mode::Analog => Mode::Analog,
        }
    }
}

impl Into<Mode> for AlternateFunctionOutputMode {
    #[inline]
    fn into(self) -> Mode {
        match self {
            Self::PushPull(speed) => Mode::AlternateFunction(OutputType::PushPull, speed, Pull::None),
            Self::OpenDrain(speed) => {
                Mode::AlternateFunction(OutputType::OpenDrain, speed, Pull::None)
            }
        }
    }
}

impl Into<Mode> for OutputMode {
    #[inline]
    fn into(self) -> Mode {
        match self {
            Self::PushPull(speed) => Mode::Output(OutputType::PushPull, speed, Pull::None),
            Self::OpenDrain(speed) => Mode::Output(OutputType::OpenDrain, speed, Pull::None),
        }
    }
}
