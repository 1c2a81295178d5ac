use super::super::timer::OutputCompareMode;

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Polarity {
    ActiveHigh = 0,
    ActiveLow = 1,
}

/// Output compare channel configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelConfig {
    pub mode: OutputCompareMode,
    pub polarity: Polarity,
    /// Drive the pin once configured.
    pub output: bool,
    /// Initial compare value.
    pub compare: u32,
}

impl ChannelConfig {
    /// Active high PWM mode 1 with the output enabled.
    pub const fn pwm(compare: u32) -> Self {
        Self {
            mode: OutputCompareMode::Pwm1,
            polarity: Polarity::ActiveHigh,
            output: true,
            compare,
        }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self::pwm(0)
    }
}
