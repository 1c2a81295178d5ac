mod channel;

use super::timer::{Channel, Registers};
pub use super::timer::TimeBase as Config;
pub use channel::{ChannelConfig, Polarity};

/// PWM generation on the channels of one timer.
#[derive(Debug)]
pub struct Pwm<T: Registers> {
    timer: T,
}

impl Config {
    #[inline]
    pub fn make<T: Registers>(self, timer: T) -> Pwm<T> {
        Pwm::new(timer, self)
    }
}

impl<T: Registers> Pwm<T> {
    /// Enable the timer clock and program its time base. The counter is left stopped.
    #[inline]
    pub fn new(mut timer: T, config: Config) -> Self {
        timer.enable_clock();
        timer.init_time_base(&config);
        Self { timer }
    }

    /// Configure one output compare channel.
    ///
    /// Registers are written in this order: output disable, compare mode, compare value,
    /// polarity and output enable, then compare and auto-reload preload. The output is off
    /// while the mode is rewritten and the compare value applies at once, before preload is
    /// turned on. Panics on timers without channels.
    pub fn configure(&mut self, channel: Channel, config: ChannelConfig) {
        assert!(
            self.timer.kind().channels() > 0,
            "{:?} timer has no output compare channels",
            self.timer.kind()
        );
        self.timer.output_disable(channel);
        self.timer.output_compare_mode(channel, config.mode);
        self.timer.write_ccr(channel, config.compare);
        self.timer
            .polarity(channel, config.polarity == Polarity::ActiveLow);
        if config.output {
            self.timer.output_enable(channel);
        }
        self.timer.ccr_preload(channel, true);
        self.timer.arr_preload(true);
        log::debug!(
            "channel {} {:?} compare {}",
            channel.number(),
            config.mode,
            config.compare
        );
    }

    /// Configure the channel for active high PWM mode 1.
    #[inline]
    pub fn configure_pwm(&mut self, channel: Channel, compare: u32) {
        self.configure(channel, ChannelConfig::pwm(compare));
    }

    /// Start the counter.
    #[inline]
    pub fn start(&mut self) {
        self.timer.enable();
    }

    /// Stop the counter.
    #[inline]
    pub fn stop(&mut self) {
        self.timer.disable();
    }

    #[inline]
    pub fn read_counter_value(&self) -> u32 {
        self.timer.read_counter_value()
    }

    #[inline]
    pub fn write_ccr(&mut self, channel: Channel, ccr: u32) {
        self.timer.write_ccr(channel, ccr);
    }

    #[inline]
    pub fn read_ccr(&self, channel: Channel) -> u32 {
        self.timer.read_ccr(channel)
    }

    #[inline]
    pub fn read_arr(&self) -> u32 {
        self.timer.read_arr()
    }

    #[inline]
    pub fn timer(&self) -> &T {
        &self.timer
    }

    #[inline]
    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    /// Give the timer back.
    #[inline]
    pub fn release(self) -> T {
        self.timer
    }
}

/// Duty is expressed in counter ticks, so `get_max_duty` is the auto-reload value.
impl<T: Registers> embedded_hal::Pwm for Pwm<T> {
    type Channel = Channel;
    type Time = u32;
    type Duty = u32;

    #[inline]
    fn disable(&mut self, channel: Channel) {
        self.timer.output_disable(channel);
    }

    #[inline]
    fn enable(&mut self, channel: Channel) {
        self.timer.output_enable(channel);
    }

    /// Auto-reload value.
    #[inline]
    fn get_period(&self) -> u32 {
        self.timer.read_arr()
    }

    #[inline]
    fn get_duty(&self, channel: Channel) -> u32 {
        self.timer.read_ccr(channel)
    }

    #[inline]
    fn get_max_duty(&self) -> u32 {
        self.timer.read_arr()
    }

    #[inline]
    fn set_duty(&mut self, channel: Channel, duty: u32) {
        self.timer.write_ccr(channel, duty);
    }

    #[inline]
    fn set_period<P>(&mut self, period: P)
    where
        P: Into<u32>,
    {
        self.timer.write_arr(period.into());
    }
}
