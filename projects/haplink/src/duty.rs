//! Duty cycle to compare count conversion.

use embedded_hal::Pwm;
use nucleo::timer::Channel;

/// Compare count for a duty cycle in `[0, 1]` and the given period.
///
/// Out of range duty cycles saturate, NaN gives zero.
#[inline]
pub fn compare_count(duty: f64, period: u32) -> u32 {
    (duty.clamp(0.0, 1.0) * period as f64) as u32
}

/// Duty cycle for a motor torque in Nm, through the motor calibration gain.
#[inline]
pub fn torque_to_duty(torque: f64, gain: f64) -> f64 {
    torque * gain
}

/// Write the duty cycle to the channel, and return the compare count.
///
/// The period is the maximum duty of the output, its auto-reload value.
pub fn set_duty_cycle<P>(pwm: &mut P, channel: Channel, duty: f64) -> u32
where
    P: Pwm<Channel = Channel, Duty = u32>,
{
    let count = compare_count(duty, pwm.get_max_duty());
    pwm.set_duty(channel, count);
    log::trace!("channel {} duty {} count {}", channel.number(), duty, count);
    count
}
