use haplink::board::{self, ChannelBinding, Layout, EXTENSION, PRIMARY, PRIMARY_CHANNELS};
use haplink::{Direction, Motors};
use nucleo::gpio::{self, model::PinModel, Pins};
use nucleo::timer::model::RegisterModel;
use nucleo::timer::registers::{ccer, ccmr, cr1, Register};
use nucleo::timer::{pwm, Channel, Kind, Registers};

/// Primary bank wiring with a 1000 count period.
static WIDE: Layout = Layout {
    config: pwm::Config::new(0, 1000),
    af: gpio::af::TIM3_5,
    channels: &PRIMARY_CHANNELS,
};

static EMPTY: Layout = Layout {
    config: pwm::Config::new(0, 1000),
    af: gpio::af::TIM3_5,
    channels: &[],
};

const FIVE: [ChannelBinding; 5] = [
    PRIMARY_CHANNELS[0],
    PRIMARY_CHANNELS[1],
    PRIMARY_CHANNELS[2],
    PRIMARY_CHANNELS[3],
    PRIMARY_CHANNELS[3],
];

static OVERSIZED: Layout = Layout {
    config: pwm::Config::new(0, 1000),
    af: gpio::af::TIM3_5,
    channels: &FIVE,
};

fn motors(layout: &'static Layout) -> Motors<RegisterModel, PinModel> {
    Motors::new(RegisterModel::new(Kind::GeneralPurpose), PinModel::new(), layout)
}

/// Timer clocks with channel 1 high, over one full period starting at the update event.
fn high_ticks_per_period(motors: &mut Motors<RegisterModel, PinModel>) -> u32 {
    let timer = motors.timer_mut();
    let period = timer.active_period() + 1;
    let mut high = 0;
    for _ in 0..period {
        if timer.output_level(Channel::C1) {
            high += 1;
        }
        timer.tick();
    }
    high
}

#[test]
fn half_duty_end_to_end() {
    let mut motors = motors(&WIDE);
    motors.set_duty_cycle(1, 0.5);

    let timer = motors.pwm().timer();
    assert_eq!(timer.read_ccr(Channel::C1), 500);
    assert_ne!(timer.read(Register::Ccer) & ccer::CCE, 0);
    assert_ne!(timer.read(Register::Ccmr1) & ccmr::OCPE, 0);
    assert_ne!(timer.read(Register::Cr1) & cr1::ARPE, 0);
    assert_ne!(timer.read(Register::Cr1) & cr1::CEN, 0);
    assert_eq!(motors.direction(1), Some(Direction::Forward));
}

#[test]
fn full_duty_is_period() {
    let mut motors = motors(&WIDE);
    motors.set_duty_cycle(2, 1.0);
    assert_eq!(motors.compare(2), 1000);
    motors.set_duty_cycle(2, -1.0);
    assert_eq!(motors.compare(2), 1000);
    motors.set_duty_cycle(2, 12.0);
    assert_eq!(motors.compare(2), 1000);
    assert_eq!(motors.duty(2), 12.0);
}

#[test]
fn duty_sweep_is_linear() {
    let mut motors = motors(&WIDE);
    for motor in 1..=4 {
        for i in 0..=1000u32 {
            let duty = i as f64 / 1000.0;
            motors.set_duty_cycle(motor, duty);
            assert_eq!(motors.compare(motor), (duty * 1000.0) as u32);
        }
    }
}

#[test]
fn torque_scaling() {
    let mut motors = motors(&WIDE);
    motors.set_torque(1, 0.01);
    let expected = (0.01 * board::TORQUE_GAIN * 1000.0) as u32;
    assert_eq!(motors.compare(1), expected);
    assert_eq!(motors.compare(1), 651);
    assert_eq!(motors.direction(1), Some(Direction::Forward));
    assert!(motors.pins().read(gpio::PC10));
    assert!(!motors.pins().read(gpio::PC11));
}

#[test]
fn stock_torque_scaling() {
    let mut motors = motors(&PRIMARY);
    motors.set_torque(1, -0.01);
    assert_eq!(motors.compare(1), 433);
    assert_eq!(motors.direction(1), Some(Direction::Reverse));
    assert!(motors.pins().read(gpio::PC11));
}

#[test]
fn sign_changes_flip_the_bridge() {
    let mut motors = motors(&PRIMARY);
    for &(value, direction) in [
        (0.2, Direction::Forward),
        (-0.2, Direction::Reverse),
        (0.0, Direction::Forward),
        (-0.7, Direction::Reverse),
    ]
    .iter()
    {
        motors.set_duty_cycle(3, value);
        assert_eq!(motors.direction(3), Some(direction));
        let forward = motors.pins().read(gpio::PD1);
        let reverse = motors.pins().read(gpio::PD0);
        assert_ne!(forward, reverse);
        assert_eq!(forward, direction == Direction::Forward);
    }
}

#[test]
fn direction_pins_low_until_first_command() {
    let motors = motors(&PRIMARY);
    let writes = motors.pins().writes();
    assert_eq!(writes.len(), 6);
    assert!(writes.iter().all(|w| !w.1));
}

#[test]
fn counter_starts_after_last_channel() {
    let motors = motors(&PRIMARY);
    let writes = motors.pwm().timer().writes();
    let start = writes
        .iter()
        .position(|w| w.0 == Register::Cr1 && w.1 & cr1::CEN != 0)
        .unwrap();
    assert_eq!(start, writes.len() - 1);
    let last_ccr4 = writes.iter().rposition(|w| w.0 == Register::Ccr4).unwrap();
    assert!(last_ccr4 < start);
}

#[test]
fn compare_written_mid_period_waits_for_update() {
    let mut motors = motors(&WIDE);
    motors.set_duty_cycle(1, 0.2);
    // Let the zero compare of the configuration run out.
    high_ticks_per_period(&mut motors);
    high_ticks_per_period(&mut motors);
    assert_eq!(motors.pwm().timer().active_compare(Channel::C1), 200);

    motors.timer_mut().run(300);
    motors.set_duty_cycle(1, 0.8);
    assert_eq!(motors.compare(1), 800);
    assert_eq!(motors.pwm().timer().active_compare(Channel::C1), 200);

    // The rest of the period keeps the old compare: counter is past 200, output stays low.
    let timer = motors.timer_mut();
    for _ in 300..=1000 {
        assert!(!timer.output_level(Channel::C1));
        timer.tick();
    }
    assert_eq!(timer.active_compare(Channel::C1), 800);
    assert_eq!(high_ticks_per_period(&mut motors), 800);
}

#[test]
fn extension_bank() {
    let mut motors = motors(&EXTENSION);
    assert_eq!(motors.count(), 3);
    assert!(motors.pins().is_enabled(gpio::Port::G));
    assert_eq!(motors.pins().af(gpio::PD12), gpio::af::TIM3_5);

    motors.set_torque(3, 0.005);
    assert!(motors.pins().read(gpio::PG9));
    assert!(!motors.pins().read(gpio::PG8));
    assert_eq!(motors.compare(3), (0.005 * board::TORQUE_GAIN * 665.0) as u32);
}

#[test]
fn vibration_status() {
    let mut motors = motors(&PRIMARY);
    motors.vibrate(4, 0.4);
    assert_eq!(motors.vibration_amplitude(4), 0.4);
    assert_eq!(motors.compare(4), 266);
    motors.vibrate(4, -3.0);
    assert_eq!(motors.compare(4), 0);
    motors.vibrate(4, 0.4);
    motors.stop_vibration(4);
    assert_eq!(motors.vibration_amplitude(4), 0.0);
    assert_eq!(motors.compare(4), 0);
}

#[test]
#[should_panic(expected = "layout must have")]
fn empty_layout_is_rejected() {
    motors(&EMPTY);
}

#[test]
#[should_panic(expected = "layout must have")]
fn oversized_layout_is_rejected() {
    motors(&OVERSIZED);
}

#[test]
#[should_panic(expected = "no output compare channels")]
fn basic_timer_is_rejected() {
    Motors::new(RegisterModel::new(Kind::Basic), PinModel::new(), &PRIMARY);
}

#[test]
fn pin_model_sees_every_configured_pin() {
    let motors = motors(&PRIMARY);
    let pins = motors.pins();
    for binding in PRIMARY.channels.iter() {
        assert!(pins.mode(binding.pwm_pin).is_some());
        if let Some(pair) = binding.direction {
            assert!(pins.mode(pair.forward).is_some());
            assert!(pins.mode(pair.reverse).is_some());
        }
    }
    assert!(!pins.read(board::LED));
}
