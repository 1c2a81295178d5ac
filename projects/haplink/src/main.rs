#![no_main]
#![no_std]

mod logger;

extern crate panic_halt;

use cortex_m_rt::entry;
use cortex_m_semihosting::hprintln;
use haplink::board;
use haplink::Motors;
use nucleo::timer::Registers;
use nucleo::{clock, delay, gpio, Led};

/// PWM update events per control tick, 25kHz down to 1kHz.
const UPDATES_PER_TICK: u32 = 25;

/// Control ticks per LED toggle:
const LED_TICKS: u32 = 500;

/// GPIO mode for the LED pin.
const LED_MODE: gpio::OutputMode = gpio::OutputMode::PushPull(gpio::Speed::Low);

#[entry]
fn main() -> ! {
    if cfg!(debug_assertions) {
        hprintln!("Hello Haplink!");
    }

    // System setup:
    unsafe {
        clock::init();
    }
    logger::init();

    // Wait for peripherals to enable.
    delay::millis(1);

    // LED:
    let mut led = Led::new(gpio::Hardware, board::LED, LED_MODE);
    led.on();

    // Motor banks.
    let mut motors = Motors::new(board::PRIMARY_TIMER, gpio::Hardware, &board::PRIMARY);
    let mut extension = Motors::new(board::EXTENSION_TIMER, gpio::Hardware, &board::EXTENSION);
    let timer_clock = board::PRIMARY_TIMER.peripheral().bus().timer_speed();
    log::info!("PWM at {} Hz", board::PRIMARY.config.frequency(timer_clock));

    let mut updates: u32 = 0;
    let mut ticks: u32 = 0;

    // Entering main loop.
    loop {
        // TIM3 update flag paces the loop.
        let timer = motors.timer_mut();
        if !timer.read_update_interrupt_flag() {
            continue;
        }
        timer.clear_update_interrupt_flag();
        updates += 1;
        if updates < UPDATES_PER_TICK {
            continue;
        }
        updates = 0;

        // No controller attached: hold the DC motors at zero torque.
        for bank in [&mut motors, &mut extension].iter_mut() {
            for motor in 1..=bank.count() as u8 {
                if bank.layout().channels[motor as usize - 1].direction.is_some() {
                    bank.set_torque(motor, 0.0);
                }
            }
        }

        ticks = (ticks + 1) % LED_TICKS;
        if ticks == 0 {
            led.toggle();
        }
    }
}
