//! `log` backend printing over semihosting.

use cortex_m_semihosting::hprintln;
use log::{LevelFilter, Log, Metadata, Record};

/// Most verbose level printed. Per-tick trace records would stall the control loop.
const LEVEL: LevelFilter = LevelFilter::Debug;

struct Semihosting;

static LOGGER: Semihosting = Semihosting;

impl Log for Semihosting {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= LEVEL
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            hprintln!("[{:5}][{}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

/// Install the logger in debug builds. Release builds log nothing.
pub fn init() {
    if cfg!(debug_assertions) && log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LEVEL);
    }
}
