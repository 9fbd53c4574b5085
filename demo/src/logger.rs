//! Minimal stderr logger, switched on by `CLOPT_DEMO_LOG=<level>`.

use std::io::Write;

use log::{LevelFilter, Log, Metadata, Record};

pub const LOG_ENV: &str = "CLOPT_DEMO_LOG";

struct StderrLogger {
    level: LevelFilter,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let stderr = std::io::stderr();
        let _ = write!(
            stderr.lock(),
            "[{:5}] [{}] - {}\n",
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Level named by `value`; `None` when unset, unknown or `off`.
pub fn level_from(value: Option<&str>) -> Option<LevelFilter> {
    value?
        .trim()
        .parse::<LevelFilter>()
        .ok()
        .filter(|level| *level != LevelFilter::Off)
}

pub fn init_from_env() {
    let value = std::env::var(LOG_ENV).ok();
    let Some(level) = level_from(value.as_deref()) else {
        return;
    };
    if log::set_boxed_logger(Box::new(StderrLogger { level })).is_ok() {
        log::set_max_level(level);
    }
}
