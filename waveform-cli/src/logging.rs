use log::{LevelFilter, Log, Metadata, Record};
use std::sync::OnceLock;

struct StderrLogger {
    level: LevelFilter,
    prefix: bool,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        if self.prefix {
            eprintln!("[{}] {}", record.level(), record.args());
        } else {
            eprintln!("{}", record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

fn level_from_env() -> LevelFilter {
    match std::env::var("RUST_LOG") {
        Ok(level) => match level.to_lowercase().as_str() {
            "off" => LevelFilter::Off,
            "error" => LevelFilter::Error,
            "info" => LevelFilter::Info,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            _ => LevelFilter::Warn,
        },
        Err(_) => LevelFilter::Warn,
    }
}

/// Install the stderr logger. `quiet` silences everything.
pub fn init(quiet: bool) -> LevelFilter {
    let level = if quiet {
        LevelFilter::Off
    } else {
        level_from_env()
    };

    let prefix = std::env::var("WAVEFORM_LOG_PREFIX")
        .map(|value| value != "0")
        .unwrap_or(true);

    let logger_ref = LOGGER.get_or_init(|| StderrLogger { level, prefix });
    if log::set_logger(logger_ref).is_ok() {
        log::set_max_level(logger_ref.level);
    }

    logger_ref.level
}
