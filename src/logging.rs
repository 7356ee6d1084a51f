//! Stderr logger for the `log` facade
//!
//! Records go to stderr so stdout stays free for frame output.

use chrono::Utc;
use log::{LevelFilter, Log, Metadata, Record};
use std::io::Write;

/// A logger that writes one line per record to stderr
pub struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        eprintln!("{}", format_record(record));
    }

    fn flush(&self) {
        std::io::stderr().flush().ok();
    }
}

/// Format as `YYYY-MM-DDTHH:MM:SS [LEVEL] file:line - message` (UTC)
pub fn format_record(record: &Record) -> String {
    format!(
        "{} [{}] {}:{} - {}",
        Utc::now().format("%Y-%m-%dT%H:%M:%S"),
        record.level(),
        record.file().unwrap_or("unknown"),
        record.line().unwrap_or(0),
        record.args()
    )
}

/// Level used when none is requested: Debug in debug builds, Info in release
pub fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Install the stderr logger.
///
/// Only the first call per process installs the logger; later calls just
/// adjust the max level.
pub fn init_stderr_logger(level: Option<LevelFilter>) {
    static LOGGER: StderrLogger = StderrLogger;

    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level.unwrap_or_else(default_level));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_record_structure() {
        let record = log::RecordBuilder::new()
            .level(log::Level::Info)
            .target("test")
            .file(Some("counter.rs"))
            .line(Some(42))
            .args(format_args!("rep 3 completed"))
            .build();

        let line = format_record(&record);

        // Timestamp prefix is YYYY-MM-DDTHH:MM:SS
        assert_eq!(&line[4..5], "-");
        assert_eq!(&line[10..11], "T");
        assert!(line.contains("[INFO]"));
        assert!(line.ends_with("counter.rs:42 - rep 3 completed"));
    }

    #[test]
    fn test_default_level_matches_build() {
        let level = default_level();
        if cfg!(debug_assertions) {
            assert_eq!(level, LevelFilter::Debug);
        } else {
            assert_eq!(level, LevelFilter::Info);
        }
    }
}
