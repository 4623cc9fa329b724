// src/utils/logger.rs

use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::sync::OnceLock;

static LEVEL: OnceLock<LevelFilter> = OnceLock::new();
static LOGGER: ConsoleLogger = ConsoleLogger;

struct ConsoleLogger;

/// Maps `-v` repetitions to a level: 0 → warn, 1 → info, 2 → debug, 3+ → trace
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
  match verbosity {
    0 => LevelFilter::Warn,
    1 => LevelFilter::Info,
    2 => LevelFilter::Debug,
    _ => LevelFilter::Trace,
  }
}

pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
  let _ = LEVEL.set(level);
  log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}

fn tag(level: Level) -> &'static str {
  match level {
    Level::Error => "🔴 error",
    Level::Warn => "🟠 warn ",
    Level::Info => "🔵 info ",
    Level::Debug => "⚪ debug",
    Level::Trace => "▫️ trace",
  }
}

impl log::Log for ConsoleLogger {
  fn enabled(&self, metadata: &Metadata) -> bool {
    metadata.level() <= *LEVEL.get().unwrap_or(&LevelFilter::Warn)
  }

  fn log(&self, record: &Record) {
    if self.enabled(record.metadata()) {
      // Format: "🔵 info  Structure: Sodium Chloride (NaCl)"
      let mut err = std::io::stderr().lock();
      let _ = writeln!(err, "{}  {}", tag(record.level()), record.args());
    }
  }

  fn flush(&self) {
    let _ = std::io::stderr().flush();
  }
}
