//! Console logger for the command line tool

use super::display::{Color, ColorOutput};
use log::{Level, LevelFilter, Log, Metadata, Record};

/// Writes records to stderr, coloured by level
struct ConsoleLogger {
    level: LevelFilter,
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let tag = format!("[{:<5}]", record.level());
        eprintln!("{} {}", ColorOutput::colored(&tag, level_color(record.level())), record.args());
    }

    fn flush(&self) {}
}

fn level_color(level: Level) -> Color {
    match level {
        Level::Error => Color::Red,
        Level::Warn => Color::Yellow,
        Level::Info => Color::Green,
        Level::Debug => Color::Cyan,
        Level::Trace => Color::Magenta,
    }
}

/// Level used for a run; `--verbose` adds debug output
pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Install the console logger. Only the first call has any effect.
pub fn init(verbose: bool) {
    let level = level_for(verbose);
    let logger = Box::new(ConsoleLogger { level });
    if log::set_boxed_logger(logger).is_ok() {
        log::set_max_level(level);
    }
}
