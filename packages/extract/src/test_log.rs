//! In-memory logger for asserting on log output in unit tests.

use std::sync::{Mutex, Once};

use log::{Level, LevelFilter, Log, Metadata, Record};

static RECORDS: Mutex<Vec<(Level, String)>> = Mutex::new(Vec::new());
static INIT: Once = Once::new();

struct RecordingLogger;

static LOGGER: RecordingLogger = RecordingLogger;

impl Log for RecordingLogger {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        if let Ok(mut records) = RECORDS.lock() {
            records.push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

/// Installs the recording logger for the whole test binary.
pub fn init() {
    INIT.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(LevelFilter::Trace);
        }
    });
}

/// Whether a record at `level` containing `needle` has been logged.
///
/// Tests run in parallel, so callers should look for a message unique to
/// their own test.
pub fn logged(level: Level, needle: &str) -> bool {
    RECORDS
        .lock()
        .is_ok_and(|records| records.iter().any(|(l, msg)| *l == level && msg.contains(needle)))
}
