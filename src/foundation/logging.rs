//! Log sink for the browser build
//!
//! The engine only talks to the `log` facade. Native hosts install whatever
//! logger they like; in the browser `init_console_logger` routes records to
//! the devtools console through `web_sys::console`.

use log::{Level, LevelFilter, Log, Metadata, Record};

pub struct ConsoleLogger {
    level: Level,
}

impl ConsoleLogger {
    pub const fn new(level: Level) -> Self {
        Self { level }
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!("[{}] {}: {}", record.level(), record.target(), record.args());
        emit(record.level(), &line);
    }

    fn flush(&self) {}
}

#[cfg(target_arch = "wasm32")]
fn emit(level: Level, line: &str) {
    let value = wasm_bindgen::JsValue::from_str(line);
    match level {
        Level::Error => web_sys::console::error_1(&value),
        Level::Warn => web_sys::console::warn_1(&value),
        Level::Info => web_sys::console::info_1(&value),
        Level::Debug | Level::Trace => web_sys::console::debug_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(_level: Level, line: &str) {
    eprintln!("{}", line);
}

static CONSOLE_LOGGER: ConsoleLogger = ConsoleLogger::new(Level::Info);

/// Install the console logger once; later calls are ignored.
pub fn init_console_logger() {
    if log::set_logger(&CONSOLE_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Info);
    }
}
