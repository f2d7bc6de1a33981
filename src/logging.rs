//! `log` facade wiring.
//!
//! In the browser, records go to the devtools console at the matching
//! severity. Native builds (tests, the CLI) leave the facade without a sink
//! unless the embedding program installs its own logger.

#[cfg(target_arch = "wasm32")]
struct ConsoleLogger;

#[cfg(target_arch = "wasm32")]
static LOGGER: ConsoleLogger = ConsoleLogger;

#[cfg(target_arch = "wasm32")]
impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = wasm_bindgen::JsValue::from_str(&format!(
            "[sxsview {}] {}",
            record.target(),
            record.args()
        ));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&line),
            log::Level::Warn => web_sys::console::warn_1(&line),
            log::Level::Info => web_sys::console::info_1(&line),
            log::Level::Debug | log::Level::Trace => web_sys::console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

/// Install the console logger (first call wins) and set the level filter.
#[cfg(target_arch = "wasm32")]
pub fn init(level: log::LevelFilter) {
    // A second viewer on the same page finds the logger already installed.
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}

/// Set the level filter; output depends on whatever logger the host installed.
#[cfg(not(target_arch = "wasm32"))]
pub fn init(level: log::LevelFilter) {
    log::set_max_level(level);
}
