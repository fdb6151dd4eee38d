//! Logger setup.
//!
//! Records go through [`fern`] and are prefixed with a wall-clock timestamp. In the
//! browser they end up in the developer console, natively on stdout.

use log::LevelFilter;

pub fn init(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(output())
        .apply()
}

#[cfg(target_arch = "wasm32")]
fn output() -> fern::Output {
    fern::Output::call(|record| {
        let line = wasm_bindgen::JsValue::from_str(&record.args().to_string());
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&line),
            log::Level::Warn => web_sys::console::warn_1(&line),
            log::Level::Info => web_sys::console::info_1(&line),
            log::Level::Debug | log::Level::Trace => web_sys::console::debug_1(&line),
        }
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn output() -> fern::Output {
    std::io::stdout().into()
}
