#![warn(clippy::pedantic)]
// hide the cmd when opening the exe on windows, see: https://github.com/emilk/egui/issues/116
#![windows_subsystem = "windows"]

mod animation;
mod config;
mod debounce;
#[cfg(test)]
mod log_capture;
mod message;
mod model;
mod notify;
mod presenter;
mod projection;
mod town;
mod view;
#[cfg(target_arch = "wasm32")]
mod wasm_utils;

use crate::config::Config;
use crate::view::View;

rust_i18n::i18n!("locales");

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    init_logging();
    let config = Config::load();
    View::new_and_start(config)
}

#[cfg(not(target_arch = "wasm32"))]
fn init_logging() {
    use tracing_subscriber::EnvFilter;

    // also picks up everything sent through the `log` facade, egui and eframe included
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = tracing_subscriber::fmt().with_env_filter(filter).try_init() {
        eprintln!("Failed to set up logging: {err}");
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    if let Err(err) = eframe::WebLogger::init(log::LevelFilter::Debug) {
        web_sys::console::error_1(&format!("Failed to set up logging: {err}").into());
    }
    let config = Config::load();
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(err) = View::new_and_start(config).await {
            log::error!("{err:?}");
        }
    });
}
