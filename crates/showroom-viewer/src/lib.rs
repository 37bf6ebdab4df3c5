//! Showroom Viewer - browser host page for the 3D car viewer
//!
//! Checks that the browser can render, reads configuration from the URL,
//! and hosts the scene with model, view and color controls.

mod app;
mod fetch;
mod params;
mod support;
mod toasts;
mod ui;

use wasm_bindgen::prelude::*;

/// WASM entry point
#[wasm_bindgen(start)]
pub fn main() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    let params = params::UrlParams::from_location();

    let level = if params.debug {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(level)
            .build()
    );

    let support = support::detect();
    if !support.is_supported() {
        support::show_unsupported_message();
        return;
    }
    tracing::info!("Rendering with {:?}", support);

    app::run(params);
}
