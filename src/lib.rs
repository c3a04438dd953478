/// Tab Yard - Chrome Extension that keeps a pool of links to visit later
/// Built with Rust + WASM + Yew

pub mod error;
pub mod extractor;
pub mod link_data;
pub mod operations;
pub mod picker;
pub mod storage;
pub mod tabs;
pub mod ui;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}
