use wasm_bindgen::prelude::*;
use web_sys::{Document, Window};

mod api;
mod chat_ui;
mod dom;
mod markdown;
mod storage;
mod timer;
mod utils;

pub use api::GlooChatApi;
pub use chat_ui::DomSurface;
pub use storage::LocalStorageStore;

/// Initialize the WASM module
/// This sets up panic hooks and logging
#[wasm_bindgen(start)]
pub fn init() {
    // Set panic hook for better error messages
    console_error_panic_hook::set_once();

    wasm_logger::init(wasm_logger::Config::default());

    log::info!("storechat WASM initialized");
}

/// Mount the chat widget on the current page.
///
/// `config_json` is an optional JSON object overriding any `WidgetConfig` field.
#[wasm_bindgen(js_name = initChatWidget)]
pub fn init_chat_widget(config_json: Option<String>) -> Result<(), JsValue> {
    let config = match config_json {
        Some(json) => storechat_core::WidgetConfig::from_json(&json)
            .map_err(|e| JsValue::from_str(&e.to_string()))?,
        None => storechat_core::WidgetConfig::default(),
    };

    log::info!("Mounting chat widget (history key '{}')", config.storage_key);
    chat_ui::ChatWidget::mount(config)
}

/// Send whatever is in the input box
#[wasm_bindgen(js_name = sendMessage)]
pub fn send_message() {
    chat_ui::send_from_input();
}

/// Delete the conversation, offering undo for a few seconds
#[wasm_bindgen(js_name = clearHistory)]
pub fn clear_history() {
    chat_ui::with_widget(|widget| widget.clear());
}

/// Restore the most recently deleted conversation
#[wasm_bindgen(js_name = undoClear)]
pub fn undo_clear() {
    chat_ui::with_widget(|widget| widget.undo());
}

/// Get the window object
fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("No window object"))
}

/// Get the document object
fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("No document object"))
}
