//! some utility functions that are required for some features on wasm

/// index.html shows a text until the app has started. Remove it.
pub fn remove_loading_text() {
    let element = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id("loading_text"));
    if let Some(element) = element {
        element.remove();
    } else {
        log::debug!("No loading text to remove");
    }
}
