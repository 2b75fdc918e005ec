//! Blocking notifications the user has to click away, the equivalent of a
//! browser `alert()` on every platform.

#[cfg(not(target_arch = "wasm32"))]
pub fn alert(title: &str, text: &str) -> anyhow::Result<()> {
    use anyhow::Context;
    use native_dialog::{MessageDialog, MessageType};

    MessageDialog::new()
        .set_type(MessageType::Error)
        .set_title(title)
        .set_text(text)
        .show_alert()
        .context("Failed to show a message dialog")
}

#[cfg(target_arch = "wasm32")]
pub fn alert(_title: &str, text: &str) -> anyhow::Result<()> {
    let window = web_sys::window().ok_or_else(|| anyhow::anyhow!("no global `window`"))?;
    window
        .alert_with_message(text)
        .map_err(|err| anyhow::anyhow!("Failed to show an alert: {err:?}"))
}
