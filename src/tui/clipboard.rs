//! System clipboard access for log lines and export links
//!
//! A fresh `arboard` handle per copy; headless sessions just get an error
//! back and the caller shows a toast.

use anyhow::{Context, Result};
use arboard::Clipboard;

pub fn copy_to_clipboard(text: &str) -> Result<()> {
    Clipboard::new()
        .context("Failed to access clipboard")?
        .set_text(text)
        .context("Failed to set clipboard text")
}
