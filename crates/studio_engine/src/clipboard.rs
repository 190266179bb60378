use studio_logging::{studio_debug, studio_warn};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClipboardError {
    #[error("clipboard not available: {0}")]
    Unavailable(String),
    #[error("clipboard write rejected: {0}")]
    Rejected(String),
}

/// Platform text clipboard (text/plain only).
pub trait Clipboard: Send + Sync {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// System clipboard via `arboard`. A fresh handle is opened per write.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArboardClipboard;

impl Clipboard for ArboardClipboard {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard = arboard::Clipboard::new().map_err(|err| {
            studio_warn!("Failed to initialize clipboard support: {}", err);
            ClipboardError::Unavailable(err.to_string())
        })?;
        clipboard.set_text(text.to_string()).map_err(|err| {
            studio_warn!("Failed to set clipboard text: {}", err);
            ClipboardError::Rejected(err.to_string())
        })?;
        studio_debug!("Copied {} chars to clipboard", text.len());
        Ok(())
    }
}
