//! OSC 52 clipboard
//!
//! Asks the terminal emulator to set the system clipboard by writing
//! `ESC ] 52 ; c ; <base64> BEL`. Works over SSH and inside tmux (with
//! `set-clipboard on`), without a display server.

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::domain::ports::Clipboard;
use crate::error::PlatformError;

/// Terminals commonly drop OSC 52 payloads above ~100 kB
const MAX_PAYLOAD: usize = 74_994;

pub struct Osc52Clipboard<W: Write + Send> {
    out: Mutex<W>,
}

impl Osc52Clipboard<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

pub fn osc52_sequence(text: &str) -> Result<String, PlatformError> {
    let encoded = STANDARD.encode(text.as_bytes());
    if encoded.len() > MAX_PAYLOAD {
        return Err(PlatformError::Unavailable(format!(
            "clipboard payload too large ({} bytes)",
            encoded.len()
        )));
    }
    Ok(format!("\x1b]52;c;{}\x07", encoded))
}

#[async_trait]
impl<W: Write + Send> Clipboard for Osc52Clipboard<W> {
    async fn write_text(&self, text: &str) -> Result<(), PlatformError> {
        let sequence = osc52_sequence(text)?;
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        out.write_all(sequence.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}
