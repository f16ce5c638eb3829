//! Terminal clipboard via OSC 52

use std::cell::RefCell;
use std::io::Write;

use async_trait::async_trait;
use base64::Engine as _;

use crate::core::{Clipboard, ClipboardError};

/// Writes clipboard contents as an OSC 52 escape sequence
///
/// Terminals that support OSC 52 (and most multiplexers, when configured)
/// copy the payload to the system clipboard of the machine the terminal
/// runs on, which also works over SSH.
pub struct Osc52Clipboard<W> {
    out: RefCell<W>,
}

impl<W: Write> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl Osc52Clipboard<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

#[async_trait(?Send)]
impl<W: Write> Clipboard for Osc52Clipboard<W> {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut out = self.out.borrow_mut();
        out.write_all(osc52_sequence(text).as_bytes())
            .and_then(|()| out.flush())
            .map_err(|e| ClipboardError::new(e.to_string()))
    }
}

fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x07")
}
