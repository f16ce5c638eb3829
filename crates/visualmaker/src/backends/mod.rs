//! Native collaborators
//!
//! Implementations of the collaborator traits for headless use: an external
//! mermaid command for rendering, resvg for capture, a directory for
//! downloads and OSC 52 for the clipboard.

mod clipboard;
mod command;
mod raster;
mod sink;

pub use clipboard::*;
pub use command::*;
pub use raster::*;
pub use sink::*;
