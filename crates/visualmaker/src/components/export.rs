//! Export file naming

use std::cell::Cell;

/// File name for an exported diagram image
pub fn export_filename(diagram_type: &str, unix_millis: u64) -> String {
    format!("diagram-{}-{}.png", diagram_type, unix_millis)
}

/// Milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn unix_millis() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn unix_millis() -> u64 {
    js_sys::Date::now() as u64
}

/// Issues export file names with strictly increasing timestamps
///
/// Two exports within the same millisecond (or after the clock stepped
/// back) still get distinct names.
#[derive(Debug, Default)]
pub struct ExportNamer {
    last: Cell<u64>,
}

impl ExportNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name the next export taken at `now_millis`
    pub fn next_name(&self, diagram_type: &str, now_millis: u64) -> String {
        let stamp = now_millis.max(self.last.get().saturating_add(1));
        self.last.set(stamp);
        export_filename(diagram_type, stamp)
    }
}
