//! Rendering through an external mermaid command
//!
//! [`CommandService`] drives the mermaid command-line renderer (`mmdc`) or
//! any program with the same interface:
//!
//! ```text
//! <program> -i <input.mmd> -o <output.svg> -c <config.json> -t <theme> [args...]
//! ```
//!
//! Labels are requested as SVG `<text>` rather than HTML in
//! `<foreignObject>`, which native rasterizers cannot draw.
//!
//! A non-zero exit status is a rejection; the message is taken from the
//! program's standard error with stack-trace lines removed.
//!
//! The process runs to completion inside `render`, so the future does not
//! yield while it waits. That is fine for the headless CLI, which renders
//! one request at a time.

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};

use async_trait::async_trait;
use tracing::{debug, trace};

use crate::core::{CommandConfig, RenderError, RenderId, RenderOptions, RenderingService};

/// Renders by spawning a mermaid-compatible command per request
#[derive(Debug)]
pub struct CommandService {
    command: CommandConfig,
    options: RefCell<RenderOptions>,
}

impl CommandService {
    pub fn new(command: CommandConfig) -> Self {
        Self {
            command,
            options: RefCell::new(RenderOptions::default()),
        }
    }

    pub fn program(&self) -> &str {
        &self.command.program
    }

    fn run(&self, id: &RenderId, definition: &str, dir: &Path) -> Result<String, RenderError> {
        let input = dir.join(format!("{id}.mmd"));
        let output = dir.join(format!("{id}.svg"));
        let config = dir.join("mermaid-config.json");

        let options = self.options.borrow().clone();
        fs::write(&input, definition)
            .map_err(|e| RenderError::Rejected(format!("failed to write diagram input: {e}")))?;
        fs::write(&config, command_config(&options).to_string())
            .map_err(|e| RenderError::Rejected(format!("failed to write mermaid config: {e}")))?;

        let mut cmd = Command::new(&self.command.program);
        cmd.arg("-i")
            .arg(&input)
            .arg("-o")
            .arg(&output)
            .arg("-c")
            .arg(&config)
            .arg("-t")
            .arg(options.theme.as_str())
            .args(&self.command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        trace!(?cmd, "Spawning renderer");
        let result = cmd.output().map_err(|e| {
            RenderError::Rejected(format!("failed to run '{}': {e}", self.command.program))
        })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            debug!(status = %result.status, "Renderer exited with failure");
            return Err(RenderError::from_message(error_message(&stderr)));
        }

        fs::read_to_string(&output).map_err(|e| {
            RenderError::Rejected(format!("renderer produced no output: {e}"))
        })
    }
}

#[async_trait(?Send)]
impl RenderingService for CommandService {
    fn configure(&self, options: &RenderOptions) -> Result<(), RenderError> {
        self.options.replace(options.clone());
        Ok(())
    }

    async fn render(&self, id: &RenderId, definition: &str) -> Result<String, RenderError> {
        let dir = tempfile::Builder::new()
            .prefix("visualmaker-")
            .tempdir()
            .map_err(|e| RenderError::Rejected(format!("failed to create work directory: {e}")))?;
        self.run(id, definition, dir.path())
    }
}

/// Mermaid configuration for the command, with HTML labels turned off
fn command_config(options: &RenderOptions) -> serde_json::Value {
    let mut config = options.to_mermaid_config();
    config["htmlLabels"] = serde_json::Value::Bool(false);
    config["flowchart"] = serde_json::json!({ "htmlLabels": false });
    config
}

/// Extract a human-readable message from renderer stderr
///
/// Drops JavaScript stack frames and a leading `Error: ` label.
fn error_message(stderr: &str) -> Option<String> {
    let message = stderr
        .lines()
        .take_while(|line| !line.trim_start().starts_with("at "))
        .collect::<Vec<_>>()
        .join("\n");
    let message = message.trim();
    let message = message.strip_prefix("Error: ").unwrap_or(message);
    if message.is_empty() {
        None
    } else {
        Some(message.to_string())
    }
}
