//! Command-line interface for the visualmaker utility
//!
//! Drives the editor headlessly: the buffer starts as the selected type's
//! example, `-i` replaces it like a text edit, and the action commands
//! render, export or copy the result.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use futures::executor::block_on;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::listing::{format_entries, TypeInfo};
use visualmaker::prelude::*;
use visualmaker::{catalog, PLACEHOLDER_TEXT};

/// Visualmaker - headless Mermaid diagram editor
#[derive(Parser)]
#[command(name = "visualmaker")]
#[command(about = "Render Mermaid diagrams to SVG and PNG from the command line")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Set log level (trace|debug|info|warn|error|off)
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the selectable diagram types
    Types {
        /// Highlight this type as selected
        #[arg(long)]
        selected: Option<String>,

        /// Show in JSON format
        #[arg(long)]
        json: bool,

        /// When to use colors in output
        #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
        color: ColorChoice,
    },

    /// Print the example diagram for a type
    Example {
        /// Diagram type identifier (flowchart, sequence, class, state, erd, gantt)
        diagram_type: String,
    },

    /// Render the buffer to SVG
    Render {
        /// Diagram type to select (defaults to the configured type)
        #[arg(short = 't', long = "type")]
        diagram_type: Option<String>,

        /// Input file replacing the example text (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file for the SVG (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export the rendered buffer as a PNG
    Export {
        /// Diagram type to select (defaults to the configured type)
        #[arg(short = 't', long = "type")]
        diagram_type: Option<String>,

        /// Input file replacing the example text (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Directory the image is saved in
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Copy the buffer to the terminal clipboard (OSC 52)
    Copy {
        /// Diagram type to select (defaults to the configured type)
        #[arg(short = 't', long = "type")]
        diagram_type: Option<String>,

        /// Input file replacing the example text (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

/// When to colorize output
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Use colors if output is a terminal and NO_COLOR is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

type CliEditor = Editor<CommandService>;

/// Main CLI application
pub struct VisualmakerApp {
    config: EditorConfig,
}

impl VisualmakerApp {
    /// Create a new application instance with default settings
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self { config }
    }

    /// Load configuration from `path`, or use defaults
    pub fn from_config_path(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Ok(Self::with_config(EditorConfig::from_path(path)?)),
            None => Ok(Self::new()),
        }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&self, cli: Cli) -> Result<()> {
        if cli.verbose {
            eprintln!("Visualmaker v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Types {
                selected,
                json,
                color,
            } => self.types_command(selected, json, color),
            Commands::Example { diagram_type } => self.example_command(&diagram_type),
            Commands::Render {
                diagram_type,
                input,
                output,
            } => self.render_command(diagram_type, input, output, cli.verbose),
            Commands::Export {
                diagram_type,
                input,
                out_dir,
            } => self.export_command(diagram_type, input, out_dir, cli.verbose),
            Commands::Copy {
                diagram_type,
                input,
            } => self.copy_command(diagram_type, input),
        }
    }

    /// Handle the types command
    fn types_command(&self, selected: Option<String>, json: bool, color: ColorChoice) -> Result<()> {
        let selected = selected.unwrap_or_else(|| self.config.default_type.id().to_string());
        let known = DiagramType::from_id(&selected).map(|ty| ty.id());
        let entries = DiagramTypeSelector::new(&selected, |_: &str| {}).entries();
        debug!(selected = ?known, "Listing diagram types");

        if json {
            let types: Vec<TypeInfo> = entries.iter().map(TypeInfo::from).collect();
            let listing = serde_json::json!({
                "types": types,
                "selected": known,
                "total": types.len(),
            });
            println!("{}", serde_json::to_string_pretty(&listing)?);
        } else {
            print!("{}", format_entries(&entries, Self::should_colorize(color)));
        }
        Ok(())
    }

    /// Handle the example command
    fn example_command(&self, diagram_type: &str) -> Result<()> {
        let diagram_type: DiagramType = diagram_type.parse()?;
        self.write_output(None, catalog::example(diagram_type))
    }

    /// Handle the render command
    fn render_command(
        &self,
        diagram_type: Option<String>,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        verbose: bool,
    ) -> Result<()> {
        let editor = self.editor(Path::new("."))?;
        match self.load(&editor, diagram_type, input, verbose)? {
            RenderOutcome::Rendered => {
                let preview = editor.renderer().preview();
                let graphics = preview
                    .graphics()
                    .ok_or_else(|| anyhow!("Renderer reported success without graphics"))?;
                if verbose && graphics.removed() > 0 {
                    eprintln!("Removed {} unsafe element(s) or attribute(s)", graphics.removed());
                }
                self.write_output(output, graphics.as_str())
            }
            RenderOutcome::Idle => {
                eprintln!("{}", PLACEHOLDER_TEXT);
                Ok(())
            }
            RenderOutcome::Failed(message) => Err(anyhow!(message)),
            RenderOutcome::Superseded => Err(anyhow!("Render was superseded")),
        }
    }

    /// Handle the export command
    fn export_command(
        &self,
        diagram_type: Option<String>,
        input: Option<PathBuf>,
        out_dir: PathBuf,
        verbose: bool,
    ) -> Result<()> {
        let editor = self.editor(&out_dir)?;
        if let RenderOutcome::Failed(message) = self.load(&editor, diagram_type, input, verbose)? {
            return Err(anyhow!(message));
        }

        match block_on(editor.on_download()) {
            Some(filename) => {
                println!("{}", out_dir.join(filename).display());
                Ok(())
            }
            None => Err(anyhow!("Error downloading diagram")),
        }
    }

    /// Handle the copy command
    fn copy_command(&self, diagram_type: Option<String>, input: Option<PathBuf>) -> Result<()> {
        let editor = self.editor(Path::new("."))?;
        apply_inputs(&editor, diagram_type, input.map(read_input).transpose()?)?;
        if block_on(editor.on_copy()) {
            Ok(())
        } else {
            Err(anyhow!("Copy to clipboard failed"))
        }
    }

    fn editor(&self, out_dir: &Path) -> Result<CliEditor> {
        let service = CommandService::new(self.config.command.clone());
        let renderer = DiagramRenderer::new(service, MemorySurface::new(), &self.config.render)?;
        let services = EditorServices {
            clipboard: Box::new(Osc52Clipboard::stdout()),
            capture: Box::new(ResvgCapture::new()),
            sink: Box::new(DirectorySink::new(out_dir)),
        };
        Ok(Editor::new(self.config.clone(), renderer, services))
    }

    /// Apply the type and input selections, then render
    fn load(
        &self,
        editor: &CliEditor,
        diagram_type: Option<String>,
        input: Option<PathBuf>,
        verbose: bool,
    ) -> Result<RenderOutcome> {
        let content = input.map(read_input).transpose()?;
        if verbose {
            if let Some(content) = &content {
                eprintln!("Read {} bytes of input", content.len());
            }
        }

        let request = apply_inputs(editor, diagram_type, content)?;
        Ok(match request {
            Some(request) => block_on(editor.renderer().complete(request)),
            None => RenderOutcome::Idle,
        })
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        let stdout_content = if content.is_empty() || content.ends_with('\n') {
            content.to_string()
        } else {
            format!("{}\n", content)
        };

        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                print!("{}", stdout_content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }

    /// Determine if we should colorize terminal output
    fn should_colorize(color: ColorChoice) -> bool {
        match color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                if std::env::var("NO_COLOR").is_ok() {
                    return false;
                }
                crossterm::tty::IsTty::is_tty(&std::io::stdout())
            }
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }
}

impl Default for VisualmakerApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Mount, select the type and apply the text edit, like a user would
///
/// Returns the request of the last step; earlier ones are superseded.
fn apply_inputs(
    editor: &CliEditor,
    diagram_type: Option<String>,
    content: Option<String>,
) -> Result<Option<RenderRequest>> {
    let mut request = editor.mount();
    if let Some(diagram_type) = diagram_type {
        let diagram_type: DiagramType = diagram_type.parse()?;
        request = editor.on_type_change(diagram_type.id());
    }
    if let Some(content) = content {
        request = editor.on_text_edit(content);
    }
    Ok(request)
}

/// Read input from file or stdin
fn read_input(path: PathBuf) -> Result<String> {
    if path.to_string_lossy() == "-" {
        let mut content = String::new();
        io::stdin().read_to_string(&mut content)?;
        Ok(content)
    } else {
        fs::read_to_string(&path)
            .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e))
    }
}
