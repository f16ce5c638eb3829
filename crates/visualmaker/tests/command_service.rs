//! Native pipeline against a stand-in for the mermaid command

#![cfg(unix)]

mod common;

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use common::RecordingClipboard;
use futures::executor::block_on;
use resvg::usvg::fontdb;
use visualmaker::prelude::*;
use visualmaker::CommandConfig;

const FAKE_MMDC: &str = r##"#!/bin/sh
while [ $# -gt 0 ]; do
  case "$1" in
    -i) input="$2"; shift 2 ;;
    -o) output="$2"; shift 2 ;;
    -c) config="$2"; shift 2 ;;
    *) shift ;;
  esac
done
if ! grep -q '"htmlLabels":false' "$config"; then
  echo "Error: labels would be emitted as foreignObject" >&2
  exit 1
fi
if grep -q '@@@' "$input"; then
  echo "Error: Parse error on line 1:" >&2
  echo "    at Parser.parse (mermaid.js:1:1)" >&2
  exit 1
fi
if grep -q 'silent' "$input"; then
  exit 3
fi
printf '<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10"><rect width="20" height="10" fill="#336699"/></svg>' > "$output"
"##;

/// Write the fake renderer once, before any test spawns a process
fn fake_mmdc() -> PathBuf {
    static DIR: OnceLock<tempfile::TempDir> = OnceLock::new();
    let dir = DIR.get_or_init(|| {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("mmdc");
        fs::write(&script, FAKE_MMDC).unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        dir
    });
    dir.path().join("mmdc")
}

fn service() -> CommandService {
    CommandService::new(CommandConfig {
        program: fake_mmdc().display().to_string(),
        args: Vec::new(),
    })
}

fn renderer() -> DiagramRenderer<CommandService> {
    DiagramRenderer::new(service(), MemorySurface::new(), &RenderOptions::default()).unwrap()
}

#[test]
fn test_command_output_becomes_graphics() {
    let renderer = renderer();
    let outcome = block_on(renderer.update("graph TD; A-->B", "flowchart"));
    assert_eq!(outcome, RenderOutcome::Rendered);
    assert!(renderer.preview().graphics().unwrap().as_str().contains("#336699"));
}

#[test]
fn test_command_receives_svg_label_config() {
    let renderer = renderer();
    let outcome = block_on(renderer.update("graph TD; A[Start]", "flowchart"));
    assert_eq!(outcome, RenderOutcome::Rendered);
}

#[test]
fn test_command_stderr_becomes_error_message() {
    let renderer = renderer();
    let outcome = block_on(renderer.update("not a valid diagram @@@", "class"));
    assert_eq!(outcome, RenderOutcome::Failed("Parse error on line 1:".to_string()));
    assert_eq!(renderer.preview(), Preview::Blank);
}

#[test]
fn test_silent_failure_uses_generic_message() {
    let renderer = renderer();
    let outcome = block_on(renderer.update("silent", "flowchart"));
    assert_eq!(outcome, RenderOutcome::Failed("Failed to render diagram".to_string()));
}

#[test]
fn test_missing_program_is_a_render_failure() {
    let service = CommandService::new(CommandConfig {
        program: "/nonexistent/visualmaker-mmdc".to_string(),
        args: Vec::new(),
    });
    let renderer = DiagramRenderer::new(service, MemorySurface::new(), &RenderOptions::default()).unwrap();
    let outcome = block_on(renderer.update("graph TD; A", "flowchart"));
    assert!(matches!(outcome, RenderOutcome::Failed(ref m) if m.contains("failed to run")));
}

#[test]
fn test_download_writes_png() {
    let out = tempfile::tempdir().unwrap();
    let config = EditorConfig::default();
    let renderer = DiagramRenderer::new(service(), MemorySurface::new(), &config.render).unwrap();
    let services = EditorServices {
        clipboard: Box::new(RecordingClipboard::default()),
        capture: Box::new(ResvgCapture::with_fonts(Arc::new(fontdb::Database::new()))),
        sink: Box::new(DirectorySink::new(out.path())),
    };
    let editor = Editor::new(config, renderer, services);

    let request = editor.mount().unwrap();
    assert_eq!(block_on(editor.renderer().complete(request)), RenderOutcome::Rendered);

    let filename = block_on(editor.on_download()).unwrap();
    let png = fs::read(out.path().join(&filename)).unwrap();
    assert_eq!(&png[..4], &[0x89, b'P', b'N', b'G']);
}
