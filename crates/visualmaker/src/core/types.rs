//! Core type definitions for the editor
//!
//! This module contains the closed set of diagram types the editor offers,
//! the per-render identifier, and the rendering options handed to the
//! rendering service.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::EditorError;

/// Diagram types offered by the editor
///
/// The set is closed; each entry carries presentation-only metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramType {
    #[default]
    Flowchart,
    Sequence,
    Class,
    State,
    Erd,
    Gantt,
}

impl DiagramType {
    /// All diagram types in catalog order
    pub const ALL: [DiagramType; 6] = [
        DiagramType::Flowchart,
        DiagramType::Sequence,
        DiagramType::Class,
        DiagramType::State,
        DiagramType::Erd,
        DiagramType::Gantt,
    ];

    /// Stable identifier used in selection events and file names
    pub fn id(&self) -> &'static str {
        match self {
            DiagramType::Flowchart => "flowchart",
            DiagramType::Sequence => "sequence",
            DiagramType::Class => "class",
            DiagramType::State => "state",
            DiagramType::Erd => "erd",
            DiagramType::Gantt => "gantt",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            DiagramType::Flowchart => "Flowchart",
            DiagramType::Sequence => "Sequence",
            DiagramType::Class => "Class",
            DiagramType::State => "State",
            DiagramType::Erd => "Entity-Relationship",
            DiagramType::Gantt => "Gantt",
        }
    }

    /// Short description shown alongside the name
    pub fn description(&self) -> &'static str {
        match self {
            DiagramType::Flowchart => "Sequential processes and decision flows",
            DiagramType::Sequence => "Interactions over time",
            DiagramType::Class => "Object-oriented structures",
            DiagramType::State => "System states and transitions",
            DiagramType::Erd => "Database structures",
            DiagramType::Gantt => "Project timelines",
        }
    }

    /// Look up a type by identifier, `None` if unrecognized
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.id() == id)
    }
}

impl fmt::Display for DiagramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for DiagramType {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| EditorError::UnknownDiagramType {
            diagram_type: s.to_string(),
        })
    }
}

/// Identifier handed to the rendering service for one render request
///
/// Identifiers are issued by [`RenderIdGenerator`] and strictly increase,
/// so comparing two of them tells which request was issued later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderId(u64);

impl RenderId {
    /// Sequence number of this request
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RenderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "visualmaker-{}", self.0)
    }
}

/// Monotonic source of [`RenderId`]s, scoped to one renderer
#[derive(Debug, Default)]
pub struct RenderIdGenerator {
    last: std::cell::Cell<u64>,
}

impl RenderIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next identifier
    pub fn next_id(&self) -> RenderId {
        let next = self.last.get() + 1;
        self.last.set(next);
        RenderId(next)
    }

    /// The most recently issued identifier, if any
    pub fn last(&self) -> Option<RenderId> {
        match self.last.get() {
            0 => None,
            n => Some(RenderId(n)),
        }
    }
}

/// Visual theme requested from the rendering service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Default,
    Neutral,
    Dark,
    Forest,
    Base,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::Neutral => "neutral",
            Theme::Dark => "dark",
            Theme::Forest => "forest",
            Theme::Base => "base",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content-safety posture requested from the rendering service
///
/// `Strict` is the default; the looser levels allow markup in labels and
/// click handlers that the sanitizer in [`crate::core::Graphics`] strips
/// anyway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityLevel {
    #[default]
    Strict,
    Antiscript,
    Loose,
    Sandbox,
}

impl SecurityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityLevel::Strict => "strict",
            SecurityLevel::Antiscript => "antiscript",
            SecurityLevel::Loose => "loose",
            SecurityLevel::Sandbox => "sandbox",
        }
    }
}

impl fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options the rendering service is configured with before first use
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderOptions {
    pub theme: Theme,
    pub security_level: SecurityLevel,
}

impl RenderOptions {
    /// Options in the shape mermaid's `initialize` and `mmdc -c` expect
    pub fn to_mermaid_config(&self) -> serde_json::Value {
        serde_json::json!({
            "startOnLoad": false,
            "theme": self.theme.as_str(),
            "securityLevel": self.security_level.as_str(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagram_type_round_trips_through_id() {
        for ty in DiagramType::ALL {
            assert_eq!(ty.id().parse::<DiagramType>().unwrap(), ty);
            assert_eq!(ty.to_string(), ty.id());
        }
    }

    #[test]
    fn test_unknown_diagram_type() {
        let err = "mindmap".parse::<DiagramType>().unwrap_err();
        assert!(err.to_string().contains("mindmap"));
        assert_eq!(DiagramType::from_id("Flowchart"), None);
    }

    #[test]
    fn test_render_ids_strictly_increase() {
        let ids = RenderIdGenerator::new();
        assert_eq!(ids.last(), None);
        let a = ids.next_id();
        let b = ids.next_id();
        assert!(b > a);
        assert_eq!(ids.last(), Some(b));
        assert_eq!(a.to_string(), "visualmaker-1");
        assert_eq!(b.sequence(), 2);
    }

    #[test]
    fn test_mermaid_config_defaults_to_strict() {
        let config = RenderOptions::default().to_mermaid_config();
        assert_eq!(config["securityLevel"], "strict");
        assert_eq!(config["theme"], "default");
        assert_eq!(config["startOnLoad"], false);
    }

    #[test]
    fn test_render_options_deserialize_camel_case() {
        let options: RenderOptions =
            serde_json::from_str(r#"{"theme":"dark","securityLevel":"antiscript"}"#).unwrap();
        assert_eq!(options.theme, Theme::Dark);
        assert_eq!(options.security_level, SecurityLevel::Antiscript);
    }
}
