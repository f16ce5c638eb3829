//! Diagram type selector
//!
//! Presentation over the fixed catalog: lists the entries, flags the
//! selected one and reports clicks through a callback. It keeps no state of
//! its own.

use crate::core::DiagramType;

/// One selectable entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorEntry {
    pub diagram_type: DiagramType,
    pub selected: bool,
}

impl SelectorEntry {
    pub fn id(&self) -> &'static str {
        self.diagram_type.id()
    }

    pub fn name(&self) -> &'static str {
        self.diagram_type.display_name()
    }

    pub fn description(&self) -> &'static str {
        self.diagram_type.description()
    }
}

/// Lists diagram types and forwards selections to `on_type_change`
pub struct DiagramTypeSelector<'a, F>
where
    F: FnMut(&str),
{
    selected_type: &'a str,
    on_type_change: F,
}

impl<'a, F> DiagramTypeSelector<'a, F>
where
    F: FnMut(&str),
{
    pub fn new(selected_type: &'a str, on_type_change: F) -> Self {
        Self {
            selected_type,
            on_type_change,
        }
    }

    /// Catalog entries in display order
    pub fn entries(&self) -> Vec<SelectorEntry> {
        DiagramType::ALL
            .into_iter()
            .map(|diagram_type| SelectorEntry {
                diagram_type,
                selected: diagram_type.id() == self.selected_type,
            })
            .collect()
    }

    /// Report a click on `diagram_type`
    pub fn select(&mut self, diagram_type: DiagramType) {
        (self.on_type_change)(diagram_type.id());
    }
}
