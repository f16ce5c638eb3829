//! Example diagrams, one per diagram type
//!
//! The catalog seeds the text buffer when the editor starts and whenever the
//! user switches type or resets. It is a plain lookup table.

use super::types::DiagramType;

const FLOWCHART: &str = "flowchart TD
    A[Start] --> B{Is Valid?}
    B -->|Yes| C[Process Data]
    B -->|No| D[Show Error]
    C --> E[Save Result]
    D --> F[Retry]
    F --> B
    E --> G[End]";

const SEQUENCE: &str = "sequenceDiagram
    participant User
    participant Browser
    participant Server
    User->>Browser: Click Button
    Browser->>Server: Send Request
    Server->>Server: Process
    Server-->>Browser: Response
    Browser-->>User: Display Result";

const CLASS: &str = "classDiagram
    class Animal {
      -int age
      -String name
      +void setAge()
      +void eat()
    }
    class Dog {
      +void bark()
    }
    Animal <|-- Dog";

const STATE: &str = "stateDiagram-v2
    [*] --> Idle
    Idle --> Loading: Load Data
    Loading --> Loaded: Success
    Loading --> Error: Failed
    Loaded --> Idle: Reset
    Error --> Idle: Retry";

const ERD: &str = "erDiagram
    CUSTOMER ||--o{ ORDER : places
    ORDER ||--|{ LINE-ITEM : contains
    CUSTOMER {
      int id
      string name
      string email
    }
    ORDER {
      int id
      int customer_id
      string status
    }";

const GANTT: &str = "gantt
    title Project Timeline
    section Design
    Wireframes :des1, 2024-01-01, 10d
    Mockups :des2, after des1, 8d
    section Development
    Frontend :dev1, 2024-01-15, 20d
    Backend :dev2, 2024-01-20, 25d
    section Testing
    QA :test1, after dev1, 10d";

/// Default diagram text for a type
pub fn example(ty: DiagramType) -> &'static str {
    match ty {
        DiagramType::Flowchart => FLOWCHART,
        DiagramType::Sequence => SEQUENCE,
        DiagramType::Class => CLASS,
        DiagramType::State => STATE,
        DiagramType::Erd => ERD,
        DiagramType::Gantt => GANTT,
    }
}

/// Default diagram text for a type identifier
///
/// Unrecognized identifiers map to the empty string.
pub fn example_for_id(id: &str) -> &'static str {
    DiagramType::from_id(id).map(example).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_type_has_an_example() {
        for ty in DiagramType::ALL {
            assert!(!example(ty).trim().is_empty(), "{ty} has no example");
        }
    }

    #[test]
    fn test_examples_start_with_their_keyword() {
        assert!(example(DiagramType::Flowchart).starts_with("flowchart TD\n"));
        assert!(example(DiagramType::Sequence).starts_with("sequenceDiagram\n"));
        assert!(example(DiagramType::Class).starts_with("classDiagram\n"));
        assert!(example(DiagramType::State).starts_with("stateDiagram-v2\n"));
        assert!(example(DiagramType::Erd).starts_with("erDiagram\n"));
        assert!(example(DiagramType::Gantt).starts_with("gantt\n"));
    }

    #[test]
    fn test_examples_keep_indentation() {
        assert!(example(DiagramType::Class).contains("\n      -int age\n"));
        assert!(example(DiagramType::Flowchart).ends_with("    E --> G[End]"));
    }

    #[test]
    fn test_unknown_id_maps_to_empty() {
        assert_eq!(example_for_id("mindmap"), "");
        assert_eq!(example_for_id(""), "");
        assert_eq!(example_for_id("erd"), example(DiagramType::Erd));
    }
}
