//! Tool system for the board.

use crate::shapes::ElementKind;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    #[default]
    Select,
    Rectangle,
    Ellipse,
    Text,
    Image,
    Calendar,
    BoardLink,
}

impl ToolKind {
    /// True for tools that create a shape on pointer-down.
    pub fn is_creation(self) -> bool {
        self != ToolKind::Select
    }

    /// The element a creation tool produces.
    pub fn element_kind(self) -> Option<ElementKind> {
        match self {
            ToolKind::Select => None,
            ToolKind::Rectangle => Some(ElementKind::Rectangle),
            ToolKind::Ellipse => Some(ElementKind::Ellipse),
            ToolKind::Text => Some(ElementKind::Text {
                content: String::new(),
            }),
            ToolKind::Image => Some(ElementKind::Image {
                source: String::new(),
            }),
            ToolKind::Calendar => Some(ElementKind::Calendar),
            ToolKind::BoardLink => Some(ElementKind::BoardLink),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_creates_nothing() {
        assert!(!ToolKind::Select.is_creation());
        assert!(ToolKind::Select.element_kind().is_none());
    }

    #[test]
    fn test_creation_tools() {
        assert!(ToolKind::Ellipse.is_creation());
        assert_eq!(ToolKind::Ellipse.element_kind(), Some(ElementKind::Ellipse));
        assert_eq!(ToolKind::BoardLink.element_kind().map(|k| k.name()), Some("board-link"));
    }

    #[test]
    fn test_tool_json_names() {
        let tool: ToolKind = serde_json::from_str("\"board_link\"").unwrap();
        assert_eq!(tool, ToolKind::BoardLink);
    }
}
