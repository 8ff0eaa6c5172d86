//! Document blocks produced by the structural extractors.

use serde::{Deserialize, Serialize};

use super::Table;

/// Highest heading level a block can carry.
pub const MAX_HEADING_LEVEL: u8 = 9;

/// A unit of extracted content, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Block {
    /// A heading (level 1-9).
    Heading {
        /// Heading level
        level: u8,
        /// Heading text
        text: String,
    },
    /// A list item, rendered with a bullet marker.
    ListItem(String),
    /// A plain paragraph.
    Paragraph(String),
    /// A table, rendered as a markdown table.
    Table(Table),
    /// Header or footer lines, joined by single line breaks.
    HeaderFooter(Vec<String>),
}

impl Block {
    /// Create a heading block, clamping the level into 1..=9.
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Block::Heading {
            level: level.clamp(1, MAX_HEADING_LEVEL),
            text: text.into(),
        }
    }

    /// Check if the block would render to nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            Block::Heading { text, .. } | Block::ListItem(text) | Block::Paragraph(text) => {
                text.trim().is_empty()
            }
            Block::Table(table) => table.is_empty(),
            Block::HeaderFooter(lines) => lines.iter().all(|l| l.trim().is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_level_clamped() {
        assert_eq!(
            Block::heading(0, "Intro"),
            Block::Heading {
                level: 1,
                text: "Intro".to_string()
            }
        );
        assert!(matches!(Block::heading(12, "Deep"), Block::Heading { level: 9, .. }));
    }

    #[test]
    fn test_block_is_empty() {
        assert!(Block::Paragraph("   ".to_string()).is_empty());
        assert!(Block::Table(Table::new()).is_empty());
        assert!(Block::HeaderFooter(vec![String::new()]).is_empty());
        assert!(!Block::ListItem("item".to_string()).is_empty());
    }
}
