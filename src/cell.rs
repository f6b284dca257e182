//! The raw cell value type handed to the importer.
//!
//! Spreadsheet readers produce a 2D grid of loosely typed values; the engine
//! never touches file formats directly and consumes only this grid.

use time::Date;

/// A single spreadsheet cell as produced by whichever reader loaded the file.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// An empty or missing cell.
    Empty,
    /// A numeric cell. May also encode a date as a spreadsheet serial number.
    Number(f64),
    /// A free text cell.
    Text(String),
    /// A cell the reader already resolved to a calendar date.
    Date(Date),
}

impl Cell {
    /// Returns the trimmed text content of the cell, or `None` for non-text
    /// and blank cells.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() { None } else { Some(trimmed) }
            }
            _ => None,
        }
    }

    /// Whether the cell holds no usable value.
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_owned())
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

/// A raw spreadsheet grid: rows of cells, top to bottom.
pub type Grid = Vec<Vec<Cell>>;

#[cfg(test)]
mod as_text_tests {
    use super::Cell;

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(Cell::from("  Saldo Inicial  ").as_text(), Some("Saldo Inicial"));
    }

    #[test]
    fn blank_text_is_none() {
        assert_eq!(Cell::from("   ").as_text(), None);
    }

    #[test]
    fn numbers_are_none() {
        assert_eq!(Cell::Number(12.5).as_text(), None);
    }
}
