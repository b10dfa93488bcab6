//! Column sort state.

/// Sort direction for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

/// Ordered list of sorted columns.
///
/// Header clicks keep at most one entry: clicking a column cycles it
/// through unsorted, ascending and descending, and drops any other
/// column's sort.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSpec {
    fields: Vec<(String, Direction)>,
}

impl SortSpec {
    /// No sorting.
    pub fn none() -> Self {
        Self::default()
    }

    /// Ascending on one column.
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            fields: vec![(column.into(), Direction::Asc)],
        }
    }

    /// Descending on one column.
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            fields: vec![(column.into(), Direction::Desc)],
        }
    }

    /// Returns the sorted columns with their directions.
    pub fn fields(&self) -> &[(String, Direction)] {
        &self.fields
    }

    /// Whether no column is sorted.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Current direction of a column, if sorted.
    pub fn direction(&self, column: &str) -> Option<Direction> {
        self.fields
            .iter()
            .find(|(id, _)| id == column)
            .map(|(_, dir)| *dir)
    }

    /// Advance the cycle for `column` and return its new direction.
    pub fn toggle(&mut self, column: &str) -> Option<Direction> {
        let next = match self.direction(column) {
            None => Some(Direction::Asc),
            Some(Direction::Asc) => Some(Direction::Desc),
            Some(Direction::Desc) => None,
        };

        self.fields.clear();
        if let Some(dir) = next {
            self.fields.push((column.to_string(), dir));
        }
        next
    }
}
