//! Grid sizing and the solved layout grid

use super::object::{ceil_sqrt_of_half, ObjectId, ObjectSet};
use super::stencil::Stencil;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dimensions of the placement grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    pub rows: usize,
    pub columns: usize,
}

impl GridSize {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self { rows, columns }
    }

    /// Size the grid from the objects' cumulative footprint.
    ///
    /// Every object is counted twice to leave room for link rows and slack.
    /// `columns = ceil(sqrt(total / 2))` and the grid is twice as tall as it is
    /// wide.
    pub fn for_objects(objects: &ObjectSet) -> Self {
        let total: usize = objects.iter().map(|object| object.size() * 2).sum();
        let columns = ceil_sqrt_of_half(total).max(1);
        Self {
            rows: 2 * columns,
            columns,
        }
    }

    /// Replace either dimension with an explicit value
    pub fn with_overrides(self, rows: Option<usize>, columns: Option<usize>) -> Self {
        Self {
            rows: rows.unwrap_or(self.rows),
            columns: columns.unwrap_or(self.columns),
        }
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.columns
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.columns
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let columns = self.columns;
        (0..self.rows).flat_map(move |row| (0..columns).map(move |col| (row, col)))
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.columns)
    }
}

/// A solved assignment: each cell holds at most one object id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLayoutGrid")]
pub struct LayoutGrid {
    pub rows: usize,
    pub columns: usize,
    pub cells: Vec<Option<ObjectId>>,
}

/// Unchecked shape of a layout as read from disk
#[derive(Deserialize)]
struct RawLayoutGrid {
    rows: usize,
    columns: usize,
    cells: Vec<Option<ObjectId>>,
}

impl TryFrom<RawLayoutGrid> for LayoutGrid {
    type Error = anyhow::Error;

    fn try_from(raw: RawLayoutGrid) -> Result<Self> {
        if raw.rows.checked_mul(raw.columns) != Some(raw.cells.len()) {
            anyhow::bail!(
                "Layout of {}x{} needs {} cells, found {}",
                raw.rows,
                raw.columns,
                raw.rows.saturating_mul(raw.columns),
                raw.cells.len()
            );
        }

        Ok(Self {
            rows: raw.rows,
            columns: raw.columns,
            cells: raw.cells,
        })
    }
}

impl LayoutGrid {
    /// Create an empty layout
    pub fn new(size: GridSize) -> Self {
        Self {
            rows: size.rows,
            columns: size.columns,
            cells: vec![None; size.cell_count()],
        }
    }

    /// Create a layout from nested rows
    pub fn from_rows(rows: Vec<Vec<Option<ObjectId>>>) -> Result<Self> {
        if rows.is_empty() {
            anyhow::bail!("Layout cannot be empty");
        }

        let height = rows.len();
        let width = rows[0].len();
        if width == 0 {
            anyhow::bail!("Layout width cannot be zero");
        }

        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                anyhow::bail!("Row {} has length {}, expected {}", i, row.len(), width);
            }
        }

        Ok(Self {
            rows: height,
            columns: width,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    pub fn size(&self) -> GridSize {
        GridSize::new(self.rows, self.columns)
    }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.columns + col
    }

    /// Object at a cell; out-of-bounds cells are empty
    pub fn get(&self, row: usize, col: usize) -> Option<ObjectId> {
        if row < self.rows && col < self.columns {
            self.cells[self.index(row, col)]
        } else {
            None
        }
    }

    pub fn set(&mut self, row: usize, col: usize, value: Option<ObjectId>) -> Result<()> {
        if row >= self.rows || col >= self.columns {
            anyhow::bail!(
                "Coordinates ({}, {}) out of bounds for {}x{} layout",
                row,
                col,
                self.rows,
                self.columns
            );
        }
        let idx = self.index(row, col);
        self.cells[idx] = value;
        Ok(())
    }

    /// Cells occupied by an object, row-major
    pub fn cells_of(&self, id: ObjectId) -> Vec<(usize, usize)> {
        self.size()
            .cells()
            .filter(|&(row, col)| self.get(row, col) == Some(id))
            .collect()
    }

    pub fn count_of(&self, id: ObjectId) -> usize {
        self.cells.iter().filter(|&&cell| cell == Some(id)).count()
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Whether every stencil cell matches the layout when anchored at `(row, col)`
    pub fn matches_at(&self, stencil: &Stencil, row: usize, col: usize) -> bool {
        stencil
            .cells()
            .all(|(dr, dc, id)| self.get(row + dr, col + dc) == Some(id))
    }

    /// Every anchor at which the stencil is present
    pub fn occurrences(&self, stencil: &Stencil) -> Vec<(usize, usize)> {
        stencil
            .anchors(self.size())
            .into_iter()
            .filter(|&(row, col)| self.matches_at(stencil, row, col))
            .collect()
    }

    /// Bounding box of an object's cells as `(top, left, rows, columns)`
    pub fn bounding_box(&self, id: ObjectId) -> Option<(usize, usize, usize, usize)> {
        let cells = self.cells_of(id);
        let top = cells.iter().map(|&(row, _)| row).min()?;
        let bottom = cells.iter().map(|&(row, _)| row).max()?;
        let left = cells.iter().map(|&(_, col)| col).min()?;
        let right = cells.iter().map(|&(_, col)| col).max()?;
        Some((top, left, bottom - top + 1, right - left + 1))
    }
}

impl fmt::Display for LayoutGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            for col in 0..self.columns {
                match self.get(row, col) {
                    Some(id) => write!(f, "{:>3}", id)?,
                    None => write!(f, "{:>3}", ".")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::DiagramObject;

    fn salesforce() -> ObjectSet {
        ObjectSet::new(vec![
            DiagramObject::link_placeholder(),
            DiagramObject::new("Account", ["Contact"], 1),
            DiagramObject::new("Contact", Vec::<String>::new(), 2),
            DiagramObject::new("User", ["Account"], 3),
        ])
        .unwrap()
    }

    #[test]
    fn test_grid_sizing() {
        // 4 objects of 2 cells: total 16, columns = ceil(sqrt(8)) = 3
        let size = GridSize::for_objects(&salesforce());
        assert_eq!(size, GridSize::new(6, 3));
    }

    #[test]
    fn test_grid_sizing_is_deterministic() {
        let objects = salesforce();
        let first = GridSize::for_objects(&objects);
        for _ in 0..10 {
            assert_eq!(GridSize::for_objects(&objects), first);
        }
        assert_eq!(first.rows, 2 * first.columns);
    }

    #[test]
    fn test_grid_overrides() {
        let size = GridSize::new(6, 3).with_overrides(Some(8), None);
        assert_eq!(size, GridSize::new(8, 3));
        assert_eq!(size.cell_count(), 24);
        assert_eq!(size.cells().count(), 24);
    }

    #[test]
    fn test_layout_from_rows() {
        let layout = LayoutGrid::from_rows(vec![
            vec![Some(1), Some(1), None],
            vec![None, Some(0), None],
        ])
        .unwrap();
        assert_eq!(layout.size(), GridSize::new(2, 3));
        assert_eq!(layout.get(0, 1), Some(1));
        assert_eq!(layout.get(5, 5), None);
        assert_eq!(layout.count_of(1), 2);
        assert_eq!(layout.occupied_count(), 3);
        assert_eq!(layout.bounding_box(1), Some((0, 0, 1, 2)));
        assert_eq!(layout.bounding_box(7), None);

        assert!(LayoutGrid::from_rows(vec![vec![None], vec![None, None]]).is_err());
    }

    #[test]
    fn test_stencil_occurrences() {
        let mut layout = LayoutGrid::new(GridSize::new(5, 2));
        layout.set(0, 1, Some(3)).unwrap();
        layout.set(1, 1, Some(0)).unwrap();
        layout.set(2, 1, Some(0)).unwrap();
        layout.set(3, 1, Some(1)).unwrap();

        let link = Stencil::vertical_link(3, 1);
        assert_eq!(layout.occurrences(&link), vec![(0, 1)]);
        assert!(layout.set(5, 0, Some(1)).is_err());
    }

    #[test]
    fn test_deserialize_checks_cell_count() {
        let layout = LayoutGrid::from_rows(vec![vec![Some(1), None], vec![None, Some(2)]]).unwrap();
        let json = serde_json::to_string(&layout).unwrap();
        let loaded: LayoutGrid = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, layout);

        let truncated = r#"{"rows":8,"columns":3,"cells":[null]}"#;
        let err = serde_json::from_str::<LayoutGrid>(truncated).unwrap_err();
        assert!(err.to_string().contains("needs 24 cells, found 1"));

        let overflowing = format!(r#"{{"rows":{},"columns":2,"cells":[]}}"#, usize::MAX);
        assert!(serde_json::from_str::<LayoutGrid>(&overflowing).is_err());
    }
}
