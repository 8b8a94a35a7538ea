//! Rigid object-id patterns searched for on the grid

use super::grid::GridSize;
use super::object::{ObjectId, LINK_ID};
use crate::error::LayoutError;
use itertools::iproduct;

/// An immutable `rows x columns` matrix of object ids.
///
/// Each cell names the object that must occupy the corresponding grid cell when
/// the stencil is anchored. Id 0 is the link placeholder, not "empty".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stencil {
    rows: usize,
    columns: usize,
    cells: Vec<ObjectId>,
}

impl Stencil {
    /// Build a stencil from nested rows
    pub fn from_rows(rows: Vec<Vec<ObjectId>>) -> Result<Self, LayoutError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(LayoutError::InvalidStencil {
                reason: "stencil must have at least one cell".to_string(),
            });
        }
        if let Some((index, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != width) {
            return Err(LayoutError::InvalidStencil {
                reason: format!("row {} has length {}, expected {}", index, row.len(), width),
            });
        }

        Ok(Self {
            rows: height,
            columns: width,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// A solid rectangle of a single object id
    pub fn solid(rows: usize, columns: usize, id: ObjectId) -> Self {
        Self {
            rows,
            columns,
            cells: vec![id; rows * columns],
        }
    }

    /// The vertical link pattern `[top, Link, Link, bottom]`
    pub fn vertical_link(top: ObjectId, bottom: ObjectId) -> Self {
        Self {
            rows: 4,
            columns: 1,
            cells: vec![top, LINK_ID, LINK_ID, bottom],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Object id at an offset inside the stencil
    pub fn get(&self, row: usize, col: usize) -> ObjectId {
        self.cells[row * self.columns + col]
    }

    /// Every `(row offset, column offset, object id)` in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, ObjectId)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(index, &id)| (index / self.columns, index % self.columns, id))
    }

    pub fn fits_in(&self, grid: GridSize) -> bool {
        self.rows <= grid.rows && self.columns <= grid.columns
    }

    /// Top-left positions at which the whole stencil lies inside the grid
    pub fn anchors(&self, grid: GridSize) -> Vec<(usize, usize)> {
        if !self.fits_in(grid) {
            return Vec::new();
        }
        iproduct!(0..=grid.rows - self.rows, 0..=grid.columns - self.columns).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows() {
        let stencil = Stencil::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
        assert_eq!(stencil.rows(), 2);
        assert_eq!(stencil.columns(), 2);
        assert_eq!(stencil.get(1, 0), 3);

        assert!(Stencil::from_rows(vec![]).is_err());
        assert!(Stencil::from_rows(vec![vec![1, 2], vec![3]]).is_err());
    }

    #[test]
    fn test_vertical_link_layout() {
        let stencil = Stencil::vertical_link(3, 1);
        let cells: Vec<_> = stencil.cells().collect();
        assert_eq!(cells, vec![(0, 0, 3), (1, 0, LINK_ID), (2, 0, LINK_ID), (3, 0, 1)]);
    }

    #[test]
    fn test_anchor_enumeration() {
        let grid = GridSize::new(6, 3);
        let block = Stencil::solid(1, 2, 1);
        let anchors = block.anchors(grid);
        assert_eq!(anchors.len(), 6 * 2);
        assert_eq!(anchors.first(), Some(&(0, 0)));
        assert_eq!(anchors.last(), Some(&(5, 1)));

        let link = Stencil::vertical_link(1, 2);
        assert_eq!(link.anchors(grid).len(), 3 * 3);
    }

    #[test]
    fn test_oversized_stencil_has_no_anchors() {
        let grid = GridSize::new(3, 3);
        assert!(Stencil::vertical_link(1, 2).anchors(grid).is_empty());
        assert!(Stencil::solid(1, 4, 1).anchors(grid).is_empty());
        assert!(!Stencil::solid(1, 4, 1).fits_in(grid));
    }
}
