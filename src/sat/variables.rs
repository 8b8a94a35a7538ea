//! Placement variables: one boolean per (row, column, object)

use super::CnfModel;
use crate::diagram::{GridSize, ObjectId, ObjectSet};
use crate::error::LayoutError;
use std::collections::HashMap;

/// Key of a placement variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableType {
    /// Object `object` occupies cell `(row, col)`
    Placement { row: usize, col: usize, object: ObjectId },
}

/// The decision space: exactly `rows * columns * |objects|` variables,
/// allocated once when the model is created.
#[derive(Debug)]
pub struct PlacementVariables {
    variable_map: HashMap<VariableType, i32>,
    grid: GridSize,
    object_ids: Vec<ObjectId>,
}

impl PlacementVariables {
    /// Declare every placement variable in row-major, then object, order
    pub fn allocate(model: &mut CnfModel, grid: GridSize, objects: &ObjectSet) -> Self {
        let object_ids: Vec<ObjectId> = objects.ids().collect();
        let mut variable_map = HashMap::with_capacity(grid.cell_count() * object_ids.len());

        for (row, col) in grid.cells() {
            for &object in &object_ids {
                variable_map.insert(VariableType::Placement { row, col, object }, model.declare_boolean());
            }
        }

        Self {
            variable_map,
            grid,
            object_ids,
        }
    }

    /// Variable for `object` at `(row, col)`
    pub fn placement(&self, row: usize, col: usize, object: ObjectId) -> Result<i32, LayoutError> {
        self.variable_map
            .get(&VariableType::Placement { row, col, object })
            .copied()
            .ok_or(LayoutError::UnknownPlacement { row, col, object })
    }

    /// Variables of every object at one cell
    pub fn cell_variables(&self, row: usize, col: usize) -> Result<Vec<i32>, LayoutError> {
        self.object_ids
            .iter()
            .map(|&object| self.placement(row, col, object))
            .collect()
    }

    /// Variables of one object over the whole grid
    pub fn object_variables(&self, object: ObjectId) -> Result<Vec<i32>, LayoutError> {
        self.grid
            .cells()
            .map(|(row, col)| self.placement(row, col, object))
            .collect()
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    pub fn object_ids(&self) -> &[ObjectId] {
        &self.object_ids
    }

    pub fn len(&self) -> usize {
        self.variable_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variable_map.is_empty()
    }
}
