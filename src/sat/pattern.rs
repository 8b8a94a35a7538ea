//! Exactly-once stencil matching
//!
//! The coherence and link rules both reduce to "this rigid pattern of object
//! ids appears at exactly one anchor". For every anchor where the stencil fits,
//! the placement variables under the stencil are AND-ed into a fresh indicator;
//! the indicators are then constrained to sum to one.

use super::{CnfModel, GateEncoder};
use crate::diagram::{GridSize, ObjectId, Stencil};
use crate::error::LayoutError;
use log::debug;

/// Require `stencil` to appear at exactly one anchor of `grid`.
///
/// `placement(row, col, id)` resolves the placement variable of `id` at a grid
/// cell. Returns the per-anchor indicator variables in anchor order. When the
/// stencil does not fit the grid there are no anchors and the model becomes
/// unsatisfiable.
pub fn enforce_unique_occurrence<F>(
    model: &mut CnfModel,
    grid: GridSize,
    stencil: &Stencil,
    placement: F,
) -> Result<Vec<i32>, LayoutError>
where
    F: Fn(usize, usize, ObjectId) -> Result<i32, LayoutError>,
{
    let anchors = stencil.anchors(grid);
    let mut indicators = Vec::with_capacity(anchors.len());

    for (row, col) in anchors {
        let cells = stencil
            .cells()
            .map(|(dr, dc, id)| placement(row + dr, col + dc, id))
            .collect::<Result<Vec<_>, _>>()?;
        let present = model.declare_auxiliary();
        indicators.push(model.and_iff(&cells, present));
    }

    if indicators.is_empty() {
        debug!(
            "{}x{} stencil does not fit the {} grid",
            stencil.rows(),
            stencil.columns(),
            grid
        );
    }

    model.add_exactly(&indicators, 1);
    Ok(indicators)
}
