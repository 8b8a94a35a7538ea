//! SAT encoder for the diagram layout problem

use super::{ConstraintGenerator, ConstraintStatistics, PlacementVariables, SatSolver, SolveStatus, SolverSolution};
use crate::diagram::{GridSize, LayoutGrid, ObjectSet};
use anyhow::{Context, Result};
use log::{debug, info};
use std::time::Duration;

/// Main SAT encoder for layout problems
pub struct LayoutEncoder {
    objects: ObjectSet,
    grid: GridSize,
    timeout: Duration,
}

/// Result of encoding and solving one layout problem
#[derive(Debug, Clone)]
pub struct EncodedOutcome {
    pub status: SolveStatus,
    pub layout: Option<LayoutGrid>,
    pub statistics: EncodingStatistics,
    pub solve_time: Duration,
}

impl LayoutEncoder {
    /// Create an encoder over a validated object set and a fixed grid
    pub fn new(objects: ObjectSet, grid: GridSize, timeout: Duration) -> Self {
        Self {
            objects,
            grid,
            timeout,
        }
    }

    /// Build the full constraint model without solving it
    pub fn build(&self) -> Result<ConstraintGenerator> {
        let mut generator = ConstraintGenerator::new(self.grid, &self.objects);
        generator
            .generate_all_constraints(&self.objects)
            .context("Failed to generate SAT constraints")?;
        Ok(generator)
    }

    /// Encode and solve the layout problem
    pub fn solve(&self) -> Result<EncodedOutcome> {
        let generator = self.build()?;
        let constraint_stats = generator.statistics();

        info!(
            "Generated {} clauses with {} variables on a {} grid",
            constraint_stats.total_clauses, constraint_stats.total_variables, self.grid
        );

        let mut solver = SatSolver::with_timeout(self.timeout);
        solver
            .add_clauses(generator.model().clauses())
            .context("Failed to add clauses to SAT solver")?;

        let outcome = solver.solve().context("SAT solving failed")?;
        info!(
            "Solver finished in {:.3}s: {}",
            outcome.solve_time.as_secs_f64(),
            outcome.status
        );

        let layout = match &outcome.solution {
            Some(solution) => Some(self.extract_layout(generator.placements(), solution)?),
            None => None,
        };

        Ok(EncodedOutcome {
            status: outcome.status,
            layout,
            statistics: EncodingStatistics::new(&self.objects, constraint_stats),
            solve_time: outcome.solve_time,
        })
    }

    /// Read the layout off a satisfying assignment.
    ///
    /// The occupancy rule guarantees at most one true placement per cell; a
    /// second one would mean the model was not respected.
    pub fn extract_layout(&self, placements: &PlacementVariables, solution: &SolverSolution) -> Result<LayoutGrid> {
        let mut layout = LayoutGrid::new(self.grid);

        for (row, col) in self.grid.cells() {
            let mut occupant = None;
            for &id in placements.object_ids() {
                if !solution.value(placements.placement(row, col, id)?) {
                    continue;
                }
                if let Some(other) = occupant.replace(id) {
                    anyhow::bail!("Cell ({}, {}) assigned to both {} and {}", row, col, other, id);
                }
            }
            layout.set(row, col, occupant)?;
        }

        debug!("Extracted layout with {} occupied cells", layout.occupied_count());
        Ok(layout)
    }

    pub fn objects(&self) -> &ObjectSet {
        &self.objects
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    /// Heuristic size of the encoding before building it
    pub fn estimate_complexity(&self) -> ComplexityEstimate {
        let cells = self.grid.cell_count();
        let placement_variables = cells * self.objects.len();

        // Every rule instance contributes one indicator per anchor
        let pattern_count = self.objects.placeable().count() + self.objects.links().len();
        let estimated_variables = placement_variables + pattern_count * cells;
        let estimated_clauses = cells * self.objects.len() * self.objects.len() + pattern_count * cells * 4;

        let complexity_level = if estimated_variables < 1000 {
            ComplexityLevel::Low
        } else if estimated_variables < 10000 {
            ComplexityLevel::Medium
        } else if estimated_variables < 100000 {
            ComplexityLevel::High
        } else {
            ComplexityLevel::VeryHigh
        };

        ComplexityEstimate {
            complexity_level,
            grid: self.grid,
            object_count: self.objects.len(),
            link_count: self.objects.links().len(),
            placement_variables,
            estimated_variables,
            estimated_clauses,
            fill_ratio: self.objects.total_size() as f64 / cells.max(1) as f64,
        }
    }
}

/// Statistics about the SAT encoding
#[derive(Debug, Clone)]
pub struct EncodingStatistics {
    pub grid: GridSize,
    pub object_count: usize,
    pub link_count: usize,
    pub constraints: ConstraintStatistics,
}

impl EncodingStatistics {
    fn new(objects: &ObjectSet, constraints: ConstraintStatistics) -> Self {
        Self {
            grid: constraints.grid,
            object_count: objects.len(),
            link_count: objects.links().len(),
            constraints,
        }
    }
}

/// Complexity estimate for the problem
#[derive(Debug, Clone)]
pub struct ComplexityEstimate {
    pub complexity_level: ComplexityLevel,
    pub grid: GridSize,
    pub object_count: usize,
    pub link_count: usize,
    pub placement_variables: usize,
    pub estimated_variables: usize,
    pub estimated_clauses: usize,
    pub fill_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComplexityLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl std::fmt::Display for EncodingStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SAT Encoding Statistics:")?;
        writeln!(f, "  Grid: {}", self.grid)?;
        writeln!(f, "  Objects: {}", self.object_count)?;
        writeln!(f, "  Links: {}", self.link_count)?;
        writeln!(f, "  Placement variables: {}", self.constraints.placement_variables)?;
        writeln!(f, "  Auxiliary variables: {}", self.constraints.auxiliary_variables)?;
        writeln!(f, "  Total variables: {}", self.constraints.total_variables)?;
        writeln!(f, "  Total clauses: {}", self.constraints.total_clauses)?;
        let rules = &self.constraints.rule_clauses;
        writeln!(
            f,
            "  Clauses per rule: occupancy {}, size {}, coherence {}, linkage {}",
            rules.occupancy, rules.size, rules.coherence, rules.linkage
        )?;
        Ok(())
    }
}

impl std::fmt::Display for ComplexityEstimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Problem Complexity Estimate:")?;
        writeln!(f, "  Complexity level: {:?}", self.complexity_level)?;
        writeln!(f, "  Grid: {} ({} cells)", self.grid, self.grid.cell_count())?;
        writeln!(f, "  Objects: {} ({} links)", self.object_count, self.link_count)?;
        writeln!(f, "  Placement variables: {}", self.placement_variables)?;
        writeln!(f, "  Estimated variables: {}", self.estimated_variables)?;
        writeln!(f, "  Estimated clauses: {}", self.estimated_clauses)?;
        writeln!(f, "  Fill ratio: {:.2}%", self.fill_ratio * 100.0)?;

        let recommendation = match self.complexity_level {
            ComplexityLevel::Low => "Should solve quickly",
            ComplexityLevel::Medium => "May take some time to solve",
            ComplexityLevel::High => "Likely to be challenging, consider a smaller grid",
            ComplexityLevel::VeryHigh => "Very challenging, consider splitting the diagram",
        };
        writeln!(f, "  Recommendation: {}", recommendation)?;

        Ok(())
    }
}
