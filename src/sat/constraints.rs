//! Constraint generation for the diagram layout encoding

use super::pattern::enforce_unique_occurrence;
use super::{CnfModel, PlacementVariables};
use crate::diagram::{GridSize, ObjectSet, Stencil};
use crate::error::LayoutError;
use log::debug;

/// Clauses emitted by each structural rule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleClauseCounts {
    pub occupancy: usize,
    pub size: usize,
    pub coherence: usize,
    pub linkage: usize,
}

impl RuleClauseCounts {
    pub fn total(&self) -> usize {
        self.occupancy + self.size + self.coherence + self.linkage
    }
}

/// Generates the layout constraints.
///
/// Owns the model and the placement variables; the rules run in a fixed order
/// (occupancy, size, coherence, linkage), which only affects clause order.
pub struct ConstraintGenerator {
    model: CnfModel,
    placements: PlacementVariables,
    grid: GridSize,
    rule_clauses: RuleClauseCounts,
}

impl ConstraintGenerator {
    /// Create a generator and allocate the placement variables
    pub fn new(grid: GridSize, objects: &ObjectSet) -> Self {
        let mut model = CnfModel::new();
        let placements = PlacementVariables::allocate(&mut model, grid, objects);

        Self {
            model,
            placements,
            grid,
            rule_clauses: RuleClauseCounts::default(),
        }
    }

    /// Apply all four rules
    pub fn generate_all_constraints(&mut self, objects: &ObjectSet) -> Result<(), LayoutError> {
        // 1. At most one object per cell
        let before = self.model.clause_count();
        self.enforce_single_occupancy()?;
        self.rule_clauses.occupancy = self.model.clause_count() - before;

        // 2. Every object covers exactly its size
        let before = self.model.clause_count();
        self.enforce_object_sizes(objects)?;
        self.rule_clauses.size = self.model.clause_count() - before;

        // 3. Every object is one solid rectangle
        let before = self.model.clause_count();
        self.enforce_object_coherence(objects)?;
        self.rule_clauses.coherence = self.model.clause_count() - before;

        // 4. Linked objects sit in the vertical link pattern
        let before = self.model.clause_count();
        self.enforce_object_links(objects)?;
        self.rule_clauses.linkage = self.model.clause_count() - before;

        debug!(
            "Rule clauses: occupancy {}, size {}, coherence {}, linkage {}",
            self.rule_clauses.occupancy,
            self.rule_clauses.size,
            self.rule_clauses.coherence,
            self.rule_clauses.linkage
        );

        Ok(())
    }

    fn enforce_single_occupancy(&mut self) -> Result<(), LayoutError> {
        for (row, col) in self.grid.cells() {
            let options = self.placements.cell_variables(row, col)?;
            self.model.add_at_most(&options, 1);
        }
        Ok(())
    }

    /// The link placeholder is exempt: it fills as many cells as the links need.
    fn enforce_object_sizes(&mut self, objects: &ObjectSet) -> Result<(), LayoutError> {
        for object in objects.placeable() {
            let options = self.placements.object_variables(object.id())?;
            self.model.add_exactly(&options, object.size());
        }
        Ok(())
    }

    fn enforce_object_coherence(&mut self, objects: &ObjectSet) -> Result<(), LayoutError> {
        for object in objects.placeable() {
            let pattern = Stencil::solid(object.rows(), object.columns(), object.id());
            self.require_pattern(&pattern)?;
        }
        Ok(())
    }

    fn enforce_object_links(&mut self, objects: &ObjectSet) -> Result<(), LayoutError> {
        for object in objects.iter() {
            for target_name in object.linked_to() {
                let target = objects.resolve_link(object, target_name)?;
                let pattern = Stencil::vertical_link(object.id(), target.id());
                self.require_pattern(&pattern)?;
            }
        }
        Ok(())
    }

    /// Require `pattern` exactly once, returning its anchor indicators
    pub fn require_pattern(&mut self, pattern: &Stencil) -> Result<Vec<i32>, LayoutError> {
        let placements = &self.placements;
        enforce_unique_occurrence(&mut self.model, self.grid, pattern, |row, col, id| {
            placements.placement(row, col, id)
        })
    }

    pub fn model(&self) -> &CnfModel {
        &self.model
    }

    pub fn placements(&self) -> &PlacementVariables {
        &self.placements
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    /// Get constraint generation statistics
    pub fn statistics(&self) -> ConstraintStatistics {
        ConstraintStatistics {
            grid: self.grid,
            placement_variables: self.placements.len(),
            auxiliary_variables: self.model.auxiliary_count(),
            total_variables: self.model.variable_count(),
            total_clauses: self.model.clause_count(),
            rule_clauses: self.rule_clauses,
        }
    }
}

/// Statistics about constraint generation
#[derive(Debug, Clone)]
pub struct ConstraintStatistics {
    pub grid: GridSize,
    pub placement_variables: usize,
    pub auxiliary_variables: usize,
    pub total_variables: usize,
    pub total_clauses: usize,
    pub rule_clauses: RuleClauseCounts,
}

impl std::fmt::Display for ConstraintStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Constraint Generation Statistics:")?;
        writeln!(f, "  Grid size: {}", self.grid)?;
        writeln!(f, "  Placement variables: {}", self.placement_variables)?;
        writeln!(f, "  Auxiliary variables: {}", self.auxiliary_variables)?;
        writeln!(f, "  Total clauses: {}", self.total_clauses)?;
        writeln!(f, "    occupancy: {}", self.rule_clauses.occupancy)?;
        writeln!(f, "    size:      {}", self.rule_clauses.size)?;
        writeln!(f, "    coherence: {}", self.rule_clauses.coherence)?;
        writeln!(f, "    linkage:   {}", self.rule_clauses.linkage)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::{salesforce_objects, DiagramObject};

    fn salesforce() -> ObjectSet {
        ObjectSet::new(salesforce_objects()).unwrap()
    }

    #[test]
    fn test_generator_creation() {
        let objects = salesforce();
        let generator = ConstraintGenerator::new(GridSize::new(6, 3), &objects);
        let stats = generator.statistics();
        assert_eq!(stats.placement_variables, 72);
        assert_eq!(stats.total_clauses, 0);
    }

    #[test]
    fn test_rule_clause_counts() {
        let objects = salesforce();
        let mut generator = ConstraintGenerator::new(GridSize::new(6, 3), &objects);
        generator.generate_all_constraints(&objects).unwrap();
        let stats = generator.statistics();

        // 18 cells, pairwise at-most-one over 4 objects: 6 clauses each
        assert_eq!(stats.rule_clauses.occupancy, 18 * 6);
        assert!(stats.rule_clauses.size > 0);
        assert!(stats.rule_clauses.coherence > 0);
        assert!(stats.rule_clauses.linkage > 0);
        assert_eq!(stats.rule_clauses.total(), stats.total_clauses);
        assert!(stats.auxiliary_variables > 0);
        assert_eq!(stats.total_variables, 72 + stats.auxiliary_variables);
    }

    #[test]
    fn test_unknown_link_fails_before_encoding() {
        let mut objects = salesforce_objects();
        objects.push(DiagramObject::new("Case", ["Ticket"], 4));
        assert!(matches!(
            ObjectSet::new(objects),
            Err(LayoutError::UnknownLink { .. })
        ));
    }

    #[test]
    fn test_require_pattern_reports_anchors() {
        let objects = salesforce();
        let mut generator = ConstraintGenerator::new(GridSize::new(6, 3), &objects);
        let anchors = generator.require_pattern(&Stencil::solid(2, 2, 1)).unwrap();
        assert_eq!(anchors.len(), 5 * 2);
    }
}
