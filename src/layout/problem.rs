//! Layout problem definition

use super::{LayoutSolution, LayoutValidator};
use crate::config::Settings;
use crate::diagram::{load_objects_from_file, DiagramObject, GridSize, ObjectSet};
use crate::sat::{ComplexityEstimate, LayoutEncoder};
use anyhow::{Context, Result};
use log::{info, warn};
use std::time::Duration;

/// A set of objects to place on a grid, together with its settings
pub struct LayoutProblem {
    settings: Settings,
    objects: ObjectSet,
    grid: GridSize,
}

impl LayoutProblem {
    /// Create a new problem, loading objects from the configured file
    pub fn new(settings: Settings) -> Result<Self> {
        let objects = load_objects_from_file(&settings.input.objects_file)
            .context("Failed to load objects file")?;
        Self::with_objects(settings, objects)
    }

    /// Create a problem with explicit objects (useful for testing)
    pub fn with_objects(settings: Settings, objects: Vec<DiagramObject>) -> Result<Self> {
        let objects = ObjectSet::new(objects).context("Invalid object definitions")?;
        let grid = GridSize::for_objects(&objects).with_overrides(settings.grid.rows, settings.grid.columns);

        Ok(Self {
            settings,
            objects,
            grid,
        })
    }

    fn encoder(&self) -> LayoutEncoder {
        LayoutEncoder::new(
            self.objects.clone(),
            self.grid,
            Duration::from_secs(self.settings.solver.timeout_seconds),
        )
    }

    /// Encode, solve and re-check the layout
    pub fn solve(&self) -> Result<LayoutSolution> {
        info!(
            "Placing {} objects with {} links on a {} grid",
            self.objects.len(),
            self.objects.links().len(),
            self.grid
        );

        let outcome = self.encoder().solve()?;

        if let Some(layout) = &outcome.layout {
            let validation = LayoutValidator::new(&self.objects).validate(layout);
            if !validation.is_valid {
                let message = validation.error_message().unwrap_or_default();
                warn!("Solver layout failed validation: {}", message);
                anyhow::bail!("Solver returned an invalid layout: {}", message);
            }
        } else {
            info!("No layout: {}", outcome.status);
        }

        Ok(
            LayoutSolution::new(outcome.status, self.grid, outcome.layout, outcome.solve_time)
                .with_statistics(&outcome.statistics),
        )
    }

    /// Estimate problem size without building the model
    pub fn estimate_complexity(&self) -> ComplexityEstimate {
        self.encoder().estimate_complexity()
    }

    pub fn objects(&self) -> &ObjectSet {
        &self.objects
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::salesforce_objects;
    use crate::sat::SolveStatus;

    #[test]
    fn test_grid_uses_overrides() {
        let mut settings = Settings::default();
        let problem = LayoutProblem::with_objects(settings.clone(), salesforce_objects()).unwrap();
        assert_eq!(problem.grid(), GridSize::new(6, 3));

        settings.grid.rows = Some(8);
        let problem = LayoutProblem::with_objects(settings, salesforce_objects()).unwrap();
        assert_eq!(problem.grid(), GridSize::new(8, 3));
    }

    #[test]
    fn test_invalid_objects_rejected() {
        let objects = vec![DiagramObject::new("Account", ["Contact"], 1)];
        assert!(LayoutProblem::with_objects(Settings::default(), objects).is_err());
    }

    #[test]
    fn test_missing_objects_file() {
        let mut settings = Settings::default();
        settings.input.objects_file = "does/not/exist.yaml".into();
        assert!(LayoutProblem::new(settings).is_err());
    }

    #[test]
    fn test_solve_pair() {
        let objects = vec![
            DiagramObject::link_placeholder(),
            DiagramObject::new("Order", ["Invoice"], 1),
            DiagramObject::new("Invoice", Vec::<String>::new(), 2),
        ];
        let problem = LayoutProblem::with_objects(Settings::default(), objects).unwrap();
        let solution = problem.solve().unwrap();

        assert_eq!(solution.status, SolveStatus::Satisfiable);
        assert!(solution.is_solved());
        let placements = solution.placements(problem.objects());
        let order = placements.iter().find(|p| p.name == "Order").unwrap();
        let invoice = placements.iter().find(|p| p.name == "Invoice").unwrap();
        assert_eq!(invoice.top, order.top + 3);
        assert!(solution.statistics.unwrap().placement_variables > 0);
    }
}
