//! Solution representation for layout problems

use crate::diagram::{GridSize, LayoutGrid, ObjectId, ObjectSet};
use crate::sat::{EncodingStatistics, SolveStatus};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The outcome of one layout run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutSolution {
    pub status: SolveStatus,
    /// Grid the model was built on
    pub grid: GridSize,
    /// The assignment, present only when `status` is satisfiable
    pub layout: Option<LayoutGrid>,
    /// Time spent inside the solver
    #[serde(skip)]
    pub solve_time: Duration,
    #[serde(default)]
    pub statistics: Option<SolutionStatistics>,
}

/// Encoding size recorded alongside a solution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionStatistics {
    pub placement_variables: usize,
    pub auxiliary_variables: usize,
    pub total_clauses: usize,
}

impl From<&EncodingStatistics> for SolutionStatistics {
    fn from(stats: &EncodingStatistics) -> Self {
        Self {
            placement_variables: stats.constraints.placement_variables,
            auxiliary_variables: stats.constraints.auxiliary_variables,
            total_clauses: stats.constraints.total_clauses,
        }
    }
}

/// Where one object ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectPlacement {
    pub id: ObjectId,
    pub name: String,
    pub top: usize,
    pub left: usize,
    pub rows: usize,
    pub columns: usize,
}

impl LayoutSolution {
    pub fn new(status: SolveStatus, grid: GridSize, layout: Option<LayoutGrid>, solve_time: Duration) -> Self {
        Self {
            status,
            grid,
            layout,
            solve_time,
            statistics: None,
        }
    }

    pub fn with_statistics(mut self, statistics: &EncodingStatistics) -> Self {
        self.statistics = Some(statistics.into());
        self
    }

    pub fn is_solved(&self) -> bool {
        self.status.is_solved() && self.layout.is_some()
    }

    /// Bounding boxes of every placed object except the link placeholder
    pub fn placements(&self, objects: &ObjectSet) -> Vec<ObjectPlacement> {
        let Some(layout) = &self.layout else {
            return Vec::new();
        };

        objects
            .placeable()
            .filter_map(|object| {
                let (top, left, rows, columns) = layout.bounding_box(object.id())?;
                Some(ObjectPlacement {
                    id: object.id(),
                    name: object.name().to_string(),
                    top,
                    left,
                    rows,
                    columns,
                })
            })
            .collect()
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Create from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Save to file
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from file
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }
}
