//! Diagram Layout SAT Solver
//!
//! This library places the rectangular objects of a diagram on a grid using
//! SAT solving: objects never overlap, each forms a solid rectangle of its
//! footprint, and every link is drawn as a vertical connector between the two
//! objects it joins.

pub mod config;
pub mod diagram;
pub mod error;
pub mod layout;
pub mod sat;
pub mod utils;

pub use config::Settings;
pub use error::LayoutError;
pub use layout::{LayoutProblem, LayoutSolution};
pub use sat::SolveStatus;

use anyhow::Result;

/// Main entry point for solving a layout problem
pub fn solve_layout(settings: Settings) -> Result<LayoutSolution> {
    let problem = LayoutProblem::new(settings)?;
    problem.solve()
}
