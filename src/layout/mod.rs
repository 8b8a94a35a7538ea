//! Layout problem definition, solution handling and validation

pub mod problem;
pub mod solution;
pub mod validator;

pub use problem::LayoutProblem;
pub use solution::{LayoutSolution, ObjectPlacement, SolutionStatistics};
pub use validator::{LayoutValidator, Rule, RuleViolation, ValidationResult};
