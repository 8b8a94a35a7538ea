//! SAT encoding and solving for diagram layout

pub mod cardinality;
pub mod constraints;
pub mod encoder;
pub mod gates;
pub mod model;
pub mod pattern;
pub mod solver;
pub mod variables;

pub use constraints::{ConstraintGenerator, ConstraintStatistics, RuleClauseCounts};
pub use encoder::{ComplexityEstimate, ComplexityLevel, EncodedOutcome, EncodingStatistics, LayoutEncoder};
pub use gates::GateEncoder;
pub use model::{Clause, CnfModel};
pub use pattern::enforce_unique_occurrence;
pub use solver::{SatSolver, SolveOutcome, SolveStatus, SolverSolution};
pub use variables::PlacementVariables;
