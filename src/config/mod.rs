//! Configuration management for the layout solver

pub mod settings;

pub use settings::{CliOverrides, GridConfig, InputConfig, OutputConfig, OutputFormat, Settings, SolverConfig};
