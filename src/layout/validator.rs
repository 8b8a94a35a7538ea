//! Independent re-check of a solved layout against the placement rules

use crate::diagram::{DiagramObject, LayoutGrid, ObjectSet, Stencil};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// The four structural rules of a layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// Each cell holds at most one known object
    Occupancy,
    /// Each object covers exactly its footprint's number of cells
    Size,
    /// Each object forms one solid rectangle of its footprint
    Coherence,
    /// Each link appears as exactly one vertical link pattern
    Linkage,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rule::Occupancy => "occupancy",
            Rule::Size => "size",
            Rule::Coherence => "coherence",
            Rule::Linkage => "linkage",
        };
        f.write_str(name)
    }
}

/// Represents a rule violation found during validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleViolation {
    pub rule: Rule,
    pub object: String,
    pub message: String,
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.rule, self.object, self.message)
    }
}

/// Result of layout validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub violations: Vec<RuleViolation>,
    pub validation_time_ms: u64,
    pub cells_checked: usize,
}

impl ValidationResult {
    /// Violations of one rule
    pub fn violations_of(&self, rule: Rule) -> impl Iterator<Item = &RuleViolation> {
        self.violations.iter().filter(move |violation| violation.rule == rule)
    }

    /// Short description naming the first few violations
    pub fn error_message(&self) -> Option<String> {
        if self.is_valid {
            return None;
        }

        let mut message = format!("Found {} rule violations. ", self.violations.len());
        for violation in self.violations.iter().take(3) {
            message.push_str(&format!("{}; ", violation));
        }
        if self.violations.len() > 3 {
            message.push_str(&format!("... and {} more", self.violations.len() - 3));
        }
        Some(message)
    }
}

/// Validates solved layouts against an object set
pub struct LayoutValidator<'a> {
    objects: &'a ObjectSet,
}

impl<'a> LayoutValidator<'a> {
    pub fn new(objects: &'a ObjectSet) -> Self {
        Self { objects }
    }

    /// Check every rule on `layout`
    pub fn validate(&self, layout: &LayoutGrid) -> ValidationResult {
        let start_time = Instant::now();

        let mut violations = self.check_occupancy(layout);

        let object_violations: Vec<RuleViolation> = self
            .objects
            .objects()
            .par_iter()
            .filter(|object| !object.is_link_placeholder())
            .flat_map_iter(|object| self.check_object(layout, object))
            .collect();
        violations.extend(object_violations);

        let link_violations: Vec<RuleViolation> = self
            .objects
            .objects()
            .par_iter()
            .flat_map_iter(|object| self.check_links(layout, object))
            .collect();
        violations.extend(link_violations);

        ValidationResult {
            is_valid: violations.is_empty(),
            violations,
            validation_time_ms: start_time.elapsed().as_millis() as u64,
            cells_checked: layout.cells.len(),
        }
    }

    /// Cells must hold ids from the object set
    fn check_occupancy(&self, layout: &LayoutGrid) -> Vec<RuleViolation> {
        layout
            .size()
            .cells()
            .filter_map(|(row, col)| {
                let id = layout.get(row, col)?;
                if self.objects.contains(id) {
                    None
                } else {
                    Some(RuleViolation {
                        rule: Rule::Occupancy,
                        object: format!("#{}", id),
                        message: format!("cell ({}, {}) holds an unknown object id", row, col),
                    })
                }
            })
            .collect()
    }

    fn check_object(&self, layout: &LayoutGrid, object: &DiagramObject) -> Vec<RuleViolation> {
        let mut violations = Vec::new();

        let count = layout.count_of(object.id());
        if count != object.size() {
            violations.push(RuleViolation {
                rule: Rule::Size,
                object: object.name().to_string(),
                message: format!("covers {} cells, expected {}", count, object.size()),
            });
        }

        let stencil = Stencil::solid(object.rows(), object.columns(), object.id());
        let occurrences = layout.occurrences(&stencil).len();
        if occurrences != 1 {
            violations.push(RuleViolation {
                rule: Rule::Coherence,
                object: object.name().to_string(),
                message: format!(
                    "{}x{} rectangle found {} times, expected once",
                    object.rows(),
                    object.columns(),
                    occurrences
                ),
            });
        }

        violations
    }

    fn check_links(&self, layout: &LayoutGrid, object: &DiagramObject) -> Vec<RuleViolation> {
        object
            .linked_to()
            .iter()
            .filter_map(|target_name| {
                let Some(target) = self.objects.find_by_name(target_name) else {
                    return Some(RuleViolation {
                        rule: Rule::Linkage,
                        object: object.name().to_string(),
                        message: format!("links to unknown object '{}'", target_name),
                    });
                };

                let stencil = Stencil::vertical_link(object.id(), target.id());
                let occurrences = layout.occurrences(&stencil).len();
                (occurrences != 1).then(|| RuleViolation {
                    rule: Rule::Linkage,
                    object: object.name().to_string(),
                    message: format!(
                        "link to '{}' found {} times, expected once",
                        target.name(), occurrences
                    ),
                })
            })
            .collect()
    }
}
