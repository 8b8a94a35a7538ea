//! Display and output formatting utilities

use crate::config::OutputFormat;
use crate::diagram::{LayoutGrid, ObjectId, ObjectSet, LINK_ID};
use crate::layout::LayoutSolution;
use anyhow::Result;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Glyph drawn for link cells
pub const LINK_GLYPH: char = '+';
/// Glyph drawn for empty cells
pub const EMPTY_GLYPH: char = '·';

/// Format layouts and solutions for display
pub struct LayoutFormatter;

impl LayoutFormatter {
    /// One glyph per object: the first letter of its name when that is free,
    /// otherwise the next unused lowercase letter or digit.
    pub fn glyphs(objects: &ObjectSet) -> HashMap<ObjectId, char> {
        let mut glyphs = HashMap::with_capacity(objects.len());
        let mut used: HashSet<char> = [LINK_GLYPH, EMPTY_GLYPH].into_iter().collect();
        glyphs.insert(LINK_ID, LINK_GLYPH);

        let mut fallback = ('a'..='z').chain('0'..='9');
        for object in objects.placeable() {
            let initial = object.name().chars().next().map(|c| c.to_ascii_uppercase());
            let glyph = match initial {
                Some(c) if c.is_ascii_alphanumeric() && !used.contains(&c) => c,
                _ => fallback.by_ref().find(|c| !used.contains(c)).unwrap_or('?'),
            };
            used.insert(glyph);
            glyphs.insert(object.id(), glyph);
        }

        glyphs
    }

    fn glyph_at(layout: &LayoutGrid, glyphs: &HashMap<ObjectId, char>, row: usize, col: usize) -> char {
        match layout.get(row, col) {
            Some(id) => glyphs.get(&id).copied().unwrap_or('?'),
            None => EMPTY_GLYPH,
        }
    }

    /// Format a layout in compact form
    pub fn format_layout_compact(layout: &LayoutGrid, objects: &ObjectSet) -> String {
        let glyphs = Self::glyphs(objects);
        let mut output = String::new();
        for row in 0..layout.rows {
            for col in 0..layout.columns {
                output.push(Self::glyph_at(layout, &glyphs, row, col));
            }
            output.push('\n');
        }
        output
    }

    /// Format a layout with coordinates
    pub fn format_layout_with_coords(layout: &LayoutGrid, objects: &ObjectSet) -> String {
        let glyphs = Self::glyphs(objects);
        let mut output = String::new();

        // Header with column numbers
        output.push_str("   ");
        for col in 0..layout.columns {
            output.push_str(&format!("{:2}", col % 10));
        }
        output.push('\n');

        for row in 0..layout.rows {
            output.push_str(&format!("{:2} ", row));
            for col in 0..layout.columns {
                output.push(' ');
                output.push(Self::glyph_at(layout, &glyphs, row, col));
            }
            output.push('\n');
        }

        output
    }

    /// Glyph legend, one object per line
    pub fn format_legend(objects: &ObjectSet) -> String {
        let glyphs = Self::glyphs(objects);
        let mut output = String::from("Legend:\n");
        for object in objects.iter() {
            let glyph = glyphs.get(&object.id()).copied().unwrap_or('?');
            output.push_str(&format!(
                "  {} {} (id {}, {}x{})\n",
                glyph,
                object.name(),
                object.id(),
                object.rows(),
                object.columns()
            ));
        }
        output
    }

    /// Format a single solution for console output
    pub fn format_solution(solution: &LayoutSolution, objects: &ObjectSet) -> String {
        let mut output = String::new();

        output.push_str("=== Layout ===\n");
        output.push_str(&format!("Status: {}\n", solution.status));
        output.push_str(&format!("Grid: {}\n", solution.grid));
        output.push_str(&format!("Solve Time: {:.3}s\n", solution.solve_time.as_secs_f64()));
        if let Some(stats) = &solution.statistics {
            output.push_str(&format!(
                "Variables: {} placement + {} auxiliary, Clauses: {}\n",
                stats.placement_variables, stats.auxiliary_variables, stats.total_clauses
            ));
        }

        let Some(layout) = &solution.layout else {
            return output;
        };

        output.push('\n');
        output.push_str(&Self::format_layout_with_coords(layout, objects));
        output.push('\n');
        output.push_str(&Self::format_legend(objects));
        output.push('\n');
        output.push_str(&Self::format_placement_table(solution, objects));
        output
    }

    /// Placement summary table
    pub fn format_placement_table(solution: &LayoutSolution, objects: &ObjectSet) -> String {
        let mut output = String::new();
        output.push_str("Object           | Row | Col | Size\n");
        output.push_str("-----------------|-----|-----|------\n");
        for placement in solution.placements(objects) {
            output.push_str(&format!(
                "{:16} | {:3} | {:3} | {}x{}\n",
                placement.name, placement.top, placement.left, placement.rows, placement.columns
            ));
        }
        output
    }

    /// Save a solution based on output format, returning the written file
    pub fn save_solution<P: AsRef<Path>>(
        solution: &LayoutSolution,
        objects: &ObjectSet,
        output_dir: P,
        format: OutputFormat,
    ) -> Result<PathBuf> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)?;

        let path = match format {
            OutputFormat::Text => {
                let path = output_dir.join("layout.txt");
                std::fs::write(&path, Self::format_solution(solution, objects))?;
                path
            }
            OutputFormat::Json => {
                let path = output_dir.join("layout.json");
                solution.save_to_file(&path)?;
                path
            }
        };

        Ok(path)
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    /// Check if terminal supports color
    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    /// Format success message
    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    /// Format error message
    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    /// Format warning message
    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    /// Format info message
    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
            Color::Magenta => 35,
            Color::Cyan => 36,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::{salesforce_objects, DiagramObject, GridSize};
    use crate::sat::SolveStatus;
    use std::time::Duration;
    use tempfile::tempdir;

    fn salesforce() -> ObjectSet {
        ObjectSet::new(salesforce_objects()).unwrap()
    }

    fn solution() -> LayoutSolution {
        let layout = LayoutGrid::from_rows(vec![
            vec![Some(3), Some(3), None],
            vec![Some(0), None, None],
            vec![Some(0), None, None],
            vec![Some(1), Some(1), None],
        ])
        .unwrap();
        LayoutSolution::new(SolveStatus::Satisfiable, GridSize::new(4, 3), Some(layout), Duration::ZERO)
    }

    #[test]
    fn test_glyphs_are_unique() {
        let objects = ObjectSet::new(vec![
            DiagramObject::link_placeholder(),
            DiagramObject::new("Case", Vec::<String>::new(), 1),
            DiagramObject::new("Contact", Vec::<String>::new(), 2),
        ])
        .unwrap();
        let glyphs = LayoutFormatter::glyphs(&objects);
        assert_eq!(glyphs[&LINK_ID], LINK_GLYPH);
        assert_eq!(glyphs[&1], 'C');
        assert_eq!(glyphs[&2], 'a');
    }

    #[test]
    fn test_layout_formatting() {
        let objects = salesforce();
        let solution = solution();
        let layout = solution.layout.as_ref().unwrap();

        let compact = LayoutFormatter::format_layout_compact(layout, &objects);
        assert_eq!(compact, "UU·\n+··\n+··\nAA·\n");

        let with_coords = LayoutFormatter::format_layout_with_coords(layout, &objects);
        assert!(with_coords.starts_with("    0 1 2\n"));
        assert!(with_coords.contains(" 3  A A ·"));

        let legend = LayoutFormatter::format_legend(&objects);
        assert!(legend.contains("+ Link (id 0, 1x2)"));
        assert!(legend.contains("U User (id 3, 1x2)"));
    }

    #[test]
    fn test_solution_formatting() {
        let objects = salesforce();
        let text = LayoutFormatter::format_solution(&solution(), &objects);
        assert!(text.contains("Status: solution found"));
        assert!(text.contains("User             |   0 |   0 | 1x2"));

        let unsolved = LayoutSolution::new(SolveStatus::Timeout, GridSize::new(6, 3), None, Duration::ZERO);
        let text = LayoutFormatter::format_solution(&unsolved, &objects);
        assert!(text.contains("no solution within time budget"));
        assert!(!text.contains("Legend"));
    }

    #[test]
    fn test_save_solution() {
        let dir = tempdir().unwrap();
        let objects = salesforce();

        let text = LayoutFormatter::save_solution(&solution(), &objects, dir.path(), OutputFormat::Text).unwrap();
        assert!(text.ends_with("layout.txt"));
        assert!(std::fs::read_to_string(text).unwrap().contains("Legend"));

        let json = LayoutFormatter::save_solution(&solution(), &objects, dir.path(), OutputFormat::Json).unwrap();
        let loaded = LayoutSolution::load_from_file(json).unwrap();
        assert_eq!(loaded.layout, solution().layout);
    }

    #[test]
    fn test_color_output() {
        let colored = ColorOutput::colored("test", Color::Red);
        // Should either be colored or plain text
        assert!(colored.contains("test"));

        let success = ColorOutput::success("OK");
        assert!(success.contains("OK"));
    }
}
