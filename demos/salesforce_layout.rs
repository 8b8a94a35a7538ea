//! Demonstration of the layout pipeline on the Salesforce sample
//!
//! Solves the sample once on the computed grid, which is too short for the
//! two stacked links, and once on an 8x3 grid.

use diagram_layout::config::Settings;
use diagram_layout::diagram::salesforce_objects;
use diagram_layout::layout::LayoutProblem;
use diagram_layout::utils::LayoutFormatter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Salesforce Layout Demonstration ===\n");

    for rows in [None, Some(8)] {
        let mut settings = Settings::default();
        settings.grid.rows = rows;

        let problem = LayoutProblem::with_objects(settings, salesforce_objects())?;
        println!("{}", problem.estimate_complexity());

        let solution = problem.solve()?;
        println!("{}", LayoutFormatter::format_solution(&solution, problem.objects()));
    }

    Ok(())
}
