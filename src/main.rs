//! Main CLI application for the diagram layout solver

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use diagram_layout::{
    config::{CliOverrides, Settings},
    diagram::{create_example_objects, load_objects_from_file, GridSize, ObjectSet},
    layout::{LayoutProblem, LayoutSolution, LayoutValidator},
    utils::{logging, ColorOutput, LayoutFormatter},
    SolveStatus,
};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "diagram_layout")]
#[command(about = "Diagram Layout SAT Solver")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Place the objects of a diagram on a grid
    Solve {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Objects file (overrides config)
        #[arg(long)]
        objects: Option<PathBuf>,

        /// Solver timeout in seconds (overrides config)
        #[arg(short, long)]
        timeout: Option<u64>,

        /// Grid rows (overrides the computed size)
        #[arg(long)]
        rows: Option<usize>,

        /// Grid columns (overrides the computed size)
        #[arg(long)]
        columns: Option<usize>,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Create example configuration and object files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Show grid size and encoding estimates for a set of objects
    Analyze {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Objects file
        #[arg(long)]
        objects: PathBuf,
    },

    /// Re-check a saved JSON layout against its objects
    Validate {
        /// Objects file
        #[arg(long)]
        objects: PathBuf,

        /// Layout file written with the json output format
        #[arg(short, long)]
        layout: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            config,
            objects,
            timeout,
            rows,
            columns,
            output,
            verbose,
        } => {
            logging::init(verbose);
            let overrides = CliOverrides {
                objects_file: objects,
                timeout_seconds: timeout,
                rows,
                columns,
                output_dir: output,
            };
            solve_command(&config, &overrides, verbose)
        }
        Commands::Setup { directory, force } => {
            logging::init(false);
            setup_command(&directory, force)
        }
        Commands::Analyze { config, objects } => {
            logging::init(false);
            analyze_command(&config, &objects)
        }
        Commands::Validate { objects, layout } => {
            logging::init(false);
            validate_command(&objects, &layout)
        }
    }
}

fn load_settings(config_path: &Path) -> Result<Settings> {
    if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))
    } else {
        warn!("Config file {} not found, using defaults", config_path.display());
        Ok(Settings::default())
    }
}

fn solve_command(config_path: &Path, overrides: &CliOverrides, verbose: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Starting Diagram Layout Solver"));

    let mut settings = load_settings(config_path)?;
    settings.merge_with_cli(overrides);

    if verbose {
        println!("Configuration:");
        println!("  Objects file: {}", settings.input.objects_file.display());
        println!("  Timeout: {}s", settings.solver.timeout_seconds);
        println!("  Grid overrides: {:?} x {:?}", settings.grid.rows, settings.grid.columns);
        println!("  Output dir: {}", settings.output.output_directory.display());
        println!();
    }

    settings.validate().context("Configuration validation failed")?;

    let start_time = Instant::now();
    let problem = LayoutProblem::new(settings.clone()).context("Failed to create layout problem")?;

    if verbose {
        println!("{}", problem.estimate_complexity());
    }

    let solution = problem.solve().context("Failed to solve layout problem")?;
    let total_time = start_time.elapsed();

    match solution.status {
        SolveStatus::Satisfiable => println!(
            "{}",
            ColorOutput::success(&format!("Layout found in {:.3}s", total_time.as_secs_f64()))
        ),
        SolveStatus::Unsatisfiable => println!(
            "{}",
            ColorOutput::warning(&format!("No layout exists on a {} grid", solution.grid))
        ),
        SolveStatus::Timeout => println!(
            "{}",
            ColorOutput::warning(&format!(
                "No layout found within {}s",
                settings.solver.timeout_seconds
            ))
        ),
    }

    println!("\n{}", LayoutFormatter::format_solution(&solution, problem.objects()));

    let path = LayoutFormatter::save_solution(
        &solution,
        problem.objects(),
        &settings.output.output_directory,
        settings.output.format,
    )
    .context("Failed to save layout")?;
    info!("Layout saved to {}", path.display());

    Ok(())
}

fn setup_command(directory: &Path, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up project structure..."));

    let config_dir = directory.join("config");
    let input_dir = directory.join("input/objects");
    let output_dir = directory.join("output/layouts");

    for dir in [&config_dir, &input_dir, &output_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default()
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    create_example_objects(&input_dir).context("Failed to create example objects")?;
    println!("Created example objects in: {}", input_dir.display());

    let examples_dir = config_dir.join("examples");
    std::fs::create_dir_all(&examples_dir)?;

    // The sized grid is too short for the two stacked links of the sample
    let mut salesforce = Settings::default();
    salesforce.grid.rows = Some(8);
    salesforce.grid.columns = Some(3);
    salesforce.to_file(examples_dir.join("salesforce.yaml"))?;

    let mut pair = Settings::default();
    pair.input.objects_file = PathBuf::from("input/objects/order_invoice.yaml");
    pair.output.format = diagram_layout::config::OutputFormat::Json;
    pair.to_file(examples_dir.join("order_invoice.yaml"))?;

    println!("Created example configurations in: {}", examples_dir.display());

    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit configuration files in {}", config_dir.display());
    println!("2. Add your objects to {}", input_dir.display());
    println!("3. Run: cargo run -- solve --config config/examples/salesforce.yaml");

    Ok(())
}

fn analyze_command(config_path: &Path, objects_path: &Path) -> Result<()> {
    println!("{}", ColorOutput::info("Analyzing objects..."));

    let settings = load_settings(config_path)?;
    let objects = load_objects_from_file(objects_path)
        .with_context(|| format!("Failed to load objects from {}", objects_path.display()))?;

    let problem = LayoutProblem::with_objects(settings, objects).context("Failed to create problem for analysis")?;
    let set = problem.objects();

    println!("Objects:");
    println!("  Id | Name             | Footprint | Links");
    for object in set.iter() {
        println!(
            "  {:2} | {:16} | {:>9} | {}",
            object.id(),
            object.name(),
            format!("{}x{}", object.rows(), object.columns()),
            object.linked_to().join(", ")
        );
    }

    println!("\nComputed grid: {}", GridSize::for_objects(set));
    println!("Grid used:     {}", problem.grid());
    println!("\n{}", problem.estimate_complexity());

    Ok(())
}

fn validate_command(objects_path: &Path, layout_path: &Path) -> Result<()> {
    println!("{}", ColorOutput::info("Validating layout..."));

    let objects = load_objects_from_file(objects_path)
        .with_context(|| format!("Failed to load objects from {}", objects_path.display()))?;
    let objects = ObjectSet::new(objects)?;

    let solution = LayoutSolution::load_from_file(layout_path)
        .with_context(|| format!("Failed to load layout from {}", layout_path.display()))?;

    let Some(layout) = &solution.layout else {
        println!("{}", ColorOutput::warning(&format!("Layout file holds no layout ({})", solution.status)));
        return Ok(());
    };

    println!("{}", LayoutFormatter::format_layout_with_coords(layout, &objects));

    let result = LayoutValidator::new(&objects).validate(layout);
    if result.is_valid {
        println!("{}", ColorOutput::success("Layout is valid!"));
    } else {
        println!("{}", ColorOutput::error("Layout is invalid"));
        for violation in &result.violations {
            println!("  {}", violation);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "diagram_layout",
            "solve",
            "--config",
            "test.yaml",
            "--rows",
            "8",
            "--timeout",
            "5",
        ]);
        assert!(cli.is_ok());

        let cli = Cli::try_parse_from(["diagram_layout", "validate", "--objects", "o.yaml"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_setup_command() {
        let temp_dir = tempdir().unwrap();
        setup_command(temp_dir.path(), false).unwrap();

        assert!(temp_dir.path().join("config/default.yaml").exists());
        assert!(temp_dir.path().join("input/objects/salesforce.yaml").exists());

        let example = Settings::from_file(temp_dir.path().join("config/examples/salesforce.yaml")).unwrap();
        assert_eq!(example.grid.rows, Some(8));
    }

    #[test]
    fn test_solve_and_validate_round_trip() {
        let temp_dir = tempdir().unwrap();
        let objects_dir = temp_dir.path().join("objects");
        create_example_objects(&objects_dir).unwrap();

        let mut settings = Settings::default();
        settings.input.objects_file = objects_dir.join("order_invoice.yaml");
        settings.output.output_directory = temp_dir.path().join("out");
        settings.output.format = diagram_layout::config::OutputFormat::Json;
        let config = temp_dir.path().join("config.yaml");
        settings.to_file(&config).unwrap();

        solve_command(&config, &CliOverrides::default(), false).unwrap();
        let layout = temp_dir.path().join("out/layout.json");
        assert!(layout.exists());
        validate_command(&objects_dir.join("order_invoice.yaml"), &layout).unwrap();
    }

    #[test]
    fn test_validate_rejects_short_layout() {
        let temp_dir = tempdir().unwrap();
        let objects_dir = temp_dir.path().join("objects");
        create_example_objects(&objects_dir).unwrap();

        let layout = temp_dir.path().join("bad.json");
        std::fs::write(
            &layout,
            r#"{"status":"satisfiable","grid":{"rows":8,"columns":3},"layout":{"rows":8,"columns":3,"cells":[null]}}"#,
        )
        .unwrap();

        let err = validate_command(&objects_dir.join("salesforce.yaml"), &layout).unwrap_err();
        assert!(format!("{:#}", err).contains("needs 24 cells, found 1"));
    }
}
