use clap::{Parser, Subcommand};
use std::path::PathBuf;

use steelplan_model::{EntityStore, SolveError, formulate};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "steelplan")]
#[command(about = "Least-cost planning for ore, steel, and distribution", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a scenario and print the optimal plan
    Solve {
        /// Scenario file (JSON); the built-in sample when omitted
        file: Option<PathBuf>,
        /// Output format (pretty, json)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
    /// Check a scenario file for errors
    Check {
        /// The file to check
        file: PathBuf,
    },
    /// Print the built-in sample scenario as JSON
    Export,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve { file, format } => {
            let store = load_store(file.as_deref());

            match steelplan_model::solve(&store) {
                Ok(report) => {
                    if format == "json" {
                        println!(
                            "{}",
                            serde_json::to_string_pretty(&report)
                                .unwrap_or_else(|e| format!("Error: {e}"))
                        );
                    } else {
                        println!("Status: OPTIMAL");
                        println!("Total cost: {:.2}", report.total_cost);
                        println!();
                        println!("Ore shipments:");
                        for row in &report.ore_shipments {
                            println!("  {:15} -> {:15} {:10.2}", row.mine, row.plant, row.tons);
                        }
                        println!();
                        println!("Production:");
                        for row in &report.production {
                            println!("  {:15} {:10} {:10.2}", row.plant, row.grade, row.tons);
                        }
                        println!();
                        println!("Distribution:");
                        for row in &report.distribution {
                            println!(
                                "  {:15} -> {:15} {:10} {:10.2}",
                                row.plant, row.country, row.grade, row.tons
                            );
                        }
                    }
                }
                Err(SolveError::Infeasible) => {
                    println!("Status: INFEASIBLE");
                    println!("No plan satisfies every demand within the supply and capacity limits.");
                    std::process::exit(1);
                }
                Err(SolveError::Unbounded) => {
                    println!("Status: UNBOUNDED");
                    println!("The plan cost can be driven down without limit.");
                    std::process::exit(1);
                }
                Err(SolveError::Solver) => {
                    println!("Status: ERROR");
                    println!("The LP backend failed.");
                    std::process::exit(1);
                }
                Err(SolveError::Build(e)) => {
                    eprintln!("Model error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Check { file } => {
            let store = load_store(Some(file.as_path()));

            match formulate(&store) {
                Ok(formulation) => {
                    println!("✓ {} is valid", file.display());
                    println!("  {} mines", store.mines().len());
                    println!("  {} plants", store.plants().len());
                    println!("  {} steel grades", store.grades().len());
                    println!("  {} markets", store.countries().len());
                    println!(
                        "  model: {} variables, {} constraints",
                        formulation.problem.num_variables(),
                        formulation.problem.num_constraints()
                    );
                }
                Err(e) => {
                    eprintln!("✗ {} has errors:", file.display());
                    eprintln!("  {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Export => {
            println!(
                "{}",
                serde_json::to_string_pretty(&EntityStore::sample())
                    .unwrap_or_else(|e| format!("Error: {e}"))
            );
        }
    }
}

fn load_store(file: Option<&std::path::Path>) -> EntityStore {
    let Some(path) = file else {
        return EntityStore::sample();
    };

    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            std::process::exit(1);
        }
    };

    match serde_json::from_str(&source) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Scenario error in {}: {}", path.display(), e);
            std::process::exit(1);
        }
    }
}
