use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use tracker_tester::runner::{run_suite, RunOptions};
use tracker_tester::utils::config::HarnessConfig;
use tracker_tester::{report, scenarios};

#[derive(Parser)]
#[command(name = "tracker-tester")]
#[command(version = "0.1.0")]
#[command(about = "Black-box API testing CLI for the TrackerPro backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scenario suite against a backend
    Run {
        /// Base URL of the backend under test
        base_url: Option<String>,

        /// Path to a YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output directory for reports
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Generate reports (JSON, JUnit)
        #[arg(long, default_value = "false")]
        report: bool,

        /// Filter scenarios by tags (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        tags: Option<Vec<String>>,

        /// Run only scenarios whose name contains this string
        #[arg(long)]
        scenario: Option<String>,
    },

    /// List registered scenarios
    Scenarios,

    /// Generate report from saved test results
    Report {
        /// Path to test results JSON
        results: PathBuf,

        /// Output format (json, junit)
        #[arg(short, long, default_value = "junit")]
        format: String,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            base_url,
            config,
            output,
            report,
            tags,
            scenario,
        } => {
            let config = HarnessConfig::load(config.as_deref(), base_url.as_deref())?;

            println!(
                "{} Running API tests against: {}",
                "▶".green().bold(),
                config.base_url.cyan()
            );
            if let Some(ref tags_list) = tags {
                println!("  Tags: {}", tags_list.join(", ").yellow());
            }
            if let Some(ref name) = scenario {
                println!("  Scenario filter: {}", name.cyan());
            }
            if report {
                println!("  Reports: {}", "Enabled".green());
                println!("  Output: {}", output.display().to_string().cyan());
            }

            let summary = run_suite(RunOptions {
                config,
                output_dir: output,
                report,
                tags,
                scenario,
            })
            .await?;

            if !summary.all_passed() {
                std::process::exit(1);
            }
        }

        Commands::Scenarios => {
            println!("{} Registered scenarios:", "📋".to_string().blue());
            for scenario in scenarios::all_scenarios() {
                if scenario.tags().is_empty() {
                    println!("  - {}", scenario.name());
                } else {
                    println!(
                        "  - {} [{}]",
                        scenario.name(),
                        scenario.tags().join(", ").dimmed()
                    );
                }
            }
        }

        Commands::Report {
            results,
            format,
            output,
        } => {
            println!(
                "{} Generating {} report from: {}",
                "📊".to_string().blue(),
                format.cyan(),
                results.display()
            );
            report::generate_report(&results, &format, output.as_deref()).await?;
        }
    }

    Ok(())
}
