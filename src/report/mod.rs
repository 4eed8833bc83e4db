pub mod json;
pub mod junit;
pub mod types;

use anyhow::Result;
use std::path::Path;
use types::TestResults;

/// Regenerate a report from a saved results document
pub async fn generate_report(
    results_path: &Path,
    format: &str,
    output: Option<&Path>,
) -> Result<()> {
    let raw = std::fs::read_to_string(results_path)?;
    let results: TestResults = serde_json::from_str(&raw)?;

    match format {
        "json" => json::generate(&results, output).await,
        "junit" => junit::generate(&results, output).await,
        _ => anyhow::bail!("Unknown format: {}", format),
    }
}

/// Write the default report set (results.json + junit.xml) for a finished run
pub fn write_reports(results: &TestResults, output_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(output_dir)?;

    let json_path = output_dir.join("results.json");
    std::fs::write(&json_path, serde_json::to_string_pretty(results)?)?;
    println!("    Generated results: {}", json_path.display());

    junit::write_report(results, output_dir)?;
    Ok(())
}
