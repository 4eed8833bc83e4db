use super::types::TestResults;
use crate::runner::state::{ScenarioReport, ScenarioStatus};
use anyhow::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;
use std::path::Path;

/// Generate JUnit XML report string from TestResults
pub fn generate_junit_xml(results: &TestResults) -> Result<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let total_tests = results.scenarios.len();
    let failures = results
        .scenarios
        .iter()
        .filter(|s| {
            matches!(
                s.status,
                ScenarioStatus::Failed | ScenarioStatus::PartiallyPassed { .. }
            )
        })
        .count();
    let skipped = results
        .scenarios
        .iter()
        .filter(|s| matches!(s.status, ScenarioStatus::Skipped { .. }))
        .count();
    let total_duration: u64 = results
        .scenarios
        .iter()
        .map(|s| s.duration_ms.unwrap_or(0))
        .sum();

    // <testsuites>
    let mut suites_start = BytesStart::new("testsuites");
    suites_start.push_attribute(("name", "tracker-tester-run"));
    suites_start.push_attribute(("tests", total_tests.to_string().as_str()));
    suites_start.push_attribute(("failures", failures.to_string().as_str()));
    suites_start.push_attribute(("skipped", skipped.to_string().as_str()));
    suites_start.push_attribute((
        "time",
        (total_duration as f64 / 1000.0).to_string().as_str(),
    ));
    writer.write_event(Event::Start(suites_start))?;

    // Single <testsuite> for the run; one testcase per scenario
    let mut suite_start = BytesStart::new("testsuite");
    suite_start.push_attribute(("name", "api"));
    suite_start.push_attribute(("tests", total_tests.to_string().as_str()));
    suite_start.push_attribute(("failures", failures.to_string().as_str()));
    suite_start.push_attribute(("skipped", skipped.to_string().as_str()));
    suite_start.push_attribute(("id", results.session_id.as_str()));
    suite_start.push_attribute((
        "time",
        (total_duration as f64 / 1000.0).to_string().as_str(),
    ));
    suite_start.push_attribute(("timestamp", results.generated_at.as_str()));
    writer.write_event(Event::Start(suite_start))?;

    for scenario in &results.scenarios {
        write_test_case(&mut writer, scenario)?;
    }

    writer.write_event(Event::End(BytesEnd::new("testsuite")))?;
    writer.write_event(Event::End(BytesEnd::new("testsuites")))?;

    let result = writer.into_inner().into_inner();
    let xml = String::from_utf8(result)?;
    Ok(xml)
}

fn write_test_case<W: std::io::Write>(
    writer: &mut Writer<W>,
    scenario: &ScenarioReport,
) -> Result<()> {
    let mut case_start = BytesStart::new("testcase");
    case_start.push_attribute(("name", scenario.name.as_str()));
    case_start.push_attribute(("classname", "tracker_tester.api"));
    case_start.push_attribute((
        "time",
        (scenario.duration_ms.unwrap_or(0) as f64 / 1000.0)
            .to_string()
            .as_str(),
    ));
    writer.write_event(Event::Start(case_start))?;

    match &scenario.status {
        ScenarioStatus::Failed | ScenarioStatus::PartiallyPassed { .. } => {
            let first_failure = scenario.checks.iter().find(|c| !c.passed);
            let message = scenario
                .error
                .clone()
                .or_else(|| first_failure.map(|c| format!("{}: {}", c.name, c.message)))
                .unwrap_or_else(|| "Unknown error".to_string());

            let mut fail_start = BytesStart::new("failure");
            fail_start.push_attribute(("message", message.as_str()));
            fail_start.push_attribute(("type", "AssertionError"));
            writer.write_event(Event::Start(fail_start))?;

            let body: Vec<String> = scenario
                .checks
                .iter()
                .filter(|c| !c.passed)
                .map(|c| format!("{}: {}", c.name, c.message))
                .collect();
            if !body.is_empty() {
                writer.write_event(Event::Text(BytesText::new(&body.join("\n"))))?;
            }

            writer.write_event(Event::End(BytesEnd::new("failure")))?;
        }
        ScenarioStatus::Skipped { reason } => {
            let mut skip_start = BytesStart::new("skipped");
            skip_start.push_attribute(("message", reason.as_str()));
            writer.write_event(Event::Empty(skip_start))?;
        }
        _ => {}
    }

    writer.write_event(Event::End(BytesEnd::new("testcase")))?;
    Ok(())
}

/// Generate JUnit report, to a file or stdout
pub async fn generate(results: &TestResults, output: Option<&Path>) -> Result<()> {
    let xml = generate_junit_xml(results)?;
    if let Some(path) = output {
        std::fs::write(path, xml)?;
        println!("JUnit report saved to: {}", path.display());
    } else {
        println!("{}", xml);
    }
    Ok(())
}

/// Write report to the run output directory
pub fn write_report(results: &TestResults, output_dir: &Path) -> Result<()> {
    let xml = generate_junit_xml(results)?;
    let path = output_dir.join("junit.xml");
    std::fs::write(&path, xml)?;
    println!("    Generated JUnit report: {}", path.display());
    Ok(())
}
