use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

/// Outcome of a single assertion, immutable once recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub message: String,
    /// Response payload kept for diagnostics on failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
}

/// Scenario execution status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ScenarioStatus {
    Pending,
    Running,
    Passed,
    Failed,
    PartiallyPassed { passed: u32, failed: u32 },
    Skipped { reason: String },
}

/// State for a single scenario execution
#[derive(Debug, Clone)]
pub struct ScenarioState {
    pub name: String,
    pub status: ScenarioStatus,
    pub checks: Vec<CheckResult>,
    pub started_at: Option<Instant>,
    pub finished_at: Option<Instant>,
    pub duration_ms: Option<u64>,
    pub error: Option<String>,
}

impl ScenarioState {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            status: ScenarioStatus::Pending,
            checks: Vec::new(),
            started_at: None,
            finished_at: None,
            duration_ms: None,
            error: None,
        }
    }

    pub fn start(&mut self) {
        self.status = ScenarioStatus::Running;
        self.started_at = Some(Instant::now());
    }

    pub fn skip(&mut self, reason: &str) {
        self.status = ScenarioStatus::Skipped {
            reason: reason.to_string(),
        };
    }

    /// Close out the scenario, deriving its status from the recorded checks.
    /// A scenario-level error forces Failed regardless of check results.
    pub fn finish(&mut self, checks: Vec<CheckResult>, error: Option<String>) {
        self.finished_at = Some(Instant::now());
        if let Some(start) = self.started_at {
            self.duration_ms = Some(start.elapsed().as_millis() as u64);
        }

        let (passed, failed) = checks.iter().fold((0u32, 0u32), |(p, f), check| {
            if check.passed {
                (p + 1, f)
            } else {
                (p, f + 1)
            }
        });

        self.checks = checks;
        self.error = error;

        self.status = if self.error.is_some() {
            ScenarioStatus::Failed
        } else if failed == 0 {
            ScenarioStatus::Passed
        } else if passed == 0 {
            ScenarioStatus::Failed
        } else {
            ScenarioStatus::PartiallyPassed { passed, failed }
        };
    }

    /// Serialize state for reporting (without Instant which isn't serializable)
    pub fn to_report(&self) -> ScenarioReport {
        ScenarioReport {
            name: self.name.clone(),
            status: self.status.clone(),
            checks: self.checks.clone(),
            duration_ms: self.duration_ms,
            error: self.error.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioReport {
    pub name: String,
    pub status: ScenarioStatus,
    pub checks: Vec<CheckResult>,
    pub duration_ms: Option<u64>,
    pub error: Option<String>,
}

/// Global test session state
#[derive(Debug, Clone)]
pub struct SessionState {
    pub session_id: String,
    pub scenarios: Vec<ScenarioState>,
    pub checks_run: u32,
    pub checks_passed: u32,
    pub started_at: Option<Instant>,
    pub finished_at: Option<Instant>,
}

impl SessionState {
    pub fn new(session_id: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            scenarios: Vec::new(),
            checks_run: 0,
            checks_passed: 0,
            started_at: None,
            finished_at: None,
        }
    }

    pub fn start(&mut self) {
        self.started_at = Some(Instant::now());
    }

    pub fn add_scenario(&mut self, scenario: ScenarioState) {
        for check in &scenario.checks {
            self.checks_run += 1;
            if check.passed {
                self.checks_passed += 1;
            }
        }
        self.scenarios.push(scenario);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Instant::now());
    }

    /// Failed checks across all scenarios as (name, message) pairs.
    pub fn failures(&self) -> Vec<(String, String)> {
        self.scenarios
            .iter()
            .flat_map(|s| s.checks.iter().filter(|c| !c.passed))
            .map(|c| (c.name.clone(), c.message.clone()))
            .collect()
    }

    pub fn summary(&self) -> TestSummary {
        let mut passed = 0;
        let mut failed = 0;
        let mut skipped = 0;

        for scenario in &self.scenarios {
            if matches!(scenario.status, ScenarioStatus::Skipped { .. }) {
                skipped += 1;
            }
            for check in &scenario.checks {
                if check.passed {
                    passed += 1;
                } else {
                    failed += 1;
                }
            }
        }

        let total_duration_ms = self.started_at.map(|start| {
            self.finished_at
                .unwrap_or_else(Instant::now)
                .duration_since(start)
                .as_millis() as u64
        });

        TestSummary {
            session_id: self.session_id.clone(),
            total_scenarios: self.scenarios.len() as u32,
            total_checks: passed + failed,
            passed,
            failed,
            skipped,
            total_duration_ms,
        }
    }
}

/// Aggregate counts for one session. `skipped` counts whole scenarios that
/// never ran (connectivity short-circuit); the other counters are per check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSummary {
    pub session_id: String,
    pub total_scenarios: u32,
    pub total_checks: u32,
    pub passed: u32,
    pub failed: u32,
    pub skipped: u32,
    pub total_duration_ms: Option<u64>,
}

impl TestSummary {
    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.skipped == 0
    }

    pub fn success_rate(&self) -> f64 {
        if self.total_checks == 0 {
            100.0
        } else {
            f64::from(self.passed) / f64::from(self.total_checks) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(name: &str, passed: bool) -> CheckResult {
        CheckResult {
            name: name.to_string(),
            passed,
            message: String::new(),
            response: None,
        }
    }

    #[test]
    fn scenario_status_derived_from_checks() {
        let mut all_pass = ScenarioState::new("all pass");
        all_pass.start();
        all_pass.finish(vec![check("a", true), check("b", true)], None);
        assert_eq!(all_pass.status, ScenarioStatus::Passed);
        assert!(all_pass.duration_ms.is_some());

        let mut mixed = ScenarioState::new("mixed");
        mixed.start();
        mixed.finish(vec![check("a", true), check("b", false)], None);
        assert_eq!(
            mixed.status,
            ScenarioStatus::PartiallyPassed {
                passed: 1,
                failed: 1
            }
        );

        let mut all_fail = ScenarioState::new("all fail");
        all_fail.start();
        all_fail.finish(vec![check("a", false)], None);
        assert_eq!(all_fail.status, ScenarioStatus::Failed);
    }

    #[test]
    fn scenario_error_forces_failed() {
        let mut scenario = ScenarioState::new("errored");
        scenario.start();
        scenario.finish(vec![check("a", true)], Some("request builder blew up".to_string()));
        assert_eq!(scenario.status, ScenarioStatus::Failed);
    }

    #[test]
    fn session_summary_counts_checks_and_skips() {
        let mut session = SessionState::new("s-1");
        session.start();

        let mut ok = ScenarioState::new("ok");
        ok.start();
        ok.finish(vec![check("a", true), check("b", true)], None);
        session.add_scenario(ok);

        let mut bad = ScenarioState::new("bad");
        bad.start();
        bad.finish(vec![check("c", false)], None);
        session.add_scenario(bad);

        let mut skipped = ScenarioState::new("skipped");
        skipped.skip("server unreachable");
        session.add_scenario(skipped);

        session.finish();
        let summary = session.summary();

        assert_eq!(summary.total_scenarios, 3);
        assert_eq!(summary.total_checks, 3);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(session.checks_run, 3);
        assert_eq!(session.checks_passed, 2);
        assert!(!summary.all_passed());
        assert_eq!(session.failures(), vec![("c".to_string(), String::new())]);
    }

    #[test]
    fn success_rate_handles_empty_session() {
        let session = SessionState::new("empty");
        let summary = session.summary();
        assert_eq!(summary.success_rate(), 100.0);
        assert!(summary.all_passed());
    }
}
