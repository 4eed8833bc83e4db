pub mod context;
pub mod events;
pub mod state;

use anyhow::Result;
use std::path::PathBuf;
use uuid::Uuid;

pub use events::*;
pub use state::*;

use crate::client::ApiClient;
use crate::report::{self, types::TestResults};
use crate::scenarios::{self, Scenario};
use crate::utils::config::HarnessConfig;
use context::ScenarioCtx;

/// Options for one suite run
pub struct RunOptions {
    pub config: HarnessConfig,
    pub output_dir: PathBuf,
    pub report: bool,
    pub tags: Option<Vec<String>>,
    pub scenario: Option<String>,
}

/// Run the scenario suite against the configured backend. Scenarios execute
/// sequentially; a failing scenario never aborts the ones after it. Only the
/// initial connectivity probe can short-circuit the run.
pub async fn run_suite(opts: RunOptions) -> Result<TestSummary> {
    let client = ApiClient::new(&opts.config)?;
    let (emitter, receiver) = EventEmitter::new();
    tokio::spawn(ConsoleEventListener::listen(receiver));

    let mut session = SessionState::new(&Uuid::new_v4().to_string());
    session.start();
    emitter.emit(TestEvent::SessionStarted {
        session_id: session.session_id.clone(),
        base_url: client.base_url().to_string(),
    });

    let selected: Vec<Box<dyn Scenario>> = scenarios::all_scenarios()
        .into_iter()
        .filter(|s| matches_filters(s.as_ref(), &opts))
        .collect();

    if selected.is_empty() {
        emitter.emit(TestEvent::Log {
            message: "No scenarios matched the given filters".to_string(),
        });
    }

    let server_up = probe(&client, &opts.config, &emitter, &mut session).await;

    if server_up {
        for scenario in &selected {
            run_scenario(scenario.as_ref(), &client, &opts.config, &emitter, &mut session).await;
        }
    } else {
        for scenario in &selected {
            let mut scenario_state = ScenarioState::new(scenario.name());
            scenario_state.skip("server unreachable");
            emitter.emit(TestEvent::ScenarioSkipped {
                name: scenario.name().to_string(),
                reason: "server unreachable".to_string(),
            });
            session.add_scenario(scenario_state);
        }
    }

    session.finish();
    let summary = session.summary();
    emitter.emit(TestEvent::SessionFinished {
        summary: summary.clone(),
        failures: session.failures(),
    });

    // Let the console listener drain before the process moves on.
    tokio::time::sleep(std::time::Duration::from_millis(150)).await;

    if opts.report {
        let results = TestResults {
            session_id: session.session_id.clone(),
            scenarios: session.scenarios.iter().map(|s| s.to_report()).collect(),
            summary: summary.clone(),
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        };
        report::write_reports(&results, &opts.output_dir)?;
    }

    Ok(summary)
}

fn matches_filters(scenario: &dyn Scenario, opts: &RunOptions) -> bool {
    if let Some(ref name) = opts.scenario {
        if !scenario
            .name()
            .to_lowercase()
            .contains(&name.to_lowercase())
        {
            return false;
        }
    }
    if let Some(ref required) = opts.tags {
        let tags = scenario.tags();
        if !required.iter().all(|t| tags.contains(&t.as_str())) {
            return false;
        }
    }
    true
}

/// Initial connectivity probe. Any HTTP response, even a 404, means the
/// server is up; no response at all fails the run before any scenario.
async fn probe(
    client: &ApiClient,
    config: &HarnessConfig,
    emitter: &EventEmitter,
    session: &mut SessionState,
) -> bool {
    let mut scenario_state = ScenarioState::new("Server Health");
    scenario_state.start();
    emitter.emit(TestEvent::ScenarioStarted {
        name: scenario_state.name.clone(),
    });

    let mut ctx = ScenarioCtx::new(client, config, emitter);
    let up = match client.get(&config.probe_path).await {
        Some(res) => ctx.check(
            "Server Health Check",
            true,
            format!("Server is responding (HTTP {})", res.status),
            None,
        ),
        None => ctx.check("Server Health Check", false, "No response from server", None),
    };

    scenario_state.finish(ctx.take_checks(), None);
    emitter.emit(TestEvent::ScenarioFinished {
        name: scenario_state.name.clone(),
        status: scenario_state.status.clone(),
        duration_ms: scenario_state.duration_ms,
    });
    session.add_scenario(scenario_state);
    up
}

async fn run_scenario(
    scenario: &dyn Scenario,
    client: &ApiClient,
    config: &HarnessConfig,
    emitter: &EventEmitter,
    session: &mut SessionState,
) {
    let mut scenario_state = ScenarioState::new(scenario.name());
    scenario_state.start();
    emitter.emit(TestEvent::ScenarioStarted {
        name: scenario_state.name.clone(),
    });

    let mut ctx = ScenarioCtx::new(client, config, emitter);
    let error = match scenario.run(&mut ctx).await {
        Ok(()) => None,
        Err(e) => Some(e.to_string()),
    };
    if let Some(ref e) = error {
        emitter.emit(TestEvent::Log {
            message: format!("Scenario error: {}", e),
        });
    }

    scenario_state.finish(ctx.take_checks(), error);
    emitter.emit(TestEvent::ScenarioFinished {
        name: scenario_state.name.clone(),
        status: scenario_state.status.clone(),
        duration_ms: scenario_state.duration_ms,
    });
    session.add_scenario(scenario_state);
}
