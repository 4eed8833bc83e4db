use super::state::{ScenarioStatus, TestSummary};
use tokio::sync::broadcast;

/// Test execution events for coordinated console output
#[derive(Debug, Clone)]
pub enum TestEvent {
    // Session events
    SessionStarted {
        session_id: String,
        base_url: String,
    },
    SessionFinished {
        summary: TestSummary,
        failures: Vec<(String, String)>,
    },

    // Scenario events
    ScenarioStarted {
        name: String,
    },
    ScenarioFinished {
        name: String,
        status: ScenarioStatus,
        duration_ms: Option<u64>,
    },
    ScenarioSkipped {
        name: String,
        reason: String,
    },

    // Check events
    CheckPassed {
        name: String,
        message: String,
    },
    CheckFailed {
        name: String,
        message: String,
    },

    // Log event for coordinated output
    Log {
        message: String,
    },
}

/// Event emitter for broadcasting test events
pub struct EventEmitter {
    sender: broadcast::Sender<TestEvent>,
}

impl EventEmitter {
    pub fn new() -> (Self, broadcast::Receiver<TestEvent>) {
        let (sender, receiver) = broadcast::channel(100);
        (Self { sender }, receiver)
    }

    pub fn emit(&self, event: TestEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TestEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }
}

/// Console event listener for printing real-time updates
pub struct ConsoleEventListener;

impl ConsoleEventListener {
    pub async fn listen(mut receiver: broadcast::Receiver<TestEvent>) {
        use colored::Colorize;

        while let Ok(event) = receiver.recv().await {
            match event {
                TestEvent::SessionStarted {
                    session_id,
                    base_url,
                } => {
                    println!(
                        "\n{} Test session started: {} (target: {})",
                        "▶".green().bold(),
                        session_id.cyan(),
                        base_url.cyan()
                    );
                }

                TestEvent::SessionFinished { summary, failures } => {
                    println!("\n{} Test session finished", "■".blue().bold());
                    println!("  Total scenarios: {}", summary.total_scenarios);
                    println!("  Total checks: {}", summary.total_checks);
                    println!(
                        "  {} passed, {} failed, {} skipped",
                        summary.passed.to_string().green(),
                        summary.failed.to_string().red(),
                        summary.skipped.to_string().yellow()
                    );
                    println!("  Success rate: {:.1}%", summary.success_rate());
                    if let Some(duration) = summary.total_duration_ms {
                        println!("  Duration: {}ms", duration);
                    }
                    if !failures.is_empty() {
                        println!("\n{} Failed checks:", "✗".red().bold());
                        for (name, message) in &failures {
                            println!("  - {}: {}", name, message);
                        }
                    }
                }

                TestEvent::ScenarioStarted { name } => {
                    println!("\n  {} Scenario: {}", "→".blue(), name.white().bold());
                }

                TestEvent::ScenarioFinished {
                    name,
                    status,
                    duration_ms,
                } => {
                    let status_str = match status {
                        ScenarioStatus::Passed => "PASSED".green().bold(),
                        ScenarioStatus::Failed => "FAILED".red().bold(),
                        ScenarioStatus::PartiallyPassed { passed, failed } => {
                            format!("PARTIAL ({}/{} passed)", passed, passed + failed)
                                .yellow()
                                .bold()
                        }
                        _ => "UNKNOWN".white().bold(),
                    };
                    print!("  {} Scenario {} [{}]", "←".blue(), name, status_str);
                    if let Some(duration) = duration_ms {
                        println!(" ({}ms)", duration);
                    } else {
                        println!();
                    }
                }

                TestEvent::ScenarioSkipped { name, reason } => {
                    println!(
                        "  {} Scenario {} skipped ({})",
                        "○".yellow(),
                        name,
                        reason.dimmed()
                    );
                }

                TestEvent::CheckPassed { name, message } => {
                    println!("    {} {}: {}", "✓".green(), name, message.dimmed());
                }

                TestEvent::CheckFailed { name, message } => {
                    println!("    {} {}: {}", "✗".red(), name, message);
                }

                TestEvent::Log { message } => {
                    println!("      {}", message);
                }
            }
        }
    }
}
