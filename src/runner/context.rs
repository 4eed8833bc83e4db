use std::collections::HashMap;

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::Value;
use thiserror::Error;

use super::events::{EventEmitter, TestEvent};
use super::state::CheckResult;
use crate::client::{ApiClient, ApiResponse};
use crate::utils::config::HarnessConfig;

/// Why an envelope check failed. Connectivity, transport, parse, and
/// semantic failures are recorded with distinct messages.
#[derive(Debug, Error, PartialEq)]
pub enum EnvelopeError {
    #[error("No response from server")]
    NoResponse,
    #[error("HTTP {0}")]
    Status(u16),
    #[error("Invalid JSON response")]
    MalformedJson,
    #[error("{0}")]
    Semantic(String),
}

/// Evaluate an executor outcome against the success envelope convention.
/// `detail` only matters when a rejection is expected and the server accepts.
fn classify(
    outcome: Option<ApiResponse>,
    expect_success: bool,
    detail: &str,
) -> Result<ApiResponse, EnvelopeError> {
    let res = outcome.ok_or(EnvelopeError::NoResponse)?;
    if res.status != 200 {
        return Err(EnvelopeError::Status(res.status));
    }
    if res.json().is_none() {
        return Err(EnvelopeError::MalformedJson);
    }
    match res.success_flag() {
        Some(true) if expect_success => Ok(res),
        Some(false) if !expect_success => Ok(res),
        Some(true) => Err(EnvelopeError::Semantic(format!("Should have {}", detail))),
        Some(false) => Err(EnvelopeError::Semantic(
            res.server_message().unwrap_or("success=false").to_string(),
        )),
        None => Err(EnvelopeError::Semantic(
            "Envelope missing success flag".to_string(),
        )),
    }
}

/// Per-scenario execution context: the shared client, the check sink, and a
/// small variable map for threading values between steps.
pub struct ScenarioCtx<'a> {
    client: &'a ApiClient,
    config: &'a HarnessConfig,
    emitter: &'a EventEmitter,
    vars: HashMap<String, String>,
    checks: Vec<CheckResult>,
}

impl<'a> ScenarioCtx<'a> {
    pub fn new(client: &'a ApiClient, config: &'a HarnessConfig, emitter: &'a EventEmitter) -> Self {
        Self {
            client,
            config,
            emitter,
            vars: HashMap::new(),
            checks: Vec::new(),
        }
    }

    pub fn client(&self) -> &ApiClient {
        self.client
    }

    pub fn config(&self) -> &HarnessConfig {
        self.config
    }

    pub fn set_var(&mut self, name: &str, value: &str) {
        self.vars.insert(name.to_string(), value.to_string());
    }

    pub fn get_var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    /// Unique throwaway address, e.g. "qa.student.1719346200.k3j9@example.com"
    pub fn unique_email(&self, prefix: &str) -> String {
        let ts = chrono::Utc::now().timestamp();
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(4)
            .map(char::from)
            .collect::<String>()
            .to_lowercase();
        format!("{}.{}.{}@example.com", prefix, ts, suffix)
    }

    /// Checks recorded so far, in execution order. Drains the sink.
    pub fn take_checks(&mut self) -> Vec<CheckResult> {
        std::mem::take(&mut self.checks)
    }

    /// Record a check outcome and print the one-line indicator.
    pub fn check(
        &mut self,
        name: &str,
        passed: bool,
        message: impl Into<String>,
        response: Option<Value>,
    ) -> bool {
        let message = message.into();
        if passed {
            self.emitter.emit(TestEvent::CheckPassed {
                name: name.to_string(),
                message: message.clone(),
            });
        } else {
            self.emitter.emit(TestEvent::CheckFailed {
                name: name.to_string(),
                message: message.clone(),
            });
        }
        self.checks.push(CheckResult {
            name: name.to_string(),
            passed,
            message,
            response,
        });
        passed
    }

    /// Expect a 200 response whose envelope carries `success: true`. Returns
    /// the response on pass so callers can chain data out of it.
    pub fn expect_success(&mut self, name: &str, outcome: Option<ApiResponse>) -> Option<ApiResponse> {
        let payload = outcome.as_ref().and_then(|r| r.json().cloned());
        match classify(outcome, true, "") {
            Ok(res) => {
                let message = res.server_message().unwrap_or("success=true").to_string();
                self.check(name, true, message, None);
                Some(res)
            }
            Err(e) => {
                self.check(name, false, e.to_string(), payload);
                None
            }
        }
    }

    /// Expect the envelope to carry `success: false`. `detail` reads as
    /// "rejected duplicate email": pass prints "Correctly rejected ...",
    /// an unexpected acceptance prints "Should have rejected ...".
    pub fn expect_rejected(
        &mut self,
        name: &str,
        outcome: Option<ApiResponse>,
        detail: &str,
    ) -> Option<ApiResponse> {
        let payload = outcome.as_ref().and_then(|r| r.json().cloned());
        match classify(outcome, false, detail) {
            Ok(res) => {
                self.check(name, true, format!("Correctly {}", detail), None);
                Some(res)
            }
            Err(e) => {
                self.check(name, false, e.to_string(), payload);
                None
            }
        }
    }

    /// Required-field presence on the envelope's `data` object.
    pub fn expect_data_fields(&mut self, name: &str, res: &ApiResponse, fields: &[&str]) -> bool {
        let missing: Vec<&str> = match res.data().and_then(Value::as_object) {
            Some(map) => fields
                .iter()
                .copied()
                .filter(|f| !map.contains_key(*f))
                .collect(),
            None => fields.to_vec(),
        };

        if missing.is_empty() {
            self.check(name, true, "All required fields present", None)
        } else {
            self.check(
                name,
                false,
                format!("Missing fields: {}", missing.join(", ")),
                res.json().cloned(),
            )
        }
    }

    /// Expect the envelope's `data` to be an array; records the element count.
    pub fn expect_data_array(&mut self, name: &str, res: &ApiResponse, what: &str) -> Option<usize> {
        match res.data().and_then(Value::as_array) {
            Some(items) => {
                let count = items.len();
                self.check(name, true, format!("Retrieved {} {}", count, what), None);
                Some(count)
            }
            None => {
                self.check(
                    name,
                    false,
                    format!("Expected a data array of {}", what),
                    res.json().cloned(),
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Body;
    use serde_json::json;

    fn response(status: u16, body: Value) -> Option<ApiResponse> {
        Some(ApiResponse {
            status,
            body: Body::Json(body),
        })
    }

    fn text_response(status: u16, text: &str) -> Option<ApiResponse> {
        Some(ApiResponse {
            status,
            body: Body::Text(text.to_string()),
        })
    }

    fn ctx_parts() -> (ApiClient, HarnessConfig, EventEmitter) {
        let config = HarnessConfig::default();
        let client = ApiClient::new(&config).expect("client construction");
        (client, config, EventEmitter::default())
    }

    #[test]
    fn classify_maps_the_failure_taxonomy() {
        assert_eq!(
            classify(None, true, "").unwrap_err(),
            EnvelopeError::NoResponse
        );
        assert_eq!(
            classify(response(500, json!({"success": true})), true, "").unwrap_err(),
            EnvelopeError::Status(500)
        );
        assert_eq!(
            classify(text_response(200, "<html>"), true, "").unwrap_err(),
            EnvelopeError::MalformedJson
        );
        assert_eq!(
            classify(
                response(200, json!({"success": false, "message": "nope"})),
                true,
                ""
            )
            .unwrap_err(),
            EnvelopeError::Semantic("nope".to_string())
        );
        assert_eq!(
            classify(
                response(200, json!({"success": true})),
                false,
                "rejected the duplicate"
            )
            .unwrap_err(),
            EnvelopeError::Semantic("Should have rejected the duplicate".to_string())
        );
        assert_eq!(
            classify(response(200, json!({"data": []})), true, "").unwrap_err(),
            EnvelopeError::Semantic("Envelope missing success flag".to_string())
        );
        assert!(classify(response(200, json!({"success": true})), true, "").is_ok());
        assert!(classify(response(200, json!({"success": false})), false, "").is_ok());
    }

    #[test]
    fn checks_are_recorded_in_order() {
        let (client, config, emitter) = ctx_parts();
        let mut ctx = ScenarioCtx::new(&client, &config, &emitter);

        ctx.expect_success("ok", response(200, json!({"success": true})));
        ctx.expect_success(
            "rejected",
            response(200, json!({"success": false, "message": "bad password"})),
        );
        ctx.expect_rejected("no response", None, "rejected something");

        let checks = ctx.take_checks();
        assert_eq!(checks.len(), 3);
        assert!(checks[0].passed);
        assert!(!checks[1].passed);
        assert_eq!(checks[1].message, "bad password");
        assert!(checks[1].response.is_some());
        assert_eq!(checks[2].message, "No response from server");
        assert!(ctx.take_checks().is_empty());
    }

    #[test]
    fn data_field_helper_reports_missing() {
        let (client, config, emitter) = ctx_parts();
        let mut ctx = ScenarioCtx::new(&client, &config, &emitter);

        let res = ApiResponse {
            status: 200,
            body: Body::Json(json!({"success": true, "data": {"totalStudents": 4}})),
        };
        assert!(ctx.expect_data_fields("present", &res, &["totalStudents"]));
        assert!(!ctx.expect_data_fields("missing", &res, &["totalStudents", "totalFaculty"]));

        let checks = ctx.take_checks();
        assert_eq!(checks[1].message, "Missing fields: totalFaculty");
    }

    #[test]
    fn data_array_helper_counts_elements() {
        let (client, config, emitter) = ctx_parts();
        let mut ctx = ScenarioCtx::new(&client, &config, &emitter);

        let list = ApiResponse {
            status: 200,
            body: Body::Json(json!({"success": true, "data": [1, 2, 3]})),
        };
        assert_eq!(ctx.expect_data_array("list", &list, "rows"), Some(3));

        let scalar = ApiResponse {
            status: 200,
            body: Body::Json(json!({"success": true, "data": 42})),
        };
        assert_eq!(ctx.expect_data_array("scalar", &scalar, "rows"), None);
    }

    #[test]
    fn vars_thread_between_steps() {
        let (client, config, emitter) = ctx_parts();
        let mut ctx = ScenarioCtx::new(&client, &config, &emitter);
        ctx.set_var("email", "someone@example.com");
        assert_eq!(ctx.get_var("email").as_deref(), Some("someone@example.com"));
        assert_eq!(ctx.get_var("missing"), None);
    }

    #[test]
    fn unique_emails_do_not_collide() {
        let (client, config, emitter) = ctx_parts();
        let ctx = ScenarioCtx::new(&client, &config, &emitter);
        let a = ctx.unique_email("qa.student");
        let b = ctx.unique_email("qa.student");
        assert!(a.starts_with("qa.student."));
        assert!(a.ends_with("@example.com"));
        assert_ne!(a, b);
    }
}
