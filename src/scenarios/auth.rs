use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use super::Scenario;
use crate::runner::context::ScenarioCtx;

/// Login across the seeded account table, asserting the reported role tag.
pub struct LoginKnownAccounts;

#[async_trait]
impl Scenario for LoginKnownAccounts {
    fn name(&self) -> &'static str {
        "Login with known accounts"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["auth"]
    }

    async fn run(&self, ctx: &mut ScenarioCtx<'_>) -> Result<()> {
        for cred in ctx.config().credentials.clone() {
            let name = format!("Login - {}", cred.email);
            let body = json!({ "email": cred.email, "password": cred.password });
            let outcome = ctx.client().post("/api/login", &body).await;

            let Some(res) = ctx.expect_success(&name, outcome) else {
                continue;
            };
            let user_type = res
                .json()
                .and_then(|v| v.get("userType"))
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string();
            let matches = user_type == cred.expected_type;
            let message = if matches {
                format!("UserType: {}", user_type)
            } else {
                format!("Expected role {}, got '{}'", cred.expected_type, user_type)
            };
            ctx.check(&format!("{} - role", name), matches, message, None);
        }
        Ok(())
    }
}

/// Bogus credentials must be turned away.
pub struct LoginInvalidCredentials;

#[async_trait]
impl Scenario for LoginInvalidCredentials {
    fn name(&self) -> &'static str {
        "Reject invalid credentials"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["auth"]
    }

    async fn run(&self, ctx: &mut ScenarioCtx<'_>) -> Result<()> {
        let body = json!({ "email": "invalid@test.com", "password": "wrongpass" });
        let outcome = ctx.client().post("/api/login", &body).await;
        ctx.expect_rejected("Login - Invalid credentials", outcome, "rejected invalid login");
        Ok(())
    }
}

pub struct Logout;

#[async_trait]
impl Scenario for Logout {
    fn name(&self) -> &'static str {
        "Logout"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["auth"]
    }

    async fn run(&self, ctx: &mut ScenarioCtx<'_>) -> Result<()> {
        let outcome = ctx.client().post_empty("/api/logout").await;
        ctx.expect_success("Logout", outcome);
        Ok(())
    }
}
