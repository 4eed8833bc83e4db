use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use super::Scenario;
use crate::runner::context::ScenarioCtx;

fn student_payload(email: &str, age: i64, dob: &str) -> Value {
    json!({
        "firstName": "Quinn",
        "lastName": "Sample",
        "email": email,
        "password": "testpass123",
        "gender": "MALE",
        "dob": dob,
        "age": age,
        "location": "Test City",
        "mobileNo": "1234567890"
    })
}

/// The backend only admits students aged 20 through 25.
pub struct RegisterAgeValidation;

#[async_trait]
impl Scenario for RegisterAgeValidation {
    fn name(&self) -> &'static str {
        "Registration age window"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["registration"]
    }

    async fn run(&self, ctx: &mut ScenarioCtx<'_>) -> Result<()> {
        let email = ctx.unique_email("qa.student");
        let outcome = ctx
            .client()
            .post("/api/auth/register", &student_payload(&email, 23, "2003-02-11"))
            .await;
        ctx.expect_success("Student Registration - Age 23", outcome);

        let email = ctx.unique_email("qa.young");
        let outcome = ctx
            .client()
            .post("/api/auth/register", &student_payload(&email, 19, "2007-02-11"))
            .await;
        ctx.expect_rejected(
            "Student Registration - Age 19",
            outcome,
            "rejected age under 20",
        );

        let email = ctx.unique_email("qa.senior");
        let outcome = ctx
            .client()
            .post("/api/auth/register", &student_payload(&email, 26, "2000-02-11"))
            .await;
        ctx.expect_rejected(
            "Student Registration - Age 26",
            outcome,
            "rejected age over 25",
        );

        Ok(())
    }
}

/// Submitting the same email twice must fail the second time.
pub struct RegisterDuplicateEmail;

#[async_trait]
impl Scenario for RegisterDuplicateEmail {
    fn name(&self) -> &'static str {
        "Duplicate registration email"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["registration"]
    }

    async fn run(&self, ctx: &mut ScenarioCtx<'_>) -> Result<()> {
        let email = ctx.unique_email("qa.duplicate");
        let payload = student_payload(&email, 24, "2002-02-11");

        let outcome = ctx.client().post("/api/auth/register", &payload).await;
        ctx.expect_success("Student Registration - First submission", outcome);

        let outcome = ctx.client().post("/api/auth/register", &payload).await;
        ctx.expect_rejected(
            "Student Registration - Duplicate email",
            outcome,
            "rejected duplicate email",
        );

        Ok(())
    }
}

/// End-to-end persistence: a freshly registered student can log in.
pub struct RegisterThenLogin;

#[async_trait]
impl Scenario for RegisterThenLogin {
    fn name(&self) -> &'static str {
        "Registered student can log in"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["registration", "auth"]
    }

    async fn run(&self, ctx: &mut ScenarioCtx<'_>) -> Result<()> {
        let email = ctx.unique_email("qa.persist");
        ctx.set_var("email", &email);
        ctx.set_var("password", "testpass123");

        let outcome = ctx
            .client()
            .post("/api/auth/register", &student_payload(&email, 23, "2003-02-11"))
            .await;
        if ctx
            .expect_success("Data Persistence - Registration", outcome)
            .is_none()
        {
            return Ok(());
        }

        let body = json!({
            "email": ctx.get_var("email").unwrap_or_default(),
            "password": ctx.get_var("password").unwrap_or_default(),
        });
        let outcome = ctx.client().post("/api/login", &body).await;
        ctx.expect_success("Data Persistence - Login after registration", outcome);

        Ok(())
    }
}
