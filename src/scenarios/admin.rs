use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use super::Scenario;
use crate::runner::context::ScenarioCtx;

fn staff_payload(email: &str, role: &str) -> Value {
    json!({
        "firstName": "Jamie",
        "lastName": "Staffer",
        "email": email,
        "password": "staffpass123",
        "role": role,
        "gender": "FEMALE",
        "city": "Test City",
        "mobileNo": "9876543210"
    })
}

/// Dashboard statistics carry every count the admin UI renders.
pub struct DashboardStats;

#[async_trait]
impl Scenario for DashboardStats {
    fn name(&self) -> &'static str {
        "Admin dashboard statistics"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["admin"]
    }

    async fn run(&self, ctx: &mut ScenarioCtx<'_>) -> Result<()> {
        let outcome = ctx.client().get("/api/admin/dashboard/stats").await;
        if let Some(res) = ctx.expect_success("Admin Dashboard Stats", outcome) {
            ctx.expect_data_fields(
                "Admin Dashboard Stats - required fields",
                &res,
                &[
                    "totalStudents",
                    "totalFaculty",
                    "totalHR",
                    "newStudentsThisWeek",
                ],
            );
        }
        Ok(())
    }
}

/// Registration listings: full table, recent slice, and search.
pub struct RegistrationLists;

#[async_trait]
impl Scenario for RegistrationLists {
    fn name(&self) -> &'static str {
        "Student registration listings"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["admin"]
    }

    async fn run(&self, ctx: &mut ScenarioCtx<'_>) -> Result<()> {
        let listings = [
            (
                "Get All Registrations",
                "/api/admin/registrations",
                "student registrations",
            ),
            (
                "Get Recent Registrations",
                "/api/admin/registrations/recent",
                "recent registrations",
            ),
            (
                "Search Registrations",
                "/api/admin/registrations/search?query=john",
                "search results",
            ),
        ];

        for (name, path, what) in listings {
            let outcome = ctx.client().get(path).await;
            if let Some(res) = ctx.expect_success(name, outcome) {
                ctx.expect_data_array(&format!("{} - data", name), &res, what);
            }
        }
        Ok(())
    }
}

/// Staff account management: listing plus FACULTY/HR creation rules.
pub struct StaffAccounts;

#[async_trait]
impl Scenario for StaffAccounts {
    fn name(&self) -> &'static str {
        "Staff account management"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["admin", "users"]
    }

    async fn run(&self, ctx: &mut ScenarioCtx<'_>) -> Result<()> {
        let outcome = ctx.client().get("/api/admin/users").await;
        if let Some(res) = ctx.expect_success("Get All Users", outcome) {
            ctx.expect_data_array("Get All Users - data", &res, "users");
        }

        let faculty = staff_payload(&ctx.unique_email("qa.faculty"), "FACULTY");
        let outcome = ctx.client().post("/api/admin/users", &faculty).await;
        ctx.expect_success("Create Staff - FACULTY", outcome);

        // Same payload again; the email is now taken
        let outcome = ctx.client().post("/api/admin/users", &faculty).await;
        ctx.expect_rejected(
            "Create Staff - Duplicate email",
            outcome,
            "rejected duplicate staff email",
        );

        let hr = staff_payload(&ctx.unique_email("qa.hr"), "HR");
        let outcome = ctx.client().post("/api/admin/users", &hr).await;
        ctx.expect_success("Create Staff - HR", outcome);

        Ok(())
    }
}
