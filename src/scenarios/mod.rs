pub mod admin;
pub mod auth;
pub mod courses;
pub mod registration;

use anyhow::Result;
use async_trait::async_trait;

use crate::runner::context::ScenarioCtx;

/// A named sequence of request/assertion steps covering one user-visible
/// behavior of the backend. Implementations record outcomes through the
/// context; an Err return marks the whole scenario failed.
#[async_trait]
pub trait Scenario: Send + Sync {
    fn name(&self) -> &'static str;

    fn tags(&self) -> &'static [&'static str] {
        &[]
    }

    async fn run(&self, ctx: &mut ScenarioCtx<'_>) -> Result<()>;
}

/// Registry of all scenarios, in execution order.
pub fn all_scenarios() -> Vec<Box<dyn Scenario>> {
    vec![
        Box::new(auth::LoginKnownAccounts),
        Box::new(auth::LoginInvalidCredentials),
        Box::new(registration::RegisterAgeValidation),
        Box::new(registration::RegisterDuplicateEmail),
        Box::new(registration::RegisterThenLogin),
        Box::new(admin::DashboardStats),
        Box::new(admin::RegistrationLists),
        Box::new(admin::StaffAccounts),
        Box::new(courses::CourseLifecycle),
        Box::new(auth::Logout),
    ]
}
