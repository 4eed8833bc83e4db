use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use super::Scenario;
use crate::runner::context::ScenarioCtx;

const COURSE_FIELDS: [&str; 6] = [
    "courseCode",
    "courseTitle",
    "durationMonths",
    "category",
    "prerequisites",
    "description",
];

/// Full course lifecycle: list, create, fetch round-trip, edit, re-fetch.
pub struct CourseLifecycle;

#[async_trait]
impl Scenario for CourseLifecycle {
    fn name(&self) -> &'static str {
        "Course catalog lifecycle"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["admin", "courses"]
    }

    async fn run(&self, ctx: &mut ScenarioCtx<'_>) -> Result<()> {
        let outcome = ctx.client().get("/api/admin/courses").await;
        if let Some(res) = ctx.expect_success("Get All Courses", outcome) {
            ctx.expect_data_array("Get All Courses - data", &res, "courses");
        }

        let code = format!("QA{}", chrono::Utc::now().timestamp());
        let submitted = json!({
            "courseCode": code,
            "courseTitle": format!("Automation Course {}", code),
            "durationMonths": 6,
            "category": "Web Development",
            "prerequisites": "Basic programming knowledge",
            "description": "Created by the API test suite"
        });

        let outcome = ctx.client().post("/api/admin/courses", &submitted).await;
        let Some(res) = ctx.expect_success("Create Course", outcome) else {
            return Ok(());
        };
        let course_id = res
            .data()
            .and_then(|d| d.get("courseId"))
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            });
        let Some(id) = course_id else {
            ctx.check(
                "Create Course - id returned",
                false,
                "No course id in response",
                res.json().cloned(),
            );
            return Ok(());
        };
        ctx.set_var("courseId", &id);

        let path = format!("/api/admin/courses/{}", id);
        let outcome = ctx.client().get(&path).await;
        let Some(res) = ctx.expect_success("Get Course by Id", outcome) else {
            return Ok(());
        };
        ctx.expect_data_fields("Get Course by Id - required fields", &res, &COURSE_FIELDS);

        let Some(fetched) = res.data().cloned().filter(Value::is_object) else {
            return Ok(());
        };
        let unchanged = COURSE_FIELDS
            .iter()
            .all(|f| fetched.get(*f) == submitted.get(*f));
        ctx.check(
            "Get Course by Id - round trip",
            unchanged,
            if unchanged {
                "All submitted fields returned unchanged".to_string()
            } else {
                "Returned fields differ from submitted".to_string()
            },
            if unchanged { None } else { Some(fetched.clone()) },
        );

        let mut updated = fetched.clone();
        updated["description"] = json!("Updated by the API test suite");
        updated["prerequisites"] = json!("Updated prerequisites");
        let outcome = ctx.client().put(&path, &updated).await;
        if ctx.expect_success("Update Course", outcome).is_none() {
            return Ok(());
        }

        // A fresh GET must reflect the edit
        let outcome = ctx.client().get(&path).await;
        if let Some(res) = ctx.expect_success("Get Course after update", outcome) {
            let description = res
                .data()
                .and_then(|d| d.get("description"))
                .and_then(Value::as_str)
                .unwrap_or("");
            let reflected = description == "Updated by the API test suite";
            ctx.check(
                "Get Course after update - description",
                reflected,
                if reflected {
                    "Updated description persisted".to_string()
                } else {
                    format!("Description not updated: '{}'", description)
                },
                None,
            );
        }

        Ok(())
    }
}
