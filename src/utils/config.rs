use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One seeded account the backend is expected to authenticate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnownCredential {
    pub email: String,
    pub password: String,
    /// Role tag the login response must report (ADMIN, STUDENT, FACULTY, HR)
    pub expected_type: String,
}

impl KnownCredential {
    fn new(email: &str, password: &str, expected_type: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
            expected_type: expected_type.to_string(),
        }
    }
}

/// Harness configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HarnessConfig {
    /// Base URL of the backend under test
    pub base_url: String,

    /// Request timeout (ms)
    pub timeout_ms: u64,

    /// Connect timeout (ms)
    pub connect_timeout_ms: u64,

    /// Endpoint used for the initial connectivity probe
    pub probe_path: String,

    /// Seeded accounts exercised by the login scenarios
    pub credentials: Vec<KnownCredential>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_ms: 10_000,
            connect_timeout_ms: 3_000,
            probe_path: "/api/auth/status".to_string(),
            credentials: vec![
                KnownCredential::new("admin@tracker.com", "admin123", "ADMIN"),
                KnownCredential::new("john.smith@example.com", "student123", "STUDENT"),
                KnownCredential::new("emily.davis@example.com", "student123", "STUDENT"),
                KnownCredential::new("sarah.faculty@tracker.com", "faculty123", "FACULTY"),
                KnownCredential::new("mike.hr@tracker.com", "hr123", "HR"),
            ],
        }
    }
}

impl HarnessConfig {
    /// Load configuration with layering: YAML file (if given), then the
    /// TRACKER_BASE_URL environment variable, then the CLI base URL.
    pub fn load(path: Option<&Path>, base_url_override: Option<&str>) -> Result<Self> {
        let mut config = match path {
            Some(p) => {
                let content = std::fs::read_to_string(p)
                    .with_context(|| format!("Failed to read config file: {}", p.display()))?;
                serde_yaml::from_str(&content)
                    .with_context(|| format!("Failed to parse config file: {}", p.display()))?
            }
            None => Self::default(),
        };

        if let Ok(url) = std::env::var("TRACKER_BASE_URL") {
            if !url.is_empty() {
                config.base_url = url;
            }
        }
        if let Some(url) = base_url_override {
            config.base_url = url.to_string();
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_targets_localhost() {
        let config = HarnessConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.probe_path, "/api/auth/status");
        assert_eq!(config.credentials.len(), 5);
        assert_eq!(config.credentials[0].expected_type, "ADMIN");
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = "baseUrl: http://10.0.0.5:9999\ntimeoutMs: 2000\n";
        let config: HarnessConfig = serde_yaml::from_str(yaml).expect("Failed to parse YAML");
        assert_eq!(config.base_url, "http://10.0.0.5:9999");
        assert_eq!(config.timeout_ms, 2000);
        assert_eq!(config.connect_timeout_ms, 3_000);
        assert_eq!(config.credentials.len(), 5);
    }

    #[test]
    fn yaml_credentials_replace_fixture_table() {
        let yaml = r#"
credentials:
  - email: qa@tracker.com
    password: secret
    expectedType: ADMIN
"#;
        let config: HarnessConfig = serde_yaml::from_str(yaml).expect("Failed to parse YAML");
        assert_eq!(config.credentials.len(), 1);
        assert_eq!(config.credentials[0].email, "qa@tracker.com");
    }

    #[test]
    fn cli_base_url_wins() {
        let config = HarnessConfig::load(None, Some("http://cli-host:1234")).unwrap();
        assert_eq!(config.base_url, "http://cli-host:1234");
    }
}
