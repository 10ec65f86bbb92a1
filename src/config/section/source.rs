//! `[source]` section configuration.
//!
//! ```toml
//! [source]
//! url = "https://data.nsw.gov.au/.../collections.json"
//! geocoder_url = "https://nominatim.openstreetmap.org/search"
//! user_agent = "schoolfinder/0.1.0"
//! timeout_secs = 30
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::source::{Client, DATASET_URL, GEOCODER_URL, USER_AGENT};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Dataset download URL.
    pub url: String,

    /// Nominatim-compatible search endpoint.
    pub geocoder_url: String,

    /// Sent with every request; Nominatim rejects anonymous clients.
    pub user_agent: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DATASET_URL.to_string(),
            geocoder_url: GEOCODER_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
            timeout_secs: 30,
        }
    }
}

impl SourceConfig {
    pub fn client(&self) -> Client {
        Client::new(
            self.url.as_str(),
            self.geocoder_url.as_str(),
            &self.user_agent,
            Duration::from_secs(self.timeout_secs),
        )
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for (field, value) in [
            (FieldPath::new("source.url"), &self.url),
            (FieldPath::new("source.geocoder_url"), &self.geocoder_url),
        ] {
            match url::Url::parse(value) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
                Ok(parsed) => diag.error(
                    field,
                    format!("unsupported scheme `{}`", parsed.scheme()),
                ),
                Err(e) => diag.error_with_hint(
                    field,
                    format!("invalid URL: {e}"),
                    "use an absolute http(s) URL",
                ),
            }
        }

        if self.timeout_secs == 0 {
            diag.error(FieldPath::new("source.timeout_secs"), "must be greater than 0");
        }
        if self.user_agent.trim().is_empty() {
            diag.error(FieldPath::new("source.user_agent"), "must not be empty");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_source_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.source.url, DATASET_URL);
        assert_eq!(config.source.geocoder_url, GEOCODER_URL);
        assert_eq!(config.source.timeout_secs, 30);
    }

    #[test]
    fn test_source_override() {
        let config = test_parse_config(
            "[source]\nurl = \"http://localhost:8000/schools.json\"\ntimeout_secs = 5",
        );
        assert_eq!(config.source.url, "http://localhost:8000/schools.json");
        assert_eq!(config.source.timeout_secs, 5);
        assert_eq!(config.source.geocoder_url, GEOCODER_URL);
    }

    #[test]
    fn test_source_validate() {
        let mut diag = ConfigDiagnostics::new();
        SourceConfig::default().validate(&mut diag);
        assert!(diag.is_empty());

        let config = SourceConfig {
            url: "not a url".into(),
            geocoder_url: "ftp://example.org/search".into(),
            timeout_secs: 0,
            ..SourceConfig::default()
        };
        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);
        assert_eq!(diag.len(), 3);
        assert_eq!(diag.errors()[0].field.as_str(), "source.url");
        assert_eq!(diag.errors()[1].field.as_str(), "source.geocoder_url");
    }
}
