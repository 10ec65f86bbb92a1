//! Everything that touches the network or the disk: dataset download,
//! the dataset cache and address geocoding.

mod cache;
mod fetch;
mod geocode;
mod updated;

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub use cache::{DEFAULT_KEY, DEFAULT_TTL, DatasetCache, load_or_fetch};
pub use geocode::MIN_SUGGEST_CHARS;
pub use updated::last_updated;

/// Dataset published by the NSW Department of Education.
pub const DATASET_URL: &str = "https://data.nsw.gov.au/data/dataset/78c10ea3-8d04-4c9c-b255-bbf8547e37e7/resource/b0026f18-2f23-4837-968c-959e5fb3311d/download/collections.json";

/// OpenStreetMap Nominatim search endpoint.
pub const GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/search";

pub const USER_AGENT: &str = concat!("schoolfinder/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request to {url} failed: {message}")]
    Http { url: String, message: String },

    #[error("{url} answered with HTTP {code}")]
    Status { url: String, code: u16 },

    #[error("unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("snapshot {}: {message}", path.display())]
    Snapshot { path: PathBuf, message: String },
}

/// Blocking HTTP client shared by the dataset download and the geocoder.
pub struct Client {
    agent: ureq::Agent,
    dataset_url: String,
    geocoder_url: String,
}

impl Client {
    pub fn new(
        dataset_url: impl Into<String>,
        geocoder_url: impl Into<String>,
        user_agent: &str,
        timeout: Duration,
    ) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(user_agent)
            .build();
        Self {
            agent,
            dataset_url: dataset_url.into(),
            geocoder_url: geocoder_url.into(),
        }
    }

    pub fn dataset_url(&self) -> &str {
        &self.dataset_url
    }

    /// GET `url` with `query`, returning the body of a 2xx response.
    fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String, SourceError> {
        crate::debug!("fetch"; "GET {}", url);
        let mut request = self.agent.get(url).set("Accept", "application/json");
        for (key, value) in query {
            request = request.query(key, value);
        }

        let response = request.call().map_err(|e| match e {
            ureq::Error::Status(code, _) => SourceError::Status {
                url: url.to_string(),
                code,
            },
            ureq::Error::Transport(t) => SourceError::Http {
                url: url.to_string(),
                message: t.to_string(),
            },
        })?;

        // into_string() caps bodies at 10 MB; the dataset can approach that.
        let mut body = String::new();
        std::io::Read::read_to_string(&mut response.into_reader(), &mut body)?;
        Ok(body)
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new(
            DATASET_URL,
            GEOCODER_URL,
            USER_AGENT,
            Duration::from_secs(30),
        )
    }
}
