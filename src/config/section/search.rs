//! `[search]` section configuration.
//!
//! ```toml
//! [search]
//! per_page = 20
//! nearby_km = 5.0   # Distance under which results are marked "nearby"
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub per_page: usize,
    pub nearby_km: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            per_page: 20,
            nearby_km: 5.0,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.per_page == 0 {
            diag.error(FieldPath::new("search.per_page"), "must be greater than 0");
        }
        if !self.nearby_km.is_finite() || self.nearby_km < 0.0 {
            diag.error(
                FieldPath::new("search.nearby_km"),
                "must be a non-negative number",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_search_config() {
        let config = test_parse_config("[search]\nper_page = 50\nnearby_km = 2.5");
        assert_eq!(config.search.per_page, 50);
        assert_eq!(config.search.nearby_km, 2.5);
    }

    #[test]
    fn test_search_validate() {
        let config = test_parse_config("[search]\nper_page = 0\nnearby_km = -1.0");
        let mut diag = ConfigDiagnostics::new();
        config.search.validate(&mut diag);
        assert_eq!(diag.len(), 2);
    }
}
