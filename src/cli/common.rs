//! State shared by every command: configuration, dataset cache and client.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result, bail};

use crate::config::AppConfig;
use crate::core::geo::GeoPoint;
use crate::school::{Catalog, School};
use crate::source::{Client, DatasetCache, load_or_fetch};

/// One command invocation's view of the dataset.
///
/// `Sync`, so the HTTP server shares a single session across workers.
pub struct Session {
    cache: DatasetCache,
    client: Client,
    ttl: Duration,
    /// Set by `--refresh`; consumed by the first load.
    refresh: AtomicBool,
}

impl Session {
    pub fn new(config: &AppConfig, refresh: bool) -> Self {
        Self {
            cache: config.cache.open(),
            client: config.source.client(),
            ttl: config.cache.ttl(),
            refresh: AtomicBool::new(refresh),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// The school list, from the cache while it is fresh.
    pub fn schools(&self) -> Result<Arc<Vec<School>>> {
        let force = self.refresh.swap(false, Ordering::AcqRel);
        self.load(force)
    }

    /// Download the school list regardless of the cache.
    pub fn refetch(&self) -> Result<Arc<Vec<School>>> {
        self.refresh.store(false, Ordering::Release);
        self.load(true)
    }

    /// Drop every cached dataset, on disk too.
    pub fn clear_cache(&self) -> Result<()> {
        self.cache.clear().context("Failed to clear the dataset cache")
    }

    fn load(&self, force: bool) -> Result<Arc<Vec<School>>> {
        load_or_fetch(&self.cache, self.ttl, force, || self.client.fetch_schools())
            .with_context(|| format!("Failed to load schools from {}", self.client.dataset_url()))
    }

    /// The school list with its slug index.
    pub fn catalog(&self) -> Result<Catalog> {
        Ok(Catalog::build(self.schools()?))
    }

    /// Reference point from `--near` or, failing that, a geocoded `--address`.
    pub fn reference_point(
        &self,
        near: Option<GeoPoint>,
        address: Option<&str>,
    ) -> Result<Option<GeoPoint>> {
        if let Some(point) = near {
            if !point.is_valid() {
                bail!("reference point {},{} is not a usable location", point.lat, point.lon);
            }
            return Ok(Some(point));
        }

        let Some(address) = address.map(str::trim).filter(|a| !a.is_empty()) else {
            return Ok(None);
        };
        match self.client.geocode(address)? {
            Some(point) => {
                crate::debug!("fetch"; "`{}` is at {},{}", address, point.lat, point.lon);
                Ok(Some(point))
            }
            None => bail!("no location found for address `{address}`"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_session() -> Session {
        let mut config = AppConfig::default();
        config.cache.enable = false;
        config.source.url = "http://127.0.0.1:9/".into();
        config.source.geocoder_url = "http://127.0.0.1:9/".into();
        config.source.timeout_secs = 1;
        Session::new(&config, false)
    }

    #[test]
    fn test_reference_point_prefers_near() {
        let session = offline_session();
        let point = GeoPoint::new(-33.8, 151.1);
        assert_eq!(
            session.reference_point(Some(point), Some("ignored")).unwrap(),
            Some(point)
        );
    }

    #[test]
    fn test_reference_point_rejects_origin() {
        let session = offline_session();
        assert!(
            session
                .reference_point(Some(GeoPoint::new(0.0, 0.0)), None)
                .is_err()
        );
    }

    #[test]
    fn test_no_reference_point() {
        let session = offline_session();
        assert_eq!(session.reference_point(None, None).unwrap(), None);
        assert_eq!(session.reference_point(None, Some("  ")).unwrap(), None);
    }

    #[test]
    fn test_seeded_cache_avoids_download() {
        let session = offline_session();
        session.cache.set(
            crate::source::DEFAULT_KEY,
            vec![School {
                name: "Ryde Public School".into(),
                code: "1001".into(),
                ..School::default()
            }],
        );
        let catalog = session.catalog().unwrap();
        assert!(catalog.resolve("ryde-public-school").is_some());
    }
}
