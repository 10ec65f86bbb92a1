//! A loaded dataset together with its slug index.

use std::sync::Arc;

use serde_json::{Map, Value as JsonValue};

use super::{School, SearchHit};
use crate::core::slug::{SlugIndex, possible_slugs};

/// Schools plus the routing built over them. Cheap to share behind an `Arc`.
#[derive(Debug)]
pub struct Catalog {
    schools: Arc<Vec<School>>,
    slugs: SlugIndex,
}

impl Catalog {
    pub fn build(schools: Arc<Vec<School>>) -> Self {
        let slugs = SlugIndex::build(schools.as_slice());
        Self { schools, slugs }
    }

    pub fn schools(&self) -> &[School] {
        &self.schools
    }

    /// Whether this catalog was built from `schools`.
    pub fn is_built_from(&self, schools: &Arc<Vec<School>>) -> bool {
        Arc::ptr_eq(&self.schools, schools)
    }

    pub fn slugs(&self) -> &SlugIndex {
        &self.slugs
    }

    /// School addressed by `slug`; a leading `/` is accepted.
    pub fn resolve(&self, slug: &str) -> Option<(usize, &School)> {
        let slug = slug.trim().trim_start_matches('/');
        let position = self.slugs.get(slug)?;
        self.schools.get(position).map(|school| (position, school))
    }

    pub fn by_code(&self, code: &str) -> Option<(usize, &School)> {
        let code = code.trim();
        self.schools
            .iter()
            .enumerate()
            .find(|(_, school)| school.code == code)
    }

    /// Routable slugs resembling `slug`, for "did you mean" output.
    ///
    /// Matches are slugs that contain one of the slug's short forms, or
    /// whose school name contains the slug read as words.
    pub fn suggestions(&self, slug: &str, limit: usize) -> Vec<&str> {
        let slug = slug.trim().trim_start_matches('/');
        let words = slug.replace('-', " ");
        let forms: Vec<String> = possible_slugs(&words)
            .into_iter()
            .filter(|form| !form.is_empty())
            .collect();
        if forms.is_empty() {
            return Vec::new();
        }

        self.slugs
            .iter()
            .filter(|entry| {
                forms.iter().any(|form| entry.slug.contains(form.as_str()))
                    || self.schools[entry.position]
                        .name
                        .to_lowercase()
                        .contains(&words)
            })
            .take(limit)
            .map(|entry| entry.slug.as_str())
            .collect()
    }

    /// JSON for the school at `position`: `slug` and `url` first, then the
    /// record's own fields. Unroutable schools get `null` for both.
    pub fn school_json(&self, position: usize) -> JsonValue {
        let mut map = Map::new();
        match self.slugs.slug_of(position) {
            Some(slug) => {
                map.insert("slug".into(), slug.into());
                map.insert("url".into(), format!("/{slug}").into());
            }
            None => {
                map.insert("slug".into(), JsonValue::Null);
                map.insert("url".into(), JsonValue::Null);
            }
        }
        if let Some(school) = self.schools.get(position) {
            map.extend(school.to_json());
        }
        JsonValue::Object(map)
    }

    /// [`Catalog::school_json`] plus `distance_km` when the hit has one.
    pub fn hit_json(&self, hit: &SearchHit<'_>) -> JsonValue {
        let mut value = self.school_json(hit.position);
        if let (Some(distance), JsonValue::Object(map)) = (hit.distance_km, &mut value) {
            map.insert("distance_km".into(), round_km(distance).into());
        }
        value
    }
}

/// Distances are reported to the metre.
pub fn round_km(km: f64) -> f64 {
    (km * 1000.0).round() / 1000.0
}
