//! Search composition: text term, schooling level, proximity and pagination.

use serde::Serialize;

use super::School;
use crate::core::geo::{GeoPoint, Locatable, Radius, rank_by_distance};

/// Levels offered as filter values.
pub const KNOWN_LEVELS: [&str; 4] = [
    "Primary School",
    "High School",
    "Secondary School",
    "Other School",
];

/// Filters applied to the school list, in this order:
/// term, level, then proximity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    /// Case-insensitive substring of the name or suburb.
    pub term: Option<String>,
    /// Exact `Level_of_schooling` value.
    pub level: Option<String>,
    /// Reference point; when set, results are ranked by distance.
    pub near: Option<GeoPoint>,
    /// Only meaningful together with `near`.
    pub radius: Radius,
}

/// A matching school, with its distance when the query has a reference point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit<'a> {
    /// Index of the school in the searched slice.
    pub position: usize,
    pub school: &'a School,
    pub distance_km: Option<f64>,
}

struct Positioned<'a> {
    position: usize,
    school: &'a School,
}

impl Locatable for Positioned<'_> {
    fn location(&self) -> Option<GeoPoint> {
        self.school.location()
    }
}

impl SearchQuery {
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.term().is_none() && self.level().is_none() && self.near.is_none()
    }

    fn term(&self) -> Option<String> {
        self.term
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
    }

    fn level(&self) -> Option<&str> {
        self.level.as_deref().filter(|l| !l.is_empty())
    }

    /// Run the query over `schools`.
    ///
    /// Without a reference point the dataset order is kept. With one,
    /// ungeolocated schools drop out and the rest are sorted nearest first.
    pub fn apply<'a>(&self, schools: &'a [School]) -> Vec<SearchHit<'a>> {
        let term = self.term();
        let level = self.level();
        let matched = schools
            .iter()
            .enumerate()
            .filter(|(_, school)| {
                term.as_deref().is_none_or(|term| {
                    school.name.to_lowercase().contains(term)
                        || school.suburb.to_lowercase().contains(term)
                }) && level.is_none_or(|level| school.level == level)
            })
            .map(|(position, school)| Positioned { position, school });

        match self.near {
            Some(reference) => {
                let matched: Vec<Positioned<'a>> = matched.collect();
                rank_by_distance(&matched, reference, self.radius)
                    .into_iter()
                    .map(|ranked| SearchHit {
                        position: ranked.record.position,
                        school: ranked.record.school,
                        distance_km: Some(ranked.distance_km),
                    })
                    .collect()
            }
            None => matched
                .map(|p| SearchHit {
                    position: p.position,
                    school: p.school,
                    distance_km: None,
                })
                .collect(),
        }
    }
}

impl SearchHit<'_> {
    /// Within `threshold_km` of the reference point.
    pub fn is_nearby(&self, threshold_km: f64) -> bool {
        self.distance_km.is_some_and(|d| d <= threshold_km)
    }
}

// ============================================================================
// Pagination
// ============================================================================

/// One page of a result list (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl Page {
    /// Page `page` of `total` items; out-of-range pages clamp to the
    /// nearest valid one.
    pub fn of(total: usize, page: usize, per_page: usize) -> Self {
        let per_page = per_page.max(1);
        let total_pages = total.div_ceil(per_page);
        let page = page.clamp(1, total_pages.max(1));
        Self {
            page,
            per_page,
            total,
            total_pages,
        }
    }

    /// Index range of this page's items.
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = ((self.page - 1) * self.per_page).min(self.total);
        let end = (start + self.per_page).min(self.total);
        start..end
    }

    pub fn slice<'s, T>(&self, items: &'s [T]) -> &'s [T] {
        &items[self.range()]
    }
}

// ============================================================================
// tests
// ============================================================================
