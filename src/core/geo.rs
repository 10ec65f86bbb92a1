//! Great-circle distance and proximity ranking.
//!
//! Ranking pipeline:
//!
//! ```text
//! records ──▶ located? ──▶ distance ──▶ within radius? ──▶ stable sort ──▶ Ranked
//! ```
//!
//! Records opt in through [`Locatable`]; the engine never mutates them and
//! returns borrowed [`Ranked`] pairs so callers decide whether to keep the
//! distance for display or drop it.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers between two points given in degrees.
///
/// NaN inputs propagate to a NaN result.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

// ============================================================================
// GeoPoint
// ============================================================================

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Build a point only when both components are usable coordinates.
    pub fn located(lat: f64, lon: f64) -> Option<Self> {
        let point = Self::new(lat, lon);
        point.is_valid().then_some(point)
    }

    /// Finite and non-zero in both components.
    ///
    /// The dataset encodes "no location" as 0, so a zero component on either
    /// axis disqualifies the point.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite() && self.lat != 0.0 && self.lon != 0.0
    }

    #[inline]
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        haversine_km(self.lat, self.lon, other.lat, other.lon)
    }
}

/// Parse `"LAT,LON"` (whitespace around either part is ignored).
impl std::str::FromStr for GeoPoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| format!("expected LAT,LON but got `{s}`"))?;
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| format!("invalid latitude `{}`", lat.trim()))?;
        let lon: f64 = lon
            .trim()
            .parse()
            .map_err(|_| format!("invalid longitude `{}`", lon.trim()))?;
        if !lat.is_finite() || !lon.is_finite() {
            return Err(format!("coordinates must be finite: `{s}`"));
        }
        Ok(Self::new(lat, lon))
    }
}

// ============================================================================
// Radius
// ============================================================================

/// Search radius around a reference point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Radius {
    /// Keep every geolocated record.
    #[default]
    Unlimited,
    /// Keep records at most this many kilometers away (inclusive).
    Within(f64),
}

impl Radius {
    /// `0` means "no limit", not a zero-width radius.
    pub fn from_km(km: f64) -> Self {
        if km.is_finite() && km > 0.0 {
            Self::Within(km)
        } else {
            Self::Unlimited
        }
    }

    #[inline]
    pub fn contains(&self, distance_km: f64) -> bool {
        match *self {
            Self::Unlimited => true,
            Self::Within(km) => distance_km <= km,
        }
    }
}

// ============================================================================
// Ranking
// ============================================================================

/// Anything with an optional position on the globe.
pub trait Locatable {
    /// `None` when the record is not geolocated.
    fn location(&self) -> Option<GeoPoint>;
}

impl Locatable for GeoPoint {
    fn location(&self) -> Option<GeoPoint> {
        self.is_valid().then_some(*self)
    }
}

impl<T: Locatable + ?Sized> Locatable for &T {
    fn location(&self) -> Option<GeoPoint> {
        (**self).location()
    }
}

/// A record paired with its distance from the reference point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranked<T> {
    pub record: T,
    pub distance_km: f64,
}

impl<T> Ranked<T> {
    /// Drop the distance annotation.
    pub fn into_record(self) -> T {
        self.record
    }
}

/// Rank geolocated records by distance from `reference`.
///
/// Records without a valid location are skipped, records beyond `radius`
/// are dropped, and the rest are sorted nearest first. The sort is stable:
/// equal distances keep their input order.
pub fn rank_by_distance<'a, T: Locatable>(
    records: impl IntoIterator<Item = &'a T>,
    reference: GeoPoint,
    radius: Radius,
) -> Vec<Ranked<&'a T>>
where
    T: 'a,
{
    let mut ranked: Vec<Ranked<&'a T>> = records
        .into_iter()
        .filter_map(|record| {
            let location = record.location().filter(GeoPoint::is_valid)?;
            let distance_km = reference.distance_to(&location);
            radius.contains(distance_km).then_some(Ranked {
                record,
                distance_km,
            })
        })
        .collect();

    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked
}

/// Strip distances from a ranked sequence, keeping order.
pub fn strip_distances<T>(ranked: Vec<Ranked<T>>) -> Vec<T> {
    ranked.into_iter().map(Ranked::into_record).collect()
}

/// Filter and sort by distance with a raw kilometer radius (`0` = unlimited),
/// returning bare records.
#[allow(dead_code)]
pub fn filter_and_sort_by_distance<'a, T: Locatable>(
    records: &'a [T],
    reference: GeoPoint,
    radius_km: f64,
) -> Vec<&'a T> {
    strip_distances(rank_by_distance(records, reference, Radius::from_km(radius_km)))
}

// ============================================================================
// tests
// ============================================================================
