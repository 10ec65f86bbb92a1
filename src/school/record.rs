//! School record as published in the NSW public schools dataset.
//!
//! Only the fields this tool reads are typed; everything else is kept in
//! [`School::extra`] in source order and written back unchanged.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::core::geo::{GeoPoint, Locatable};
use crate::core::slug::Sluggable;

/// Text shown for an empty field.
pub const NOT_AVAILABLE: &str = "N/A";

/// One school from the dataset.
///
/// String fields accept numbers, booleans and null (null becomes empty).
/// Coordinates accept numbers or numeric strings; anything unparsable is 0,
/// which the distance engine treats as "no location".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct School {
    #[serde(rename = "School_name", default, deserialize_with = "lenient_string")]
    pub name: String,

    #[serde(rename = "School_code", default, deserialize_with = "lenient_string")]
    pub code: String,

    #[serde(rename = "Town_suburb", default, deserialize_with = "lenient_string")]
    pub suburb: String,

    #[serde(rename = "Postcode", default, deserialize_with = "lenient_string")]
    pub postcode: String,

    #[serde(rename = "Street", default, deserialize_with = "lenient_string")]
    pub street: String,

    #[serde(rename = "Phone", default, deserialize_with = "lenient_string")]
    pub phone: String,

    #[serde(rename = "School_Email", default, deserialize_with = "lenient_string")]
    pub email: String,

    #[serde(rename = "Website", default, deserialize_with = "lenient_string")]
    pub website: String,

    #[serde(
        rename = "Level_of_schooling",
        default,
        deserialize_with = "lenient_string"
    )]
    pub level: String,

    #[serde(rename = "Latitude", default, deserialize_with = "lenient_coordinate")]
    pub latitude: f64,

    #[serde(rename = "Longitude", default, deserialize_with = "lenient_coordinate")]
    pub longitude: f64,

    #[serde(
        rename = "latest_year_enrolment_FTE",
        default,
        deserialize_with = "lenient_string"
    )]
    pub enrolment_fte: String,

    #[serde(rename = "ICSEA_value", default, deserialize_with = "lenient_string")]
    pub icsea: String,

    #[serde(rename = "LBOTE_pct", default, deserialize_with = "lenient_string")]
    pub lbote_pct: String,

    #[serde(rename = "Indigenous_pct", default, deserialize_with = "lenient_string")]
    pub indigenous_pct: String,

    #[serde(
        rename = "School_specialty_type",
        default,
        deserialize_with = "lenient_string"
    )]
    pub specialty_type: String,

    #[serde(rename = "Date_extracted", default, deserialize_with = "lenient_string")]
    pub date_extracted: String,

    /// Remaining dataset fields, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl School {
    /// Website with a scheme, `None` if the dataset has none.
    pub fn website_url(&self) -> Option<String> {
        let site = self.website.trim();
        if site.is_empty() {
            None
        } else if site.starts_with("http") {
            Some(site.to_string())
        } else {
            Some(format!("https://{site}"))
        }
    }

    /// One-line street address: `"12 Smith St, Ryde 2112"`.
    pub fn address(&self) -> String {
        let locality = [self.suburb.trim(), self.postcode.trim()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        [self.street.trim(), locality.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Serialize to a JSON object (typed fields first, then pass-through).
    pub fn to_json(&self) -> Map<String, JsonValue> {
        match serde_json::to_value(self) {
            Ok(JsonValue::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

impl Sluggable for School {
    fn slug_name(&self) -> &str {
        &self.name
    }

    fn slug_code(&self) -> &str {
        &self.code
    }
}

impl Locatable for School {
    fn location(&self) -> Option<GeoPoint> {
        GeoPoint::located(self.latitude, self.longitude)
    }
}

/// Value for display, with empty text shown as `N/A`.
pub fn or_na(value: &str) -> &str {
    if value.trim().is_empty() {
        NOT_AVAILABLE
    } else {
        value
    }
}

/// Parse the dataset body: a JSON array of school objects.
pub fn parse_schools(body: &str) -> serde_json::Result<Vec<School>> {
    serde_json::from_str(body)
}

// ============================================================================
// lenient field decoding
// ============================================================================

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match JsonValue::deserialize(deserializer)? {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s,
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        other => other.to_string(),
    })
}

fn lenient_coordinate<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match JsonValue::deserialize(deserializer)? {
        JsonValue::Number(n) => n.as_f64().unwrap_or(0.0),
        JsonValue::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(if value.is_finite() { value } else { 0.0 })
}

// ============================================================================
// tests
// ============================================================================
