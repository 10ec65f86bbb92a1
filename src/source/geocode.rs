//! Address lookup through Nominatim, restricted to Australia.

use serde::{Deserialize, Serialize};

use super::{Client, SourceError};
use crate::core::geo::GeoPoint;

/// Shorter queries return no suggestions without a request.
pub const MIN_SUGGEST_CHARS: usize = 3;

const COUNTRY_CODES: &str = "au";
const DEFAULT_STATE: &str = "NSW";
const DEFAULT_COUNTRY: &str = "Australia";

/// A candidate address for a partially typed query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddressSuggestion {
    pub display_name: String,
    pub location: GeoPoint,
    pub address: AddressParts,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AddressParts {
    pub house_number: String,
    pub road: String,
    pub suburb: String,
    pub postcode: String,
    pub state: String,
    pub country: String,
}

// Nominatim `format=json` result. Coordinates arrive as strings.
#[derive(Debug, Deserialize)]
struct Place {
    #[serde(default)]
    display_name: String,
    lat: String,
    lon: String,
    #[serde(default)]
    address: Option<PlaceAddress>,
}

#[derive(Debug, Default, Deserialize)]
struct PlaceAddress {
    house_number: Option<String>,
    road: Option<String>,
    suburb: Option<String>,
    city: Option<String>,
    postcode: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

impl Place {
    fn point(&self) -> Option<GeoPoint> {
        let lat = self.lat.trim().parse().ok()?;
        let lon = self.lon.trim().parse().ok()?;
        GeoPoint::located(lat, lon)
    }

    fn into_suggestion(self) -> Option<AddressSuggestion> {
        let location = self.point()?;
        let address = self.address.unwrap_or_default();
        Some(AddressSuggestion {
            display_name: self.display_name,
            location,
            address: AddressParts {
                house_number: non_empty(address.house_number).unwrap_or_default(),
                road: non_empty(address.road).unwrap_or_default(),
                suburb: non_empty(address.suburb)
                    .or_else(|| non_empty(address.city))
                    .unwrap_or_default(),
                postcode: non_empty(address.postcode).unwrap_or_default(),
                state: non_empty(address.state).unwrap_or_else(|| DEFAULT_STATE.into()),
                country: non_empty(address.country).unwrap_or_else(|| DEFAULT_COUNTRY.into()),
            },
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_places(url: &str, body: &str) -> Result<Vec<Place>, SourceError> {
    serde_json::from_str(body).map_err(|source| SourceError::Decode {
        url: url.to_string(),
        source,
    })
}

impl Client {
    /// Coordinates of the best match for `address`, `None` if nothing matched.
    pub fn geocode(&self, address: &str) -> Result<Option<GeoPoint>, SourceError> {
        let address = address.trim();
        if address.is_empty() {
            return Ok(None);
        }
        let body = self.get_text(
            &self.geocoder_url,
            &[
                ("format", "json"),
                ("q", address),
                ("limit", "1"),
                ("countrycodes", COUNTRY_CODES),
            ],
        )?;
        let places = parse_places(&self.geocoder_url, &body)?;
        Ok(places.first().and_then(Place::point))
    }

    /// Up to five address suggestions for a partially typed query.
    pub fn suggest(&self, query: &str) -> Result<Vec<AddressSuggestion>, SourceError> {
        let query = query.trim();
        if query.chars().count() < MIN_SUGGEST_CHARS {
            return Ok(Vec::new());
        }
        let body = self.get_text(
            &self.geocoder_url,
            &[
                ("format", "json"),
                ("q", query),
                ("limit", "5"),
                ("countrycodes", COUNTRY_CODES),
                ("addressdetails", "1"),
            ],
        )?;
        let places = parse_places(&self.geocoder_url, &body)?;
        Ok(places.into_iter().filter_map(Place::into_suggestion).collect())
    }
}
