//! Request target parsing: path to route, query string to search parameters.

use percent_encoding::percent_decode_str;
use thiserror::Error;

use crate::core::geo::{GeoPoint, Radius};
use crate::school::SearchQuery;

/// A client mistake, answered with 400.
#[derive(Debug, Error, PartialEq)]
pub enum BadRequest {
    #[error("invalid value for `{name}`: `{value}`")]
    Invalid { name: &'static str, value: String },

    #[error("`lat` and `lon` must be given together")]
    HalfPoint,

    #[error("{lat},{lon} is not a usable location")]
    Unlocated { lat: f64, lon: f64 },

    #[error("path is not valid UTF-8")]
    Encoding,
}

#[derive(Debug, PartialEq)]
pub enum Route {
    /// `GET /schools?...`
    Schools(SearchParams),
    /// `GET /slugs`
    Slugs,
    /// `GET /<slug>`
    School(String),
    /// `GET /`
    Root,
}

/// `/schools` query parameters.
#[derive(Debug, Default, PartialEq)]
pub struct SearchParams {
    pub query: SearchQuery,
    pub page: usize,
    /// `None` uses the configured page size.
    pub per_page: Option<usize>,
}

/// Parse a request target such as `/schools?q=ryde&page=2`.
pub fn parse_target(target: &str) -> Result<Route, BadRequest> {
    let (path, query) = target.split_once('?').unwrap_or((target, ""));
    let path = percent_decode_str(path)
        .decode_utf8()
        .map_err(|_| BadRequest::Encoding)?;
    let path = path.trim_matches('/');

    Ok(match path {
        "" => Route::Root,
        "schools" => Route::Schools(parse_search(query)?),
        "slugs" => Route::Slugs,
        slug => Route::School(slug.to_string()),
    })
}

/// Parse `q`, `level`, `lat`, `lon`, `radius`, `page` and `per_page`.
///
/// Empty values count as absent; unknown parameters are ignored.
pub fn parse_search(query: &str) -> Result<SearchParams, BadRequest> {
    let mut params = SearchParams {
        page: 1,
        ..SearchParams::default()
    };
    let mut lat = None;
    let mut lon = None;

    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match key.as_ref() {
            "q" => params.query.term = Some(value.to_string()),
            "level" => params.query.level = Some(value.to_string()),
            "lat" => lat = Some(number("lat", value)?),
            "lon" => lon = Some(number("lon", value)?),
            "radius" => {
                let km: f64 = number("radius", value)?;
                if km < 0.0 {
                    return Err(invalid("radius", value));
                }
                params.query.radius = Radius::from_km(km);
            }
            "page" => params.page = positive("page", value)?,
            "per_page" => params.per_page = Some(positive("per_page", value)?),
            _ => {}
        }
    }

    params.query.near = match (lat, lon) {
        (Some(lat), Some(lon)) => Some(
            GeoPoint::located(lat, lon).ok_or(BadRequest::Unlocated { lat, lon })?,
        ),
        (None, None) => None,
        _ => return Err(BadRequest::HalfPoint),
    };
    Ok(params)
}

fn invalid(name: &'static str, value: &str) -> BadRequest {
    BadRequest::Invalid {
        name,
        value: value.to_string(),
    }
}

fn number(name: &'static str, value: &str) -> Result<f64, BadRequest> {
    value
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| invalid(name, value))
}

fn positive(name: &'static str, value: &str) -> Result<usize, BadRequest> {
    value
        .parse::<usize>()
        .ok()
        .filter(|&n| n > 0)
        .ok_or_else(|| invalid(name, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes() {
        assert_eq!(parse_target("/").unwrap(), Route::Root);
        assert_eq!(parse_target("/slugs").unwrap(), Route::Slugs);
        assert_eq!(parse_target("/slugs/").unwrap(), Route::Slugs);
        assert_eq!(
            parse_target("/ryde-public-school?x=1").unwrap(),
            Route::School("ryde-public-school".into())
        );
        assert_eq!(
            parse_target("/caf%C3%A9").unwrap(),
            Route::School("café".into())
        );
        assert_eq!(parse_target("/%FF").unwrap_err(), BadRequest::Encoding);
    }

    #[test]
    fn test_search_params() {
        let Route::Schools(params) =
            parse_target("/schools?q=north+ryde&level=Primary%20School&lat=-33.8&lon=151.1&radius=2.5&page=3&per_page=10")
                .unwrap()
        else {
            panic!("expected /schools");
        };
        assert_eq!(params.query.term.as_deref(), Some("north ryde"));
        assert_eq!(params.query.level.as_deref(), Some("Primary School"));
        assert_eq!(params.query.near, Some(GeoPoint::new(-33.8, 151.1)));
        assert_eq!(params.query.radius, Radius::Within(2.5));
        assert_eq!(params.page, 3);
        assert_eq!(params.per_page, Some(10));
    }

    #[test]
    fn test_search_defaults() {
        let params = parse_search("q=&unknown=1").unwrap();
        assert_eq!(params.query, SearchQuery::default());
        assert_eq!(params.page, 1);
        assert_eq!(params.per_page, None);
    }

    #[test]
    fn test_lat_without_lon() {
        assert_eq!(parse_search("lat=-33.8").unwrap_err(), BadRequest::HalfPoint);
        assert_eq!(parse_search("lon=151.1").unwrap_err(), BadRequest::HalfPoint);
    }

    #[test]
    fn test_radius_parse() {
        assert_eq!(parse_search("radius=0").unwrap().query.radius, Radius::Unlimited);
        assert_eq!(parse_search("radius=5").unwrap().query.radius, Radius::Within(5.0));
        assert!(parse_search("radius=abc").is_err());
        assert!(parse_search("radius=-1").is_err());
        assert!(parse_search("radius=inf").is_err());
    }

    #[test]
    fn test_invalid_numbers() {
        assert_eq!(
            parse_search("page=0").unwrap_err(),
            BadRequest::Invalid {
                name: "page",
                value: "0".into()
            }
        );
        assert!(parse_search("per_page=two").is_err());
        assert!(parse_search("lat=x&lon=1").is_err());
        assert!(matches!(
            parse_search("lat=0&lon=0"),
            Err(BadRequest::Unlocated { .. })
        ));
    }
}
