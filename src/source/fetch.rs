//! Dataset download.

use super::{Client, SourceError};
use crate::school::{School, parse_schools};
use crate::utils::plural::plural_count;

impl Client {
    /// Download and decode the full school list.
    ///
    /// The body must be a JSON array of objects; anything else is a
    /// [`SourceError::Decode`].
    pub fn fetch_schools(&self) -> Result<Vec<School>, SourceError> {
        let body = self.get_text(&self.dataset_url, &[])?;
        let schools = decode(&self.dataset_url, &body)?;
        crate::log!("fetch"; "downloaded {}", plural_count(schools.len(), "school"));
        Ok(schools)
    }
}

fn decode(url: &str, body: &str) -> Result<Vec<School>, SourceError> {
    parse_schools(body).map_err(|source| SourceError::Decode {
        url: url.to_string(),
        source,
    })
}
