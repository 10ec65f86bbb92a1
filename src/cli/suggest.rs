//! `suggest`: address completion through the geocoder.

use anyhow::{Context, Result};

use super::common::Session;
use crate::source::MIN_SUGGEST_CHARS;

pub fn run_suggest(session: &Session, text: &str, json: bool) -> Result<()> {
    if text.trim().chars().count() < MIN_SUGGEST_CHARS {
        crate::log!("warning"; "type at least {} characters for suggestions", MIN_SUGGEST_CHARS);
    }

    let suggestions = session
        .client()
        .suggest(text)
        .with_context(|| format!("Failed to look up `{}`", text.trim()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
        return Ok(());
    }
    if suggestions.is_empty() {
        println!("no matching addresses");
    }
    for suggestion in &suggestions {
        println!(
            "{}  ({:.5}, {:.5})",
            suggestion.display_name, suggestion.location.lat, suggestion.location.lon
        );
    }
    Ok(())
}
