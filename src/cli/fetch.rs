//! `fetch` and `updated`: dataset maintenance.

use anyhow::Result;

use super::common::Session;
use crate::source::last_updated;
use crate::utils::plural::plural_count;

/// Download the dataset into the cache and report what arrived.
///
/// With `clear`, cached snapshots are deleted first.
pub fn run_fetch(session: &Session, clear: bool) -> Result<()> {
    if clear {
        session.clear_cache()?;
        crate::log!("cache"; "cleared");
    }
    let schools = session.refetch()?;
    crate::log!("cache"; "stored {}", plural_count(schools.len(), "school"));

    let updated = last_updated(&schools);
    if !updated.is_empty() {
        crate::log!("fetch"; "dataset extracted {}", updated);
    }
    Ok(())
}

/// Print when the dataset was extracted.
pub fn run_updated(session: &Session) -> Result<()> {
    let schools = session.schools()?;
    let updated = last_updated(&schools);
    if updated.is_empty() {
        crate::log!("warning"; "the dataset is empty");
    } else {
        println!("{updated}");
    }
    Ok(())
}
