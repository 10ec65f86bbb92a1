//! `slugs`: every routable path.

use anyhow::Result;
use serde_json::json;

use super::common::Session;
use crate::school::Catalog;
use crate::utils::plural::plural_count;

pub fn run_slugs(session: &Session, json: bool) -> Result<()> {
    let catalog = session.catalog()?;

    let unroutable = catalog.slugs().unroutable().len();
    if unroutable > 0 {
        crate::log!("warning"; "{} cannot be routed (no usable name or duplicate code)", plural_count(unroutable, "school"));
    }

    if json {
        println!("{}", serde_json::to_string(&slug_objects(&catalog))?);
    } else {
        for entry in catalog.slugs().iter() {
            println!("{}", entry.path());
        }
    }
    Ok(())
}

/// `[{slug, code, name}]` in dataset order.
fn slug_objects(catalog: &Catalog) -> Vec<serde_json::Value> {
    catalog
        .slugs()
        .iter()
        .map(|entry| {
            json!({
                "slug": entry.slug,
                "code": entry.code,
                "name": catalog.schools()[entry.position].name,
            })
        })
        .collect()
}
