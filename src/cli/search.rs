//! `search`: filter the dataset and print one page of results.

use anyhow::{Result, bail};
use owo_colors::OwoColorize;
use serde_json::{Map, Value as JsonValue, json};

use super::args::SearchArgs;
use super::common::Session;
use crate::config::AppConfig;
use crate::core::geo::Radius;
use crate::school::{Catalog, KNOWN_LEVELS, Page, SearchHit, SearchQuery, or_na, round_km};
use crate::utils::plural::plural_count;

const NAME_WIDTH: usize = 40;
const SUBURB_WIDTH: usize = 20;
const LEVEL_WIDTH: usize = 18;

/// Keys every filtered record keeps, in front of the requested fields.
const ALWAYS_KEPT: [&str; 3] = ["slug", "url", "distance_km"];

pub fn run_search(session: &Session, config: &AppConfig, args: &SearchArgs) -> Result<()> {
    let per_page = args.per_page.unwrap_or(config.search.per_page);
    if per_page == 0 {
        bail!("--per-page must be at least 1");
    }

    if let Some(level) = args.level.as_deref()
        && !KNOWN_LEVELS.contains(&level)
    {
        crate::log!("warning"; "unknown level `{}`, expected one of: {}", level, KNOWN_LEVELS.join(", "));
    }

    let near = session.reference_point(args.near, args.address.as_deref())?;
    let query = SearchQuery {
        term: args.query.clone(),
        level: args.level.clone(),
        near,
        radius: Radius::from_km(args.radius),
    };

    let catalog = session.catalog()?;
    let hits = query.apply(catalog.schools());
    let page = Page::of(hits.len(), args.page, per_page);
    crate::debug!("search"; "{:?} -> {} of {}", query, hits.len(), catalog.schools().len());

    if args.json {
        let output = results_json(&catalog, &hits, page, args.fields.as_deref());
        let formatted = if args.pretty {
            serde_json::to_string_pretty(&output)?
        } else {
            serde_json::to_string(&output)?
        };
        println!("{formatted}");
    } else {
        print_table(page.slice(&hits), page, config.search.nearby_km);
    }
    Ok(())
}

/// `{total, page, total_pages, results}` for one page of hits.
pub fn results_json(
    catalog: &Catalog,
    hits: &[SearchHit<'_>],
    page: Page,
    fields: Option<&[String]>,
) -> JsonValue {
    let results: Vec<JsonValue> = page
        .slice(hits)
        .iter()
        .map(|hit| {
            let record = catalog.hit_json(hit);
            match fields {
                Some(fields) => filter_fields(record, fields),
                None => record,
            }
        })
        .collect();

    json!({
        "total": page.total,
        "page": page.page,
        "total_pages": page.total_pages,
        "results": results,
    })
}

/// Keep `slug`, `url`, `distance_km` and the requested fields, in that order.
///
/// A requested field the record lacks comes back as `null`.
fn filter_fields(record: JsonValue, fields: &[String]) -> JsonValue {
    let JsonValue::Object(mut source) = record else {
        return record;
    };

    let mut obj = Map::new();
    for key in ALWAYS_KEPT {
        if let Some(value) = source.remove(key) {
            obj.insert(key.to_string(), value);
        }
    }
    for field in fields.iter().map(|f| f.trim()).filter(|f| !f.is_empty()) {
        if obj.contains_key(field) {
            continue;
        }
        let value = source.remove(field).unwrap_or(JsonValue::Null);
        obj.insert(field.to_string(), value);
    }
    JsonValue::Object(obj)
}

fn print_table(hits: &[SearchHit<'_>], page: Page, nearby_km: f64) {
    if page.total == 0 {
        println!("no schools match");
        return;
    }

    let with_distance = hits.iter().any(|hit| hit.distance_km.is_some());
    let mut header = format!(
        "{:<NAME_WIDTH$}  {:<SUBURB_WIDTH$}  {:<LEVEL_WIDTH$}",
        "School", "Suburb", "Level"
    );
    if with_distance {
        header.push_str("  Distance");
    }
    println!("{}", header.bold());

    for hit in hits {
        let school = hit.school;
        let mut line = format!(
            "{:<NAME_WIDTH$}  {:<SUBURB_WIDTH$}  {:<LEVEL_WIDTH$}",
            truncate(or_na(&school.name), NAME_WIDTH),
            truncate(or_na(&school.suburb), SUBURB_WIDTH),
            truncate(or_na(&school.level), LEVEL_WIDTH),
        );
        if let Some(distance) = hit.distance_km {
            line.push_str(&format!("  {:>7.2} km", round_km(distance)));
            if hit.is_nearby(nearby_km) {
                line.push_str(&format!("  {}", "nearby".green()));
            }
        }
        println!("{line}");
    }

    println!(
        "\npage {} of {} ({})",
        page.page,
        page.total_pages,
        plural_count(page.total, "school")
    );
}

/// Cut `text` to `width` characters, marking the cut with `…`.
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
