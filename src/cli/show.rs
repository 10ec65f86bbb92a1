//! `show`: details of one school.

use anyhow::Result;
use owo_colors::OwoColorize;

use super::common::Session;
use crate::core::geo::Locatable;
use crate::core::slug::slug_to_title;
use crate::school::{Catalog, School, or_na};

/// Suggestions printed when a slug does not resolve.
const SUGGESTION_LIMIT: usize = 5;

/// Print the school addressed by `slug` or `code`.
///
/// Returns `false` when nothing matched; suggestions have been printed.
pub fn run_show(
    session: &Session,
    slug: Option<&str>,
    code: Option<&str>,
    json: bool,
) -> Result<bool> {
    let catalog = session.catalog()?;

    let found = match (slug, code) {
        (_, Some(code)) => catalog.by_code(code),
        (Some(slug), None) => catalog.resolve(slug),
        (None, None) => None,
    };

    let Some((position, school)) = found else {
        report_missing(&catalog, slug, code);
        return Ok(false);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&catalog.school_json(position))?);
    } else {
        print_details(school, catalog.slugs().slug_of(position));
    }
    Ok(true)
}

fn report_missing(catalog: &Catalog, slug: Option<&str>, code: Option<&str>) {
    match (slug, code) {
        (_, Some(code)) => crate::log!("error"; "no school with code `{}`", code),
        (Some(slug), None) => {
            crate::log!("error"; "{}", missing_message(slug));
            let suggestions = catalog.suggestions(slug, SUGGESTION_LIMIT);
            if !suggestions.is_empty() {
                eprintln!("did you mean:");
                for suggestion in suggestions {
                    eprintln!("  /{suggestion}");
                }
            }
        }
        (None, None) => {}
    }
}

/// Error line for an unresolved slug, with a title guessed from the slug.
fn missing_message(slug: &str) -> String {
    let slug = slug.trim_matches('/');
    let title = slug_to_title(slug);
    if title.is_empty() {
        format!("no school at `/{slug}`")
    } else {
        format!("no school at `/{slug}` ({title})")
    }
}

fn print_details(school: &School, slug: Option<&str>) {
    println!("{}", or_na(&school.name).bold());
    if let Some(slug) = slug {
        println!("{}", format!("/{slug}").dimmed());
    }
    println!();

    let website = school.website_url().unwrap_or_default();
    let address = school.address();
    let rows = [
        ("Code", school.code.as_str()),
        ("Level", school.level.as_str()),
        ("Address", address.as_str()),
        ("Phone", school.phone.as_str()),
        ("Email", school.email.as_str()),
        ("Website", website.as_str()),
        ("Enrolment (FTE)", school.enrolment_fte.as_str()),
        ("ICSEA", school.icsea.as_str()),
        ("LBOTE %", school.lbote_pct.as_str()),
        ("Indigenous %", school.indigenous_pct.as_str()),
        ("Specialty", school.specialty_type.as_str()),
    ];
    for (label, value) in rows {
        println!("  {:<16} {}", label.cyan(), or_na(value));
    }
    if let Some(point) = school.location() {
        println!("  {:<16} {:.5}, {:.5}", "Location".cyan(), point.lat, point.lon);
    }
}
