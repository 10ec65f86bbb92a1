//! `compare`: schools side by side on the comparison criteria.

use anyhow::{Result, anyhow};
use owo_colors::OwoColorize;
use serde_json::{Value as JsonValue, json};

use super::common::Session;
use crate::school::{Catalog, Comparison, School, compare};

const LABEL_WIDTH: usize = 16;
const COLUMN_WIDTH: usize = 24;

pub fn run_compare(session: &Session, slugs: &[String], json: bool) -> Result<()> {
    let catalog = session.catalog()?;
    let selection = select(&catalog, slugs)?;
    let comparison = compare(selection)?;

    if json {
        let output = comparison_json(&catalog, &comparison);
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_table(&comparison);
    }
    Ok(())
}

/// Resolve every slug, failing on the first unknown one.
fn select<'a>(catalog: &'a Catalog, slugs: &[String]) -> Result<Vec<&'a School>> {
    slugs
        .iter()
        .map(|slug| {
            catalog.resolve(slug).map(|(_, school)| school).ok_or_else(|| {
                let hint = catalog.suggestions(slug, 3);
                if hint.is_empty() {
                    anyhow!("no school at `/{}`", slug.trim_start_matches('/'))
                } else {
                    anyhow!(
                        "no school at `/{}` (did you mean {}?)",
                        slug.trim_start_matches('/'),
                        hint.iter().map(|s| format!("/{s}")).collect::<Vec<_>>().join(", ")
                    )
                }
            })
        })
        .collect()
}

fn comparison_json(catalog: &Catalog, comparison: &Comparison<'_>) -> JsonValue {
    let schools: Vec<JsonValue> = comparison
        .schools
        .iter()
        .map(|school| {
            json!({
                "slug": catalog.slugs().slug_for_code(&school.code),
                "code": school.code,
                "name": school.name,
            })
        })
        .collect();
    json!({ "schools": schools, "rows": comparison.rows })
}

fn print_table(comparison: &Comparison<'_>) {
    let mut header = format!("{:<LABEL_WIDTH$}", "");
    for school in &comparison.schools {
        header.push_str(&format!("  {:<COLUMN_WIDTH$}", fit(&school.name)));
    }
    println!("{}", header.bold());

    for row in &comparison.rows {
        let mut line = String::new();
        for value in &row.values {
            line.push_str(&format!("  {:<COLUMN_WIDTH$}", fit(value)));
        }
        println!("{}{line}", format!("{:<LABEL_WIDTH$}", row.label).cyan());
    }
}

fn fit(text: &str) -> String {
    if text.chars().count() <= COLUMN_WIDTH {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(COLUMN_WIDTH - 1).collect();
        cut.push('…');
        cut
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn catalog() -> Catalog {
        let school = |name: &str, code: &str, enrolment: &str| School {
            name: name.into(),
            code: code.into(),
            enrolment_fte: enrolment.into(),
            ..School::default()
        };
        Catalog::build(Arc::new(vec![
            school("Ryde Public School", "1001", "1234.5"),
            school("Eastwood Public School", "1002", ""),
        ]))
    }

    #[test]
    fn test_select_unknown_slug() {
        let catalog = catalog();
        let err = select(&catalog, &["ryde".to_string()]).unwrap_err();
        assert!(err.to_string().contains("/ryde-public-school"));
        assert!(select(&catalog, &["/ryde-public-school".to_string()]).is_ok());
    }

    #[test]
    fn test_comparison_json() {
        let catalog = catalog();
        let slugs = ["ryde-public-school".to_string(), "eastwood-public-school".to_string()];
        let comparison = compare(select(&catalog, &slugs).unwrap()).unwrap();
        let json = comparison_json(&catalog, &comparison);

        assert_eq!(json["schools"][1]["slug"], "eastwood-public-school");
        assert_eq!(json["rows"][0]["label"], "Enrolment (FTE)");
        assert_eq!(json["rows"][0]["values"], json!(["1,234", "N/A"]));
    }
}
