//! Side-by-side comparison of a handful of schools.

use serde::Serialize;
use thiserror::Error;

use super::{School, record::NOT_AVAILABLE};

/// Maximum number of schools in one comparison.
pub const MAX_COMPARED: usize = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompareError {
    #[error("nothing to compare")]
    Empty,
    #[error("at most {MAX_COMPARED} schools can be compared, got {0}")]
    TooMany(usize),
}

/// How a criterion is rendered and measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    /// Integer part with thousands separators.
    Count,
    /// Shown as-is, measured as an integer.
    Integer,
    /// Shown with a `%` suffix, measured as a float.
    Percent,
    /// Shown as-is, not measured.
    Text,
}

/// A comparable dataset field.
#[derive(Debug, Clone, Copy)]
pub struct Criterion {
    /// Dataset key.
    pub key: &'static str,
    pub label: &'static str,
    format: Format,
    get: fn(&School) -> &str,
}

impl Criterion {
    pub fn is_numeric(&self) -> bool {
        self.format != Format::Text
    }

    /// Display text; empty values are `N/A`.
    pub fn display(&self, school: &School) -> String {
        let raw = (self.get)(school).trim();
        if raw.is_empty() {
            return NOT_AVAILABLE.to_string();
        }
        match self.format {
            Format::Count => group_thousands(leading_int(raw)),
            Format::Percent => format!("{raw}%"),
            Format::Integer | Format::Text => raw.to_string(),
        }
    }

    /// Numeric value for charts and ranking; `None` for text criteria.
    /// Unparsable numbers measure as 0.
    pub fn measure(&self, school: &School) -> Option<f64> {
        let raw = (self.get)(school).trim();
        match self.format {
            Format::Count | Format::Integer => Some(leading_int(raw) as f64),
            Format::Percent => Some(leading_float(raw)),
            Format::Text => None,
        }
    }
}

/// Comparison criteria in display order.
pub const CRITERIA: [Criterion; 6] = [
    Criterion {
        key: "latest_year_enrolment_FTE",
        label: "Enrolment (FTE)",
        format: Format::Count,
        get: |s| &s.enrolment_fte,
    },
    Criterion {
        key: "ICSEA_value",
        label: "ICSEA Value",
        format: Format::Integer,
        get: |s| &s.icsea,
    },
    Criterion {
        key: "LBOTE_pct",
        label: "LBOTE %",
        format: Format::Percent,
        get: |s| &s.lbote_pct,
    },
    Criterion {
        key: "Indigenous_pct",
        label: "Indigenous %",
        format: Format::Percent,
        get: |s| &s.indigenous_pct,
    },
    Criterion {
        key: "Level_of_schooling",
        label: "School Level",
        format: Format::Text,
        get: |s| &s.level,
    },
    Criterion {
        key: "School_specialty_type",
        label: "Specialty Type",
        format: Format::Text,
        get: |s| &s.specialty_type,
    },
];

// ============================================================================
// Comparison
// ============================================================================

/// One criterion across all compared schools.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub key: &'static str,
    pub label: &'static str,
    pub numeric: bool,
    /// Display text per school, in selection order.
    pub values: Vec<String>,
    /// Measured values per school (numeric criteria only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measures: Option<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison<'a> {
    pub schools: Vec<&'a School>,
    pub rows: Vec<ComparisonRow>,
}

/// Compare 1 to [`MAX_COMPARED`] schools.
///
/// Schools repeated by code are compared once, at their first position.
pub fn compare<'a>(
    selection: impl IntoIterator<Item = &'a School>,
) -> Result<Comparison<'a>, CompareError> {
    let mut schools: Vec<&School> = Vec::new();
    for school in selection {
        if !schools.iter().any(|s| s.code == school.code) {
            schools.push(school);
        }
    }

    if schools.is_empty() {
        return Err(CompareError::Empty);
    }
    if schools.len() > MAX_COMPARED {
        return Err(CompareError::TooMany(schools.len()));
    }

    let rows = CRITERIA
        .iter()
        .map(|criterion| ComparisonRow {
            key: criterion.key,
            label: criterion.label,
            numeric: criterion.is_numeric(),
            values: schools.iter().map(|s| criterion.display(s)).collect(),
            measures: criterion
                .is_numeric()
                .then(|| schools.iter().filter_map(|s| criterion.measure(s)).collect()),
        })
        .collect();

    Ok(Comparison { schools, rows })
}

// ============================================================================
// number helpers
// ============================================================================

/// Integer prefix of `s` (like `parseInt`), 0 when there is none.
fn leading_int(s: &str) -> i64 {
    let s = s.trim();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().map_or(0, |n| sign * n)
}

/// Float prefix of `s` (like `parseFloat`), 0 when there is none.
fn leading_float(s: &str) -> f64 {
    let s = s.trim();
    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in s.char_indices() {
        match c {
            '-' | '+' if i == 0 => {}
            '.' if !seen_dot => seen_dot = true,
            c if c.is_ascii_digit() => {}
            _ => break,
        }
        end = i + c.len_utf8();
    }
    s[..end].parse().unwrap_or(0.0)
}

/// `1234567` → `"1,234,567"`.
fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn school(code: &str, enrolment: &str, icsea: &str, lbote: &str) -> School {
        School {
            name: format!("School {code}"),
            code: code.into(),
            enrolment_fte: enrolment.into(),
            icsea: icsea.into(),
            lbote_pct: lbote.into(),
            level: "Primary School".into(),
            ..School::default()
        }
    }

    fn row<'c>(comparison: &'c Comparison<'_>, key: &str) -> &'c ComparisonRow {
        comparison.rows.iter().find(|r| r.key == key).unwrap()
    }

    #[test]
    fn test_leading_int() {
        assert_eq!(leading_int("1234.5"), 1234);
        assert_eq!(leading_int(" 42 students"), 42);
        assert_eq!(leading_int("-7"), -7);
        assert_eq!(leading_int("abc"), 0);
        assert_eq!(leading_int(""), 0);
    }

    #[test]
    fn test_leading_float() {
        assert_eq!(leading_float("12.5"), 12.5);
        assert_eq!(leading_float("3.25%"), 3.25);
        assert_eq!(leading_float("-0.5"), -0.5);
        assert_eq!(leading_float("1.2.3"), 1.2);
        assert_eq!(leading_float("n/a"), 0.0);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1234), "1,234");
        assert_eq!(group_thousands(1234567), "1,234,567");
        assert_eq!(group_thousands(-1000), "-1,000");
    }

    #[test]
    fn test_criterion_display() {
        let s = school("1", "1234.5", "1045", "12.3");
        assert_eq!(CRITERIA[0].display(&s), "1,234");
        assert_eq!(CRITERIA[1].display(&s), "1045");
        assert_eq!(CRITERIA[2].display(&s), "12.3%");
        assert_eq!(CRITERIA[3].display(&s), "N/A");
        assert_eq!(CRITERIA[4].display(&s), "Primary School");
        assert_eq!(CRITERIA[5].display(&s), "N/A");
    }

    #[test]
    fn test_criterion_measure() {
        let s = school("1", "1234.5", "", "12.3");
        assert_eq!(CRITERIA[0].measure(&s), Some(1234.0));
        assert_eq!(CRITERIA[1].measure(&s), Some(0.0));
        assert_eq!(CRITERIA[2].measure(&s), Some(12.3));
        assert_eq!(CRITERIA[4].measure(&s), None);
    }

    #[test]
    fn test_compare_rows() {
        let a = school("1", "500", "1000", "10");
        let b = school("2", "2500", "1100", "");
        let comparison = compare([&a, &b]).unwrap();

        assert_eq!(comparison.schools.len(), 2);
        assert_eq!(comparison.rows.len(), CRITERIA.len());

        let enrolment = row(&comparison, "latest_year_enrolment_FTE");
        assert_eq!(enrolment.values, ["500", "2,500"]);
        assert_eq!(enrolment.measures.as_deref(), Some(&[500.0, 2500.0][..]));

        let lbote = row(&comparison, "LBOTE_pct");
        assert_eq!(lbote.values, ["10%", "N/A"]);

        let level = row(&comparison, "Level_of_schooling");
        assert!(!level.numeric);
        assert!(level.measures.is_none());
    }

    #[test]
    fn test_compare_dedups_by_code() {
        let a = school("1", "500", "1000", "10");
        let b = school("2", "600", "1000", "10");
        let comparison = compare([&a, &b, &a]).unwrap();
        assert_eq!(comparison.schools, [&a, &b]);
    }

    #[test]
    fn test_compare_limits() {
        assert_eq!(compare(Vec::<&School>::new()).unwrap_err(), CompareError::Empty);

        let schools: Vec<_> = (0..6).map(|i| school(&i.to_string(), "", "", "")).collect();
        assert_eq!(compare(&schools).unwrap_err(), CompareError::TooMany(6));
        assert!(compare(&schools[..5]).is_ok());
    }
}
