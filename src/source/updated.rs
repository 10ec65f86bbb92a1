//! "Last updated" text for the dataset.

use crate::school::School;
use crate::utils::date::DateTime;

/// `Date_extracted` of the first record as `D Month YYYY, h:mm am/pm`
/// followed by the Sydney zone, `AEST` or `AEDT`.
///
/// Unparsable stamps are returned as written; an empty dataset or a blank
/// stamp gives an empty string.
pub fn last_updated(schools: &[School]) -> String {
    let Some(stamp) = schools
        .first()
        .map(|s| s.date_extracted.trim())
        .filter(|s| !s.is_empty())
    else {
        return String::new();
    };
    DateTime::parse(stamp).map_or_else(|| stamp.to_string(), DateTime::to_display)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extracted(stamp: &str) -> School {
        School {
            date_extracted: stamp.into(),
            ..School::default()
        }
    }

    #[test]
    fn test_last_updated_formats_first_record() {
        let schools = [extracted("2025-06-30 06:55:00"), extracted("1999-01-01")];
        assert_eq!(last_updated(&schools), "30 June 2025, 6:55 am AEST");
    }

    #[test]
    fn test_last_updated_daylight_time() {
        let schools = [extracted("2025-01-15 09:30:00")];
        assert_eq!(last_updated(&schools), "15 January 2025, 9:30 am AEDT");
    }

    #[test]
    fn test_last_updated_fallbacks() {
        assert_eq!(last_updated(&[]), "");
        assert_eq!(last_updated(&[extracted("  ")]), "");
        assert_eq!(last_updated(&[extracted("last Tuesday")]), "last Tuesday");
    }
}
