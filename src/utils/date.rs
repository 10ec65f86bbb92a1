//! Naive datetime parsing for the dataset's `Date_extracted` stamps.
//!
//! The dataset writes local Sydney time without an offset, e.g.
//! `2025-06-30 06:55:00`. Values are shown as written; no timezone
//! conversion happens, only the matching `AEST`/`AEDT` label is added.
//!
//! ```ignore
//! let dt = DateTime::parse("2025-06-30 06:55:00").unwrap();
//! assert_eq!(dt.to_display(), "30 June 2025, 6:55 am AEST");
//! ```

use anyhow::{Result, bail};

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTime {
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Parse `YYYY-MM-DD`, optionally followed by ` HH:MM[:SS]` or
    /// `THH:MM[:SS]`. Anything after the seconds (fractions, `Z`) is ignored.
    pub fn parse(s: &str) -> Option<Self> {
        let bytes = s.trim().as_bytes();

        // Minimum: "YYYY-MM-DD" (10 chars)
        if bytes.len() < 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return None;
        }
        let year = parse_u16(&bytes[0..4])?;
        let month = parse_u8(&bytes[5..7])?;
        let day = parse_u8(&bytes[8..10])?;

        let (hour, minute, second) = match bytes.get(10) {
            None => (0, 0, 0),
            Some(b' ' | b'T') if bytes.len() >= 16 && bytes[13] == b':' => {
                let second = if bytes.len() >= 19 && bytes[16] == b':' {
                    parse_u8(&bytes[17..19])?
                } else {
                    0
                };
                (parse_u8(&bytes[11..13])?, parse_u8(&bytes[14..16])?, second)
            }
            Some(_) => return None,
        };

        let dt = Self::new(year, month, day, hour, minute, second);
        dt.validate().ok()?;
        Some(dt)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=12).contains(&self.month) {
            bail!("month is invalid: {}", self.month);
        }
        let max_days = days_in_month(self.year, self.month);
        if self.day == 0 || self.day > max_days {
            bail!("day is invalid: {}", self.day);
        }
        if self.hour > 23 {
            bail!("hour is invalid: {}", self.hour);
        }
        if self.minute > 59 {
            bail!("minute is invalid: {}", self.minute);
        }
        if self.second > 59 {
            bail!("second is invalid: {}", self.second);
        }
        Ok(())
    }

    /// Sydney zone abbreviation for this wall-clock time.
    ///
    /// Daylight time runs from 2:00 on the first Sunday of October to 3:00
    /// on the first Sunday of April (rules in force since 2008).
    pub const fn sydney_zone(self) -> &'static str {
        let daylight = match self.month {
            11 | 12 | 1 | 2 | 3 => true,
            10 => {
                let start = first_sunday(self.year, 10);
                self.day > start || (self.day == start && self.hour >= 2)
            }
            4 => {
                let end = first_sunday(self.year, 4);
                self.day < end || (self.day == end && self.hour < 3)
            }
            _ => false,
        };
        if daylight { "AEDT" } else { "AEST" }
    }

    /// `D Month YYYY, h:mm am/pm AEST`
    pub fn to_display(self) -> String {
        let (hour12, meridiem) = match self.hour {
            0 => (12, "am"),
            h @ 1..=11 => (h, "am"),
            12 => (12, "pm"),
            h => (h - 12, "pm"),
        };
        format!(
            "{} {} {}, {}:{:02} {} {}",
            self.day,
            MONTHS[usize::from(self.month - 1)],
            self.year,
            hour12,
            self.minute,
            meridiem,
            self.sydney_zone()
        )
    }
}

#[allow(clippy::manual_is_multiple_of)]
const fn is_leap_year(year: u16) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

const fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Day of the week, `0` = Sunday (Sakamoto's method).
const fn weekday(year: u16, month: u8, day: u8) -> u8 {
    const OFFSETS: [u32; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];
    let y = (if month < 3 { year.saturating_sub(1) } else { year }) as u32;
    ((y + y / 4 - y / 100 + y / 400 + OFFSETS[(month - 1) as usize] + day as u32) % 7) as u8
}

const fn first_sunday(year: u16, month: u8) -> u8 {
    1 + (7 - weekday(year, month, 1)) % 7
}

/// Parse 2-digit ASCII number
#[inline]
fn parse_u8(bytes: &[u8]) -> Option<u8> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = bytes[0].wrapping_sub(b'0');
    let d2 = bytes[1].wrapping_sub(b'0');
    if d1 > 9 || d2 > 9 {
        return None;
    }
    Some(d1 * 10 + d2)
}

/// Parse 4-digit ASCII number
#[inline]
fn parse_u16(bytes: &[u8]) -> Option<u16> {
    if bytes.len() != 4 {
        return None;
    }
    let mut result = 0u16;
    for &b in bytes {
        let d = b.wrapping_sub(b'0');
        if d > 9 {
            return None;
        }
        result = result * 10 + u16::from(d);
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dataset_stamp() {
        let dt = DateTime::parse("2025-06-30 06:55:00").unwrap();
        assert_eq!(dt, DateTime::new(2025, 6, 30, 6, 55, 0));
    }

    #[test]
    fn test_parse_variants() {
        assert_eq!(
            DateTime::parse("2024-06-15"),
            Some(DateTime::new(2024, 6, 15, 0, 0, 0))
        );
        assert_eq!(
            DateTime::parse("2024-06-15T14:30:45Z"),
            Some(DateTime::new(2024, 6, 15, 14, 30, 45))
        );
        assert_eq!(
            DateTime::parse("2024-06-15 14:30"),
            Some(DateTime::new(2024, 6, 15, 14, 30, 0))
        );
        assert_eq!(
            DateTime::parse("2024-06-15T14:30:45.123"),
            Some(DateTime::new(2024, 6, 15, 14, 30, 45))
        );
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(DateTime::parse(""), None);
        assert_eq!(DateTime::parse("30/06/2025"), None);
        assert_eq!(DateTime::parse("2025-13-01"), None);
        assert_eq!(DateTime::parse("2023-02-29"), None);
        assert_eq!(DateTime::parse("2024-06-15 25:00:00"), None);
        assert_eq!(DateTime::parse("2024-06-15x"), None);
    }

    #[test]
    fn test_validate_leap_year() {
        assert!(DateTime::new(2024, 2, 29, 12, 0, 0).validate().is_ok());
        assert!(DateTime::new(2000, 2, 29, 12, 0, 0).validate().is_ok());
        assert!(DateTime::new(1900, 2, 29, 12, 0, 0).validate().is_err());
    }

    #[test]
    fn test_to_display() {
        assert_eq!(
            DateTime::new(2025, 6, 30, 6, 55, 0).to_display(),
            "30 June 2025, 6:55 am AEST"
        );
        assert_eq!(
            DateTime::new(2025, 1, 2, 0, 5, 0).to_display(),
            "2 January 2025, 12:05 am AEDT"
        );
        assert_eq!(
            DateTime::new(2025, 12, 31, 12, 0, 0).to_display(),
            "31 December 2025, 12:00 pm AEDT"
        );
        assert_eq!(
            DateTime::new(2025, 12, 31, 23, 59, 0).to_display(),
            "31 December 2025, 11:59 pm AEDT"
        );
    }

    #[test]
    fn test_weekday() {
        assert_eq!(weekday(2025, 6, 30), 1);
        assert_eq!(weekday(2025, 10, 1), 3);
        assert_eq!(weekday(2024, 2, 29), 4);
        assert_eq!(first_sunday(2025, 10), 5);
        assert_eq!(first_sunday(2025, 4), 6);
        assert_eq!(first_sunday(2024, 9), 1);
    }

    #[test]
    fn test_sydney_zone_transitions() {
        let zone = |month, day, hour| DateTime::new(2025, month, day, hour, 0, 0).sydney_zone();
        assert_eq!(zone(7, 15, 12), "AEST");
        assert_eq!(zone(1, 15, 12), "AEDT");
        assert_eq!(zone(10, 5, 1), "AEST");
        assert_eq!(zone(10, 5, 2), "AEDT");
        assert_eq!(zone(10, 4, 23), "AEST");
        assert_eq!(zone(4, 6, 2), "AEDT");
        assert_eq!(zone(4, 6, 3), "AEST");
        assert_eq!(zone(4, 5, 23), "AEDT");
    }
}
