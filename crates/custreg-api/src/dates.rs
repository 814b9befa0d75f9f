//! Birth-date wire format.
//!
//! Dates are written as `DD/MM/YYYY`. On input both ISO `YYYY-MM-DD` and
//! `DD/MM/YYYY` are accepted.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serializer};

/// Output format for `born`.
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y";

const INPUT_FORMATS: [&str; 2] = ["%Y-%m-%d", DISPLAY_FORMAT];

/// Parse a birth date in any accepted input format.
pub fn parse_born(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Render a birth date for responses.
pub fn format_born(date: &NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

/// `#[serde(with = "crate::dates::born")]` adapter.
pub mod born {
    use super::*;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_born(date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_born(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid date \"{raw}\": expected YYYY-MM-DD or DD/MM/YYYY"
            ))
        })
    }
}
