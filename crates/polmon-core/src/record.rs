//! # Policy Records
//!
//! A [`Record`] is one row of the source file after loading. Records are
//! addressed by a synthetic [`RecordId`] assigned at load time. Titles are
//! not unique in the source data, so they are never used as keys.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Characters separating multiple region names inside one region cell.
///
/// The source data uses the full-width semicolon; the ASCII one shows up in
/// hand-edited rows.
pub const REGION_DELIMITERS: &[char] = &['；', ';'];

/// Stable identifier of a record within one loaded dataset.
///
/// Equal to the record's position in the sorted dataset, so it stays valid
/// for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u32);

impl RecordId {
    /// Position of the record in the dataset.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// The month a policy was issued, kept both as the raw `MM/YYYY` text and
/// as a parsed first-of-month date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    raw: String,
    month: Option<NaiveDate>,
}

impl Period {
    /// Parse `MM/YYYY` (one- or two-digit month). Anything else is kept as
    /// raw text with no parsed month.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim().to_string();
        let month = parse_month_year(&raw);
        Self { raw, month }
    }

    /// The text exactly as it appeared in the source (trimmed).
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// First day of the parsed month, if the text parsed.
    pub fn month(&self) -> Option<NaiveDate> {
        self.month
    }

    /// `YYYY-MM` for parsed periods, the raw text otherwise.
    pub fn display(&self) -> String {
        match self.month {
            Some(date) => date.format("%Y-%m").to_string(),
            None => self.raw.clone(),
        }
    }

    /// Year used by the year filter.
    ///
    /// Parsed periods yield their four-digit year. Unparsed text falls back
    /// to the characters at positions 3..7, where the year sits in
    /// `MM/YYYY`, when those are four digits.
    pub fn year_label(&self) -> Option<String> {
        if let Some(date) = self.month {
            return Some(format!("{:04}", date.year()));
        }
        let slice: String = self.raw.chars().skip(3).take(4).collect();
        (slice.len() == 4 && slice.chars().all(|c| c.is_ascii_digit())).then_some(slice)
    }
}

fn parse_month_year(raw: &str) -> Option<NaiveDate> {
    let (month, year) = raw.split_once('/')?;
    let month: u32 = month.trim().parse().ok()?;
    let year = year.trim();
    if year.len() != 4 {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// One policy entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    /// Region tag(s), possibly several joined by [`REGION_DELIMITERS`].
    pub region: Option<String>,
    /// Policy title / summary line. Empty when the source cell is empty.
    pub title: String,
    pub category: Option<String>,
    pub issuer: Option<String>,
    pub period: Period,
    pub keywords: Option<String>,
    pub detail_url: Option<String>,
    pub description: Option<String>,
    /// Every retained cell in header order, for export and keyword search.
    pub cells: Vec<Option<String>>,
}

impl Record {
    /// Individual region names, trimmed, empties skipped.
    pub fn region_tags(&self) -> impl Iterator<Item = &str> {
        self.region
            .as_deref()
            .unwrap_or_default()
            .split(REGION_DELIMITERS)
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
    }

    /// Whether any retained cell contains `needle`, ignoring case.
    ///
    /// `needle` must already be lower-cased.
    pub fn contains_text(&self, needle: &str) -> bool {
        self.cells
            .iter()
            .flatten()
            .any(|cell| cell.to_lowercase().contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_parses_two_digit_month() {
        let p = Period::parse("03/2024");
        assert_eq!(p.month(), NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(p.display(), "2024-03");
        assert_eq!(p.year_label().as_deref(), Some("2024"));
    }

    #[test]
    fn period_parses_single_digit_month() {
        let p = Period::parse(" 7/2023 ");
        assert_eq!(p.raw(), "7/2023");
        assert_eq!(p.display(), "2023-07");
        assert_eq!(p.year_label().as_deref(), Some("2023"));
    }

    #[test]
    fn period_rejects_bad_month() {
        let p = Period::parse("13/2024");
        assert!(p.month().is_none());
        assert_eq!(p.display(), "13/2024");
        assert_eq!(p.year_label().as_deref(), Some("2024"));
    }

    #[test]
    fn period_rejects_free_text() {
        let p = Period::parse("unknown");
        assert!(p.month().is_none());
        assert_eq!(p.display(), "unknown");
        assert!(p.year_label().is_none());
    }

    #[test]
    fn empty_period_has_no_year() {
        let p = Period::parse("");
        assert!(p.month().is_none());
        assert!(p.year_label().is_none());
    }

    #[test]
    fn record_id_round_trips_through_text() {
        let id: RecordId = "42".parse().unwrap();
        assert_eq!(id, RecordId(42));
        assert_eq!(id.to_string(), "42");
        assert!("x".parse::<RecordId>().is_err());
    }

    fn record(region: Option<&str>, cells: &[&str]) -> Record {
        Record {
            id: RecordId(0),
            region: region.map(str::to_string),
            title: String::new(),
            category: None,
            issuer: None,
            period: Period::parse(""),
            keywords: None,
            detail_url: None,
            description: None,
            cells: cells.iter().map(|c| Some(c.to_string())).collect(),
        }
    }

    #[test]
    fn region_tags_split_on_both_semicolons() {
        let r = record(Some("China； Japan;Korea ；"), &[]);
        let tags: Vec<_> = r.region_tags().collect();
        assert_eq!(tags, vec!["China", "Japan", "Korea"]);
    }

    #[test]
    fn region_tags_empty_without_region() {
        let r = record(None, &[]);
        assert_eq!(r.region_tags().count(), 0);
    }

    #[test]
    fn contains_text_is_case_insensitive_on_cells() {
        let r = record(None, &["Beijing Municipal Bureau", "Notice"]);
        assert!(r.contains_text("beijing"));
        assert!(r.contains_text("notice"));
        assert!(!r.contains_text("shanghai"));
    }
}
