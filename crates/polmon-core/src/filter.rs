//! # Filter Engine
//!
//! A pure function from a [`Dataset`] and a [`FilterSelection`] to the ids
//! of the matching records. Predicates combine with logical AND.
//!
//! | Field    | Match rule                                                   |
//! |----------|--------------------------------------------------------------|
//! | region   | substring of the (possibly multi-valued) region field        |
//! | category | exact equality                                               |
//! | year     | exact equality with the record's year label                  |
//! | keyword  | case-insensitive literal substring of ANY retained cell      |

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::record::{Record, RecordId};

/// Form value of the match-everything option.
pub const ALL: &str = "all";

/// One dropdown selection: everything, or one concrete value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Choice {
    #[default]
    All,
    Only(String),
}

impl Choice {
    /// Read a form value. Empty input and [`ALL`] select everything.
    pub fn from_form(value: &str) -> Self {
        match value.trim() {
            "" | ALL => Self::All,
            other => Self::Only(other.to_string()),
        }
    }

    /// The value to put back into a form field.
    pub fn form_value(&self) -> &str {
        match self {
            Self::All => ALL,
            Self::Only(value) => value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Whether `candidate` is the selected value (never true for `All`).
    pub fn selects(&self, candidate: &str) -> bool {
        matches!(self, Self::Only(value) if value == candidate)
    }
}

/// Current filter inputs of one session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterSelection {
    pub region: Choice,
    pub category: Choice,
    pub year: Choice,
    /// Free text; empty or whitespace-only means no keyword filter.
    pub keyword: String,
}

impl FilterSelection {
    /// The keyword as it is matched: trimmed and lower-cased, `None` when blank.
    pub fn normalized_keyword(&self) -> Option<String> {
        let keyword = self.keyword.trim().to_lowercase();
        (!keyword.is_empty()).then_some(keyword)
    }

    /// Whether no predicate is active.
    pub fn is_empty(&self) -> bool {
        self.region.is_all()
            && self.category.is_all()
            && self.year.is_all()
            && self.normalized_keyword().is_none()
    }

    /// Whether `record` satisfies every active predicate.
    pub fn matches(&self, record: &Record) -> bool {
        self.matches_with(record, self.normalized_keyword().as_deref())
    }

    fn matches_with(&self, record: &Record, keyword: Option<&str>) -> bool {
        if let Choice::Only(region) = &self.region {
            match &record.region {
                Some(tags) if tags.contains(region.as_str()) => {}
                _ => return false,
            }
        }
        if let Choice::Only(category) = &self.category {
            if record.category.as_deref() != Some(category.as_str()) {
                return false;
            }
        }
        if let Choice::Only(year) = &self.year {
            if record.period.year_label().as_deref() != Some(year.as_str()) {
                return false;
            }
        }
        if let Some(keyword) = keyword {
            if !record.contains_text(keyword) {
                return false;
            }
        }
        true
    }
}

/// Ids of all records matching `selection`, in dataset order.
pub fn apply(dataset: &Dataset, selection: &FilterSelection) -> Vec<RecordId> {
    let keyword = selection.normalized_keyword();
    dataset
        .records()
        .iter()
        .filter(|record| selection.matches_with(record, keyword.as_deref()))
        .map(|record| record.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::ColumnNames;

    const SOURCE: &str = "经济体,政策动态,政策类型,发布主体,时间\n\
China；Japan,Joint statement,Tariff,Ministry of Commerce,03/2024\n\
Korea,Chip subsidy,Subsidy,MOTIE,02/2024\n\
China,City notice,Tariff,Beijing Municipal Bureau,12/2023\n\
,Untagged rule,Other,Agency,01/2023\n";

    fn dataset() -> Dataset {
        Dataset::from_csv(SOURCE, &ColumnNames::default()).unwrap()
    }

    fn titles(ds: &Dataset, ids: &[RecordId]) -> Vec<String> {
        ids.iter()
            .map(|id| ds.get(*id).unwrap().title.clone())
            .collect()
    }

    #[test]
    fn empty_selection_matches_everything() {
        let ds = dataset();
        let selection = FilterSelection::default();
        assert!(selection.is_empty());
        assert_eq!(apply(&ds, &selection).len(), ds.len());
    }

    #[test]
    fn region_matches_multi_valued_field() {
        let ds = dataset();
        let selection = FilterSelection {
            region: Choice::Only("Japan".into()),
            ..Default::default()
        };
        assert_eq!(titles(&ds, &apply(&ds, &selection)), vec!["Joint statement"]);
    }

    #[test]
    fn region_is_substring_not_equality() {
        let ds = dataset();
        let selection = FilterSelection {
            region: Choice::Only("China".into()),
            ..Default::default()
        };
        assert_eq!(
            titles(&ds, &apply(&ds, &selection)),
            vec!["Joint statement", "City notice"]
        );
    }

    #[test]
    fn records_without_region_never_match_a_region() {
        let ds = dataset();
        let selection = FilterSelection {
            region: Choice::Only("".into()),
            ..Default::default()
        };
        // An empty concrete value is only reachable programmatically.
        assert!(!titles(&ds, &apply(&ds, &selection)).contains(&"Untagged rule".to_string()));
    }

    #[test]
    fn category_is_exact() {
        let ds = dataset();
        let selection = FilterSelection {
            category: Choice::Only("Tariff".into()),
            ..Default::default()
        };
        assert_eq!(apply(&ds, &selection).len(), 2);
        let selection = FilterSelection {
            category: Choice::Only("Tarif".into()),
            ..Default::default()
        };
        assert!(apply(&ds, &selection).is_empty());
    }

    #[test]
    fn year_is_exact() {
        let ds = dataset();
        let selection = FilterSelection {
            year: Choice::Only("2024".into()),
            ..Default::default()
        };
        assert_eq!(
            titles(&ds, &apply(&ds, &selection)),
            vec!["Joint statement", "Chip subsidy"]
        );
    }

    #[test]
    fn keyword_is_case_insensitive() {
        let ds = dataset();
        for keyword in ["beijing", "BEIJING", "  Beijing  "] {
            let selection = FilterSelection {
                keyword: keyword.into(),
                ..Default::default()
            };
            assert_eq!(titles(&ds, &apply(&ds, &selection)), vec!["City notice"]);
        }
    }

    #[test]
    fn keyword_is_literal_not_a_pattern() {
        let ds = dataset();
        let selection = FilterSelection {
            keyword: "c.ip".into(),
            ..Default::default()
        };
        assert!(apply(&ds, &selection).is_empty());
    }

    #[test]
    fn blank_keyword_is_no_filter() {
        let ds = dataset();
        let selection = FilterSelection {
            keyword: "   ".into(),
            ..Default::default()
        };
        assert!(selection.is_empty());
        assert_eq!(apply(&ds, &selection).len(), ds.len());
    }

    #[test]
    fn predicates_combine_with_and() {
        let ds = dataset();
        let selection = FilterSelection {
            region: Choice::Only("China".into()),
            year: Choice::Only("2023".into()),
            keyword: "notice".into(),
            ..Default::default()
        };
        assert_eq!(titles(&ds, &apply(&ds, &selection)), vec!["City notice"]);
    }

    #[test]
    fn choice_reads_form_values() {
        assert_eq!(Choice::from_form("all"), Choice::All);
        assert_eq!(Choice::from_form(""), Choice::All);
        assert_eq!(Choice::from_form(" Japan "), Choice::Only("Japan".into()));
        assert_eq!(Choice::Only("Japan".into()).form_value(), "Japan");
        assert_eq!(Choice::All.form_value(), ALL);
        assert!(Choice::Only("x".into()).selects("x"));
        assert!(!Choice::All.selects("x"));
    }
}
