//! # Dataset Loading
//!
//! Turns the fetched source text into the immutable [`Dataset`] every
//! session reads from.
//!
//! ## Load Sequence
//!
//! 1. Parse the delimited text with its header row (a UTF-8 BOM is tolerated).
//! 2. Resolve the named columns; region, title, category, issuer and period
//!    are required.
//! 3. Parse each period as `MM/YYYY`.
//! 4. Sort descending by parsed month. The sort is stable and rows whose
//!    period does not parse go last.
//! 5. Drop the noise columns (serial number, news link, remarks) from the
//!    retained cells and assign [`RecordId`]s in sorted order.
//! 6. Derive the region, category and year choice lists.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::DatasetError;
use crate::i18n::ColumnNames;
use crate::record::{Period, Record, RecordId};

/// The full, sorted, read-only record set.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    headers: Vec<String>,
    records: Vec<Record>,
    regions: Vec<String>,
    categories: Vec<String>,
    years: Vec<String>,
}

/// Column positions resolved against the header row.
struct Layout {
    region: usize,
    title: usize,
    category: usize,
    issuer: usize,
    period: usize,
    keywords: Option<usize>,
    detail_url: Option<usize>,
    description: Option<usize>,
    retained: Vec<usize>,
}

impl Layout {
    fn resolve(headers: &[String], names: &ColumnNames) -> Result<Self, DatasetError> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let require =
            |name: &str| find(name).ok_or_else(|| DatasetError::MissingColumn(name.to_string()));

        let retained = (0..headers.len())
            .filter(|&i| !names.dropped.iter().any(|d| d == &headers[i]))
            .collect();

        Ok(Self {
            region: require(&names.region)?,
            title: require(&names.title)?,
            category: require(&names.category)?,
            issuer: require(&names.issuer)?,
            period: require(&names.period)?,
            keywords: find(&names.keywords),
            detail_url: find(&names.detail_url),
            description: find(&names.description),
            retained,
        })
    }
}

/// Empty cells are nulls.
fn cell(row: &StringRecord, index: usize) -> Option<String> {
    row.get(index)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Like [`cell`], but trimmed. Used for fields offered back as exact-match
/// dropdown values.
fn field(row: &StringRecord, index: usize) -> Option<String> {
    row.get(index)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Descending by month, unparsed months last.
fn newest_first(a: &Period, b: &Period) -> Ordering {
    match (a.month(), b.month()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl Dataset {
    /// Parse, sort and index the source text.
    pub fn from_csv(text: &str, names: &ColumnNames) -> Result<Self, DatasetError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::Headers)
            .from_reader(text.as_bytes());

        let all_headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let layout = Layout::resolve(&all_headers, names)?;

        let mut rows = Vec::new();
        for row in reader.records() {
            let row = row?;
            rows.push(Record {
                id: RecordId(0),
                region: cell(&row, layout.region),
                title: field(&row, layout.title).unwrap_or_default(),
                category: field(&row, layout.category),
                issuer: field(&row, layout.issuer),
                period: Period::parse(row.get(layout.period).unwrap_or_default()),
                keywords: layout.keywords.and_then(|i| cell(&row, i)),
                detail_url: layout.detail_url.and_then(|i| cell(&row, i)),
                description: layout.description.and_then(|i| cell(&row, i)),
                cells: layout.retained.iter().map(|&i| cell(&row, i)).collect(),
            });
        }

        rows.sort_by(|a, b| newest_first(&a.period, &b.period));
        for (index, record) in rows.iter_mut().enumerate() {
            record.id = RecordId(index as u32);
        }

        let headers = layout
            .retained
            .iter()
            .map(|&i| all_headers[i].clone())
            .collect();

        Ok(Self::index(headers, rows))
    }

    fn index(headers: Vec<String>, records: Vec<Record>) -> Self {
        let regions: BTreeSet<&str> = records.iter().flat_map(Record::region_tags).collect();
        let categories: BTreeSet<&str> =
            records.iter().filter_map(|r| r.category.as_deref()).collect();
        let years: BTreeSet<String> = records
            .iter()
            .filter_map(|r| r.period.year_label())
            .collect();

        Self {
            regions: regions.into_iter().map(str::to_string).collect(),
            categories: categories.into_iter().map(str::to_string).collect(),
            years: years.into_iter().rev().collect(),
            headers,
            records,
        }
    }

    /// Retained column names, in source order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// All records, newest first.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record in the full dataset.
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.get(id.index())
    }

    /// Distinct region names, sorted.
    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    /// Distinct categories, sorted.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Distinct years, newest first.
    pub fn years(&self) -> &[String] {
        &self.years
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{apply, Choice, FilterSelection};

    const SOURCE: &str = "\u{feff}序号,经济体,政策动态,政策类型,发布主体,时间,关键词,新闻链接,原文链接,政策内容,备注\n\
1,China；Japan,Old rule,Tariff,Ministry A,01/2022,trade,http://news/1,http://src/1,Long text,x\n\
2,Korea,Newest rule,Subsidy,Ministry B,11/2024,,http://news/2,,,\n\
3,China,Undated rule,Tariff,Beijing Municipal Bureau,sometime,,,,,\n\
4, Japan ; Korea ,Middle rule,Export control,Ministry C,6/2023,chips,,http://src/4,,\n";

    fn load() -> Dataset {
        Dataset::from_csv(SOURCE, &ColumnNames::default()).unwrap()
    }

    #[test]
    fn sorts_newest_first_with_unparsed_last() {
        let ds = load();
        let titles: Vec<_> = ds.records().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Newest rule", "Middle rule", "Old rule", "Undated rule"]
        );
    }

    #[test]
    fn padded_category_matches_its_form_value() {
        let text = "经济体,政策动态,政策类型,发布主体,时间\n\
China, Padded rule ,Tariff , Ministry ,01/2024\n\
Korea,Other,Subsidy,M,02/2024\n";
        let ds = Dataset::from_csv(text, &ColumnNames::default()).unwrap();
        assert_eq!(ds.categories(), ["Subsidy", "Tariff"]);
        let record = &ds.records()[1];
        assert_eq!(record.title, "Padded rule");
        assert_eq!(record.issuer.as_deref(), Some("Ministry"));

        let offered = Choice::from_form(ds.categories()[1].as_str());
        let selection = FilterSelection {
            category: offered,
            ..FilterSelection::default()
        };
        assert_eq!(apply(&ds, &selection), vec![record.id]);
    }

    #[test]
    fn ids_follow_sorted_position() {
        let ds = load();
        for (i, r) in ds.records().iter().enumerate() {
            assert_eq!(r.id, RecordId(i as u32));
            assert_eq!(ds.get(r.id).unwrap().title, r.title);
        }
        assert!(ds.get(RecordId(99)).is_none());
    }

    #[test]
    fn drops_noise_columns() {
        let ds = load();
        assert_eq!(
            ds.headers(),
            ["经济体", "政策动态", "政策类型", "发布主体", "时间", "关键词", "原文链接", "政策内容"]
        );
        assert!(ds.records().iter().all(|r| r.cells.len() == 8));
    }

    #[test]
    fn empty_cells_are_null() {
        let ds = load();
        let newest = &ds.records()[0];
        assert_eq!(newest.keywords, None);
        assert_eq!(newest.detail_url, None);
        assert_eq!(newest.description, None);
        assert_eq!(newest.cells[5], None);
    }

    #[test]
    fn optional_fields_are_read() {
        let ds = load();
        let old = ds.records().iter().find(|r| r.title == "Old rule").unwrap();
        assert_eq!(old.keywords.as_deref(), Some("trade"));
        assert_eq!(old.detail_url.as_deref(), Some("http://src/1"));
        assert_eq!(old.description.as_deref(), Some("Long text"));
    }

    #[test]
    fn region_vocabulary_is_split_trimmed_and_deduplicated() {
        let ds = load();
        assert_eq!(ds.regions(), ["China", "Japan", "Korea"]);
    }

    #[test]
    fn category_and_year_choices() {
        let ds = load();
        assert_eq!(ds.categories(), ["Export control", "Subsidy", "Tariff"]);
        assert_eq!(ds.years(), ["2024", "2023", "2022"]);
    }

    #[test]
    fn missing_required_column_is_reported() {
        let err = Dataset::from_csv("经济体,政策动态\nA,B\n", &ColumnNames::default()).unwrap_err();
        match err {
            DatasetError::MissingColumn(name) => assert_eq!(name, "政策类型"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn optional_columns_may_be_absent() {
        let ds = Dataset::from_csv(
            "经济体,政策动态,政策类型,发布主体,时间\nChina,T,C,I,02/2020\n",
            &ColumnNames::default(),
        )
        .unwrap();
        assert_eq!(ds.len(), 1);
        assert!(ds.records()[0].keywords.is_none());
    }

    #[test]
    fn empty_body_gives_empty_dataset() {
        let ds = Dataset::from_csv(
            "经济体,政策动态,政策类型,发布主体,时间\n",
            &ColumnNames::default(),
        )
        .unwrap();
        assert!(ds.is_empty());
        assert!(ds.regions().is_empty());
    }
}
