//! # Derived Filtered View
//!
//! [`FilteredCalc`] caches the filter result for one session and recomputes
//! it when the selection changes. A recompute returns the declared
//! [`SideEffect`]s the owner must apply, which makes the page-reset
//! coupling explicit instead of hiding it inside the recompute.

use crate::dataset::Dataset;
use crate::filter::{self, FilterSelection};
use crate::record::RecordId;

/// An effect the owner of a [`FilteredCalc`] must apply after a recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffect {
    /// Move the page cursor back to page 1.
    ResetPage,
}

/// Effects declared by every recompute.
const ON_RECOMPUTE: &[SideEffect] = &[SideEffect::ResetPage];

/// Filter selection plus its cached result.
#[derive(Debug, Clone)]
pub struct FilteredCalc {
    selection: FilterSelection,
    rows: Vec<RecordId>,
}

impl FilteredCalc {
    /// Start from the match-everything selection.
    pub fn new(dataset: &Dataset) -> Self {
        let selection = FilterSelection::default();
        let rows = filter::apply(dataset, &selection);
        Self { selection, rows }
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    /// Ids of the filtered view, in dataset order.
    pub fn rows(&self) -> &[RecordId] {
        &self.rows
    }

    /// Replace the selection.
    ///
    /// Returns the effects to apply: [`SideEffect::ResetPage`] when the
    /// selection changed, nothing when it is identical.
    pub fn update(&mut self, dataset: &Dataset, selection: FilterSelection) -> &'static [SideEffect] {
        if selection == self.selection {
            return &[];
        }
        self.rows = filter::apply(dataset, &selection);
        self.selection = selection;
        tracing::debug!(rows = self.rows.len(), "filtered view recomputed");
        ON_RECOMPUTE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Choice;
    use crate::i18n::ColumnNames;

    fn dataset() -> Dataset {
        Dataset::from_csv(
            "经济体,政策动态,政策类型,发布主体,时间\n\
             A,One,X,I,01/2024\n\
             B,Two,Y,I,02/2024\n",
            &ColumnNames::default(),
        )
        .unwrap()
    }

    #[test]
    fn starts_with_everything() {
        let ds = dataset();
        let calc = FilteredCalc::new(&ds);
        assert_eq!(calc.rows().len(), 2);
        assert!(calc.selection().is_empty());
    }

    #[test]
    fn changed_selection_recomputes_and_resets_page() {
        let ds = dataset();
        let mut calc = FilteredCalc::new(&ds);
        let effects = calc.update(
            &ds,
            FilterSelection {
                category: Choice::Only("Y".into()),
                ..Default::default()
            },
        );
        assert_eq!(effects, [SideEffect::ResetPage]);
        assert_eq!(calc.rows().len(), 1);
        assert_eq!(ds.get(calc.rows()[0]).unwrap().title, "Two");
    }

    #[test]
    fn identical_selection_declares_no_effects() {
        let ds = dataset();
        let mut calc = FilteredCalc::new(&ds);
        assert!(calc.update(&ds, FilterSelection::default()).is_empty());
    }

    #[test]
    fn keyword_only_change_still_resets_page() {
        let ds = dataset();
        let mut calc = FilteredCalc::new(&ds);
        let effects = calc.update(
            &ds,
            FilterSelection {
                keyword: "nothing matches".into(),
                ..Default::default()
            },
        );
        assert_eq!(effects, [SideEffect::ResetPage]);
        assert!(calc.rows().is_empty());
    }
}
