use std::collections::BTreeSet;

use super::model::{Transaction, TransactionSet};

// ---------------------------------------------------------------------------
// Filter predicate: selected values per filterable column
// ---------------------------------------------------------------------------

/// The two filterable columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Country,
    Category,
}

/// Multi-select filter state for the two categorical columns.
///
/// An empty set means "no restriction on this field", not "match nothing";
/// the two fields compose with logical AND. Values that never occur in the
/// data are legal and simply match no row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub countries: BTreeSet<String>,
    pub categories: BTreeSet<String>,
}

impl FilterState {
    /// Whether no restriction is active on either field.
    pub fn is_unrestricted(&self) -> bool {
        self.countries.is_empty() && self.categories.is_empty()
    }

    /// The selected-value set for one field.
    pub fn selection(&self, field: FilterField) -> &BTreeSet<String> {
        match field {
            FilterField::Country => &self.countries,
            FilterField::Category => &self.categories,
        }
    }

    /// Mutable access to the selected-value set for one field.
    pub fn selection_mut(&mut self, field: FilterField) -> &mut BTreeSet<String> {
        match field {
            FilterField::Country => &mut self.countries,
            FilterField::Category => &mut self.categories,
        }
    }

    /// Whether a row passes both field filters.
    pub fn matches(&self, tx: &Transaction) -> bool {
        (self.countries.is_empty() || self.countries.contains(&tx.country))
            && (self.categories.is_empty() || self.categories.contains(&tx.category))
    }
}

/// Return indices of rows that pass the current filters.
///
/// Pure: the dataset is never touched, and with no active restriction the
/// result is every index in source order.
pub fn filtered_indices(dataset: &TransactionSet, filters: &FilterState) -> Vec<usize> {
    if filters.is_unrestricted() {
        return (0..dataset.transactions.len()).collect();
    }
    dataset
        .transactions
        .iter()
        .enumerate()
        .filter(|(_, tx)| filters.matches(tx))
        .map(|(i, _)| i)
        .collect()
}
