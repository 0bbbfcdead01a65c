use std::collections::BTreeSet;

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Transaction – one row of the source table
// ---------------------------------------------------------------------------

/// A single customer transaction line item (one row of the source table).
///
/// Rows only make it into a [`TransactionSet`] once `date`, `amount` and
/// `quantity` have parsed successfully; the categorical fields are kept as
/// free text exactly as found in the source (no case or whitespace
/// normalization).
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Transaction identifier. Not unique per row: a transaction may span
    /// several line items, so distinct-count operations group on it.
    pub transaction_id: String,
    /// Identifier of the purchasing customer.
    pub customer_id: String,
    /// Calendar date of the transaction (time component discarded).
    pub date: NaiveDate,
    /// Monetary total of the line item. No currency conversion.
    pub amount: f64,
    /// Item count. Kept as `f64` to mirror the lenient numeric coercion of
    /// the source pipeline.
    pub quantity: f64,
    pub country: String,
    /// Product category of the line item.
    pub category: String,
    pub payment_method: String,
}

// ---------------------------------------------------------------------------
// TransactionSet – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed table, immutable after loading.
///
/// Filtering and aggregation only ever read from this; derived views are
/// index lists or freshly computed results, never in-place mutations.
#[derive(Debug, Clone)]
pub struct TransactionSet {
    /// All surviving rows, in source order.
    pub transactions: Vec<Transaction>,
    /// Sorted unique `country` values, for the filter sidebar.
    pub countries: BTreeSet<String>,
    /// Sorted unique `category` values, for the filter sidebar.
    pub categories: BTreeSet<String>,
    /// How many source rows were discarded during coercion.
    pub dropped_rows: usize,
}

impl TransactionSet {
    /// Build the unique-value indices from the loaded rows.
    pub fn from_transactions(transactions: Vec<Transaction>, dropped_rows: usize) -> Self {
        let mut countries = BTreeSet::new();
        let mut categories = BTreeSet::new();

        for tx in &transactions {
            countries.insert(tx.country.clone());
            categories.insert(tx.category.clone());
        }

        TransactionSet {
            transactions,
            countries,
            categories,
            dropped_rows,
        }
    }

    /// Number of surviving rows.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(id: &str, customer: &str, date: &str, country: &str, category: &str) -> Transaction {
        Transaction {
            transaction_id: id.to_string(),
            customer_id: customer.to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            amount: 10.0,
            quantity: 1.0,
            country: country.to_string(),
            category: category.to_string(),
            payment_method: "Card".to_string(),
        }
    }

    #[test]
    fn unique_values_are_indexed_and_sorted() {
        let set = TransactionSet::from_transactions(
            vec![
                tx("T1", "C1", "2024-01-05", "US", "Electronics"),
                tx("T2", "C1", "2024-01-20", "US", "Books"),
                tx("T3", "C2", "2024-02-01", "UK", "Electronics"),
            ],
            0,
        );

        assert_eq!(set.len(), 3);
        assert!(!set.is_empty());
        assert_eq!(set.countries.iter().collect::<Vec<_>>(), vec!["UK", "US"]);
        assert_eq!(
            set.categories.iter().collect::<Vec<_>>(),
            vec!["Books", "Electronics"]
        );
    }

    #[test]
    fn empty_table_has_no_unique_values() {
        let set = TransactionSet::from_transactions(Vec::new(), 4);
        assert!(set.is_empty());
        assert!(set.countries.is_empty());
        assert_eq!(set.dropped_rows, 4);
    }
}
