use std::collections::BTreeMap;

use crate::data::model::Transaction;

// ---------------------------------------------------------------------------
// Group-by reductions over categorical keys
// ---------------------------------------------------------------------------

/// How many entries the ranked breakdowns keep.
pub const TOP_N: usize = 10;

/// Sum `amount` per key. Result is key-ascending (the catalog treats these
/// as unordered; key order keeps them deterministic).
fn sum_by<'a, F>(rows: &[&'a Transaction], key: F) -> Vec<(String, f64)>
where
    F: Fn(&'a Transaction) -> &'a str,
{
    let mut acc: BTreeMap<&str, f64> = BTreeMap::new();
    for tx in rows {
        *acc.entry(key(tx)).or_insert(0.0) += tx.amount;
    }
    acc.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

/// Count rows per key, key-ascending.
fn count_by<'a, F>(rows: &[&'a Transaction], key: F) -> Vec<(String, u64)>
where
    F: Fn(&'a Transaction) -> &'a str,
{
    let mut acc: BTreeMap<&str, u64> = BTreeMap::new();
    for tx in rows {
        *acc.entry(key(tx)).or_insert(0) += 1;
    }
    acc.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

/// Keep the `limit` largest entries, sorted by value descending with ties
/// broken by key ascending. The tie-break makes rankings deterministic
/// regardless of input order.
fn rank_descending<V: PartialOrd + Copy>(
    mut entries: Vec<(String, V)>,
    limit: usize,
) -> Vec<(String, V)> {
    entries.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    entries.truncate(limit);
    entries
}

// ---------------------------------------------------------------------------
// Catalog entries
// ---------------------------------------------------------------------------

pub fn revenue_by_category(rows: &[&Transaction]) -> Vec<(String, f64)> {
    sum_by(rows, |tx| tx.category.as_str())
}

pub fn revenue_by_country(rows: &[&Transaction]) -> Vec<(String, f64)> {
    sum_by(rows, |tx| tx.country.as_str())
}

pub fn revenue_by_payment_method(rows: &[&Transaction]) -> Vec<(String, f64)> {
    sum_by(rows, |tx| tx.payment_method.as_str())
}

/// Row count per payment method.
pub fn payment_method_counts(rows: &[&Transaction]) -> Vec<(String, u64)> {
    count_by(rows, |tx| tx.payment_method.as_str())
}

/// The `TOP_N` customers by summed revenue, descending.
pub fn top_customers_by_revenue(rows: &[&Transaction]) -> Vec<(String, f64)> {
    rank_descending(sum_by(rows, |tx| tx.customer_id.as_str()), TOP_N)
}

/// The `TOP_N` countries by row count, descending.
pub fn top_countries_by_transactions(rows: &[&Transaction]) -> Vec<(String, u64)> {
    rank_descending(count_by(rows, |tx| tx.country.as_str()), TOP_N)
}
