use std::collections::{HashMap, HashSet};

use crate::data::model::Transaction;

// ---------------------------------------------------------------------------
// Scalar KPIs
// ---------------------------------------------------------------------------

/// The headline figures of the dashboard.
///
/// Each field is an independent query over the filtered table; they are
/// computed together only to share the iteration. An empty table yields
/// all-zero values, never an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    /// Sum of `amount` over all rows.
    pub total_revenue: f64,
    /// Count of distinct transaction ids (a transaction may span rows).
    pub total_transactions: usize,
    /// Count of distinct customer ids.
    pub total_customers: usize,
    /// `total_revenue / total_transactions`, 0 when there are none.
    pub avg_order_value: f64,
    /// Mean over customers of each customer's revenue sum.
    pub avg_revenue_per_customer: f64,
    /// Mean `quantity` per row.
    pub avg_quantity: f64,
}

impl Summary {
    pub fn compute(rows: &[&Transaction]) -> Summary {
        let mut total_revenue = 0.0;
        let mut total_quantity = 0.0;
        let mut transaction_ids: HashSet<&str> = HashSet::new();
        let mut revenue_per_customer: HashMap<&str, f64> = HashMap::new();

        for tx in rows {
            total_revenue += tx.amount;
            total_quantity += tx.quantity;
            transaction_ids.insert(tx.transaction_id.as_str());
            *revenue_per_customer
                .entry(tx.customer_id.as_str())
                .or_insert(0.0) += tx.amount;
        }

        let total_transactions = transaction_ids.len();
        let total_customers = revenue_per_customer.len();

        let avg_order_value = if total_transactions > 0 {
            total_revenue / total_transactions as f64
        } else {
            0.0
        };
        let avg_revenue_per_customer = if total_customers > 0 {
            revenue_per_customer.values().sum::<f64>() / total_customers as f64
        } else {
            0.0
        };
        let avg_quantity = if rows.is_empty() {
            0.0
        } else {
            total_quantity / rows.len() as f64
        };

        Summary {
            total_revenue,
            total_transactions,
            total_customers,
            avg_order_value,
            avg_revenue_per_customer,
            avg_quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testutil::{refs, worked_example};

    #[test]
    fn worked_example_kpis() {
        let txs = worked_example();
        let summary = Summary::compute(&refs(&txs));

        assert_eq!(summary.total_revenue, 350.0);
        assert_eq!(summary.total_transactions, 3);
        assert_eq!(summary.total_customers, 2);
        // 350 / 3 = 116.67 to display precision
        assert!((summary.avg_order_value - 116.666_666).abs() < 1e-3);
        // C1: 150, C2: 200 → mean 175
        assert_eq!(summary.avg_revenue_per_customer, 175.0);
        assert_eq!(summary.avg_quantity, 2.0);
    }

    #[test]
    fn empty_table_yields_zeroes_not_errors() {
        let summary = Summary::compute(&[]);
        assert_eq!(summary, Summary::default());
        assert_eq!(summary.avg_order_value, 0.0);
    }

    #[test]
    fn multi_line_transactions_count_once() {
        let mut txs = worked_example();
        // Second line item of T1: same id, another category.
        let mut extra = txs[0].clone();
        extra.category = "Books".to_string();
        extra.amount = 25.0;
        txs.push(extra);

        let summary = Summary::compute(&refs(&txs));
        assert_eq!(summary.total_transactions, 3);
        assert_eq!(summary.total_revenue, 375.0);
    }
}
