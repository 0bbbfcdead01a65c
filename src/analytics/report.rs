use crate::analytics::breakdown::{
    payment_method_counts, revenue_by_category, revenue_by_country, revenue_by_payment_method,
    top_countries_by_transactions, top_customers_by_revenue,
};
use crate::analytics::distribution::{amounts, customer_revenue, purchase_frequency, quantities};
use crate::analytics::series::{monthly_revenue, monthly_transactions, Month};
use crate::analytics::summary::Summary;
use crate::data::model::Transaction;

/// Everything the dashboard shows for one filtered view of the dataset,
/// computed in a single pass so the UI never aggregates per frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    pub summary: Summary,
    pub monthly_revenue: Vec<(Month, f64)>,
    pub monthly_transactions: Vec<(Month, u64)>,
    pub revenue_by_category: Vec<(String, f64)>,
    pub revenue_by_country: Vec<(String, f64)>,
    pub revenue_by_payment_method: Vec<(String, f64)>,
    pub payment_method_counts: Vec<(String, u64)>,
    pub top_customers: Vec<(String, f64)>,
    pub top_countries: Vec<(String, u64)>,
    pub purchase_frequency: Vec<f64>,
    pub customer_revenue: Vec<f64>,
    pub amounts: Vec<f64>,
    pub quantities: Vec<f64>,
}

impl Report {
    pub fn compute(rows: &[&Transaction]) -> Report {
        Report {
            summary: Summary::compute(rows),
            monthly_revenue: monthly_revenue(rows),
            monthly_transactions: monthly_transactions(rows),
            revenue_by_category: revenue_by_category(rows),
            revenue_by_country: revenue_by_country(rows),
            revenue_by_payment_method: revenue_by_payment_method(rows),
            payment_method_counts: payment_method_counts(rows),
            top_customers: top_customers_by_revenue(rows),
            top_countries: top_countries_by_transactions(rows),
            purchase_frequency: purchase_frequency(rows),
            customer_revenue: customer_revenue(rows),
            amounts: amounts(rows),
            quantities: quantities(rows),
        }
    }
}
