use std::collections::BTreeMap;

use crate::data::model::Transaction;

// ---------------------------------------------------------------------------
// Raw per-entity values
// ---------------------------------------------------------------------------
//
// The distribution widgets consume plain value arrays so the presentation
// layer owns binning and outlier conventions; nothing here is pre-binned.

/// Every row's `amount`, in source order.
pub fn amounts(rows: &[&Transaction]) -> Vec<f64> {
    rows.iter().map(|tx| tx.amount).collect()
}

/// Every row's `quantity`, in source order.
pub fn quantities(rows: &[&Transaction]) -> Vec<f64> {
    rows.iter().map(|tx| tx.quantity).collect()
}

/// Per-customer revenue sums, customer-ascending.
pub fn customer_revenue(rows: &[&Transaction]) -> Vec<f64> {
    let mut acc: BTreeMap<&str, f64> = BTreeMap::new();
    for tx in rows {
        *acc.entry(tx.customer_id.as_str()).or_insert(0.0) += tx.amount;
    }
    acc.into_values().collect()
}

/// Per-customer row counts (purchase frequency), customer-ascending.
pub fn purchase_frequency(rows: &[&Transaction]) -> Vec<f64> {
    let mut acc: BTreeMap<&str, u64> = BTreeMap::new();
    for tx in rows {
        *acc.entry(tx.customer_id.as_str()).or_insert(0) += 1;
    }
    acc.into_values().map(|n| n as f64).collect()
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Equal-width histogram with edges at the observed min/max.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub min: f64,
    pub max: f64,
    pub counts: Vec<u64>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width buckets spanning
    /// `[min, max]`; the maximum lands in the last bin. All-equal input
    /// collapses to a single full bin. Empty input has no histogram.
    pub fn build(values: &[f64], bins: usize) -> Option<Histogram> {
        if values.is_empty() || bins == 0 {
            return None;
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let span = max - min;

        if span <= 0.0 {
            return Some(Histogram {
                min,
                max,
                counts: vec![values.len() as u64],
            });
        }

        let mut counts = vec![0u64; bins];
        let width = span / bins as f64;
        for &v in values {
            let idx = (((v - min) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Some(Histogram { min, max, counts })
    }

    pub fn bin_width(&self) -> f64 {
        if self.counts.len() <= 1 {
            // Degenerate span: give the lone bar a nominal width.
            return if self.max > self.min { self.max - self.min } else { 1.0 };
        }
        (self.max - self.min) / self.counts.len() as f64
    }

    /// Bin midpoints, for bar placement.
    pub fn centers(&self) -> Vec<f64> {
        if self.max <= self.min {
            return vec![self.min];
        }
        let width = self.bin_width();
        (0..self.counts.len())
            .map(|i| self.min + (i as f64 + 0.5) * width)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Five-number summary
// ---------------------------------------------------------------------------

/// Box-plot statistics: quartiles plus 1.5×IQR whiskers and the points
/// beyond them.
#[derive(Debug, Clone, PartialEq)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Lowest observation ≥ `q1 - 1.5·IQR`.
    pub whisker_low: f64,
    /// Highest observation ≤ `q3 + 1.5·IQR`.
    pub whisker_high: f64,
    /// Observations outside the whiskers, ascending.
    pub outliers: Vec<f64>,
}

impl FiveNumberSummary {
    pub fn compute(values: &[f64]) -> Option<FiveNumberSummary> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let min = sorted[0];
        let max = sorted[sorted.len() - 1];
        let q1 = percentile(&sorted, 25.0);
        let median = percentile(&sorted, 50.0);
        let q3 = percentile(&sorted, 75.0);

        let iqr = q3 - q1;
        let low_fence = q1 - 1.5 * iqr;
        let high_fence = q3 + 1.5 * iqr;

        let whisker_low = sorted.iter().copied().find(|&v| v >= low_fence).unwrap_or(q1);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= high_fence)
            .unwrap_or(q3);
        let outliers: Vec<f64> = sorted
            .iter()
            .copied()
            .filter(|&v| v < low_fence || v > high_fence)
            .collect();

        Some(FiveNumberSummary {
            min,
            q1,
            median,
            q3,
            max,
            whisker_low,
            whisker_high,
            outliers,
        })
    }
}

/// Percentile by linear interpolation over a sorted slice, matching NumPy's
/// default convention.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }

    let rank = (p / 100.0) * (n - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = (rank.ceil() as usize).min(n - 1);
    let frac = rank - lower as f64;

    if lower == upper {
        sorted[lower]
    } else {
        sorted[lower] * (1.0 - frac) + sorted[upper] * frac
    }
}
