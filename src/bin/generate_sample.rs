use anyhow::Context;
use chrono::{Days, NaiveDate};

const OUTPUT_PATH: &str = "customer_transactions_processed.csv";

const TRANSACTIONS: u32 = 1500;
const CUSTOMERS: usize = 400;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_f64() * items.len() as f64) as usize]
    }
}

fn main() -> anyhow::Result<()> {
    let mut rng = SimpleRng::new(42);

    let countries = [
        "USA",
        "UK",
        "Germany",
        "France",
        "Canada",
        "Australia",
        "India",
        "Japan",
    ];
    let categories = [
        "Electronics",
        "Clothing",
        "Books",
        "Home & Kitchen",
        "Toys",
        "Sports",
        "Beauty",
    ];
    let payment_methods = ["Credit Card", "Debit Card", "PayPal", "Bank Transfer", "Cash"];

    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();

    let mut writer = csv::Writer::from_path(OUTPUT_PATH)
        .with_context(|| format!("creating {OUTPUT_PATH}"))?;
    writer.write_record([
        "TransactionID",
        "CustomerID",
        "TransactionDate",
        "TotalAmount",
        "Quantity",
        "Country",
        "ProductCategory",
        "PaymentMethod",
    ])?;

    let mut rows = 0usize;
    let mut malformed = 0usize;

    for tx_index in 0..TRANSACTIONS {
        // Squaring skews purchases towards low customer indices, giving a
        // long-tailed purchase frequency distribution.
        let customer_idx = (rng.next_f64().powi(2) * CUSTOMERS as f64) as usize;
        let customer = format!("CUST{:04}", customer_idx + 1);
        let country = countries[customer_idx % countries.len()];
        let payment = *rng.pick(&payment_methods);
        let date = start
            .checked_add_days(Days::new((rng.next_f64() * 730.0) as u64))
            .unwrap_or(start);
        let id = format!("TX{:06}", tx_index + 1);

        // A few checkouts carry a second line item under the same id.
        let line_items = if rng.next_f64() < 0.08 { 2 } else { 1 };
        for _ in 0..line_items {
            let category = *rng.pick(&categories);
            // Lognormal-ish amounts: most small, a few large.
            let amount = (rng.gauss(3.5, 0.9).exp() * 100.0).round() / 100.0;
            let quantity = 1 + (rng.next_f64() * 8.0) as u32;

            let mut date_s = date.format("%Y-%m-%d").to_string();
            let mut amount_s = format!("{amount:.2}");
            let mut quantity_s = quantity.to_string();

            // Corrupt ~1.5% of rows so the loader's dropping is visible.
            if rng.next_f64() < 0.015 {
                match (rng.next_f64() * 3.0) as usize {
                    0 => amount_s = "N/A".to_string(),
                    1 => date_s = "not-a-date".to_string(),
                    _ => quantity_s = String::new(),
                }
                malformed += 1;
            }

            writer.write_record([
                id.as_str(),
                customer.as_str(),
                date_s.as_str(),
                amount_s.as_str(),
                quantity_s.as_str(),
                country,
                category,
                payment,
            ])?;
            rows += 1;
        }
    }

    writer
        .flush()
        .with_context(|| format!("flushing {OUTPUT_PATH}"))?;

    println!("Wrote {rows} transaction rows ({malformed} malformed) to {OUTPUT_PATH}");
    Ok(())
}
