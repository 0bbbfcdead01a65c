use std::io;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{Transaction, TransactionSet};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Fatal load failures. Row-level problems are not errors: a row whose
/// date, amount or quantity fails to coerce is silently dropped and only
/// counted in [`TransactionSet::dropped_rows`].
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a transaction table from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row with the eight source columns
/// * `.json` – `[{ "TransactionID": ..., "CustomerID": ..., ... }, ...]`,
///   the records orientation `DataFrame.to_json` emits
pub fn load_file(path: &Path) -> Result<TransactionSet, LoaderError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        other => return Err(LoaderError::UnsupportedExtension(other.to_string())),
    };

    if dataset.dropped_rows > 0 {
        log::warn!(
            "{}: dropped {} of {} rows during type coercion",
            path.display(),
            dataset.dropped_rows,
            dataset.dropped_rows + dataset.len()
        );
    }
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Field coercion
// ---------------------------------------------------------------------------

/// A row after per-field coercion but before the drop decision.
struct RawRow {
    transaction_id: String,
    customer_id: String,
    date: Option<NaiveDate>,
    amount: Option<f64>,
    quantity: Option<f64>,
    country: String,
    category: String,
    payment_method: String,
}

impl RawRow {
    /// Keep the row only when every typed field coerced successfully.
    fn finish(self) -> Option<Transaction> {
        Some(Transaction {
            date: self.date?,
            amount: self.amount?,
            quantity: self.quantity?,
            transaction_id: self.transaction_id,
            customer_id: self.customer_id,
            country: self.country,
            category: self.category,
            payment_method: self.payment_method,
        })
    }
}

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Parse a calendar date, accepting the date and datetime layouts the
/// source pipeline is known to emit. Returns `None` when nothing matches.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

/// Lenient numeric parse: unparseable and non-finite values (a literal
/// `NaN` included) count as missing.
fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<TransactionSet, LoaderError> {
    let file = std::fs::File::open(path).map_err(|source| LoaderError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_csv(file)
}

/// Parse CSV from any reader. Headers are matched by exact name; fields
/// load verbatim (the typed-field parsers trim their own input, so padded
/// numbers and dates still coerce while labels keep their whitespace).
fn parse_csv<R: io::Read>(input: R) -> Result<TransactionSet, LoaderError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let column = |name: &'static str| -> Result<usize, LoaderError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(LoaderError::MissingColumn(name))
    };

    let id_idx = column("TransactionID")?;
    let customer_idx = column("CustomerID")?;
    let date_idx = column("TransactionDate")?;
    let amount_idx = column("TotalAmount")?;
    let quantity_idx = column("Quantity")?;
    let country_idx = column("Country")?;
    let category_idx = column("ProductCategory")?;
    let payment_idx = column("PaymentMethod")?;

    let mut transactions = Vec::new();
    let mut dropped = 0usize;

    for result in reader.records() {
        let record = result?;
        let field = |idx: usize| record.get(idx).unwrap_or("");

        let raw = RawRow {
            transaction_id: field(id_idx).to_string(),
            customer_id: field(customer_idx).to_string(),
            date: parse_date(field(date_idx)),
            amount: parse_number(field(amount_idx)),
            quantity: parse_number(field(quantity_idx)),
            country: field(country_idx).to_string(),
            category: field(category_idx).to_string(),
            payment_method: field(payment_idx).to_string(),
        };

        match raw.finish() {
            Some(tx) => transactions.push(tx),
            None => dropped += 1,
        }
    }

    Ok(TransactionSet::from_transactions(transactions, dropped))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// One record of the JSON array. Values stay dynamically typed here because
/// pandas serializes ids/amounts as either strings or numbers and dates as
/// either ISO strings or epoch milliseconds.
#[derive(serde::Deserialize)]
struct JsonRecord {
    #[serde(rename = "TransactionID")]
    transaction_id: Option<JsonValue>,
    #[serde(rename = "CustomerID")]
    customer_id: Option<JsonValue>,
    #[serde(rename = "TransactionDate")]
    date: Option<JsonValue>,
    #[serde(rename = "TotalAmount")]
    amount: Option<JsonValue>,
    #[serde(rename = "Quantity")]
    quantity: Option<JsonValue>,
    #[serde(rename = "Country")]
    country: Option<JsonValue>,
    #[serde(rename = "ProductCategory")]
    category: Option<JsonValue>,
    #[serde(rename = "PaymentMethod")]
    payment_method: Option<JsonValue>,
}

fn load_json(path: &Path) -> Result<TransactionSet, LoaderError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoaderError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<TransactionSet, LoaderError> {
    let records: Vec<JsonRecord> = serde_json::from_str(text)?;

    let mut transactions = Vec::new();
    let mut dropped = 0usize;

    for rec in records {
        let raw = RawRow {
            transaction_id: coerce_label(rec.transaction_id),
            customer_id: coerce_label(rec.customer_id),
            date: coerce_date(rec.date),
            amount: coerce_number(rec.amount),
            quantity: coerce_number(rec.quantity),
            country: coerce_label(rec.country),
            category: coerce_label(rec.category),
            payment_method: coerce_label(rec.payment_method),
        };

        match raw.finish() {
            Some(tx) => transactions.push(tx),
            None => dropped += 1,
        }
    }

    Ok(TransactionSet::from_transactions(transactions, dropped))
}

/// Categorical / identifier fields: keep strings verbatim, render numbers
/// as text, treat anything else as empty.
fn coerce_label(val: Option<JsonValue>) -> String {
    match val {
        Some(JsonValue::String(s)) => s,
        Some(JsonValue::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn coerce_number(val: Option<JsonValue>) -> Option<f64> {
    match val {
        Some(JsonValue::Number(n)) => n.as_f64().filter(|v| v.is_finite()),
        Some(JsonValue::String(s)) => parse_number(&s),
        _ => None,
    }
}

fn coerce_date(val: Option<JsonValue>) -> Option<NaiveDate> {
    match val {
        Some(JsonValue::String(s)) => parse_date(&s),
        // pandas' default datetime serialization: epoch milliseconds
        Some(JsonValue::Number(n)) => {
            let millis = n.as_i64()?;
            DateTime::from_timestamp_millis(millis).map(|dt| dt.date_naive())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAN_CSV: &str = "\
TransactionID,CustomerID,TransactionDate,TotalAmount,Quantity,Country,ProductCategory,PaymentMethod
T1,C1,2024-01-05,100.0,2,US,Electronics,Card
T2,C1,2024-01-20,50.0,1,US,Books,Cash
T3,C2,2024-02-01,200.0,3,UK,Electronics,Card
";

    #[test]
    fn parses_clean_csv() {
        let set = parse_csv(CLEAN_CSV.as_bytes()).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.dropped_rows, 0);

        let first = &set.transactions[0];
        assert_eq!(first.transaction_id, "T1");
        assert_eq!(first.customer_id, "C1");
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(first.amount, 100.0);
        assert_eq!(first.quantity, 2.0);
        assert_eq!(first.country, "US");
        assert_eq!(first.category, "Electronics");
        assert_eq!(first.payment_method, "Card");
    }

    #[test]
    fn drops_rows_with_malformed_typed_fields() {
        let csv = "\
TransactionID,CustomerID,TransactionDate,TotalAmount,Quantity,Country,ProductCategory,PaymentMethod
T1,C1,2024-01-05,100.0,2,US,Electronics,Card
T2,C1,2024-01-20,N/A,1,US,Books,Cash
T3,C2,not-a-date,200.0,3,UK,Electronics,Card
T4,C2,2024-02-10,75.0,,UK,Books,Card
T5,C3,2024-02-11,NaN,2,DE,Toys,Cash
";
        let set = parse_csv(csv.as_bytes()).unwrap();
        // Output row count equals input rows minus malformed rows.
        assert_eq!(set.len(), 1);
        assert_eq!(set.dropped_rows, 4);
        assert_eq!(set.transactions[0].transaction_id, "T1");
    }

    #[test]
    fn categorical_fields_load_verbatim() {
        // Labels differing only in padding stay distinct; empty is legal.
        let csv = "\
TransactionID,CustomerID,TransactionDate,TotalAmount,Quantity,Country,ProductCategory,PaymentMethod
T1,C1,2024-01-05,100.0,2,US,Electronics,Card
T2,C1,2024-01-06, 50.0,1, US,Electronics ,Card
T3,C1,2024-01-07,25.0,1,,Electronics,Card
";
        let set = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.transactions[1].country, " US");
        assert_eq!(set.transactions[1].category, "Electronics ");
        assert_eq!(set.transactions[2].country, "");
        // Padded typed fields still coerce
        assert_eq!(set.transactions[1].amount, 50.0);
        assert_eq!(
            set.countries.iter().collect::<Vec<_>>(),
            vec!["", " US", "US"]
        );
    }

    #[test]
    fn accepts_datetime_and_slash_formats() {
        let csv = "\
TransactionID,CustomerID,TransactionDate,TotalAmount,Quantity,Country,ProductCategory,PaymentMethod
T1,C1,2024-01-05 13:45:01,10.0,1,US,Books,Card
T2,C1,2024-01-06T08:00:00.250,10.0,1,US,Books,Card
T3,C1,01/07/2024,10.0,1,US,Books,Card
";
        let set = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(
            set.transactions.iter().map(|t| t.date).collect::<Vec<_>>(),
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 6).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
            ]
        );
    }

    #[test]
    fn missing_column_is_fatal() {
        let csv = "\
TransactionID,CustomerID,TransactionDate,TotalAmount,Country,ProductCategory,PaymentMethod
T1,C1,2024-01-05,100.0,US,Electronics,Card
";
        match parse_csv(csv.as_bytes()) {
            Err(LoaderError::MissingColumn(col)) => assert_eq!(col, "Quantity"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn parses_json_records() {
        // Mixed value shapes: string ids, numeric ids, ISO and epoch-ms dates.
        let json = r#"[
            {"TransactionID": "T1", "CustomerID": "C1", "TransactionDate": "2024-01-05",
             "TotalAmount": 100.0, "Quantity": 2, "Country": "US",
             "ProductCategory": "Electronics", "PaymentMethod": "Card"},
            {"TransactionID": 2, "CustomerID": 7, "TransactionDate": 1706745600000,
             "TotalAmount": "50.5", "Quantity": "1", "Country": "UK",
             "ProductCategory": "Books", "PaymentMethod": "Cash"}
        ]"#;
        let set = parse_json(json).unwrap();
        assert_eq!(set.len(), 2);

        let second = &set.transactions[1];
        assert_eq!(second.transaction_id, "2");
        assert_eq!(second.customer_id, "7");
        // 1706745600000 ms = 2024-02-01T00:00:00Z
        assert_eq!(second.date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(second.amount, 50.5);
        assert_eq!(second.quantity, 1.0);
    }

    #[test]
    fn csv_and_json_load_the_same_table() {
        // The two formats are interchangeable inputs, whitespace included.
        let csv = "\
TransactionID,CustomerID,TransactionDate,TotalAmount,Quantity,Country,ProductCategory,PaymentMethod
T1,C1,2024-01-05,100.0,2,US,Electronics,Card
T2,C2,2024-02-01,50.5,1, UK,Books ,Cash
";
        let json = r#"[
            {"TransactionID": "T1", "CustomerID": "C1", "TransactionDate": "2024-01-05",
             "TotalAmount": 100.0, "Quantity": 2, "Country": "US",
             "ProductCategory": "Electronics", "PaymentMethod": "Card"},
            {"TransactionID": "T2", "CustomerID": "C2", "TransactionDate": "2024-02-01",
             "TotalAmount": 50.5, "Quantity": 1, "Country": " UK",
             "ProductCategory": "Books ", "PaymentMethod": "Cash"}
        ]"#;

        let from_csv = parse_csv(csv.as_bytes()).unwrap();
        let from_json = parse_json(json).unwrap();

        assert_eq!(from_csv.transactions, from_json.transactions);
        assert_eq!(from_csv.countries, from_json.countries);
        assert_eq!(from_csv.categories, from_json.categories);
        assert_eq!(from_csv.dropped_rows, 0);
    }

    #[test]
    fn json_rows_with_missing_typed_fields_are_dropped() {
        let json = r#"[
            {"TransactionID": "T1", "CustomerID": "C1", "TransactionDate": "2024-01-05",
             "TotalAmount": 100.0, "Quantity": 2, "Country": "US",
             "ProductCategory": "Electronics", "PaymentMethod": "Card"},
            {"TransactionID": "T2", "CustomerID": "C1", "TransactionDate": "2024-01-06",
             "TotalAmount": null, "Quantity": 2, "Country": "US",
             "ProductCategory": "Books", "PaymentMethod": "Card"},
            {"TransactionID": "T3", "CustomerID": "C2",
             "TotalAmount": 10.0, "Quantity": 1, "Country": "UK",
             "ProductCategory": "Books", "PaymentMethod": "Cash"}
        ]"#;
        let set = parse_json(json).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.dropped_rows, 2);
    }

    #[test]
    fn malformed_json_is_fatal() {
        assert!(matches!(
            parse_json("{\"not\": \"an array\"}"),
            Err(LoaderError::Json(_))
        ));
    }

    #[test]
    fn unsupported_extension_is_rejected_before_io() {
        match load_file(Path::new("data.parquet")) {
            Err(LoaderError::UnsupportedExtension(ext)) => assert_eq!(ext, "parquet"),
            other => panic!("expected UnsupportedExtension, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_reports_io_error() {
        let err = load_file(Path::new("definitely-not-here.csv")).unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));
    }
}
