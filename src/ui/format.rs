// ---------------------------------------------------------------------------
// Number formatting for metric tiles and table cells
// ---------------------------------------------------------------------------

/// Dollar amount with thousands separators and two decimals.
pub fn currency(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = group_thousands(cents / 100);
    let frac = cents % 100;
    if negative {
        format!("-${whole}.{frac:02}")
    } else {
        format!("${whole}.{frac:02}")
    }
}

/// Dollar amount with thousands separators, rounded to whole dollars.
pub fn currency_whole(value: f64) -> String {
    let negative = value < 0.0;
    let whole = group_thousands(value.abs().round() as u64);
    if negative {
        format!("-${whole}")
    } else {
        format!("${whole}")
    }
}

/// Integer with thousands separators.
pub fn count(n: u64) -> String {
    group_thousands(n)
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_and_rounds() {
        assert_eq!(currency(0.0), "$0.00");
        assert_eq!(currency(1234.567), "$1,234.57");
        assert_eq!(currency(999.995), "$1,000.00");
        assert_eq!(currency(1_000_000.0), "$1,000,000.00");
        assert_eq!(currency(-42.5), "-$42.50");
    }

    #[test]
    fn whole_currency_drops_cents() {
        assert_eq!(currency_whole(1234.56), "$1,235");
        assert_eq!(currency_whole(0.4), "$0");
    }

    #[test]
    fn count_groups_thousands() {
        assert_eq!(count(0), "0");
        assert_eq!(count(999), "999");
        assert_eq!(count(1000), "1,000");
        assert_eq!(count(1_234_567), "1,234,567");
    }
}
