/// Formats an amount as a dollar string with thousands grouping and exactly
/// two decimal digits, e.g. `1234.567` -> `"$1,234.57"`.
pub fn format_currency(amount: f64) -> String {
    let fixed = format!("{:.2}", amount);
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let (sign, digits) = match whole.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", whole),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("${}{}.{}", sign, grouped, frac)
}

/// Usage percentage of a credit line: `balance / limit * 100`. Returns
/// exactly `0.0` when the limit is 0, regardless of the balance.
pub fn credit_usage(balance: f64, limit: f64) -> f64 {
    if limit == 0.0 {
        return 0.0;
    }
    balance / limit * 100.0
}

/// Parses a user-supplied amount string, `None` on absent input or parse
/// failure. Accepts optionally signed decimals with surrounding whitespace.
pub fn parse_amount(value: Option<&str>) -> Option<f64> {
    value.and_then(|s| s.trim().parse::<f64>().ok())
}
