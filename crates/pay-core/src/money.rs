//! # Money Formatting
//!
//! Amounts travel through the system in the smallest currency unit.
//! Processors that want a decimal string (PayPal's `value`) get one from
//! [`format_major_units`].

/// ISO 4217 codes that have no minor unit
const ZERO_DECIMAL_CURRENCIES: &[&str] = &[
    "bif", "clp", "djf", "gnf", "huf", "jpy", "kmf", "krw", "mga", "pyg", "rwf", "twd", "ugx",
    "vnd", "vuv", "xaf", "xof", "xpf",
];

/// Returns the number of decimal places for this currency
/// (JPY has 0 decimals, most others have 2)
pub fn decimal_places(currency: &str) -> u8 {
    let code = currency.trim().to_ascii_lowercase();
    if ZERO_DECIMAL_CURRENCIES.contains(&code.as_str()) {
        0
    } else {
        2
    }
}

/// Format an amount in smallest units as a decimal string, e.g. `2000`
/// EUR becomes `"20.00"` and `500` JPY stays `"500"`.
pub fn format_major_units(amount: i64, currency: &str) -> String {
    let places = decimal_places(currency);
    if places == 0 {
        return amount.to_string();
    }

    let divisor = 10_u64.pow(u32::from(places));
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    format!(
        "{}{}.{:0width$}",
        sign,
        abs / divisor,
        abs % divisor,
        width = usize::from(places)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_places() {
        assert_eq!(decimal_places("eur"), 2);
        assert_eq!(decimal_places("USD"), 2);
        assert_eq!(decimal_places("JPY"), 0);
        assert_eq!(decimal_places("huf"), 0);
    }

    #[test]
    fn test_format_major_units() {
        assert_eq!(format_major_units(2000, "eur"), "20.00");
        assert_eq!(format_major_units(1999, "usd"), "19.99");
        assert_eq!(format_major_units(5, "gbp"), "0.05");
        assert_eq!(format_major_units(500, "jpy"), "500");
        assert_eq!(format_major_units(-150, "eur"), "-1.50");
    }
}
