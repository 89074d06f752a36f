use std::fmt;

/// Money is represented as integer cents to avoid floating-point precision issues.
/// £12.50 is stored as 1250.
pub type Cents = i64;

/// Largest single amount accepted: 10,000,000,000.00.
/// Keeps ledger totals far from `i64` overflow even over millions of rows.
pub const MAX_AMOUNT_CENTS: Cents = 1_000_000_000_000;

/// Currency symbols accepted (and discarded) in front of an amount.
const CURRENCY_SYMBOLS: [char; 3] = ['£', '$', '€'];

/// Format cents as a human-readable amount.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.abs();
    let units = abs_cents / 100;
    let remainder = abs_cents % 100;
    format!("{}{}.{:02}", sign, units, remainder)
}

/// Convert cents to a floating point amount, for charting only.
pub fn cents_to_f64(cents: Cents) -> f64 {
    cents as f64 / 100.0
}

/// Parse a non-negative decimal string into cents.
///
/// Accepts "50", "12.5", "12.50", ".50" and an optional leading currency
/// symbol. More than two decimal places are rounded half-up to the cent.
/// Amounts above [`MAX_AMOUNT_CENTS`] are rejected.
pub fn parse_cents(input: &str) -> Result<Cents, ParseAmountError> {
    let trimmed = input.trim();
    let trimmed = trimmed
        .strip_prefix(CURRENCY_SYMBOLS.as_slice())
        .unwrap_or(trimmed)
        .trim();

    if trimmed.is_empty() {
        return Err(ParseAmountError::Empty);
    }
    if trimmed.starts_with('-') {
        return Err(ParseAmountError::Negative);
    }
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);

    let (units_str, decimal_str) = match trimmed.split_once('.') {
        Some((units, decimals)) => (units, decimals),
        None => (trimmed, ""),
    };

    if units_str.is_empty() && decimal_str.is_empty() {
        return Err(ParseAmountError::InvalidFormat);
    }
    if !units_str.chars().all(|c| c.is_ascii_digit())
        || !decimal_str.chars().all(|c| c.is_ascii_digit())
    {
        return Err(ParseAmountError::InvalidFormat);
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str
            .parse()
            .map_err(|_| ParseAmountError::TooLarge)?
    };

    let digits: Vec<i64> = decimal_str
        .bytes()
        .map(|b| i64::from(b - b'0'))
        .collect();
    let tenths = digits.first().copied().unwrap_or(0);
    let hundredths = digits.get(1).copied().unwrap_or(0);
    let round_up = digits.get(2).is_some_and(|d| *d >= 5);

    units
        .checked_mul(100)
        .and_then(|c| c.checked_add(tenths * 10 + hundredths + i64::from(round_up)))
        .filter(|cents| *cents <= MAX_AMOUNT_CENTS)
        .ok_or(ParseAmountError::TooLarge)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    Empty,
    InvalidFormat,
    Negative,
    TooLarge,
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::Empty => write!(f, "amount is empty"),
            ParseAmountError::InvalidFormat => {
                write!(f, "amount must be a number (e.g., 12.50)")
            }
            ParseAmountError::Negative => write!(f, "amount must not be negative"),
            ParseAmountError::TooLarge => write!(f, "amount is too large"),
        }
    }
}

impl std::error::Error for ParseAmountError {}
