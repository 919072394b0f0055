//! Pure display helpers for transaction records: date and currency
//! formatting plus the running total.
//!
//! Nothing in this module performs I/O and every function is deterministic
//! for a given input, so the page renderers can call these freely.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};
use time::{
    OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem,
    format_description::well_known::Rfc3339, macros::format_description,
};

use crate::transaction::Transaction;

/// What to display when a stored date string cannot be parsed.
const INVALID_DATE_PLACEHOLDER: &str = "Unknown date";

/// Display format for transaction dates, e.g. "Jan 5, 2025, 03:12 PM".
const DISPLAY_DATE_FORMAT: &[BorrowedFormatItem] = format_description!(
    "[month repr:short] [day padding:none], [year], [hour repr:12]:[minute] [period]"
);

/// Format an RFC 3339 date string for display in `local_offset`.
///
/// Malformed input never panics: it renders as a fixed placeholder instead.
pub fn format_date(iso: &str, local_offset: UtcOffset) -> String {
    let Ok(date_time) = OffsetDateTime::parse(iso, &Rfc3339) else {
        return INVALID_DATE_PLACEHOLDER.to_owned();
    };

    date_time
        .to_offset(local_offset)
        .format(DISPLAY_DATE_FORMAT)
        .unwrap_or_else(|_| INVALID_DATE_PLACEHOLDER.to_owned())
}

/// Parse a stored amount string as a number of taka.
///
/// Non-numeric and non-finite input counts as zero so that aggregates never
/// abort on a malformed record.
pub fn parse_amount(amount: &str) -> f64 {
    let value: f64 = amount.trim().parse().unwrap_or(0.0);

    if value.is_finite() { value } else { 0.0 }
}

/// Format a stored amount string as Bangladeshi taka, e.g. "৳1,234.50".
///
/// Non-numeric input renders as the zero-amount display form. The output
/// always carries exactly two decimal places.
pub fn format_currency(amount: &str) -> String {
    format_currency_value(parse_amount(amount))
}

/// Format a number of taka for display, e.g. for the running total.
pub fn format_currency_value(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("৳")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-৳")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    let mut formatted_string = if number < 0.0 {
        negative_fmt.fmt_string(number.abs())
    } else if number > 0.0 {
        positive_fmt.fmt_string(number)
    } else {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        "৳0.00".to_owned()
    };

    // numfmt omits the last trailing zero, so we must add it ourselves
    // For example, "12.30" is rendered as "12.3" so we append "0".
    if formatted_string.as_bytes()[formatted_string.len() - 3] != b'.' {
        formatted_string = format!("{formatted_string}0");
    }

    formatted_string
}

/// Sum the amounts of `transactions`.
///
/// Records with a non-numeric amount contribute exactly zero. The result is
/// a pure sum, so it does not depend on the order of the input.
pub fn calculate_total(transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .map(|transaction| parse_amount(&transaction.amount))
        .sum()
}
