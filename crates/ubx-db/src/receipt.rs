use chrono::{Datelike, NaiveDate};

pub const RECEIPT_PREFIX: &str = "UBX";

/// Length of `UBX` + `YYYYMMDD`; everything after it is the counter value.
const DATE_PART_END: usize = 11;

/// `UBX` + `YYYYMMDD` + counter zero-padded to 4 digits.
///
/// Counter values above 9999 widen the suffix instead of truncating it.
pub fn format_receipt_number(date: NaiveDate, counter: i64) -> String {
    format!(
        "{RECEIPT_PREFIX}{:04}{:02}{:02}{:04}",
        date.year(),
        date.month(),
        date.day(),
        counter
    )
}

/// Counter value embedded in a receipt number, if it has the expected shape.
pub fn receipt_counter_value(receipt: &str) -> Option<i64> {
    let rest = receipt.strip_prefix(RECEIPT_PREFIX)?;
    let date = rest.get(..DATE_PART_END - RECEIPT_PREFIX.len())?;
    let suffix = receipt.get(DATE_PART_END..)?;
    if !date.bytes().all(|b| b.is_ascii_digit()) || suffix.len() < 4 {
        return None;
    }
    if !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}
