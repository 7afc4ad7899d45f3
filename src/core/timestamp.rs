//! Purpose: Convert between date/time values and the service's cutoff timestamps.
//! Exports: `date_to_timestamp`, `cutoff_to_timestamp`, `timestamp_to_date`, `BEGINNING_OF_TIME`.
//! Role: Pure helpers used by history and recent-change queries.
//! Invariants: Timestamps are 14-digit `yyyyMMddHHmmss` strings in GMT.
//! Invariants: A missing cutoff is sent as the literal "0".
use crate::core::error::{Error, ErrorKind};
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// Cutoff meaning "since the beginning of time".
pub const BEGINNING_OF_TIME: &str = "0";

pub fn date_to_timestamp(date: OffsetDateTime) -> Result<String, Error> {
    let format = format_description!("[year][month][day][hour][minute][second]");
    let utc = date.to_offset(UtcOffset::UTC);
    if !(0..=9999).contains(&utc.year()) {
        return Err(Error::new(ErrorKind::Usage)
            .with_message(format!("year {} cannot be expressed as a timestamp", utc.year())));
    }
    utc.format(format).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("failed to format timestamp")
            .with_source(err)
    })
}

pub fn cutoff_to_timestamp(cutoff: Option<OffsetDateTime>) -> Result<String, Error> {
    match cutoff {
        Some(date) => date_to_timestamp(date),
        None => Ok(BEGINNING_OF_TIME.to_string()),
    }
}

/// Parse a service timestamp (as found in history records) back into UTC.
pub fn timestamp_to_date(timestamp: &str) -> Result<OffsetDateTime, Error> {
    let format = format_description!("[year][month][day][hour][minute][second]");
    let trimmed = timestamp.trim();
    if trimmed.len() != 14 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::new(ErrorKind::Format)
            .with_message(format!("timestamp must be 14 digits, got {trimmed:?}")));
    }
    PrimitiveDateTime::parse(trimmed, format)
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|err| {
            Error::new(ErrorKind::Format)
                .with_message(format!("invalid timestamp {trimmed:?}"))
                .with_source(err)
        })
}
