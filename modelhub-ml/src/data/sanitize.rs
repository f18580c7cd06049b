//! Record sanitization: drop null fields and normalize field names.

use super::record::{Dataset, Record};

/// Normalize a single field name (surrounding whitespace trimmed, lowercased).
pub fn normalize_field_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Return a copy of `record` with null-valued fields removed and every
/// remaining field name trimmed and lowercased.
///
/// When two raw names normalize to the same key, the one that sorts last in
/// the raw record wins.
pub fn sanitize_record(record: &Record) -> Record {
    record
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(name, value)| (normalize_field_name(name), value.clone()))
        .collect()
}

/// Sanitize every record of a dataset independently.
pub fn sanitize_dataset(data: &[Record]) -> Dataset {
    data.iter().map(sanitize_record).collect()
}
