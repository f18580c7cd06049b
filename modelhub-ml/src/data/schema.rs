//! Batch-level schema checks and column type inference.

use super::record::{Record, Value};
use crate::error::{MlError, MlResult};
use std::collections::{BTreeSet, HashSet};

/// Column data type inferred over a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Number,
    Text,
    Boolean,
    Mixed,
    /// No record carries the field.
    Absent,
}

/// Confirm that the union of field names across `data` covers `required`.
///
/// A field counts as present when at least one record carries it; per-record
/// presence is not checked here.
pub fn validate_required_fields<S: AsRef<str>>(data: &[Record], required: &[S]) -> MlResult<()> {
    let present: HashSet<&str> = data.iter().flat_map(|r| r.field_names()).collect();
    let missing: BTreeSet<String> = required
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| !present.contains(name))
        .map(str::to_string)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(MlError::Schema { missing, row: None })
    }
}

/// Infer the type of `column` from every record that carries it.
pub fn infer_column_type(data: &[Record], column: &str) -> ColumnType {
    let mut inferred = ColumnType::Absent;
    for value in data.iter().filter_map(|r| r.get(column)) {
        let kind = match value {
            Value::Number(_) => ColumnType::Number,
            Value::Text(_) => ColumnType::Text,
            Value::Bool(_) => ColumnType::Boolean,
            Value::Null => continue,
        };
        inferred = match inferred {
            ColumnType::Absent => kind,
            current if current == kind => current,
            _ => return ColumnType::Mixed,
        };
    }
    inferred
}

/// True when every value the dataset holds for `column` is numeric.
pub fn is_numeric_column(data: &[Record], column: &str) -> bool {
    infer_column_type(data, column) == ColumnType::Number
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Vec<Record> {
        vec![
            [("feature1", Value::Number(1.0)), ("label", Value::Text("a".into()))]
                .into_iter()
                .collect(),
            [("feature2", Value::Number(2.0)), ("flag", Value::Bool(true))]
                .into_iter()
                .collect(),
        ]
    }

    #[test]
    fn test_required_fields_batch_union() {
        // feature2 only appears in the second record but still counts.
        assert!(validate_required_fields(&dataset(), &["feature1", "feature2"]).is_ok());
    }

    #[test]
    fn test_missing_fields_named_exactly() {
        let err = validate_required_fields(&dataset(), &["feature1", "target", "zeta"]).unwrap_err();
        match err {
            MlError::Schema { missing, row } => {
                assert_eq!(row, None);
                assert_eq!(
                    missing.into_iter().collect::<Vec<_>>(),
                    vec!["target".to_string(), "zeta".to_string()]
                );
            }
            other => panic!("Expected Schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_required_set_always_passes() {
        let empty: [&str; 0] = [];
        assert!(validate_required_fields(&[], &empty).is_ok());
    }

    #[test]
    fn test_infer_column_types() {
        let data = dataset();
        assert_eq!(infer_column_type(&data, "feature1"), ColumnType::Number);
        assert_eq!(infer_column_type(&data, "label"), ColumnType::Text);
        assert_eq!(infer_column_type(&data, "flag"), ColumnType::Boolean);
        assert_eq!(infer_column_type(&data, "missing"), ColumnType::Absent);
    }

    #[test]
    fn test_mixed_column_is_not_numeric() {
        let data: Vec<Record> = vec![
            [("x", Value::Number(1.0))].into_iter().collect(),
            [("x", Value::Text("2".into()))].into_iter().collect(),
        ];
        assert_eq!(infer_column_type(&data, "x"), ColumnType::Mixed);
        assert!(!is_numeric_column(&data, "x"));
    }
}
