//! Row-major numeric feature matrices built from records.

use super::selector::FeatureSpec;
use crate::data::{RangeValidator, Record, Value};
use crate::error::{MlError, MlResult};
use std::collections::BTreeSet;

/// Row-major matrix: one inner vector per record, one column per feature.
pub type FeatureMatrix = Vec<Vec<f64>>;

/// Extract the feature columns of `data` in `spec` order, range-checking
/// every value.
///
/// The batch-level schema check only guarantees that each column appears
/// somewhere in the batch, so a record lacking one of the columns is reported
/// here as a schema error carrying its row index.
pub fn build_matrix(
    data: &[Record],
    spec: &FeatureSpec,
    validator: &RangeValidator,
) -> MlResult<FeatureMatrix> {
    data.iter()
        .enumerate()
        .map(|(row, record)| build_row(row, record, spec, validator))
        .collect()
}

fn build_row(
    row: usize,
    record: &Record,
    spec: &FeatureSpec,
    validator: &RangeValidator,
) -> MlResult<Vec<f64>> {
    let mut values = Vec::with_capacity(spec.len());
    let mut missing = BTreeSet::new();

    for column in spec.iter() {
        match record.get(column) {
            Some(Value::Number(v)) => values.push(*v),
            Some(other) => {
                return Err(MlError::invalid_input(format!(
                    "Row {row}: feature '{column}' is {}, expected number",
                    other.type_name()
                )));
            }
            None => {
                missing.insert(column.clone());
            }
        }
    }

    if !missing.is_empty() {
        return Err(MlError::Schema {
            missing,
            row: Some(row),
        });
    }

    for value in &values {
        validator.check(*value)?;
    }
    Ok(values)
}
