//! Tabular processing operations: aggregate, filter and validate.
//!
//! These operate on the conventional `value` column of sanitized records.

use super::record::{Record, Value, observed_fields};
use super::sanitize::sanitize_dataset;
use super::schema::{is_numeric_column, validate_required_fields};
use super::validate::validate_numeric_range;
use crate::error::{MlError, MlResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Column the processing operations act on.
pub const VALUE_COLUMN: &str = "value";

/// A processing request as received from the boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessRequest {
    pub data: Vec<Record>,
    pub operation: String,
    #[serde(default)]
    pub parameters: serde_json::Value,
}

/// Typed view of the loosely structured request parameters.
#[derive(Debug, Clone, Default, Deserialize)]
struct ProcessParameters {
    #[serde(default)]
    group_by: Vec<String>,
    #[serde(default)]
    min_value: Option<f64>,
    #[serde(default)]
    max_value: Option<f64>,
}

/// A resolved processing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessOperation {
    Aggregate {
        group_by: Vec<String>,
    },
    Filter {
        min_value: Option<f64>,
        max_value: Option<f64>,
    },
    Validate {
        min_value: Option<f64>,
        max_value: Option<f64>,
    },
}

impl ProcessOperation {
    /// Resolve an operation name and its parameters.
    ///
    /// The name is checked before the parameters are read.
    pub fn parse(operation: &str, parameters: &serde_json::Value) -> MlResult<Self> {
        if !matches!(operation, "aggregate" | "filter" | "validate") {
            return Err(MlError::invalid_input(format!(
                "Unknown operation: {operation}"
            )));
        }

        let params: ProcessParameters = if parameters.is_null() {
            ProcessParameters::default()
        } else {
            serde_json::from_value(parameters.clone())
                .map_err(|e| MlError::invalid_input(format!("Invalid parameters: {e}")))?
        };

        Ok(match operation {
            "aggregate" => Self::Aggregate {
                group_by: params.group_by,
            },
            "filter" => Self::Filter {
                min_value: params.min_value,
                max_value: params.max_value,
            },
            _ => Self::Validate {
                min_value: params.min_value,
                max_value: params.max_value,
            },
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Aggregate { .. } => "aggregate",
            Self::Filter { .. } => "filter",
            Self::Validate { .. } => "validate",
        }
    }

    /// Apply the operation to already-sanitized records.
    pub fn apply(&self, data: Vec<Record>) -> MlResult<Vec<Record>> {
        let has_value = observed_fields(&data).iter().any(|f| f == VALUE_COLUMN);
        match self {
            Self::Aggregate { group_by } => {
                if !group_by.is_empty() {
                    validate_required_fields(&data, group_by)?;
                }
                if !group_by.is_empty() && has_value {
                    group_sum(&data, group_by)
                } else {
                    Ok(describe(&data))
                }
            }
            Self::Filter {
                min_value,
                max_value,
            } => {
                if has_value && (min_value.is_some() || max_value.is_some()) {
                    Ok(data
                        .into_iter()
                        .filter(|r| {
                            r.get(VALUE_COLUMN)
                                .and_then(Value::as_f64)
                                .is_some_and(|v| {
                                    validate_numeric_range(v, *min_value, *max_value).is_ok()
                                })
                        })
                        .collect())
                } else {
                    Ok(data)
                }
            }
            Self::Validate {
                min_value,
                max_value,
            } => {
                if has_value {
                    for (row, record) in data.iter().enumerate() {
                        match record.get(VALUE_COLUMN) {
                            Some(Value::Number(v)) => {
                                validate_numeric_range(*v, *min_value, *max_value)?
                            }
                            Some(other) => {
                                return Err(MlError::invalid_input(format!(
                                    "Row {row}: '{VALUE_COLUMN}' is {}, expected number",
                                    other.type_name()
                                )));
                            }
                            None => {}
                        }
                    }
                }
                Ok(data)
            }
        }
    }
}

/// Result of a processing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessOutcome {
    pub processed_data: Vec<Record>,
    pub input_records: usize,
    pub output_records: usize,
    pub duration_secs: f64,
    pub operation: String,
}

/// Sanitize the request records and run the requested operation.
pub fn process(request: &ProcessRequest) -> MlResult<ProcessOutcome> {
    let start = std::time::Instant::now();
    let operation = ProcessOperation::parse(&request.operation, &request.parameters)?;
    let sanitized = sanitize_dataset(&request.data);
    let processed_data = operation.apply(sanitized)?;

    Ok(ProcessOutcome {
        input_records: request.data.len(),
        output_records: processed_data.len(),
        processed_data,
        duration_secs: start.elapsed().as_secs_f64(),
        operation: operation.name().to_string(),
    })
}

/// Sum `value` per distinct group key, keys sorted ascending.
///
/// Records lacking any group key are left out of the result.
fn group_sum(data: &[Record], group_by: &[String]) -> MlResult<Vec<Record>> {
    let mut keyed: Vec<(Vec<Value>, f64)> = Vec::with_capacity(data.len());

    for (row, record) in data.iter().enumerate() {
        let key: Option<Vec<Value>> = group_by.iter().map(|g| record.get(g).cloned()).collect();
        let Some(key) = key else { continue };

        let amount = match record.get(VALUE_COLUMN) {
            Some(Value::Number(v)) => *v,
            None => 0.0,
            Some(other) => {
                return Err(MlError::invalid_input(format!(
                    "Row {row}: cannot sum {} '{VALUE_COLUMN}'",
                    other.type_name()
                )));
            }
        };
        keyed.push((key, amount));
    }

    // Stable sort keeps equal keys adjacent in input order, so one pass folds them.
    keyed.sort_by(|(a, _), (b, _)| compare_keys(a, b));

    let mut groups: Vec<(Vec<Value>, f64)> = Vec::new();
    for (key, amount) in keyed {
        match groups.last_mut() {
            Some((last, total)) if compare_keys(last, &key) == Ordering::Equal => *total += amount,
            _ => groups.push((key, amount)),
        }
    }

    Ok(groups
        .into_iter()
        .map(|(key, total)| {
            let mut out: Record = group_by.iter().cloned().zip(key).collect();
            out.insert(VALUE_COLUMN, total);
            out
        })
        .collect())
}

fn compare_keys(a: &[Value], b: &[Value]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| compare_values(x, y))
        .find(|o| *o != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Bool(_) => 0,
            Value::Number(_) => 1,
            Value::Text(_) => 2,
            Value::Null => 3,
        }
    }
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => x.total_cmp(y),
        (Value::Text(x), Value::Text(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

const STATISTICS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Descriptive statistics of every numeric column, one record per statistic.
fn describe(data: &[Record]) -> Vec<Record> {
    let columns: Vec<String> = observed_fields(data)
        .into_iter()
        .filter(|c| is_numeric_column(data, c))
        .collect();
    if columns.is_empty() {
        return Vec::new();
    }

    let summaries: Vec<(String, [Value; 8])> = columns
        .into_iter()
        .map(|c| {
            let values: Vec<f64> = data
                .iter()
                .filter_map(|r| r.get(&c).and_then(Value::as_f64))
                .collect();
            let stats = summarize(values);
            (c, stats)
        })
        .collect();

    STATISTICS
        .iter()
        .enumerate()
        .map(|(i, stat)| {
            let mut out = Record::new();
            out.insert("statistic", *stat);
            for (column, stats) in &summaries {
                out.insert(column.clone(), stats[i].clone());
            }
            out
        })
        .collect()
}

fn summarize(mut values: Vec<f64>) -> [Value; 8] {
    values.sort_by(f64::total_cmp);
    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let std = if n > 1 {
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        Value::Number(var.sqrt())
    } else {
        Value::Null
    };
    [
        Value::Number(n as f64),
        Value::Number(mean),
        std,
        Value::Number(values[0]),
        Value::Number(quantile(&values, 0.25)),
        Value::Number(quantile(&values, 0.5)),
        Value::Number(quantile(&values, 0.75)),
        Value::Number(values[n - 1]),
    ]
}

/// Linear-interpolation quantile of sorted, non-empty values.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}
