//! Record model and the input-side pipeline stages: sanitization, schema and
//! range validation, plus the tabular processing operations.

pub mod process;
pub mod record;
pub mod sanitize;
pub mod schema;
pub mod validate;

pub use process::{ProcessOperation, ProcessOutcome, ProcessRequest, process};
pub use record::{Dataset, Record, Value, observed_fields};
pub use sanitize::{normalize_field_name, sanitize_dataset, sanitize_record};
pub use schema::{ColumnType, infer_column_type, is_numeric_column, validate_required_fields};
pub use validate::{RangeValidator, validate_numeric_range};
