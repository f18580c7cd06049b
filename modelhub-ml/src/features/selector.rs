//! Feature column resolution.

use crate::data::{Record, is_numeric_column, observed_fields};
use crate::error::{MlError, MlResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Ordered, duplicate-free list of feature columns a model consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSpec(Vec<String>);

impl FeatureSpec {
    /// Build a spec, keeping the first occurrence of any repeated name.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let columns = columns
            .into_iter()
            .map(Into::into)
            .filter(|c: &String| seen.insert(c.clone()))
            .collect();
        Self(columns)
    }

    pub fn columns(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

/// Resolve the feature columns for a sanitized dataset.
///
/// A non-empty `explicit` list is used as given. Otherwise every observed
/// field except `target` whose values are all numbers is selected, in order of
/// first appearance.
pub fn select_features(
    data: &[Record],
    target: Option<&str>,
    explicit: Option<&[String]>,
) -> MlResult<FeatureSpec> {
    let spec = match explicit {
        Some(columns) if !columns.is_empty() => FeatureSpec::new(columns.iter().cloned()),
        _ => FeatureSpec::new(
            observed_fields(data)
                .into_iter()
                .filter(|c| Some(c.as_str()) != target)
                .filter(|c| is_numeric_column(data, c)),
        ),
    };

    if spec.is_empty() {
        return Err(MlError::EmptyFeatureSet);
    }
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Value;
    use pretty_assertions::assert_eq;

    fn dataset() -> Vec<Record> {
        vec![
            [
                ("feature1", Value::Number(1.0)),
                ("feature2", Value::Number(2.0)),
                ("name", Value::Text("a".into())),
                ("target", Value::Number(0.0)),
            ]
            .into_iter()
            .collect(),
            [
                ("feature1", Value::Number(2.0)),
                ("feature2", Value::Number(3.0)),
                ("name", Value::Text("b".into())),
                ("target", Value::Number(1.0)),
            ]
            .into_iter()
            .collect(),
        ]
    }

    #[test]
    fn test_auto_selection_excludes_target_and_text() {
        let spec = select_features(&dataset(), Some("target"), None).unwrap();
        assert_eq!(spec.columns(), &["feature1".to_string(), "feature2".to_string()]);
    }

    #[test]
    fn test_explicit_list_used_verbatim() {
        let explicit = vec!["feature2".to_string(), "feature1".to_string()];
        let spec = select_features(&dataset(), Some("target"), Some(explicit.as_slice())).unwrap();
        assert_eq!(spec.columns(), explicit.as_slice());
    }

    #[test]
    fn test_empty_explicit_list_falls_back_to_auto() {
        let explicit: Vec<String> = Vec::new();
        let spec = select_features(&dataset(), Some("target"), Some(explicit.as_slice())).unwrap();
        assert_eq!(spec.len(), 2);
    }

    #[test]
    fn test_no_numeric_features() {
        let data: Vec<Record> = vec![
            [("name", Value::Text("a".into())), ("target", Value::Number(1.0))]
                .into_iter()
                .collect(),
        ];
        let err = select_features(&data, Some("target"), None).unwrap_err();
        assert_eq!(err, MlError::EmptyFeatureSet);
    }

    #[test]
    fn test_spec_dedupes() {
        let spec = FeatureSpec::new(["a", "b", "a"]);
        assert_eq!(spec.columns(), &["a".to_string(), "b".to_string()]);
    }
}
