//! Inclusive numeric range validation.

use crate::config::ValidationConfig;
use crate::error::{BoundKind, MlError, MlResult};

/// Check that `value` lies within the inclusive `[min, max]` range.
///
/// A bound of `None` imposes no constraint on that side.
pub fn validate_numeric_range(value: f64, min: Option<f64>, max: Option<f64>) -> MlResult<()> {
    if let Some(bound) = min {
        if value < bound {
            return Err(MlError::Range {
                value,
                bound,
                kind: BoundKind::Lower,
            });
        }
    }
    if let Some(bound) = max {
        if value > bound {
            return Err(MlError::Range {
                value,
                bound,
                kind: BoundKind::Upper,
            });
        }
    }
    Ok(())
}

/// A fixed pair of bounds applied to many values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeValidator {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl RangeValidator {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn check(&self, value: f64) -> MlResult<()> {
        validate_numeric_range(value, self.min, self.max)
    }
}

impl From<&ValidationConfig> for RangeValidator {
    fn from(config: &ValidationConfig) -> Self {
        Self::new(Some(config.min_value), Some(config.max_value))
    }
}

impl Default for RangeValidator {
    fn default() -> Self {
        Self::from(&ValidationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_within_bounds() {
        assert!(validate_numeric_range(15.0, Some(10.0), Some(20.0)).is_ok());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(validate_numeric_range(10.0, Some(10.0), Some(20.0)).is_ok());
        assert!(validate_numeric_range(20.0, Some(10.0), Some(20.0)).is_ok());
    }

    #[test]
    fn test_value_above_upper_bound() {
        let err = validate_numeric_range(25.0, Some(10.0), Some(20.0)).unwrap_err();
        assert_eq!(
            err,
            MlError::Range {
                value: 25.0,
                bound: 20.0,
                kind: BoundKind::Upper,
            }
        );
    }

    #[test]
    fn test_value_below_lower_bound() {
        let err = validate_numeric_range(5.0, Some(10.0), None).unwrap_err();
        assert!(matches!(
            err,
            MlError::Range {
                kind: BoundKind::Lower,
                ..
            }
        ));
    }

    #[test]
    fn test_unbounded() {
        assert!(validate_numeric_range(f64::MAX, None, None).is_ok());
    }

    #[test]
    fn test_default_validator_uses_universal_bound() {
        let validator = RangeValidator::default();
        assert!(validator.check(1_000_000.0).is_ok());
        assert!(validator.check(-1_000_000.0).is_ok());
        assert!(validator.check(1_000_000.5).is_err());
    }
}
