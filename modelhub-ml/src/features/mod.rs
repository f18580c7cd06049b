//! Feature resolution, matrix extraction and standardization.

pub mod matrix;
pub mod scaler;
pub mod selector;

pub use matrix::{FeatureMatrix, build_matrix};
pub use scaler::StandardScaler;
pub use selector::{FeatureSpec, select_features};
