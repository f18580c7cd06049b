//! Classification algorithms.

pub mod forest;
pub mod tree;

pub use forest::RandomForest;
pub use tree::{DecisionTree, TreeNode, TreeParams};
