//! Decision tree components.

pub mod cart;

pub use cart::{DecisionTreeClassifier, DecisionTreeConfig};
