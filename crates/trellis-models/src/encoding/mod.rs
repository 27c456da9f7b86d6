//! Encoding transformers.

pub mod one_hot;

pub use one_hot::{OneHotConfig, OneHotEncoder};
