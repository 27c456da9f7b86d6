#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/trellis-ml/trellis/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod composites;

// Re-export main types from sub-crates
pub use trellis_data as data;
pub use trellis_models as models;
pub use trellis_network as network;
pub use trellis_output as output;

pub use composites::{ThreeTargetMachines, three_target_composite};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
