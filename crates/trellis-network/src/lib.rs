#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/trellis-ml/trellis/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod composite;
pub mod error;
pub mod machine;
pub mod network;
pub mod node;
pub mod ops;
pub mod value;

pub use composite::CompositeModel;
pub use error::{NetworkError, Result};
pub use machine::{Machine, Model};
pub use network::Network;
pub use node::{MachineId, Node, NodeId};
pub use ops::FrameOp;
pub use value::{Value, ValueKind};
