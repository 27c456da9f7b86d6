#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/trellis-ml/trellis/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod convert;
pub mod error;
pub mod frame;
pub mod scitype;
pub mod synthetic;

pub use convert::{
    frame_labels, frame_reals, labels_column, matrix_to_frame, reals_column, to_labels, to_matrix,
    to_reals,
};
pub use error::{DataError, Result};
pub use frame::{
    hstack_frames, merge_columns, rename_columns, select_columns, select_range, split_groups,
};
pub use scitype::{SciType, check_scitypes, columns_with_scitype, frame_scitypes, scitype_of};
pub use synthetic::{SyntheticConfig, SyntheticDataset, generate, train_test_split};
