#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/trellis-ml/trellis/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod encoding;
pub mod error;
pub mod linear;
pub mod registry;
pub mod svm;
pub mod traits;
pub mod tree;

pub use encoding::{OneHotConfig, OneHotEncoder};
pub use error::{ModelError, Result};
pub use linear::{RidgeConfig, RidgeRegressor};
pub use registry::{ModelInfo, ModelKind, available_models, get_model_info, models_by_kind};
pub use svm::{LinearSvc, LinearSvcConfig};
pub use traits::{
    Classifier, Encoder, FittedClassifier, FittedEncoder, FittedRegressor, Regressor,
};
pub use tree::{DecisionTreeClassifier, DecisionTreeConfig};
