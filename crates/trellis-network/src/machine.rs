//! Machines: component models bound to their training inputs.

use crate::error::{NetworkError, Result};
use crate::node::NodeId;
use crate::value::{Value, ValueKind};
use std::fmt;
use trellis_data::to_matrix;
use trellis_models::{
    Classifier, Encoder, FittedClassifier, FittedEncoder, FittedRegressor, Regressor,
};

/// A component model, boxed behind its trait seam.
pub enum Model {
    /// Predicts labels
    Classifier(Box<dyn Classifier>),
    /// Predicts reals
    Regressor(Box<dyn Regressor>),
    /// Transforms frames
    Encoder(Box<dyn Encoder>),
}

impl Model {
    /// Component name, as listed in the registry.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Classifier(m) => m.name(),
            Self::Regressor(m) => m.name(),
            Self::Encoder(m) => m.name(),
        }
    }

    /// Whether the model needs a target node to train.
    pub const fn is_supervised(&self) -> bool {
        !matches!(self, Self::Encoder(_))
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Classifier(_) => "Classifier",
            Self::Regressor(_) => "Regressor",
            Self::Encoder(_) => "Encoder",
        };
        write!(f, "Model::{kind}({})", self.name())
    }
}

/// Fitted state of a machine.
pub(crate) enum Fitted {
    Classifier(Box<dyn FittedClassifier>),
    Regressor(Box<dyn FittedRegressor>),
    Encoder(Box<dyn FittedEncoder>),
}

impl fmt::Debug for Fitted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Classifier(_) => "Classifier",
            Self::Regressor(_) => "Regressor",
            Self::Encoder(_) => "Encoder",
        };
        write!(f, "Fitted::{kind}")
    }
}

/// A model bound to the nodes that feed its training.
#[derive(Debug)]
pub struct Machine {
    /// Machine name, unique within the network by convention
    pub name: String,
    pub(crate) model: Model,
    pub(crate) x: NodeId,
    pub(crate) y: Option<NodeId>,
    pub(crate) fitted: Option<Fitted>,
}

impl Machine {
    /// Whether the machine has been trained.
    pub const fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// The bound model.
    pub const fn model(&self) -> &Model {
        &self.model
    }

    /// Train the machine from resolved input values.
    pub(crate) fn fit(&mut self, x: &Value, y: Option<&Value>) -> Result<()> {
        let frame = x.as_frame().ok_or_else(|| NetworkError::ValueKind {
            node: self.name.clone(),
            expected: ValueKind::Frame.to_string(),
            actual: x.kind().to_string(),
        })?;

        let fitted = match &self.model {
            Model::Classifier(model) => {
                let labels = y
                    .and_then(Value::as_labels)
                    .ok_or_else(|| self.target_error(y, ValueKind::Labels))?;
                let matrix = to_matrix(frame)?;
                Fitted::Classifier(model.fit(&matrix, labels)?)
            }
            Model::Regressor(model) => {
                let reals = y
                    .and_then(Value::as_reals)
                    .ok_or_else(|| self.target_error(y, ValueKind::Reals))?;
                let matrix = to_matrix(frame)?;
                Fitted::Regressor(model.fit(&matrix, reals)?)
            }
            Model::Encoder(model) => Fitted::Encoder(model.fit(frame)?),
        };
        log::info!("trained machine '{}' ({})", self.name, self.model.name());
        self.fitted = Some(fitted);
        Ok(())
    }

    /// Apply the fitted machine to a resolved input value.
    pub(crate) fn apply(&self, input: &Value) -> Result<Value> {
        let fitted = self
            .fitted
            .as_ref()
            .ok_or_else(|| NetworkError::MachineNotFitted(self.name.clone()))?;
        let frame = input.as_frame().ok_or_else(|| NetworkError::ValueKind {
            node: self.name.clone(),
            expected: ValueKind::Frame.to_string(),
            actual: input.kind().to_string(),
        })?;

        let out = match fitted {
            Fitted::Classifier(model) => {
                let matrix = to_matrix(frame)?;
                Value::Labels(model.predict(&matrix)?)
            }
            Fitted::Regressor(model) => {
                let matrix = to_matrix(frame)?;
                Value::Reals(model.predict(&matrix)?)
            }
            Fitted::Encoder(model) => Value::Frame(model.transform(frame)?),
        };
        Ok(out)
    }

    fn target_error(&self, y: Option<&Value>, expected: ValueKind) -> NetworkError {
        match y {
            Some(value) => NetworkError::ValueKind {
                node: self.name.clone(),
                expected: expected.to_string(),
                actual: value.kind().to_string(),
            },
            None => NetworkError::MachineKind {
                machine: self.name.clone(),
                reason: "supervised model bound without a target node".to_string(),
            },
        }
    }
}
