//! Composite models: a learning network exported as a single model.
//!
//! A [`CompositeModel`] fixes which source takes the feature table, which
//! takes the target table, and which node is the output. From the outside it
//! fits and predicts like any single model; inside, fitting trains every
//! component machine and predicting evaluates only the output's ancestors.

use crate::error::{NetworkError, Result};
use crate::machine::{Machine, Model};
use crate::network::Network;
use crate::node::{MachineId, NodeId};
use crate::value::{Value, ValueKind};
use polars::prelude::DataFrame;

/// A learning network packaged behind a fit/predict surface.
#[derive(Debug)]
pub struct CompositeModel {
    network: Network,
    x: NodeId,
    y: NodeId,
    output: NodeId,
}

impl CompositeModel {
    /// Package a network with its feature source, target source and output
    /// node.
    ///
    /// The sources must be source nodes of the given network and the output
    /// must produce a frame when evaluated.
    pub fn new(network: Network, x: NodeId, y: NodeId, output: NodeId) -> Result<Self> {
        for id in [x, y] {
            if !network.node(id)?.is_source() {
                return Err(NetworkError::InvalidBinding(format!(
                    "node '{}' is not a source",
                    network.node(id)?.name
                )));
            }
        }
        network.node(output)?;
        Ok(Self {
            network,
            x,
            y,
            output,
        })
    }

    /// Train every unfitted machine in the network.
    ///
    /// Feature and target tables must have the same number of rows.
    pub fn fit(&mut self, x: &DataFrame, y: &DataFrame) -> Result<()> {
        if x.height() != y.height() {
            return Err(NetworkError::Data(trellis_data::DataError::RowMisaligned {
                expected: x.height(),
                actual: y.height(),
            }));
        }
        log::info!("fitting composite model on {} rows", x.height());
        self.network.fit(&[
            (self.x, Value::Frame(x.clone())),
            (self.y, Value::Frame(y.clone())),
        ])
    }

    /// Predict the output frame for new features.
    pub fn predict(&self, x: &DataFrame) -> Result<DataFrame> {
        let value = self
            .network
            .evaluate(self.output, &[(self.x, Value::Frame(x.clone()))])?;
        match value {
            Value::Frame(df) => Ok(df),
            other => Err(NetworkError::ValueKind {
                node: self.network.node(self.output)?.name.clone(),
                expected: ValueKind::Frame.to_string(),
                actual: other.kind().to_string(),
            }),
        }
    }

    /// Replace a component model, invalidating everything downstream.
    ///
    /// The next [`CompositeModel::fit`] retrains only the stale machines.
    pub fn update_model(&mut self, id: MachineId, model: Model) -> Result<()> {
        self.network.set_model(id, model)
    }

    /// Look up a machine id by name.
    pub fn machine_named(&self, name: &str) -> Option<MachineId> {
        self.network.machine_named(name)
    }

    /// Whether every machine in the network is fitted.
    pub fn is_fitted(&self) -> bool {
        (0..self.network.machine_count())
            .all(|m| self.network.machine_ref(MachineId(m)).is_ok_and(Machine::is_fitted))
    }

    /// Borrow the wrapped network.
    pub const fn network(&self) -> &Network {
        &self.network
    }
}
