//! Node arena types.

use crate::ops::FrameOp;
use derive_more::Display;

/// Index of a node in its owning network's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("n{_0}")]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Raw arena index.
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Index of a machine in its owning network's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("m{_0}")]
pub struct MachineId(pub(crate) usize);

impl MachineId {
    /// Raw arena index.
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A named node in the network graph.
#[derive(Debug)]
pub struct Node {
    /// Node name, unique within the network by convention
    pub name: String,
    pub(crate) kind: NodeKind,
}

/// What a node computes.
#[derive(Debug)]
pub(crate) enum NodeKind {
    /// Named input slot bound at fit/evaluate time
    Source,
    /// Pure frame operation over one upstream node
    Op { op: FrameOp, input: NodeId },
    /// Prediction of a supervised machine on an upstream node
    Predict { machine: MachineId, input: NodeId },
    /// Transform of an unsupervised machine on an upstream node
    Transform { machine: MachineId, input: NodeId },
    /// Pack named upstream values into one output frame
    Merge { inputs: Vec<(String, NodeId)> },
}

impl Node {
    /// Whether the node is an input slot.
    pub const fn is_source(&self) -> bool {
        matches!(self.kind, NodeKind::Source)
    }

    /// Upstream node ids this node reads directly.
    ///
    /// For machine-backed nodes this covers only the prediction input; the
    /// machine's training inputs are tracked by the network itself.
    pub(crate) fn inputs(&self) -> Vec<NodeId> {
        match &self.kind {
            NodeKind::Source => Vec::new(),
            NodeKind::Op { input, .. }
            | NodeKind::Predict { input, .. }
            | NodeKind::Transform { input, .. } => vec![*input],
            NodeKind::Merge { inputs } => inputs.iter().map(|(_, id)| *id).collect(),
        }
    }
}
