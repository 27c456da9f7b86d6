//! The learning network graph.
//!
//! Nodes and machines live in arenas owned by the `Network` and are
//! referenced by index ids, so the graph needs no reference counting and no
//! interior mutability. Fitting walks the graph in dependency order and
//! trains each machine the first time its output is needed; machines that
//! are already fitted are left alone, which is what makes hyperparameter
//! replay cheap: [`Network::set_model`] clears the fitted state of one
//! machine and everything downstream of it, and the next fit retrains only
//! that stale region.

use crate::error::{NetworkError, Result};
use crate::machine::{Machine, Model};
use crate::node::{MachineId, Node, NodeId, NodeKind};
use crate::ops::FrameOp;
use crate::value::Value;
use polars::prelude::Column;
use trellis_data::{labels_column, merge_columns, reals_column};

/// A directed acyclic graph of named, lazily-evaluated operations.
#[derive(Debug, Default)]
pub struct Network {
    nodes: Vec<Node>,
    machines: Vec<Machine>,
}

impl Network {
    /// Create an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of machines in the graph.
    pub fn machine_count(&self) -> usize {
        self.machines.len()
    }

    /// Add a named input slot.
    pub fn source(&mut self, name: &str) -> NodeId {
        self.push_node(name, NodeKind::Source)
    }

    /// Add a pure frame operation over an upstream node.
    pub fn op(&mut self, name: &str, op: FrameOp, input: NodeId) -> Result<NodeId> {
        self.check_node(input)?;
        log::debug!("node '{name}': {}", op.describe());
        Ok(self.push_node(name, NodeKind::Op { op, input }))
    }

    /// Bind a model to its training inputs.
    ///
    /// Supervised models require a target node; encoders must not have one.
    pub fn machine(
        &mut self,
        name: &str,
        model: Model,
        x: NodeId,
        y: Option<NodeId>,
    ) -> Result<MachineId> {
        self.check_node(x)?;
        if let Some(y) = y {
            self.check_node(y)?;
        }
        if model.is_supervised() && y.is_none() {
            return Err(NetworkError::MachineKind {
                machine: name.to_string(),
                reason: "supervised model bound without a target node".to_string(),
            });
        }
        if !model.is_supervised() && y.is_some() {
            return Err(NetworkError::MachineKind {
                machine: name.to_string(),
                reason: "encoder bound with a target node".to_string(),
            });
        }
        self.machines.push(Machine {
            name: name.to_string(),
            model,
            x,
            y,
            fitted: None,
        });
        Ok(MachineId(self.machines.len() - 1))
    }

    /// Add a prediction node for a supervised machine.
    pub fn predict(&mut self, name: &str, machine: MachineId, input: NodeId) -> Result<NodeId> {
        self.check_node(input)?;
        let m = self.check_machine(machine)?;
        if !m.model.is_supervised() {
            return Err(NetworkError::MachineKind {
                machine: m.name.clone(),
                reason: "predict node requires a classifier or regressor".to_string(),
            });
        }
        Ok(self.push_node(name, NodeKind::Predict { machine, input }))
    }

    /// Add a transform node for an encoder machine.
    pub fn transform(&mut self, name: &str, machine: MachineId, input: NodeId) -> Result<NodeId> {
        self.check_node(input)?;
        let m = self.check_machine(machine)?;
        if m.model.is_supervised() {
            return Err(NetworkError::MachineKind {
                machine: m.name.clone(),
                reason: "transform node requires an encoder".to_string(),
            });
        }
        Ok(self.push_node(name, NodeKind::Transform { machine, input }))
    }

    /// Add a node that packs named upstream values into one frame.
    ///
    /// Real and label vectors become columns under the given names; frame
    /// inputs contribute all their columns unchanged.
    pub fn merge(&mut self, name: &str, inputs: Vec<(String, NodeId)>) -> Result<NodeId> {
        for (_, id) in &inputs {
            self.check_node(*id)?;
        }
        Ok(self.push_node(name, NodeKind::Merge { inputs }))
    }

    /// Borrow a node.
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes
            .get(id.0)
            .ok_or_else(|| NetworkError::UnknownNode(id.to_string()))
    }

    /// Borrow a machine.
    pub fn machine_ref(&self, id: MachineId) -> Result<&Machine> {
        self.machines
            .get(id.0)
            .ok_or_else(|| NetworkError::UnknownMachine(id.to_string()))
    }

    /// Look up a node id by name.
    pub fn node_named(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name).map(NodeId)
    }

    /// Look up a machine id by name.
    pub fn machine_named(&self, name: &str) -> Option<MachineId> {
        self.machines
            .iter()
            .position(|m| m.name == name)
            .map(MachineId)
    }

    /// Train every machine that is not yet fitted.
    ///
    /// Sources are bound to the given values; the graph is walked in
    /// dependency order and each unfitted machine is trained as soon as its
    /// training inputs are available. Machines that are already fitted keep
    /// their state.
    pub fn fit(&mut self, bindings: &[(NodeId, Value)]) -> Result<()> {
        let mut cache = self.seed_cache(bindings)?;
        let order = self.topo_order()?;

        for idx in order {
            // machine-backed nodes may need to train first, which takes &mut
            let machine_backed = match &self.nodes[idx].kind {
                NodeKind::Predict { machine, input } | NodeKind::Transform { machine, input } => {
                    Some((*machine, *input))
                }
                _ => None,
            };
            if let Some((machine, input)) = machine_backed {
                self.fit_machine_if_ready(machine, &cache)?;
                cache[idx] = match (&self.machines[machine.0].fitted, &cache[input.0]) {
                    (Some(_), Some(value)) => Some(self.machines[machine.0].apply(value)?),
                    _ => None,
                };
                continue;
            }

            cache[idx] = match &self.nodes[idx].kind {
                NodeKind::Source => continue,
                NodeKind::Op { op, input } => match &cache[input.0] {
                    Some(value) => Some(op.apply(&self.nodes[idx].name, value)?),
                    None => None,
                },
                NodeKind::Merge { inputs } => {
                    if inputs.iter().all(|(_, id)| cache[id.0].is_some()) {
                        Some(self.build_merge(inputs, &cache)?)
                    } else {
                        None
                    }
                }
                NodeKind::Predict { .. } | NodeKind::Transform { .. } => unreachable!(),
            };
        }

        // machines without a downstream node still train once their
        // inputs resolve
        for m in 0..self.machines.len() {
            self.fit_machine_if_ready(MachineId(m), &cache)?;
        }

        // every machine must have trained by now
        for machine in &self.machines {
            if machine.fitted.is_none() {
                let missing = std::iter::once(machine.x)
                    .chain(machine.y)
                    .find(|id| cache[id.0].is_none())
                    .map_or_else(|| machine.name.clone(), |id| self.nodes[id.0].name.clone());
                return Err(NetworkError::SourceUnbound(missing));
            }
        }
        Ok(())
    }

    /// Evaluate a node against fresh source bindings.
    ///
    /// Only the node's ancestors are computed. Every machine on the path
    /// must already be fitted.
    pub fn evaluate(&self, target: NodeId, bindings: &[(NodeId, Value)]) -> Result<Value> {
        self.check_node(target)?;
        let mut cache = self.seed_cache(bindings)?;
        let order = self.topo_order()?;
        let needed = self.ancestors(target);

        for idx in order {
            if !needed[idx] {
                continue;
            }
            let node = &self.nodes[idx];
            let value = match &node.kind {
                NodeKind::Source => {
                    if cache[idx].is_none() {
                        return Err(NetworkError::SourceUnbound(node.name.clone()));
                    }
                    continue;
                }
                NodeKind::Op { op, input } => op.apply(&node.name, self.cached(&cache, *input)?)?,
                NodeKind::Predict { machine, input } | NodeKind::Transform { machine, input } => {
                    self.machines[machine.0].apply(self.cached(&cache, *input)?)?
                }
                NodeKind::Merge { inputs } => self.build_merge(inputs, &cache)?,
            };
            cache[idx] = Some(value);
        }

        cache[target.0]
            .take()
            .ok_or_else(|| NetworkError::UnknownNode(target.to_string()))
    }

    /// Swap a machine's model, keeping its wiring.
    ///
    /// The new model must be of the same kind (classifier for classifier,
    /// and so on). The machine's fitted state and the fitted state of every
    /// machine downstream of its output nodes are cleared; the next
    /// [`Network::fit`] retrains exactly that stale region.
    pub fn set_model(&mut self, id: MachineId, model: Model) -> Result<()> {
        let current = self.check_machine(id)?;
        let same_kind = matches!(
            (&current.model, &model),
            (Model::Classifier(_), Model::Classifier(_))
                | (Model::Regressor(_), Model::Regressor(_))
                | (Model::Encoder(_), Model::Encoder(_))
        );
        if !same_kind {
            return Err(NetworkError::MachineKind {
                machine: current.name.clone(),
                reason: "replacement model must be of the same kind".to_string(),
            });
        }
        log::info!(
            "machine '{}': model replaced with {}, invalidating downstream",
            self.machines[id.0].name,
            model.name()
        );
        self.machines[id.0].model = model;
        self.invalidate(id);
        Ok(())
    }

    /// Clear all fitted state, forcing the next fit to retrain everything.
    pub fn reset(&mut self) {
        for machine in &mut self.machines {
            machine.fitted = None;
        }
    }

    fn push_node(&mut self, name: &str, kind: NodeKind) -> NodeId {
        self.nodes.push(Node {
            name: name.to_string(),
            kind,
        });
        NodeId(self.nodes.len() - 1)
    }

    fn check_node(&self, id: NodeId) -> Result<()> {
        if id.0 >= self.nodes.len() {
            return Err(NetworkError::UnknownNode(id.to_string()));
        }
        Ok(())
    }

    fn check_machine(&self, id: MachineId) -> Result<&Machine> {
        self.machines
            .get(id.0)
            .ok_or_else(|| NetworkError::UnknownMachine(id.to_string()))
    }

    fn seed_cache(&self, bindings: &[(NodeId, Value)]) -> Result<Vec<Option<Value>>> {
        let mut cache: Vec<Option<Value>> = (0..self.nodes.len()).map(|_| None).collect();
        for (id, value) in bindings {
            self.check_node(*id)?;
            if !self.nodes[id.0].is_source() {
                return Err(NetworkError::InvalidBinding(format!(
                    "node '{}' is not a source",
                    self.nodes[id.0].name
                )));
            }
            cache[id.0] = Some(value.clone());
        }
        Ok(cache)
    }

    fn cached<'a>(&self, cache: &'a [Option<Value>], id: NodeId) -> Result<&'a Value> {
        cache[id.0]
            .as_ref()
            .ok_or_else(|| NetworkError::SourceUnbound(self.nodes[id.0].name.clone()))
    }

    /// All upstream dependencies of a node, including the training inputs of
    /// any machine it applies.
    fn deps(&self, idx: usize) -> Vec<usize> {
        let mut deps: Vec<usize> = self.nodes[idx].inputs().iter().map(|id| id.0).collect();
        if let NodeKind::Predict { machine, .. } | NodeKind::Transform { machine, .. } =
            &self.nodes[idx].kind
        {
            let m = &self.machines[machine.0];
            deps.push(m.x.0);
            if let Some(y) = m.y {
                deps.push(y.0);
            }
        }
        deps
    }

    /// Builder methods only accept already-created ids, so every dependency
    /// has a smaller index and index order is a topological order. A
    /// dependency at or past its consumer means the arena was tampered with.
    fn topo_order(&self) -> Result<Vec<usize>> {
        for idx in 0..self.nodes.len() {
            if self.deps(idx).into_iter().any(|dep| dep >= idx) {
                return Err(NetworkError::CycleDetected);
            }
        }
        Ok((0..self.nodes.len()).collect())
    }

    /// Flags for which nodes feed the target, the target included.
    ///
    /// Follows only runtime inputs: a machine's training inputs matter at
    /// fit time, not when applying the already-fitted machine.
    fn ancestors(&self, target: NodeId) -> Vec<bool> {
        let mut needed = vec![false; self.nodes.len()];
        let mut stack = vec![target.0];
        while let Some(idx) = stack.pop() {
            if needed[idx] {
                continue;
            }
            needed[idx] = true;
            stack.extend(self.nodes[idx].inputs().iter().map(|id| id.0));
        }
        needed
    }

    fn fit_machine_if_ready(&mut self, id: MachineId, cache: &[Option<Value>]) -> Result<()> {
        if self.machines[id.0].is_fitted() {
            return Ok(());
        }
        let x = self.machines[id.0].x;
        let y = self.machines[id.0].y;
        let Some(x_value) = cache[x.0].clone() else {
            return Ok(()); // inputs not resolved yet; the final check reports it
        };
        let y_value = match y {
            Some(y) => match cache[y.0].clone() {
                Some(value) => Some(value),
                None => return Ok(()),
            },
            None => None,
        };
        self.machines[id.0].fit(&x_value, y_value.as_ref())
    }

    fn build_merge(&self, inputs: &[(String, NodeId)], cache: &[Option<Value>]) -> Result<Value> {
        let mut columns: Vec<Column> = Vec::with_capacity(inputs.len());
        for (name, id) in inputs {
            match self.cached(cache, *id)? {
                Value::Reals(values) => columns.push(reals_column(name, values)),
                Value::Labels(values) => columns.push(labels_column(name, values)),
                Value::Frame(df) => columns.extend_from_slice(df.get_columns()),
            }
        }
        Ok(Value::Frame(merge_columns(columns)?))
    }

    /// Clear fitted state of the machine and everything downstream of it.
    fn invalidate(&mut self, target: MachineId) {
        self.machines[target.0].fitted = None;

        let n = self.nodes.len();
        let mut stale_node = vec![false; n];
        let mut stale_machine: Vec<Option<bool>> = vec![None; self.machines.len()];
        stale_machine[target.0] = Some(true);

        // ids are creation-ordered: a machine's training inputs and a node's
        // inputs always precede it, so one ascending pass settles staleness
        for idx in 0..n {
            stale_node[idx] = match &self.nodes[idx].kind {
                NodeKind::Source => false,
                NodeKind::Op { input, .. } => stale_node[input.0],
                NodeKind::Merge { inputs } => inputs.iter().any(|(_, id)| stale_node[id.0]),
                NodeKind::Predict { machine, input } | NodeKind::Transform { machine, input } => {
                    let m = machine.0;
                    let machines = &self.machines;
                    let is_stale = *stale_machine[m].get_or_insert_with(|| {
                        let mach = &machines[m];
                        stale_node[mach.x.0] || mach.y.is_some_and(|y| stale_node[y.0])
                    });
                    is_stale || stale_node[input.0]
                }
            };
        }

        for (m, stale) in stale_machine.iter_mut().enumerate() {
            let mach = &self.machines[m];
            let is_stale = *stale.get_or_insert_with(|| {
                stale_node[mach.x.0] || mach.y.is_some_and(|y| stale_node[y.0])
            });
            if is_stale {
                self.machines[m].fitted = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;
    use trellis_models::{DecisionTreeClassifier, OneHotEncoder, RidgeConfig, RidgeRegressor};

    fn features() -> DataFrame {
        DataFrame::new(vec![
            Column::new("x1".into(), vec![0.0_f64, 0.1, 1.0, 1.1]),
            Column::new("x2".into(), vec![1.0_f64, 2.0, 3.0, 4.0]),
        ])
        .unwrap()
    }

    fn targets() -> DataFrame {
        DataFrame::new(vec![
            Column::new("class".into(), vec!["a", "a", "b", "b"]),
            Column::new("amount".into(), vec![2.0_f64, 4.0, 6.0, 8.0]),
        ])
        .unwrap()
    }

    /// Two machines reading different target columns from one source.
    fn two_machine_network() -> (Network, NodeId, NodeId, NodeId, MachineId) {
        let mut net = Network::new();
        let x = net.source("x");
        let y = net.source("y");
        let x1 = net
            .op("x1", FrameOp::SelectNames(vec!["x1".to_string()]), x)
            .unwrap();
        let x2 = net
            .op("x2", FrameOp::SelectNames(vec!["x2".to_string()]), x)
            .unwrap();
        let class = net
            .op("class", FrameOp::ExtractLabels("class".to_string()), y)
            .unwrap();
        let amount = net
            .op("amount", FrameOp::ExtractReals("amount".to_string()), y)
            .unwrap();

        let tree = net
            .machine(
                "tree",
                Model::Classifier(Box::new(DecisionTreeClassifier::default())),
                x1,
                Some(class),
            )
            .unwrap();
        let ridge = net
            .machine(
                "ridge",
                Model::Regressor(Box::new(
                    RidgeRegressor::new(RidgeConfig {
                        lambda: 1e-8,
                        fit_intercept: true,
                    })
                    .unwrap(),
                )),
                x2,
                Some(amount),
            )
            .unwrap();

        let class_hat = net.predict("class_hat", tree, x1).unwrap();
        let amount_hat = net.predict("amount_hat", ridge, x2).unwrap();
        let out = net
            .merge(
                "out",
                vec![
                    ("class".to_string(), class_hat),
                    ("amount".to_string(), amount_hat),
                ],
            )
            .unwrap();
        (net, x, y, out, ridge)
    }

    #[test]
    fn test_fit_and_evaluate() {
        let (mut net, x, y, out, _) = two_machine_network();
        net.fit(&[(x, features().into()), (y, targets().into())])
            .unwrap();

        let value = net.evaluate(out, &[(x, features().into())]).unwrap();
        let df = value.as_frame().unwrap();
        assert_eq!(df.height(), 4);
        let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["class", "amount"]);

        let classes = df.column("class").unwrap().str().unwrap();
        assert_eq!(classes.get(0), Some("a"));
        assert_eq!(classes.get(3), Some("b"));
    }

    #[test]
    fn test_evaluate_needs_only_runtime_sources() {
        // once fitted, prediction must not require the target source
        let (mut net, x, y, _, _) = two_machine_network();
        net.fit(&[(x, features().into()), (y, targets().into())])
            .unwrap();

        let class_hat = net.node_named("class_hat").unwrap();
        let value = net.evaluate(class_hat, &[(x, features().into())]).unwrap();
        let labels = value.as_labels().unwrap();
        assert_eq!(labels.len(), 4);
        assert_eq!(labels[0], "a");
        assert_eq!(labels[3], "b");
    }

    #[test]
    fn test_machine_without_consumer_still_fits() {
        let mut net = Network::new();
        let x = net.source("x");
        let y = net.source("y");
        let class = net
            .op("class", FrameOp::ExtractLabels("class".to_string()), y)
            .unwrap();
        let tree = net
            .machine(
                "tree",
                Model::Classifier(Box::new(DecisionTreeClassifier::default())),
                x,
                Some(class),
            )
            .unwrap();

        net.fit(&[(x, features().into()), (y, targets().into())])
            .unwrap();
        assert!(net.machine_ref(tree).unwrap().is_fitted());
    }

    #[test]
    fn test_evaluate_before_fit_fails() {
        let (net, x, _, out, _) = two_machine_network();
        let err = net.evaluate(out, &[(x, features().into())]).unwrap_err();
        assert!(matches!(err, NetworkError::MachineNotFitted(_)));
    }

    #[test]
    fn test_fit_with_unbound_source_fails() {
        let (mut net, x, _, _, _) = two_machine_network();
        let err = net.fit(&[(x, features().into())]).unwrap_err();
        assert!(matches!(err, NetworkError::SourceUnbound(_)));
    }

    #[test]
    fn test_binding_non_source_rejected() {
        let (mut net, _, y, out, _) = two_machine_network();
        let err = net
            .fit(&[(out, features().into()), (y, targets().into())])
            .unwrap_err();
        assert!(matches!(err, NetworkError::InvalidBinding(_)));
    }

    #[test]
    fn test_set_model_invalidates_only_downstream() {
        let (mut net, x, y, _, ridge) = two_machine_network();
        net.fit(&[(x, features().into()), (y, targets().into())])
            .unwrap();
        assert!(net.machine_ref(ridge).unwrap().is_fitted());

        net.set_model(
            ridge,
            Model::Regressor(Box::new(
                RidgeRegressor::new(RidgeConfig {
                    lambda: 10.0,
                    fit_intercept: true,
                })
                .unwrap(),
            )),
        )
        .unwrap();

        assert!(!net.machine_ref(ridge).unwrap().is_fitted());
        let tree = net.machine_named("tree").unwrap();
        assert!(
            net.machine_ref(tree).unwrap().is_fitted(),
            "unrelated machine must keep its fitted state"
        );

        // replay trains only the stale machine
        net.fit(&[(x, features().into()), (y, targets().into())])
            .unwrap();
        assert!(net.machine_ref(ridge).unwrap().is_fitted());
    }

    #[test]
    fn test_set_model_rejects_kind_change() {
        let (mut net, _, _, _, ridge) = two_machine_network();
        let err = net
            .set_model(
                ridge,
                Model::Classifier(Box::new(DecisionTreeClassifier::default())),
            )
            .unwrap_err();
        assert!(matches!(err, NetworkError::MachineKind { .. }));
    }

    #[test]
    fn test_encoder_machine_rejects_target() {
        let mut net = Network::new();
        let x = net.source("x");
        let y = net.source("y");
        let err = net
            .machine(
                "enc",
                Model::Encoder(Box::new(OneHotEncoder::default())),
                x,
                Some(y),
            )
            .unwrap_err();
        assert!(matches!(err, NetworkError::MachineKind { .. }));
    }

    #[test]
    fn test_predict_node_rejects_encoder() {
        let mut net = Network::new();
        let x = net.source("x");
        let enc = net
            .machine("enc", Model::Encoder(Box::new(OneHotEncoder::default())), x, None)
            .unwrap();
        assert!(net.predict("bad", enc, x).is_err());
        assert!(net.transform("ok", enc, x).is_ok());
    }

    #[test]
    fn test_merge_misaligned_rows_fails() {
        let mut net = Network::new();
        let a = net.source("a");
        let b = net.source("b");
        let reals_a = net
            .op("ra", FrameOp::ExtractReals("v".to_string()), a)
            .unwrap();
        let reals_b = net
            .op("rb", FrameOp::ExtractReals("v".to_string()), b)
            .unwrap();
        let out = net
            .merge(
                "out",
                vec![("p".to_string(), reals_a), ("q".to_string(), reals_b)],
            )
            .unwrap();

        let short = DataFrame::new(vec![Column::new("v".into(), vec![1.0_f64])]).unwrap();
        let long =
            DataFrame::new(vec![Column::new("v".into(), vec![1.0_f64, 2.0, 3.0])]).unwrap();
        let err = net
            .evaluate(out, &[(a, short.into()), (b, long.into())])
            .unwrap_err();
        assert!(matches!(err, NetworkError::Data(_)));
    }

    #[test]
    fn test_value_vectors_merge_named() {
        let mut net = Network::new();
        let a = net.source("a");
        let reals = net
            .op("r", FrameOp::ExtractReals("v".to_string()), a)
            .unwrap();
        let out = net.merge("out", vec![("renamed".to_string(), reals)]).unwrap();
        let df = DataFrame::new(vec![Column::new("v".into(), vec![1.5_f64])]).unwrap();
        let value = net.evaluate(out, &[(a, df.into())]).unwrap();
        let frame = value.as_frame().unwrap();
        assert_eq!(frame.get_column_names()[0].as_str(), "renamed");
    }
}
