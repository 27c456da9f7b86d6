//! Prebuilt composite models.

use trellis_models::{DecisionTreeClassifier, LinearSvc, OneHotEncoder, RidgeRegressor};
use trellis_network::{CompositeModel, FrameOp, MachineId, Model, Network, Result};

/// Machine ids of a [`three_target_composite`], for hyperparameter replay.
#[derive(Debug, Clone, Copy)]
pub struct ThreeTargetMachines {
    /// Decision tree classifying `y1` from feature group `a`
    pub tree: MachineId,
    /// One-hot encoder over feature group `b`
    pub encoder: MachineId,
    /// Ridge regressor predicting `y2` from the encoded group `b`
    pub ridge: MachineId,
    /// Linear SVM classifying `y3` from feature group `a`
    pub svc: MachineId,
}

/// Build the three-target composite over a 7-column feature table.
///
/// The feature table splits positionally into group `a` (columns 0 to 4)
/// and group `b` (columns 5 and 6). The target table carries a categorical
/// `y1`, a continuous `y2` and a categorical `y3`. Three models train on
/// their group and the merged output frame carries one prediction column
/// per target.
///
/// Returns the composite together with its machine ids so callers can swap
/// component hyperparameters and refit.
pub fn three_target_composite(
    tree: DecisionTreeClassifier,
    encoder: OneHotEncoder,
    ridge: RidgeRegressor,
    svc: LinearSvc,
) -> Result<(CompositeModel, ThreeTargetMachines)> {
    let mut net = Network::new();
    let x = net.source("x");
    let y = net.source("y");

    let group_a = net.op(
        "group_a",
        FrameOp::SelectRange {
            start: 0,
            end: 5,
            labels: None,
        },
        x,
    )?;
    let group_b = net.op(
        "group_b",
        FrameOp::SelectRange {
            start: 5,
            end: 7,
            labels: None,
        },
        x,
    )?;
    let y1 = net.op("y1", FrameOp::ExtractLabels("y1".to_string()), y)?;
    let y2 = net.op("y2", FrameOp::ExtractReals("y2".to_string()), y)?;
    let y3 = net.op("y3", FrameOp::ExtractLabels("y3".to_string()), y)?;

    let encoder_id = net.machine("encoder", Model::Encoder(Box::new(encoder)), group_b, None)?;
    let encoded_b = net.transform("encoded_b", encoder_id, group_b)?;

    let tree_id = net.machine(
        "tree",
        Model::Classifier(Box::new(tree)),
        group_a,
        Some(y1),
    )?;
    let ridge_id = net.machine(
        "ridge",
        Model::Regressor(Box::new(ridge)),
        encoded_b,
        Some(y2),
    )?;
    let svc_id = net.machine("svc", Model::Classifier(Box::new(svc)), group_a, Some(y3))?;

    let y1_hat = net.predict("y1_hat", tree_id, group_a)?;
    let y2_hat = net.predict("y2_hat", ridge_id, encoded_b)?;
    let y3_hat = net.predict("y3_hat", svc_id, group_a)?;
    let out = net.merge(
        "out",
        vec![
            ("y1".to_string(), y1_hat),
            ("y2".to_string(), y2_hat),
            ("y3".to_string(), y3_hat),
        ],
    )?;

    let composite = CompositeModel::new(net, x, y, out)?;
    Ok((
        composite,
        ThreeTargetMachines {
            tree: tree_id,
            encoder: encoder_id,
            ridge: ridge_id,
            svc: svc_id,
        },
    ))
}
