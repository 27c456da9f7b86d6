//! Component Registry
//!
//! Central catalogue of the available component models. Allows dynamic
//! lookup by name and enumeration by kind.

use std::collections::HashMap;

/// What a component does in a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    /// Predicts categorical labels
    Classifier,
    /// Predicts continuous values
    Regressor,
    /// Transforms frames without a target
    Encoder,
}

/// Component metadata.
#[derive(Debug, Clone)]
pub struct ModelInfo {
    /// Component name (unique identifier)
    pub name: &'static str,
    /// Component kind
    pub kind: ModelKind,
    /// Brief description of what the component does
    pub description: &'static str,
    /// Hyperparameter names exposed by the component's config
    pub hyperparameters: &'static [&'static str],
}

/// Get all available component info.
pub fn available_models() -> Vec<ModelInfo> {
    vec![
        ModelInfo {
            name: "decision_tree",
            kind: ModelKind::Classifier,
            description: "CART decision tree with Gini impurity splits",
            hyperparameters: &["max_depth", "min_samples_split", "min_gain"],
        },
        ModelInfo {
            name: "linear_svc",
            kind: ModelKind::Classifier,
            description: "Linear SVM trained by hinge-loss SGD, one-vs-rest",
            hyperparameters: &["lambda", "epochs", "seed"],
        },
        ModelInfo {
            name: "ridge",
            kind: ModelKind::Regressor,
            description: "Closed-form L2-regularized least squares",
            hyperparameters: &["lambda", "fit_intercept"],
        },
        ModelInfo {
            name: "one_hot",
            kind: ModelKind::Encoder,
            description: "One-hot expansion of categorical columns",
            hyperparameters: &["strict"],
        },
    ]
}

/// Get components by kind.
pub fn models_by_kind(kind: ModelKind) -> Vec<ModelInfo> {
    available_models()
        .into_iter()
        .filter(|m| m.kind == kind)
        .collect()
}

/// Get component info by name.
pub fn get_model_info(name: &str) -> Option<ModelInfo> {
    available_models().into_iter().find(|m| m.name == name)
}

/// Get a map of all components indexed by name.
pub fn model_map() -> HashMap<&'static str, ModelInfo> {
    available_models().into_iter().map(|m| (m.name, m)).collect()
}

/// List all component names.
pub fn list_model_names() -> Vec<&'static str> {
    available_models().into_iter().map(|m| m.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_models_count() {
        assert_eq!(available_models().len(), 4);
    }

    #[test]
    fn test_models_by_kind() {
        assert_eq!(models_by_kind(ModelKind::Classifier).len(), 2);
        assert_eq!(models_by_kind(ModelKind::Regressor).len(), 1);
        assert_eq!(models_by_kind(ModelKind::Encoder).len(), 1);
    }

    #[test]
    fn test_get_model_info() {
        let ridge = get_model_info("ridge").unwrap();
        assert_eq!(ridge.kind, ModelKind::Regressor);
        assert!(ridge.hyperparameters.contains(&"lambda"));

        assert!(get_model_info("nonexistent_model").is_none());
    }

    #[test]
    fn test_model_map_and_names() {
        let map = model_map();
        assert_eq!(map.len(), 4);
        assert!(map.contains_key("decision_tree"));

        let names = list_model_names();
        assert!(names.contains(&"one_hot"));
        assert!(names.contains(&"linear_svc"));
    }

    #[test]
    fn test_all_models_list_hyperparameters() {
        for model in available_models() {
            assert!(
                !model.hyperparameters.is_empty(),
                "Model {} lists no hyperparameters",
                model.name
            );
        }
    }
}
