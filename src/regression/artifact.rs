//! JSON model artifacts.
//!
//! Two model kinds are understood:
//!
//! - `gradient_boosting`: an additive ensemble of regression trees,
//!   `init + learning_rate * Σ tree(x)`. A split sends `x[feature] <= threshold`
//!   to the left child.
//! - `linear`: `intercept + Σ coefficient_i * x_i`.
//!
//! ```json
//! {
//!   "target": "OMC",
//!   "feature_names": ["Gravel", "Sand", "Silt", "LiquidLimit", "PlasticLimit",
//!                     "CompactionEnergy", "PlasticityIndex", "Clay"],
//!   "model": {
//!     "kind": "gradient_boosting",
//!     "init": 12.0,
//!     "learning_rate": 0.1,
//!     "trees": [
//!       { "nodes": [
//!           { "feature": 6, "threshold": 15.0, "left": 1, "right": 2 },
//!           { "value": -0.4 },
//!           { "value": 0.7 }
//!       ] }
//!     ]
//!   }
//! }
//! ```
//!
//! Structure is checked once at load; prediction only has to check the row
//! length and the finiteness of the output.

use anyhow::{bail, ensure};
use serde::{Deserialize, Serialize};

use super::Regressor;
use crate::data::model::{FEATURE_NAMES, N_FEATURES};

// ============================================================================
// Serialized form
// ============================================================================

/// Top-level artifact document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Free-form target label, e.g. "OMC".
    #[serde(default)]
    pub target: Option<String>,
    /// Training-time feature order. Checked against [`FEATURE_NAMES`] when present.
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub model: ModelSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSpec {
    GradientBoosting {
        init: f64,
        learning_rate: f64,
        trees: Vec<TreeSpec>,
    },
    Linear {
        intercept: f64,
        coefficients: Vec<f64>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeSpec {
    pub nodes: Vec<NodeSpec>,
}

/// A node is either a split or a leaf; the JSON shape decides which.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeSpec {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

impl ModelSpec {
    /// Short description for log lines.
    pub fn summary(&self) -> String {
        match self {
            ModelSpec::GradientBoosting {
                trees,
                learning_rate,
                ..
            } => format!("gradient boosting, {} trees, lr {learning_rate}", trees.len()),
            ModelSpec::Linear { .. } => "linear".to_string(),
        }
    }
}

impl ModelArtifact {
    /// Check the artifact against the feature schema and build a regressor.
    ///
    /// The error string becomes the `reason` of an incompatible-artifact load error.
    pub fn into_regressor(self) -> Result<Box<dyn Regressor>, String> {
        if let Some(names) = &self.feature_names {
            if names.iter().map(String::as_str).ne(FEATURE_NAMES.iter().copied()) {
                return Err(format!(
                    "feature order {names:?} does not match expected {FEATURE_NAMES:?}"
                ));
            }
        }

        match self.model {
            ModelSpec::GradientBoosting {
                init,
                learning_rate,
                trees,
            } => {
                if !init.is_finite() || !learning_rate.is_finite() {
                    return Err("init and learning_rate must be finite".to_string());
                }
                let trees = trees
                    .iter()
                    .enumerate()
                    .map(|(i, spec)| Tree::from_spec(spec).map_err(|e| format!("tree {i}: {e}")))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Box::new(GradientBoostedTrees {
                    init,
                    learning_rate,
                    trees,
                }))
            }
            ModelSpec::Linear {
                intercept,
                coefficients,
            } => {
                if coefficients.len() != N_FEATURES {
                    return Err(format!(
                        "linear model has {} coefficients, expected {N_FEATURES}",
                        coefficients.len()
                    ));
                }
                if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
                    return Err("linear model weights must be finite".to_string());
                }
                Ok(Box::new(LinearModel {
                    intercept,
                    coefficients,
                }))
            }
        }
    }
}

// ============================================================================
// Tree – structure-of-arrays storage
// ============================================================================

/// A single regression tree in flat arrays. Node 0 is the root.
#[derive(Debug, Clone)]
pub struct Tree {
    split_features: Box<[u32]>,
    split_thresholds: Box<[f64]>,
    left_children: Box<[u32]>,
    right_children: Box<[u32]>,
    is_leaf: Box<[bool]>,
    leaf_values: Box<[f64]>,
}

impl Tree {
    /// Flatten and validate a serialized tree.
    ///
    /// Children must come after their parent, which rules out cycles and
    /// guarantees every traversal ends at a leaf.
    fn from_spec(spec: &TreeSpec) -> Result<Self, String> {
        let n_nodes = spec.nodes.len();
        if n_nodes == 0 {
            return Err("tree has no nodes".to_string());
        }

        let mut split_features = Vec::with_capacity(n_nodes);
        let mut split_thresholds = Vec::with_capacity(n_nodes);
        let mut left_children = Vec::with_capacity(n_nodes);
        let mut right_children = Vec::with_capacity(n_nodes);
        let mut is_leaf = Vec::with_capacity(n_nodes);
        let mut leaf_values = Vec::with_capacity(n_nodes);

        for (node, spec) in spec.nodes.iter().enumerate() {
            match *spec {
                NodeSpec::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= N_FEATURES {
                        return Err(format!(
                            "node {node} splits on feature {feature}, only {N_FEATURES} exist"
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {node} has a non-finite threshold"));
                    }
                    for (side, child) in [("left", left), ("right", right)] {
                        if child <= node || child >= n_nodes {
                            return Err(format!(
                                "node {node} {side} child {child} is out of order or out of bounds ({n_nodes} nodes)"
                            ));
                        }
                    }
                    split_features.push(feature as u32);
                    split_thresholds.push(threshold);
                    left_children.push(left as u32);
                    right_children.push(right as u32);
                    is_leaf.push(false);
                    leaf_values.push(0.0);
                }
                NodeSpec::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("leaf {node} has a non-finite value"));
                    }
                    split_features.push(0);
                    split_thresholds.push(0.0);
                    left_children.push(0);
                    right_children.push(0);
                    is_leaf.push(true);
                    leaf_values.push(value);
                }
            }
        }

        Ok(Self {
            split_features: split_features.into_boxed_slice(),
            split_thresholds: split_thresholds.into_boxed_slice(),
            left_children: left_children.into_boxed_slice(),
            right_children: right_children.into_boxed_slice(),
            is_leaf: is_leaf.into_boxed_slice(),
            leaf_values: leaf_values.into_boxed_slice(),
        })
    }

    #[cfg(test)]
    pub fn n_nodes(&self) -> usize {
        self.is_leaf.len()
    }

    /// Walk from the root to a leaf.
    pub fn predict_row(&self, features: &[f64]) -> f64 {
        let mut node = 0usize;
        while !self.is_leaf[node] {
            let value = features[self.split_features[node] as usize];
            node = if value <= self.split_thresholds[node] {
                self.left_children[node] as usize
            } else {
                self.right_children[node] as usize
            };
        }
        self.leaf_values[node]
    }
}

// ============================================================================
// Regressors
// ============================================================================

/// Additive tree ensemble.
#[derive(Debug, Clone)]
pub struct GradientBoostedTrees {
    init: f64,
    learning_rate: f64,
    trees: Vec<Tree>,
}

impl Regressor for GradientBoostedTrees {
    fn predict(&self, features: &[f64]) -> anyhow::Result<f64> {
        check_row(features)?;
        let sum: f64 = self.trees.iter().map(|t| t.predict_row(features)).sum();
        finite_output(self.init + self.learning_rate * sum)
    }
}

#[derive(Debug, Clone)]
pub struct LinearModel {
    intercept: f64,
    coefficients: Vec<f64>,
}

impl Regressor for LinearModel {
    fn predict(&self, features: &[f64]) -> anyhow::Result<f64> {
        check_row(features)?;
        let dot: f64 = self
            .coefficients
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum();
        finite_output(self.intercept + dot)
    }
}

fn check_row(features: &[f64]) -> anyhow::Result<()> {
    ensure!(
        features.len() == N_FEATURES,
        "expected {N_FEATURES} features, got {}",
        features.len()
    );
    Ok(())
}

fn finite_output(value: f64) -> anyhow::Result<f64> {
    if !value.is_finite() {
        bail!("model produced a non-finite value ({value})");
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROW: [f64; 8] = [20.0, 30.0, 25.0, 40.0, 20.0, 600.0, 20.0, 25.0];

    fn parse(json: &str) -> ModelArtifact {
        serde_json::from_str(json).expect("valid artifact json")
    }

    fn rejection(artifact: ModelArtifact) -> String {
        match artifact.into_regressor() {
            Ok(_) => panic!("artifact should have been rejected"),
            Err(reason) => reason,
        }
    }

    fn stump_json(threshold: f64) -> String {
        format!(
            r#"{{
                "target": "OMC",
                "model": {{
                    "kind": "gradient_boosting",
                    "init": 10.0,
                    "learning_rate": 0.5,
                    "trees": [
                        {{ "nodes": [
                            {{ "feature": 6, "threshold": {threshold}, "left": 1, "right": 2 }},
                            {{ "value": -2.0 }},
                            {{ "value": 4.0 }}
                        ] }},
                        {{ "nodes": [ {{ "value": 1.0 }} ] }}
                    ]
                }}
            }}"#
        )
    }

    #[test]
    fn boosted_trees_follow_left_on_equal() {
        // PI = 20 sits exactly on the threshold, so the left leaf applies.
        let model = parse(&stump_json(20.0)).into_regressor().unwrap();
        assert_eq!(model.predict(&ROW).unwrap(), 10.0 + 0.5 * (-2.0 + 1.0));

        let model = parse(&stump_json(19.5)).into_regressor().unwrap();
        assert_eq!(model.predict(&ROW).unwrap(), 10.0 + 0.5 * (4.0 + 1.0));
    }

    #[test]
    fn linear_model_is_dot_product() {
        let artifact = parse(
            r#"{ "model": { "kind": "linear", "intercept": 1.5,
                 "coefficients": [0, 0, 0, 0, 0.1, 0.001, 0, 0] } }"#,
        );
        let model = artifact.into_regressor().unwrap();
        let got = model.predict(&ROW).unwrap();
        assert!((got - (1.5 + 2.0 + 0.6)).abs() < 1e-12);
    }

    #[test]
    fn wrong_row_length_is_an_inference_failure() {
        let model = parse(&stump_json(20.0)).into_regressor().unwrap();
        let err = model.predict(&ROW[..7]).unwrap_err();
        assert!(err.to_string().contains("expected 8 features, got 7"));
    }

    #[test]
    fn overflowing_output_is_rejected() {
        let artifact = parse(
            r#"{ "model": { "kind": "linear", "intercept": 0,
                 "coefficients": [1e308, 1e308, 0, 0, 0, 0, 0, 0] } }"#,
        );
        let model = artifact.into_regressor().unwrap();
        assert!(model.predict(&ROW).is_err());
    }

    #[test]
    fn mismatched_feature_names_are_incompatible() {
        let artifact = parse(
            r#"{ "feature_names": ["Sand", "Gravel", "Silt", "LiquidLimit", "PlasticLimit",
                                   "CompactionEnergy", "PlasticityIndex", "Clay"],
                 "model": { "kind": "linear", "intercept": 0,
                            "coefficients": [0, 0, 0, 0, 0, 0, 0, 0] } }"#,
        );
        let reason = rejection(artifact);
        assert!(reason.contains("feature order"));
    }

    #[test]
    fn malformed_trees_are_rejected() {
        let cases = [
            (r#"{ "nodes": [] }"#, "no nodes"),
            (
                r#"{ "nodes": [ { "feature": 9, "threshold": 1, "left": 1, "right": 2 },
                                { "value": 0 }, { "value": 0 } ] }"#,
                "feature 9",
            ),
            (
                r#"{ "nodes": [ { "feature": 0, "threshold": 1, "left": 0, "right": 1 },
                                { "value": 0 } ] }"#,
                "out of order",
            ),
            (
                r#"{ "nodes": [ { "feature": 0, "threshold": 1, "left": 1, "right": 5 },
                                { "value": 0 } ] }"#,
                "out of bounds",
            ),
        ];
        for (tree, expected) in cases {
            let json = format!(
                r#"{{ "model": {{ "kind": "gradient_boosting", "init": 0,
                     "learning_rate": 1, "trees": [{tree}] }} }}"#
            );
            let reason = rejection(parse(&json));
            assert!(reason.contains(expected), "{reason} should mention {expected}");
        }
    }

    #[test]
    fn tree_flattening_keeps_every_node() {
        let spec: TreeSpec = serde_json::from_str(
            r#"{ "nodes": [
                { "feature": 7, "threshold": 30, "left": 1, "right": 4 },
                { "feature": 0, "threshold": 10, "left": 2, "right": 3 },
                { "value": 1 }, { "value": 2 }, { "value": 3 } ] }"#,
        )
        .unwrap();
        let tree = Tree::from_spec(&spec).unwrap();
        assert_eq!(tree.n_nodes(), 5);
        // Clay 25 <= 30, gravel 20 > 10.
        assert_eq!(tree.predict_row(&ROW), 2.0);
    }
}
