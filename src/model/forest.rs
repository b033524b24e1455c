//! Random forest classifier loaded from a JSON artifact.
//!
//! Trees use the flat-array layout common to tree learners: node `i` is a
//! leaf when `children_left[i] == -1`; otherwise a row goes to
//! `children_left[i]` when `row[feature[i]] <= threshold[i]` and to
//! `children_right[i]` otherwise. `value[i]` holds per-class weights.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use super::Classifier;
use crate::dataset::Label;
use crate::error::EvalError;
use crate::features::AlignedMatrix;

/// Marker for "no child" in `children_left` / `children_right`
const LEAF: i64 = -1;

/// Serialized forest as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestArtifact {
    pub feature_names_in: Vec<String>,
    pub classes: Vec<u8>,
    pub estimators: Vec<TreeArtifact>,
}

/// Serialized decision tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeArtifact {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f64>>,
}

/// Validated decision tree
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        distribution: Vec<f64>,
    },
}

impl Tree {
    /// Validate a serialized tree against the forest's feature and class counts
    fn from_artifact(artifact: TreeArtifact, n_features: usize, n_classes: usize) -> Result<Self, String> {
        let n_nodes = artifact.children_left.len();
        if n_nodes == 0 {
            return Err("tree has no nodes".to_string());
        }
        let lengths = [
            ("children_right", artifact.children_right.len()),
            ("feature", artifact.feature.len()),
            ("threshold", artifact.threshold.len()),
            ("value", artifact.value.len()),
        ];
        for (name, len) in lengths {
            if len != n_nodes {
                return Err(format!(
                    "'{}' has {} entries but 'children_left' has {}",
                    name, len, n_nodes
                ));
            }
        }

        let mut nodes = Vec::with_capacity(n_nodes);
        for (i, weights) in artifact.value.into_iter().enumerate() {
            let left = artifact.children_left[i];
            let right = artifact.children_right[i];

            if left == LEAF {
                if right != LEAF {
                    return Err(format!("node {} has a right child but no left child", i));
                }
                if weights.len() != n_classes {
                    return Err(format!(
                        "node {} has {} class weights but the forest has {} classes",
                        i,
                        weights.len(),
                        n_classes
                    ));
                }
                nodes.push(Node::Leaf {
                    distribution: normalize(weights),
                });
                continue;
            }

            // Children always follow their parent, which rules out cycles
            let child = |c: i64| -> Result<usize, String> {
                usize::try_from(c)
                    .ok()
                    .filter(|&c| c > i && c < n_nodes)
                    .ok_or_else(|| format!("node {} has invalid child index {}", i, c))
            };
            let feature = usize::try_from(artifact.feature[i])
                .ok()
                .filter(|&f| f < n_features)
                .ok_or_else(|| {
                    format!(
                        "node {} splits on feature {} but the schema has {} features",
                        i, artifact.feature[i], n_features
                    )
                })?;
            let threshold = artifact.threshold[i];
            if threshold.is_nan() {
                return Err(format!("node {} has a NaN threshold", i));
            }

            nodes.push(Node::Split {
                feature,
                threshold,
                left: child(left)?,
                right: child(right)?,
            });
        }

        Ok(Self { nodes })
    }

    /// Class distribution of the leaf `row` lands in.
    ///
    /// `row` holds one value per schema feature; a shorter row panics.
    pub fn predict_proba(&self, row: &[f64]) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { distribution } => return distribution,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }
}

fn normalize(weights: Vec<f64>) -> Vec<f64> {
    let total: f64 = weights.iter().sum();
    if total > 0.0 {
        weights.into_iter().map(|w| w / total).collect()
    } else {
        weights
    }
}

/// Validated random forest
#[derive(Debug, Clone, PartialEq)]
pub struct RandomForest {
    feature_names_in: Vec<String>,
    classes: Vec<Label>,
    trees: Vec<Tree>,
}

impl RandomForest {
    /// Validate a deserialized artifact
    pub fn from_artifact(artifact: ForestArtifact) -> Result<Self, String> {
        if artifact.feature_names_in.is_empty() {
            return Err("'feature_names_in' is empty".to_string());
        }
        let mut seen = HashSet::new();
        for name in &artifact.feature_names_in {
            if name.is_empty() {
                return Err("'feature_names_in' contains an empty name".to_string());
            }
            if !seen.insert(name.as_str()) {
                return Err(format!("duplicate feature name '{}'", name));
            }
        }

        if artifact.classes.is_empty() {
            return Err("'classes' is empty".to_string());
        }
        let mut classes = Vec::with_capacity(artifact.classes.len());
        for value in &artifact.classes {
            let label = Label::from_value(*value)
                .ok_or_else(|| format!("class {} is not a packet label (expected 0 or 1)", value))?;
            if classes.contains(&label) {
                return Err(format!("duplicate class {}", value));
            }
            classes.push(label);
        }

        if artifact.estimators.is_empty() {
            return Err("forest has no estimators".to_string());
        }
        let n_features = artifact.feature_names_in.len();
        let trees = artifact
            .estimators
            .into_iter()
            .enumerate()
            .map(|(i, t)| {
                Tree::from_artifact(t, n_features, classes.len())
                    .map_err(|e| format!("estimator {}: {}", i, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            feature_names_in: artifact.feature_names_in,
            classes,
            trees,
        })
    }

    pub fn classes(&self) -> &[Label] {
        &self.classes
    }

    pub fn n_estimators(&self) -> usize {
        self.trees.len()
    }

    /// Mean class distribution over all trees
    pub fn predict_proba(&self, row: &[f64]) -> Vec<f64> {
        let mut totals = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            for (t, p) in totals.iter_mut().zip(tree.predict_proba(row)) {
                *t += p;
            }
        }
        let n = self.trees.len() as f64;
        totals.into_iter().map(|t| t / n).collect()
    }

    /// Most probable class for one row; ties go to the class listed first
    pub fn predict_row(&self, row: &[f64]) -> Label {
        let proba = self.predict_proba(row);
        let mut best = 0;
        for (i, p) in proba.iter().enumerate().skip(1) {
            if *p > proba[best] {
                best = i;
            }
        }
        self.classes[best]
    }
}

impl Classifier for RandomForest {
    fn feature_names_in(&self) -> &[String] {
        &self.feature_names_in
    }

    fn predict(&self, features: &AlignedMatrix) -> Vec<Label> {
        features.rows().iter().map(|row| self.predict_row(row)).collect()
    }
}

/// Load and validate a forest artifact from a JSON file
pub fn load_model(path: &Path) -> Result<RandomForest, EvalError> {
    info!("Loading model from: {:?}", path);

    let content = fs::read_to_string(path).map_err(|e| EvalError::model_load(path, e.to_string()))?;
    let artifact: ForestArtifact =
        serde_json::from_str(&content).map_err(|e| EvalError::model_load(path, e.to_string()))?;
    let forest = RandomForest::from_artifact(artifact).map_err(|e| EvalError::model_load(path, e))?;

    info!(
        "Loaded random forest with {} estimators ({} nodes) over {} features, classes {:?}",
        forest.n_estimators(),
        forest.trees.iter().map(Tree::n_nodes).sum::<usize>(),
        forest.feature_names_in.len(),
        forest.classes()
    );
    Ok(forest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Single split on feature 0 at 100: small -> normal, large -> flood
    fn stump() -> TreeArtifact {
        TreeArtifact {
            children_left: vec![1, -1, -1],
            children_right: vec![2, -1, -1],
            feature: vec![0, -2, -2],
            threshold: vec![100.0, -2.0, -2.0],
            value: vec![vec![5.0, 5.0], vec![5.0, 0.0], vec![0.0, 5.0]],
        }
    }

    fn artifact(estimators: Vec<TreeArtifact>) -> ForestArtifact {
        ForestArtifact {
            feature_names_in: vec!["Length".to_string(), "Protocol_UDP".to_string()],
            classes: vec![0, 1],
            estimators,
        }
    }

    #[test]
    fn test_stump_prediction() {
        let forest = RandomForest::from_artifact(artifact(vec![stump()])).unwrap();
        assert_eq!(forest.predict_row(&[60.0, 0.0]), Label::Normal);
        assert_eq!(forest.predict_row(&[100.0, 0.0]), Label::Normal);
        assert_eq!(forest.predict_row(&[1200.0, 1.0]), Label::Flood);
        assert_eq!(forest.predict_proba(&[1200.0, 1.0]), vec![0.0, 1.0]);
    }

    #[test]
    fn test_forest_averages_trees() {
        // Second tree votes flood whenever Protocol_UDP > 0.5, with 3:1 weight
        let udp = TreeArtifact {
            children_left: vec![1, -1, -1],
            children_right: vec![2, -1, -1],
            feature: vec![1, -2, -2],
            threshold: vec![0.5, -2.0, -2.0],
            value: vec![vec![4.0, 4.0], vec![3.0, 1.0], vec![1.0, 3.0]],
        };
        let forest = RandomForest::from_artifact(artifact(vec![stump(), udp])).unwrap();
        assert_eq!(forest.n_estimators(), 2);
        assert!(forest.trees.iter().all(|t| t.n_nodes() == 3));

        // stump: [1, 0], udp: [0.25, 0.75] -> mean [0.625, 0.375]
        assert_eq!(forest.predict_proba(&[60.0, 1.0]), vec![0.625, 0.375]);
        assert_eq!(forest.predict_row(&[60.0, 1.0]), Label::Normal);
        assert_eq!(forest.predict_row(&[600.0, 1.0]), Label::Flood);
    }

    #[test]
    fn test_tie_goes_to_first_class() {
        let tree = TreeArtifact {
            children_left: vec![-1],
            children_right: vec![-1],
            feature: vec![-2],
            threshold: vec![-2.0],
            value: vec![vec![2.0, 2.0]],
        };
        let forest = RandomForest::from_artifact(artifact(vec![tree])).unwrap();
        assert_eq!(forest.predict_row(&[0.0, 0.0]), Label::Normal);
    }

    #[test]
    fn test_rejects_bad_artifacts() {
        let mut a = artifact(vec![stump()]);
        a.feature_names_in.push("Length".to_string());
        assert!(RandomForest::from_artifact(a).unwrap_err().contains("duplicate"));

        let mut a = artifact(vec![stump()]);
        a.classes = vec![0, 2];
        assert!(RandomForest::from_artifact(a).is_err());

        assert!(RandomForest::from_artifact(artifact(vec![])).is_err());

        let mut t = stump();
        t.feature[0] = 5;
        assert!(RandomForest::from_artifact(artifact(vec![t])).unwrap_err().contains("feature 5"));

        let mut t = stump();
        t.children_left[0] = 0;
        assert!(RandomForest::from_artifact(artifact(vec![t])).unwrap_err().contains("child"));

        let mut t = stump();
        t.threshold.pop();
        assert!(RandomForest::from_artifact(artifact(vec![t])).unwrap_err().contains("threshold"));

        let mut t = stump();
        t.value[1] = vec![1.0];
        assert!(RandomForest::from_artifact(artifact(vec![t])).unwrap_err().contains("class weights"));
    }

    #[test]
    fn test_load_model_from_disk() {
        let json = serde_json::to_string(&artifact(vec![stump()])).unwrap();
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", json).unwrap();

        let forest = load_model(temp_file.path()).unwrap();
        assert_eq!(forest.feature_names_in(), &["Length", "Protocol_UDP"]);
        assert_eq!(forest.classes(), &[Label::Normal, Label::Flood]);
    }

    #[test]
    fn test_load_model_errors() {
        let err = load_model(Path::new("/nonexistent/model.json")).unwrap_err();
        assert!(matches!(err, EvalError::ModelLoad { .. }));

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "not json").unwrap();
        let err = load_model(temp_file.path()).unwrap_err();
        assert!(matches!(err, EvalError::ModelLoad { .. }));
    }
}
