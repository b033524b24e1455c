//! Classifier capability and the on-disk model artifact.
//!
//! The pipeline only needs two things from a fitted model: the ordered
//! feature names it was trained on, and one predicted label per input row.
//! Anything satisfying [`Classifier`] can be scored, including test stubs.

pub mod forest;

pub use forest::{load_model, RandomForest, Tree};

use crate::dataset::Label;
use crate::features::AlignedMatrix;

/// A fitted binary packet classifier
pub trait Classifier {
    /// Feature columns in the order the model reads them
    fn feature_names_in(&self) -> &[String];

    /// One label per row of `features`, in row order
    fn predict(&self, features: &AlignedMatrix) -> Vec<Label>;
}
