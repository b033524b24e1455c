//! Feature preparation: one-hot encoding of a subset and alignment of the
//! result to a classifier's feature schema.

pub mod aligner;
pub mod encoder;
pub mod matrix;

pub use aligner::align;
pub use encoder::{encode, encode_records, DEFAULT_CATEGORICAL_COLUMNS, DEFAULT_FEATURE_COLUMNS};
pub use matrix::{AlignedMatrix, EncodedMatrix, FeatureMatrix};
