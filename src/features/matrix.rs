//! Named numeric feature tables.

/// Row-major numeric table with named columns
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureMatrix {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    /// Build a matrix, checking every row has one value per column
    pub fn new(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self, String> {
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != columns.len()) {
            return Err(format!(
                "row {} has {} values but there are {} columns",
                i,
                row.len(),
                columns.len()
            ));
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }
}

/// Encoder output. Its columns depend on which categories the subset contains.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EncodedMatrix(pub(crate) FeatureMatrix);

impl EncodedMatrix {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self, String> {
        FeatureMatrix::new(columns, rows).map(Self)
    }

    pub fn matrix(&self) -> &FeatureMatrix {
        &self.0
    }
}

/// Feature matrix whose columns equal the classifier's schema, name for name
/// and in order. Only the aligner builds one.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedMatrix(pub(crate) FeatureMatrix);

impl AlignedMatrix {
    pub fn matrix(&self) -> &FeatureMatrix {
        &self.0
    }

    pub fn columns(&self) -> &[String] {
        self.0.columns()
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        self.0.rows()
    }

    pub fn n_rows(&self) -> usize {
        self.0.n_rows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_width_checked() {
        let cols = vec!["a".to_string(), "b".to_string()];
        assert!(FeatureMatrix::new(cols.clone(), vec![vec![1.0, 2.0]]).is_ok());
        let err = FeatureMatrix::new(cols, vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(err.contains("row 1"));
    }

    #[test]
    fn test_shape() {
        let m = FeatureMatrix::new(
            vec!["Length".to_string(), "Protocol_TCP".to_string()],
            vec![vec![60.0, 1.0], vec![1500.0, 0.0]],
        )
        .unwrap();
        assert_eq!(m.n_rows(), 2);
        assert_eq!(m.n_columns(), 2);
        assert_eq!(m.rows()[1], vec![1500.0, 0.0]);
    }
}
