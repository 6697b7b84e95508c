use crate::error::{ClusterError, Result};
use crate::utils::read_vectors_from_file;
use ndarray::{Array2, ArrayView1, ArrayView2};
use std::path::Path;

/// Immutable set of `n` points of dimension `dim`, one point per row.
#[derive(Clone, Debug, PartialEq)]
pub struct VectorSet {
    data: Array2<f64>,
}

impl VectorSet {
    /// Build a set from parsed rows.
    ///
    /// Requires at least two points, a non-zero dimension shared by every
    /// point, and finite coordinates.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n = rows.len();
        if n < 2 {
            return Err(ClusterError::InvalidInput(format!(
                "at least two points are required, got {}",
                n
            )));
        }

        let dim = rows[0].len();
        if dim == 0 {
            return Err(ClusterError::InvalidInput(
                "points must have at least one coordinate".to_string(),
            ));
        }

        let mut flat = Vec::with_capacity(n * dim);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != dim {
                return Err(ClusterError::InvalidInput(format!(
                    "point dimension mismatch at index {}: expected {}, got {}",
                    i,
                    dim,
                    row.len()
                )));
            }
            if let Some(v) = row.iter().find(|v| !v.is_finite()) {
                return Err(ClusterError::InvalidInput(format!(
                    "point {} has a non-finite coordinate: {}",
                    i, v
                )));
            }
            flat.extend(row);
        }

        let data = Array2::from_shape_vec((n, dim), flat)
            .map_err(|e| ClusterError::InvalidInput(e.to_string()))?;
        Ok(VectorSet { data })
    }

    /// Wrap an existing `(n, dim)` array, applying the same checks as [`VectorSet::new`].
    pub fn from_array(data: Array2<f64>) -> Result<Self> {
        if data.nrows() < 2 {
            return Err(ClusterError::InvalidInput(format!(
                "at least two points are required, got {}",
                data.nrows()
            )));
        }
        if data.ncols() == 0 {
            return Err(ClusterError::InvalidInput(
                "points must have at least one coordinate".to_string(),
            ));
        }
        if data.iter().any(|v| !v.is_finite()) {
            return Err(ClusterError::InvalidInput(
                "points contain a non-finite coordinate".to_string(),
            ));
        }
        Ok(VectorSet { data })
    }

    /// Load points from a comma delimited text file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(read_vectors_from_file(path)?)
    }

    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    /// Always false for a constructed set; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    pub fn dim(&self) -> usize {
        self.data.ncols()
    }

    pub fn point(&self, i: usize) -> ArrayView1<'_, f64> {
        self.data.row(i)
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }
}
