//! Gaussian similarity graph over a [`VectorSet`].
//!
//! * `sym`:  `W[i][j] = exp(-||x_i - x_j||^2 / 2)` for `i != j`, `W[i][i] = 0`
//! * `ddg`:  `D = diag(sum_j W[i][j])`
//! * `norm`: `A = D^-1/2 W D^-1/2`
//!
//! All three are O(n^2 d) and allocate a fresh n x n matrix. The pipeline
//! entry points build `W` once and hand it to [`degrees`] / [`normalize`]
//! so the quadratic intermediates are dropped as soon as `A` exists.

use crate::error::{ClusterError, Result};
use crate::utils::euclidean_distance_squared;
use crate::vector_store::VectorSet;
use log::debug;
use ndarray::{Array1, Array2};

/// Similarity matrix `W`.
pub fn sym(points: &VectorSet) -> Array2<f64> {
    let n = points.len();
    debug!("Building {}x{} similarity matrix (dim={})", n, n, points.dim());

    let mut w = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        for j in (i + 1)..n {
            let dist = euclidean_distance_squared(points.point(i), points.point(j));
            let w_ij = (-0.5 * dist).exp();
            w[(i, j)] = w_ij;
            w[(j, i)] = w_ij;
        }
    }
    w
}

/// Row sums of `W`, i.e. the diagonal of `D`.
pub fn degrees(w: &Array2<f64>) -> Array1<f64> {
    w.rows().into_iter().map(|row| row.sum()).collect()
}

/// Diagonal degree matrix `D` of the similarity graph.
///
/// A zero on the diagonal is a valid result here; only [`norm`] rejects it.
pub fn ddg(points: &VectorSet) -> Array2<f64> {
    let w = sym(points);
    Array2::from_diag(&degrees(&w))
}

/// Scale `W` by `D^-1/2` on both sides.
///
/// Fails with [`ClusterError::DegenerateInput`] when a point has zero degree,
/// which happens when it is so far from every other point that all of its
/// similarities underflow to zero.
pub fn normalize(w: &Array2<f64>, degrees: &Array1<f64>) -> Result<Array2<f64>> {
    let n = w.nrows();
    if w.ncols() != n || degrees.len() != n {
        return Err(ClusterError::InvalidParameter(format!(
            "similarity matrix {}x{} does not match {} degrees",
            w.nrows(),
            w.ncols(),
            degrees.len()
        )));
    }

    if let Some(row) = degrees.iter().position(|&d| d <= 0.0) {
        return Err(ClusterError::DegenerateInput(format!(
            "point {} has zero degree in the similarity graph",
            row
        )));
    }

    let inv_sqrt: Array1<f64> = degrees.mapv(|d| d.powf(-0.5));
    let mut a = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        for j in 0..n {
            a[(i, j)] = w[(i, j)] * inv_sqrt[i] * inv_sqrt[j];
        }
    }
    Ok(a)
}

/// Normalized similarity matrix `A`.
pub fn norm(points: &VectorSet) -> Result<Array2<f64>> {
    let w = sym(points);
    let d = degrees(&w);
    normalize(&w, &d)
}
