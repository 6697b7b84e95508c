use crate::error::{ClusterError, Result};
use ndarray::{Array2, ArrayView1};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use wide::f64x4;

/// Upper bound (exclusive) on user supplied iteration caps.
pub const MAX_ITER_LIMIT: usize = 1000;

/// Checks `1 < k < n`.
pub fn validate_k(k: usize, n: usize) -> Result<()> {
    if k <= 1 || k >= n {
        return Err(ClusterError::InvalidParameter(format!(
            "number of clusters must satisfy 1 < k < {}, got {}",
            n, k
        )));
    }
    Ok(())
}

/// Checks `1 < max_iter < 1000`.
pub fn validate_max_iter(max_iter: usize) -> Result<()> {
    if max_iter <= 1 || max_iter >= MAX_ITER_LIMIT {
        return Err(ClusterError::InvalidParameter(format!(
            "maximum iteration must satisfy 1 < max_iter < {}, got {}",
            MAX_ITER_LIMIT, max_iter
        )));
    }
    Ok(())
}

/// Squared Euclidean distance, SIMD over 4-lane chunks with a scalar tail.
#[inline]
pub fn euclidean_distance_squared(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    match (a.as_slice(), b.as_slice()) {
        (Some(a), Some(b)) => distance_squared_slices(a, b),
        // Strided views (e.g. columns) take the plain path.
        _ => a
            .iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y) * (x - y))
            .sum(),
    }
}

#[inline]
pub fn euclidean_distance(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    euclidean_distance_squared(a, b).sqrt()
}

fn distance_squared_slices(a: &[f64], b: &[f64]) -> f64 {
    let dim = a.len().min(b.len());
    let mut acc = f64x4::splat(0.0);
    let mut j = 0;

    while j + 4 <= dim {
        let x = f64x4::from([a[j], a[j + 1], a[j + 2], a[j + 3]]);
        let y = f64x4::from([b[j], b[j + 1], b[j + 2], b[j + 3]]);
        let diff = x - y;
        acc += diff * diff;
        j += 4;
    }

    let mut tail = 0.0;
    while j < dim {
        let diff = a[j] - b[j];
        tail += diff * diff;
        j += 1;
    }

    acc.reduce_add() + tail
}

/// Sum of squared entries.
pub fn frobenius_norm_squared(m: &Array2<f64>) -> f64 {
    m.iter().map(|v| v * v).sum()
}

/// Parse comma delimited rows of numbers.
///
/// Every non-empty line is one point; all points must have the same number
/// of coordinates. Trailing blank lines and `\r\n` endings are accepted.
pub fn parse_vectors(text: &str) -> Result<Vec<Vec<f64>>> {
    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut row = Vec::new();
        for field in line.split(',') {
            let field = field.trim();
            let value = field.parse::<f64>().map_err(|e| {
                ClusterError::InvalidInput(format!(
                    "line {}: cannot parse {:?} as a number: {}",
                    line_no + 1,
                    field,
                    e
                ))
            })?;
            row.push(value);
        }

        if let Some(first) = rows.first() {
            let expected = first.len();
            if row.len() != expected {
                return Err(ClusterError::InvalidInput(format!(
                    "line {}: expected {} values, got {}",
                    line_no + 1,
                    expected,
                    row.len()
                )));
            }
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Read points from a comma delimited text file.
pub fn read_vectors_from_file(path: impl AsRef<Path>) -> Result<Vec<Vec<f64>>> {
    let text = fs::read_to_string(path)?;
    parse_vectors(&text)
}

/// Render a matrix as comma separated rows with four decimals.
pub fn format_matrix(m: &Array2<f64>) -> String {
    let mut out = String::new();
    for row in m.rows() {
        let mut first = true;
        for v in row.iter() {
            if !first {
                out.push(',');
            }
            // Writing into a String cannot fail.
            let _ = write!(out, "{:.4}", v);
            first = false;
        }
        out.push('\n');
    }
    out
}
