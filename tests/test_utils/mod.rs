use ndarray::Array2;
use std::io::Write;
use symnmf::VectorSet;
use tempfile::NamedTempFile;

/// Two well separated pairs: {(0,0),(0,1)} and {(10,10),(10,11)}.
#[allow(dead_code)]
pub fn two_pairs() -> VectorSet {
    VectorSet::new(vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![10.0, 10.0],
        vec![10.0, 11.0],
    ])
    .unwrap()
}

/// Deterministic well separated clusters laid out on a small grid around
/// each center. Points are interleaved (cluster 0, 1, ..., 0, 1, ...) so the
/// first `num_clusters` points come from distinct clusters.
/// Returns (points, true_labels).
#[allow(dead_code)]
pub fn grid_clusters(
    num_clusters: usize,
    points_per_cluster: usize,
    dim: usize,
    separation: f64,
) -> (VectorSet, Vec<usize>) {
    let mut rows = Vec::with_capacity(num_clusters * points_per_cluster);
    let mut labels = Vec::with_capacity(num_clusters * points_per_cluster);

    for point_id in 0..points_per_cluster {
        for cluster_id in 0..num_clusters {
            let row: Vec<f64> = (0..dim)
                .map(|d| {
                    let center = cluster_id as f64 * separation;
                    // Spread points by at most 0.4 around the center.
                    let offset = ((point_id * (d + 1)) % 5) as f64 * 0.1;
                    center + offset + d as f64 * 0.01
                })
                .collect();
            rows.push(row);
            labels.push(cluster_id);
        }
    }

    (VectorSet::new(rows).unwrap(), labels)
}

/// Two labelings describe the same partition up to renaming.
#[allow(dead_code)]
pub fn same_partition(a: &[usize], b: &[usize]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    for i in 0..a.len() {
        for j in 0..a.len() {
            if (a[i] == a[j]) != (b[i] == b[j]) {
                return false;
            }
        }
    }
    true
}

#[allow(dead_code)]
pub fn is_symmetric(m: &Array2<f64>, tol: f64) -> bool {
    let n = m.nrows();
    if m.ncols() != n {
        return false;
    }
    for i in 0..n {
        for j in 0..n {
            if (m[(i, j)] - m[(j, i)]).abs() > tol {
                return false;
            }
        }
    }
    true
}

/// Write `contents` to a temp file ending in `.txt`.
#[allow(dead_code)]
pub fn write_points_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".txt")
        .tempfile()
        .expect("failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("failed to write temp file");
    file
}
