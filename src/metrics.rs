use crate::error::{ClusterError, Result};
use crate::extract::ClusterAssignment;
use crate::utils::euclidean_distance;
use crate::vector_store::VectorSet;

/// Scores a clustering of a point set. Higher is better.
pub trait QualityMetric {
    fn score(&self, points: &VectorSet, labels: &ClusterAssignment) -> Result<f64>;
}

/// Mean silhouette coefficient with Euclidean distance.
///
/// For point `i` with mean intra-cluster distance `a` and smallest mean
/// distance to another cluster `b`, `s(i) = (b - a) / max(a, b)`. Points
/// alone in their cluster score 0.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silhouette;

impl QualityMetric for Silhouette {
    fn score(&self, points: &VectorSet, labels: &ClusterAssignment) -> Result<f64> {
        let n = points.len();
        if labels.len() != n {
            return Err(ClusterError::InvalidParameter(format!(
                "{} labels for {} points",
                labels.len(),
                n
            )));
        }

        let sizes = labels.cluster_sizes();
        let used = labels.num_clusters();
        if used < 2 || used >= n {
            return Err(ClusterError::InvalidParameter(format!(
                "silhouette needs 2 <= clusters <= {}, got {}",
                n - 1,
                used
            )));
        }

        let labels = labels.as_slice();
        let mut total = 0.0;
        let mut dist_sums = vec![0.0f64; sizes.len()];

        for i in 0..n {
            dist_sums.iter_mut().for_each(|s| *s = 0.0);
            for j in 0..n {
                if i != j {
                    dist_sums[labels[j]] += euclidean_distance(points.point(i), points.point(j));
                }
            }

            let own = labels[i];
            if sizes[own] <= 1 {
                continue;
            }
            let a = dist_sums[own] / (sizes[own] - 1) as f64;
            let b = sizes
                .iter()
                .enumerate()
                .filter(|&(c, &size)| c != own && size > 0)
                .map(|(c, &size)| dist_sums[c] / size as f64)
                .fold(f64::INFINITY, f64::min);

            let denom = a.max(b);
            if denom > 0.0 {
                total += (b - a) / denom;
            }
        }

        Ok(total / n as f64)
    }
}
