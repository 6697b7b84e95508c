use crate::error::{ClusterError, Result};
use crate::extract::ClusterAssignment;
use crate::utils::{euclidean_distance, euclidean_distance_squared, validate_k, validate_max_iter};
use crate::vector_store::VectorSet;
use log::{debug, info, trace, warn};
use ndarray::{s, Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

/// What to do with a centroid whose cluster received no points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyClusterPolicy {
    /// Keep the centroid where it was.
    #[default]
    RetainPrevious,
    /// Abort the run with [`ClusterError::DegenerateInput`].
    Fail,
}

/// Settings for Lloyd iterations.
#[derive(Clone, Debug, PartialEq)]
pub struct KMeansConfig {
    pub k: usize,
    pub max_iter: usize,
    /// Every centroid must move less than this (Euclidean) to stop early.
    pub epsilon: f64,
    pub empty_cluster: EmptyClusterPolicy,
}

impl KMeansConfig {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: 300,
            epsilon: 0.001,
            empty_cluster: EmptyClusterPolicy::default(),
        }
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_empty_cluster(mut self, policy: EmptyClusterPolicy) -> Self {
        self.empty_cluster = policy;
        self
    }
}

#[derive(Clone, Debug)]
pub struct KMeansOutcome {
    /// `k x dim` final centroids.
    pub centroids: Array2<f64>,
    /// Nearest-centroid label of every point against `centroids`.
    pub labels: ClusterAssignment,
    pub iterations: usize,
    pub converged: bool,
}

/// Runs Lloyd-style K-means seeded with the first `k` points.
pub fn run_kmeans(points: &VectorSet, config: &KMeansConfig) -> Result<KMeansOutcome> {
    let n = points.len();
    let k = config.k;
    validate_k(k, n)?;
    validate_max_iter(config.max_iter)?;
    if !(config.epsilon.is_finite() && config.epsilon > 0.0) {
        return Err(ClusterError::InvalidParameter(format!(
            "epsilon must be a positive number, got {}",
            config.epsilon
        )));
    }

    info!(
        "Running kmeans on {} points (dim={}), k={}, max_iter={}",
        n,
        points.dim(),
        k,
        config.max_iter
    );

    let data = points.view();
    let mut curr_centroids = data.slice(s![..k, ..]).to_owned();
    let mut labels = vec![0usize; n];
    let mut iterations = 0;
    let mut converged = false;

    for iter in 0..config.max_iter {
        iterations = iter + 1;

        assign_points(data, curr_centroids.view(), &mut labels);

        let (mut new_centroids, counts) = update_centroids(data, &labels, k);
        handle_empty_clusters(&mut new_centroids, &curr_centroids, &counts, config.empty_cluster)?;

        let shift = max_centroid_shift(&new_centroids, &curr_centroids);
        trace!("kmeans iteration {}: max centroid shift={:.6}", iter, shift);

        curr_centroids = new_centroids;
        if shift < config.epsilon {
            converged = true;
            break;
        }
    }

    if converged {
        debug!("kmeans converged after {} iterations", iterations);
    } else {
        debug!("kmeans stopped at max_iter={}", config.max_iter);
    }

    // Labels must describe the returned centroids, not the pre-update ones.
    assign_points(data, curr_centroids.view(), &mut labels);

    Ok(KMeansOutcome {
        centroids: curr_centroids,
        labels: ClusterAssignment::new(labels),
        iterations,
        converged,
    })
}

/// Nearest centroid to `point` and its squared distance.
///
/// Centroids are scanned in ascending order and only a strictly smaller
/// distance replaces the current best, so ties go to the lowest index.
#[inline]
pub fn find_nearest_centroid(point: ArrayView1<f64>, centroids: ArrayView2<f64>) -> (usize, f64) {
    let mut best_c = 0;
    let mut best_dist = f64::INFINITY;

    for (c, centroid) in centroids.rows().into_iter().enumerate() {
        let dist = euclidean_distance_squared(point, centroid);
        if dist < best_dist {
            best_dist = dist;
            best_c = c;
        }
    }

    (best_c, best_dist)
}

pub fn assign_points(data: ArrayView2<f64>, centroids: ArrayView2<f64>, labels: &mut [usize]) {
    for (label, point) in labels.iter_mut().zip(data.rows()) {
        let (best_c, _) = find_nearest_centroid(point, centroids);
        *label = best_c;
    }
}

/// Mean of the points in each cluster, plus the per-cluster counts.
///
/// Rows of empty clusters are left at zero; see [`EmptyClusterPolicy`].
pub fn update_centroids(
    data: ArrayView2<f64>,
    labels: &[usize],
    k: usize,
) -> (Array2<f64>, Vec<usize>) {
    let dim = data.ncols();
    let mut sums = Array2::<f64>::zeros((k, dim));
    let mut counts = vec![0usize; k];

    // Points are accumulated in index order so results are reproducible.
    for (point, &c) in data.rows().into_iter().zip(labels) {
        let mut row = sums.row_mut(c);
        row += &point;
        counts[c] += 1;
    }

    for (c, mut row) in sums.rows_mut().into_iter().enumerate() {
        if counts[c] > 0 {
            row /= counts[c] as f64;
        }
    }

    (sums, counts)
}

fn handle_empty_clusters(
    new_centroids: &mut Array2<f64>,
    prev_centroids: &Array2<f64>,
    counts: &[usize],
    policy: EmptyClusterPolicy,
) -> Result<()> {
    for (c, &count) in counts.iter().enumerate() {
        if count > 0 {
            continue;
        }
        match policy {
            EmptyClusterPolicy::RetainPrevious => {
                warn!("Cluster {} received no points; keeping its centroid", c);
                new_centroids.row_mut(c).assign(&prev_centroids.row(c));
            }
            EmptyClusterPolicy::Fail => {
                return Err(ClusterError::DegenerateInput(format!(
                    "cluster {} received no points",
                    c
                )));
            }
        }
    }
    Ok(())
}

/// Largest Euclidean distance any centroid moved.
fn max_centroid_shift(curr: &Array2<f64>, prev: &Array2<f64>) -> f64 {
    curr.rows()
        .into_iter()
        .zip(prev.rows())
        .map(|(a, b)| euclidean_distance(a, b))
        .fold(0.0, f64::max)
}
