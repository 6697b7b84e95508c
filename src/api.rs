use crate::error::{ClusterError, Result};
use crate::extract::{argmax_rows, ClusterAssignment};
use crate::goal::{run_goal, Goal};
use crate::kmeans::{run_kmeans, EmptyClusterPolicy, KMeansConfig, KMeansOutcome};
use crate::metrics::QualityMetric;
use crate::symnmf::{symnmf, SymNmfConfig};
use crate::utils::{validate_k, validate_max_iter};
use crate::vector_store::VectorSet;
use log::info;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// K-means knobs that do not depend on `k`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KMeansSettings {
    pub max_iter: usize,
    pub epsilon: f64,
    pub empty_cluster: EmptyClusterPolicy,
}

impl Default for KMeansSettings {
    fn default() -> Self {
        Self {
            max_iter: 300,
            epsilon: 0.001,
            empty_cluster: EmptyClusterPolicy::RetainPrevious,
        }
    }
}

impl KMeansSettings {
    pub fn for_k(&self, k: usize) -> KMeansConfig {
        KMeansConfig::new(k)
            .with_max_iter(self.max_iter)
            .with_epsilon(self.epsilon)
            .with_empty_cluster(self.empty_cluster)
    }

    pub fn validate(&self) -> Result<()> {
        validate_max_iter(self.max_iter)?;
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(ClusterError::InvalidParameter(format!(
                "kmeans epsilon must be a positive number, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}

/// Numeric settings for both pipelines.
///
/// Defaults reproduce the fixed constants of the reference tool; a YAML
/// file may override any subset, e.g.
///
/// ```yaml
/// kmeans:
///   max_iter: 200
/// symnmf:
///   seed: 7
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    pub kmeans: KMeansSettings,
    pub symnmf: SymNmfConfig,
}

impl ClusterConfig {
    /// Load config from YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: ClusterConfig = serde_yaml::from_str(content)?;
        config.kmeans.validate()?;
        config.symnmf.validate()?;
        Ok(config)
    }

    pub fn with_kmeans_max_iter(mut self, max_iter: usize) -> Self {
        self.kmeans.max_iter = max_iter;
        self
    }

    pub fn with_symnmf(mut self, symnmf: SymNmfConfig) -> Self {
        self.symnmf = symnmf;
        self
    }
}

/// Silhouette-style scores of the two pipelines on the same points.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisReport {
    pub nmf: f64,
    pub kmeans: f64,
    pub nmf_labels: ClusterAssignment,
    pub kmeans_labels: ClusterAssignment,
}

/// Facade over the two clustering pipelines.
pub struct Clusterer {
    cfg: ClusterConfig,
}

impl Clusterer {
    pub fn new(cfg: ClusterConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.cfg
    }

    /// Matrix for `goal` (`n x k` membership or an `n x n` graph matrix).
    pub fn goal_matrix(&self, goal: Goal, points: &VectorSet, k: usize) -> Result<Array2<f64>> {
        validate_k(k, points.len())?;
        run_goal(goal, points, k, &self.cfg.symnmf)
    }

    pub fn kmeans(&self, points: &VectorSet, k: usize) -> Result<KMeansOutcome> {
        run_kmeans(points, &self.cfg.kmeans.for_k(k))
    }

    /// Cluster labels from the argmax of the symNMF membership rows.
    pub fn symnmf_labels(&self, points: &VectorSet, k: usize) -> Result<ClusterAssignment> {
        let outcome = symnmf(points, k, &self.cfg.symnmf)?;
        Ok(argmax_rows(&outcome.membership))
    }

    /// Run both pipelines independently and score each assignment with `metric`.
    pub fn analyze<M: QualityMetric>(
        &self,
        points: &VectorSet,
        k: usize,
        metric: &M,
    ) -> Result<AnalysisReport> {
        validate_k(k, points.len())?;

        let kmeans_labels = self.kmeans(points, k)?.labels;
        let nmf_labels = self.symnmf_labels(points, k)?;

        let nmf = metric.score(points, &nmf_labels)?;
        let kmeans = metric.score(points, &kmeans_labels)?;
        info!("analysis scores: nmf={:.4}, kmeans={:.4}", nmf, kmeans);

        Ok(AnalysisReport {
            nmf,
            kmeans,
            nmf_labels,
            kmeans_labels,
        })
    }
}
