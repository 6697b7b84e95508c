//! Clustering of dense point sets by symmetric non-negative matrix
//! factorization of a Gaussian similarity graph, and by K-means.

pub mod api;
pub use api::{AnalysisReport, ClusterConfig, Clusterer, KMeansSettings};

pub mod cli;
pub mod error;
pub use error::{ClusterError, Result};

pub mod extract;
pub mod goal;
pub mod kmeans;
pub mod metrics;
pub mod similarity;
pub mod symnmf;
pub mod utils;
pub mod vector_store;

pub use extract::{argmax_rows, ClusterAssignment};
pub use goal::Goal;
pub use metrics::{QualityMetric, Silhouette};
pub use vector_store::VectorSet;
