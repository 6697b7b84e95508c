use crate::api::{ClusterConfig, Clusterer};
use crate::error::{ClusterError, Result};
use crate::goal::Goal;
use crate::metrics::Silhouette;
use crate::utils::{format_matrix, validate_k, validate_max_iter};
use crate::vector_store::VectorSet;
use clap::{Parser, Subcommand};
use log::debug;
use std::path::{Path, PathBuf};

/// Printed on stdout for every failure, whatever its cause.
pub const ERR_MSG: &str = "An Error Has Occurred";

/// K-means default when the iteration count is omitted on the command line.
pub const DEFAULT_KMEANS_ITER: usize = 200;

#[derive(Debug, Parser)]
#[command(
    name = "symnmf",
    version,
    about = "SymNMF and K-means clustering of comma separated points"
)]
pub struct Cli {
    /// YAML file overriding numeric settings.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the symnmf, sym, ddg or norm matrix of the input points.
    Symnmf {
        k: usize,
        goal: String,
        file: PathBuf,
    },
    /// Print the K-means centroids: `kmeans <k> [max_iter] <file>`.
    Kmeans {
        k: usize,
        #[arg(num_args = 1..=2, value_names = ["MAX_ITER", "FILE"])]
        rest: Vec<String>,
    },
    /// Compare symnmf and K-means by silhouette score.
    Analysis { k: usize, file: PathBuf },
}

/// Split the positional `[max_iter] <file>` tail of the kmeans command.
pub fn kmeans_args(rest: &[String]) -> Result<(usize, PathBuf)> {
    match rest {
        [file] => Ok((DEFAULT_KMEANS_ITER, PathBuf::from(file))),
        [iter, file] => {
            let iter = iter.parse::<usize>().map_err(|e| {
                ClusterError::InvalidParameter(format!("max_iter {:?}: {}", iter, e))
            })?;
            Ok((iter, PathBuf::from(file)))
        }
        _ => Err(ClusterError::InvalidParameter(
            "expected [max_iter] <file>".to_string(),
        )),
    }
}

/// Points from a `.txt` file; any other extension is rejected.
pub fn load_points(file: &Path) -> Result<VectorSet> {
    if file.extension().and_then(|e| e.to_str()) != Some("txt") {
        return Err(ClusterError::InvalidInput(format!(
            "expected a .txt input file, got {}",
            file.display()
        )));
    }
    VectorSet::from_file(file)
}

/// Builds the whole output before anything is printed, so a failure
/// never leaves partial results on stdout.
pub fn run(cli: Cli) -> Result<String> {
    let config = match &cli.config {
        Some(path) => ClusterConfig::from_file(path)?,
        None => ClusterConfig::default(),
    };

    match cli.command {
        Command::Symnmf { k, goal, file } => {
            let goal: Goal = goal.parse()?;
            let points = load_points(&file)?;
            validate_k(k, points.len())?;
            debug!("goal={} n={} k={}", goal, points.len(), k);

            let clusterer = Clusterer::new(config);
            let matrix = clusterer.goal_matrix(goal, &points, k)?;
            Ok(format_matrix(&matrix))
        }
        Command::Kmeans { k, rest } => {
            let (max_iter, file) = kmeans_args(&rest)?;
            let points = load_points(&file)?;
            validate_k(k, points.len())?;
            validate_max_iter(max_iter)?;

            let clusterer = Clusterer::new(config.with_kmeans_max_iter(max_iter));
            let outcome = clusterer.kmeans(&points, k)?;
            Ok(format_matrix(&outcome.centroids))
        }
        Command::Analysis { k, file } => {
            let points = load_points(&file)?;
            validate_k(k, points.len())?;

            let report = Clusterer::new(config).analyze(&points, k, &Silhouette)?;
            Ok(format!("nmf: {:.4}\nkmeans: {:.4}\n", report.nmf, report.kmeans))
        }
    }
}
