use crate::error::{ClusterError, Result};
use crate::similarity::{ddg, norm, sym};
use crate::symnmf::{symnmf, SymNmfConfig};
use crate::vector_store::VectorSet;
use ndarray::Array2;
use std::fmt;
use std::str::FromStr;

/// Matrix a `symnmf` run should produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Goal {
    SymNmf,
    Sym,
    Ddg,
    Norm,
}

impl Goal {
    pub const ALL: [Goal; 4] = [Goal::SymNmf, Goal::Sym, Goal::Ddg, Goal::Norm];

    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::SymNmf => "symnmf",
            Goal::Sym => "sym",
            Goal::Ddg => "ddg",
            Goal::Norm => "norm",
        }
    }
}

impl FromStr for Goal {
    type Err = ClusterError;

    fn from_str(s: &str) -> Result<Self> {
        Goal::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| ClusterError::InvalidParameter(format!("unknown goal {:?}", s)))
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compute the matrix requested by `goal`: `n x k` for symnmf, `n x n` otherwise.
pub fn run_goal(goal: Goal, points: &VectorSet, k: usize, config: &SymNmfConfig) -> Result<Array2<f64>> {
    match goal {
        Goal::SymNmf => Ok(symnmf(points, k, config)?.membership),
        Goal::Sym => Ok(sym(points)),
        Goal::Ddg => Ok(ddg(points)),
        Goal::Norm => norm(points),
    }
}
