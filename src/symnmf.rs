use crate::error::{ClusterError, Result};
use crate::similarity::{degrees, normalize, sym};
use crate::utils::{frobenius_norm_squared, validate_k, validate_max_iter};
use crate::vector_store::VectorSet;
use log::{debug, info, trace};
use ndarray::Array2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Keeps the update ratio finite when a row of `H` collapses to zero.
const DENOMINATOR_GUARD: f64 = 1e-12;

/// Settings for the symNMF factorization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymNmfConfig {
    /// Iteration cap.
    pub max_iter: usize,

    /// Stop once `||H_new - H_old||_F^2` drops below this.
    pub epsilon: f64,

    /// Damping of the multiplicative step, in `(0, 1]`. `1.0` applies the
    /// plain ratio `(AH) / (HH^T H)`; `0.5` averages it with the identity.
    pub beta: f64,

    /// Seed for the initial membership matrix.
    pub seed: u64,
}

impl Default for SymNmfConfig {
    fn default() -> Self {
        Self {
            max_iter: 300,
            epsilon: 1e-4,
            beta: 0.5,
            seed: 0,
        }
    }
}

impl SymNmfConfig {
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_max_iter(self.max_iter)?;
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(ClusterError::InvalidParameter(format!(
                "epsilon must be a positive number, got {}",
                self.epsilon
            )));
        }
        if !(self.beta > 0.0 && self.beta <= 1.0) {
            return Err(ClusterError::InvalidParameter(format!(
                "beta must lie in (0, 1], got {}",
                self.beta
            )));
        }
        Ok(())
    }
}

/// Result of [`factorize`].
#[derive(Clone, Debug)]
pub struct SymNmfOutcome {
    /// Final `n x k` membership matrix.
    pub membership: Array2<f64>,
    /// Number of update steps performed.
    pub iterations: usize,
    /// Whether the step size fell below `epsilon` before `max_iter`.
    pub converged: bool,
    /// Squared Frobenius norm of `H_new - H_old` for every step, in order.
    pub deltas: Vec<f64>,
}

impl SymNmfOutcome {
    pub fn last_delta(&self) -> Option<f64> {
        self.deltas.last().copied()
    }
}

/// Draw the initial `n x k` membership matrix for normalized matrix `a`.
///
/// Entries are uniform in `[0, 2 * sqrt(m / k))` where `m` is the mean entry
/// of `a`.
pub fn initialize_membership<R: Rng + ?Sized>(
    a: &Array2<f64>,
    k: usize,
    rng: &mut R,
) -> Result<Array2<f64>> {
    let n = a.nrows();
    validate_k(k, n)?;

    let m = a.mean().unwrap_or(0.0);
    let upper = 2.0 * (m / k as f64).sqrt();
    if !(upper.is_finite() && upper > 0.0) {
        return Err(ClusterError::DegenerateInput(format!(
            "normalized matrix mean {} gives no valid initialization range",
            m
        )));
    }
    debug!("Initializing {}x{} membership in [0, {:.6})", n, k, upper);

    Ok(Array2::from_shape_simple_fn((n, k), || rng.gen::<f64>() * upper))
}

/// One damped multiplicative update of `h` against `a`.
///
/// The whole previous iterate is read before any entry of the new one is
/// written, since `H H^T H` couples every row.
fn update_membership(a: &Array2<f64>, h: &Array2<f64>, beta: f64) -> Result<Array2<f64>> {
    let numerator = a.dot(h);
    // H (H^T H) keeps the intermediate at k x k instead of n x n.
    let denominator = h.dot(&h.t().dot(h));

    let mut next = h.clone();
    for ((v, &num), &den) in next
        .iter_mut()
        .zip(numerator.iter())
        .zip(denominator.iter())
    {
        *v *= 1.0 - beta + beta * (num / (den + DENOMINATOR_GUARD));
    }

    if next.iter().any(|v| !v.is_finite()) {
        return Err(ClusterError::NumericalInstability(
            "membership matrix contains non-finite values".to_string(),
        ));
    }
    Ok(next)
}

/// Factorize `a ~ H H^T` starting from `h0`.
///
/// Stops when the squared Frobenius norm of the step falls below
/// `config.epsilon` or after `config.max_iter` steps. Hitting the cap is not
/// an error; check [`SymNmfOutcome::converged`].
pub fn factorize(a: &Array2<f64>, h0: Array2<f64>, config: &SymNmfConfig) -> Result<SymNmfOutcome> {
    config.validate()?;

    let n = a.nrows();
    if a.ncols() != n {
        return Err(ClusterError::InvalidParameter(format!(
            "normalized matrix must be square, got {}x{}",
            a.nrows(),
            a.ncols()
        )));
    }
    let k = h0.ncols();
    validate_k(k, n)?;
    if h0.nrows() != n {
        return Err(ClusterError::InvalidParameter(format!(
            "initial membership has {} rows, expected {}",
            h0.nrows(),
            n
        )));
    }
    if a.iter().chain(h0.iter()).any(|v| !v.is_finite()) {
        return Err(ClusterError::NumericalInstability(
            "factorization input contains non-finite values".to_string(),
        ));
    }
    if h0.iter().any(|&v| v < 0.0) {
        return Err(ClusterError::InvalidParameter(
            "initial membership must be non-negative".to_string(),
        ));
    }

    let mut h = h0;
    let mut deltas = Vec::new();
    let mut converged = false;

    for iter in 0..config.max_iter {
        let next = update_membership(a, &h, config.beta)?;
        let delta = frobenius_norm_squared(&(&next - &h));
        trace!("symnmf iteration {}: delta={:.8}", iter, delta);

        h = next;
        deltas.push(delta);
        if delta < config.epsilon {
            converged = true;
            break;
        }
    }

    if converged {
        debug!("symnmf converged after {} iterations", deltas.len());
    } else {
        debug!(
            "symnmf stopped at max_iter={} without converging",
            config.max_iter
        );
    }

    Ok(SymNmfOutcome {
        membership: h,
        iterations: deltas.len(),
        converged,
        deltas,
    })
}

/// Full pipeline: similarity graph, normalization, seeded initialization
/// and factorization.
pub fn symnmf(points: &VectorSet, k: usize, config: &SymNmfConfig) -> Result<SymNmfOutcome> {
    validate_k(k, points.len())?;
    config.validate()?;
    info!(
        "Running symnmf on {} points (dim={}), k={}",
        points.len(),
        points.dim(),
        k
    );

    let a = {
        let w = sym(points);
        let d = degrees(&w);
        normalize(&w, &d)?
    };

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let h0 = initialize_membership(&a, k, &mut rng)?;
    factorize(&a, h0, config)
}
