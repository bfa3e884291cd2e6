// Binary logistic regression over sparse TF-IDF features.
//
// The objective is the mean logistic loss plus an L2 penalty of
// ||w||² / (2·C·n). That has the same minimizer as the usual
// `0.5·||w||² + C·Σ loss` form, so `c` behaves like the familiar
// inverse-regularization knob. The bias is never penalized.
//
// It is minimized with argmin's L-BFGS and a More-Thuente line search. The
// parameter vector is the weights followed by the bias, and the cost and
// gradient walk the sparse rows directly, so no dense design matrix is
// ever built.

use anyhow::{Context, Result};
use argmin::core::{CostFunction, Executor, Gradient, State, TerminationReason};
use argmin::solver::linesearch::MoreThuenteLineSearch;
use argmin::solver::quasinewton::LBFGS;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::text::vectorizer::SparseVector;

/// Number of correction pairs L-BFGS keeps.
const LBFGS_MEMORY: usize = 10;

/// Optimizer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Hard cap on solver iterations
    pub max_iter: usize,
    /// Inverse regularization strength (larger = weaker penalty)
    pub c: f64,
    /// Stop once the gradient's L2 norm is below this
    pub tolerance: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            max_iter: 300,
            c: 1.0,
            tolerance: 1e-4,
        }
    }
}

/// Learned weights and bias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    pub weights: Vec<f64>,
    pub bias: f64,
}

/// How the optimizer finished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitReport {
    pub iterations: usize,
    pub converged: bool,
    /// Regularized objective at the returned parameters
    pub final_loss: f64,
}

/// A fitted logistic regression classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticRegression {
    params: ModelParameters,
}

impl LogisticRegression {
    pub fn from_parameters(params: ModelParameters) -> Self {
        Self { params }
    }

    /// Fit on sparse feature rows in a `dimension`-wide space.
    ///
    /// Running out of iterations is not an error: the final parameters are
    /// returned and the report says `converged: false`.
    pub fn fit(
        config: &ClassifierConfig,
        features: &[SparseVector],
        labels: &[bool],
        dimension: usize,
    ) -> Result<(Self, FitReport)> {
        if features.is_empty() {
            anyhow::bail!("Cannot fit a classifier with zero samples");
        }
        if features.len() != labels.len() {
            anyhow::bail!(
                "Got {} feature rows but {} labels",
                features.len(),
                labels.len()
            );
        }
        if config.c <= 0.0 {
            anyhow::bail!("Inverse regularization c must be positive, got {}", config.c);
        }
        if let Some(&(index, _)) = features
            .iter()
            .flat_map(|row| row.entries.iter())
            .find(|&&(index, _)| index >= dimension)
        {
            anyhow::bail!("Feature index {index} exceeds dimension {dimension}");
        }

        let problem = Objective {
            features,
            labels,
            dimension,
            reg: 1.0 / (config.c * features.len() as f64),
        };
        let reg = problem.reg;

        let solver = LBFGS::new(MoreThuenteLineSearch::new(), LBFGS_MEMORY)
            .with_tolerance_grad(config.tolerance)?;
        let result = Executor::new(problem, solver)
            .configure(|state| {
                state
                    .param(vec![0.0; dimension + 1])
                    .max_iters(config.max_iter as u64)
            })
            .run()
            .context("Logistic regression solver failed")?;

        let state = result.state();
        let iterations = state.get_iter() as usize;
        let converged = matches!(
            state.get_termination_reason(),
            Some(TerminationReason::SolverConverged)
        );
        let mut weights = state
            .get_best_param()
            .cloned()
            .context("Solver finished without any parameters")?;
        let bias = weights.pop().unwrap_or(0.0);
        let params = ModelParameters { weights, bias };

        let final_loss = objective(&params, features, labels, reg);

        if converged {
            debug!(iterations, final_loss, "Logistic regression converged");
        } else {
            warn!(
                max_iter = config.max_iter,
                final_loss,
                "Logistic regression hit the iteration cap before converging; \
                 using the last parameters"
            );
        }

        Ok((
            Self { params },
            FitReport {
                iterations,
                converged,
                final_loss,
            },
        ))
    }

    /// Probability that the features belong to the positive (toxic) class.
    pub fn predict_probability(&self, features: &SparseVector) -> f64 {
        sigmoid(self.decision_function(features))
    }

    /// Raw linear score before the sigmoid.
    pub fn decision_function(&self, features: &SparseVector) -> f64 {
        features.dot(&self.params.weights) + self.params.bias
    }

    pub fn parameters(&self) -> &ModelParameters {
        &self.params
    }
}

/// The regularized loss as an argmin problem. Parameters are laid out as
/// `[w_0, .., w_{d-1}, bias]`.
struct Objective<'a> {
    features: &'a [SparseVector],
    labels: &'a [bool],
    dimension: usize,
    reg: f64,
}

impl Objective<'_> {
    fn split<'p>(&self, param: &'p [f64]) -> (&'p [f64], f64) {
        (&param[..self.dimension], param[self.dimension])
    }
}

impl CostFunction for Objective<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, param: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        let (weights, bias) = self.split(param);
        Ok(loss(weights, bias, self.features, self.labels, self.reg))
    }
}

impl Gradient for Objective<'_> {
    type Param = Vec<f64>;
    type Gradient = Vec<f64>;

    fn gradient(&self, param: &Self::Param) -> Result<Self::Gradient, argmin::core::Error> {
        let (weights, bias) = self.split(param);
        let n = self.features.len() as f64;
        let mut grad = vec![0.0; self.dimension + 1];

        for (row, &label) in self.features.iter().zip(self.labels) {
            let p = sigmoid(row.dot(weights) + bias);
            let error = p - if label { 1.0 } else { 0.0 };
            grad[self.dimension] += error;
            for &(j, v) in &row.entries {
                grad[j] += error * v;
            }
        }

        for (g, w) in grad[..self.dimension].iter_mut().zip(weights) {
            *g = *g / n + self.reg * w;
        }
        grad[self.dimension] /= n;
        Ok(grad)
    }
}

/// Sigmoid activation: maps any real number to (0, 1).
pub(crate) fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// ln(1 + e^x) without overflow.
fn softplus(x: f64) -> f64 {
    if x > 0.0 {
        x + (-x).exp().ln_1p()
    } else {
        x.exp().ln_1p()
    }
}

fn objective(params: &ModelParameters, features: &[SparseVector], labels: &[bool], reg: f64) -> f64 {
    loss(&params.weights, params.bias, features, labels, reg)
}

fn loss(weights: &[f64], bias: f64, features: &[SparseVector], labels: &[bool], reg: f64) -> f64 {
    let n = features.len() as f64;
    let data: f64 = features
        .iter()
        .zip(labels)
        .map(|(row, &label)| {
            let z = row.dot(weights) + bias;
            // -log σ(z) for positives, -log(1 - σ(z)) for negatives
            if label {
                softplus(-z)
            } else {
                softplus(z)
            }
        })
        .sum();
    let penalty: f64 = weights.iter().map(|w| w * w).sum::<f64>() * reg / 2.0;
    data / n + penalty
}
