//! Newton-Raphson root finding.

use crate::domain::error::PayoffError;

/// Stopping rules for [`NewtonRaphson`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Converged once `|f(x)| <= tolerance`.
    pub tolerance: f64,
    pub max_iterations: usize,
    pub initial_guess: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-5,
            max_iterations: 100,
            initial_guess: 0.1,
        }
    }
}

/// Newton's method with an explicit derivative:
/// `x_{n+1} = x_n - f(x_n) / f'(x_n)`.
#[derive(Debug, Clone, Default)]
pub struct NewtonRaphson {
    config: SolverConfig,
}

impl NewtonRaphson {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn find_root<F, G>(&self, f: F, f_prime: G) -> Result<f64, PayoffError>
    where
        F: Fn(f64) -> f64,
        G: Fn(f64) -> f64,
    {
        let mut x = self.config.initial_guess;

        for _ in 0..=self.config.max_iterations {
            let fx = f(x);
            if fx.abs() <= self.config.tolerance {
                return Ok(x);
            }

            let dfx = f_prime(x);
            if dfx.abs() < 1e-30 {
                return Err(PayoffError::Solver {
                    reason: format!("derivative vanished at x = {x}"),
                });
            }

            x -= fx / dfx;
            if !x.is_finite() {
                return Err(PayoffError::Solver {
                    reason: "iteration produced a non-finite value".into(),
                });
            }
        }

        Err(PayoffError::Solver {
            reason: format!(
                "no convergence after {} iterations",
                self.config.max_iterations
            ),
        })
    }
}
