//! Generic multivariate Newton-Raphson root finder.
//!
//! Finds `x*` with `F(x*) ≈ 0` for a vector-valued score function `F`
//! given its Jacobian, iterating `x ← x − J(x)⁻¹ F(x)` with a linear
//! solve at each step (no explicit matrix inversion). Pure and reentrant:
//! one solve owns its entire state.

use nalgebra::{DMatrix, DVector};
use pu_core::UndefinedCause;
use thiserror::Error;

/// A square system of score equations with its Jacobian.
///
/// Implementors provide the score vector; the Jacobian defaults to a
/// central-difference approximation and should be overridden when an
/// analytic form is available.
pub trait ScoreSystem {
    /// Number of unknowns (and equations).
    fn dim(&self) -> usize;

    /// Score vector evaluated at `x`.
    fn value(&self, x: &[f64]) -> Vec<f64>;

    /// Jacobian of the score vector at `x` (numerical if not overridden).
    fn jacobian(&self, x: &[f64]) -> DMatrix<f64> {
        let n = self.dim();
        let mut jacobian = DMatrix::zeros(n, n);

        for j in 0..n {
            // Adaptive step size relative to the coordinate magnitude.
            let eps = 1e-6 * x[j].abs().max(1.0);

            let mut plus = x.to_vec();
            plus[j] += eps;
            let f_plus = self.value(&plus);

            let mut minus = x.to_vec();
            minus[j] -= eps;
            let f_minus = self.value(&minus);

            for i in 0..n {
                jacobian[(i, j)] = (f_plus[i] - f_minus[i]) / (2.0 * eps);
            }
        }

        jacobian
    }
}

/// Configuration for the Newton-Raphson solver.
#[derive(Debug, Clone, Copy)]
pub struct NewtonConfig {
    /// Maximum number of iterations before giving up.
    pub max_iterations: u64,
    /// Convergence tolerance on the infinity norm of the update step.
    pub tolerance: f64,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self { max_iterations: 300, tolerance: 1e-6 }
    }
}

/// A converged solution.
#[derive(Debug, Clone)]
pub struct NewtonSolution {
    /// The root estimate.
    pub parameters: Vec<f64>,
    /// Number of update steps taken.
    pub iterations: u64,
}

/// Why a solve failed.
///
/// Both conditions are reported to the caller, which decides whether an
/// undefined model result is an acceptable degraded outcome.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveError {
    /// The iteration bound was reached before the step tolerance was met.
    #[error("no convergence within {iterations} iterations")]
    NonConvergence {
        /// The configured iteration bound.
        iterations: u64,
    },

    /// The linear solve was ill-posed (singular or non-finite system) at
    /// an iterate.
    #[error("singular Jacobian at iteration {iteration}")]
    SingularJacobian {
        /// The iteration at which the solve broke down.
        iteration: u64,
    },
}

impl From<SolveError> for UndefinedCause {
    fn from(err: SolveError) -> Self {
        match err {
            SolveError::NonConvergence { .. } => UndefinedCause::NonConvergence,
            SolveError::SingularJacobian { .. } => UndefinedCause::SingularJacobian,
        }
    }
}

/// Newton-Raphson solver over a [`ScoreSystem`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NewtonSolver {
    config: NewtonConfig,
}

impl NewtonSolver {
    /// Create a solver with the given configuration.
    pub fn new(config: NewtonConfig) -> Self {
        Self { config }
    }

    /// Access the solver configuration.
    pub fn config(&self) -> &NewtonConfig {
        &self.config
    }

    /// Solve `F(x) = 0` starting from `initial`.
    ///
    /// Converges when the infinity norm of the update step falls below the
    /// configured tolerance; fails with [`SolveError::NonConvergence`] at
    /// the iteration bound and [`SolveError::SingularJacobian`] when the
    /// linear solve is not well-posed at an iterate.
    pub fn solve(
        &self,
        system: &dyn ScoreSystem,
        initial: &[f64],
    ) -> std::result::Result<NewtonSolution, SolveError> {
        debug_assert_eq!(initial.len(), system.dim());

        let mut x = DVector::from_column_slice(initial);

        for iteration in 1..=self.config.max_iterations {
            let score = DVector::from_vec(system.value(x.as_slice()));
            if score.iter().any(|v| !v.is_finite()) {
                return Err(SolveError::SingularJacobian { iteration });
            }

            let jacobian = system.jacobian(x.as_slice());
            if jacobian.iter().any(|v| !v.is_finite()) {
                return Err(SolveError::SingularJacobian { iteration });
            }

            let step = jacobian
                .lu()
                .solve(&score)
                .ok_or(SolveError::SingularJacobian { iteration })?;
            if step.iter().any(|v| !v.is_finite()) {
                return Err(SolveError::SingularJacobian { iteration });
            }

            x -= &step;

            if step.amax() < self.config.tolerance {
                return Ok(NewtonSolution {
                    parameters: x.iter().copied().collect(),
                    iterations: iteration,
                });
            }
        }

        Err(SolveError::NonConvergence { iterations: self.config.max_iterations })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `F(x) = x − c` with identity Jacobian.
    struct Shifted(Vec<f64>);

    impl ScoreSystem for Shifted {
        fn dim(&self) -> usize {
            self.0.len()
        }

        fn value(&self, x: &[f64]) -> Vec<f64> {
            x.iter().zip(self.0.iter()).map(|(xi, ci)| xi - ci).collect()
        }

        fn jacobian(&self, _x: &[f64]) -> DMatrix<f64> {
            DMatrix::identity(self.dim(), self.dim())
        }
    }

    /// Decoupled quadratics, exercising the default numerical Jacobian.
    struct Quadratics;

    impl ScoreSystem for Quadratics {
        fn dim(&self) -> usize {
            2
        }

        fn value(&self, x: &[f64]) -> Vec<f64> {
            vec![x[0] * x[0] - 4.0, x[1] * x[1] - 9.0]
        }
    }

    /// `x² + 1 = 0` has no real root; steps never shrink below 1.
    struct NoRealRoot;

    impl ScoreSystem for NoRealRoot {
        fn dim(&self) -> usize {
            1
        }

        fn value(&self, x: &[f64]) -> Vec<f64> {
            vec![x[0] * x[0] + 1.0]
        }

        fn jacobian(&self, x: &[f64]) -> DMatrix<f64> {
            DMatrix::from_element(1, 1, 2.0 * x[0])
        }
    }

    struct SingularSystem;

    impl ScoreSystem for SingularSystem {
        fn dim(&self) -> usize {
            2
        }

        fn value(&self, x: &[f64]) -> Vec<f64> {
            vec![x[0] + x[1], x[0] + x[1]]
        }

        fn jacobian(&self, _x: &[f64]) -> DMatrix<f64> {
            DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0])
        }
    }

    #[test]
    fn test_linear_system_single_update() {
        let system = Shifted(vec![3.0, -2.0]);
        let solver = NewtonSolver::default();
        let solution = solver.solve(&system, &[100.0, -75.0]).unwrap();
        // One Newton update lands exactly on the root; the following step
        // is zero, which is what triggers convergence.
        assert_eq!(solution.parameters, vec![3.0, -2.0]);
        assert!(solution.iterations <= 2);
    }

    #[test]
    fn test_linear_system_from_root() {
        let system = Shifted(vec![1.5]);
        let solution = NewtonSolver::default().solve(&system, &[1.5]).unwrap();
        assert_eq!(solution.parameters, vec![1.5]);
        assert_eq!(solution.iterations, 1);
    }

    #[test]
    fn test_numerical_jacobian_default() {
        let solution = NewtonSolver::default().solve(&Quadratics, &[1.0, 1.0]).unwrap();
        assert!((solution.parameters[0] - 2.0).abs() < 1e-8);
        assert!((solution.parameters[1] - 3.0).abs() < 1e-8);
    }

    #[test]
    fn test_non_convergence() {
        let config = NewtonConfig { max_iterations: 50, tolerance: 1e-6 };
        let err = NewtonSolver::new(config).solve(&NoRealRoot, &[0.7]).unwrap_err();
        assert_eq!(err, SolveError::NonConvergence { iterations: 50 });
    }

    #[test]
    fn test_singular_jacobian() {
        let err = NewtonSolver::default().solve(&SingularSystem, &[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, SolveError::SingularJacobian { iteration: 1 }));
    }

    #[test]
    fn test_failures_map_to_undefined_causes() {
        let cause: UndefinedCause = SolveError::NonConvergence { iterations: 10 }.into();
        assert_eq!(cause, UndefinedCause::NonConvergence);
        let cause: UndefinedCause = SolveError::SingularJacobian { iteration: 3 }.into();
        assert_eq!(cause, UndefinedCause::SingularJacobian);
    }
}
