// Domain service interface for solving optimization models
// Defines the contract that any solver backend must follow, so engines can be
// swapped without touching model construction or result extraction

use super::models::{MipProblem, Solution};

/// Error types for the solver service
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    #[error("Solver not available: {0}")]
    SolverNotAvailable(String),

    #[error("Solver execution failed: {0}")]
    ExecutionFailed(String),
}

pub type Result<T> = std::result::Result<T, SolverError>;

/// Interface every solver backend implements
///
/// `solve` blocks until the engine reports a terminal status. Infeasible and
/// unbounded outcomes are ordinary [`Solution`] values; `Err` is reserved for
/// models that are structurally broken or engines that fail outright.
pub trait SolverService: Send + Sync {
    /// Solve an optimization model
    fn solve(&self, problem: &MipProblem) -> Result<Solution>;

    /// Check that a model is structurally sound before it reaches an engine
    fn validate(&self, problem: &MipProblem) -> Result<()> {
        let mut errors = Vec::new();

        if problem.variables.is_empty() {
            errors.push("Model has no variables".to_string());
        }

        if problem.objective.terms.is_empty() {
            errors.push("Objective has no terms".to_string());
        }

        let num_vars = problem.num_variables();

        for &(var, _) in &problem.objective.terms {
            if var >= num_vars {
                errors.push(format!(
                    "Objective references unknown variable id {}",
                    var
                ));
            }
        }

        for constraint in &problem.constraints {
            for &(var, _) in &constraint.terms {
                if var >= num_vars {
                    errors.push(format!(
                        "Constraint '{}' references unknown variable id {}",
                        constraint.name, var
                    ));
                }
            }
        }

        for (i, var) in problem.variables.iter().enumerate() {
            if let Some(upper) = var.upper_bound {
                if var.lower_bound > upper {
                    errors.push(format!(
                        "Variable {} '{}' has lower bound ({}) > upper bound ({})",
                        i, var.name, var.lower_bound, upper
                    ));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SolverError::InvalidProblem(errors.join("; ")))
        }
    }

    /// Get the name of this solver backend
    fn name(&self) -> &str;

    /// Check if this solver supports mixed-integer programming
    fn supports_mip(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Constraint, Variable};
    use crate::domain::value_objects::ConstraintType;

    struct NoopSolver;

    impl SolverService for NoopSolver {
        fn solve(&self, _problem: &MipProblem) -> Result<Solution> {
            unimplemented!()
        }

        fn name(&self) -> &str {
            "noop"
        }

        fn supports_mip(&self) -> bool {
            false
        }
    }

    fn small_problem() -> MipProblem {
        let mut problem = MipProblem::new("test");
        let x = problem.add_variable(Variable::continuous("x"));
        problem.add_objective_term(x, 1.0);
        problem.add_constraint(
            Constraint::new(ConstraintType::LessThanOrEqual, vec![(x, 1.0)], 10.0)
                .with_name("cap"),
        );
        problem
    }

    #[test]
    fn validate_accepts_well_formed_model() {
        assert!(NoopSolver.validate(&small_problem()).is_ok());
    }

    #[test]
    fn validate_rejects_empty_model() {
        let problem = MipProblem::new("empty");
        let err = NoopSolver.validate(&problem).unwrap_err();
        assert!(err.to_string().contains("no variables"));
    }

    #[test]
    fn validate_rejects_unknown_variable_in_constraint() {
        let mut problem = small_problem();
        problem.add_constraint(
            Constraint::new(ConstraintType::Equal, vec![(99, 1.0)], 0.0).with_name("bad"),
        );
        let err = NoopSolver.validate(&problem).unwrap_err();
        assert!(err.to_string().contains("unknown variable id 99"));
    }

    #[test]
    fn validate_rejects_crossed_bounds() {
        let mut problem = small_problem();
        problem.add_variable(Variable::continuous("y").with_bounds(5.0, Some(1.0)));
        let err = NoopSolver.validate(&problem).unwrap_err();
        assert!(err.to_string().contains("lower bound"));
    }
}
