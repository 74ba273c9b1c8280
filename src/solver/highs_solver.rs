// HiGHS adapter
// Translates the domain MIP model onto the HiGHS column/row API and maps the
// engine verdict back onto domain statuses

use crate::domain::{
    models::{MipProblem, Solution as DomainSolution, SolverStats},
    solver_service::{Result, SolverError, SolverService},
    value_objects::{ConstraintType, OptimizationType, SolutionStatus},
};
use highs::{HighsModelStatus, RowProblem, Sense};
use std::time::Instant;
use tracing::debug;

use super::INTEGER_FEASIBILITY_TOLERANCE;

pub struct HighsSolver;

impl HighsSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HighsSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for HighsSolver {
    fn solve(&self, problem: &MipProblem) -> Result<DomainSolution> {
        // Validate first
        self.validate(problem)?;

        let start_time = Instant::now();
        let num_vars = problem.num_variables();

        // HiGHS takes objective coefficients at column creation, so fold the
        // sparse terms into a dense per-column cost first.
        let mut col_costs = vec![0.0; num_vars];
        for &(var, coeff) in &problem.objective.terms {
            col_costs[var] += coeff;
        }

        let mut pb = RowProblem::default();
        let mut cols = Vec::with_capacity(num_vars);

        for (i, var_def) in problem.variables.iter().enumerate() {
            let lower = var_def.lower_bound;
            let upper = var_def.upper_bound.unwrap_or(f64::INFINITY);

            let col = if var_def.is_integer() {
                pb.add_integer_column(col_costs[i], lower..=upper)
            } else {
                pb.add_column(col_costs[i], lower..=upper)
            };
            cols.push(col);
        }

        for constraint in &problem.constraints {
            let mut terms = Vec::new();
            for &(var, coeff) in &constraint.terms {
                if coeff != 0.0 {
                    terms.push((cols[var], coeff));
                }
            }

            match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => {
                    pb.add_row(..=constraint.rhs, &terms);
                }
                ConstraintType::Equal => {
                    pb.add_row(constraint.rhs..=constraint.rhs, &terms);
                }
                ConstraintType::GreaterThanOrEqual => {
                    pb.add_row(constraint.rhs.., &terms);
                }
            }
        }

        let sense = if problem.objective.optimization_type == OptimizationType::Maximize {
            Sense::Maximise
        } else {
            Sense::Minimise
        };

        // Engine options: quiet unless asked, tolerances and limits from config
        let mut model = pb.optimise(sense);
        model.set_option("output_flag", problem.config.verbose);
        model.set_option("mip_feasibility_tolerance", INTEGER_FEASIBILITY_TOLERANCE);
        if let Some(seconds) = problem.config.time_limit {
            model.set_option("time_limit", seconds);
        }
        if let Some(gap) = problem.config.gap_tolerance {
            model.set_option("mip_rel_gap", gap);
        }

        let solved = model.solve();
        let solve_time = start_time.elapsed().as_secs_f64() * 1000.0;

        let stats = SolverStats {
            solve_time_ms: solve_time,
            num_variables: num_vars as u32,
            num_constraints: problem.num_constraints() as u32,
            num_integer_vars: problem.num_integer_variables() as u32,
        };

        debug!(
            problem = %problem.name,
            backend = self.name(),
            solve_time_ms = solve_time,
            "engine finished"
        );

        // Process result
        match map_model_status(solved.status())? {
            SolutionStatus::Optimal => {
                let objective_value = solved.objective_value();
                let solution_data = solved.get_solution();
                let variable_values = solution_data.columns().to_vec();

                Ok(DomainSolution::optimal(objective_value, variable_values).with_stats(stats))
            }
            SolutionStatus::Infeasible => Ok(DomainSolution::new(
                SolutionStatus::Infeasible,
                "Problem is infeasible: no solution satisfies all constraints",
            )
            .with_stats(stats)),
            SolutionStatus::Unbounded => Ok(DomainSolution::new(
                SolutionStatus::Unbounded,
                "Problem is unbounded: objective can be improved infinitely",
            )
            .with_stats(stats)),
            SolutionStatus::TimeLimit => Ok(DomainSolution::new(
                SolutionStatus::TimeLimit,
                "Time limit reached before optimality was proven",
            )
            .with_stats(stats)),
        }
    }

    fn name(&self) -> &str {
        "HiGHS"
    }

    fn supports_mip(&self) -> bool {
        true
    }
}

/// Maps a terminal HiGHS verdict onto a domain status. Load and solve
/// failures are not statuses the caller can act on; they surface as errors.
fn map_model_status(status: HighsModelStatus) -> Result<SolutionStatus> {
    match status {
        HighsModelStatus::Optimal => Ok(SolutionStatus::Optimal),
        HighsModelStatus::Infeasible => Ok(SolutionStatus::Infeasible),
        HighsModelStatus::Unbounded | HighsModelStatus::UnboundedOrInfeasible => {
            Ok(SolutionStatus::Unbounded)
        }
        HighsModelStatus::ReachedTimeLimit => Ok(SolutionStatus::TimeLimit),
        status => Err(SolverError::ExecutionFailed(format!(
            "HiGHS solver returned status: {:?}",
            status
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Constraint, Objective, Variable};

    #[test]
    fn solves_continuous_lp_with_geq_rows() {
        let mut problem = MipProblem::new("lp");
        let x = problem.add_variable(Variable::continuous("x"));
        let y = problem.add_variable(Variable::continuous("y"));
        problem.add_objective_term(x, 2.0);
        problem.add_objective_term(y, 3.0);
        problem.add_constraint(Constraint::new(
            ConstraintType::GreaterThanOrEqual,
            vec![(x, 1.0), (y, 1.0)],
            10.0,
        ));
        problem.add_constraint(Constraint::new(
            ConstraintType::LessThanOrEqual,
            vec![(x, 1.0)],
            6.0,
        ));

        let solution = HighsSolver::new().solve(&problem).unwrap();
        assert!(solution.is_optimal());
        assert!((solution.objective_value.unwrap() - 24.0).abs() < 1e-6);
        assert!((solution.value(x) - 6.0).abs() < 1e-6);
        assert!((solution.value(y) - 4.0).abs() < 1e-6);
    }

    #[test]
    fn solves_integer_program() {
        // max 5x + 4y s.t. 6x + 4y <= 24, x + 2y <= 6, x, y integer
        let mut problem = MipProblem::new("ip").with_objective(Objective::maximize());
        let x = problem.add_variable(Variable::integer("x"));
        let y = problem.add_variable(Variable::integer("y"));
        problem.add_objective_term(x, 5.0);
        problem.add_objective_term(y, 4.0);
        problem.add_constraint(Constraint::new(
            ConstraintType::LessThanOrEqual,
            vec![(x, 6.0), (y, 4.0)],
            24.0,
        ));
        problem.add_constraint(Constraint::new(
            ConstraintType::LessThanOrEqual,
            vec![(x, 1.0), (y, 2.0)],
            6.0,
        ));

        let solution = HighsSolver::new().solve(&problem).unwrap();
        assert!(solution.is_optimal());
        assert!((solution.objective_value.unwrap() - 20.0).abs() < 1e-6);
        assert!((solution.value(x) - 4.0).abs() < 1e-6);
    }

    #[test]
    fn contradictory_rows_come_back_infeasible() {
        let mut problem = MipProblem::new("contradiction");
        let x = problem.add_variable(Variable::continuous("x"));
        problem.add_objective_term(x, 1.0);
        problem.add_constraint(Constraint::new(
            ConstraintType::LessThanOrEqual,
            vec![(x, 1.0)],
            2.0,
        ));
        problem.add_constraint(Constraint::new(
            ConstraintType::GreaterThanOrEqual,
            vec![(x, 1.0)],
            5.0,
        ));

        let solution = HighsSolver::new().solve(&problem).unwrap();
        assert_eq!(solution.status, SolutionStatus::Infeasible);
        assert!(solution.objective_value.is_none());
    }

    #[test]
    fn engine_verdicts_map_onto_domain_statuses() {
        assert_eq!(
            map_model_status(HighsModelStatus::Optimal).unwrap(),
            SolutionStatus::Optimal
        );
        assert_eq!(
            map_model_status(HighsModelStatus::Infeasible).unwrap(),
            SolutionStatus::Infeasible
        );
        assert_eq!(
            map_model_status(HighsModelStatus::Unbounded).unwrap(),
            SolutionStatus::Unbounded
        );
        assert_eq!(
            map_model_status(HighsModelStatus::UnboundedOrInfeasible).unwrap(),
            SolutionStatus::Unbounded
        );
    }

    #[test]
    fn time_limited_verdict_maps_to_time_limit_status() {
        assert_eq!(
            map_model_status(HighsModelStatus::ReachedTimeLimit).unwrap(),
            SolutionStatus::TimeLimit
        );
    }

    #[test]
    fn unmapped_verdicts_are_execution_failures() {
        let err = map_model_status(HighsModelStatus::NotSet).unwrap_err();
        assert!(matches!(err, SolverError::ExecutionFailed(_)));
    }
}
