// COIN-OR CBC adapter, driven through good_lp
// Translates the domain MIP model into good_lp expressions and maps the
// engine verdict back onto domain statuses

use crate::domain::{
    models::{MipProblem, Solution as DomainSolution, SolverStats},
    solver_service::{Result, SolverError, SolverService},
    value_objects::{ConstraintType, OptimizationType, SolutionStatus},
};
use good_lp::{
    solvers::{coin_cbc, SolutionStatus as GoodLpSolutionStatus},
    variable, variables, Expression, ResolutionError, Solution as GoodLpSolutionTrait,
    SolverModel, Variable as GoodLpVariable,
};
use std::time::Instant;
use tracing::debug;

use super::INTEGER_FEASIBILITY_TOLERANCE;

pub struct CbcSolver;

impl CbcSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CbcSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for CbcSolver {
    fn solve(&self, problem: &MipProblem) -> Result<DomainSolution> {
        // Validate first
        self.validate(problem)?;

        let start_time = Instant::now();
        let num_vars = problem.num_variables();

        // Build variables using good_lp
        let mut vars = variables!();
        let mut lp_variables: Vec<GoodLpVariable> = Vec::with_capacity(num_vars);

        for var_def in problem.variables.iter() {
            let lower = var_def.lower_bound;
            let upper = var_def.upper_bound.unwrap_or(f64::INFINITY);

            let var = if var_def.is_integer() {
                vars.add(variable().integer().min(lower).max(upper))
            } else {
                vars.add(variable().min(lower).max(upper))
            };
            lp_variables.push(var);
        }

        // Build objective expression. good_lp is asked to minimise, so
        // maximization negates here and reports with the original signs.
        let is_maximize = problem.objective.optimization_type == OptimizationType::Maximize;
        let mut obj_expr: Expression = 0.into();

        for &(var, coeff) in &problem.objective.terms {
            if coeff != 0.0 {
                let c = if is_maximize { -coeff } else { coeff };
                obj_expr += c * lp_variables[var];
            }
        }

        // Build constraints
        let mut lp_model = vars.minimise(obj_expr).using(coin_cbc::coin_cbc);

        for constraint in &problem.constraints {
            let mut lhs: Expression = 0.into();
            for &(var, coeff) in &constraint.terms {
                if coeff != 0.0 {
                    lhs += coeff * lp_variables[var];
                }
            }

            match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => {
                    lp_model = lp_model.with(lhs.leq(constraint.rhs));
                }
                ConstraintType::Equal => {
                    lp_model = lp_model.with(lhs.eq(constraint.rhs));
                }
                ConstraintType::GreaterThanOrEqual => {
                    lp_model = lp_model.with(lhs.geq(constraint.rhs));
                }
            }
        }

        // Engine options: quiet unless asked, tolerances and limits from config
        if !problem.config.verbose {
            lp_model.set_parameter("logLevel", "0");
        }
        lp_model.set_parameter("integerTolerance", &INTEGER_FEASIBILITY_TOLERANCE.to_string());
        if let Some(seconds) = problem.config.time_limit {
            lp_model.set_parameter("seconds", &seconds.to_string());
        }
        if let Some(gap) = problem.config.gap_tolerance {
            lp_model.set_parameter("ratioGap", &gap.to_string());
        }

        // Solve the problem
        let solution_result = lp_model.solve();
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

        // Process result. A time-limit stop still comes back Ok from good_lp;
        // the verdict rides on the solution status.
        match solution_result {
            Ok(sol) => match map_solution_status(sol.status()) {
                SolutionStatus::TimeLimit => Ok(DomainSolution::new(
                    SolutionStatus::TimeLimit,
                    "Time limit reached before optimality was proven",
                )
                .with_stats(stats)),
                _ => {
                    let mut variable_values = vec![0.0; num_vars];
                    for (i, &var) in lp_variables.iter().enumerate() {
                        variable_values[i] = sol.value(var);
                    }

                    // Objective at the engine's assignment, with original signs
                    let mut objective_value = 0.0;
                    for &(var, coeff) in &problem.objective.terms {
                        objective_value += coeff * variable_values[var];
                    }

                    Ok(DomainSolution::optimal(objective_value, variable_values).with_stats(stats))
                }
            },
            Err(ResolutionError::Infeasible) => Ok(DomainSolution::new(
                SolutionStatus::Infeasible,
                "Problem is infeasible: no solution satisfies all constraints",
            )
            .with_stats(stats)),
            Err(ResolutionError::Unbounded) => Ok(DomainSolution::new(
                SolutionStatus::Unbounded,
                "Problem is unbounded: objective can be improved infinitely",
            )
            .with_stats(stats)),
            Err(e) => Err(SolverError::ExecutionFailed(format!("{:?}", e))),
        }
    }

    fn name(&self) -> &str {
        "COIN-OR CBC"
    }

    fn supports_mip(&self) -> bool {
        true
    }
}

/// Maps the verdict good_lp attaches to a returned assignment. A gap-limited
/// solve is optimal within the tolerance the caller configured.
fn map_solution_status(status: GoodLpSolutionStatus) -> SolutionStatus {
    match status {
        GoodLpSolutionStatus::Optimal | GoodLpSolutionStatus::GapLimit => SolutionStatus::Optimal,
        GoodLpSolutionStatus::TimeLimit => SolutionStatus::TimeLimit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Constraint, Objective, SolverConfig, Variable};

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

        let solution = CbcSolver::new().solve(&problem).unwrap();
        assert!(solution.is_optimal());
        assert!((solution.objective_value.unwrap() - 24.0).abs() < 1e-6);
        assert!((solution.value(x) - 6.0).abs() < 1e-6);
        assert!((solution.value(y) - 4.0).abs() < 1e-6);
        assert_eq!(solution.stats.num_variables, 2);
        assert_eq!(solution.stats.num_constraints, 2);
    }

    #[test]
    fn maximizes_binary_selection() {
        let mut problem = MipProblem::new("pick_one").with_objective(Objective::maximize());
        let a = problem.add_variable(Variable::binary("a"));
        let b = problem.add_variable(Variable::binary("b"));
        problem.add_objective_term(a, 3.0);
        problem.add_objective_term(b, 2.0);
        problem.add_constraint(Constraint::new(
            ConstraintType::LessThanOrEqual,
            vec![(a, 1.0), (b, 1.0)],
            1.0,
        ));

        let solution = CbcSolver::new().solve(&problem).unwrap();
        assert!(solution.is_optimal());
        assert!((solution.objective_value.unwrap() - 3.0).abs() < 1e-6);
        assert!(solution.value(a) > 0.5);
        assert!(solution.value(b) < 0.5);
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

        let solution = CbcSolver::new().solve(&problem).unwrap();
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

        let solution = CbcSolver::new().solve(&problem).unwrap();
        assert_eq!(solution.status, SolutionStatus::Infeasible);
        assert!(solution.objective_value.is_none());
    }

    #[test]
    fn rejects_structurally_broken_model() {
        let mut problem = MipProblem::new("broken");
        let x = problem.add_variable(Variable::continuous("x"));
        problem.add_objective_term(x, 1.0);
        problem.add_objective_term(99, 1.0);

        let err = CbcSolver::new().solve(&problem).unwrap_err();
        assert!(matches!(err, SolverError::InvalidProblem(_)));
    }

    #[test]
    fn time_limited_verdict_maps_to_time_limit_status() {
        assert_eq!(
            map_solution_status(GoodLpSolutionStatus::TimeLimit),
            SolutionStatus::TimeLimit
        );
    }

    #[test]
    fn optimal_and_gap_limited_verdicts_count_as_optimal() {
        assert_eq!(
            map_solution_status(GoodLpSolutionStatus::Optimal),
            SolutionStatus::Optimal
        );
        assert_eq!(
            map_solution_status(GoodLpSolutionStatus::GapLimit),
            SolutionStatus::Optimal
        );
    }

    #[test]
    fn unhit_time_limit_leaves_solve_optimal() {
        let config = SolverConfig {
            time_limit: Some(60.0),
            ..SolverConfig::default()
        };
        let mut problem = MipProblem::new("limited").with_config(config);
        let x = problem.add_variable(Variable::integer("x"));
        problem.add_objective_term(x, 1.0);
        problem.add_constraint(Constraint::new(
            ConstraintType::GreaterThanOrEqual,
            vec![(x, 1.0)],
            3.0,
        ));

        let solution = CbcSolver::new().solve(&problem).unwrap();
        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!((solution.objective_value.unwrap() - 3.0).abs() < 1e-6);
    }
}
