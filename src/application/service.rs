// Application service: validate, build, dispatch to an engine, extract

use tracing::{debug, info, warn};

use crate::domain::{
    models::SolverConfig,
    network::{NetworkData, SolveReport},
};
use crate::solver::SolverFactory;

use super::builder::build_model;
use super::extractor::extract_report;

/// Solve a three-tier network design problem end to end.
///
/// Every failure mode comes back as the error variant of [`SolveReport`]:
/// invalid input, an infeasible or unbounded model, a hit time limit and an
/// engine failure all land in the same envelope. This function never panics
/// on bad input.
pub fn solve_network(data: &NetworkData, config: SolverConfig) -> SolveReport {
    if let Err(error) = data.validate() {
        warn!(%error, "rejected network input");
        return SolveReport::error(error.to_string());
    }

    let model = build_model(data, config);
    debug!(
        variables = model.problem.num_variables(),
        binaries = model.problem.num_integer_variables(),
        constraints = model.problem.num_constraints(),
        "network model assembled"
    );

    let solver = SolverFactory::create_solver(&model.problem);
    info!(backend = solver.name(), "solving network design model");

    match solver.solve(&model.problem) {
        Ok(solution) if solution.is_optimal() => {
            info!(
                objective = solution.objective_value,
                solve_time_ms = solution.stats.solve_time_ms,
                "optimal solution found"
            );
            extract_report(&model, &solution)
        }
        Ok(solution) => {
            info!(status = %solution.status, "solver finished without an optimal solution");
            SolveReport::error(solution.status.to_string())
        }
        Err(error) => {
            warn!(%error, "solver execution failed");
            SolveReport::error(error.to_string())
        }
    }
}
