use crate::domain::{
    models::MipProblem, solver_service::SolverService, value_objects::SolverBackend,
};
use crate::solver::{CbcSolver, HighsSolver};
use std::sync::Arc;

/// Factory for creating solver instances based on configuration
///
/// Backends are stateless and created per call, so concurrent solves never
/// share engine state.
pub struct SolverFactory;

impl SolverFactory {
    /// Create a solver based on the problem configuration
    pub fn create_solver(problem: &MipProblem) -> Arc<dyn SolverService> {
        Self::create_from_backend(problem.config.backend)
    }

    /// Create a solver for a specific backend; `Auto` picks CBC
    pub fn create_from_backend(backend: SolverBackend) -> Arc<dyn SolverService> {
        match backend {
            SolverBackend::Auto => Arc::new(CbcSolver::new()),
            SolverBackend::CoinCbc => Arc::new(CbcSolver::new()),
            SolverBackend::Highs => Arc::new(HighsSolver::new()),
        }
    }

    /// Get the default solver (CBC)
    pub fn default_solver() -> Arc<dyn SolverService> {
        Arc::new(CbcSolver::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_backend_selects_cbc() {
        let solver = SolverFactory::create_from_backend(SolverBackend::Auto);
        assert_eq!(solver.name(), "COIN-OR CBC");
    }

    #[test]
    fn explicit_backends_select_their_engine() {
        assert_eq!(
            SolverFactory::create_from_backend(SolverBackend::CoinCbc).name(),
            "COIN-OR CBC"
        );
        assert_eq!(
            SolverFactory::create_from_backend(SolverBackend::Highs).name(),
            "HiGHS"
        );
    }

    #[test]
    fn configured_problem_routes_to_its_backend() {
        let mut problem = MipProblem::new("routed");
        problem.config.backend = SolverBackend::Highs;
        assert_eq!(SolverFactory::create_solver(&problem).name(), "HiGHS");
    }

    #[test]
    fn every_backend_supports_mip() {
        for backend in [
            SolverBackend::Auto,
            SolverBackend::CoinCbc,
            SolverBackend::Highs,
        ] {
            assert!(SolverFactory::create_from_backend(backend).supports_mip());
        }
    }

    #[test]
    fn backend_names_parse_case_insensitively() {
        assert_eq!(SolverBackend::parse("CBC"), Some(SolverBackend::CoinCbc));
        assert_eq!(
            SolverBackend::parse("coin-cbc"),
            Some(SolverBackend::CoinCbc)
        );
        assert_eq!(SolverBackend::parse("HiGHS"), Some(SolverBackend::Highs));
        assert_eq!(SolverBackend::parse("auto"), Some(SolverBackend::Auto));
        assert_eq!(SolverBackend::parse("gurobi"), None);
    }

    #[test]
    fn default_solver_is_cbc() {
        assert_eq!(SolverFactory::default_solver().name(), "COIN-OR CBC");
    }
}
