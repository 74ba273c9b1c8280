// Solver adapters module

pub mod cbc_solver;
pub mod factory;
pub mod highs_solver;

pub use cbc_solver::CbcSolver;
pub use factory::SolverFactory;
pub use highs_solver::HighsSolver;

/// Integer feasibility tolerance submitted to every engine.
pub(crate) const INTEGER_FEASIBILITY_TOLERANCE: f64 = 1e-6;
