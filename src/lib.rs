// Domain layer: network entities, the generic MIP model, the solver contract
pub mod domain;

// Application layer: build, solve, extract pipeline
pub mod application;

// Solver adapters: concrete implementations of SolverService
pub mod solver;

// Re-export commonly used types
pub use domain::{
    Constraint, ConstraintType, Customer, MipProblem, NetworkData, Objective, OptimizationType,
    Plant, Solution, SolutionStatus, SolveReport, SolverBackend, SolverConfig, SolverError,
    SolverService, SolverStats, VarId, Variable, VariableType, Warehouse,
};

pub use application::{build_model, extract_report, solve_network, NetworkModel};

pub use solver::{CbcSolver, HighsSolver, SolverFactory};
