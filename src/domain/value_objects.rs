// Domain value objects shared by the model, the builder, and the adapters

use std::fmt;

/// Type of decision variable in the optimization model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableType {
    /// Continuous real number (x ∈ ℝ)
    Continuous,
    /// Integer number (x ∈ ℤ)
    Integer,
    /// Binary variable (x ∈ {0, 1})
    Binary,
}

/// Type of constraint comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintType {
    /// Less than or equal (≤)
    LessThanOrEqual,
    /// Equal (=)
    Equal,
    /// Greater than or equal (≥)
    GreaterThanOrEqual,
}

/// Direction of optimization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationType {
    /// Minimize the objective function
    Minimize,
    /// Maximize the objective function
    Maximize,
}

/// Terminal status reported by a solver backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// Found optimal solution
    Optimal,
    /// Problem has no feasible solution
    Infeasible,
    /// Objective can be improved infinitely
    Unbounded,
    /// Time limit reached before optimality was proven
    TimeLimit,
}

impl fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolutionStatus::Optimal => write!(f, "Optimal"),
            SolutionStatus::Infeasible => write!(f, "Infeasible"),
            SolutionStatus::Unbounded => write!(f, "Unbounded"),
            SolutionStatus::TimeLimit => write!(f, "Time Limit Reached"),
        }
    }
}

/// Solver backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverBackend {
    /// Use the default engine (CBC)
    Auto,
    /// COIN-OR CBC solver
    CoinCbc,
    /// HiGHS solver
    Highs,
}

impl SolverBackend {
    /// Parse a backend name, case-insensitive.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "auto" => Some(SolverBackend::Auto),
            "cbc" | "coin_cbc" | "coin-cbc" => Some(SolverBackend::CoinCbc),
            "highs" => Some(SolverBackend::Highs),
            _ => None,
        }
    }
}
