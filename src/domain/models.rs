use super::value_objects::{
    ConstraintType, OptimizationType, SolutionStatus, SolverBackend, VariableType,
};

/// Index of a decision variable within a [`MipProblem`].
///
/// Handed out by [`MipProblem::add_variable`] and used by objective and
/// constraint terms, so models stay sparse: only pairs that exist get a
/// variable at all.
pub type VarId = usize;

/// Decision variable in an optimization model
#[derive(Debug, Clone)]
pub struct Variable {
    pub variable_type: VariableType,
    pub lower_bound: f64,
    pub upper_bound: Option<f64>,
    pub name: String,
}

impl Variable {
    pub fn continuous(name: impl Into<String>) -> Self {
        Self {
            variable_type: VariableType::Continuous,
            lower_bound: 0.0,
            upper_bound: None,
            name: name.into(),
        }
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self {
            variable_type: VariableType::Integer,
            lower_bound: 0.0,
            upper_bound: None,
            name: name.into(),
        }
    }

    pub fn binary(name: impl Into<String>) -> Self {
        Self {
            variable_type: VariableType::Binary,
            lower_bound: 0.0,
            upper_bound: Some(1.0),
            name: name.into(),
        }
    }

    pub fn with_bounds(mut self, lower: f64, upper: Option<f64>) -> Self {
        self.lower_bound = lower;
        self.upper_bound = upper;
        self
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self.variable_type,
            VariableType::Integer | VariableType::Binary
        )
    }
}

/// Objective function as sparse (variable, coefficient) terms
#[derive(Debug, Clone)]
pub struct Objective {
    pub optimization_type: OptimizationType,
    pub terms: Vec<(VarId, f64)>,
}

impl Objective {
    pub fn minimize() -> Self {
        Self {
            optimization_type: OptimizationType::Minimize,
            terms: Vec::new(),
        }
    }

    pub fn maximize() -> Self {
        Self {
            optimization_type: OptimizationType::Maximize,
            terms: Vec::new(),
        }
    }

    pub fn add_term(&mut self, var: VarId, coefficient: f64) {
        self.terms.push((var, coefficient));
    }
}

/// Linear constraint as sparse (variable, coefficient) terms
#[derive(Debug, Clone)]
pub struct Constraint {
    pub constraint_type: ConstraintType,
    pub terms: Vec<(VarId, f64)>,
    pub rhs: f64,
    pub name: String,
}

impl Constraint {
    pub fn new(constraint_type: ConstraintType, terms: Vec<(VarId, f64)>, rhs: f64) -> Self {
        Self {
            constraint_type,
            terms,
            rhs,
            name: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Configuration for the solver
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub backend: SolverBackend,
    pub time_limit: Option<f64>,
    pub gap_tolerance: Option<f64>,
    pub verbose: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            backend: SolverBackend::Auto,
            time_limit: None,
            gap_tolerance: None,
            verbose: false,
        }
    }
}

/// Complete mixed-integer optimization model
#[derive(Debug, Clone)]
pub struct MipProblem {
    pub name: String,
    pub objective: Objective,
    pub variables: Vec<Variable>,
    pub constraints: Vec<Constraint>,
    pub config: SolverConfig,
}

impl MipProblem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            objective: Objective::minimize(),
            variables: Vec::new(),
            constraints: Vec::new(),
            config: SolverConfig::default(),
        }
    }

    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objective = objective;
        self
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a variable and return its id for use in terms.
    pub fn add_variable(&mut self, variable: Variable) -> VarId {
        self.variables.push(variable);
        self.variables.len() - 1
    }

    pub fn add_objective_term(&mut self, var: VarId, coefficient: f64) {
        self.objective.add_term(var, coefficient);
    }

    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn num_integer_variables(&self) -> usize {
        self.variables.iter().filter(|v| v.is_integer()).count()
    }

    pub fn is_mixed_integer(&self) -> bool {
        self.num_integer_variables() > 0
    }
}

/// Statistics about the solve process
#[derive(Debug, Clone, Default)]
pub struct SolverStats {
    pub solve_time_ms: f64,
    pub num_variables: u32,
    pub num_constraints: u32,
    pub num_integer_vars: u32,
}

/// Solution to an optimization model
#[derive(Debug, Clone)]
pub struct Solution {
    pub status: SolutionStatus,
    pub objective_value: Option<f64>,
    /// Assignment indexed by [`VarId`]; empty unless the status is optimal.
    pub variable_values: Vec<f64>,
    pub message: String,
    pub stats: SolverStats,
}

impl Solution {
    pub fn new(status: SolutionStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            objective_value: None,
            variable_values: Vec::new(),
            message: message.into(),
            stats: SolverStats::default(),
        }
    }

    pub fn optimal(value: f64, variable_values: Vec<f64>) -> Self {
        Self {
            status: SolutionStatus::Optimal,
            objective_value: Some(value),
            variable_values,
            message: "Optimal solution found".to_string(),
            stats: SolverStats::default(),
        }
    }

    pub fn with_stats(mut self, stats: SolverStats) -> Self {
        self.stats = stats;
        self
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }

    /// Value assigned to a variable, zero if the assignment is absent.
    pub fn value(&self, var: VarId) -> f64 {
        self.variable_values.get(var).copied().unwrap_or(0.0)
    }
}
