// Network design domain: three-tier supply network input and the report
// envelope handed back to callers

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::solver_service::SolverError;

/// Production site with a capacity and per-unit shipping costs to warehouses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plant {
    pub capacity: f64,
    /// Transport cost per unit, keyed by warehouse id. A missing entry means
    /// the pair cannot ship to each other at all.
    #[serde(rename = "cost_to_w", default)]
    pub cost_to_warehouse: BTreeMap<String, f64>,
}

/// Candidate warehouse with an opening cost and a shared in/out capacity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warehouse {
    pub fixed_cost: f64,
    pub capacity: f64,
    /// Transport cost per unit, keyed by customer id. A missing entry means
    /// the pair cannot ship to each other at all.
    #[serde(rename = "cost_to_c", default)]
    pub cost_to_customer: BTreeMap<String, f64>,
}

/// Customer whose demand must be met exactly
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub demand: f64,
}

/// Complete description of a three-tier network design problem
///
/// Ordered maps keep variable and constraint construction deterministic, so
/// the same input always produces the same model and the same report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkData {
    pub plants: BTreeMap<String, Plant>,
    pub warehouses: BTreeMap<String, Warehouse>,
    pub customers: BTreeMap<String, Customer>,
}

impl NetworkData {
    /// Check the input is well-formed before any model is built.
    ///
    /// Collects every problem found rather than stopping at the first, and
    /// joins them into a single message. Negative costs are deliberately
    /// allowed (a subsidized lane is a valid input); negative capacities and
    /// demands are not.
    pub fn validate(&self) -> std::result::Result<(), SolverError> {
        let mut errors = Vec::new();

        if self.plants.is_empty() {
            errors.push("no plants defined".to_string());
        }
        if self.warehouses.is_empty() {
            errors.push("no warehouses defined".to_string());
        }
        if self.customers.is_empty() {
            errors.push("no customers defined".to_string());
        }

        for (id, plant) in &self.plants {
            if plant.capacity < 0.0 {
                errors.push(format!(
                    "plant '{}' has negative capacity ({})",
                    id, plant.capacity
                ));
            }
            for warehouse_id in plant.cost_to_warehouse.keys() {
                if !self.warehouses.contains_key(warehouse_id) {
                    errors.push(format!(
                        "plant '{}' references unknown warehouse '{}'",
                        id, warehouse_id
                    ));
                }
            }
        }

        for (id, warehouse) in &self.warehouses {
            if warehouse.capacity < 0.0 {
                errors.push(format!(
                    "warehouse '{}' has negative capacity ({})",
                    id, warehouse.capacity
                ));
            }
            for customer_id in warehouse.cost_to_customer.keys() {
                if !self.customers.contains_key(customer_id) {
                    errors.push(format!(
                        "warehouse '{}' references unknown customer '{}'",
                        id, customer_id
                    ));
                }
            }
        }

        for (id, customer) in &self.customers {
            if customer.demand < 0.0 {
                errors.push(format!(
                    "customer '{}' has negative demand ({})",
                    id, customer.demand
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SolverError::InvalidInput(errors.join("; ")))
        }
    }
}

/// Outcome of a network solve in its wire shape
///
/// Serializes either as `{"status": "optimal", ...}` with the cost, the opened
/// warehouses and the surviving flows, or as `{"status": "error", "message"}`.
/// Invalid input, an infeasible or unbounded model and an engine failure all
/// use the same error variant, so callers only ever deal with one envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SolveReport {
    Optimal {
        total_cost: f64,
        opened_warehouses: Vec<String>,
        /// Plant to warehouse flows, keyed `"<plant>-<warehouse>"`.
        flows_pw: BTreeMap<String, f64>,
        /// Warehouse to customer flows, keyed `"<warehouse>-<customer>"`.
        flows_wc: BTreeMap<String, f64>,
    },
    Error {
        message: String,
    },
}

impl SolveReport {
    pub fn error(message: impl Into<String>) -> Self {
        SolveReport::Error {
            message: message.into(),
        }
    }

    pub fn is_optimal(&self) -> bool {
        matches!(self, SolveReport::Optimal { .. })
    }
}
