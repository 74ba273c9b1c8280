// Model builder: turns validated network data into a mixed-integer model
// This keeps MIP construction isolated from both the wire format and the engines

use std::collections::BTreeMap;

use crate::domain::{
    models::{Constraint, MipProblem, SolverConfig, VarId, Variable},
    network::NetworkData,
    value_objects::ConstraintType,
};

/// The assembled model plus the variable index needed to read a solution back
/// in network terms.
///
/// The flow maps are sparse: a (pair, variable) entry exists only where the
/// input carried a cost entry for that pair. Pairs without one never get a
/// variable, so no flow can ever be assigned to them.
#[derive(Debug, Clone)]
pub struct NetworkModel {
    pub problem: MipProblem,
    /// Binary open decision per warehouse id.
    pub open_vars: BTreeMap<String, VarId>,
    /// Plant to warehouse flow variable per shippable pair.
    pub flow_pw: BTreeMap<(String, String), VarId>,
    /// Warehouse to customer flow variable per shippable pair.
    pub flow_wc: BTreeMap<(String, String), VarId>,
}

/// Build the facility-location model for a network.
///
/// Variables: one binary open decision per warehouse, one non-negative
/// continuous flow per shippable pair. Objective: minimize fixed opening
/// costs plus per-unit transport costs. Constraints, in order: plant
/// capacity, warehouse inbound and outbound capacity gated on the open
/// decision, warehouse flow balance, exact customer demand.
pub fn build_model(data: &NetworkData, config: SolverConfig) -> NetworkModel {
    let mut problem = MipProblem::new("network_design").with_config(config);

    let mut open_vars = BTreeMap::new();
    for (warehouse_id, warehouse) in &data.warehouses {
        let var = problem.add_variable(Variable::binary(format!("open_{}", warehouse_id)));
        problem.add_objective_term(var, warehouse.fixed_cost);
        open_vars.insert(warehouse_id.clone(), var);
    }

    let mut flow_pw = BTreeMap::new();
    for (plant_id, plant) in &data.plants {
        for (warehouse_id, &cost) in &plant.cost_to_warehouse {
            let var = problem.add_variable(Variable::continuous(format!(
                "flow_pw_{}_{}",
                plant_id, warehouse_id
            )));
            problem.add_objective_term(var, cost);
            flow_pw.insert((plant_id.clone(), warehouse_id.clone()), var);
        }
    }

    let mut flow_wc = BTreeMap::new();
    for (warehouse_id, warehouse) in &data.warehouses {
        for (customer_id, &cost) in &warehouse.cost_to_customer {
            let var = problem.add_variable(Variable::continuous(format!(
                "flow_wc_{}_{}",
                warehouse_id, customer_id
            )));
            problem.add_objective_term(var, cost);
            flow_wc.insert((warehouse_id.clone(), customer_id.clone()), var);
        }
    }

    // Group flow variables by endpoint for the constraint rows.
    let mut plant_out: BTreeMap<&str, Vec<VarId>> = BTreeMap::new();
    let mut warehouse_in: BTreeMap<&str, Vec<VarId>> = BTreeMap::new();
    for ((plant_id, warehouse_id), &var) in &flow_pw {
        plant_out.entry(plant_id.as_str()).or_default().push(var);
        warehouse_in
            .entry(warehouse_id.as_str())
            .or_default()
            .push(var);
    }
    let mut warehouse_out: BTreeMap<&str, Vec<VarId>> = BTreeMap::new();
    let mut customer_in: BTreeMap<&str, Vec<VarId>> = BTreeMap::new();
    for ((warehouse_id, customer_id), &var) in &flow_wc {
        warehouse_out
            .entry(warehouse_id.as_str())
            .or_default()
            .push(var);
        customer_in
            .entry(customer_id.as_str())
            .or_default()
            .push(var);
    }

    // Plant capacity: total outbound flow within production capacity.
    for (plant_id, plant) in &data.plants {
        problem.add_constraint(
            Constraint::new(
                ConstraintType::LessThanOrEqual,
                unit_terms(plant_out.get(plant_id.as_str())),
                plant.capacity,
            )
            .with_name(format!("plant_capacity_{}", plant_id)),
        );
    }

    // Warehouse capacity gates on the open decision: flow - capacity * open <= 0
    // keeps both legs at zero while the site is closed. Balance makes a
    // warehouse forward exactly what it receives.
    for (warehouse_id, warehouse) in &data.warehouses {
        let open = open_vars[warehouse_id];

        let mut inbound = unit_terms(warehouse_in.get(warehouse_id.as_str()));
        inbound.push((open, -warehouse.capacity));
        problem.add_constraint(
            Constraint::new(ConstraintType::LessThanOrEqual, inbound, 0.0)
                .with_name(format!("warehouse_inbound_{}", warehouse_id)),
        );

        let mut outbound = unit_terms(warehouse_out.get(warehouse_id.as_str()));
        outbound.push((open, -warehouse.capacity));
        problem.add_constraint(
            Constraint::new(ConstraintType::LessThanOrEqual, outbound, 0.0)
                .with_name(format!("warehouse_outbound_{}", warehouse_id)),
        );

        let mut balance = unit_terms(warehouse_in.get(warehouse_id.as_str()));
        if let Some(vars) = warehouse_out.get(warehouse_id.as_str()) {
            balance.extend(vars.iter().map(|&var| (var, -1.0)));
        }
        problem.add_constraint(
            Constraint::new(ConstraintType::Equal, balance, 0.0)
                .with_name(format!("warehouse_balance_{}", warehouse_id)),
        );
    }

    // Customer demand is met exactly, not merely bounded.
    for (customer_id, customer) in &data.customers {
        problem.add_constraint(
            Constraint::new(
                ConstraintType::Equal,
                unit_terms(customer_in.get(customer_id.as_str())),
                customer.demand,
            )
            .with_name(format!("customer_demand_{}", customer_id)),
        );
    }

    NetworkModel {
        problem,
        open_vars,
        flow_pw,
        flow_wc,
    }
}

fn unit_terms(vars: Option<&Vec<VarId>>) -> Vec<(VarId, f64)> {
    vars.map(|vars| vars.iter().map(|&var| (var, 1.0)).collect())
        .unwrap_or_default()
}
