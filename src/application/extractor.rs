// Result extractor: reads a solved assignment back into network terms

use std::collections::BTreeMap;

use crate::domain::{
    models::{Solution, VarId},
    network::SolveReport,
};

use super::builder::NetworkModel;

/// Flow magnitudes at or below this are treated as numerical noise and left
/// out of the report.
pub const FLOW_THRESHOLD: f64 = 0.01;

/// Binary relaxation values above this count as an opened warehouse.
pub const OPEN_THRESHOLD: f64 = 0.5;

/// Convert an optimal assignment into the report consumed by callers.
///
/// Expects a solution with optimal status; the total cost is the engine's
/// objective value taken as-is, never recomputed from the filtered flows.
/// Flows are thresholded first and rounded to two decimals after, so a value
/// below the threshold is dropped rather than rounded up into visibility.
pub fn extract_report(model: &NetworkModel, solution: &Solution) -> SolveReport {
    let total_cost = solution.objective_value.unwrap_or(0.0);

    let opened_warehouses: Vec<String> = model
        .open_vars
        .iter()
        .filter(|&(_, &var)| solution.value(var) > OPEN_THRESHOLD)
        .map(|(warehouse_id, _)| warehouse_id.clone())
        .collect();

    SolveReport::Optimal {
        total_cost,
        opened_warehouses,
        flows_pw: collect_flows(&model.flow_pw, solution),
        flows_wc: collect_flows(&model.flow_wc, solution),
    }
}

/// Keep pairs whose flow clears the noise threshold, keyed `"<from>-<to>"`.
fn collect_flows(
    vars: &BTreeMap<(String, String), VarId>,
    solution: &Solution,
) -> BTreeMap<String, f64> {
    vars.iter()
        .filter_map(|((from, to), &var)| {
            let value = solution.value(var);
            (value > FLOW_THRESHOLD).then(|| (format!("{}-{}", from, to), round2(value)))
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
