use std::env;
use std::fs;
use std::process::ExitCode;

use netopt::{solve_network, NetworkData, SolveReport, SolverBackend, SolverConfig, SolverError};

fn main() -> ExitCode {
    // Logs go to stderr so stdout stays pure JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let path = env::args().nth(1).unwrap_or_else(|| "data.json".to_string());
    let report = run(&path);

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(error) => eprintln!("failed to encode report: {}", error),
    }

    if report.is_optimal() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Everything that can go wrong folds into the error report, matching what
/// library callers get from `solve_network`.
fn run(path: &str) -> SolveReport {
    let config = match config_from_env() {
        Ok(config) => config,
        Err(error) => return SolveReport::error(error.to_string()),
    };
    match load_network(path) {
        Ok(network) => solve_network(&network, config),
        Err(message) => SolveReport::error(message),
    }
}

fn load_network(path: &str) -> Result<NetworkData, String> {
    let raw = fs::read_to_string(path).map_err(|e| format!("could not read '{}': {}", path, e))?;
    serde_json::from_str(&raw).map_err(|e| format!("could not parse '{}': {}", path, e))
}

/// Solver settings from the environment: NETOPT_SOLVER picks the backend,
/// NETOPT_TIME_LIMIT caps the solve in seconds, NETOPT_VERBOSE=1 lets the
/// engine print its own log.
fn config_from_env() -> Result<SolverConfig, SolverError> {
    let mut config = SolverConfig::default();
    if let Ok(name) = env::var("NETOPT_SOLVER") {
        config.backend = SolverBackend::parse(&name).ok_or_else(|| {
            SolverError::SolverNotAvailable(format!("unknown solver backend '{}'", name))
        })?;
    }
    if let Ok(value) = env::var("NETOPT_TIME_LIMIT") {
        config.time_limit = value.parse().ok();
    }
    if let Ok(value) = env::var("NETOPT_VERBOSE") {
        config.verbose = value == "1" || value.eq_ignore_ascii_case("true");
    }
    Ok(config)
}
