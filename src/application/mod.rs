// Application module: the build, solve, extract pipeline

pub mod builder;
pub mod extractor;
pub mod service;

pub use builder::{build_model, NetworkModel};
pub use extractor::extract_report;
pub use service::solve_network;
