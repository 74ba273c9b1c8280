// Domain module: network entities, the generic MIP model and the solver contract

pub mod models;
pub mod network;
pub mod solver_service;
pub mod value_objects;

pub use models::*;
pub use network::*;
pub use solver_service::*;
pub use value_objects::*;
