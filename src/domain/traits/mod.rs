//! Domain traits - Abstractions for infrastructure implementations

pub mod gateway;
pub mod persistence;

pub use gateway::{Gateway, GatewayInfo};
pub use persistence::PersistenceGateway;
