//! Application layer - Registry, resolution and dispatch
//! 
//! This layer contains:
//! - Services: Bucket registry, command resolver, snapshots
//! - Errors: Error taxonomy
//! - Messaging: Tokenizing, handler chain, dispatching

pub mod errors;
pub mod services;
pub mod messaging;
