//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Storage: Snapshot persistence
//! - Adapters: Gateway integrations

pub mod config;
pub mod storage;
pub mod adapters;
