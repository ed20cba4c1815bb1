//! Domain layer - Core objects and the seams to external collaborators
//! 
//! This layer contains:
//! - Entities: Messages, commands and buckets
//! - Traits: Abstractions for the chat gateway and snapshot persistence

pub mod entities;
pub mod traits;
