//! Domain entities - Core business objects

pub mod bucket;
pub mod command;
pub mod message;
pub mod user;

pub use bucket::{Bucket, BucketEntries, Entry, InsertHook};
pub use command::{Command, CommandResult, CommandRunner};
pub use message::Message;
pub use user::User;
