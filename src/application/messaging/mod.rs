//! Message handling - Parsing, handler chain, dispatching

pub mod dispatcher;
pub mod middleware;
pub mod parser;

pub use dispatcher::{DispatcherOptions, MessageDispatcher};
pub use middleware::{handler, Handler, HandlerChain, HandlerResult, MessageHandler};
pub use parser::{tokenize, CommandParser, Invocation, DEFAULT_PREFIX};
