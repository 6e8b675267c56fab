mod lifecycle;
mod server;

pub use lifecycle::{Daemon, LifecycleError, RuntimeConfig};
pub use server::{MAX_REQUEST_BYTES, Server, ServerConfig, ServerError};
