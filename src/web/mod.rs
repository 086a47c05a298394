mod server;

pub use server::{routes, run_server, ServerConfig};
