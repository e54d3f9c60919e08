//! Mode routing
//!
//! - Server mode (HTTP server, default)
//! - Resolve mode (one-shot lookup from the command line)

pub mod resolve;
pub mod server;

pub use resolve::run_resolve;
pub use server::run_server;
