//! System-level modules
//!
//! Process-wide plumbing that is not tied to a request: logging setup.

pub mod logging;

pub use logging::init_logging;
