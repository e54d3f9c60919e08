//! kshort - URL shortener front end
//!
//! Server-rendered web front end for a remote link API. Signed-in users create,
//! list, copy and delete short links; anyone can follow `/r/{code}`, which shows
//! a loading page and then navigates to the destination.
//!
//! # Architecture
//! - `client`: typed access to the remote link API
//! - `resolver`: short code resolution for the redirect view
//! - `services`: link management for the home view
//! - `identity`: session lookup against the external identity provider
//! - `api`: HTTP handlers, middleware and HTML views
//! - `config`: configuration management
//! - `runtime`: application lifecycle and execution modes
//! - `system`: logging setup

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod errors;
pub mod identity;
pub mod resolver;
pub mod runtime;
pub mod services;
pub mod system;
