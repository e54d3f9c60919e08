pub mod middleware;
pub mod services;
pub mod views;
