pub mod health;
pub mod home;
pub mod redirect;

pub use health::{AppStartTime, HealthService, health_routes};
pub use home::{HomeService, home_routes};
pub use redirect::{RedirectService, redirect_routes};
