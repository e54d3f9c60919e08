pub mod link_manager;

pub use link_manager::{HomeState, LinkManager, short_url};
