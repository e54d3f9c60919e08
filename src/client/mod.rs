//! Link API client layer
//!
//! All link data lives behind the remote link API. Views talk to it through
//! the [`LinkApi`] trait so handlers and tests can swap the transport.
//!
//! ```text
//! Home view     ─┐
//!                ├→ LinkApi ──→ HttpLinkApi (reqwest) ──→ remote API
//! Redirect view ─┘
//! ```

mod http;
mod models;

pub use http::HttpLinkApi;
pub use models::{
    ErrorBody, ListResponse, LookupResponse, ShortLink, ShortenRequest, ShortenResponse,
};

use async_trait::async_trait;

use crate::errors::Result;

/// Contract with the remote link API.
///
/// Every call is a single request/response round trip; implementations never retry.
#[async_trait]
pub trait LinkApi: Send + Sync {
    /// `GET /urls/{userId}`
    async fn list_links(&self, user_id: &str) -> Result<Vec<ShortLink>>;

    /// `POST /shorten`, returns the new short code
    async fn create_link(&self, original_url: &str, user_id: &str) -> Result<String>;

    /// `DELETE /urls/{userId}/{shortCode}`
    async fn delete_link(&self, user_id: &str, short_code: &str) -> Result<()>;

    /// `GET /urls/lookup/{shortCode}`
    ///
    /// `Ok(None)` means the API answered 2xx without a usable destination.
    async fn lookup(&self, short_code: &str) -> Result<Option<String>>;
}
