//! Link management for the home view
//!
//! Thin orchestration over [`LinkApi`]: every operation is one round trip,
//! mutations are followed by a full list refetch, and nothing is updated
//! optimistically. Two overlapping actions are not serialized; whichever
//! response lands last decides what the page shows.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::client::{LinkApi, ShortLink};
use crate::errors::KshortError;
use crate::identity::Session;

/// Per-request state of the home view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HomeState {
    pub links: Vec<ShortLink>,
    /// Full short URL of the link created by this request
    pub created_url: Option<String>,
    /// Message for a blocking browser alert
    pub alert: Option<String>,
    /// URL the user typed, kept when creation fails
    pub draft_url: String,
}

#[derive(Clone)]
pub struct LinkManager {
    api: Arc<dyn LinkApi>,
}

impl LinkManager {
    pub fn new(api: Arc<dyn LinkApi>) -> Self {
        Self { api }
    }

    /// Initial state for a signed-in visit
    pub async fn load(&self, session: &Session) -> HomeState {
        let mut state = HomeState::default();
        self.refresh(&mut state, session).await;
        state
    }

    /// Replace `state.links` with a fresh list. On failure the previous list stays.
    pub async fn refresh(&self, state: &mut HomeState, session: &Session) {
        match self.api.list_links(&session.user_id).await {
            Ok(links) => state.links = links,
            Err(e) => warn!("Error fetching URLs for {}: {}", session.user_id, e),
        }
    }

    /// Create a short link and refetch the list once the API has answered.
    ///
    /// `origin` is `scheme://host` of the current request; the new short URL is
    /// built from it.
    pub async fn create_and_refresh(
        &self,
        state: &mut HomeState,
        session: &Session,
        original_url: &str,
        origin: &str,
    ) {
        let original_url = original_url.trim();
        if original_url.is_empty() {
            return;
        }

        match self.api.create_link(original_url, &session.user_id).await {
            Ok(short_code) => {
                info!("User {} created short link {}", session.user_id, short_code);
                state.created_url = Some(short_url(origin, &short_code));
                state.draft_url.clear();
                state.alert = None;
                self.refresh(state, session).await;
            }
            Err(e) => {
                error!("Failed to create short link for {}: {}", session.user_id, e);
                state.draft_url = original_url.to_string();
                state.alert = Some(create_alert_message(&e));
            }
        }
    }

    /// Delete a short link and refetch. A failed delete leaves `state` untouched.
    pub async fn delete_and_refresh(&self, state: &mut HomeState, session: &Session, short_code: &str) {
        match self.api.delete_link(&session.user_id, short_code).await {
            Ok(()) => {
                info!("User {} deleted short link {}", session.user_id, short_code);
                self.refresh(state, session).await;
            }
            Err(e) => error!("Error deleting URL {}: {}", short_code, e),
        }
    }
}

/// `{origin}/r/{code}`
pub fn short_url(origin: &str, short_code: &str) -> String {
    format!(
        "{}/r/{}",
        origin.trim_end_matches('/'),
        urlencoding::encode(short_code)
    )
}

/// Alert text for a failed create: the API's own message for HTTP errors,
/// a generic one when the API could not be reached.
fn create_alert_message(err: &KshortError) -> String {
    match err {
        KshortError::Upstream { message, .. } => format!("Error creating short URL: {}", message),
        _ => "Error connecting to server".to_string(),
    }
}
