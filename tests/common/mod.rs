//! Shared fixtures for integration tests
//!
//! `MockLinkApi` is an in-memory stand-in for the remote link API that records
//! every call, so tests can assert on ordering as well as results.

#![allow(dead_code)]

use async_trait::async_trait;
use jsonwebtoken::{EncodingKey, Header, encode};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use kshort::client::{LinkApi, ShortLink};
use kshort::config::SiteConfig;
use kshort::errors::{KshortError, Result};
use kshort::identity::{AuthControls, JwtSessionProvider, SessionClaims};
use kshort::runtime::lifetime::startup::StartupContext;

pub const TEST_SECRET: &str = "integration_test_secret_32_bytes";
pub const SESSION_COOKIE: &str = "__session";

#[derive(Default)]
pub struct MockLinkApi {
    links: Mutex<HashMap<String, Vec<ShortLink>>>,
    destinations: Mutex<HashMap<String, String>>,
    calls: Mutex<Vec<String>>,
    create_error: Mutex<Option<KshortError>>,
    fail_list: AtomicBool,
    fail_delete: AtomicBool,
    next_code: AtomicUsize,
}

impl MockLinkApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Seed a link owned by `user_id`; it also becomes resolvable
    pub fn seed(&self, user_id: &str, short_code: &str, original_url: &str) {
        self.links
            .lock()
            .unwrap()
            .entry(user_id.to_string())
            .or_default()
            .push(ShortLink {
                short_code: short_code.to_string(),
                original_url: original_url.to_string(),
                owner_id: Some(user_id.to_string()),
                created_at: None,
            });
        self.set_destination(short_code, original_url);
    }

    pub fn set_destination(&self, short_code: &str, original_url: &str) {
        self.destinations
            .lock()
            .unwrap()
            .insert(short_code.to_string(), original_url.to_string());
    }

    pub fn fail_create_with(&self, err: KshortError) {
        *self.create_error.lock().unwrap() = Some(err);
    }

    pub fn fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn fail_delete(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    pub fn links_of(&self, user_id: &str) -> Vec<ShortLink> {
        self.links
            .lock()
            .unwrap()
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl LinkApi for MockLinkApi {
    async fn list_links(&self, user_id: &str) -> Result<Vec<ShortLink>> {
        self.record(format!("list:{}", user_id));
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(KshortError::transport("connection refused"));
        }
        Ok(self.links_of(user_id))
    }

    async fn create_link(&self, original_url: &str, user_id: &str) -> Result<String> {
        self.record(format!("create:{}", original_url));
        if let Some(err) = self.create_error.lock().unwrap().clone() {
            return Err(err);
        }

        let n = self.next_code.fetch_add(1, Ordering::SeqCst) + 1;
        let code = format!("gen{}", n);
        self.seed(user_id, &code, original_url);
        Ok(code)
    }

    async fn delete_link(&self, user_id: &str, short_code: &str) -> Result<()> {
        self.record(format!("delete:{}", short_code));
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(KshortError::transport("connection reset"));
        }

        let mut links = self.links.lock().unwrap();
        let owned = links.entry(user_id.to_string()).or_default();
        let before = owned.len();
        owned.retain(|l| l.short_code != short_code);
        if owned.len() == before {
            return Err(KshortError::upstream(404, "URL not found"));
        }
        self.destinations.lock().unwrap().remove(short_code);
        Ok(())
    }

    async fn lookup(&self, short_code: &str) -> Result<Option<String>> {
        self.record(format!("lookup:{}", short_code));
        match self.destinations.lock().unwrap().get(short_code) {
            Some(url) => Ok(Some(url.clone())),
            None => Err(KshortError::upstream(404, "Not found")),
        }
    }
}

pub fn controls() -> AuthControls {
    AuthControls {
        sign_in_url: "https://accounts.example.com/sign-in".to_string(),
        sign_out_url: "https://accounts.example.com/sign-out".to_string(),
    }
}

/// Shared app components over the mock, with HS256 sessions
pub fn test_context(api: Arc<MockLinkApi>, redirect_delay: Duration) -> StartupContext {
    StartupContext::new(
        api,
        Arc::new(JwtSessionProvider::with_secret(
            TEST_SECRET,
            SESSION_COOKIE,
            controls(),
        )),
        SiteConfig::default(),
        redirect_delay,
    )
}

pub fn session_token(user_id: &str, first_name: &str) -> String {
    let claims = SessionClaims {
        sub: user_id.to_string(),
        exp: chrono::Utc::now().timestamp() + 3600,
        iss: None,
        first_name: Some(first_name.to_string()),
        name: None,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("Failed to sign test token")
}
