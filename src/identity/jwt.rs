use actix_web::HttpRequest;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{AuthControls, IdentityProvider, Session};
use crate::config::AuthConfig;
use crate::errors::{KshortError, Result};

/// Claims read from the provider's session token
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Verifies the identity provider's session JWT.
///
/// The token is taken from the session cookie, or from an
/// `Authorization: Bearer` header for non-browser callers.
pub struct JwtSessionProvider {
    decoding_key: Option<DecodingKey>,
    validation: Validation,
    cookie_name: String,
    controls: AuthControls,
}

impl JwtSessionProvider {
    pub fn new(
        decoding_key: Option<DecodingKey>,
        algorithm: Algorithm,
        issuer: Option<&str>,
        cookie_name: &str,
        controls: AuthControls,
    ) -> Self {
        let mut validation = Validation::new(algorithm);
        // Provider tokens carry an audience this app does not own
        validation.validate_aud = false;
        if let Some(iss) = issuer {
            validation.set_issuer(&[iss]);
            // set_issuer 只在 token 带 iss 时比较，缺省也要拒绝
            validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        }

        Self {
            decoding_key,
            validation,
            cookie_name: cookie_name.to_string(),
            controls,
        }
    }

    /// HS256 provider, mostly for development and tests
    pub fn with_secret(secret: &str, cookie_name: &str, controls: AuthControls) -> Self {
        Self::new(
            Some(DecodingKey::from_secret(secret.as_bytes())),
            Algorithm::HS256,
            None,
            cookie_name,
            controls,
        )
    }

    /// Build from `[auth]`. A PEM public key wins over a shared secret; with
    /// neither configured every request is treated as signed out.
    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        let controls = AuthControls {
            sign_in_url: config.sign_in_url.clone(),
            sign_out_url: config.sign_out_url.clone(),
        };

        let (key, algorithm) = match (&config.jwt_public_key, &config.jwt_secret) {
            (Some(pem), _) if !pem.is_empty() => {
                let key = DecodingKey::from_rsa_pem(pem.as_bytes()).map_err(|e| {
                    KshortError::config(format!("auth.jwt_public_key is not a valid RSA PEM: {}", e))
                })?;
                (Some(key), Algorithm::RS256)
            }
            (_, Some(secret)) if !secret.is_empty() => {
                (Some(DecodingKey::from_secret(secret.as_bytes())), Algorithm::HS256)
            }
            _ => (None, Algorithm::HS256),
        };

        Ok(Self::new(
            key,
            algorithm,
            config.issuer.as_deref(),
            &config.session_cookie,
            controls,
        ))
    }

    fn bearer_token(req: &HttpRequest) -> Option<&str> {
        req.headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
    }

    /// Validate a raw token
    pub fn verify(&self, token: &str) -> Option<Session> {
        let key = self.decoding_key.as_ref()?;

        match decode::<SessionClaims>(token, key, &self.validation) {
            Ok(data) if !data.claims.sub.is_empty() => {
                trace!("Session token valid for {}", data.claims.sub);
                let claims = data.claims;
                Some(Session {
                    user_id: claims.sub,
                    display_name: claims.first_name.or(claims.name),
                })
            }
            Ok(_) => {
                debug!("Session token has an empty subject");
                None
            }
            Err(e) => {
                debug!("Session token rejected: {}", e);
                None
            }
        }
    }
}

impl IdentityProvider for JwtSessionProvider {
    fn current_session(&self, req: &HttpRequest) -> Option<Session> {
        if let Some(cookie) = req.cookie(&self.cookie_name) {
            if let Some(session) = self.verify(cookie.value()) {
                return Some(session);
            }
            trace!("Session cookie did not verify, trying Bearer header");
        }

        Self::bearer_token(req).and_then(|token| self.verify(token))
    }

    fn controls(&self) -> &AuthControls {
        &self.controls
    }
}
