//! # JWT identity verifier
//!
//! Validates HS256 bearer tokens and turns their claims into a
//! `CallerIdentity`. Every identity that passes verification is remembered
//! so profile lookups can fall back to it when no profile document exists.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use dashmap::DashMap;
use domains::{CallerIdentity, DomainError, IdentityVerifier, Result, UserId};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

/// Default number of identities kept for profile fallback.
pub const DEFAULT_DIRECTORY_CAPACITY: usize = 10_000;

/// Claims carried by a LinkSphere bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub iat: i64,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

/// Verifier settings; issuer and audience are checked only when set.
#[derive(Debug, Clone, Default)]
pub struct JwtConfig {
    pub secret: Vec<u8>,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

pub struct JwtIdentityVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
    /// Identities seen in verified tokens, with the tick they were last seen
    directory: DashMap<UserId, (CallerIdentity, u64)>,
    directory_capacity: usize,
    ticks: AtomicU64,
}

impl JwtIdentityVerifier {
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::new(JWT_ALGORITHM);
        match &config.issuer {
            Some(iss) => validation.set_issuer(&[iss.as_str()]),
            None => validation.iss = None,
        }
        match &config.audience {
            Some(aud) => validation.set_audience(&[aud.as_str()]),
            None => validation.validate_aud = false,
        }

        Self {
            encoding_key: EncodingKey::from_secret(&config.secret),
            decoding_key: DecodingKey::from_secret(&config.secret),
            validation,
            config,
            directory: DashMap::new(),
            directory_capacity: DEFAULT_DIRECTORY_CAPACITY,
            ticks: AtomicU64::new(0),
        }
    }

    /// Caps the identity directory; the least recently seen identity is
    /// evicted once `capacity` distinct users are known.
    pub fn with_directory_capacity(mut self, capacity: usize) -> Self {
        self.directory_capacity = capacity.max(1);
        self
    }

    /// Mints a token for `identity`, valid for `ttl`. Used by the seed tool
    /// and by tests; production tokens come from the identity provider.
    pub fn issue_token(&self, identity: &CallerIdentity, ttl: Duration) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: identity.id.clone(),
            name: identity.name.clone(),
            email: identity.email.clone(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };
        encode(&Header::new(JWT_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| DomainError::store(format!("token signing failed: {e}")))
    }

    /// Adds an identity to the directory without a token.
    pub fn remember(&self, identity: CallerIdentity) {
        let tick = self.ticks.fetch_add(1, Ordering::Relaxed);
        if !self.directory.contains_key(&identity.id)
            && self.directory.len() >= self.directory_capacity
        {
            self.evict_least_recent();
        }
        self.directory.insert(identity.id.clone(), (identity, tick));
    }

    // Concurrent inserts may overshoot the cap by a few entries until the
    // next eviction.
    fn evict_least_recent(&self) {
        let oldest = self
            .directory
            .iter()
            .min_by_key(|e| e.value().1)
            .map(|e| e.key().clone());
        if let Some(id) = oldest {
            self.directory.remove(&id);
            debug!(user_id = %id, "evicted identity from directory");
        }
    }
}

#[async_trait]
impl IdentityVerifier for JwtIdentityVerifier {
    async fn verify_token(&self, token: &str) -> Result<CallerIdentity> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            warn!(error = %e, "rejected bearer token");
            DomainError::InvalidCredentials(e.to_string())
        })?;

        let claims = data.claims;
        if claims.sub.trim().is_empty() {
            return Err(DomainError::InvalidCredentials("token has no subject".into()));
        }

        let identity = CallerIdentity {
            id: claims.sub,
            name: claims.name,
            email: claims.email,
        };
        debug!(user_id = %identity.id, "bearer token verified");
        self.remember(identity.clone());
        Ok(identity)
    }

    async fn lookup_user(&self, id: &str) -> Result<Option<CallerIdentity>> {
        Ok(self.directory.get(id).map(|e| e.value().0.clone()))
    }
}
