use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use pmp_core::config::{AuthConfig, UserCredential, MAX_SESSION_TTL_MINUTES};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub const COOKIE_NAME: &str = "token";

/// Token payload. `sid` is unique per login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub sid: String,
    pub iat: i64,
    pub exp: i64,
}

/// Authenticated caller, inserted into request extensions by the auth
/// middleware.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub username: String,
    pub session_id: String,
    pub expires_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// SessionKeys
// ---------------------------------------------------------------------------

pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
    secure_cookie: bool,
}

impl SessionKeys {
    /// Keys from the configured secret, or a random per-process secret.
    pub fn from_config(auth: &AuthConfig) -> Self {
        let secret: Vec<u8> = match &auth.jwt_secret {
            Some(s) => s.as_bytes().to_vec(),
            None => {
                tracing::warn!("auth.jwt_secret not set; sessions will not survive a restart");
                let mut bytes = [0u8; 32];
                rand::thread_rng().fill(&mut bytes);
                bytes.to_vec()
            }
        };
        Self {
            encoding: EncodingKey::from_secret(&secret),
            decoding: DecodingKey::from_secret(&secret),
            // Clamped so an unvalidated config cannot overflow the expiry.
            ttl: Duration::minutes(auth.session_ttl_minutes.min(MAX_SESSION_TTL_MINUTES) as i64),
            secure_cookie: auth.secure_cookie,
        }
    }

    pub fn issue(&self, username: &str) -> jsonwebtoken::errors::Result<String> {
        self.issue_at(username, Utc::now())
    }

    pub(crate) fn issue_at(
        &self,
        username: &str,
        now: DateTime<Utc>,
    ) -> jsonwebtoken::errors::Result<String> {
        let claims = Claims {
            sub: username.to_string(),
            sid: uuid::Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
    }

    /// Signature and expiry check.
    pub fn verify(&self, token: &str) -> jsonwebtoken::errors::Result<Session> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        let claims = data.claims;
        Ok(Session {
            username: claims.sub,
            session_id: claims.sid,
            expires_at: DateTime::from_timestamp(claims.exp, 0).unwrap_or_default(),
        })
    }

    pub fn session_cookie(&self, token: &str) -> String {
        let mut cookie = format!(
            "{COOKIE_NAME}={token}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
            self.ttl.num_seconds()
        );
        if self.secure_cookie {
            cookie.push_str("; Secure");
        }
        cookie
    }

    pub fn clear_cookie(&self) -> String {
        let mut cookie = format!("{COOKIE_NAME}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0");
        if self.secure_cookie {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn password_digest(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

pub fn check_credentials(users: &[UserCredential], username: &str, password: &str) -> bool {
    let digest = password_digest(password);
    users
        .iter()
        .any(|u| u.username == username && u.password_sha256.eq_ignore_ascii_case(&digest))
}

/// Value of the `token` cookie, if the request carries one.
pub fn token_from_cookies(header: &str) -> Option<&str> {
    header
        .split(';')
        .find_map(|part| part.trim().strip_prefix("token="))
        .filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
