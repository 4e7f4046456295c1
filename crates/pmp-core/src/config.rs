use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

// ---------------------------------------------------------------------------
// AuthConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserCredential {
    pub username: String,
    /// Lowercase hex SHA-256 of the password.
    pub password_sha256: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Token signing secret. A random one is generated per process when unset,
    /// which invalidates sessions on restart.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwt_secret: Option<String>,
    #[serde(default = "default_session_ttl")]
    pub session_ttl_minutes: u64,
    #[serde(default)]
    pub secure_cookie: bool,
    #[serde(default)]
    pub users: Vec<UserCredential>,
}

/// Longest accepted session lifetime: one year.
pub const MAX_SESSION_TTL_MINUTES: u64 = 365 * 24 * 60;

fn default_session_ttl() -> u64 {
    120
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            session_ttl_minutes: default_session_ttl(),
            secure_cookie: false,
            users: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// RateLimitConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_window")]
    pub window_seconds: u64,
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
}

fn default_window() -> u64 {
    15 * 60
}

fn default_max_requests() -> u32 {
    100
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_seconds: default_window(),
            max_requests: default_max_requests(),
        }
    }
}

// ---------------------------------------------------------------------------
// NarrativeConfig
// ---------------------------------------------------------------------------

/// Narrative client settings. `model` and `api_base` stay unset unless the
/// file names them; the client supplies its own defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

fn default_max_tokens() -> u32 {
    1500
}

fn default_timeout() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    2
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            model: None,
            max_tokens: default_max_tokens(),
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
            api_base: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub narrative: NarrativeConfig,
}

impl Config {
    /// Read a YAML config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Apply `PORT` and `JWT_SECRET` from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(port) = var("PORT").and_then(|p| p.trim().parse().ok()) {
            self.server.port = port;
        }
        if let Some(secret) = var("JWT_SECRET").filter(|s| !s.is_empty()) {
            self.auth.jwt_secret = Some(secret);
        }
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.auth.users.is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "auth.users is empty; every login will be rejected".to_string(),
            });
        }

        for user in &self.auth.users {
            let digest = &user.password_sha256;
            if digest.len() != 64 || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!(
                        "user '{}' has a password_sha256 that is not a 64-character hex digest",
                        user.username
                    ),
                });
            }
        }

        match &self.auth.jwt_secret {
            Some(secret) if secret.len() < 32 => warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "auth.jwt_secret is only {} bytes; use at least 32",
                    secret.len()
                ),
            }),
            _ => {}
        }

        if self.auth.session_ttl_minutes == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "auth.session_ttl_minutes must be greater than 0".to_string(),
            });
        } else if self.auth.session_ttl_minutes > MAX_SESSION_TTL_MINUTES {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "auth.session_ttl_minutes is {}; the maximum is {MAX_SESSION_TTL_MINUTES} (one year)",
                    self.auth.session_ttl_minutes
                ),
            });
        }

        if self.rate_limit.window_seconds == 0 || self.rate_limit.max_requests == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "rate_limit.window_seconds and rate_limit.max_requests must be greater than 0"
                    .to_string(),
            });
        }

        if self.narrative.max_tokens == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "narrative.max_tokens must be greater than 0".to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
