//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use guard_core::{is_safe_identifier, PolicyProfile, QueryPolicy};
use serde::Deserialize;
use std::env;
use std::fmt;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub rpc: RpcConfig,
    pub audit: AuditConfig,
    pub policy: PolicyConfig,
    pub signature: SignatureConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Remote SQL execution RPC
#[derive(Debug, Clone, Deserialize)]
pub struct RpcConfig {
    /// Database function that executes a statement and returns JSON
    #[serde(default = "default_rpc_function")]
    pub function: String,
}

/// Audit sink configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    #[serde(default = "default_audit_table")]
    pub table: String,
    /// When false, records only go to the local log
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Query policy settings
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyConfig {
    #[serde(default = "default_max_query_length")]
    pub max_query_length: usize,
    #[serde(default = "default_allowed_operations")]
    pub allowed_operations: Vec<String>,
    #[serde(default)]
    pub profile: PolicyProfile,
    /// Explicit denylist; overrides the profile's list when set
    #[serde(default)]
    pub denylist: Option<Vec<String>>,
    #[serde(default = "default_true")]
    pub require_limit: bool,
}

impl PolicyConfig {
    /// Build the immutable policy the validator runs against
    #[must_use]
    pub fn to_policy(&self) -> QueryPolicy {
        let policy = QueryPolicy::from_profile(self.profile)
            .with_max_length(self.max_query_length)
            .with_allowed_operations(&self.allowed_operations)
            .with_require_limit(self.require_limit);

        match &self.denylist {
            Some(tokens) => policy.with_denylist(tokens),
            None => policy,
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            max_query_length: default_max_query_length(),
            allowed_operations: default_allowed_operations(),
            profile: PolicyProfile::default(),
            denylist: None,
            require_limit: true,
        }
    }
}

/// Request signing configuration
#[derive(Clone, Default, Deserialize)]
pub struct SignatureConfig {
    /// Shared HMAC secret; signing is not enforced when absent
    pub secret: Option<String>,
}

impl SignatureConfig {
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.secret.is_some()
    }
}

impl fmt::Debug for SignatureConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureConfig")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: default_requests_per_second(),
            burst: default_burst(),
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

// Default value functions
fn default_app_name() -> String {
    "query-guard".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    1
}

fn default_rpc_function() -> String {
    "exec_sql".to_string()
}

fn default_audit_table() -> String {
    "query_audit_log".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_query_length() -> usize {
    guard_core::value_objects::DEFAULT_MAX_QUERY_LENGTH
}

fn default_allowed_operations() -> Vec<String> {
    guard_core::value_objects::DEFAULT_ALLOWED_OPERATIONS
        .iter()
        .map(|op| (*op).to_string())
        .collect()
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

fn parse_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Parse a numeric setting; absent is `None`, present but malformed is an error
fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(None),
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    ///
    /// # Errors
    /// Returns an error if required keys are missing or a value is malformed
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |key: &'static str, default: bool| -> Result<bool, ConfigError> {
            match lookup(key) {
                Some(raw) => parse_bool(&raw).ok_or(ConfigError::InvalidValue(key, raw)),
                None => Ok(default),
            }
        };
        let identifier = |key: &'static str, default: String| -> Result<String, ConfigError> {
            let value = lookup(key).unwrap_or(default);
            if is_safe_identifier(&value) {
                Ok(value)
            } else {
                Err(ConfigError::InvalidValue(key, value))
            }
        };

        let profile = match lookup("POLICY_PROFILE") {
            Some(raw) => PolicyProfile::parse(&raw)
                .ok_or(ConfigError::InvalidValue("POLICY_PROFILE", raw))?,
            None => PolicyProfile::default(),
        };

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: match lookup("APP_ENV") {
                    Some(raw) => Environment::parse(&raw)
                        .ok_or(ConfigError::InvalidValue("APP_ENV", raw))?,
                    None => Environment::default(),
                },
            },
            api: ServerConfig {
                host: lookup("API_HOST").unwrap_or_else(default_host),
                port: parse_var(&lookup, "API_PORT")?.ok_or(ConfigError::MissingVar("API_PORT"))?,
            },
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").ok_or(ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: parse_var(&lookup, "DATABASE_MAX_CONNECTIONS")?
                    .unwrap_or_else(default_max_connections),
                min_connections: parse_var(&lookup, "DATABASE_MIN_CONNECTIONS")?
                    .unwrap_or_else(default_min_connections),
            },
            rpc: RpcConfig {
                function: identifier("SQL_RPC_FUNCTION", default_rpc_function())?,
            },
            audit: AuditConfig {
                table: identifier("AUDIT_TABLE", default_audit_table())?,
                enabled: flag("AUDIT_ENABLED", true)?,
            },
            policy: PolicyConfig {
                max_query_length: parse_var(&lookup, "MAX_QUERY_LENGTH")?
                    .unwrap_or_else(default_max_query_length),
                allowed_operations: lookup("ALLOWED_OPERATIONS")
                    .map(|s| parse_list(&s))
                    .unwrap_or_else(default_allowed_operations),
                profile,
                denylist: lookup("POLICY_DENYLIST").map(|s| parse_list(&s)),
                require_limit: flag("POLICY_REQUIRE_LIMIT", true)?,
            },
            signature: SignatureConfig {
                secret: lookup("SIGNATURE_SECRET").filter(|s| !s.is_empty()),
            },
            rate_limit: RateLimitConfig {
                requests_per_second: parse_var(&lookup, "RATE_LIMIT_REQUESTS_PER_SECOND")?
                    .unwrap_or_else(default_requests_per_second),
                burst: parse_var(&lookup, "RATE_LIMIT_BURST")?.unwrap_or_else(default_burst),
            },
            cors: CorsConfig {
                allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                    .map(|s| parse_list(&s))
                    .unwrap_or_default(),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: &[(&str, &str)] = &[
        ("API_PORT", "8080"),
        ("DATABASE_URL", "postgres://localhost/guard"),
    ];

    #[test]
    fn test_environment_is_production() {
        assert!(!Environment::Development.is_production());
        assert!(!Environment::Staging.is_production());
        assert!(Environment::Production.is_production());
    }

    #[test]
    fn test_environment_is_development() {
        assert!(Environment::Development.is_development());
        assert!(!Environment::Staging.is_development());
        assert!(!Environment::Production.is_development());
    }

    #[test]
    fn test_server_address() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
        };
        assert_eq!(config.address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_defaults_from_minimal_env() {
        let config = AppConfig::from_lookup(lookup_from(REQUIRED)).unwrap();
        assert_eq!(config.app.name, "query-guard");
        assert_eq!(config.api.port, 8080);
        assert_eq!(config.rpc.function, "exec_sql");
        assert_eq!(config.audit.table, "query_audit_log");
        assert!(config.audit.enabled);
        assert!(!config.signature.is_enabled());

        let policy = config.policy.to_policy();
        assert_eq!(policy, QueryPolicy::default());
    }

    #[test]
    fn test_missing_required_vars() {
        let err = AppConfig::from_lookup(lookup_from(&[("API_PORT", "8080")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("DATABASE_URL")));

        let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("API_PORT")));
    }

    #[test]
    fn test_policy_overrides() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("MAX_QUERY_LENGTH", "200"),
            ("ALLOWED_OPERATIONS", "select, with"),
            ("POLICY_PROFILE", "strict"),
            ("POLICY_REQUIRE_LIMIT", "false"),
        ]);
        let config = AppConfig::from_lookup(lookup_from(&pairs)).unwrap();
        let policy = config.policy.to_policy();

        assert_eq!(policy.max_length(), 200);
        assert_eq!(
            policy.allowed_operations(),
            &["SELECT".to_string(), "WITH".to_string()]
        );
        assert!(policy.denylist().contains(&"UNION".to_string()));
        assert!(!policy.require_limit());
    }

    #[test]
    fn test_explicit_denylist_replaces_profile() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("POLICY_DENYLIST", "drop, truncate"));
        let config = AppConfig::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(
            config.policy.to_policy().denylist(),
            &["DROP".to_string(), "TRUNCATE".to_string()]
        );
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("AUDIT_TABLE", "audit; DROP TABLE x"));
        let err = AppConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("AUDIT_TABLE", _)));

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("POLICY_PROFILE", "lenient"));
        let err = AppConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("POLICY_PROFILE", _)));

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("POLICY_REQUIRE_LIMIT", "sometimes"));
        let err = AppConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("POLICY_REQUIRE_LIMIT", _)));
    }

    #[test]
    fn test_malformed_numbers_are_rejected() {
        for key in [
            "API_PORT",
            "DATABASE_MAX_CONNECTIONS",
            "DATABASE_MIN_CONNECTIONS",
            "MAX_QUERY_LENGTH",
            "RATE_LIMIT_REQUESTS_PER_SECOND",
            "RATE_LIMIT_BURST",
        ] {
            let mut pairs = REQUIRED.to_vec();
            pairs.push((key, "abc"));
            let err = AppConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidValue(k, ref raw) if k == key && raw == "abc"),
                "{key}: {err}"
            );
        }

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("APP_ENV", "prod-ish"));
        let err = AppConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("APP_ENV", _)));
    }

    #[test]
    fn test_numbers_tolerate_surrounding_whitespace() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("MAX_QUERY_LENGTH", " 250 "));
        let config = AppConfig::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.policy.max_query_length, 250);
    }

    #[test]
    fn test_signature_secret_is_redacted() {
        let config = SignatureConfig {
            secret: Some("hunter2".to_string()),
        };
        assert!(config.is_enabled());
        assert!(!format!("{config:?}").contains("hunter2"));
    }

    #[test]
    fn test_default_values() {
        assert_eq!(default_app_name(), "query-guard");
        assert_eq!(default_host(), "127.0.0.1");
        assert_eq!(default_max_connections(), 20);
        assert_eq!(default_max_query_length(), 1000);
        assert_eq!(default_allowed_operations(), vec!["SELECT".to_string()]);
    }
}
