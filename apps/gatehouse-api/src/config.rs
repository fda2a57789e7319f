//! Application configuration loaded from environment variables.
//!
//! Fail-fast loading with validation: required variables must be present
//! and valid, or the application exits with a clear error message.

use std::env;

use regex::Regex;
use thiserror::Error;

use gatehouse_api_invitations::services::SmtpConfig;

/// Configuration errors that can occur during environment loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },
}

/// Application environment mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Production,
}

impl AppEnvironment {
    /// Parse from the `APP_ENV` environment variable value.
    /// Defaults to `Development` if unset or unrecognized.
    pub fn from_env_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "development" | "dev" => Self::Development,
            other => {
                tracing::warn!(
                    value = other,
                    "Unrecognized APP_ENV value, defaulting to Development"
                );
                Self::Development
            }
        }
    }

    #[must_use]
    pub fn is_production(&self) -> bool {
        *self == Self::Production
    }
}

impl std::fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PostgreSQL connection string.
    pub database_url: String,

    /// Bind address.
    pub host: String,

    /// Bind port.
    pub port: u16,

    /// Log filter directive (overridden by `RUST_LOG` when set).
    pub log_filter: String,

    /// Application environment mode.
    pub app_env: AppEnvironment,

    /// PEM-encoded RSA public key for bearer token verification.
    pub jwt_public_key: String,

    /// Whether registration requires an invitation key.
    pub invite_mode: bool,

    /// Default invitation quota per user.
    pub invitations_per_user: i32,

    /// Invitation key expiry window in days.
    pub invitation_expiry_days: i64,

    /// Compiled invitation block-list patterns.
    pub blocklist: Vec<Regex>,

    /// Base URL used in invitation email links.
    pub frontend_url: String,

    /// From address for invitation emails.
    pub from_email: String,

    /// SMTP transport settings; `None` means the mock sender is used.
    pub smtp: Option<SmtpConfig>,
}

fn required_var(name: &str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ConfigError::MissingVar(name.to_string()))
}

fn parse_bool(value: &str) -> bool {
    !matches!(value.to_lowercase().as_str(), "false" | "0" | "no" | "off")
}

/// Compile a comma-separated list of block-list regex patterns.
///
/// An invalid pattern is a startup error rather than a silently ignored
/// rule.
fn parse_blocklist(value: &str) -> Result<Vec<Regex>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|pattern| {
            Regex::new(pattern).map_err(|e| ConfigError::InvalidValue {
                var: "INVITATION_BLOCKLIST".to_string(),
                message: format!("Invalid pattern '{pattern}': {e}"),
            })
        })
        .collect()
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` on a missing required variable or an invalid
    /// value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = required_var("DATABASE_URL")?;

        let jwt_public_key = required_var("JWT_PUBLIC_KEY")?;
        if !jwt_public_key.contains("BEGIN PUBLIC KEY") {
            return Err(ConfigError::InvalidValue {
                var: "JWT_PUBLIC_KEY".to_string(),
                message: "Expected a PEM-encoded public key".to_string(),
            });
        }

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .ok()
            .map(|s| {
                s.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                    var: "PORT".to_string(),
                    message: e.to_string(),
                })
            })
            .transpose()?
            .unwrap_or(8080);

        let log_filter =
            env::var("RUST_LOG").unwrap_or_else(|_| "info,gatehouse=debug".to_string());

        let app_env =
            AppEnvironment::from_env_str(&env::var("APP_ENV").unwrap_or_default());

        let invite_mode = env::var("INVITE_MODE")
            .map(|s| parse_bool(&s))
            .unwrap_or(true);

        let invitations_per_user = env::var("INVITATIONS_PER_USER")
            .ok()
            .map(|s| {
                s.parse::<i32>().map_err(|e| ConfigError::InvalidValue {
                    var: "INVITATIONS_PER_USER".to_string(),
                    message: e.to_string(),
                })
            })
            .transpose()?
            .unwrap_or(5);

        let invitation_expiry_days = env::var("INVITATION_EXPIRY_DAYS")
            .ok()
            .map(|s| {
                s.parse::<i64>().map_err(|e| ConfigError::InvalidValue {
                    var: "INVITATION_EXPIRY_DAYS".to_string(),
                    message: e.to_string(),
                })
            })
            .transpose()?
            .unwrap_or(7);

        let blocklist = parse_blocklist(&env::var("INVITATION_BLOCKLIST").unwrap_or_default())?;

        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        let from_email =
            env::var("DEFAULT_FROM_EMAIL").unwrap_or_else(|_| "noreply@localhost".to_string());

        let smtp = match env::var("SMTP_HOST").ok().filter(|s| !s.is_empty()) {
            Some(smtp_host) => {
                let smtp_port = env::var("SMTP_PORT")
                    .ok()
                    .map(|s| {
                        s.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                            var: "SMTP_PORT".to_string(),
                            message: e.to_string(),
                        })
                    })
                    .transpose()?
                    .unwrap_or(587);

                Some(SmtpConfig {
                    host: smtp_host,
                    port: smtp_port,
                    username: env::var("SMTP_USERNAME").ok().filter(|s| !s.is_empty()),
                    password: env::var("SMTP_PASSWORD").ok().filter(|s| !s.is_empty()),
                    use_tls: env::var("SMTP_TLS").map(|s| parse_bool(&s)).unwrap_or(true),
                })
            }
            None => None,
        };

        Ok(Self {
            database_url,
            host,
            port,
            log_filter,
            app_env,
            jwt_public_key,
            invite_mode,
            invitations_per_user,
            invitation_expiry_days,
            blocklist,
            frontend_url,
            from_email,
            smtp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_environment_parsing() {
        assert_eq!(
            AppEnvironment::from_env_str("production"),
            AppEnvironment::Production
        );
        assert_eq!(
            AppEnvironment::from_env_str("prod"),
            AppEnvironment::Production
        );
        assert_eq!(
            AppEnvironment::from_env_str("dev"),
            AppEnvironment::Development
        );
        assert_eq!(
            AppEnvironment::from_env_str("staging"),
            AppEnvironment::Development
        );
        assert!(AppEnvironment::Production.is_production());
    }

    #[test]
    fn test_parse_bool_accepts_common_forms() {
        assert!(parse_bool("true"));
        assert!(parse_bool("1"));
        assert!(parse_bool("yes"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool("no"));
        assert!(!parse_bool("OFF"));
    }

    #[test]
    fn test_parse_blocklist_compiles_patterns() {
        let patterns = parse_blocklist(r"@ourcompany\.com$, ^staff@").unwrap();
        assert_eq!(patterns.len(), 2);
        assert!(patterns[0].is_match("someone@ourcompany.com"));
        assert!(patterns[1].is_match("staff@elsewhere.org"));
    }

    #[test]
    fn test_parse_blocklist_empty_is_empty() {
        assert!(parse_blocklist("").unwrap().is_empty());
        assert!(parse_blocklist(" , ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_blocklist_rejects_invalid_pattern() {
        let result = parse_blocklist("[unclosed");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { var, .. }) if var == "INVITATION_BLOCKLIST"
        ));
    }
}
