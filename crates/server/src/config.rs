//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BACKOFFICE_DATABASE_URL` - `PostgreSQL` connection string (falls back
//!   to `DATABASE_URL`)
//! - `OPERATOR_EMAIL` - fixed recipient for super-admin verification codes
//! - `SMTP_HOST` / `SMTP_USERNAME` / `SMTP_PASSWORD` / `SMTP_FROM` - SMTP
//!   relay settings
//!
//! ## Optional
//! - `BACKOFFICE_HOST` - Bind address (default: 127.0.0.1)
//! - `BACKOFFICE_PORT` - Listen port (default: 3001)
//! - `SMTP_PORT` - SMTP port (default: 587)
//! - `UPLOADS_DIR` - Directory served under `/uploads` (default: uploads)
//! - `SENTRY_DSN` / `SENTRY_ENVIRONMENT` - error tracking
//! - `SENTRY_SAMPLE_RATE` / `SENTRY_TRACES_SAMPLE_RATE` - sample rates

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Secrets below this entropy (bits per character) are assumed to be typed
/// by hand rather than generated, and rejected.
const SECRET_MIN_BITS_PER_CHAR: f64 = 3.3;

/// Substrings that mark a secret as a template left-over (checked
/// case-insensitively).
const SECRET_PLACEHOLDER_MARKERS: &[&str] = &[
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "your-",
    "enter-",
    "put-your",
    "add-your",
    "insert",
    "todo",
    "fixme",
    "xxx",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` connection URL (contains credentials)
    pub database_url: SecretString,
    /// Bind address
    pub host: IpAddr,
    /// Listen port
    pub port: u16,
    /// Fixed operator address receiving super-admin verification codes
    pub operator_email: String,
    /// SMTP relay settings
    pub email: EmailConfig,
    /// Directory served under `/uploads`
    pub uploads_dir: String,
    /// Sentry DSN; error tracking is off when absent
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g. "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate, 0.0 to 1.0
    pub sentry_sample_rate: f32,
    /// Sentry performance-trace sample rate, 0.0 to 1.0
    pub sentry_traces_sample_rate: f32,
}

/// SMTP relay settings.
///
/// `Debug` is written out by hand so the password never lands in logs.
#[derive(Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: SecretString,
    /// Sender address used as the From header
    pub from_address: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .finish()
    }
}

impl EmailConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            smtp_host: require_var("SMTP_HOST")?,
            smtp_port: parse_var("SMTP_PORT", "587")?,
            smtp_username: require_var("SMTP_USERNAME")?,
            smtp_password: secret_var("SMTP_PASSWORD")?,
            from_address: require_var("SMTP_FROM")?,
        })
    }
}

impl ServerConfig {
    /// Load configuration from the environment, reading a `.env` file first
    /// when one is present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a required variable is missing or invalid,
    /// or when a secret fails the placeholder/entropy screening.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            database_url: database_url_var()?,
            host: parse_var("BACKOFFICE_HOST", "127.0.0.1")?,
            port: parse_var("BACKOFFICE_PORT", "3001")?,
            operator_email: require_var("OPERATOR_EMAIL")?,
            email: EmailConfig::from_env()?,
            uploads_dir: var_or("UPLOADS_DIR", "uploads"),
            sentry_dsn: maybe_var("SENTRY_DSN"),
            sentry_environment: maybe_var("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: maybe_var("SENTRY_SAMPLE_RATE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(1.0),
            sentry_traces_sample_rate: maybe_var("SENTRY_TRACES_SAMPLE_RATE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(1.0),
        })
    }

    /// The socket address to bind the listener to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Environment helpers
// =============================================================================

fn require_var(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_owned()))
}

fn maybe_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Read a variable (with default) and parse it into its typed form.
fn parse_var<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    var_or(key, default)
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string()))
}

/// The database URL, preferring the service-specific variable over the
/// generic `DATABASE_URL`.
fn database_url_var() -> Result<SecretString, ConfigError> {
    std::env::var("BACKOFFICE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| ConfigError::MissingEnvVar("BACKOFFICE_DATABASE_URL".to_owned()))
}

/// Read a secret and screen it for placeholder markers and low entropy.
fn secret_var(key: &str) -> Result<SecretString, ConfigError> {
    let value = require_var(key)?;
    screen_secret(key, &value)?;
    Ok(SecretString::from(value))
}

/// Shannon entropy of the string, in bits per character.
fn entropy_bits_per_char(s: &str) -> f64 {
    let total = s.chars().count();
    if total == 0 {
        return 0.0;
    }

    let mut counts: std::collections::HashMap<char, usize> = std::collections::HashMap::new();
    for c in s.chars() {
        *counts.entry(c).or_default() += 1;
    }

    #[allow(clippy::cast_precision_loss)] // secret lengths are tiny
    counts
        .into_values()
        .map(|n| {
            let p = n as f64 / total as f64;
            -p * p.log2()
        })
        .sum()
}

fn screen_secret(key: &str, value: &str) -> Result<(), ConfigError> {
    let lowered = value.to_lowercase();
    if let Some(marker) = SECRET_PLACEHOLDER_MARKERS
        .iter()
        .find(|m| lowered.contains(**m))
    {
        return Err(ConfigError::InsecureSecret(
            key.to_owned(),
            format!("looks like a placeholder (contains '{marker}')"),
        ));
    }

    let bits = entropy_bits_per_char(value);
    if bits < SECRET_MIN_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            key.to_owned(),
            format!(
                "entropy too low ({bits:.2} bits/char, need >= {SECRET_MIN_BITS_PER_CHAR:.1}); use a generated secret"
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_entropy_degenerate_inputs() {
        assert!(entropy_bits_per_char("").abs() < f64::EPSILON);
        // a single repeated character carries no information
        assert!(entropy_bits_per_char("zzzzzzzz").abs() < f64::EPSILON);
    }

    #[test]
    fn test_entropy_uniform_two_symbols() {
        // 50/50 over two symbols is exactly one bit per character
        assert!((entropy_bits_per_char("abababab") - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_screen_secret_rejects_placeholders() {
        let err = screen_secret("SMTP_PASSWORD", "your-smtp-key-here").unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_screen_secret_rejects_low_entropy() {
        assert!(screen_secret("SMTP_PASSWORD", "aaaabbbbaaaabbbbaaaabbbb").is_err());
    }

    #[test]
    fn test_screen_secret_accepts_generated_value() {
        assert!(screen_secret("SMTP_PASSWORD", "kJ8#mQ2$vN5!xR9@wT4^bL7&pZ1*cF3").is_ok());
    }

    #[test]
    fn test_email_config_debug_redacts_password() {
        let config = EmailConfig {
            smtp_host: "smtp.example.com".to_owned(),
            smtp_port: 587,
            smtp_username: "ops@example.com".to_owned(),
            smtp_password: SecretString::from("kJ8#mQ2$vN5!xR9"),
            from_address: "noreply@example.com".to_owned(),
        };

        let rendered = format!("{config:?}");
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("kJ8#mQ2"));
        assert!(rendered.contains("smtp.example.com"));
    }

    #[test]
    fn test_socket_addr_combines_host_and_port() {
        let config = ServerConfig {
            database_url: SecretString::from("postgres://localhost/backoffice"),
            host: "0.0.0.0".parse().unwrap(),
            port: 8080,
            operator_email: "ops@example.com".to_owned(),
            email: EmailConfig {
                smtp_host: "smtp.example.com".to_owned(),
                smtp_port: 587,
                smtp_username: "ops".to_owned(),
                smtp_password: SecretString::from("x"),
                from_address: "noreply@example.com".to_owned(),
            },
            uploads_dir: "uploads".to_owned(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        };

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
    }
}
