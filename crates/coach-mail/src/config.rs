//! # Mail Configuration
//!
//! SMTP relay account settings, loaded from environment variables.

use coach_core::MailError;
use std::env;

const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 465;

/// SMTP relay configuration
#[derive(Clone)]
pub struct MailConfig {
    /// Relay hostname
    pub smtp_host: String,
    /// Relay port (465 = implicit TLS, anything else = STARTTLS)
    pub smtp_port: u16,
    /// Relay account user
    pub username: String,
    /// Relay account password (app password for Gmail)
    pub password: String,
    /// Sender address; defaults to the account user
    pub from_address: String,
}

impl MailConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `EMAIL_USER`
    /// - `EMAIL_PASS`
    ///
    /// Optional:
    /// - `EMAIL_FROM`, `SMTP_HOST`, `SMTP_PORT`
    pub fn from_env() -> Result<Self, MailError> {
        dotenvy::dotenv().ok();

        let username = env::var("EMAIL_USER")
            .map_err(|_| MailError::Configuration("EMAIL_USER not set".to_string()))?;
        let password = env::var("EMAIL_PASS")
            .map_err(|_| MailError::Configuration("EMAIL_PASS not set".to_string()))?;

        let mut config = Self::new(username, password);

        if let Ok(from) = env::var("EMAIL_FROM") {
            config.from_address = from;
        }
        if let Ok(host) = env::var("SMTP_HOST") {
            config.smtp_host = host;
        }
        if let Ok(port) = env::var("SMTP_PORT") {
            config.smtp_port = port.parse().map_err(|_| {
                MailError::Configuration(format!("SMTP_PORT is not a valid port: {}", port))
            })?;
        }

        Ok(config)
    }

    /// Create config for a Gmail account
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        let username = username.into();
        Self {
            smtp_host: DEFAULT_SMTP_HOST.to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
            from_address: username.clone(),
            username,
            password: password.into(),
        }
    }

    /// Builder: set relay host and port
    pub fn with_relay(mut self, host: impl Into<String>, port: u16) -> Self {
        self.smtp_host = host.into();
        self.smtp_port = port;
        self
    }

    /// Builder: set sender address
    pub fn with_from_address(mut self, from: impl Into<String>) -> Self {
        self.from_address = from.into();
        self
    }

    /// Whether the relay expects TLS from the first byte
    pub fn uses_implicit_tls(&self) -> bool {
        self.smtp_port == 465
    }
}

// Keep the password out of logs.
impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("username", &self.username)
            .field("password", &"***")
            .field("from_address", &self.from_address)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gmail_defaults() {
        let config = MailConfig::new("coach@gmail.com", "app-password");

        assert_eq!(config.smtp_host, "smtp.gmail.com");
        assert_eq!(config.smtp_port, 465);
        assert_eq!(config.from_address, "coach@gmail.com");
        assert!(config.uses_implicit_tls());
    }

    #[test]
    fn test_builders() {
        let config = MailConfig::new("user", "pass")
            .with_relay("smtp.example.com", 587)
            .with_from_address("GT Coaching <noreply@example.com>");

        assert_eq!(config.smtp_host, "smtp.example.com");
        assert!(!config.uses_implicit_tls());
        assert_eq!(config.from_address, "GT Coaching <noreply@example.com>");
    }

    #[test]
    fn test_debug_hides_password() {
        let config = MailConfig::new("coach@gmail.com", "super-secret");
        let debug = format!("{:?}", config);

        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("coach@gmail.com"));
    }
}
