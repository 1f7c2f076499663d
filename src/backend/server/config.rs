//! Server Configuration
//!
//! All configuration is loaded from environment variables at startup; a
//! `.env` file is honoured in development. `DATABASE_URL` is required —
//! this is an API server and every route touches the database. The
//! third-party integrations (payments, media CDN, SMTP, geocoding) are
//! optional: when unset, the corresponding adapter reports itself as
//! unconfigured and the dependent endpoints answer 503.

use thiserror::Error;

/// Configuration loading failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Payment-processor settings
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    pub api_url: String,
    pub secret_key: String,
    pub success_url: String,
    pub cancel_url: String,
}

/// Media-hosting settings
#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub upload_url: String,
    pub api_key: String,
}

/// Outbound email settings
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_url: String,
    pub from_address: String,
}

/// Admin bootstrap credentials (see `server::bootstrap`)
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Holds all configuration loaded from the environment at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub payments: Option<PaymentConfig>,
    pub media: Option<MediaConfig>,
    pub mail: Option<MailConfig>,
    pub geocode_url: Option<String>,
    pub admin_bootstrap: Option<AdminBootstrap>,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

        let port = std::env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidValue("SERVER_PORT".to_string(), e.to_string()))?;

        let payments = match std::env::var("PAYMENT_API_URL") {
            Ok(api_url) => Some(PaymentConfig {
                api_url,
                secret_key: std::env::var("PAYMENT_SECRET_KEY")
                    .map_err(|_| ConfigError::MissingVar("PAYMENT_SECRET_KEY".to_string()))?,
                success_url: std::env::var("PAYMENT_SUCCESS_URL")
                    .unwrap_or_else(|_| "http://localhost:3000/checkout/success".to_string()),
                cancel_url: std::env::var("PAYMENT_CANCEL_URL")
                    .unwrap_or_else(|_| "http://localhost:3000/checkout/cancel".to_string()),
            }),
            Err(_) => None,
        };

        let media = match std::env::var("MEDIA_UPLOAD_URL") {
            Ok(upload_url) => Some(MediaConfig {
                upload_url,
                api_key: std::env::var("MEDIA_API_KEY").unwrap_or_default(),
            }),
            Err(_) => None,
        };

        let mail = match std::env::var("SMTP_URL") {
            Ok(smtp_url) => Some(MailConfig {
                smtp_url,
                from_address: std::env::var("MAIL_FROM")
                    .unwrap_or_else(|_| "noreply@artcorner.example".to_string()),
            }),
            Err(_) => None,
        };

        let geocode_url = std::env::var("GEOCODE_API_URL").ok();

        // Admin accounts are provisioned here, never through signup.
        let admin_bootstrap = match (
            std::env::var("ADMIN_EMAIL"),
            std::env::var("ADMIN_PASSWORD"),
        ) {
            (Ok(email), Ok(password)) => Some(AdminBootstrap {
                username: std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
                email,
                password,
            }),
            _ => None,
        };

        Ok(Self {
            database_url,
            port,
            payments,
            media,
            mail,
            geocode_url,
            admin_bootstrap,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingVar("DATABASE_URL".to_string());
        assert!(err.to_string().contains("DATABASE_URL"));
    }
}
