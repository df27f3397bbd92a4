use thiserror::Error;

impl From<config::ConfigError> for MigrationError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(format!("Failed to load configuration: {}", err))
    }
}

impl From<reqwest::Error> for MigrationError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Non-2xx answer from the SQL endpoint.
    #[error("Error {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Schema error: {0}")]
    Schema(String),
}

impl MigrationError {
    pub fn missing_key(key: &str) -> Self {
        Self::Config(format!("{} is not set", key))
    }

    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_display() {
        let err = MigrationError::Http {
            status: 400,
            body: "{\"message\":\"bad\"}".to_string(),
        };
        assert_eq!(err.to_string(), "Error 400: {\"message\":\"bad\"}");
    }

    #[test]
    fn test_missing_key() {
        let err = MigrationError::missing_key("service_role_key");
        assert_eq!(
            err.to_string(),
            "Configuration error: service_role_key is not set"
        );
    }
}
