//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::{Config, TokenAlgorithm};

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Collapse into a single error, if any were recorded.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(first) => Err(ConfigError::InvalidValue {
                field: first.path,
                message: first.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_session(config, &mut result);
        Self::validate_auth(config, &mut result);

        result
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        }

        for (path, value) in [
            ("server.websocket_path", &config.server.websocket_path),
            ("server.token_path", &config.server.token_path),
        ] {
            if !value.starts_with('/') {
                result.add_error(ValidationError::new(path, "Route paths must start with '/'"));
            }
        }

        if config.server.websocket_path == config.server.token_path {
            result.add_error(ValidationError::new(
                "server.token_path",
                "Token endpoint cannot share the WebSocket path",
            ));
        }
    }

    fn validate_session(config: &Config, result: &mut ValidationResult) {
        if config.session.inactivity_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "session.inactivity_timeout_secs",
                "inactivity_timeout_secs must be greater than 0",
            ));
        }

        if config.session.inactivity_timeout_secs > 3600 * 24 {
            result.add_warning(ValidationWarning::new(
                "session.inactivity_timeout_secs",
                "Sessions idle for more than a day stay in memory",
            ));
        }
    }

    fn validate_auth(config: &Config, result: &mut ValidationResult) {
        let auth = &config.auth;

        match auth.algorithm {
            TokenAlgorithm::Hs256 => match auth.secret.as_deref() {
                None | Some("") => result.add_error(ValidationError::new(
                    "auth.secret",
                    "hs256 requires a non-empty secret",
                )),
                Some(secret) if secret.len() < 32 => result.add_warning(ValidationWarning::new(
                    "auth.secret",
                    "Secret is shorter than 32 bytes",
                )),
                Some(_) => {}
            },
            TokenAlgorithm::Rs256 => {
                if auth.private_key_path.is_none() {
                    result.add_error(ValidationError::new(
                        "auth.private_key_path",
                        "rs256 requires a private key",
                    ));
                }
                if auth.public_key_path.is_none() {
                    result.add_error(ValidationError::new(
                        "auth.public_key_path",
                        "rs256 requires a public key",
                    ));
                }
            }
        }

        if auth.token_ttl_secs == 0 {
            result.add_error(ValidationError::new(
                "auth.token_ttl_secs",
                "token_ttl_secs must be greater than 0",
            ));
        }

        if auth.token_ttl_secs < config.session.inactivity_timeout_secs {
            result.add_warning(ValidationWarning::new(
                "auth.token_ttl_secs",
                "Tokens expire before idle sessions are evicted",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
