//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::{Config, DelayRange};

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
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_browser(config, &mut result);
        Self::validate_pacing(config, &mut result);
        Self::validate_flows(config, &mut result);
        Self::validate_batch(config, &mut result);
        Self::validate_classifier(config, &mut result);

        Ok(result)
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        if config.browser.debug_port == 0 {
            result.add_error(ValidationError::new(
                "browser.debug_port",
                "Port cannot be 0",
            ));
        }

        if config.browser.profile_dir.is_none() {
            result.add_warning(ValidationWarning::new(
                "browser.profile_dir",
                "No Chrome profile set; a freshly launched browser will not be logged in",
            ));
        }
    }

    fn validate_pacing(config: &Config, result: &mut ValidationResult) {
        for (path, range) in config.pacing.ranges() {
            Self::validate_range(path, range, result);
        }
    }

    fn validate_flows(config: &Config, result: &mut ValidationResult) {
        let flows = &config.flows;

        if flows.waiter_timeout_ms == 0 {
            result.add_error(ValidationError::new(
                "flows.waiter_timeout_ms",
                "waiter_timeout_ms must be greater than 0",
            ));
        }

        if flows.default_accept_count == 0 {
            result.add_warning(ValidationWarning::new(
                "flows.default_accept_count",
                "default_accept_count is 0, accept will do nothing unless --count is given",
            ));
        }

        if flows.profile_url_marker.is_empty() {
            result.add_error(ValidationError::new(
                "flows.profile_url_marker",
                "profile_url_marker cannot be empty",
            ));
        }

        if flows.invitation_url_marker.is_empty() {
            result.add_error(ValidationError::new(
                "flows.invitation_url_marker",
                "invitation_url_marker cannot be empty",
            ));
        }
    }

    fn validate_batch(config: &Config, result: &mut ValidationResult) {
        Self::validate_range("batch.start_offset", config.batch.start_offset, result);
    }

    fn validate_classifier(config: &Config, result: &mut ValidationResult) {
        let classifier = &config.classifier;

        if !classifier.api_url.starts_with("http://") && !classifier.api_url.starts_with("https://")
        {
            result.add_error(ValidationError::new(
                "classifier.api_url",
                "api_url must start with http:// or https://",
            ));
        }

        if classifier.model.is_empty() {
            result.add_error(ValidationError::new(
                "classifier.model",
                "model cannot be empty",
            ));
        }

        if !(0.0..=2.0).contains(&classifier.temperature) {
            result.add_error(ValidationError::new(
                "classifier.temperature",
                "temperature must be between 0.0 and 2.0",
            ));
        }

        if classifier.request_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "classifier.request_timeout_secs",
                "request_timeout_secs must be greater than 0",
            ));
        }

        if classifier.api_key.is_none() {
            result.add_warning(ValidationWarning::new(
                "classifier.api_key",
                "API key is not set, classification is skipped until one is stored",
            ));
        }
    }

    fn validate_range(path: &str, range: DelayRange, result: &mut ValidationResult) {
        if !range.is_valid() {
            result.add_error(ValidationError::new(
                path,
                format!("min_ms ({}) exceeds max_ms ({})", range.min_ms, range.max_ms),
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
