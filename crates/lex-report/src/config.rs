//! Configuration types for the report client.
//!
//! Two kinds of configuration live here:
//!
//! - [`CleaningOptions`] is the cleaning request sent to the remote service.
//!   The client does not interpret the options; it only serializes them.
//! - [`ClientConfig`] controls how the client reaches the service.
//!
//! Both use the builder pattern.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default base URL of the cleaning service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Default request timeout in seconds. KNN imputation on a large file can
/// take well over a minute on the service side.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default directory for exported artifacts and JSON reports.
pub const DEFAULT_OUTPUT_DIR: &str = "reports";

/// Environment variable overriding the service base URL.
pub const API_URL_ENV: &str = "DATACLEANER_API_URL";

/// Environment variable overriding the request timeout.
pub const TIMEOUT_ENV: &str = "DATACLEANER_TIMEOUT_SECS";

/// Strategy the service uses for missing values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImputationMethod {
    /// Leave missing values as they are
    #[default]
    None,
    /// Fill numeric gaps with the column mean
    Mean,
    /// Fill numeric gaps with the column median
    Median,
    /// Fill numeric gaps with K-Nearest Neighbors
    Knn,
}

/// Strategy the service uses for outliers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutlierMethod {
    /// Keep outliers as-is
    #[default]
    None,
    /// Cap with robust percentile bounds
    Iqr,
    /// Cap at mean +/- 3 standard deviations
    Zscore,
    /// Winsorize the 5% tails
    Winsorization,
}

/// Cleaning request sent to the remote service.
///
/// Serialized in camelCase, which is what the service reads:
///
/// ```json
/// {"imputationMethod": "mean", "outlierMethod": "iqr", "removeDuplicates": true}
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleaningOptions {
    /// How missing values are handled.
    /// Default: None
    pub imputation_method: ImputationMethod,

    /// How outliers are handled.
    /// Default: None
    pub outlier_method: OutlierMethod,

    /// Whether duplicate rows are dropped.
    /// Default: true
    pub remove_duplicates: bool,
}

impl Default for CleaningOptions {
    fn default() -> Self {
        Self {
            imputation_method: ImputationMethod::default(),
            outlier_method: OutlierMethod::default(),
            remove_duplicates: true,
        }
    }
}

impl CleaningOptions {
    /// Create a new options builder.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lex_report::config::{CleaningOptions, ImputationMethod};
    ///
    /// let options = CleaningOptions::builder()
    ///     .imputation_method(ImputationMethod::Median)
    ///     .remove_duplicates(false)
    ///     .build();
    /// assert!(!options.remove_duplicates);
    /// ```
    pub fn builder() -> CleaningOptionsBuilder {
        CleaningOptionsBuilder::default()
    }

    /// True when the request asks the service to change nothing.
    pub fn is_noop(&self) -> bool {
        self.imputation_method == ImputationMethod::None
            && self.outlier_method == OutlierMethod::None
            && !self.remove_duplicates
    }
}

/// Builder for [`CleaningOptions`].
#[derive(Debug, Default)]
pub struct CleaningOptionsBuilder {
    imputation_method: Option<ImputationMethod>,
    outlier_method: Option<OutlierMethod>,
    remove_duplicates: Option<bool>,
}

impl CleaningOptionsBuilder {
    /// Set the missing-value strategy.
    pub fn imputation_method(mut self, method: ImputationMethod) -> Self {
        self.imputation_method = Some(method);
        self
    }

    /// Set the outlier strategy.
    pub fn outlier_method(mut self, method: OutlierMethod) -> Self {
        self.outlier_method = Some(method);
        self
    }

    /// Enable or disable duplicate row removal.
    pub fn remove_duplicates(mut self, remove: bool) -> Self {
        self.remove_duplicates = Some(remove);
        self
    }

    /// Build the options.
    pub fn build(self) -> CleaningOptions {
        CleaningOptions {
            imputation_method: self.imputation_method.unwrap_or_default(),
            outlier_method: self.outlier_method.unwrap_or_default(),
            remove_duplicates: self.remove_duplicates.unwrap_or(true),
        }
    }
}

/// Configuration for reaching the cleaning service.
///
/// # Example
///
/// ```rust
/// use lex_report::config::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .base_url("http://cleaner.internal:8080")
///     .timeout_secs(30)
///     .build()
///     .unwrap();
/// assert_eq!(config.endpoint("/upload"), "http://cleaner.internal:8080/upload");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the service, without a trailing slash.
    /// Default: "http://localhost:5000"
    pub base_url: String,

    /// Request timeout in seconds.
    /// Default: 120
    pub timeout_secs: u64,

    /// Directory for exported artifacts and JSON reports.
    /// Default: "reports"
    pub output_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Build a configuration from the process environment.
    ///
    /// Reads [`API_URL_ENV`] and [`TIMEOUT_ENV`]; unset variables keep their
    /// defaults. A timeout that is not a number is a validation error.
    pub fn from_env() -> Result<Self, ConfigValidationError> {
        let mut builder = Self::builder();

        if let Ok(url) = std::env::var(API_URL_ENV) {
            builder = builder.base_url(url);
        }

        if let Ok(raw) = std::env::var(TIMEOUT_ENV) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigValidationError::UnparsableTimeout(raw.clone()))?;
            builder = builder.timeout_secs(secs);
        }

        builder.build()
    }

    /// Join an endpoint path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let url = self.base_url.trim();
        let has_scheme = url.starts_with("http://") || url.starts_with("https://");
        if !has_scheme || reqwest::Url::parse(url).is_err() {
            return Err(ConfigValidationError::InvalidBaseUrl(self.base_url.clone()));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidTimeout(self.timeout_secs));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid base URL '{0}' (must be an http:// or https:// URL)")]
    InvalidBaseUrl(String),

    #[error("Invalid timeout: {0} (must be at least 1 second)")]
    InvalidTimeout(u64),

    #[error("Invalid timeout '{0}' (expected a whole number of seconds)")]
    UnparsableTimeout(String),
}

impl From<ConfigValidationError> for crate::error::ReportError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::ReportError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`ClientConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    output_dir: Option<PathBuf>,
}

impl ClientConfigBuilder {
    /// Set the service base URL. A trailing slash is dropped.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into().trim().trim_end_matches('/').to_string());
        self
    }

    /// Set the request timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Set the directory for exported artifacts and reports.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `ClientConfig` or an error if validation fails.
    pub fn build(self) -> Result<ClientConfig, ConfigValidationError> {
        let config = ClientConfig {
            base_url: self
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            output_dir: self
                .output_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cleaning_options() {
        let options = CleaningOptions::default();
        assert_eq!(options.imputation_method, ImputationMethod::None);
        assert_eq!(options.outlier_method, OutlierMethod::None);
        assert!(options.remove_duplicates);
        assert!(!options.is_noop());
    }

    #[test]
    fn test_cleaning_options_wire_format() {
        let options = CleaningOptions::builder()
            .imputation_method(ImputationMethod::Knn)
            .outlier_method(OutlierMethod::Winsorization)
            .remove_duplicates(false)
            .build();

        let json = serde_json::to_value(options).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "imputationMethod": "knn",
                "outlierMethod": "winsorization",
                "removeDuplicates": false
            })
        );
    }

    #[test]
    fn test_cleaning_options_from_frontend_json() {
        let json = r#"{"imputationMethod":"median","outlierMethod":"zscore","removeDuplicates":true}"#;
        let options: CleaningOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.imputation_method, ImputationMethod::Median);
        assert_eq!(options.outlier_method, OutlierMethod::Zscore);
        assert!(options.remove_duplicates);
    }

    #[test]
    fn test_noop_options() {
        let options = CleaningOptions::builder().remove_duplicates(false).build();
        assert!(options.is_noop());
    }

    #[test]
    fn test_client_builder_defaults() {
        let config = ClientConfig::builder().build().unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
    }

    #[test]
    fn test_endpoint_joining() {
        let config = ClientConfig::builder()
            .base_url("https://cleaner.example.com/api/")
            .build()
            .unwrap();
        assert_eq!(config.base_url, "https://cleaner.example.com/api");
        assert_eq!(
            config.endpoint("/download/report"),
            "https://cleaner.example.com/api/download/report"
        );
        assert_eq!(config.endpoint("clean"), "https://cleaner.example.com/api/clean");
    }

    #[test]
    fn test_validation_invalid_base_url() {
        let result = ClientConfig::builder().base_url("localhost:5000").build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidBaseUrl(_)
        ));
    }

    #[test]
    fn test_validation_invalid_timeout() {
        let result = ClientConfig::builder().timeout_secs(0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidTimeout(0)
        ));
    }
}
