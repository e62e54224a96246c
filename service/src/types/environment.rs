//! Environment configuration for different deployment stages

use std::env;
use std::time::Duration;

use aws_config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion, Region};

use crate::issuer::DEFAULT_TTL_SECS;

/// Application environment configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Development environment (uses an S3-compatible local endpoint)
    Development,
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// # Panics
    ///
    /// Panics if `APP_ENV` contains an invalid value
    #[must_use]
    pub fn from_env() -> Self {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Self::Production,
            "staging" => Self::Staging,
            "development" => Self::Development,
            _ => panic!("Invalid environment: {env}"),
        }
    }

    /// Default TTL for issued authorizations, in seconds
    ///
    /// `DEFAULT_TTL_SECONDS` overrides the 3600-second default.
    #[must_use]
    pub fn default_ttl_secs(&self) -> u64 {
        env::var("DEFAULT_TTL_SECONDS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TTL_SECS)
    }

    /// Optional fixed bucket name for lifecycle runs
    #[must_use]
    pub fn bucket_name_hint(&self) -> Option<String> {
        env::var("BUCKET_NAME_HINT").ok()
    }

    /// Returns the endpoint URL to use for the storage provider
    ///
    /// `ENDPOINT` overrides it for S3-compatible non-AWS providers;
    /// development defaults to LocalStack.
    #[must_use]
    pub fn override_endpoint_url(&self) -> Option<String> {
        env::var("ENDPOINT").ok().or_else(|| match self {
            Self::Production | Self::Staging => None,
            Self::Development => Some("http://localhost:4566".to_string()),
        })
    }

    /// AWS configuration with explicit retry and per-operation timeout
    pub async fn aws_config(&self) -> aws_config::SdkConfig {
        let retry_config = RetryConfig::standard()
            .with_max_attempts(3)
            .with_initial_backoff(Duration::from_millis(50));

        let timeout_config = TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(30))
            .build();

        let mut config_builder = aws_config::load_defaults(BehaviorVersion::latest())
            .await
            .to_builder()
            .retry_config(retry_config)
            .timeout_config(timeout_config);

        if let Ok(region) = env::var("REGION") {
            config_builder = config_builder.region(Region::new(region));
        }

        if let Some(endpoint_url) = self.override_endpoint_url() {
            config_builder = config_builder.endpoint_url(endpoint_url);
        }

        config_builder.build()
    }

    /// S3 service configuration
    pub async fn s3_client_config(&self) -> aws_sdk_s3::Config {
        let aws_config = self.aws_config().await;
        let s3_config: aws_sdk_s3::Config = (&aws_config).into();
        let mut builder = s3_config.to_builder();

        // Path-style addressing for LocalStack compatibility
        // https://github.com/awslabs/aws-sdk-rust/discussions/874
        if matches!(self, Self::Development) {
            builder.set_force_path_style(Some(true));
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn environment_from_env() {
        env::remove_var("APP_ENV");
        assert_eq!(Environment::from_env(), Environment::Development);

        env::set_var("APP_ENV", "staging");
        assert_eq!(Environment::from_env(), Environment::Staging);

        env::set_var("APP_ENV", "production");
        assert_eq!(Environment::from_env(), Environment::Production);

        env::remove_var("APP_ENV");
    }

    #[test]
    #[serial]
    #[should_panic(expected = "Invalid environment: invalid")]
    fn invalid_environment() {
        env::set_var("APP_ENV", "invalid");
        let _ = Environment::from_env();
    }

    #[test]
    #[serial]
    fn default_ttl_with_override() {
        env::remove_var("DEFAULT_TTL_SECONDS");
        assert_eq!(Environment::Development.default_ttl_secs(), 3600);

        env::set_var("DEFAULT_TTL_SECONDS", "120");
        assert_eq!(Environment::Development.default_ttl_secs(), 120);

        // Unparseable values fall back to the default
        env::set_var("DEFAULT_TTL_SECONDS", "invalid");
        assert_eq!(Environment::Development.default_ttl_secs(), 3600);

        env::remove_var("DEFAULT_TTL_SECONDS");
    }

    #[test]
    #[serial]
    fn endpoint_override() {
        env::remove_var("ENDPOINT");
        assert_eq!(
            Environment::Development.override_endpoint_url().as_deref(),
            Some("http://localhost:4566")
        );
        assert_eq!(Environment::Production.override_endpoint_url(), None);

        env::set_var("ENDPOINT", "https://storage.example.net");
        assert_eq!(
            Environment::Production.override_endpoint_url().as_deref(),
            Some("https://storage.example.net")
        );

        env::remove_var("ENDPOINT");
    }
}
