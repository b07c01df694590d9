/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::time::Duration;

use aws_smithy_async::time::TimeSource;
use aws_types::os_shim_internal::Env;

use crate::client::ClientFactory;
use crate::config::Builder;
use crate::Config;

const ENDPOINT_URL: &str = "S3_OPERATIONS_ENDPOINT_URL";
const FORCE_PATH_STYLE: &str = "S3_OPERATIONS_FORCE_PATH_STYLE";
const PRESIGN_EXPIRY_SECS: &str = "S3_OPERATIONS_PRESIGN_EXPIRY_SECS";

/// Load executor [`Config`] from the environment.
///
/// Recognized variables:
///
/// * `S3_OPERATIONS_ENDPOINT_URL` - endpoint override for S3-compatible services
/// * `S3_OPERATIONS_FORCE_PATH_STYLE` - `true`/`false`
/// * `S3_OPERATIONS_PRESIGN_EXPIRY_SECS` - pre-signed URL validity in seconds
///
/// Values set explicitly on the loader take precedence over the environment.
#[derive(Debug)]
pub struct ConfigLoader {
    builder: Builder,
    env: Env,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            builder: Builder::default(),
            env: Env::real(),
        }
    }
}

impl ConfigLoader {
    /// Validity window of generated pre-signed URLs
    pub fn presign_expiry(mut self, expiry: Duration) -> Self {
        self.builder = self.builder.presign_expiry(expiry);
        self
    }

    /// Endpoint override for S3-compatible services
    pub fn endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.builder = self.builder.endpoint_url(endpoint_url);
        self
    }

    /// Use path-style addressing
    pub fn force_path_style(mut self, force_path_style: bool) -> Self {
        self.builder = self.builder.force_path_style(force_path_style);
        self
    }

    /// Set an explicit factory for storage clients
    pub fn client_factory(mut self, factory: impl ClientFactory + 'static) -> Self {
        self.builder = self.builder.client_factory(factory);
        self
    }

    /// Set the clock used to stamp execution log entries
    pub fn time_source(mut self, time_source: impl TimeSource + 'static) -> Self {
        self.builder = self.builder.time_source(time_source);
        self
    }

    #[cfg(test)]
    fn env(mut self, env: Env) -> Self {
        self.env = env;
        self
    }

    /// Load the configuration
    ///
    /// If fields have been overridden during builder construction, the override values will be
    /// used. Otherwise, values from the environment are used, falling back to defaults.
    /// Malformed environment values are ignored with a warning.
    pub fn load(self) -> Config {
        let mut from_env = Builder::default();

        if let Ok(url) = self.env.get(ENDPOINT_URL) {
            if !url.trim().is_empty() {
                from_env = from_env.endpoint_url(url.trim());
            }
        }

        if let Ok(value) = self.env.get(FORCE_PATH_STYLE) {
            match value.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => from_env = from_env.force_path_style(true),
                "false" | "0" => from_env = from_env.force_path_style(false),
                _ => tracing::warn!("ignoring {FORCE_PATH_STYLE}={value:?}: expected true or false"),
            }
        }

        if let Ok(value) = self.env.get(PRESIGN_EXPIRY_SECS) {
            match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => {
                    from_env = from_env.presign_expiry(Duration::from_secs(secs))
                }
                _ => tracing::warn!(
                    "ignoring {PRESIGN_EXPIRY_SECS}={value:?}: expected a positive number of seconds"
                ),
            }
        }

        self.builder.or(from_env).build()
    }
}

#[cfg(test)]
mod tests {
    use super::ConfigLoader;
    use aws_types::os_shim_internal::Env;
    use std::time::Duration;

    #[test]
    fn test_load_from_env() {
        let env = Env::from_slice(&[
            ("S3_OPERATIONS_ENDPOINT_URL", "http://localhost:9000"),
            ("S3_OPERATIONS_FORCE_PATH_STYLE", "TRUE"),
            ("S3_OPERATIONS_PRESIGN_EXPIRY_SECS", "120"),
        ]);
        let config = ConfigLoader::default().env(env).load();

        assert_eq!(Some("http://localhost:9000"), config.endpoint_url());
        assert!(config.force_path_style());
        assert_eq!(Duration::from_secs(120), config.presign_expiry());
    }

    #[test]
    fn test_explicit_values_win_over_env() {
        let env = Env::from_slice(&[
            ("S3_OPERATIONS_ENDPOINT_URL", "http://localhost:9000"),
            ("S3_OPERATIONS_PRESIGN_EXPIRY_SECS", "120"),
        ]);
        let config = ConfigLoader::default()
            .env(env)
            .endpoint_url("http://minio:9000")
            .presign_expiry(Duration::from_secs(30))
            .load();

        assert_eq!(Some("http://minio:9000"), config.endpoint_url());
        assert_eq!(Duration::from_secs(30), config.presign_expiry());
    }

    #[test]
    fn test_malformed_env_values_are_ignored() {
        let env = Env::from_slice(&[
            ("S3_OPERATIONS_FORCE_PATH_STYLE", "sometimes"),
            ("S3_OPERATIONS_PRESIGN_EXPIRY_SECS", "ten minutes"),
        ]);
        let config = ConfigLoader::default().env(env).load();

        assert!(!config.force_path_style());
        assert_eq!(
            crate::config::DEFAULT_PRESIGN_EXPIRY,
            config.presign_expiry()
        );
    }
}
