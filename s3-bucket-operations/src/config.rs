/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use aws_smithy_async::time::{SharedTimeSource, TimeSource};

use crate::client::{ClientFactory, SdkClientFactory};

/// Load [`Config`] overrides from the environment
pub mod loader;

/// Validity window of generated pre-signed URLs unless configured otherwise
pub const DEFAULT_PRESIGN_EXPIRY: Duration = Duration::from_secs(10 * 60);

/// Longest validity window SigV4 allows for a pre-signed URL
const MAX_PRESIGN_EXPIRY: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Connection details of the bucket an invocation operates on.
///
/// All four fields are required; a `BucketConfig` only exists once every one of them was
/// resolved from the caller's parameters.
#[derive(Clone, PartialEq, Eq)]
pub struct BucketConfig {
    name: String,
    region: String,
    access_key: String,
    secret_key: String,
}

impl BucketConfig {
    /// Create a bucket configuration
    pub fn new(
        name: impl Into<String>,
        region: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            region: region.into(),
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Bucket name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Region identifier, e.g. `us-west-2`
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Access key id
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// Secret access key
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }
}

impl fmt::Debug for BucketConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BucketConfig")
            .field("name", &self.name)
            .field("region", &self.region)
            .field("access_key", &self.access_key)
            .field("secret_key", &"** redacted **")
            .finish()
    }
}

/// Configuration for an [`Executor`](crate::Executor)
#[derive(Debug, Clone)]
pub struct Config {
    presign_expiry: Duration,
    endpoint_url: Option<String>,
    force_path_style: bool,
    client_factory: Arc<dyn ClientFactory>,
    time_source: SharedTimeSource,
}

impl Config {
    /// Create a new `Config` builder
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Validity window of generated pre-signed URLs
    pub fn presign_expiry(&self) -> Duration {
        self.presign_expiry
    }

    /// Endpoint override for S3-compatible services, if any
    pub fn endpoint_url(&self) -> Option<&str> {
        self.endpoint_url.as_deref()
    }

    /// Whether to address buckets path-style (`endpoint/bucket/key`)
    pub fn force_path_style(&self) -> bool {
        self.force_path_style
    }

    /// The factory used to build a storage client for each invocation
    pub fn client_factory(&self) -> &Arc<dyn ClientFactory> {
        &self.client_factory
    }

    /// Clock used to stamp execution log entries
    pub fn time_source(&self) -> &SharedTimeSource {
        &self.time_source
    }
}

impl Default for Config {
    fn default() -> Self {
        Builder::default().build()
    }
}

/// Fluent style builder for [Config]
#[derive(Debug, Clone, Default)]
pub struct Builder {
    presign_expiry: Option<Duration>,
    endpoint_url: Option<String>,
    force_path_style: Option<bool>,
    client_factory: Option<Arc<dyn ClientFactory>>,
    time_source: Option<SharedTimeSource>,
}

impl Builder {
    /// Validity window of generated pre-signed URLs.
    ///
    /// Values above seven days are clamped to seven days.
    /// Default is [`DEFAULT_PRESIGN_EXPIRY`] (10 minutes).
    pub fn presign_expiry(mut self, expiry: Duration) -> Self {
        self.presign_expiry = Some(expiry.min(MAX_PRESIGN_EXPIRY));
        self
    }

    /// Send requests to this endpoint instead of the regional AWS endpoint.
    ///
    /// Any region name is accepted when an endpoint override is set.
    pub fn endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Use path-style addressing. Default is false.
    pub fn force_path_style(mut self, force_path_style: bool) -> Self {
        self.force_path_style = Some(force_path_style);
        self
    }

    /// Set an explicit factory for storage clients. Default is [`SdkClientFactory`].
    pub fn client_factory(mut self, factory: impl ClientFactory + 'static) -> Self {
        self.client_factory = Some(Arc::new(factory));
        self
    }

    /// Set the clock used to stamp execution log entries
    pub fn time_source(mut self, time_source: impl TimeSource + 'static) -> Self {
        self.time_source = Some(SharedTimeSource::new(time_source));
        self
    }

    /// Fill unset fields from `other`
    pub(crate) fn or(self, other: Builder) -> Self {
        Self {
            presign_expiry: self.presign_expiry.or(other.presign_expiry),
            endpoint_url: self.endpoint_url.or(other.endpoint_url),
            force_path_style: self.force_path_style.or(other.force_path_style),
            client_factory: self.client_factory.or(other.client_factory),
            time_source: self.time_source.or(other.time_source),
        }
    }

    /// Consumes the builder and constructs a [`Config`](crate::config::Config)
    pub fn build(self) -> Config {
        Config {
            presign_expiry: self.presign_expiry.unwrap_or(DEFAULT_PRESIGN_EXPIRY),
            endpoint_url: self.endpoint_url,
            force_path_style: self.force_path_style.unwrap_or(false),
            client_factory: self
                .client_factory
                .unwrap_or_else(|| Arc::new(SdkClientFactory::new())),
            time_source: self.time_source.unwrap_or_default(),
        }
    }
}
