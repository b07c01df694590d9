/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::config::Credentials;
use aws_types::SdkConfig;

use crate::config::BucketConfig;
use crate::error::{self, Error};
use crate::storage::{ObjectStore, S3Store};
use crate::Config;

/// Name reported by the static credentials built from bucket parameters
const CREDENTIALS_PROVIDER_NAME: &str = "s3-bucket-operations";

/// Builds the storage client an invocation runs against.
///
/// Construction must not contact the storage service: bad credentials only surface when
/// the first storage call is made.
#[async_trait]
pub trait ClientFactory: Send + Sync + fmt::Debug {
    /// Create a client for `bucket`
    async fn create(
        &self,
        bucket: &BucketConfig,
        config: &Config,
    ) -> Result<Arc<dyn ObjectStore>, Error>;
}

/// Default [`ClientFactory`] creating an [`S3Store`] with static credentials
#[derive(Debug, Clone, Default)]
pub struct SdkClientFactory {
    _private: (),
}

impl SdkClientFactory {
    /// Create a new factory
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClientFactory for SdkClientFactory {
    async fn create(
        &self,
        bucket: &BucketConfig,
        config: &Config,
    ) -> Result<Arc<dyn ObjectStore>, Error> {
        let region = resolve_region(bucket.region(), config.endpoint_url().is_some())?;
        let credentials = Credentials::new(
            bucket.access_key(),
            bucket.secret_key(),
            None,
            None,
            CREDENTIALS_PROVIDER_NAME,
        );

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .credentials_provider(credentials);
        if let Some(endpoint_url) = config.endpoint_url() {
            loader = loader.endpoint_url(endpoint_url);
        }
        let shared_config: SdkConfig = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&shared_config)
            .force_path_style(config.force_path_style())
            .build();

        Ok(Arc::new(S3Store::new(aws_sdk_s3::Client::from_conf(
            s3_config,
        ))))
    }
}

/// [`ClientFactory`] that hands out one pre-built store, whatever the bucket parameters
#[derive(Debug, Clone)]
pub struct StaticClientFactory {
    store: Arc<dyn ObjectStore>,
}

impl StaticClientFactory {
    /// Always return `store`
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ClientFactory for StaticClientFactory {
    async fn create(
        &self,
        _bucket: &BucketConfig,
        _config: &Config,
    ) -> Result<Arc<dyn ObjectStore>, Error> {
        Ok(self.store.clone())
    }
}

/// Check a region identifier against the AWS naming scheme.
///
/// Accepted: `<area>-<direction>-<number>` with an optional partition infix and an area of
/// two to four letters, e.g. `us-east-1`, `us-gov-west-1`, `us-isob-east-1`,
/// `eusc-de-east-1`. When a custom endpoint is configured any name made of lowercase letters,
/// digits and dashes is accepted.
pub(crate) fn resolve_region(name: &str, custom_endpoint: bool) -> Result<Region, Error> {
    let valid = if custom_endpoint {
        !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    } else {
        is_aws_region(name)
    };

    if valid {
        Ok(Region::new(name.to_owned()))
    } else {
        Err(error::client_failure(format!(
            "unrecognized region identifier: {name:?}"
        )))
    }
}

fn is_aws_region(name: &str) -> bool {
    let parts: Vec<&str> = name.split('-').collect();
    let (area, middle, number) = match parts.as_slice() {
        [area, rest @ .., number] if (1..=2).contains(&rest.len()) => (*area, rest, *number),
        _ => return false,
    };

    (2..=4).contains(&area.len())
        && area.chars().all(|c| c.is_ascii_lowercase())
        && middle
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_lowercase()))
        && (1..=2).contains(&number.len())
        && number.chars().all(|c| c.is_ascii_digit())
}
