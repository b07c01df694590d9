/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use aws_smithy_types::DateTime;

use crate::error::Error;

/// Amazon S3 backed [`ObjectStore`]
pub mod s3;
pub use s3::S3Store;

/// In-memory [`ObjectStore`] for dry runs and tests
pub mod in_memory;
pub use in_memory::InMemoryStore;

/// An entry returned by [`ObjectStore::list_objects`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    /// Object key
    pub key: String,
    /// Object size in bytes
    pub size: u64,
}

/// Object metadata returned by [`ObjectStore::head_object`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectMetadata {
    /// Object size in bytes
    pub size: Option<u64>,
    /// Last modified timestamp
    pub last_modified: Option<DateTime>,
    /// Entity tag
    pub e_tag: Option<String>,
}

/// The storage-service calls the bucket operations are built from.
///
/// Provider rejections are reported as [`ErrorKind::ServiceFailure`](crate::error::ErrorKind::ServiceFailure);
/// a missing object is a service failure for which [`Error::is_not_found`] is true.
#[async_trait]
pub trait ObjectStore: Send + Sync + fmt::Debug {
    /// Upload the file at `source`, returning the number of bytes sent
    async fn put_object(&self, bucket: &str, key: &str, source: &Path) -> Result<u64, Error>;

    /// Download an object into `destination`, returning the number of bytes written.
    ///
    /// Missing parent directories of `destination` are created.
    async fn get_object(&self, bucket: &str, key: &str, destination: &Path)
        -> Result<u64, Error>;

    /// List every object whose key starts with `prefix` (the whole bucket when `None`),
    /// in the provider's listing order
    async fn list_objects(
        &self,
        bucket: &str,
        prefix: Option<&str>,
    ) -> Result<Vec<ObjectSummary>, Error>;

    /// Delete an object
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), Error>;

    /// Fetch object metadata without the body
    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectMetadata, Error>;

    /// Generate a pre-signed GET URL valid for `expires_in`
    async fn presign_get_object(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, Error>;
}
