/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! In-memory implementation of the ObjectStore trait.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use aws_smithy_types::DateTime;
use bytes::Bytes;
use tokio::sync::RwLock;

use super::{ObjectMetadata, ObjectStore, ObjectSummary};
use crate::error::{self, Error};

#[derive(Debug, Clone)]
struct StoredObject {
    data: Bytes,
    last_modified: DateTime,
}

/// An in-memory implementation of the [`ObjectStore`] trait.
///
/// Objects of every bucket live in one ordered map, so listings come back in key order like
/// `ListObjectsV2`. Missing objects fail the same way S3 does: `NoSuchKey` for reads,
/// `NotFound` for metadata requests. Deleting a missing object succeeds.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    // (bucket, key) -> object
    objects: RwLock<BTreeMap<(String, String), StoredObject>>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object directly, bypassing the local filesystem
    pub async fn insert(&self, bucket: &str, key: &str, data: impl Into<Bytes>) {
        let mut objects = self.objects.write().await;
        objects.insert(
            (bucket.to_owned(), key.to_owned()),
            StoredObject {
                data: data.into(),
                last_modified: DateTime::from(SystemTime::now()),
            },
        );
    }

    /// Contents of an object, if present
    pub async fn object(&self, bucket: &str, key: &str) -> Option<Bytes> {
        let objects = self.objects.read().await;
        objects
            .get(&(bucket.to_owned(), key.to_owned()))
            .map(|obj| obj.data.clone())
    }

    async fn read(&self, bucket: &str, key: &str, missing_code: &str) -> Result<StoredObject, Error> {
        let objects = self.objects.read().await;
        objects
            .get(&(bucket.to_owned(), key.to_owned()))
            .cloned()
            .ok_or_else(|| {
                error::service_failure(
                    missing_code,
                    format!("the specified key does not exist: s3://{bucket}/{key}"),
                )
            })
    }
}

#[async_trait]
impl ObjectStore for InMemoryStore {
    async fn put_object(&self, bucket: &str, key: &str, source: &Path) -> Result<u64, Error> {
        let data = tokio::fs::read(source).await?;
        let len = data.len() as u64;
        self.insert(bucket, key, data).await;
        Ok(len)
    }

    async fn get_object(
        &self,
        bucket: &str,
        key: &str,
        destination: &Path,
    ) -> Result<u64, Error> {
        let object = self.read(bucket, key, "NoSuchKey").await?;
        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(destination, &object.data).await?;
        Ok(object.data.len() as u64)
    }

    async fn list_objects(
        &self,
        bucket: &str,
        prefix: Option<&str>,
    ) -> Result<Vec<ObjectSummary>, Error> {
        let prefix = prefix.unwrap_or_default();
        let objects = self.objects.read().await;
        Ok(objects
            .iter()
            .filter(|((b, k), _)| b == bucket && k.starts_with(prefix))
            .map(|((_, key), obj)| ObjectSummary {
                key: key.clone(),
                size: obj.data.len() as u64,
            })
            .collect())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), Error> {
        let mut objects = self.objects.write().await;
        objects.remove(&(bucket.to_owned(), key.to_owned()));
        Ok(())
    }

    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectMetadata, Error> {
        let object = self.read(bucket, key, "NotFound").await?;
        Ok(ObjectMetadata {
            size: Some(object.data.len() as u64),
            last_modified: Some(object.last_modified),
            e_tag: None,
        })
    }

    async fn presign_get_object(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, Error> {
        Ok(format!(
            "memory://{bucket}/{key}?X-Amz-Expires={}",
            expires_in.as_secs()
        ))
    }
}
