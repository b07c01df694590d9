/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use tokio::io::AsyncWriteExt;

use super::{ObjectMetadata, ObjectStore, ObjectSummary};
use crate::error::{self, Error};

/// [`ObjectStore`] backed by an [`aws_sdk_s3::Client`]
#[derive(Debug, Clone)]
pub struct S3Store {
    client: aws_sdk_s3::Client,
}

impl S3Store {
    /// Wrap an S3 client
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }

    /// The Amazon S3 client instance used to send requests
    pub fn client(&self) -> &aws_sdk_s3::Client {
        &self.client
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put_object(&self, bucket: &str, key: &str, source: &Path) -> Result<u64, Error> {
        let content_length = tokio::fs::metadata(source).await?.len();
        let body = ByteStream::from_path(source).await?;

        tracing::trace!("sending PutObject for {content_length} bytes");
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await?;

        Ok(content_length)
    }

    async fn get_object(
        &self,
        bucket: &str,
        key: &str,
        destination: &Path,
    ) -> Result<u64, Error> {
        let resp = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await?;

        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        // the destination only ever appears complete
        let partial = partial_path(destination);
        let result = match write_body(resp.body, &partial).await {
            Ok(written) => tokio::fs::rename(&partial, destination)
                .await
                .map(|()| written)
                .map_err(Error::from),
            Err(err) => Err(err),
        };
        if result.is_err() {
            if let Err(cleanup) = tokio::fs::remove_file(&partial).await {
                tracing::debug!(
                    path = %partial.display(),
                    error = %cleanup,
                    "failed to remove partial download"
                );
            }
        }
        result
    }

    async fn list_objects(
        &self,
        bucket: &str,
        prefix: Option<&str>,
    ) -> Result<Vec<ObjectSummary>, Error> {
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .set_prefix(prefix.map(str::to_owned))
            .into_paginator()
            .send();

        let mut objects = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page?;
            objects.extend(page.contents().iter().filter_map(|obj| {
                obj.key().map(|key| ObjectSummary {
                    key: key.to_owned(),
                    size: obj.size().unwrap_or_default().max(0) as u64,
                })
            }));
        }

        Ok(objects)
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), Error> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await?;
        Ok(())
    }

    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectMetadata, Error> {
        let resp = self
            .client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await?;

        Ok(ObjectMetadata {
            size: resp.content_length().map(|len| len.max(0) as u64),
            last_modified: resp.last_modified().copied(),
            e_tag: resp.e_tag().map(str::to_owned),
        })
    }

    async fn presign_get_object(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, Error> {
        let config = PresigningConfig::expires_in(expires_in).map_err(error::unexpected)?;
        let presigned = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(config)
            .await?;

        Ok(presigned.uri().to_string())
    }
}

/// Sibling of `destination` that receives the body while it streams
fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".part");
    destination.with_file_name(name)
}

async fn write_body(mut body: ByteStream, path: &Path) -> Result<u64, Error> {
    let mut file = tokio::fs::File::create(path).await?;
    let mut written = 0;
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(error::response_stream_failure)?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}
