/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::path::{Path, PathBuf};

use super::{
    failed, local_file, object_key, Field, OperationContext, OperationRequest, DOWNLOAD_FIELDS,
    KEY_SEPARATOR,
};
use crate::error::Error;
use crate::log::ExecutionLog;
use crate::outcome::OperationOutcome;

/// Operation struct for single object download
#[derive(Clone, Default, Debug)]
pub(crate) struct Download;

impl Download {
    /// Download `<S3_FilePath>/<S3_FileName>` to a local file.
    ///
    /// The produced value is the local path written.
    pub(crate) async fn orchestrate(
        ctx: &OperationContext<'_>,
        request: &OperationRequest,
        log: &mut ExecutionLog,
    ) -> Result<OperationOutcome, Error> {
        let [remote_path, remote_name, local_path] = request.require(DOWNLOAD_FIELDS, log)?;
        let key = object_key(remote_path, remote_name);
        let destination = destination(
            local_path,
            request.field(Field::LocalFileName),
            remote_name,
        )
        .await;

        log.record(format!(
            "Starting download of file from S3 bucket: {} with key: {key} to local path: {}",
            ctx.bucket(),
            destination.display()
        ));

        match ctx
            .store()
            .get_object(ctx.bucket(), &key, &destination)
            .await
        {
            Ok(written) => {
                log.record(format!(
                    "Download completed successfully ({written} bytes)."
                ));
                let local = destination.display().to_string();
                Ok(OperationOutcome::success(format!(
                    "File downloaded successfully. Local Path: {local}"
                ))
                .with_produced_value(local))
            }
            Err(err) => Ok(failed(
                log,
                "download",
                format!("Error during download. S3 Path: {key}"),
                err,
            )),
        }
    }
}

/// Resolve the local file to write.
///
/// `LocalFilePath/LocalFileName` when a local name is given, `LocalFilePath/<object name>`
/// when `LocalFilePath` is an existing directory, otherwise `LocalFilePath` itself.
async fn destination(local_path: &str, local_name: Option<&str>, remote_name: &str) -> PathBuf {
    if let Some(name) = local_name {
        return local_file(local_path, name);
    }

    let is_dir = tokio::fs::metadata(local_path)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false);

    if is_dir {
        let file_name = remote_name
            .rsplit(KEY_SEPARATOR)
            .find(|segment| !segment.is_empty())
            .unwrap_or(remote_name);
        local_file(local_path, file_name)
    } else {
        path_clean::clean(Path::new(local_path))
    }
}
