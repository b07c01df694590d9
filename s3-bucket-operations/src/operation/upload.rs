/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use super::{failed, local_file, object_key, OperationContext, OperationRequest, UPLOAD_FIELDS};
use crate::error::Error;
use crate::log::ExecutionLog;
use crate::outcome::OperationOutcome;

/// Operation struct for single file upload
#[derive(Clone, Default, Debug)]
pub(crate) struct Upload;

impl Upload {
    /// Upload `<LocalFilePath>/<LocalFileName>` to `<S3_FilePath>/<S3_FileName>`.
    ///
    /// The produced value is the object key.
    pub(crate) async fn orchestrate(
        ctx: &OperationContext<'_>,
        request: &OperationRequest,
        log: &mut ExecutionLog,
    ) -> Result<OperationOutcome, Error> {
        let [local_path, local_name, remote_path, remote_name] =
            request.require(UPLOAD_FIELDS, log)?;
        let source = local_file(local_path, local_name);
        let key = object_key(remote_path, remote_name);

        log.record(format!(
            "Starting upload of file: {} to S3 bucket: {} with key: {key}",
            source.display(),
            ctx.bucket()
        ));

        match ctx.store().put_object(ctx.bucket(), &key, &source).await {
            Ok(content_length) => {
                log.record(format!(
                    "Upload completed successfully ({content_length} bytes)."
                ));
                Ok(
                    OperationOutcome::success(format!(
                        "File uploaded to S3 successfully. S3 Path: {key}"
                    ))
                    .with_produced_value(key),
                )
            }
            Err(err) => Ok(failed(
                log,
                "upload",
                format!("Error during upload. S3 Path: {key}"),
                err,
            )),
        }
    }
}
