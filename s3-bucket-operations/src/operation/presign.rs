/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use super::{failed, object_key, OperationContext, OperationRequest, PRESIGN_FIELDS};
use crate::error::Error;
use crate::log::ExecutionLog;
use crate::outcome::OperationOutcome;

/// Operation struct for issuing a pre-signed GET URL
#[derive(Clone, Default, Debug)]
pub(crate) struct Presign;

impl Presign {
    /// Generate a time-bounded GET URL for `<S3_FilePath>/<S3_FileName>`.
    ///
    /// Validity comes from [`Config::presign_expiry`](crate::Config::presign_expiry). The
    /// produced value is the URL.
    pub(crate) async fn orchestrate(
        ctx: &OperationContext<'_>,
        request: &OperationRequest,
        log: &mut ExecutionLog,
    ) -> Result<OperationOutcome, Error> {
        let [remote_path, remote_name] = request.require(PRESIGN_FIELDS, log)?;
        let key = object_key(remote_path, remote_name);
        let expires_in = ctx.config().presign_expiry();

        log.record(format!(
            "Generating pre-signed URL for file in S3 bucket: {} with key: {key} (valid for {} seconds)",
            ctx.bucket(),
            expires_in.as_secs()
        ));

        match ctx
            .store()
            .presign_get_object(ctx.bucket(), &key, expires_in)
            .await
        {
            Ok(url) => {
                log.record("Pre-signed URL generated successfully.");
                Ok(
                    OperationOutcome::success(format!("Pre-signed URL generated: {url}"))
                        .with_produced_value(url),
                )
            }
            Err(err) => Ok(failed(
                log,
                "pre-signed URL generation",
                format!("Error during pre-signed URL generation. S3 Path: {key}"),
                err,
            )),
        }
    }
}
