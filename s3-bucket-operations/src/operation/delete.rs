/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_smithy_types::error::display::DisplayErrorContext;

use super::{object_key, OperationContext, OperationRequest, DELETE_FIELDS};
use crate::error::{self, Error, ErrorKind};
use crate::log::ExecutionLog;
use crate::outcome::OperationOutcome;

/// Operation struct for single object deletion
#[derive(Clone, Default, Debug)]
pub(crate) struct Delete;

impl Delete {
    /// Delete `<S3_FilePath>/<S3_FileName>`.
    ///
    /// Deleting a key that does not exist is not an error. Provider failures are logged but
    /// the outcome is still a success, and no value is produced.
    pub(crate) async fn orchestrate(
        ctx: &OperationContext<'_>,
        request: &OperationRequest,
        log: &mut ExecutionLog,
    ) -> Result<OperationOutcome, Error> {
        let [remote_path, remote_name] = request.require(DELETE_FIELDS, log)?;
        let key = object_key(remote_path, remote_name);

        log.record(format!(
            "Starting deletion of file from S3 bucket: {} with key: {key}",
            ctx.bucket()
        ));

        match ctx.store().delete_object(ctx.bucket(), &key).await {
            Ok(()) => log.record("File deletion completed successfully."),
            Err(err) => {
                let description = error::describe(&err);
                match err.kind() {
                    ErrorKind::ServiceFailure(_) => {
                        log.record(format!("AWS S3 error during file deletion: {description}"))
                    }
                    _ => log.record(format!("General error during file deletion: {description}")),
                }
                tracing::warn!(key, error = %DisplayErrorContext(&err), "object deletion failed");
            }
        }

        Ok(OperationOutcome::success("File deleted successfully."))
    }
}

#[cfg(test)]
mod tests {
    use super::Delete;
    use crate::config::BucketConfig;
    use crate::log::ExecutionLog;
    use crate::operation::{Operation, OperationContext, OperationRequest};
    use crate::outcome::OutcomeKind;
    use crate::storage::{InMemoryStore, S3Store};
    use crate::Config;
    use aws_sdk_s3::error::ErrorMetadata;
    use aws_sdk_s3::operation::delete_object::DeleteObjectError;
    use aws_smithy_mocks_experimental::{mock, mock_client};

    fn request() -> OperationRequest {
        let mut request = OperationRequest::new(Operation::Delete);
        request.remote_path = Some("data".to_owned());
        request.remote_name = Some("a.txt".to_owned());
        request
    }

    #[tokio::test]
    async fn test_delete_removes_object() {
        let store = InMemoryStore::new();
        store.insert("test-bucket", "data/a.txt", "hello").await;
        let bucket = BucketConfig::new("test-bucket", "us-east-1", "AKID", "secret");
        let config = Config::default();
        let ctx = OperationContext::new(&store, &bucket, &config);
        let mut log = ExecutionLog::default();

        let outcome = Delete::orchestrate(&ctx, &request(), &mut log)
            .await
            .unwrap();

        assert_eq!(OutcomeKind::Success, outcome.kind());
        assert_eq!(None, outcome.produced_value());
        assert_eq!(None, store.object("test-bucket", "data/a.txt").await);
    }

    #[tokio::test]
    async fn test_delete_missing_key_succeeds() {
        let store = InMemoryStore::new();
        let bucket = BucketConfig::new("test-bucket", "us-east-1", "AKID", "secret");
        let config = Config::default();
        let ctx = OperationContext::new(&store, &bucket, &config);
        let mut log = ExecutionLog::default();

        let outcome = Delete::orchestrate(&ctx, &request(), &mut log)
            .await
            .unwrap();
        assert_eq!(OutcomeKind::Success, outcome.kind());
    }

    #[tokio::test]
    async fn test_provider_error_is_logged_not_reported() {
        let rule = mock!(aws_sdk_s3::Client::delete_object).then_error(|| {
            DeleteObjectError::generic(ErrorMetadata::builder().code("AccessDenied").build())
        });
        let store = S3Store::new(mock_client!(aws_sdk_s3, &[&rule]));
        let bucket = BucketConfig::new("test-bucket", "us-east-1", "AKID", "secret");
        let config = Config::default();
        let ctx = OperationContext::new(&store, &bucket, &config);
        let mut log = ExecutionLog::default();

        let outcome = Delete::orchestrate(&ctx, &request(), &mut log)
            .await
            .unwrap();

        assert_eq!(OutcomeKind::Success, outcome.kind());
        assert!(log
            .entries()
            .iter()
            .any(|e| e.text()
                .starts_with("AWS S3 error during file deletion: service failure (AccessDenied)")));
    }

    #[tokio::test]
    async fn test_missing_fields_fail_validation() {
        let store = InMemoryStore::new();
        let bucket = BucketConfig::new("test-bucket", "us-east-1", "AKID", "secret");
        let config = Config::default();
        let ctx = OperationContext::new(&store, &bucket, &config);
        let mut log = ExecutionLog::default();

        let err = Delete::orchestrate(&ctx, &OperationRequest::new(Operation::Delete), &mut log)
            .await
            .unwrap_err();
        assert_eq!(&crate::error::ErrorKind::ValidationFailure, err.kind());
        assert_eq!(2, log.len());
    }
}
