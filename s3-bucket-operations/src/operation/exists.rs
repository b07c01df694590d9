/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_smithy_types::date_time::Format;

use super::{failed, object_key, OperationContext, OperationRequest, EXISTS_FIELDS};
use crate::error::Error;
use crate::log::ExecutionLog;
use crate::outcome::OperationOutcome;
use crate::storage::ObjectMetadata;

const EXISTS: &str = "true";
const ABSENT: &str = "false";

/// Operation struct for checking whether an object exists
#[derive(Clone, Default, Debug)]
pub(crate) struct Exists;

impl Exists {
    /// Check whether `<S3_FilePath>/<S3_FileName>` exists.
    ///
    /// The produced value is `"true"` or `"false"`. An absent object is a successful outcome;
    /// only other provider or local errors fail.
    pub(crate) async fn orchestrate(
        ctx: &OperationContext<'_>,
        request: &OperationRequest,
        log: &mut ExecutionLog,
    ) -> Result<OperationOutcome, Error> {
        let [remote_path, remote_name, _output] = request.require(EXISTS_FIELDS, log)?;
        let key = object_key(remote_path, remote_name);

        log.record(format!(
            "Checking existence of file in S3 bucket: {} with key: {key}",
            ctx.bucket()
        ));

        match ctx.store().head_object(ctx.bucket(), &key).await {
            Ok(metadata) => {
                log.record(describe(&metadata));
                Ok(OperationOutcome::success(format!("File exists. S3 Path: {key}"))
                    .with_produced_value(EXISTS))
            }
            Err(err) if err.is_not_found() => {
                log.record("File does not exist.");
                Ok(
                    OperationOutcome::success(format!("File does not exist. S3 Path: {key}"))
                        .with_produced_value(ABSENT),
                )
            }
            Err(err) => Ok(failed(
                log,
                "file existence check",
                format!("Error during file existence check. S3 Path: {key}"),
                err,
            )),
        }
    }
}

fn describe(metadata: &ObjectMetadata) -> String {
    let mut line = String::from("File exists.");
    if let Some(ts) = metadata
        .last_modified
        .and_then(|ts| ts.fmt(Format::DateTime).ok())
    {
        line.push_str(&format!(" Last modified: {ts}."));
    }
    if let Some(size) = metadata.size {
        line.push_str(&format!(" Size: {size} bytes."));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::Exists;
    use crate::config::BucketConfig;
    use crate::log::ExecutionLog;
    use crate::operation::{Operation, OperationContext, OperationRequest, OutputSlot};
    use crate::outcome::OutcomeKind;
    use crate::params::ActionMode;
    use crate::storage::{InMemoryStore, ObjectStore, S3Store};
    use crate::Config;
    use aws_sdk_s3::error::ErrorMetadata;
    use aws_sdk_s3::operation::head_object::{HeadObjectError, HeadObjectOutput};
    use aws_sdk_s3::primitives::DateTime;
    use aws_smithy_mocks_experimental::{mock, mock_client};

    fn request() -> OperationRequest {
        let mut request = OperationRequest::new(Operation::Exists);
        request.remote_path = Some("data".to_owned());
        request.remote_name = Some("a.txt".to_owned());
        request.output = Some(OutputSlot::new("exists", ActionMode::Buffer));
        request
    }

    async fn check(store: &dyn ObjectStore) -> (OutcomeKind, Option<String>, ExecutionLog) {
        let bucket = BucketConfig::new("test-bucket", "us-east-1", "AKID", "secret");
        let config = Config::default();
        let ctx = OperationContext::new(store, &bucket, &config);
        let mut log = ExecutionLog::default();

        let outcome = Exists::orchestrate(&ctx, &request(), &mut log)
            .await
            .unwrap();
        (
            outcome.kind(),
            outcome.produced_value().map(str::to_owned),
            log,
        )
    }

    #[tokio::test]
    async fn test_existing_object() {
        let store = InMemoryStore::new();
        store.insert("test-bucket", "data/a.txt", "hello").await;

        let (kind, value, _) = check(&store).await;
        assert_eq!(OutcomeKind::Success, kind);
        assert_eq!(Some("true".to_owned()), value);
    }

    #[tokio::test]
    async fn test_absent_object_is_success_false() {
        let store = InMemoryStore::new();

        let (kind, value, _) = check(&store).await;
        assert_eq!(OutcomeKind::Success, kind);
        assert_eq!(Some("false".to_owned()), value);
    }

    #[tokio::test]
    async fn test_head_metadata_is_logged() {
        let rule = mock!(aws_sdk_s3::Client::head_object).then_output(|| {
            HeadObjectOutput::builder()
                .content_length(5)
                .last_modified(DateTime::from_secs(1_704_164_645))
                .build()
        });
        let store = S3Store::new(mock_client!(aws_sdk_s3, &[&rule]));

        let (kind, value, log) = check(&store).await;
        assert_eq!(OutcomeKind::Success, kind);
        assert_eq!(Some("true".to_owned()), value);
        assert!(log.entries().iter().any(|e| e.text()
            == "File exists. Last modified: 2024-01-02T03:04:05Z. Size: 5 bytes."));
    }

    #[tokio::test]
    async fn test_provider_not_found_is_success_false() {
        let rule = mock!(aws_sdk_s3::Client::head_object).then_error(|| {
            HeadObjectError::generic(ErrorMetadata::builder().code("NotFound").build())
        });
        let store = S3Store::new(mock_client!(aws_sdk_s3, &[&rule]));

        let (kind, value, _) = check(&store).await;
        assert_eq!(OutcomeKind::Success, kind);
        assert_eq!(Some("false".to_owned()), value);
    }

    #[tokio::test]
    async fn test_other_provider_error_fails() {
        let rule = mock!(aws_sdk_s3::Client::head_object).then_error(|| {
            HeadObjectError::generic(ErrorMetadata::builder().code("AccessDenied").build())
        });
        let store = S3Store::new(mock_client!(aws_sdk_s3, &[&rule]));

        let (kind, value, _) = check(&store).await;
        assert_eq!(OutcomeKind::ServiceFailure, kind);
        assert_eq!(None, value);
    }
}
