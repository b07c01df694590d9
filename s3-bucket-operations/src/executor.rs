/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use crate::buffer::Buffers;
use crate::error;
use crate::log::ExecutionLog;
use crate::operation::{self, OperationContext};
use crate::outcome::OperationOutcome;
use crate::params::ParameterTree;
use crate::resolve::resolve;
use crate::result::{translate, ActionResult};
use crate::Config;

/// Runs S3 bucket operations on behalf of a host test-automation engine.
///
/// Each call to [`execute`](Executor::execute) is one invocation: it resolves the caller's
/// parameters, builds a storage client, runs exactly one operation and reports the outcome
/// together with the full execution log. Nothing is retained between invocations.
#[derive(Debug, Clone)]
pub struct Executor {
    pub(crate) handle: Arc<Handle>,
}

/// Whatever is shared by all invocations of an executor
#[derive(Debug)]
pub(crate) struct Handle {
    pub(crate) config: Config,
}

impl Executor {
    /// Creates a new executor from a config.
    pub fn new(config: Config) -> Executor {
        let handle = Arc::new(Handle { config });
        Executor { handle }
    }

    /// Returns the executor's configuration
    pub fn config(&self) -> &Config {
        &self.handle.config
    }

    /// Run the operation selected by `params`.
    ///
    /// Never fails: validation, client, provider and local errors are all reported through
    /// the returned [`ActionResult`]. `buffers` receives the produced value when the `Output`
    /// parameter is in buffer mode.
    #[tracing::instrument(skip_all, level = "debug", name = "execute")]
    pub async fn execute(&self, params: &ParameterTree, buffers: &dyn Buffers) -> ActionResult {
        let mut log = ExecutionLog::new(self.config().time_source().clone());
        log.record("Starting S3 Bucket Operations Execution...");

        let (bucket, request) = match resolve(params, &mut log) {
            Ok(resolved) => resolved,
            Err(err) => {
                tracing::debug!(error = %err, "parameter resolution failed");
                return translate(OperationOutcome::from_error(&err), None, buffers, log);
            }
        };

        log.record("Initializing Amazon S3 client...");
        let store = match self
            .config()
            .client_factory()
            .create(&bucket, self.config())
            .await
        {
            Ok(store) => store,
            Err(err) => {
                log.record(format!("Failed to initialize Amazon S3 client: {err}"));
                return translate(OperationOutcome::from_error(&err), None, buffers, log);
            }
        };
        log.record("Amazon S3 client initialized.");
        log.record(format!(
            "Executing operation: {} on bucket: {}",
            request.operation(),
            bucket.name()
        ));

        let ctx = OperationContext::new(store.as_ref(), &bucket, self.config());
        let outcome = operation::dispatch(&ctx, &request, &mut log).await;
        translate(outcome, request.output(), buffers, log)
    }

    /// Run [`execute`](Executor::execute) to completion on a fresh current-thread runtime.
    ///
    /// For hosts without an async runtime of their own. Must not be called from within a
    /// tokio runtime.
    pub fn execute_blocking(&self, params: &ParameterTree, buffers: &dyn Buffers) -> ActionResult {
        match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt.block_on(self.execute(params, buffers)),
            Err(err) => {
                let err = error::unexpected(err);
                let mut log = ExecutionLog::new(self.config().time_source().clone());
                log.record(format!("Failed to start async runtime: {err}"));
                translate(OperationOutcome::from_error(&err), None, buffers, log)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::Executor;
    use crate::buffer::InMemoryBuffers;
    use crate::client::StaticClientFactory;
    use crate::outcome::OutcomeKind;
    use crate::params::{Parameter, ParameterTree};
    use crate::result::ActionStatus;
    use crate::storage::InMemoryStore;
    use crate::Config;

    fn params(operation: &str) -> ParameterTree {
        [
            ("Operation", operation),
            ("S3Bucket_Name", "test-bucket"),
            ("S3Bucket_Region", "us-east-1"),
            ("S3Bucket_AccessKey", "AKID"),
            ("S3Bucket_SecretAccess", "secret"),
        ]
        .into_iter()
        .collect()
    }

    fn executor(store: Arc<InMemoryStore>) -> Executor {
        Executor::new(
            Config::builder()
                .client_factory(StaticClientFactory::new(store))
                .build(),
        )
    }

    #[tokio::test]
    async fn test_log_order_across_stages() {
        let executor = executor(Arc::new(InMemoryStore::new()));
        let buffers = InMemoryBuffers::new();

        let result = executor
            .execute(
                &params("Delete File")
                    .with("S3_FilePath", Parameter::new("data"))
                    .with("S3_FileName", Parameter::new("a.txt")),
                &buffers,
            )
            .await;

        assert_eq!(ActionStatus::Passed, result.status());
        let lines: Vec<_> = result
            .message()
            .lines()
            .skip(1)
            .map(|l| l.split_once(" - ").unwrap().1)
            .collect();
        assert_eq!(
            vec![
                "Starting S3 Bucket Operations Execution...",
                "Fetching operation parameters...",
                "Fetching S3 bucket configuration parameters...",
                "Initializing Amazon S3 client...",
                "Amazon S3 client initialized.",
                "Executing operation: Delete File on bucket: test-bucket",
                "Starting deletion of file from S3 bucket: test-bucket with key: data/a.txt",
                "File deletion completed successfully.",
            ],
            lines
        );
    }

    #[tokio::test]
    async fn test_validation_failure_skips_client() {
        let executor = executor(Arc::new(InMemoryStore::new()));
        let buffers = InMemoryBuffers::new();

        let result = executor
            .execute(&ParameterTree::new().with("Operation", Parameter::new("List Files")), &buffers)
            .await;

        assert_eq!(OutcomeKind::ValidationFailure, result.kind());
        assert!(!result.message().contains("Initializing Amazon S3 client"));
    }

    #[test]
    fn test_execute_blocking() {
        let store = Arc::new(InMemoryStore::new());
        let executor = executor(store);
        let buffers = InMemoryBuffers::new();

        let result = executor.execute_blocking(&params("List Files"), &buffers);
        assert!(result.is_passed());
        assert_eq!(
            Some("No Files Available at given location - s3://test-bucket/"),
            result.produced_value()
        );
    }
}
