/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/* Automatically managed default lints */
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
/* End of automatically managed default lints */
#![warn(
    missing_debug_implementations,
    missing_docs,
    rustdoc::missing_crate_level_docs,
    unreachable_pub,
    rust_2018_idioms
)]

//! Parameter-driven Amazon S3 bucket operations for test-automation engines.
//!
//! A host engine hands an [`Executor`] the parameters of one test step. The executor
//! resolves the bucket configuration and the requested operation, builds an authenticated
//! S3 client, runs exactly one operation and returns an [`ActionResult`](result::ActionResult)
//! carrying a pass/fail status together with the full execution log.
//!
//! Supported operations:
//!
//! * `Upload File` - upload a local file to `<S3_FilePath>/<S3_FileName>`
//! * `Download File` - download an object to a local path
//! * `List Files` - list the objects under an optional prefix
//! * `Delete File` - delete an object
//! * `Check File Exists` - check whether an object exists
//! * `Generate Pre-Signed URL` - issue a time-bounded GET URL for an object
//!
//! # Examples
//!
//! ```no_run
//! use s3_bucket_operations::buffer::InMemoryBuffers;
//! use s3_bucket_operations::params::{Parameter, ParameterTree};
//!
//! # async fn example() {
//! let executor = s3_bucket_operations::Executor::new(s3_bucket_operations::from_env().load());
//!
//! let params = ParameterTree::new()
//!     .with("Operation", Parameter::new("List Files"))
//!     .with("S3Bucket_Name", Parameter::new("my-bucket"))
//!     .with("S3Bucket_Region", Parameter::new("us-west-2"))
//!     .with("S3Bucket_AccessKey", Parameter::new("AKIDEXAMPLE"))
//!     .with("S3Bucket_SecretAccess", Parameter::new("secret"))
//!     .with("S3_FilePath", Parameter::new("reports"));
//!
//! let buffers = InMemoryBuffers::default();
//! let result = executor.execute(&params, &buffers).await;
//! println!("{result}");
//! # }
//! ```

/// Error types emitted by `s3-bucket-operations`
pub mod error;

/// Per-invocation execution log
pub mod log;

/// Buffer store used to pass values between test steps
pub mod buffer;

/// Host parameter tree
pub mod params;

/// Bucket and executor configuration
pub mod config;

/// Storage service boundary
pub mod storage;

/// Storage client factory
pub mod client;

/// Parameter resolution
pub mod resolve;

/// Bucket operations and the operation dispatcher
pub mod operation;

/// Operation outcomes
pub mod outcome;

/// Caller-visible results
pub mod result;

/// Invocation entry point
pub mod executor;

use self::config::loader::ConfigLoader;
pub use self::config::Config;
pub use self::executor::Executor;

/// Create a config loader that reads overrides from the environment
pub fn from_env() -> ConfigLoader {
    ConfigLoader::default()
}
