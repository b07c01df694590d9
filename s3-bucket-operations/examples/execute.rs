/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use s3_bucket_operations::buffer::{Buffers, InMemoryBuffers};
use s3_bucket_operations::client::StaticClientFactory;
use s3_bucket_operations::params::{self, ActionMode, Parameter, ParameterTree};
use s3_bucket_operations::storage::InMemoryStore;
use s3_bucket_operations::Executor;

#[derive(Debug, Clone, clap::Parser)]
#[command(name = "execute")]
#[command(about = "Runs one S3 bucket operation the way a test step would.")]
pub struct Args {
    /// Operation to run, e.g. "Upload File" or "List Files"
    #[arg(required = true)]
    operation: String,

    /// Bucket name
    #[arg(long)]
    bucket: Option<String>,

    /// Bucket region, e.g. us-west-2
    #[arg(long)]
    region: Option<String>,

    /// Access key id
    #[arg(long, env = "AWS_ACCESS_KEY_ID")]
    access_key: Option<String>,

    /// Secret access key
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    secret_key: Option<String>,

    /// Local directory (or destination file for downloads)
    #[arg(long)]
    local_path: Option<String>,

    /// Local file name
    #[arg(long)]
    local_name: Option<String>,

    /// Remote path (key prefix)
    #[arg(long)]
    remote_path: Option<String>,

    /// Remote object name
    #[arg(long)]
    remote_name: Option<String>,

    /// Buffer that receives (or verifies) the produced value
    #[arg(long)]
    output: Option<String>,

    /// How the output buffer is treated
    #[arg(long, value_enum, default_value_t = OutputMode::Buffer)]
    output_mode: OutputMode,

    /// Custom endpoint for S3-compatible services
    #[arg(long)]
    endpoint_url: Option<String>,

    /// Run against an empty in-memory store instead of Amazon S3
    #[arg(long, default_value_t = false, action = clap::ArgAction::SetTrue)]
    in_memory: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputMode {
    Input,
    Buffer,
    Verify,
}

impl From<OutputMode> for ActionMode {
    fn from(mode: OutputMode) -> Self {
        match mode {
            OutputMode::Input => ActionMode::Input,
            OutputMode::Buffer => ActionMode::Buffer,
            OutputMode::Verify => ActionMode::Verify,
        }
    }
}

impl Args {
    fn parameters(&self) -> ParameterTree {
        let mut tree = ParameterTree::new().with(params::OPERATION, Parameter::new(&self.operation));
        let optional = [
            (params::BUCKET_NAME, &self.bucket),
            (params::BUCKET_REGION, &self.region),
            (params::BUCKET_ACCESS_KEY, &self.access_key),
            (params::BUCKET_SECRET_ACCESS, &self.secret_key),
            (params::LOCAL_FILE_PATH, &self.local_path),
            (params::LOCAL_FILE_NAME, &self.local_name),
            (params::S3_FILE_PATH, &self.remote_path),
            (params::S3_FILE_NAME, &self.remote_name),
        ];
        for (name, value) in optional {
            if let Some(value) = value {
                tree.insert(name, Parameter::new(value));
            }
        }
        if let Some(output) = &self.output {
            tree.insert(
                params::OUTPUT,
                Parameter::new(output).with_action_mode(self.output_mode.into()),
            );
        }
        tree
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut loader = s3_bucket_operations::from_env();
    if let Some(endpoint_url) = &args.endpoint_url {
        loader = loader.endpoint_url(endpoint_url);
    }
    if args.in_memory {
        loader = loader.client_factory(StaticClientFactory::new(Arc::new(InMemoryStore::new())));
    }
    let executor = Executor::new(loader.load());

    let buffers = InMemoryBuffers::new();
    let result = executor.execute(&args.parameters(), &buffers).await;
    println!("{result}");

    if let Some(output) = &args.output {
        tracing::info!(buffer = output, value = ?buffers.get(output), "buffer state");
    }

    if result.is_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
