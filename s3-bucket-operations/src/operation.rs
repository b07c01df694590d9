/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use aws_smithy_types::error::display::DisplayErrorContext;

use crate::config::BucketConfig;
use crate::error::{self, Error, ErrorKind};
use crate::log::ExecutionLog;
use crate::outcome::OperationOutcome;
use crate::params::{self, ActionMode};
use crate::storage::ObjectStore;
use crate::Config;

/// Upload a local file
pub mod upload;

/// Download an object to a local file
pub mod download;

/// List objects under a prefix
pub mod list;

/// Delete an object
pub mod delete;

/// Check whether an object exists
pub mod exists;

/// Issue a pre-signed GET URL
pub mod presign;

/// Separator used to join remote path and name into a key
pub const KEY_SEPARATOR: char = '/';

/// The operations an invocation can run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `Upload File`
    Upload,
    /// `Download File`
    Download,
    /// `List Files`
    List,
    /// `Delete File`
    Delete,
    /// `Check File Exists`
    Exists,
    /// `Generate Pre-Signed URL`
    Presign,
}

/// An operation-specific field of an [`OperationRequest`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    /// `LocalFilePath`
    LocalFilePath,
    /// `LocalFileName`
    LocalFileName,
    /// `S3_FilePath`
    RemotePath,
    /// `S3_FileName`
    RemoteName,
    /// `Output`
    Output,
}

impl Field {
    /// Name of the host parameter carrying this field
    pub fn parameter_name(&self) -> &'static str {
        match self {
            Field::LocalFilePath => params::LOCAL_FILE_PATH,
            Field::LocalFileName => params::LOCAL_FILE_NAME,
            Field::RemotePath => params::S3_FILE_PATH,
            Field::RemoteName => params::S3_FILE_NAME,
            Field::Output => params::OUTPUT,
        }
    }

    pub(crate) fn description(&self) -> &'static str {
        match self {
            Field::LocalFilePath => "Local File Path",
            Field::LocalFileName => "Local File Name",
            Field::RemotePath => "S3 File Path",
            Field::RemoteName => "S3 File Name",
            Field::Output => "Output",
        }
    }
}

const UPLOAD_FIELDS: [Field; 4] = [
    Field::LocalFilePath,
    Field::LocalFileName,
    Field::RemotePath,
    Field::RemoteName,
];
const DOWNLOAD_FIELDS: [Field; 3] = [Field::RemotePath, Field::RemoteName, Field::LocalFilePath];
const LIST_FIELDS: [Field; 0] = [];
const DELETE_FIELDS: [Field; 2] = [Field::RemotePath, Field::RemoteName];
const EXISTS_FIELDS: [Field; 3] = [Field::RemotePath, Field::RemoteName, Field::Output];
const PRESIGN_FIELDS: [Field; 2] = [Field::RemotePath, Field::RemoteName];

impl Operation {
    /// All operations, in table order
    pub const ALL: [Operation; 6] = [
        Operation::Upload,
        Operation::Download,
        Operation::List,
        Operation::Delete,
        Operation::Exists,
        Operation::Presign,
    ];

    /// The name the host uses to select this operation
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Upload => "Upload File",
            Operation::Download => "Download File",
            Operation::List => "List Files",
            Operation::Delete => "Delete File",
            Operation::Exists => "Check File Exists",
            Operation::Presign => "Generate Pre-Signed URL",
        }
    }

    /// Fields that must be present before this operation may run
    pub fn required_fields(&self) -> &'static [Field] {
        match self {
            Operation::Upload => &UPLOAD_FIELDS,
            Operation::Download => &DOWNLOAD_FIELDS,
            Operation::List => &LIST_FIELDS,
            Operation::Delete => &DELETE_FIELDS,
            Operation::Exists => &EXISTS_FIELDS,
            Operation::Presign => &PRESIGN_FIELDS,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = Error;

    /// Exact, case-sensitive match on the operation name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| error::unexpected(format!("invalid operation specified: {s:?}")))
    }
}

/// Where a produced value goes once the operation succeeded
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputSlot {
    name: String,
    mode: ActionMode,
}

impl OutputSlot {
    /// Create a slot naming a buffer
    pub fn new(name: impl Into<String>, mode: ActionMode) -> Self {
        Self {
            name: name.into(),
            mode,
        }
    }

    /// Buffer name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether to write ([`ActionMode::Buffer`]) or read back the buffer
    pub fn mode(&self) -> ActionMode {
        self.mode
    }
}

/// A resolved request for one operation.
///
/// Which optional fields must be present depends on the operation, see
/// [`Operation::required_fields`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperationRequest {
    pub(crate) operation: Operation,
    pub(crate) local_path: Option<String>,
    pub(crate) local_name: Option<String>,
    pub(crate) remote_path: Option<String>,
    pub(crate) remote_name: Option<String>,
    pub(crate) output: Option<OutputSlot>,
}

impl OperationRequest {
    /// Create a request with no optional fields set
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            local_path: None,
            local_name: None,
            remote_path: None,
            remote_name: None,
            output: None,
        }
    }

    /// The requested operation
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// The output slot, if one was requested
    pub fn output(&self) -> Option<&OutputSlot> {
        self.output.as_ref()
    }

    /// Value of a field, if present
    pub fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::LocalFilePath => self.local_path.as_deref(),
            Field::LocalFileName => self.local_name.as_deref(),
            Field::RemotePath => self.remote_path.as_deref(),
            Field::RemoteName => self.remote_name.as_deref(),
            Field::Output => self.output.as_ref().map(OutputSlot::name),
        }
    }

    /// Fields required by the operation that are absent, in table order
    pub fn missing_fields(&self) -> Vec<Field> {
        self.operation
            .required_fields()
            .iter()
            .copied()
            .filter(|f| self.field(*f).is_none())
            .collect()
    }

    /// Fetch `fields`, logging every absent one before failing
    pub(crate) fn require<const N: usize>(
        &self,
        fields: [Field; N],
        log: &mut ExecutionLog,
    ) -> Result<[&str; N], Error> {
        let values = fields.map(|f| self.field(f));

        let missing: Vec<&str> = fields
            .iter()
            .zip(values.iter())
            .filter(|(_, v)| v.is_none())
            .map(|(f, _)| {
                log.record(format!("{} parameter is missing.", f.description()));
                f.parameter_name()
            })
            .collect();

        if !missing.is_empty() {
            return Err(error::validation_failure(format!(
                "missing required parameters for {}: {}",
                self.operation,
                missing.join(", ")
            )));
        }

        Ok(values.map(Option::unwrap_or_default))
    }
}

/// Everything a handler needs besides the request
#[derive(Debug)]
pub(crate) struct OperationContext<'a> {
    store: &'a dyn ObjectStore,
    bucket: &'a BucketConfig,
    config: &'a Config,
}

impl<'a> OperationContext<'a> {
    pub(crate) fn new(
        store: &'a dyn ObjectStore,
        bucket: &'a BucketConfig,
        config: &'a Config,
    ) -> Self {
        Self {
            store,
            bucket,
            config,
        }
    }

    /// The storage client to use for this invocation
    pub(crate) fn store(&self) -> &dyn ObjectStore {
        self.store
    }

    pub(crate) fn bucket(&self) -> &str {
        self.bucket.name()
    }

    pub(crate) fn config(&self) -> &Config {
        self.config
    }
}

/// Run the handler selected by the request's operation.
///
/// Every failure, including missing operation-specific fields, is turned into a failed
/// outcome; nothing escapes as an error.
#[tracing::instrument(skip_all, level = "debug", name = "dispatch-operation", fields(
    operation = %request.operation(),
    bucket = ctx.bucket(),
))]
pub(crate) async fn dispatch(
    ctx: &OperationContext<'_>,
    request: &OperationRequest,
    log: &mut ExecutionLog,
) -> OperationOutcome {
    let result = match request.operation() {
        Operation::Upload => upload::Upload::orchestrate(ctx, request, log).await,
        Operation::Download => download::Download::orchestrate(ctx, request, log).await,
        Operation::List => list::List::orchestrate(ctx, request, log).await,
        Operation::Delete => delete::Delete::orchestrate(ctx, request, log).await,
        Operation::Exists => exists::Exists::orchestrate(ctx, request, log).await,
        Operation::Presign => presign::Presign::orchestrate(ctx, request, log).await,
    };

    result.unwrap_or_else(|err| OperationOutcome::from_error(&err))
}

/// Join a remote path and name into an object key.
///
/// Separators at the join are collapsed and a leading separator is dropped, so `data/` +
/// `a.txt` and `/data` + `/a.txt` both give `data/a.txt`.
pub fn object_key(remote_path: &str, remote_name: &str) -> String {
    let path = remote_path.trim_matches(KEY_SEPARATOR);
    let name = remote_name.trim_start_matches(KEY_SEPARATOR);
    if path.is_empty() {
        name.to_owned()
    } else {
        format!("{path}{KEY_SEPARATOR}{name}")
    }
}

/// Key prefix used to list the objects "inside" a remote path
pub fn list_prefix(remote_path: Option<&str>) -> Option<String> {
    remote_path
        .map(|p| p.trim_matches(KEY_SEPARATOR))
        .filter(|p| !p.is_empty())
        .map(|p| format!("{p}{KEY_SEPARATOR}"))
}

/// Join a local directory and file name
pub(crate) fn local_file(dir: &str, name: &str) -> PathBuf {
    path_clean::clean(Path::new(dir).join(name))
}

/// Log a failed storage call and turn it into an outcome.
///
/// Provider errors and everything else are logged differently so the two can be told apart
/// in the execution log.
pub(crate) fn failed(
    log: &mut ExecutionLog,
    action: &str,
    headline: String,
    err: Error,
) -> OperationOutcome {
    let description = error::describe(&err);
    match err.kind() {
        ErrorKind::ServiceFailure(_) => {
            log.record(format!("AWS S3 error during {action}: {description}"))
        }
        _ => log.record(format!("General error during {action}: {description}")),
    }
    tracing::debug!(action, error = %DisplayErrorContext(&err), "operation failed");
    OperationOutcome::failure(&err, format!("{headline}. Error: {description}"))
}

#[cfg(test)]
mod tests {
    use super::{list_prefix, object_key, Field, Operation, OperationRequest};
    use crate::error::ErrorKind;
    use crate::log::ExecutionLog;

    #[test]
    fn test_operation_names_round_trip() {
        for op in Operation::ALL {
            assert_eq!(op, op.name().parse::<Operation>().unwrap());
        }
    }

    #[test]
    fn test_operation_match_is_exact() {
        for name in ["Bogus Operation", "upload file", " Upload File", "Upload"] {
            let err = name.parse::<Operation>().unwrap_err();
            assert_eq!(&ErrorKind::UnexpectedFailure, err.kind());
        }
    }

    #[test]
    fn test_object_key() {
        assert_eq!("data/a.txt", object_key("data", "a.txt"));
        assert_eq!("data/a.txt", object_key("data/", "a.txt"));
        assert_eq!("data/a.txt", object_key("/data", "/a.txt"));
        assert_eq!("a/b/c.txt", object_key("a/b", "c.txt"));
        assert_eq!("a.txt", object_key("", "a.txt"));
    }

    #[test]
    fn test_list_prefix() {
        assert_eq!(Some("data/".to_owned()), list_prefix(Some("data")));
        assert_eq!(Some("data/x/".to_owned()), list_prefix(Some("/data/x/")));
        assert_eq!(None, list_prefix(Some("/")));
        assert_eq!(None, list_prefix(None));
    }

    #[test]
    fn test_require_reports_every_missing_field() {
        let mut request = OperationRequest::new(Operation::Upload);
        request.remote_path = Some("data".to_owned());
        let mut log = ExecutionLog::default();

        assert_eq!(
            vec![Field::LocalFilePath, Field::LocalFileName, Field::RemoteName],
            request.missing_fields()
        );

        let err = request
            .require(
                [
                    Field::LocalFilePath,
                    Field::LocalFileName,
                    Field::RemotePath,
                    Field::RemoteName,
                ],
                &mut log,
            )
            .unwrap_err();
        assert_eq!(&ErrorKind::ValidationFailure, err.kind());

        let source = std::error::Error::source(&err).unwrap().to_string();
        assert_eq!(
            "missing required parameters for Upload File: LocalFilePath, LocalFileName, S3_FileName",
            source
        );
        let texts: Vec<_> = log.entries().iter().map(|e| e.text()).collect();
        assert_eq!(
            vec![
                "Local File Path parameter is missing.",
                "Local File Name parameter is missing.",
                "S3 File Name parameter is missing.",
            ],
            texts
        );
    }

    #[test]
    fn test_require_returns_values_in_order() {
        let mut request = OperationRequest::new(Operation::Delete);
        request.remote_path = Some("data".to_owned());
        request.remote_name = Some("a.txt".to_owned());
        let mut log = ExecutionLog::default();

        let [path, name] = request
            .require([Field::RemotePath, Field::RemoteName], &mut log)
            .unwrap();
        assert_eq!(("data", "a.txt"), (path, name));
        assert!(log.is_empty());
    }
}
