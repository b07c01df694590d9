/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;

use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_smithy_runtime_api::client::orchestrator::HttpResponse;

/// A boxed error that is `Send` and `Sync`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by this library
///
/// NOTE: Use [`aws_smithy_types::error::display::DisplayErrorContext`] or similar to display
/// the entire error cause/source chain.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: BoxError,
}

/// General categories of operation errors.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// One or more required parameters are absent
    ValidationFailure,

    /// The storage client could not be constructed (e.g. unrecognized region)
    ClientFailure,

    /// The storage provider rejected or could not complete the call
    ServiceFailure(ServiceFailure),

    /// Anything not recognized as a provider error (local I/O, unknown operation, ...)
    UnexpectedFailure,
}

/// Stores information about a failed storage call
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServiceFailure {
    code: Option<String>,
    status: Option<u16>,
}

const NOT_FOUND_CODES: &[&str] = &["NotFound", "NoSuchKey", "404"];

impl ServiceFailure {
    /// The error code reported by the provider, if any
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// The HTTP status of the provider response, if a response was received
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// True when the provider reported that the object does not exist
    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
            || self
                .code
                .as_deref()
                .is_some_and(|code| NOT_FOUND_CODES.contains(&code))
    }
}

impl Error {
    /// Creates a new [`Error`] from a known kind of error as well as an arbitrary error
    /// source.
    pub fn new<E>(kind: ErrorKind, err: E) -> Error
    where
        E: Into<BoxError>,
    {
        Error {
            kind,
            source: err.into(),
        }
    }

    /// Returns the corresponding [`ErrorKind`] for this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// True when this error is a provider "not found" condition
    pub fn is_not_found(&self) -> bool {
        matches!(&self.kind, ErrorKind::ServiceFailure(failure) if failure.is_not_found())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::ValidationFailure => write!(f, "validation failure"),
            ErrorKind::ClientFailure => write!(f, "client failure"),
            ErrorKind::ServiceFailure(failure) => match failure.code() {
                Some(code) => write!(f, "service failure ({code})"),
                None => write!(f, "service failure"),
            },
            ErrorKind::UnexpectedFailure => write!(f, "unexpected failure"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::new(ErrorKind::UnexpectedFailure, value)
    }
}

impl From<aws_smithy_types::byte_stream::error::Error> for Error {
    fn from(value: aws_smithy_types::byte_stream::error::Error) -> Self {
        Self::new(ErrorKind::UnexpectedFailure, value)
    }
}

impl<E> From<SdkError<E, HttpResponse>> for Error
where
    E: std::error::Error + ProvideErrorMetadata + Send + Sync + 'static,
{
    fn from(value: SdkError<E, HttpResponse>) -> Self {
        let failure = ServiceFailure {
            code: value.code().map(str::to_owned),
            status: value.raw_response().map(|resp| resp.status().as_u16()),
        };
        Error::new(ErrorKind::ServiceFailure(failure), value)
    }
}

pub(crate) fn validation_failure<E>(err: E) -> Error
where
    E: Into<BoxError>,
{
    Error::new(ErrorKind::ValidationFailure, err)
}

pub(crate) fn client_failure<E>(err: E) -> Error
where
    E: Into<BoxError>,
{
    Error::new(ErrorKind::ClientFailure, err)
}

pub(crate) fn unexpected<E>(err: E) -> Error
where
    E: Into<BoxError>,
{
    Error::new(ErrorKind::UnexpectedFailure, err)
}

/// A provider failure raised without an SDK response (e.g. by the in-memory store)
pub(crate) fn service_failure<E>(code: &str, err: E) -> Error
where
    E: Into<BoxError>,
{
    let failure = ServiceFailure {
        code: Some(code.to_owned()),
        status: None,
    };
    Error::new(ErrorKind::ServiceFailure(failure), err)
}

/// The provider accepted a call but its response body could not be read to the end
pub(crate) fn response_stream_failure<E>(err: E) -> Error
where
    E: Into<BoxError>,
{
    let failure = ServiceFailure {
        code: None,
        status: None,
    };
    Error::new(ErrorKind::ServiceFailure(failure), err)
}

/// Render `err` and its source chain as `outer: inner: ...`.
///
/// Used for caller-facing text; [`DisplayErrorContext`](aws_smithy_types::error::display::DisplayErrorContext)
/// also dumps `Debug` output and is kept for tracing fields.
pub(crate) fn describe(err: &(dyn std::error::Error + 'static)) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
