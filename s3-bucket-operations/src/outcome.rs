/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::error::{self, Error, ErrorKind};

/// Classification of an invocation's outcome
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutcomeKind {
    /// The operation completed
    Success,
    /// Required parameters were missing; nothing was sent to the storage service
    ValidationFailure,
    /// The storage client could not be constructed
    ClientFailure,
    /// The storage provider rejected or could not complete the call
    ServiceFailure,
    /// Any other failure
    UnexpectedFailure,
}

impl OutcomeKind {
    /// True for [`OutcomeKind::Success`]
    pub fn is_success(&self) -> bool {
        matches!(self, OutcomeKind::Success)
    }
}

impl From<&ErrorKind> for OutcomeKind {
    fn from(kind: &ErrorKind) -> Self {
        match kind {
            ErrorKind::ValidationFailure => OutcomeKind::ValidationFailure,
            ErrorKind::ClientFailure => OutcomeKind::ClientFailure,
            ErrorKind::ServiceFailure(_) => OutcomeKind::ServiceFailure,
            ErrorKind::UnexpectedFailure => OutcomeKind::UnexpectedFailure,
        }
    }
}

/// The single result of one invocation's operation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperationOutcome {
    kind: OutcomeKind,
    detail: String,
    produced_value: Option<String>,
}

impl OperationOutcome {
    /// A successful outcome
    pub fn success(detail: impl Into<String>) -> Self {
        Self {
            kind: OutcomeKind::Success,
            detail: detail.into(),
            produced_value: None,
        }
    }

    /// A failed outcome classified by `err`
    pub fn failure(err: &Error, detail: impl Into<String>) -> Self {
        Self {
            kind: err.kind().into(),
            detail: detail.into(),
            produced_value: None,
        }
    }

    /// A failed outcome whose detail is the error and its sources
    pub fn from_error(err: &Error) -> Self {
        Self::failure(err, error::describe(err))
    }

    /// Attach the value the operation produced
    pub fn with_produced_value(mut self, value: impl Into<String>) -> Self {
        self.produced_value = Some(value.into());
        self
    }

    /// Outcome classification
    pub fn kind(&self) -> OutcomeKind {
        self.kind
    }

    /// Human-readable summary
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// The value produced by the operation, if any
    pub fn produced_value(&self) -> Option<&str> {
        self.produced_value.as_deref()
    }

    /// True if the operation succeeded
    pub fn is_success(&self) -> bool {
        self.kind.is_success()
    }
}
