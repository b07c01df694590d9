/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;

use crate::buffer::Buffers;
use crate::log::ExecutionLog;
use crate::operation::OutputSlot;
use crate::outcome::{OperationOutcome, OutcomeKind};
use crate::params::ActionMode;

/// Pass/fail status reported to the host engine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionStatus {
    /// The operation succeeded
    Passed,
    /// The operation failed
    Failed,
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionStatus::Passed => f.write_str("PASSED"),
            ActionStatus::Failed => f.write_str("FAILED"),
        }
    }
}

/// What happened to the output slot of a successful invocation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlotResult {
    /// The produced value was written to the named buffer
    Buffered {
        /// Buffer name
        name: String,
        /// Value written
        value: String,
    },
    /// The named buffer was read back instead of written
    ReadBack {
        /// Buffer name
        name: String,
        /// Value currently stored, if any
        stored: Option<String>,
        /// True if the stored value equals the produced value
        matches: bool,
    },
}

impl SlotResult {
    /// Name of the buffer involved
    pub fn name(&self) -> &str {
        match self {
            SlotResult::Buffered { name, .. } | SlotResult::ReadBack { name, .. } => name,
        }
    }
}

impl fmt::Display for SlotResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotResult::Buffered { name, value } => {
                write!(f, "Buffer {name} set to value {value}.")
            }
            SlotResult::ReadBack {
                name,
                stored: Some(stored),
                matches,
            } => {
                let verdict = if *matches { "matches" } else { "does not match" };
                write!(
                    f,
                    "Buffer {name} holds value {stored}, which {verdict} the produced value."
                )
            }
            SlotResult::ReadBack {
                name, stored: None, ..
            } => write!(f, "Buffer {name} holds no value."),
        }
    }
}

/// The caller-visible result of one invocation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionResult {
    status: ActionStatus,
    kind: OutcomeKind,
    message: String,
    produced_value: Option<String>,
    slot: Option<SlotResult>,
}

impl ActionResult {
    /// Pass/fail status
    pub fn status(&self) -> ActionStatus {
        self.status
    }

    /// Outcome classification
    pub fn kind(&self) -> OutcomeKind {
        self.kind
    }

    /// Final message followed by the full execution log
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The value produced by the operation, if any
    pub fn produced_value(&self) -> Option<&str> {
        self.produced_value.as_deref()
    }

    /// Sub-result for the output slot, if one was requested and the operation succeeded
    pub fn slot(&self) -> Option<&SlotResult> {
        self.slot.as_ref()
    }

    /// True if the status is [`ActionStatus::Passed`]
    pub fn is_passed(&self) -> bool {
        self.status == ActionStatus::Passed
    }
}

impl fmt::Display for ActionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status, self.message)?;
        if let Some(slot) = &self.slot {
            write!(f, "\n{slot}")?;
        }
        Ok(())
    }
}

/// Turn an outcome into the caller-visible result, consuming the execution log.
///
/// On success with a produced value and an output slot, a [`ActionMode::Buffer`] slot is
/// written while any other mode reads the buffer back for verification. Failed outcomes never
/// touch the buffer store.
pub(crate) fn translate(
    outcome: OperationOutcome,
    output: Option<&OutputSlot>,
    buffers: &dyn Buffers,
    mut log: ExecutionLog,
) -> ActionResult {
    let slot = match (outcome.is_success(), outcome.produced_value(), output) {
        (true, Some(value), Some(output)) => {
            let slot = apply_slot(output, value, buffers);
            log.record(slot.to_string());
            Some(slot)
        }
        _ => None,
    };

    let status = if outcome.is_success() {
        ActionStatus::Passed
    } else {
        ActionStatus::Failed
    };
    tracing::debug!(%status, kind = ?outcome.kind(), "invocation finished");

    let message = if log.is_empty() {
        outcome.detail().to_owned()
    } else {
        format!("{}\n{}", outcome.detail(), log.join())
    };

    ActionResult {
        status,
        kind: outcome.kind(),
        produced_value: outcome.produced_value().map(str::to_owned),
        message,
        slot,
    }
}

fn apply_slot(output: &OutputSlot, value: &str, buffers: &dyn Buffers) -> SlotResult {
    let name = output.name().to_owned();
    match output.mode() {
        ActionMode::Buffer => {
            buffers.set(&name, value);
            SlotResult::Buffered {
                name,
                value: value.to_owned(),
            }
        }
        ActionMode::Input | ActionMode::Verify => {
            let stored = buffers.get(&name);
            let matches = stored.as_deref() == Some(value);
            SlotResult::ReadBack {
                name,
                stored,
                matches,
            }
        }
    }
}
