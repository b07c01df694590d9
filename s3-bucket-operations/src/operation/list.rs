/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use super::{failed, list_prefix, Field, OperationContext, OperationRequest, LIST_FIELDS};
use crate::error::Error;
use crate::log::ExecutionLog;
use crate::outcome::OperationOutcome;
use crate::storage::ObjectSummary;

/// Separator between entries of a listing
const ENTRY_SEPARATOR: &str = "; ";

/// Operation struct for listing the objects under a prefix
#[derive(Clone, Default, Debug)]
pub(crate) struct List;

impl List {
    /// List the objects under `S3_FilePath`, or the whole bucket when it is absent.
    ///
    /// The produced value is `"<key> (size: <n> bytes)"` entries joined by `"; "` in listing
    /// order, or a "No Files Available" sentinel naming the location when nothing matched.
    pub(crate) async fn orchestrate(
        ctx: &OperationContext<'_>,
        request: &OperationRequest,
        log: &mut ExecutionLog,
    ) -> Result<OperationOutcome, Error> {
        let [] = request.require(LIST_FIELDS, log)?;
        let prefix = list_prefix(request.field(Field::RemotePath));
        let location = format!(
            "s3://{}/{}",
            ctx.bucket(),
            prefix.as_deref().unwrap_or_default()
        );

        log.record(format!("Starting file listing at: {location}"));

        let objects = match ctx
            .store()
            .list_objects(ctx.bucket(), prefix.as_deref())
            .await
        {
            Ok(objects) => objects,
            Err(err) => {
                return Ok(failed(
                    log,
                    "file listing",
                    format!("Error during file listing. Location: {location}"),
                    err,
                ))
            }
        };

        let files_list = if objects.is_empty() {
            log.record("No files found at the given location.");
            empty_listing(&location)
        } else {
            log.record(format!("Files found: {}", objects.len()));
            let entries: Vec<String> = objects.iter().map(entry).collect();
            for e in &entries {
                log.record(format!(" - {e}"));
            }
            entries.join(ENTRY_SEPARATOR)
        };

        log.record("File listing completed successfully.");
        log.record(format!("Files List: {files_list}"));

        Ok(OperationOutcome::success(format!(
            "File listing completed successfully.\nFiles List: {files_list}"
        ))
        .with_produced_value(files_list))
    }
}

fn entry(object: &ObjectSummary) -> String {
    format!("{} (size: {} bytes)", object.key, object.size)
}

/// Value produced when a listing matched no objects
pub fn empty_listing(location: &str) -> String {
    format!("No Files Available at given location - {location}")
}
