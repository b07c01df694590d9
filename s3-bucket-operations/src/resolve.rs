/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::config::BucketConfig;
use crate::error::{self, Error};
use crate::log::ExecutionLog;
use crate::operation::{Operation, OperationRequest, OutputSlot};
use crate::params::{self, non_blank, ParameterTree};

/// Bucket parameters in the order they are checked, with their log descriptions
const BUCKET_FIELDS: [(&str, &str); 4] = [
    (params::BUCKET_NAME, "S3 Bucket Name"),
    (params::BUCKET_REGION, "S3 Bucket Region"),
    (params::BUCKET_ACCESS_KEY, "S3 Bucket Access Key"),
    (params::BUCKET_SECRET_ACCESS, "S3 Bucket Secret Access Key"),
];

/// Resolve the bucket configuration and operation request from the caller's parameters.
///
/// An operation name that matches no operation fails with
/// [`UnexpectedFailure`](crate::error::ErrorKind::UnexpectedFailure) whatever else is supplied.
/// Otherwise every missing bucket parameter, a missing `Operation`, and every field the
/// operation requires but was not given is logged, and the resolver fails with a single
/// validation error naming all of them.
pub fn resolve(
    params: &ParameterTree,
    log: &mut ExecutionLog,
) -> Result<(BucketConfig, OperationRequest), Error> {
    log.record("Fetching operation parameters...");
    let operation = params
        .value(params::OPERATION)
        .map(str::parse::<Operation>)
        .transpose()?;

    log.record("Fetching S3 bucket configuration parameters...");
    let values = BUCKET_FIELDS.map(|(name, _)| {
        params
            .find(name, params::BUCKET_CONFIGURATIONS)
            .and_then(non_blank)
    });

    let mut missing: Vec<&str> = BUCKET_FIELDS
        .iter()
        .zip(values.iter())
        .filter(|(_, v)| v.is_none())
        .map(|((name, description), _)| {
            log.record(format!("{description} parameter is missing."));
            *name
        })
        .collect();

    let request = operation.map(|operation| request_for(operation, params));
    match &request {
        Some(request) => {
            for field in request.missing_fields() {
                log.record(format!("{} parameter is missing.", field.description()));
                missing.push(field.parameter_name());
            }
        }
        None => {
            log.record("Operation parameter is missing.");
            missing.push(params::OPERATION);
        }
    }

    let (Some(request), [Some(name), Some(region), Some(access_key), Some(secret_key)], true) =
        (request, values, missing.is_empty())
    else {
        return Err(error::validation_failure(format!(
            "missing required parameters: {}",
            missing.join(", ")
        )));
    };

    Ok((
        BucketConfig::new(name, region, access_key, secret_key),
        request,
    ))
}

fn request_for(operation: Operation, params: &ParameterTree) -> OperationRequest {
    let mut request = OperationRequest::new(operation);
    request.local_path = params.value(params::LOCAL_FILE_PATH).map(str::to_owned);
    request.local_name = params.value(params::LOCAL_FILE_NAME).map(str::to_owned);
    request.remote_path = params.value(params::S3_FILE_PATH).map(str::to_owned);
    request.remote_name = params.value(params::S3_FILE_NAME).map(str::to_owned);
    request.output = params.get(params::OUTPUT).and_then(|p| {
        non_blank(p).map(|slot| OutputSlot::new(slot, p.action_mode()))
    });
    request
}

#[cfg(test)]
mod tests {
    use super::resolve;
    use crate::error::ErrorKind;
    use crate::log::ExecutionLog;
    use crate::operation::{Field, Operation, OutputSlot};
    use crate::params::{ActionMode, Parameter, ParameterTree};

    fn bucket_params() -> ParameterTree {
        [
            ("S3Bucket_Name", "test-bucket"),
            ("S3Bucket_Region", "us-east-1"),
            ("S3Bucket_AccessKey", "AKID"),
            ("S3Bucket_SecretAccess", "secret"),
        ]
        .into_iter()
        .collect()
    }

    fn source_text(err: &crate::error::Error) -> String {
        std::error::Error::source(err).unwrap().to_string()
    }

    #[test]
    fn test_resolves_top_level_parameters() {
        let params = bucket_params()
            .with("Operation", Parameter::new("Check File Exists"))
            .with("S3_FilePath", Parameter::new("data"))
            .with("S3_FileName", Parameter::new("a.txt"))
            .with(
                "Output",
                Parameter::new("exists").with_action_mode(ActionMode::Buffer),
            );
        let mut log = ExecutionLog::default();

        let (bucket, request) = resolve(&params, &mut log).unwrap();
        assert_eq!("test-bucket", bucket.name());
        assert_eq!("us-east-1", bucket.region());
        assert_eq!(Operation::Exists, request.operation());
        assert_eq!(Some("data"), request.field(Field::RemotePath));
        assert_eq!(
            Some(&OutputSlot::new("exists", ActionMode::Buffer)),
            request.output()
        );
        assert!(request.missing_fields().is_empty());
    }

    #[test]
    fn test_resolves_grouped_bucket_parameters() {
        let params = ParameterTree::new()
            .with("Operation", Parameter::new("List Files"))
            .with("S3Bucket_Configurations", Parameter::group(bucket_params()));
        let mut log = ExecutionLog::default();

        let (bucket, request) = resolve(&params, &mut log).unwrap();
        assert_eq!("test-bucket", bucket.name());
        assert_eq!("secret", bucket.secret_key());
        assert_eq!(None, request.output());
    }

    #[test]
    fn test_reports_every_missing_bucket_parameter() {
        let params = ParameterTree::new()
            .with("Operation", Parameter::new("List Files"))
            .with("S3Bucket_Name", Parameter::new("test-bucket"))
            .with("S3Bucket_Region", Parameter::new("   "));
        let mut log = ExecutionLog::default();

        let err = resolve(&params, &mut log).unwrap_err();
        assert_eq!(&ErrorKind::ValidationFailure, err.kind());
        assert_eq!(
            "missing required parameters: S3Bucket_Region, S3Bucket_AccessKey, S3Bucket_SecretAccess",
            source_text(&err)
        );

        let texts: Vec<_> = log.entries().iter().map(|e| e.text()).collect();
        assert_eq!(
            vec![
                "Fetching operation parameters...",
                "Fetching S3 bucket configuration parameters...",
                "S3 Bucket Region parameter is missing.",
                "S3 Bucket Access Key parameter is missing.",
                "S3 Bucket Secret Access Key parameter is missing.",
            ],
            texts
        );
    }

    #[test]
    fn test_missing_operation_is_reported_with_bucket_fields() {
        let params = ParameterTree::new().with("S3Bucket_Name", Parameter::new("test-bucket"));
        let mut log = ExecutionLog::default();

        let err = resolve(&params, &mut log).unwrap_err();
        assert_eq!(&ErrorKind::ValidationFailure, err.kind());
        assert!(source_text(&err).ends_with("S3Bucket_SecretAccess, Operation"));
    }

    #[test]
    fn test_missing_operation_fields_are_named_with_bucket_fields() {
        let params: ParameterTree = [
            ("Operation", "Delete File"),
            ("S3Bucket_Name", "test-bucket"),
            ("S3Bucket_AccessKey", "AKID"),
            ("S3Bucket_SecretAccess", "secret"),
            ("S3_FilePath", "data"),
        ]
        .into_iter()
        .collect();
        let mut log = ExecutionLog::default();

        let err = resolve(&params, &mut log).unwrap_err();
        assert_eq!(&ErrorKind::ValidationFailure, err.kind());
        assert_eq!(
            "missing required parameters: S3Bucket_Region, S3_FileName",
            source_text(&err)
        );

        let texts: Vec<_> = log.entries().iter().map(|e| e.text()).collect();
        assert_eq!(
            vec![
                "Fetching operation parameters...",
                "Fetching S3 bucket configuration parameters...",
                "S3 Bucket Region parameter is missing.",
                "S3 File Name parameter is missing.",
            ],
            texts
        );
    }

    #[test]
    fn test_missing_operation_fields_fail_with_complete_bucket() {
        let params = bucket_params().with("Operation", Parameter::new("Upload File"));
        let mut log = ExecutionLog::default();

        let err = resolve(&params, &mut log).unwrap_err();
        assert_eq!(&ErrorKind::ValidationFailure, err.kind());
        assert_eq!(
            "missing required parameters: LocalFilePath, LocalFileName, S3_FilePath, S3_FileName",
            source_text(&err)
        );
    }

    #[test]
    fn test_unknown_operation_wins_over_missing_fields() {
        let params = ParameterTree::new().with("Operation", Parameter::new("Bogus Operation"));
        let mut log = ExecutionLog::default();

        let err = resolve(&params, &mut log).unwrap_err();
        assert_eq!(&ErrorKind::UnexpectedFailure, err.kind());
        assert!(source_text(&err).contains("Bogus Operation"));
    }

    #[test]
    fn test_blank_output_is_no_slot() {
        let params = bucket_params()
            .with("Operation", Parameter::new("List Files"))
            .with("Output", Parameter::new(" "));
        let mut log = ExecutionLog::default();

        let (_, request) = resolve(&params, &mut log).unwrap();
        assert_eq!(None, request.output());
    }
}
