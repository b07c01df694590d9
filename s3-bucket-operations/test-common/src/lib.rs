/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fs;

use aws_sdk_s3::operation::list_objects_v2::ListObjectsV2Output;
use aws_sdk_s3::types::Object;
use tempfile::{tempdir, TempDir};

/// Create a temporary directory containing `files`, given as (relative path, contents).
///
/// Parent directories are created as needed.
pub fn create_test_dir(files: Vec<(&str, &[u8])>) -> TempDir {
    let temp_dir = tempdir().unwrap();

    for (path, contents) in files {
        let full_path = temp_dir.path().join(path);
        fs::create_dir_all(full_path.parent().unwrap()).unwrap();
        fs::write(&full_path, contents).unwrap();
    }

    temp_dir
}

/// The temp dir path as the string form a host engine would pass as `LocalFilePath`
pub fn dir_param(dir: &TempDir) -> String {
    dir.path().to_string_lossy().into_owned()
}

/// One page of a `ListObjectsV2` response holding `objects` as (key, size)
pub fn list_page(objects: &[(&str, i64)], next_token: Option<&str>) -> ListObjectsV2Output {
    let mut builder = ListObjectsV2Output::builder()
        .is_truncated(next_token.is_some())
        .set_next_continuation_token(next_token.map(str::to_owned));
    for (key, size) in objects {
        builder = builder.contents(Object::builder().key(*key).size(*size).build());
    }
    builder.build()
}
