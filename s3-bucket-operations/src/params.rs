/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// Name of the operation selector parameter
pub const OPERATION: &str = "Operation";
/// Optional group under which the bucket parameters may be nested
pub const BUCKET_CONFIGURATIONS: &str = "S3Bucket_Configurations";
/// Bucket name
pub const BUCKET_NAME: &str = "S3Bucket_Name";
/// Bucket region
pub const BUCKET_REGION: &str = "S3Bucket_Region";
/// Access key id
pub const BUCKET_ACCESS_KEY: &str = "S3Bucket_AccessKey";
/// Secret access key
pub const BUCKET_SECRET_ACCESS: &str = "S3Bucket_SecretAccess";
/// Local directory (or file path for downloads)
pub const LOCAL_FILE_PATH: &str = "LocalFilePath";
/// Local file name
pub const LOCAL_FILE_NAME: &str = "LocalFileName";
/// Remote path, i.e. the key prefix
pub const S3_FILE_PATH: &str = "S3_FilePath";
/// Remote object name
pub const S3_FILE_NAME: &str = "S3_FileName";
/// Output slot
pub const OUTPUT: &str = "Output";

/// How the host engine wants a parameter to be treated
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ActionMode {
    /// Plain input value
    #[default]
    Input,

    /// Store the produced value into the buffer named by the parameter value
    Buffer,

    /// Verify the produced value against the buffer named by the parameter value
    Verify,
}

/// A named value in the host's parameter tree
#[derive(Clone, Debug, Default)]
pub struct Parameter {
    value: String,
    action_mode: ActionMode,
    children: ParameterTree,
}

impl Parameter {
    /// Create an input parameter with the given value
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Default::default()
        }
    }

    /// Create a value-less grouping parameter
    pub fn group(children: ParameterTree) -> Self {
        Self {
            children,
            ..Default::default()
        }
    }

    /// Set the action mode
    pub fn with_action_mode(mut self, action_mode: ActionMode) -> Self {
        self.action_mode = action_mode;
        self
    }

    /// The raw value
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The action mode
    pub fn action_mode(&self) -> ActionMode {
        self.action_mode
    }

    /// Nested parameters
    pub fn children(&self) -> &ParameterTree {
        &self.children
    }
}

/// Ordered collection of named parameters.
///
/// Names are matched exactly. A parameter whose value is empty or only whitespace is treated
/// as absent by [`ParameterTree::value`].
#[derive(Clone, Debug, Default)]
pub struct ParameterTree {
    parameters: Vec<(String, Parameter)>,
}

impl ParameterTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter, replacing an existing one with the same name
    pub fn insert(&mut self, name: impl Into<String>, parameter: Parameter) {
        let name = name.into();
        match self.parameters.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = parameter,
            None => self.parameters.push((name, parameter)),
        }
    }

    /// Builder style [`insert`](Self::insert)
    pub fn with(mut self, name: impl Into<String>, parameter: Parameter) -> Self {
        self.insert(name, parameter);
        self
    }

    /// Look up a top-level parameter
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.parameters
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p)
    }

    /// Look up a parameter at the top level, then in the given group
    pub fn find(&self, name: &str, group: &str) -> Option<&Parameter> {
        self.get(name)
            .or_else(|| self.get(group).and_then(|g| g.children().get(name)))
    }

    /// Trimmed, non-blank value of a top-level parameter
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(non_blank)
    }

    /// Iterate over top-level parameters in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Parameter)> {
        self.parameters.iter().map(|(n, p)| (n.as_str(), p))
    }
}

pub(crate) fn non_blank(parameter: &Parameter) -> Option<&str> {
    let value = parameter.value().trim();
    (!value.is_empty()).then_some(value)
}

impl<K, V> FromIterator<(K, V)> for ParameterTree
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = ParameterTree::new();
        for (name, value) in iter {
            tree.insert(name, Parameter::new(value));
        }
        tree
    }
}
