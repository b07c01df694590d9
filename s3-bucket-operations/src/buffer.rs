/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};

/// Named value store the host engine uses to pass data between test steps.
///
/// Implementations are shared between unrelated invocations and must tolerate concurrent
/// access; callers never lock around these methods.
pub trait Buffers: Send + Sync + fmt::Debug {
    /// Current value of the named buffer, if set
    fn get(&self, name: &str) -> Option<String>;

    /// Set the named buffer, replacing any previous value
    fn set(&self, name: &str, value: &str);
}

/// Process-local [`Buffers`] implementation backed by a map
#[derive(Debug, Default)]
pub struct InMemoryBuffers {
    values: RwLock<HashMap<String, String>>,
}

impl InMemoryBuffers {
    /// Create an empty buffer store
    pub fn new() -> Self {
        Self::default()
    }
}

impl Buffers for InMemoryBuffers {
    fn get(&self, name: &str) -> Option<String> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        values.get(name).cloned()
    }

    fn set(&self, name: &str, value: &str) {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        values.insert(name.to_owned(), value.to_owned());
    }
}

impl<T> Buffers for std::sync::Arc<T>
where
    T: Buffers + ?Sized,
{
    fn get(&self, name: &str) -> Option<String> {
        (**self).get(name)
    }

    fn set(&self, name: &str, value: &str) {
        (**self).set(name, value)
    }
}

#[cfg(test)]
mod tests {
    use super::{Buffers, InMemoryBuffers};
    use std::sync::Arc;

    #[test]
    fn test_set_replaces_previous_value() {
        let buffers = InMemoryBuffers::new();
        assert_eq!(None, buffers.get("files"));

        buffers.set("files", "a");
        buffers.set("files", "b");
        assert_eq!(Some("b".to_owned()), buffers.get("files"));
    }

    #[test]
    fn test_concurrent_writers() {
        let buffers = Arc::new(InMemoryBuffers::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let buffers = buffers.clone();
                std::thread::spawn(move || buffers.set(&format!("slot-{i}"), &i.to_string()))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        for i in 0..8 {
            assert_eq!(Some(i.to_string()), buffers.get(&format!("slot-{i}")));
        }
    }
}
