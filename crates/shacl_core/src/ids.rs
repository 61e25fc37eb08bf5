//! Identity generation for reports and results.
//!
//! Every report and every result gets a fresh blank identity. The generator is
//! injected through [`EvaluationContext`](crate::EvaluationContext) so tests can
//! swap the random default for a deterministic sequence.

use crate::term::Resource;
use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Source of fresh blank identities.
pub trait IdGenerator: Send + Sync + Debug {
    /// Returns a blank resource never returned before by this generator.
    fn next_blank(&self) -> Resource;
}

/// Random identities backed by UUID v4.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_blank(&self) -> Resource {
        Resource::blank(Uuid::new_v4().simple().to_string())
    }
}

/// Deterministic identities: `<prefix>0`, `<prefix>1`, ...
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIds {
    /// Creates a generator producing labels with the given prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(0),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("b")
    }
}

impl IdGenerator for SequentialIds {
    fn next_blank(&self) -> Resource {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        Resource::blank(format!("{}{}", self.prefix, n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIds::new("r");
        assert_eq!(ids.next_blank(), Resource::blank("r0"));
        assert_eq!(ids.next_blank(), Resource::blank("r1"));
    }

    #[test]
    fn test_uuid_ids_are_blank_and_unique() {
        let ids = UuidGenerator;
        let a = ids.next_blank();
        let b = ids.next_blank();
        assert!(a.is_blank());
        assert_ne!(a, b);
    }
}
