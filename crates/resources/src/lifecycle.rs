//! Resource lifecycle states
//!
//! `Absent → Creating → Present → Updating → Present → Deleting → Absent`.
//!
//! The transitional states exist only while a remote call is outstanding and
//! are never persisted. After a crash the engine's next Read decides whether
//! the object is `Present` or `Absent`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of one resource instance
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "PascalCase")]
pub enum ResourceState {
    #[default]
    Absent,
    Creating,
    Present,
    Updating,
    Deleting,
}

/// Lifecycle operation invoked by the engine
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
        };
        f.write_str(name)
    }
}

impl ResourceState {
    /// State while `op` is outstanding, or `None` if `op` is not valid here
    pub fn begin(self, op: Operation) -> Option<ResourceState> {
        match (self, op) {
            (ResourceState::Absent, Operation::Create) => Some(ResourceState::Creating),
            (ResourceState::Present, Operation::Read) => Some(ResourceState::Present),
            (ResourceState::Present, Operation::Update) => Some(ResourceState::Updating),
            (ResourceState::Present, Operation::Delete) => Some(ResourceState::Deleting),
            _ => None,
        }
    }

    /// State after the remote call of a transitional state finished
    ///
    /// `exists` is whether the remote object exists after the call.
    pub fn finish(self, exists: bool) -> ResourceState {
        match self {
            ResourceState::Creating | ResourceState::Updating | ResourceState::Present if exists => ResourceState::Present,
            ResourceState::Deleting => ResourceState::Absent,
            _ if exists => ResourceState::Present,
            _ => ResourceState::Absent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_lifecycle() {
        let creating = ResourceState::Absent.begin(Operation::Create).unwrap();
        assert_eq!(creating, ResourceState::Creating);
        let present = creating.finish(true);
        assert_eq!(present, ResourceState::Present);

        let updating = present.begin(Operation::Update).unwrap();
        assert_eq!(updating.finish(true), ResourceState::Present);

        let deleting = present.begin(Operation::Delete).unwrap();
        assert_eq!(deleting.finish(false), ResourceState::Absent);
    }

    #[test]
    fn test_invalid_transitions() {
        assert_eq!(ResourceState::Absent.begin(Operation::Update), None);
        assert_eq!(ResourceState::Absent.begin(Operation::Delete), None);
        assert_eq!(ResourceState::Present.begin(Operation::Create), None);
        assert_eq!(ResourceState::Creating.begin(Operation::Read), None);
    }

    #[test]
    fn test_read_of_vanished_object_is_absent() {
        assert_eq!(ResourceState::Present.finish(false), ResourceState::Absent);
        assert_eq!(ResourceState::Creating.finish(false), ResourceState::Absent);
    }
}
