use avec_proc::{Display, Error};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum CapacityError {
    #[display("allocation failed with new capacity {new_capacity}")]
    AllocFailed {
        new_capacity: usize,
    },
    #[display("exceeded maximum capacity of {max_capacity}")]
    MaxCapacityExceeded {
        max_capacity: usize,
    },
}

/// Which construction form failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum ConstructKind {
    #[display("default")]
    Default,
    #[display("copy")]
    Copy,
    #[display("emplace")]
    Emplace,
}

/// An element constructor signalled failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[display("{kind} construction failed: {reason}")]
pub struct ConstructError {
    pub kind: ConstructKind,
    pub reason: &'static str,
}

impl ConstructError {

    #[inline(always)]
    pub const fn new(kind: ConstructKind, reason: &'static str) -> Self {
        Self {
            kind,
            reason,
        }
    }
}
