use thiserror::Error;
use crate::attribute::Kind;

/// error regarding registry, attribute or arena operations
#[derive(Error, Debug, Copy, Clone, PartialEq)]
pub enum Error {
    /// a bounded list or table is full
    #[error("capacity of a bounded table exceeded")]
    CapacityExceeded,
    /// the arena cannot serve the requested size
    #[error("arena ceiling reached")]
    OutOfMemory,
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// typed access to an attribute holding another kind
    #[error("attribute holds {found} but {expected} was requested")]
    TypeMismatch {expected: Kind, found: Kind},
    /// operation not allowed at this point of the lifecycle
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
    /// remote access to an address resolving no attribute
    #[error("no attribute at this address")]
    NotFound,
}
