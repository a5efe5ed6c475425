//! Button array error types

use thiserror::Error;

use crate::controller::BindState;

/// Structural failure of the identity query
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifyError {
    /// The query interface was unreachable or produced no object
    #[error("_DSM query unavailable: {0}")]
    QueryUnavailable(String),

    /// The query produced something other than an integer
    #[error("_DSM returned {0} instead of Integer")]
    UnexpectedResultType(&'static str),
}

/// Why a node was not accepted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    #[error("bus id {found:?} does not start with {expected:?}")]
    BusId {
        found: String,
        expected: &'static str,
    },

    #[error("device id 0x{found:x} (expected 0x{expected:x})")]
    DeviceId { found: u64, expected: u64 },

    #[error(transparent)]
    Query(#[from] IdentifyError),
}

/// Errors reported by a button-input service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("out of memory")]
    OutOfMemory,

    #[error("{0}")]
    Registration(String),
}

/// Errors from binding the button array
#[derive(Error, Debug)]
pub enum ButtonError {
    /// Identity gate failed; another driver may own the node
    #[error("Not a Surface Book 2 button array: {0}")]
    NotThisDevice(#[from] Mismatch),

    /// Allocation failed while building a group
    #[error("Out of memory while building a button group")]
    ResourceExhausted,

    /// The button-input service rejected a group
    #[error("Button group registration failed: {0}")]
    RegistrationFailed(#[source] ServiceError),

    /// Identity matched but no button ended up in any group
    #[error("No buttons in either group")]
    NoMatchingButtons,

    /// `add()` on a controller that is not unbound
    #[error("Controller is {0:?}, expected Unbound")]
    InvalidState(BindState),
}

impl ButtonError {
    /// True when the platform should offer the node to other drivers
    pub fn is_not_this_device(&self) -> bool {
        matches!(self, ButtonError::NotThisDevice(_))
    }
}

impl From<ServiceError> for ButtonError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::OutOfMemory => ButtonError::ResourceExhausted,
            other => ButtonError::RegistrationFailed(other),
        }
    }
}

impl From<IdentifyError> for ButtonError {
    fn from(e: IdentifyError) -> Self {
        ButtonError::NotThisDevice(Mismatch::Query(e))
    }
}
