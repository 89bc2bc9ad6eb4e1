//! HTTP handlers for the Visions domain

pub mod credential;
#[cfg(feature = "mock-image")]
pub mod mock_admin;
pub mod visions;

use horizon_common::Error;

use crate::StateError;

/// A rejected transition means the request raced another one
pub(crate) fn state_conflict(err: StateError) -> Error {
    Error::Conflict(err.to_string())
}
