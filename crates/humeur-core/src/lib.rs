//! Domain models and shared contracts for the humeur client.
//!
//! This crate holds everything the other layers agree on: the shared error
//! type, the login form and its validation rules, the sentiment result model
//! with its display rules, and the session state machine with the token-store
//! contract.

pub mod credentials;
pub mod error;
pub mod sentiment;
pub mod session;

// Re-export common error type
pub use error::{HumeurError, Result};
