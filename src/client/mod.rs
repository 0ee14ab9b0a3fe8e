//! Client side of the gift form: validation, the submit state machine and the
//! HTTP transport used to reach the server.

mod controller;
mod form;
mod transport;

use thiserror::Error;

pub use controller::{FormController, SubmitOutcome};
pub use form::{validate, ClientValidationError, FormState, MAX_AGE, MAX_PRICE, MIN_AGE};
pub use transport::{ApiReply, GiftApi, HttpGiftApi};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Message supplied by the server in its error envelope.
    #[error("{0}")]
    Server(String),
    #[error("Request failed with status {0}")]
    Status(u16),
    #[error("{0}")]
    Transport(String),
    #[error("An unknown error occurred")]
    Unknown,
}

/// Blocking user-facing notification, the equivalent of an alert box.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}
