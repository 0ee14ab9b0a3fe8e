use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::api::GiftResponse;

use super::form::{validate, ClientValidationError, FormState};
use super::transport::{ApiReply, GiftApi};
use super::{ClientError, Notifier};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A request was already in flight; this submission was dropped.
    Ignored,
    Invalid(ClientValidationError),
    Completed(String),
    Failed(ClientError),
}

/// Drives one gift form: validates, guards against overlapping submissions,
/// talks to the server and keeps the last result for display.
pub struct FormController<A, N> {
    api: A,
    notifier: N,
    in_flight: AtomicBool,
    result: Mutex<Option<String>>,
}

/// Clears the in-flight flag when dropped, whatever path the submit took.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<A: GiftApi, N: Notifier> FormController<A, N> {
    pub fn new(api: A, notifier: N) -> Self {
        Self {
            api,
            notifier,
            in_flight: AtomicBool::new(false),
            result: Mutex::new(None),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn result(&self) -> Option<String> {
        self.result
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub async fn submit(&self, form: &FormState) -> SubmitOutcome {
        if self.is_loading() {
            tracing::debug!("submission dropped, request already in flight");
            return SubmitOutcome::Ignored;
        }

        let request = match validate(form) {
            Ok(request) => request,
            Err(err) => {
                self.notifier.notify(&err.to_string());
                return SubmitOutcome::Invalid(err);
            }
        };

        let Some(_guard) = self.begin() else {
            return SubmitOutcome::Ignored;
        };

        match self.api.generate(&request).await.and_then(into_result) {
            Ok(result) => {
                *self.result.lock().unwrap_or_else(PoisonError::into_inner) = Some(result.clone());
                SubmitOutcome::Completed(result)
            }
            Err(err) => {
                tracing::error!(error = %err, "gift request failed");
                self.notifier.notify(&err.to_string());
                SubmitOutcome::Failed(err)
            }
        }
    }

    fn begin(&self) -> Option<InFlight<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(&self.in_flight))
    }
}

fn into_result(reply: ApiReply) -> Result<String, ClientError> {
    match (reply.status, reply.body) {
        (200, Some(GiftResponse::Success { result })) => Ok(result),
        (200, _) => Err(ClientError::Unknown),
        (_, Some(GiftResponse::Failure { error })) if !error.message.is_empty() => {
            Err(ClientError::Server(error.message))
        }
        (status, _) => Err(ClientError::Status(status)),
    }
}
