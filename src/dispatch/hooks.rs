use crate::errors::Error;

use super::PendingRequest;

/// Runs right before a request goes on the wire.
pub trait BeforeSend {
    fn before_send(&self, request: PendingRequest) -> PendingRequest;
}

/// What to do with a failed request.
#[derive(Debug)]
pub enum Outcome {
    /// Hand the error back to the caller unchanged.
    Propagate(Error),
    /// Obtain a fresh credential and send the (already marked) request once more.
    Refresh(PendingRequest),
}

pub trait OnError {
    fn on_error(&self, error: Error, request: PendingRequest) -> Outcome;
}
