//! Interactive input collaborator
//!
//! When a template needs answers, the orchestrator sends one
//! [`InputRequest`] and waits for exactly one [`InputResponse`].

use async_trait::async_trait;
use clipto_fields::FormField;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::ActionType;
use crate::error::{EngineError, Result};

/// Request to fill in the user-input fields of a text
#[derive(Debug, Clone)]
pub struct InputRequest {
    /// Text with every computed field already substituted
    pub text: String,
    /// Fields of `text`, answers pre-filled where known
    pub fields: Vec<FormField>,
    pub level: u32,
    pub action_type: ActionType,
    /// Cancelled when a newer top-level request supersedes this one
    pub cancellation: CancellationToken,
}

/// Outcome of an input request
#[derive(Debug, Clone)]
pub enum InputResponse {
    /// Answers were given. `fields` must belong to `text`.
    Filled { text: String, fields: Vec<FormField> },
    /// The user backed out
    Canceled,
}

/// Asks the user to fill in fields
#[async_trait]
pub trait InputCollaborator: Send + Sync {
    /// Resolve exactly once with answers or a cancellation
    async fn request_input(&self, request: InputRequest) -> Result<InputResponse>;
}

/// Collaborator for hosts without an input surface: every request is
/// cancelled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInput;

#[async_trait]
impl InputCollaborator for NoInput {
    async fn request_input(&self, _request: InputRequest) -> Result<InputResponse> {
        Ok(InputResponse::Canceled)
    }
}

/// A request waiting for the host to answer
#[derive(Debug)]
pub struct PendingInput {
    pub request: InputRequest,
    responder: oneshot::Sender<InputResponse>,
}

impl PendingInput {
    /// Send the response. Ignored if the engine stopped waiting.
    pub fn respond(self, response: InputResponse) {
        let _ = self.responder.send(response);
    }

    /// Answer with updated fields for the request's own text
    pub fn fill(self, fields: Vec<FormField>) {
        let text = self.request.text.clone();
        self.respond(InputResponse::Filled { text, fields });
    }

    /// Cancel the request
    pub fn cancel(self) {
        self.respond(InputResponse::Canceled);
    }
}

/// Forwards requests over an mpsc channel so hosts can answer them from
/// their own event loop. Dropping a [`PendingInput`] counts as a cancel.
#[derive(Debug, Clone)]
pub struct ChannelInputCollaborator {
    sender: mpsc::Sender<PendingInput>,
}

impl ChannelInputCollaborator {
    /// Create the collaborator and the receiving end for the host
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<PendingInput>) {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl InputCollaborator for ChannelInputCollaborator {
    async fn request_input(&self, request: InputRequest) -> Result<InputResponse> {
        let (responder, response) = oneshot::channel();
        self.sender
            .send(PendingInput { request, responder })
            .await
            .map_err(|_| EngineError::InputUnavailable("input channel closed".to_string()))?;

        match response.await {
            Ok(response) => Ok(response),
            Err(_) => {
                debug!("Input responder dropped, treating as cancel");
                Ok(InputResponse::Canceled)
            }
        }
    }
}
