//! HTTP front end exposing an [`Agent`] as `POST /predict`.
//!
//! Requests must carry `X-Secret-Key` matching the configured secret. Two body
//! shapes are accepted:
//!
//! * `{"prompt": "..."}` returns the agent's raw text as `{"action": ...}`.
//! * `{"valid_actions": "a,b,up", "image": "<base64>"}` prompts with the
//!   standard screen prompt and returns a validated action name.

use std::io::Cursor;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use pallet_game::screen_prompt;
use pallet_protocol::{
    Action, AgentReply, Diagnostics, PokemonAction, PredictRequest, PredictResponse,
    parse_valid_actions, resolve,
};
use thiserror::Error;
use tiny_http::{Header, Response, Server, StatusCode};
use tokio::runtime::Handle;

use crate::{Agent, Prompt, StopSignal};

pub const PREDICT_PATH: &str = "/predict";
pub const SECRET_HEADER: &str = "X-Secret-Key";

const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("a secret key is required to start the prediction server")]
    MissingSecret,

    #[error("failed to bind {addr}: {reason}")]
    Bind { addr: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Status code plus JSON body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: PredictResponse,
}

impl Reply {
    fn ok(action: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: PredictResponse::action(action),
        }
    }

    fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: PredictResponse::error(message),
        }
    }

    fn into_response(self) -> Response<Cursor<Vec<u8>>> {
        let body = serde_json::to_string(&self.body).unwrap_or_else(|_| "{}".to_string());
        let response = Response::from_string(body).with_status_code(StatusCode(self.status));
        match Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
            Ok(header) => response.with_header(header),
            Err(()) => response,
        }
    }
}

pub struct PredictServer<G> {
    agent: G,
    secret: String,
    diagnostics: Mutex<Diagnostics>,
}

impl<G: Agent> PredictServer<G> {
    pub fn new(agent: G, secret: impl Into<String>) -> Result<Self, ServerError> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(ServerError::MissingSecret);
        }

        Ok(Self {
            agent,
            secret,
            diagnostics: Mutex::new(Diagnostics::new()),
        })
    }

    /// Counters for requests answered through the validator
    pub fn diagnostics(&self) -> Diagnostics {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Answer one request
    pub async fn handle(
        &self,
        method: &str,
        path: &str,
        secret: Option<&str>,
        body: &str,
    ) -> Reply {
        if !method.eq_ignore_ascii_case("POST") || path != PREDICT_PATH {
            return Reply::error(404, "Not found");
        }

        if secret != Some(self.secret.as_str()) {
            tracing::warn!(
                path = path,
                "Rejected request with invalid or missing secret key"
            );
            return Reply::error(401, "Unauthorized - Invalid or missing secret key");
        }

        let request = match PredictRequest::parse(body) {
            Ok(request) => request,
            Err(e) => return Reply::error(400, e.to_string()),
        };

        match request {
            PredictRequest::Prompt { prompt } => self.answer_prompt(prompt).await,
            PredictRequest::Actions {
                valid_actions,
                image,
            } => self.choose_action(&valid_actions, image).await,
        }
    }

    async fn answer_prompt(&self, prompt: String) -> Reply {
        match self.agent.respond(&Prompt::text(prompt)).await {
            Ok(Some(text)) => Reply::ok(text),
            Ok(None) => Reply::error(500, "Agent returned no answer"),
            Err(e) => {
                tracing::error!(error = %e, "Agent failed to answer prompt");
                Reply::error(500, e.to_string())
            }
        }
    }

    async fn choose_action(&self, valid_actions: &str, image: Option<String>) -> Reply {
        let legal: Vec<PokemonAction> = match parse_valid_actions(valid_actions) {
            Ok(legal) => legal,
            Err(e) => return Reply::error(400, e.to_string()),
        };

        let mut prompt = Prompt::text(screen_prompt(&legal));
        if let Some(image) = image {
            prompt = prompt.with_image(image);
        }

        let reply = match self.agent.respond(&prompt).await {
            Ok(reply) => AgentReply::from(reply),
            Err(e) => {
                tracing::error!(error = %e, "Agent failed, answering with default action");
                AgentReply::Failed(e.to_string())
            }
        };

        let resolution = {
            let mut diagnostics = self
                .diagnostics
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let resolution = resolve(&reply, &legal, &mut diagnostics);
            diagnostics.record_step(resolution.action());
            resolution
        };

        Reply::ok(resolution.action().name())
    }

    /// Serve on `addr` until `stop` is raised. Blocks the calling thread;
    /// agent calls are driven on `runtime`.
    pub fn serve(
        &self,
        addr: &str,
        runtime: &Handle,
        stop: &StopSignal,
    ) -> Result<(), ServerError> {
        let server = Server::http(addr).map_err(|e| ServerError::Bind {
            addr: addr.to_string(),
            reason: e.to_string(),
        })?;
        tracing::info!(addr = addr, "Prediction server listening");

        while !stop.is_raised() {
            let Some(mut request) = server.recv_timeout(POLL_INTERVAL)? else {
                continue;
            };

            let mut body = String::new();
            let read = request.as_reader().read_to_string(&mut body);
            let reply = match read {
                Ok(_) => {
                    let method = request.method().to_string();
                    let path = request
                        .url()
                        .split('?')
                        .next()
                        .unwrap_or_default()
                        .to_string();
                    let secret = request
                        .headers()
                        .iter()
                        .find(|header| header.field.equiv(SECRET_HEADER))
                        .map(|header| header.value.as_str().to_string());

                    runtime.block_on(self.handle(&method, &path, secret.as_deref(), &body))
                }
                Err(e) => Reply::error(400, format!("unreadable body: {e}")),
            };

            tracing::debug!(status = reply.status, "Answered request");
            if let Err(e) = request.respond(reply.into_response()) {
                tracing::warn!(error = %e, "Failed to write response");
            }
        }

        tracing::info!("Prediction server stopped");
        Ok(())
    }
}
