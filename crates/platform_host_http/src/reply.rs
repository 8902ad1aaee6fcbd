//! OpenAI-compatible HTTP implementation of [`ReplyService`].

use platform_host::{ReplyError, ReplyFuture, ReplyRequest, ReplyResponse, ReplyService};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::ReplyEndpointConfig;

/// Reply collaborator that POSTs chat-completions requests with a bearer credential.
#[derive(Clone)]
pub struct HttpReplyService {
    client: Client,
    config: ReplyEndpointConfig,
}

impl HttpReplyService {
    /// Creates a service with a default HTTP client.
    pub fn new(config: ReplyEndpointConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Creates a service sharing an existing HTTP client.
    pub fn with_client(client: Client, config: ReplyEndpointConfig) -> Self {
        Self { client, config }
    }

    /// Creates a service configured from the process environment.
    pub fn from_env() -> Self {
        Self::new(ReplyEndpointConfig::from_env())
    }

    /// Returns the active endpoint configuration.
    pub fn config(&self) -> &ReplyEndpointConfig {
        &self.config
    }

    async fn send(&self, request: &ReplyRequest) -> Result<ReplyResponse, ReplyError> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(ReplyError::MissingCredential);
        };
        let body = build_completion_request(&self.config.model, request);

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| ReplyError::Unreachable(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "reply endpoint rejected request");
            return Err(ReplyError::Status {
                code: status.as_u16(),
            });
        }

        let raw = response
            .text()
            .await
            .map_err(|err| ReplyError::Unreachable(err.to_string()))?;
        parse_completion_body(&raw)
    }
}

impl ReplyService for HttpReplyService {
    fn request_reply<'a>(
        &'a self,
        request: &'a ReplyRequest,
    ) -> ReplyFuture<'a, Result<ReplyResponse, ReplyError>> {
        Box::pin(self.send(request))
    }
}

impl std::fmt::Debug for HttpReplyService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpReplyService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<CompletionMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct CompletionMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

fn build_completion_request<'a>(model: &'a str, request: &'a ReplyRequest) -> CompletionRequest<'a> {
    let mut messages = Vec::with_capacity(request.history.len() + 1);
    messages.push(CompletionMessage {
        role: "system",
        content: &request.system_persona,
    });
    messages.extend(request.history.iter().map(|message| CompletionMessage {
        role: message.role.as_str(),
        content: &message.content,
    }));
    CompletionRequest { model, messages }
}

fn parse_completion_body(raw: &str) -> Result<ReplyResponse, ReplyError> {
    let parsed: CompletionResponse =
        serde_json::from_str(raw).map_err(|err| ReplyError::Malformed(err.to_string()))?;
    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| ReplyError::Malformed("response carried no content".to_string()))?;
    Ok(ReplyResponse { content })
}
