//! The chat gateway: the wire contract, the HTTP client the terminal uses,
//! and the persona-aware responder that sits behind `POST /api/chat`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::ai::TextGenerator;
use crate::error::GatewayError;
use crate::persona::Persona;
use crate::state::ChatMessage;

/// Body of `POST /api/chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

/// Successful gateway reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub message: String,
}

/// Error body returned with any non-200 status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatFailure {
    pub error: String,
}

/// Anything that can turn a conversation into one assistant reply
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    async fn complete(&self, request: ChatRequest) -> Result<String, GatewayError>;
}

/// Client for a remote gateway
#[derive(Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    url: String,
}

impl HttpGateway {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CompletionGateway for HttpGateway {
    async fn complete(&self, request: ChatRequest) -> Result<String, GatewayError> {
        let response = self.client.post(&self.url).json(&request).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if status != reqwest::StatusCode::OK {
            let error = serde_json::from_str::<ChatFailure>(&body)
                .ok()
                .map(|failure| failure.error);
            return Err(GatewayError::Status {
                status: status.as_u16(),
                error,
            });
        }

        let reply: ChatReply =
            serde_json::from_str(&body).map_err(|e| GatewayError::Decode(e.to_string()))?;
        Ok(reply.message)
    }
}

/// Answers as the persona using an upstream text model.
///
/// Only the latest message of the conversation reaches the model, wrapped in
/// the persona block; earlier turns and the client's system prompt are ignored.
pub struct PersonaGateway<T> {
    generator: T,
    persona: Persona,
}

impl<T: TextGenerator> PersonaGateway<T> {
    pub fn new(generator: T, persona: Persona) -> Self {
        Self { generator, persona }
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    /// Upstream prompt for a conversation
    pub fn prompt_for(&self, request: &ChatRequest) -> Result<String, GatewayError> {
        let latest = request
            .messages
            .last()
            .ok_or(GatewayError::EmptyConversation)?;

        Ok(format!(
            "{}\n\nUser's message: {}\n\nResponse:",
            self.persona.persona_block(),
            latest.content
        ))
    }

    pub async fn respond(&self, request: &ChatRequest) -> Result<String, GatewayError> {
        let prompt = self.prompt_for(request)?;
        self.generator
            .generate(&prompt)
            .await
            .map_err(|e| GatewayError::Upstream(format!("{e:#}")))
    }
}

#[async_trait]
impl<T: TextGenerator> CompletionGateway for PersonaGateway<T> {
    async fn complete(&self, request: ChatRequest) -> Result<String, GatewayError> {
        self.respond(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records prompts and answers from a script
    struct ScriptedGenerator {
        reply: anyhow::Result<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn ok(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(anyhow::anyhow!("quota exceeded")),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(anyhow::anyhow!("{e}")),
            }
        }
    }

    fn conversation() -> ChatRequest {
        ChatRequest {
            messages: vec![
                ChatMessage::system("system rules"),
                ChatMessage::assistant("Welcome"),
                ChatMessage::user("What do you do?"),
            ],
        }
    }

    #[test]
    fn test_request_wire_format() {
        let request = ChatRequest {
            messages: vec![ChatMessage::user("Hi")],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"messages": [{"role": "user", "content": "Hi"}]})
        );
    }

    #[test]
    fn test_prompt_uses_only_latest_message() {
        let gateway = PersonaGateway::new(ScriptedGenerator::ok(""), Persona::default());
        let prompt = gateway.prompt_for(&conversation()).unwrap();

        assert!(prompt.starts_with(&gateway.persona().persona_block()));
        assert!(prompt.ends_with("\n\nUser's message: What do you do?\n\nResponse:"));
        assert!(!prompt.contains("system rules"));
        assert!(!prompt.contains("Welcome"));
    }

    #[tokio::test]
    async fn test_respond_returns_generator_text() {
        let gateway = PersonaGateway::new(ScriptedGenerator::ok("I build things."), Persona::default());
        let reply = gateway.complete(conversation()).await.unwrap();
        assert_eq!(reply, "I build things.");
        assert_eq!(gateway.generator.prompts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_conversation_rejected_without_upstream_call() {
        let gateway = PersonaGateway::new(ScriptedGenerator::ok("unused"), Persona::default());
        let err = gateway
            .complete(ChatRequest { messages: vec![] })
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::EmptyConversation));
        assert!(gateway.generator.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upstream_failure_maps_to_upstream_error() {
        let gateway = PersonaGateway::new(ScriptedGenerator::failing(), Persona::default());
        let err = gateway.complete(conversation()).await.unwrap_err();
        match err {
            GatewayError::Upstream(message) => assert!(message.contains("quota exceeded")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_gemini_failure_keeps_api_key_out_of_error() {
        use crate::ai::{GeminiClient, UpstreamClient, UpstreamModel};

        let client = GeminiClient::with_base_url("SECRET-KEY-123", "http://127.0.0.1:1");
        let upstream = UpstreamModel::new(UpstreamClient::Gemini(client), "gemini-2.0-flash");
        let gateway = PersonaGateway::new(upstream, Persona::default());

        let err = gateway.complete(conversation()).await.unwrap_err();
        assert!(matches!(err, GatewayError::Upstream(_)));
        assert!(!err.to_string().contains("SECRET-KEY-123"));
    }

    #[tokio::test]
    async fn test_http_gateway_unreachable_is_transport_error() {
        // Port 1 on loopback refuses connections
        let gateway = HttpGateway::new("http://127.0.0.1:1/api/chat");
        let err = gateway.complete(conversation()).await.unwrap_err();
        assert!(matches!(err, GatewayError::Transport(_)));
    }
}
