use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::net::TcpListener;

use deskfolio_core::{
    ChatMessage, ChatRequest, ChatSession, CompletionGateway, GatewayError, HttpGateway,
    Persona, PersonaGateway, TextGenerator,
};

/// Upstream double: answers from a script and remembers every prompt
#[derive(Clone, Default)]
struct FakeUpstream {
    fail: bool,
    prompts: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl TextGenerator for FakeUpstream {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail {
            anyhow::bail!("upstream exploded with secret detail");
        }
        Ok("Hello".to_string())
    }
}

/// Serve the router on a loopback port and return its chat URL
async fn spawn_gateway(upstream: FakeUpstream) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let gateway = Arc::new(PersonaGateway::new(upstream, Persona::default()));
    tokio::spawn(deskfolio_gateway::serve(listener, gateway));
    format!("http://{}{}", addr, deskfolio_gateway::CHAT_PATH)
}

#[tokio::test]
async fn test_reply_round_trip() {
    let upstream = FakeUpstream::default();
    let url = spawn_gateway(upstream.clone()).await;
    let client = HttpGateway::new(url);

    let reply = client
        .complete(ChatRequest {
            messages: vec![ChatMessage::user("Hi")],
        })
        .await
        .unwrap();

    assert_eq!(reply, "Hello");
    let prompts = upstream.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].ends_with("User's message: Hi\n\nResponse:"));
}

#[tokio::test]
async fn test_upstream_failure_is_500_without_detail() {
    let url = spawn_gateway(FakeUpstream {
        fail: true,
        ..FakeUpstream::default()
    })
    .await;
    let client = HttpGateway::new(url);

    let err = client
        .complete(ChatRequest {
            messages: vec![ChatMessage::user("Hi")],
        })
        .await
        .unwrap_err();

    match err {
        GatewayError::Status { status, error } => {
            assert_eq!(status, 500);
            assert_eq!(error.as_deref(), Some(deskfolio_gateway::GENERATION_FAILED));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_conversation_is_400() {
    let upstream = FakeUpstream::default();
    let url = spawn_gateway(upstream.clone()).await;
    let client = HttpGateway::new(url);

    let err = client
        .complete(ChatRequest { messages: vec![] })
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Status { status: 400, .. }));
    assert!(upstream.prompts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_400_with_error() {
    let url = spawn_gateway(FakeUpstream::default()).await;

    let response = reqwest::Client::new()
        .post(&url)
        .header("content-type", "application/json")
        .body("{\"messages\": \"not a list\"}")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_chat_session_against_live_gateway() {
    let url = spawn_gateway(FakeUpstream::default()).await;
    let client = HttpGateway::new(url);
    let mut session = ChatSession::new(Persona::default());

    assert!(session.submit("Hi", &client).await);

    let transcript = session.transcript();
    assert_eq!(transcript.len(), 3);
    assert_eq!(transcript[1], ChatMessage::user("Hi"));
    assert_eq!(transcript[2], ChatMessage::assistant("Hello"));
}

#[tokio::test]
async fn test_chat_session_falls_back_when_gateway_down() {
    // Bind then drop to get a port nobody is listening on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpGateway::new(format!("http://{}/api/chat", addr));
    let mut session = ChatSession::new(Persona::default());
    session.submit("Hi", &client).await;

    let last = session.transcript().last().unwrap();
    assert_eq!(last.content, Persona::default().fallback_message());
}
