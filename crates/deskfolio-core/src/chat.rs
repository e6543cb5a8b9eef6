//! The terminal conversation shown on the desktop.

use chrono::{Local, NaiveDate};

use crate::error::GatewayError;
use crate::gateway::{ChatRequest, CompletionGateway};
use crate::persona::Persona;
use crate::state::ChatMessage;

pub struct ChatSession {
    persona: Persona,
    transcript: Vec<ChatMessage>,
    input: String,
    in_flight: bool,
}

impl ChatSession {
    /// New session whose transcript holds only the persona's welcome banner
    pub fn new(persona: Persona) -> Self {
        let welcome = ChatMessage::assistant(persona.welcome_message());
        Self {
            persona,
            transcript: vec![welcome],
            input: String::new(),
            in_flight: false,
        }
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut String {
        &mut self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn take_input(&mut self) -> String {
        std::mem::take(&mut self.input)
    }

    /// Record the user's message and build the outbound request.
    ///
    /// Returns `None` (leaving the transcript untouched) for blank text or
    /// while another request is outstanding.
    pub fn begin_submit(&mut self, text: &str) -> Option<ChatRequest> {
        self.begin_submit_on(text, Local::now().date_naive())
    }

    pub fn begin_submit_on(&mut self, text: &str, today: NaiveDate) -> Option<ChatRequest> {
        let text = text.trim();
        if text.is_empty() || self.in_flight {
            return None;
        }

        let mut messages = Vec::with_capacity(self.transcript.len() + 2);
        messages.push(ChatMessage::system(self.persona.system_prompt(today)));
        messages.extend(self.transcript.iter().cloned());
        messages.push(ChatMessage::user(text));

        self.transcript.push(ChatMessage::user(text));
        self.in_flight = true;

        Some(ChatRequest { messages })
    }

    /// Submit the input buffer, clearing it only when the submission is accepted
    pub fn begin_submit_input(&mut self) -> Option<ChatRequest> {
        let text = self.input.clone();
        let request = self.begin_submit(&text)?;
        self.input.clear();
        Some(request)
    }

    /// Finish the outstanding request; failures become the fallback reply
    pub fn complete(&mut self, result: Result<String, GatewayError>) {
        if !self.in_flight {
            tracing::debug!("Ignoring chat reply with no request in flight");
            return;
        }

        let reply = match result {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(error = %e, "Chat request failed");
                self.persona.fallback_message()
            }
        };

        self.transcript.push(ChatMessage::assistant(reply));
        self.in_flight = false;
    }

    /// Submit and wait for the reply. Returns whether the text was accepted.
    pub async fn submit(&mut self, text: &str, gateway: &dyn CompletionGateway) -> bool {
        let Some(request) = self.begin_submit(text) else {
            return false;
        };
        let result = gateway.complete(request).await;
        self.complete(result);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ChatRole;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeGateway {
        reply: Option<String>,
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl FakeGateway {
        fn replying(text: &str) -> Self {
            Self {
                reply: Some(text.to_string()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: None,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CompletionGateway for FakeGateway {
        async fn complete(&self, request: ChatRequest) -> Result<String, GatewayError> {
            self.requests.lock().unwrap().push(request);
            match &self.reply {
                Some(text) => Ok(text.clone()),
                None => Err(GatewayError::Status {
                    status: 500,
                    error: Some("Failed to generate response".to_string()),
                }),
            }
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_new_session_has_only_welcome() {
        let session = ChatSession::new(Persona::default());
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.transcript()[0].role, ChatRole::Assistant);
        assert_eq!(session.transcript()[0].content, Persona::default().welcome_message());
        assert!(!session.is_in_flight());
    }

    #[tokio::test]
    async fn test_success_appends_user_then_reply() {
        let gateway = FakeGateway::replying("Hello");
        let mut session = ChatSession::new(Persona::default());

        assert!(session.submit("Hi", &gateway).await);

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[1], ChatMessage::user("Hi"));
        assert_eq!(transcript[2], ChatMessage::assistant("Hello"));
        assert!(!session.is_in_flight());
    }

    #[tokio::test]
    async fn test_failure_appends_fallback() {
        let gateway = FakeGateway::failing();
        let mut session = ChatSession::new(Persona::default());

        session.submit("Hi", &gateway).await;

        let last = session.transcript().last().unwrap();
        assert_eq!(last.role, ChatRole::Assistant);
        assert_eq!(
            last.content,
            "I'm having trouble processing that. Please email me at work@akhilraghav.com"
        );
        assert!(!session.is_in_flight());
    }

    #[tokio::test]
    async fn test_blank_submission_is_ignored() {
        let gateway = FakeGateway::replying("unused");
        let mut session = ChatSession::new(Persona::default());

        assert!(!session.submit("", &gateway).await);
        assert!(!session.submit("   \t ", &gateway).await);

        assert_eq!(session.transcript().len(), 1);
        assert_eq!(gateway.calls(), 0);
    }

    #[test]
    fn test_request_shape() {
        let mut session = ChatSession::new(Persona::default());
        let request = session.begin_submit_on("  What's your stack?  ", today()).unwrap();

        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.messages[0].role, ChatRole::System);
        assert!(request.messages[0].content.contains("October 19, 2026"));
        assert_eq!(request.messages[1], session.transcript()[0]);
        assert_eq!(request.messages[2], ChatMessage::user("What's your stack?"));
        assert_eq!(session.transcript()[1], ChatMessage::user("What's your stack?"));
    }

    #[test]
    fn test_second_submit_rejected_while_in_flight() {
        let mut session = ChatSession::new(Persona::default());
        assert!(session.begin_submit_on("first", today()).is_some());
        assert!(session.begin_submit_on("second", today()).is_none());
        assert_eq!(session.transcript().len(), 2);

        session.complete(Ok("reply".to_string()));
        assert!(session.begin_submit_on("second", today()).is_some());
    }

    #[test]
    fn test_stray_reply_ignored() {
        let mut session = ChatSession::new(Persona::default());
        session.complete(Ok("unprompted".to_string()));
        session.complete(Err(GatewayError::EmptyConversation));
        assert_eq!(session.transcript().len(), 1);
        assert!(!session.is_in_flight());
    }

    #[test]
    fn test_input_cleared_only_when_accepted() {
        let mut session = ChatSession::new(Persona::default());
        session.set_input("hello");
        assert!(session.begin_submit_input().is_some());
        assert_eq!(session.input(), "");

        session.set_input("queued");
        assert!(session.begin_submit_input().is_none());
        assert_eq!(session.input(), "queued");
        assert_eq!(session.take_input(), "queued");
        assert_eq!(session.input(), "");
    }

    #[tokio::test]
    async fn test_history_grows_across_turns() {
        let gateway = FakeGateway::replying("ok");
        let mut session = ChatSession::new(Persona::default());

        session.submit("one", &gateway).await;
        session.submit("two", &gateway).await;

        let requests = gateway.requests.lock().unwrap();
        // system + welcome + one + ok + two
        assert_eq!(requests[1].messages.len(), 5);
        assert_eq!(session.transcript().len(), 5);
    }
}
