//! Conversational agents with structured replies.
//!
//! An agent is a system prompt, a response type and a running message
//! history. Each reply is parsed into the response type; its display message
//! is appended to the history so the model sees what the operator saw.

pub mod prompts;
mod responses;

pub use responses::{
    BusinessClassification, BusinessType, PackageInputsTurn, QuestionTurn, WorkflowTurn,
};

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, WizardError};
use crate::llm::{ChatMessage, ChatModel, StructuredRequest};

/// A structured reply an agent can produce
pub trait AgentResponse: DeserializeOwned {
    /// Name the schema is registered under with the provider
    const SCHEMA_NAME: &'static str;

    /// JSON schema the model must follow
    fn schema() -> Value;

    /// Text shown to the operator and kept in the history
    fn message(&self) -> &str;

    /// Intermediate state worth showing once a section is complete
    fn progress(&self) -> Option<String> {
        None
    }
}

/// A conversational agent bound to one response schema
pub struct Agent<'m, R> {
    model: &'m dyn ChatModel,
    system: String,
    history: Vec<ChatMessage>,
    schema: Value,
    _response: PhantomData<R>,
}

impl<'m, R: AgentResponse> Agent<'m, R> {
    pub fn new(model: &'m dyn ChatModel, system: impl Into<String>) -> Self {
        Self {
            model,
            system: system.into(),
            history: Vec::new(),
            schema: R::schema(),
            _response: PhantomData,
        }
    }

    /// Send a user message and parse the reply
    pub fn send(&mut self, content: &str) -> Result<R> {
        self.history.push(ChatMessage::user(content));

        let reply = self.model.complete(StructuredRequest {
            system: &self.system,
            messages: &self.history,
            schema_name: R::SCHEMA_NAME,
            schema: &self.schema,
        });

        let parsed = reply.and_then(|value| {
            serde_json::from_value::<R>(value)
                .map_err(|e| WizardError::schema(R::SCHEMA_NAME, e.to_string()))
        });

        match parsed {
            Ok(response) => {
                debug!(schema = R::SCHEMA_NAME, turns = self.history.len(), "agent replied");
                self.history
                    .push(ChatMessage::assistant(response.message()));
                Ok(response)
            }
            Err(e) => {
                self.history.pop();
                Err(e)
            }
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Role;
    use serde_json::json;
    use std::cell::RefCell;

    /// Model that replays canned values and records what it was sent
    struct Canned {
        replies: RefCell<Vec<Result<Value>>>,
        seen: RefCell<Vec<(String, usize)>>,
    }

    impl Canned {
        fn new(replies: Vec<Result<Value>>) -> Self {
            Self {
                replies: RefCell::new(replies.into_iter().rev().collect()),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl ChatModel for Canned {
        fn complete(&self, request: StructuredRequest<'_>) -> Result<Value> {
            self.seen
                .borrow_mut()
                .push((request.schema_name.to_string(), request.messages.len()));
            self.replies
                .borrow_mut()
                .pop()
                .unwrap_or_else(|| Err(WizardError::protocol("no more replies")))
        }
    }

    #[test]
    fn test_send_records_history() {
        let model = Canned::new(vec![
            Ok(json!({"user_description": "Motos", "bot_response": "¿Es correcto?", "finished": false})),
            Ok(json!({"user_description": "Motos", "bot_response": "Siguiente pregunta", "finished": true})),
        ]);
        let mut agent: Agent<QuestionTurn> = Agent::new(&model, "prompt");

        let first = agent.send("Vendo motos").unwrap();
        assert!(!first.finished);
        let second = agent.send("Sí").unwrap();
        assert!(second.finished);

        let history = agent.history();
        assert_eq!(history.len(), 4);
        assert_eq!(history[0], ChatMessage::user("Vendo motos"));
        assert_eq!(history[1].role, Role::Assistant);
        assert_eq!(history[1].content, "¿Es correcto?");
        assert_eq!(history[3].content, "Siguiente pregunta");

        let seen = model.seen.borrow();
        assert_eq!(seen[0], ("question_response".to_string(), 1));
        assert_eq!(seen[1], ("question_response".to_string(), 3));
    }

    #[test]
    fn test_schema_mismatch_rolls_back_history() {
        let model = Canned::new(vec![Ok(json!({"finished": "maybe"}))]);
        let mut agent: Agent<QuestionTurn> = Agent::new(&model, "prompt");

        let err = agent.send("hola").unwrap_err();

        assert!(matches!(err, WizardError::Schema { .. }));
        assert!(agent.history().is_empty());
    }

    #[test]
    fn test_model_error_propagates() {
        let model = Canned::new(vec![Err(WizardError::api(500, "down"))]);
        let mut agent: Agent<WorkflowTurn> = Agent::new(&model, "prompt");

        assert!(agent.send("Show me the workflow.").is_err());
        assert!(agent.history().is_empty());
        assert_eq!(agent.system_prompt(), "prompt");
    }
}
