//! Chat agent for one stored idea. The agent is stateless; the caller owns
//! history persistence and replays it on every turn.

use std::sync::Arc;

use ideon_llm::{ChatClient, ChatOptions, ChatRequest, Message};

use crate::error::EvalError;
use crate::prompts::chat_system_prompt;

/// Stored idea fields the agent grounds its answers on
#[derive(Debug, Clone)]
pub struct IdeaContext {
    pub description: String,
    pub roi_score: f64,
    pub effort_score: f64,
}

pub struct IdeaChatAgent {
    llm: Arc<dyn ChatClient>,
    model: String,
    temperature: f32,
}

impl IdeaChatAgent {
    pub fn new(llm: Arc<dyn ChatClient>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
            temperature: 0.7,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Produce the agent's reply to one user message
    pub async fn reply(
        &self,
        context: &IdeaContext,
        history: &[Message],
        user_message: &str,
    ) -> Result<String, EvalError> {
        let messages = build_turn(context, history, user_message);
        let request = ChatRequest::new(self.model.clone(), messages)
            .with_options(ChatOptions::new().temperature(self.temperature));

        let response = self.llm.chat(request).await.map_err(EvalError::Scorer)?;
        let text = response.text().map_err(EvalError::Scorer)?;
        Ok(text.to_string())
    }
}

/// System prompt, replayed history, then the new user message
fn build_turn(context: &IdeaContext, history: &[Message], user_message: &str) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Message::system(chat_system_prompt(
        &context.description,
        context.roi_score,
        context.effort_score,
    )));
    messages.extend_from_slice(history);
    messages.push(Message::human(user_message));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_starts_with_system_and_ends_with_user() {
        let context = IdeaContext {
            description: "An idea".into(),
            roi_score: 0.7,
            effort_score: 0.3,
        };
        let history = vec![Message::human("first question"), Message::ai("first answer")];

        let messages = build_turn(&context, &history, "follow-up");

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role(), "system");
        assert!(messages[0].content().contains("An idea"));
        assert_eq!(messages[1].content(), "first question");
        assert_eq!(messages[3].role(), "user");
        assert_eq!(messages[3].content(), "follow-up");
    }
}
