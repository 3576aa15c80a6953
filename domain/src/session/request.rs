//! Wire body for a chat turn

use super::entities::{History, Message};
use crate::core::generation::GenerationParams;
use serde::{Deserialize, Serialize};

/// Request body posted to both the streaming and non-streaming endpoints.
///
/// ```
/// use streamchat_domain::{ChatRequest, GenerationParams, History, Message};
///
/// let mut history = History::new();
/// history.push(Message::user("Hi")).unwrap();
/// let request = ChatRequest::new(&history, &GenerationParams::default());
///
/// let body = serde_json::to_value(&request).unwrap();
/// assert_eq!(body["messages"][0]["content"], "Hi");
/// assert_eq!(body["model"], "gpt-3.5-turbo");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ChatRequest {
    pub fn new(history: &History, params: &GenerationParams) -> Self {
        Self {
            messages: history.messages().to_vec(),
            model: params.model.clone(),
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        }
    }
}
