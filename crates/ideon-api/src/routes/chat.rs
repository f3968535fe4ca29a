use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiError, ApiResult},
    middleware::auth::Claims,
    routes::ideas::find_idea,
    state::AppState,
};
use ideon_agent::IdeaContext;
use ideon_llm::Message;
use ideon_persist::{ChatMessageDoc, ChatRole};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub idea_id: String,
    pub response: String,
}

/// One chat turn grounded on a stored idea
///
/// The stored transcript is replayed to the agent, then both the user
/// message and the reply are appended to it.
pub async fn chat_with_idea(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(req): Json<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    let message = req.message.trim();
    if message.is_empty() {
        return Err(ApiError::Validation("Message must not be empty".to_string()));
    }

    let idea = find_idea(&state, &claims, &id).await?;

    let stored_history = state.persist.chat().history(idea.id, &claims.sub).await?;
    let history: Vec<Message> = stored_history
        .iter()
        .map(|msg| match msg.role {
            ChatRole::User => Message::human(msg.content.clone()),
            ChatRole::Agent => Message::ai(msg.content.clone()),
        })
        .collect();

    let context = IdeaContext {
        description: idea.description.clone(),
        roi_score: idea.roi_score,
        effort_score: idea.effort_score,
    };

    let reply = state
        .chat_agent
        .reply(&context, &history, message)
        .await?;

    state
        .persist
        .chat()
        .append(&ChatMessageDoc::new(
            idea.id,
            &claims.sub,
            ChatRole::User,
            message,
        ))
        .await?;
    state
        .persist
        .chat()
        .append(&ChatMessageDoc::new(
            idea.id,
            &claims.sub,
            ChatRole::Agent,
            reply.clone(),
        ))
        .await?;

    Ok(Json(ChatResponse {
        idea_id: idea.id.to_hex(),
        response: reply,
    }))
}
