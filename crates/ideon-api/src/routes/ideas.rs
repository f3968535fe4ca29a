use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::{
    analytics::{compute_analytics, AnalyticsResponse},
    error::{ApiError, ApiResult},
    middleware::auth::Claims,
    state::AppState,
};
use ideon_persist::{ChatMessageDoc, ChatRole, IdeaDoc};

const TOP_LIMIT: i64 = 3;

#[derive(Debug, Serialize)]
pub struct IdeaResponse {
    pub id: String,
    pub idea_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch: Option<String>,
    pub title: String,
    pub author: String,
    pub category: String,
    pub description: String,
    pub effort_score: f64,
    pub effort_label: String,
    pub roi_score: f64,
    pub roi_label: String,
    pub score: f64,
    pub analysis: serde_json::Value,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub last_updated: chrono::DateTime<chrono::Utc>,
}

impl From<IdeaDoc> for IdeaResponse {
    fn from(idea: IdeaDoc) -> Self {
        Self {
            id: idea.id.to_hex(),
            idea_id: idea.idea_id,
            batch: idea.batch,
            title: idea.title,
            author: idea.author,
            category: idea.category,
            description: idea.description,
            effort_score: idea.effort_score,
            effort_label: idea.effort_label,
            roi_score: idea.roi_score,
            roi_label: idea.roi_label,
            score: idea.score,
            analysis: idea.analysis.into_relaxed_extjson(),
            created_at: idea.created_at,
            last_updated: idea.last_updated,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AllIdeasResponse {
    pub all_ideas: Vec<IdeaResponse>,
}

#[derive(Debug, Serialize)]
pub struct TopIdeasResponse {
    pub top_3_ideas: Vec<IdeaResponse>,
}

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub idea_id: String,
    #[serde(default)]
    pub batch: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TopQuery {
    pub batch: String,
}

#[derive(Debug, Serialize)]
pub struct ChatHistoryResponse {
    pub idea_id: String,
    pub messages: Vec<ChatMessageResponse>,
}

#[derive(Debug, Serialize)]
pub struct ChatMessageResponse {
    pub role: ChatRole,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<ChatMessageDoc> for ChatMessageResponse {
    fn from(msg: ChatMessageDoc) -> Self {
        Self {
            role: msg.role,
            content: msg.content,
            created_at: msg.created_at,
        }
    }
}

/// All of the user's ideas
pub async fn list_ideas(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<AllIdeasResponse>> {
    let ideas = state.persist.ideas().list_for_user(&claims.sub).await?;
    Ok(Json(AllIdeasResponse {
        all_ideas: to_responses(ideas),
    }))
}

/// One idea by its batch ordinal
pub async fn lookup_idea(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<LookupQuery>,
) -> ApiResult<Json<IdeaResponse>> {
    let idea = state
        .persist
        .ideas()
        .lookup(&claims.sub, &query.idea_id, query.batch.as_deref())
        .await?
        .ok_or_else(|| ApiError::IdeaNotFound(query.idea_id.clone()))?;

    Ok(Json(idea.into()))
}

/// Top-scoring ideas within one batch
pub async fn top_ideas(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<TopQuery>,
) -> ApiResult<Json<TopIdeasResponse>> {
    let ideas = state
        .persist
        .ideas()
        .top_for_batch(&claims.sub, &query.batch, TOP_LIMIT)
        .await?;

    Ok(Json(TopIdeasResponse {
        top_3_ideas: to_responses(ideas),
    }))
}

/// Top-scoring ideas across every batch
pub async fn overall_top_ideas(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<TopIdeasResponse>> {
    let ideas = state
        .persist
        .ideas()
        .top_overall(&claims.sub, TOP_LIMIT)
        .await?;

    Ok(Json(TopIdeasResponse {
        top_3_ideas: to_responses(ideas),
    }))
}

/// Raw idea rows for dashboard tables
pub async fn idea_data(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<Vec<IdeaResponse>>> {
    let ideas = state.persist.ideas().list_for_user(&claims.sub).await?;
    Ok(Json(ideas.into_iter().map(IdeaResponse::from).collect()))
}

/// Aggregated analytics over the user's ideas
pub async fn idea_analytics(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<AnalyticsResponse>> {
    let ideas = state.persist.ideas().list_for_user(&claims.sub).await?;
    Ok(Json(compute_analytics(&ideas)))
}

/// One idea by its document id
pub async fn get_idea(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> ApiResult<Json<IdeaResponse>> {
    let idea = find_idea(&state, &claims, &id).await?;
    Ok(Json(idea.into()))
}

/// Chat transcript for one idea, oldest first
pub async fn idea_history(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> ApiResult<Json<ChatHistoryResponse>> {
    let idea = find_idea(&state, &claims, &id).await?;

    let messages = state.persist.chat().history(idea.id, &claims.sub).await?;

    Ok(Json(ChatHistoryResponse {
        idea_id: idea.id.to_hex(),
        messages: messages.into_iter().map(Into::into).collect(),
    }))
}

/// Delete one idea and its chat transcript
pub async fn delete_idea(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let idea = find_idea(&state, &claims, &id).await?;

    state
        .persist
        .chat()
        .delete_for_idea(idea.id, &claims.sub)
        .await?;
    let deleted = state.persist.ideas().delete(idea.id, &claims.sub).await?;

    if !deleted {
        return Err(ApiError::IdeaNotFound(id));
    }

    tracing::info!(idea_id = %idea.id, "Idea deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Delete every idea and chat message the user owns
pub async fn delete_all_ideas(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<serde_json::Value>> {
    state.persist.chat().delete_all(&claims.sub).await?;
    let deleted = state.persist.ideas().delete_all(&claims.sub).await?;

    tracing::info!(user_id = %claims.sub, deleted, "All ideas deleted");

    Ok(Json(serde_json::json!({ "deleted": deleted })))
}

pub(crate) async fn find_idea(
    state: &AppState,
    claims: &Claims,
    id: &str,
) -> ApiResult<IdeaDoc> {
    let object_id =
        ObjectId::parse_str(id).map_err(|_| ApiError::BadRequest(format!("Invalid id: {}", id)))?;

    state
        .persist
        .ideas()
        .get(object_id, &claims.sub)
        .await?
        .ok_or_else(|| ApiError::IdeaNotFound(id.to_string()))
}

fn to_responses(ideas: Vec<IdeaDoc>) -> Vec<IdeaResponse> {
    ideas.into_iter().map(IdeaResponse::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_idea() -> IdeaDoc {
        IdeaDoc {
            id: ObjectId::new(),
            user_id: "u1".into(),
            idea_id: "1".into(),
            batch: None,
            title: "Test".into(),
            author: "".into(),
            category: "Uncategorized".into(),
            description: "desc".into(),
            effort_score: 0.4,
            effort_label: "Medium".into(),
            roi_score: 0.8,
            roi_label: "High".into(),
            score: 72.0,
            analysis: bson::Bson::Document(bson::doc! { "reasoning": "fits" }),
            created_at: Utc::now(),
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn list_payload_uses_all_ideas_key() {
        let response = AllIdeasResponse {
            all_ideas: to_responses(vec![sample_idea()]),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("all_ideas").is_some());
        assert_eq!(json["all_ideas"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn ranking_payload_uses_top_3_ideas_key() {
        let response = TopIdeasResponse {
            top_3_ideas: to_responses(vec![sample_idea()]),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("top_3_ideas").is_some());
    }

    #[test]
    fn analysis_serializes_as_plain_json() {
        let response: IdeaResponse = sample_idea().into();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["analysis"]["reasoning"], "fits");
        assert!(json.get("batch").is_none());
    }
}
