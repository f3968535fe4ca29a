use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Extension, Json,
};
use bson::oid::ObjectId;
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    ingest::parse_ideas_file,
    middleware::auth::Claims,
    routes::ideas::IdeaResponse,
    state::AppState,
};
use ideon_agent::{Evaluation, IdeaSubmission};
use ideon_persist::IdeaDoc;

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub status: String,
    pub filename: String,
    pub processed: usize,
    pub failed: usize,
    pub ideas: Vec<IdeaResponse>,
    pub errors: Vec<BatchRowError>,
}

#[derive(Debug, Serialize)]
pub struct BatchRowError {
    pub index: usize,
    pub error: String,
}

/// Evaluate and store a single idea
pub async fn analyze_single(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(submission): Json<IdeaSubmission>,
) -> ApiResult<(StatusCode, Json<IdeaResponse>)> {
    let submission = submission.normalized();
    let evaluation = state.evaluator.evaluate(&submission).await?;

    let idea = build_idea_doc(
        &claims.sub,
        Uuid::new_v4().to_string(),
        None,
        &submission,
        &evaluation,
    )?;
    let stored = state.persist.ideas().upsert(&idea).await?;

    Ok((StatusCode::CREATED, Json(stored.into())))
}

/// Evaluate and store a batch uploaded as a CSV or JSON file
///
/// Rows are keyed by their ordinal within the file, so re-uploading the
/// same filename overwrites the earlier batch.
pub async fn analyze_batch(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<BatchResponse>)> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("file") {
            let filename = field
                .file_name()
                .ok_or_else(|| ApiError::BadRequest("Upload is missing a filename".to_string()))?
                .to_string();
            let bytes = field.bytes().await?.to_vec();
            upload = Some((filename, bytes));
        }
    }

    let (filename, bytes) =
        upload.ok_or_else(|| ApiError::BadRequest("Missing 'file' field".to_string()))?;

    let submissions = parse_ideas_file(&filename, &bytes)?;
    if submissions.is_empty() {
        return Err(ApiError::Validation(
            "No ideas with a description found in the file".to_string(),
        ));
    }

    tracing::info!(batch = %filename, count = submissions.len(), "Batch evaluation started");

    let results = state.evaluator.evaluate_batch(&submissions).await;

    let mut ideas = Vec::new();
    let mut errors = Vec::new();

    for (index, (submission, result)) in submissions.iter().zip(results).enumerate() {
        // Batch ordinals are 1-based
        let ordinal = index + 1;
        match result {
            Ok(evaluation) => {
                let idea = build_idea_doc(
                    &claims.sub,
                    ordinal.to_string(),
                    Some(filename.clone()),
                    submission,
                    &evaluation,
                )?;
                let stored = state.persist.ideas().upsert(&idea).await?;
                ideas.push(stored.into());
            }
            Err(e) => {
                errors.push(BatchRowError {
                    index: ordinal,
                    error: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        batch = %filename,
        succeeded = ideas.len(),
        failed = errors.len(),
        "Batch evaluation finished"
    );

    Ok((
        StatusCode::CREATED,
        Json(BatchResponse {
            status: "ok".to_string(),
            filename,
            processed: ideas.len(),
            failed: errors.len(),
            ideas,
            errors,
        }),
    ))
}

fn build_idea_doc(
    user_id: &str,
    idea_id: String,
    batch: Option<String>,
    submission: &IdeaSubmission,
    evaluation: &Evaluation,
) -> ApiResult<IdeaDoc> {
    let created_at = submission.timestamp.unwrap_or_else(Utc::now);

    Ok(IdeaDoc {
        id: ObjectId::new(),
        user_id: user_id.to_string(),
        idea_id,
        batch,
        title: if submission.title.is_empty() {
            truncate_title(&submission.description)
        } else {
            submission.title.clone()
        },
        author: submission.author.clone(),
        category: submission.category.clone(),
        description: submission.description.clone(),
        effort_score: evaluation.effort.score,
        effort_label: evaluation.effort_label.clone(),
        roi_score: evaluation.roi.score,
        roi_label: evaluation.roi_label.clone(),
        score: evaluation.score,
        analysis: bson::to_bson(evaluation)?,
        created_at,
        last_updated: Utc::now(),
    })
}

/// Titles fall back to the leading words of the description
fn truncate_title(description: &str) -> String {
    let words: Vec<&str> = description.split_whitespace().take(8).collect();
    let mut title = words.join(" ");
    if description.split_whitespace().count() > 8 {
        title.push_str("...");
    }
    title
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_title() {
        assert_eq!(truncate_title("Short idea"), "Short idea");
        let long = "one two three four five six seven eight nine ten";
        assert_eq!(
            truncate_title(long),
            "one two three four five six seven eight..."
        );
    }
}
