//! The evaluation pipeline: search grounding, effort estimate, ROI estimate,
//! aggregate. Steps run strictly in sequence within one request; there is no
//! retry or partial-result caching, failures surface to the caller.

use std::sync::Arc;

use ideon_llm::{ChatClient, ChatOptions, ChatRequest, Message};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::EvalError;
use crate::extract::extract_json_block;
use crate::prompts;
use crate::scoring::{band_label, ScoreAggregator, WeightedAggregator};
use crate::search::{context_block, SearchProvider, SearchResult};
use crate::submission::IdeaSubmission;

const DEFAULT_MAX_SEARCH_RESULTS: u8 = 2;

/// Estimated implementation effort, 0 = trivial, 1 = maximal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffortEstimate {
    pub score: f64,
    pub reasoning: String,
    #[serde(default)]
    pub details: Value,
}

/// Estimated return on investment, 0..=1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoiEstimate {
    pub score: f64,
    pub reasoning: String,
    #[serde(default)]
    pub details: Value,
}

/// Full pipeline output for one idea
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub effort: EffortEstimate,
    pub effort_label: String,
    pub roi: RoiEstimate,
    pub roi_label: String,
    /// Aggregate ranking score, 0..=100
    pub score: f64,
    /// Search results the ROI estimate was grounded on
    pub context: Vec<SearchResult>,
}

pub struct Evaluator {
    llm: Arc<dyn ChatClient>,
    search: Arc<dyn SearchProvider>,
    aggregator: Box<dyn ScoreAggregator>,
    model: String,
    temperature: f32,
    max_search_results: u8,
}

impl Evaluator {
    pub fn new(
        llm: Arc<dyn ChatClient>,
        search: Arc<dyn SearchProvider>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            llm,
            search,
            aggregator: Box::new(WeightedAggregator::default()),
            model: model.into(),
            temperature: 0.7,
            max_search_results: DEFAULT_MAX_SEARCH_RESULTS,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_aggregator(mut self, aggregator: Box<dyn ScoreAggregator>) -> Self {
        self.aggregator = aggregator;
        self
    }

    pub fn with_max_search_results(mut self, max_results: u8) -> Self {
        self.max_search_results = max_results;
        self
    }

    /// Evaluate one idea end to end
    pub async fn evaluate(&self, submission: &IdeaSubmission) -> Result<Evaluation, EvalError> {
        let description = submission.description.trim();
        if description.is_empty() {
            return Err(EvalError::EmptyDescription);
        }

        tracing::info!(title = %submission.title, "Evaluating idea");

        let query = format!(
            "Market and feasibility context for the idea: {}",
            description
        );
        let results = self.search.search(&query, self.max_search_results).await?;
        let context = context_block(&results);

        let effort = self.run_effort_step(description).await?;
        let roi = self.run_roi_step(description, &context).await?;

        let score = self.aggregator.aggregate(roi.score, effort.score);

        tracing::info!(
            effort = effort.score,
            roi = roi.score,
            score,
            "Idea evaluated"
        );

        Ok(Evaluation {
            effort_label: band_label(effort.score).to_string(),
            roi_label: band_label(roi.score).to_string(),
            effort,
            roi,
            score,
            context: results,
        })
    }

    /// Evaluate a batch sequentially, one result per submission
    ///
    /// A failed idea does not abort the rest of the batch.
    pub async fn evaluate_batch(
        &self,
        submissions: &[IdeaSubmission],
    ) -> Vec<Result<Evaluation, EvalError>> {
        let mut results = Vec::with_capacity(submissions.len());
        for (idx, submission) in submissions.iter().enumerate() {
            let result = self.evaluate(submission).await;
            if let Err(ref e) = result {
                tracing::warn!(idx, error = %e, "Idea evaluation failed");
            }
            results.push(result);
        }
        results
    }

    async fn run_effort_step(&self, description: &str) -> Result<EffortEstimate, EvalError> {
        let messages = vec![
            Message::system(prompts::EFFORT_SYSTEM_PROMPT),
            Message::human(prompts::effort_prompt(description)),
        ];
        let request = ChatRequest::new(self.model.clone(), messages)
            .with_options(ChatOptions::new().temperature(self.temperature));

        let response = self.llm.chat(request).await.map_err(EvalError::Scorer)?;
        let text = response.text().map_err(EvalError::Scorer)?;
        parse_effort_response(text)
    }

    async fn run_roi_step(
        &self,
        description: &str,
        search_context: &str,
    ) -> Result<RoiEstimate, EvalError> {
        let messages = vec![
            Message::system(prompts::ROI_SYSTEM_PROMPT),
            Message::human(prompts::roi_prompt(description, search_context)),
        ];
        let request = ChatRequest::new(self.model.clone(), messages)
            .with_options(ChatOptions::new().temperature(self.temperature));

        let response = self.llm.chat(request).await.map_err(EvalError::Scorer)?;
        let text = response.text().map_err(EvalError::Scorer)?;
        parse_roi_response(text)
    }
}

#[derive(Deserialize)]
struct EffortPayload {
    effort_score: f64,
    #[serde(default)]
    reasoning: String,
    #[serde(default)]
    details: Value,
}

#[derive(Deserialize)]
struct RoiPayload {
    roi_score: f64,
    #[serde(default)]
    reasoning: String,
    #[serde(default)]
    details: Value,
}

/// Parse the effort scorer's completion into an estimate
pub fn parse_effort_response(text: &str) -> Result<EffortEstimate, EvalError> {
    let payload: EffortPayload = serde_json::from_str(extract_json_block(text))
        .map_err(|e| EvalError::MalformedResponse(format!("effort: {}", e)))?;
    Ok(EffortEstimate {
        score: payload.effort_score.clamp(0.0, 1.0),
        reasoning: payload.reasoning,
        details: payload.details,
    })
}

/// Parse the ROI scorer's completion into an estimate
pub fn parse_roi_response(text: &str) -> Result<RoiEstimate, EvalError> {
    let payload: RoiPayload = serde_json::from_str(extract_json_block(text))
        .map_err(|e| EvalError::MalformedResponse(format!("roi: {}", e)))?;
    Ok(RoiEstimate {
        score: payload.roi_score.clamp(0.0, 1.0),
        reasoning: payload.reasoning,
        details: payload.details,
    })
}
