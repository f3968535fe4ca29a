use thiserror::Error;

/// Pipeline failures, surfaced to the API layer without retry
#[derive(Error, Debug)]
pub enum EvalError {
    #[error("Search provider error: {0}")]
    Search(String),

    #[error("Scorer call failed: {0}")]
    Scorer(#[source] anyhow::Error),

    #[error("Malformed scorer response: {0}")]
    MalformedResponse(String),

    #[error("Idea has no description")]
    EmptyDescription,
}
