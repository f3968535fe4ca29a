mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use ideon_agent::EvalError;
    use ideon_api::error::ApiError;

    #[tokio::test]
    async fn test_bad_request_maps_to_400() {
        let response = ApiError::BadRequest("Test error".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_validation_maps_to_422() {
        let response = ApiError::Validation("Missing field".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_401() {
        let response = ApiError::Unauthorized("No token".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_not_found_maps_to_404() {
        let response = ApiError::IdeaNotFound("abc".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = ApiError::UserNotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_empty_description_is_a_client_error() {
        let response = ApiError::Upstream(EvalError::EmptyDescription).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_pipeline_failures_map_to_502() {
        let error = EvalError::MalformedResponse("no json".to_string());
        let response = ApiError::Upstream(error).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_email_taken_maps_to_400() {
        let response = ApiError::EmailTaken.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // Every rejection, auth middleware included, carries the same JSON body.
    #[tokio::test]
    async fn test_unauthorized_body_is_json_error() {
        let response = ApiError::Unauthorized("Missing Authorization header".to_string())
            .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Unauthorized: Missing Authorization header");
    }
}
