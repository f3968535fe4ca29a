use ideon_llm::{ChatOptions, ChatRequest, ChatResponse, Message};

#[test]
fn test_chat_request_creation() {
    let messages = vec![Message::human("Hello")];
    let request = ChatRequest::new("gpt-4o", messages);

    assert_eq!(request.model, "gpt-4o");
    assert_eq!(request.messages.len(), 1);
}

#[test]
fn test_chat_request_with_options() {
    let messages = vec![Message::human("Hello")];
    let options = ChatOptions::new().temperature(0.7).max_tokens(100);

    let request = ChatRequest::new("gpt-4o", messages).with_options(options);

    assert_eq!(request.options.temperature, Some(0.7));
    assert_eq!(request.options.max_tokens, Some(100));
}

#[test]
fn test_chat_options_default() {
    let options = ChatOptions::default();

    assert_eq!(options.temperature, None);
    assert_eq!(options.max_tokens, None);
}

#[test]
fn test_response_text_accessor() {
    let response = ChatResponse {
        content: Some("hi".to_string()),
        usage: None,
        finish_reason: None,
        raw: serde_json::json!({}),
    };
    assert_eq!(response.text().unwrap(), "hi");

    let empty = ChatResponse {
        content: None,
        usage: None,
        finish_reason: None,
        raw: serde_json::json!({}),
    };
    assert!(empty.text().is_err());
}
