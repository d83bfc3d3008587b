//! HTTP-level tests for the provider clients against a local mock server.

use ai_client::{AiError, ChatAgent, Gemini, OpenAi, UserLocation};
use mockito::Matcher;
use serde_json::json;

#[tokio::test]
async fn openai_chat_completion_returns_first_choice() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_body(Matcher::PartialJson(json!({
            "model": "gpt-5-mini",
            "messages": [
                {"role": "system", "content": "You are a local."},
                {"role": "user", "content": "pizza vienna"}
            ]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"choices": [{"message": {"role": "assistant", "content": "Where can I get pizza?"}}]})
                .to_string(),
        )
        .create_async()
        .await;

    let ai = OpenAi::new("sk-test", "gpt-5-mini").with_base_url(server.url());
    let reply = ai
        .chat_completion("You are a local.", "pizza vienna")
        .await
        .unwrap();

    assert_eq!(reply, "Where can I get pizza?");
    mock.assert_async().await;
}

#[tokio::test]
async fn openai_non_success_is_api_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(429)
        .with_body("slow down")
        .create_async()
        .await;

    let ai = OpenAi::new("sk-test", "gpt-5-mini").with_base_url(server.url());
    let err = ai.chat_completion("s", "u").await.unwrap_err();

    let ai_err = err.downcast_ref::<AiError>().expect("classified error");
    assert_eq!(ai_err.status(), Some(429));
}

#[tokio::test]
async fn openai_empty_content_is_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(json!({"choices": [{"message": {"role": "assistant", "content": ""}}]}).to_string())
        .create_async()
        .await;

    let ai = OpenAi::new("sk-test", "gpt-5-mini").with_base_url(server.url());
    let err = ai.chat_completion("s", "u").await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AiError>(),
        Some(AiError::EmptyResponse("OpenAI"))
    ));
}

#[tokio::test]
async fn openai_malformed_json_is_parse_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body("<html>gateway</html>")
        .create_async()
        .await;

    let ai = OpenAi::new("sk-test", "gpt-5-mini").with_base_url(server.url());
    let err = ai.chat_completion("s", "u").await.unwrap_err();
    assert!(matches!(err.downcast_ref::<AiError>(), Some(AiError::Parse(_))));
}

#[tokio::test]
async fn openai_web_search_sends_location_and_reads_output() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/responses")
        .match_body(Matcher::PartialJson(json!({
            "model": "gpt-5-mini",
            "tools": [{
                "type": "web_search",
                "user_location": {"type": "approximate", "city": "Vienna", "country": "AT"}
            }]
        })))
        .with_status(200)
        .with_body(
            json!({
                "output": [
                    {"type": "web_search_call"},
                    {"type": "message", "content": [{"type": "output_text", "text": "[{\"rank\":1,\"url\":\"https://a.at\"}]"}]}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let ai = OpenAi::new("sk-test", "gpt-5-mini").with_base_url(server.url());
    let text = ai
        .web_search_text("sys\n\nuser", UserLocation::approximate("Vienna", "AT"))
        .await
        .unwrap();

    assert_eq!(text, "[{\"rank\":1,\"url\":\"https://a.at\"}]");
    mock.assert_async().await;
}

#[tokio::test]
async fn gemini_generate_text_uses_key_query_param() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock(
            "POST",
            Matcher::Regex(r"^/models/gemini-2\.5-flash:generateContent".to_string()),
        )
        .match_query(Matcher::UrlEncoded("key".into(), "g-key".into()))
        .match_body(Matcher::PartialJson(json!({
            "contents": [{"role": "user", "parts": [{"text": "list sites"}]}]
        })))
        .with_status(200)
        .with_body(json!({"candidates": [{"content": {"parts": [{"text": "hello"}]}}]}).to_string())
        .create_async()
        .await;

    let ai = Gemini::new("g-key", "gemini-2.5-flash").with_base_url(server.url());
    assert_eq!(ai.generate_text("list sites").await.unwrap(), "hello");
    mock.assert_async().await;
}

#[tokio::test]
async fn gemini_grounded_request_enables_google_search() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock(
            "POST",
            Matcher::Regex(r"^/models/gemini-2\.5-flash:generateContent".to_string()),
        )
        .match_query(Matcher::Any)
        .match_body(Matcher::PartialJson(json!({"tools": [{"googleSearch": {}}]})))
        .with_status(200)
        .with_body(json!({"candidates": [{"groundingMetadata": {"groundingChunks": []}}]}).to_string())
        .create_async()
        .await;

    let ai = Gemini::new("g-key", "gemini-2.5-flash").with_base_url(server.url());
    let body = ai.generate_grounded("search").await.unwrap();
    assert!(body["candidates"][0].get("groundingMetadata").is_some());
    mock.assert_async().await;
}

#[tokio::test]
async fn gemini_server_error_is_api_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", Matcher::Any)
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let ai = Gemini::new("g-key", "gemini-2.5-flash").with_base_url(server.url());
    let err = ai.generate_text("user").await.unwrap_err();
    assert_eq!(err.downcast_ref::<AiError>().and_then(AiError::status), Some(500));
}
