//! Provider adapters against a mock HTTP server.

use std::sync::Arc;

use geovis_common::{Config, PromptTemplates};
use geovis_tracker::adapters::{GeminiAdapter, OpenAiAdapter};
use geovis_tracker::{PersonaSource, SerpSource};
use mockito::Matcher;
use serde_json::json;

fn config() -> Arc<Config> {
    Arc::new(
        Config::new("sk-test", "g-key", "pizza.at")
            .with_location("Vienna, Austria")
            .with_language("de")
            .with_prompts(PromptTemplates {
                persona_system: "You live in {location}.".into(),
                openai_no_tools_system: "Simulate a search engine in {location}.".into(),
                openai_no_tools_user: "Search: {query}".into(),
                openai_with_tools_system: "Search the web near {location}.".into(),
                openai_with_tools_user: "Query: {query}".into(),
                gemini_no_grounding: "List sites for {query} in {location}".into(),
                gemini_with_grounding: "Search {query}".into(),
            }),
    )
}

fn chat_body(content: &str) -> String {
    json!({"choices": [{"message": {"role": "assistant", "content": content}}]}).to_string()
}

fn gemini_path() -> Matcher {
    Matcher::Regex(r"^/models/gemini-2\.5-flash:generateContent".to_string())
}

#[tokio::test]
async fn openai_persona_sends_language_instruction() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({
            "messages": [
                {
                    "role": "system",
                    "content": "You live in Vienna, Austria.\n\nIMPORTANT: You MUST return the result in the language code: DE"
                },
                {"role": "user", "content": "pizza wien"}
            ]
        })))
        .with_status(200)
        .with_body(chat_body("Wo gibt es die beste Pizza in Wien?"))
        .create_async()
        .await;

    let adapter = OpenAiAdapter::new(config()).with_base_url(server.url());
    let persona = adapter.generate_persona("pizza wien").await;

    assert_eq!(persona.as_deref(), Some("Wo gibt es die beste Pizza in Wien?"));
    mock.assert_async().await;
}

#[tokio::test]
async fn openai_persona_failure_is_none() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_body(r#"{"error": {"message": "bad key"}}"#)
        .create_async()
        .await;

    let adapter = OpenAiAdapter::new(config()).with_base_url(server.url());
    assert!(adapter.generate_persona("pizza wien").await.is_none());
}

#[tokio::test]
async fn openai_model_only_parses_serp_reply() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({
            "messages": [
                {"role": "system", "content": "Simulate a search engine in Vienna, Austria."},
                {"role": "user", "content": "Search: best pizza"}
            ]
        })))
        .with_status(200)
        .with_body(chat_body(
            "Here you go:\n```json\n[{\"rank\":1,\"url\":\"https://www.pizza.at/menu\"},{\"rank\":2,\"link\":\"https://falstaff.com\"}]\n```",
        ))
        .create_async()
        .await;

    let adapter = OpenAiAdapter::new(config()).with_base_url(server.url());
    let results = adapter.query_model_only("best pizza").await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].domain, "pizza.at");
    assert_eq!(results[1].url, "https://falstaff.com");
    mock.assert_async().await;
}

#[tokio::test]
async fn openai_model_only_without_json_is_none() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(chat_body("I cannot browse the web."))
        .create_async()
        .await;

    let adapter = OpenAiAdapter::new(config()).with_base_url(server.url());
    assert!(adapter.query_model_only("best pizza").await.is_none());
}

#[tokio::test]
async fn openai_search_uses_responses_api_with_city() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/responses")
        .match_body(Matcher::PartialJson(json!({
            "input": "Search the web near Vienna, Austria.\n\nQuery: best pizza",
            "tools": [{
                "type": "web_search",
                "user_location": {"type": "approximate", "city": "Vienna", "country": "AT"}
            }]
        })))
        .with_status(200)
        .with_body(json!({"output_text": "[{\"rank\": \"3\", \"url\": \"https://pizza.at\"}]"}).to_string())
        .create_async()
        .await;

    let adapter = OpenAiAdapter::new(config()).with_base_url(server.url());
    let results = adapter.query_with_search("best pizza").await.unwrap();

    assert_eq!(results[0].rank, 3);
    assert_eq!(results[0].domain, "pizza.at");
    mock.assert_async().await;
}

#[tokio::test]
async fn openai_search_failure_does_not_fall_back() {
    let mut server = mockito::Server::new_async().await;
    let responses = server
        .mock("POST", "/responses")
        .with_status(500)
        .create_async()
        .await;
    let chat = server
        .mock("POST", "/chat/completions")
        .expect(0)
        .create_async()
        .await;

    let adapter = OpenAiAdapter::new(config()).with_base_url(server.url());
    assert!(adapter.query_with_search("best pizza").await.is_none());

    responses.assert_async().await;
    chat.assert_async().await;
}

#[tokio::test]
async fn gemini_model_only_parses_candidate_text() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", gemini_path())
        .match_query(Matcher::UrlEncoded("key".into(), "g-key".into()))
        .match_body(Matcher::PartialJson(json!({
            "contents": [{"role": "user", "parts": [{"text": "List sites for best pizza in Vienna, Austria"}]}]
        })))
        .with_status(200)
        .with_body(
            json!({"candidates": [{"content": {"parts": [{"text": "[{\"rank\":1,\"domain\":\"WWW.Pizza.at\",\"url\":\"https://pizza.at\"}]"}]}}]})
                .to_string(),
        )
        .create_async()
        .await;

    let adapter = GeminiAdapter::new(config()).with_base_url(server.url());
    let results = adapter.query_model_only("best pizza").await.unwrap();

    assert_eq!(results[0].domain, "pizza.at");
    mock.assert_async().await;
}

#[tokio::test]
async fn gemini_grounded_prefers_citations() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", gemini_path())
        .match_query(Matcher::Any)
        .match_body(Matcher::PartialJson(json!({"tools": [{"googleSearch": {}}]})))
        .with_status(200)
        .with_body(
            json!({
                "candidates": [{
                    "content": {"parts": [{"text": "[{\"rank\":1,\"url\":\"https://from-text.at\"}]"}]},
                    "groundingMetadata": {
                        "groundingChunks": [
                            {"web": {"uri": "https://vertexaisearch.cloud.google.com/grounding-api-redirect/x"}},
                            {"web": {"uri": "https://www.pizza.at/"}}
                        ]
                    }
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let adapter = GeminiAdapter::new(config()).with_base_url(server.url());
    let results = adapter.query_with_search("best pizza").await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].domain, "pizza.at");
    assert_eq!(results[0].rank, 2);
}

#[tokio::test]
async fn gemini_grounded_falls_back_to_text() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", gemini_path())
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({"candidates": [{"content": {"parts": [{"text": "[{\"rank\":1,\"url\":\"https://from-text.at\"}]"}]}}]})
                .to_string(),
        )
        .create_async()
        .await;

    let adapter = GeminiAdapter::new(config()).with_base_url(server.url());
    let results = adapter.query_with_search("best pizza").await.unwrap();

    assert_eq!(results[0].domain, "from-text.at");
}

#[tokio::test]
async fn gemini_error_status_is_none() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", gemini_path())
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let adapter = GeminiAdapter::new(config()).with_base_url(server.url());
    assert!(adapter.query_model_only("best pizza").await.is_none());
    assert!(adapter.query_with_search("best pizza").await.is_none());
}
