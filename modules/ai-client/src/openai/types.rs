use serde::{Deserialize, Serialize};

// =============================================================================
// Chat Completion
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Role {
    System,
    User,
    /// Only ever read back from replies.
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct WireMessage {
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl WireMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: Some(content.into()),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Some(content.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
        }
    }

    pub fn message(mut self, message: WireMessage) -> Self {
        self.messages.push(message);
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Choice {
    pub message: WireMessage,
}

// =============================================================================
// Responses API (web search)
// =============================================================================

/// Approximate location the `web_search` tool scopes its results to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserLocation {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub city: String,
    pub country: String,
}

impl UserLocation {
    pub fn approximate(city: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            kind: "approximate",
            city: city.into(),
            country: country.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct WebSearchTool {
    #[serde(rename = "type")]
    pub tool_type: &'static str,
    pub user_location: UserLocation,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ResponsesRequest {
    pub model: String,
    pub input: String,
    pub tools: Vec<WebSearchTool>,
}

impl ResponsesRequest {
    pub fn web_search(
        model: impl Into<String>,
        input: impl Into<String>,
        location: UserLocation,
    ) -> Self {
        Self {
            model: model.into(),
            input: input.into(),
            tools: vec![WebSearchTool {
                tool_type: "web_search",
                user_location: location,
            }],
        }
    }
}
