use serde::Serialize;

// =============================================================================
// generateContent request
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<GeminiTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            contents: vec![Content::user(text)],
            tools: Vec::new(),
            generation_config: None,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.generation_config = Some(GenerationConfig { temperature });
        self
    }

    pub fn google_search(mut self) -> Self {
        self.tools.push(GeminiTool {
            google_search: GoogleSearch {},
        });
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct Content {
    pub role: &'static str,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user",
            parts: vec![Part { text: text.into() }],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct Part {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeminiTool {
    pub google_search: GoogleSearch,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct GoogleSearch {}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct GenerationConfig {
    pub temperature: f32,
}
