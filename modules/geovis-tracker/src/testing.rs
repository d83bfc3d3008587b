// Test mocks for the visibility pipeline.
//
// - MockPersona (PersonaSource): query → persona map, `None` for the rest
// - MockSerp (SerpSource): fixed answers per mode, optional panics
// - RecordingObserver (PipelineObserver): keeps every event
//
// Plus helpers for building rows, results and a test config.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use geovis_common::{Config, PromptTemplates, QueryRow, SerpResult};

use crate::events::{PipelineEvent, PipelineObserver};
use crate::traits::{PersonaSource, SerpSource};

pub const TEST_DOMAIN: &str = "pizza.at";

/// Config with dummy keys, the test domain and no inter-row delay.
pub fn test_config() -> Config {
    Config::new("sk-test", "g-test", TEST_DOMAIN)
        .with_location("Vienna, Austria")
        .with_rate_limit(Duration::ZERO)
        .with_prompts(PromptTemplates {
            persona_system: "You live in {location}.".into(),
            openai_no_tools_user: "{query}".into(),
            openai_with_tools_user: "{query}".into(),
            gemini_no_grounding: "{query}".into(),
            gemini_with_grounding: "{query}".into(),
            ..PromptTemplates::default()
        })
}

pub fn rows(queries: &[&str]) -> Vec<QueryRow> {
    queries
        .iter()
        .enumerate()
        .map(|(i, q)| QueryRow::new(*q, i + 2))
        .collect()
}

/// `https://{domain}/` results ranked 1..n in the given order.
pub fn serp(domains: &[&str]) -> Vec<SerpResult> {
    domains
        .iter()
        .enumerate()
        .map(|(i, d)| SerpResult {
            rank: (i + 1) as u32,
            domain: d.to_string(),
            url: format!("https://{d}/"),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// MockPersona
// ---------------------------------------------------------------------------

/// Returns a persona only for registered queries.
#[derive(Default)]
pub struct MockPersona {
    personas: HashMap<String, String>,
    calls: AtomicUsize,
}

impl MockPersona {
    pub fn new() -> Self {
        Self::default()
    }

    /// Persona "As a local: {query}" for each query.
    pub fn echoing(queries: &[&str]) -> Self {
        queries
            .iter()
            .fold(Self::new(), |m, q| m.on_query(q, &format!("As a local: {q}")))
    }

    pub fn on_query(mut self, query: &str, persona: &str) -> Self {
        self.personas.insert(query.to_string(), persona.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PersonaSource for MockPersona {
    async fn generate_persona(&self, query: &str) -> Option<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.personas.get(query).cloned()
    }
}

// ---------------------------------------------------------------------------
// MockSerp
// ---------------------------------------------------------------------------

/// One answer for a mode.
#[derive(Clone, Default)]
pub enum MockAnswer {
    Results(Vec<SerpResult>),
    #[default]
    Nothing,
    Panic,
}

impl MockAnswer {
    fn resolve(&self, provider: &str) -> Option<Vec<SerpResult>> {
        match self {
            MockAnswer::Results(results) => Some(results.clone()),
            MockAnswer::Nothing => None,
            MockAnswer::Panic => panic!("{provider} mock told to panic"),
        }
    }
}

/// Same answers for every persona; counts calls per mode.
#[derive(Default)]
pub struct MockSerp {
    model_only: MockAnswer,
    with_search: MockAnswer,
    model_only_calls: AtomicUsize,
    with_search_calls: AtomicUsize,
}

impl MockSerp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model_only(mut self, answer: MockAnswer) -> Self {
        self.model_only = answer;
        self
    }

    pub fn with_search(mut self, answer: MockAnswer) -> Self {
        self.with_search = answer;
        self
    }

    pub fn calls(&self) -> usize {
        self.model_only_calls.load(Ordering::SeqCst) + self.with_search_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SerpSource for MockSerp {
    fn provider(&self) -> &'static str {
        "mock"
    }

    async fn query_model_only(&self, _persona: &str) -> Option<Vec<SerpResult>> {
        self.model_only_calls.fetch_add(1, Ordering::SeqCst);
        self.model_only.resolve(self.provider())
    }

    async fn query_with_search(&self, _persona: &str) -> Option<Vec<SerpResult>> {
        self.with_search_calls.fetch_add(1, Ordering::SeqCst);
        self.with_search.resolve(self.provider())
    }
}

// ---------------------------------------------------------------------------
// RecordingObserver
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<PipelineEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl PipelineObserver for RecordingObserver {
    fn on_event(&self, event: &PipelineEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
