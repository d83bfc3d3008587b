// Seams between the pipeline and the providers.
//
// PersonaSource turns a raw query into a persona prompt. SerpSource answers a
// persona twice: once from model knowledge, once with live search. Both return
// `Option` because every provider fault is absorbed at this boundary; the
// pipeline never sees an error from them.
//
// Real implementations live in `adapters`; `testing` has in-memory mocks.

use async_trait::async_trait;

use geovis_common::SerpResult;

#[async_trait]
pub trait PersonaSource: Send + Sync {
    /// Persona text for `query`, or `None` on any failure.
    async fn generate_persona(&self, query: &str) -> Option<String>;
}

#[async_trait]
pub trait SerpSource: Send + Sync {
    /// Provider name used in logs.
    fn provider(&self) -> &'static str;

    /// Ranked results from model knowledge alone.
    async fn query_model_only(&self, persona: &str) -> Option<Vec<SerpResult>>;

    /// Ranked results with the provider's web search enabled. Must not fall
    /// back to a model-only answer when the search call fails.
    async fn query_with_search(&self, persona: &str) -> Option<Vec<SerpResult>>;
}
