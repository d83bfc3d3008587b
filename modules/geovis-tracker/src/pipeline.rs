//! Batch orchestration: persona, four-way fan-out, ranking, stats.
//!
//! Rows run strictly one after another. Within a row the four provider
//! calls run concurrently and each one is guarded on its own, so a failing
//! or panicking call only empties its own slot. A panic anywhere else in a
//! row turns that row into an `Error` result; the batch itself never fails.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use geovis_common::{
    Channel, Config, PerChannel, ProcessedResult, ProcessingStats, QueryRow, SerpResult,
};

use crate::adapters::{GeminiAdapter, OpenAiAdapter};
use crate::events::{PipelineEvent, PipelineObserver, ProgressCallback};
use crate::ranking::rank_row;
use crate::traits::{PersonaSource, SerpSource};

pub const PERSONA_FAILURE: &str = "Failed to generate persona";
pub const PROCESSING_FAILURE: &str = "Processing error";

/// Everything a batch run produced.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    /// One per started row, in input order.
    pub results: Vec<ProcessedResult>,
    pub stats: ProcessingStats,
    /// The run stopped early because the token was cancelled.
    pub cancelled: bool,
}

pub struct VisibilityPipeline {
    config: Arc<Config>,
    persona: Arc<dyn PersonaSource>,
    openai: Arc<dyn SerpSource>,
    gemini: Arc<dyn SerpSource>,
    observers: Vec<Arc<dyn PipelineObserver>>,
    stats: ProcessingStats,
}

impl VisibilityPipeline {
    pub fn new(
        config: Arc<Config>,
        persona: Arc<dyn PersonaSource>,
        openai: Arc<dyn SerpSource>,
        gemini: Arc<dyn SerpSource>,
    ) -> Self {
        Self {
            config,
            persona,
            openai,
            gemini,
            observers: Vec::new(),
            stats: ProcessingStats::default(),
        }
    }

    /// Wire the real OpenAI and Gemini adapters. Personas come from OpenAI.
    pub fn from_config(config: Arc<Config>) -> Self {
        let openai = Arc::new(OpenAiAdapter::new(config.clone()));
        let gemini = Arc::new(GeminiAdapter::new(config.clone()));
        Self::new(config, openai.clone(), openai, gemini)
    }

    /// Attach an observer. Every attached observer sees every event.
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Call `progress(index, total, query)` before each row. Stacks with
    /// any other observer.
    pub fn with_progress<F>(self, progress: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        self.with_observer(Arc::new(ProgressCallback(progress)))
    }

    /// Counters of the current or last run.
    pub fn stats(&self) -> ProcessingStats {
        self.stats
    }

    pub async fn run(&mut self, rows: &[QueryRow]) -> BatchOutcome {
        self.run_with_cancel(rows, &CancellationToken::new()).await
    }

    /// Like [`run`](Self::run), checking `cancel` between rows. Rows that
    /// have not started when cancellation is seen are skipped.
    pub async fn run_with_cancel(
        &mut self,
        rows: &[QueryRow],
        cancel: &CancellationToken,
    ) -> BatchOutcome {
        let total = rows.len();
        self.stats = ProcessingStats {
            total,
            ..ProcessingStats::default()
        };
        let mut results = Vec::with_capacity(total);
        let mut cancelled = false;

        info!(
            total,
            target_domain = %self.config.target_domain,
            "Starting visibility run"
        );

        for (i, row) in rows.iter().enumerate() {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            let index = i + 1;
            self.emit(PipelineEvent::RowStarted {
                index,
                total,
                query: row.query.clone(),
            });

            let result = match AssertUnwindSafe(self.process_row(row, index))
                .catch_unwind()
                .await
            {
                Ok(result) => result,
                Err(_) => {
                    error!(row = row.row_index, query = %row.query, "Row processing panicked");
                    let result = ProcessedResult::error(row, PROCESSING_FAILURE);
                    self.emit(PipelineEvent::StatusComputed {
                        index,
                        status: result.status,
                    });
                    result
                }
            };

            self.stats.record(result.status);
            info!(
                index,
                total,
                query = %row.query,
                status = %result.status,
                "Row finished"
            );
            self.emit(PipelineEvent::RowFinished {
                index,
                stats: self.stats,
            });
            results.push(result);

            if index < total && !self.config.rate_limit.is_zero() {
                tokio::select! {
                    _ = tokio::time::sleep(self.config.rate_limit) => {}
                    _ = cancel.cancelled() => {}
                }
            }
        }

        if cancelled {
            warn!(
                processed = self.stats.processed,
                total, "Visibility run cancelled"
            );
        }

        BatchOutcome {
            results,
            stats: self.stats,
            cancelled,
        }
    }

    async fn process_row(&self, row: &QueryRow, index: usize) -> ProcessedResult {
        let Some(persona) = self.persona.generate_persona(&row.query).await else {
            warn!(row = row.row_index, query = %row.query, "Persona generation failed");
            self.emit(PipelineEvent::PersonaFailed { index });
            let result = ProcessedResult::error(row, PERSONA_FAILURE);
            self.emit(PipelineEvent::StatusComputed {
                index,
                status: result.status,
            });
            return result;
        };

        self.emit(PipelineEvent::PersonaReady {
            index,
            persona: persona.clone(),
        });

        let (gpt_model_only, gpt_with_search, gemini_model_only, gemini_with_search) = tokio::join!(
            self.guarded(index, Channel::GptModelOnly, self.openai.query_model_only(&persona)),
            self.guarded(index, Channel::GptWithSearch, self.openai.query_with_search(&persona)),
            self.guarded(index, Channel::GeminiModelOnly, self.gemini.query_model_only(&persona)),
            self.guarded(index, Channel::GeminiWithSearch, self.gemini.query_with_search(&persona)),
        );

        let raw = PerChannel {
            gpt_model_only,
            gpt_with_search,
            gemini_model_only,
            gemini_with_search,
        };
        let (ranks, status) = rank_row(&raw, &self.config.target_domain);
        self.emit(PipelineEvent::StatusComputed { index, status });

        ProcessedResult {
            row_index: row.row_index,
            original_query: row.query.clone(),
            persona: Some(persona),
            status,
            error: None,
            results: raw.map(|_, r| r.clone().unwrap_or_default()),
            ranks,
        }
    }

    /// Await one provider call, turning a panic into `None`.
    async fn guarded<F>(&self, index: usize, channel: Channel, call: F) -> Option<Vec<SerpResult>>
    where
        F: Future<Output = Option<Vec<SerpResult>>>,
    {
        let results = match AssertUnwindSafe(call).catch_unwind().await {
            Ok(results) => results,
            Err(_) => {
                error!(%channel, "Provider call panicked");
                None
            }
        };

        self.emit(PipelineEvent::ChannelResult {
            index,
            channel,
            results: results.clone(),
        });
        results
    }

    fn emit(&self, event: PipelineEvent) {
        for observer in &self.observers {
            observer.on_event(&event);
        }
    }
}
