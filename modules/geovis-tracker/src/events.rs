// Pipeline milestones for progress reporting and streaming consumers.
//
// Observers only watch: nothing they do feeds back into the run.

use geovis_common::{Channel, ProcessingStats, SerpResult, VisibilityStatus};

/// One milestone of a batch run. `index` is the 1-based row position.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    RowStarted {
        index: usize,
        total: usize,
        query: String,
    },
    PersonaReady {
        index: usize,
        persona: String,
    },
    PersonaFailed {
        index: usize,
    },
    ChannelResult {
        index: usize,
        channel: Channel,
        results: Option<Vec<SerpResult>>,
    },
    StatusComputed {
        index: usize,
        status: VisibilityStatus,
    },
    RowFinished {
        index: usize,
        stats: ProcessingStats,
    },
}

pub trait PipelineObserver: Send + Sync {
    fn on_event(&self, event: &PipelineEvent);
}

/// Row-progress callback: `(index, total, query)` before each row starts.
pub struct ProgressCallback<F>(pub F);

impl<F> PipelineObserver for ProgressCallback<F>
where
    F: Fn(usize, usize, &str) + Send + Sync,
{
    fn on_event(&self, event: &PipelineEvent) {
        if let PipelineEvent::RowStarted { index, total, query } = event {
            (self.0)(*index, *total, query);
        }
    }
}
