pub mod adapters;
pub mod events;
pub mod input;
pub mod output;
pub mod pipeline;
pub mod ranking;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;

pub use events::{PipelineEvent, PipelineObserver, ProgressCallback};
pub use pipeline::{BatchOutcome, VisibilityPipeline};
pub use ranking::{classify_status, find_rank};
pub use traits::{PersonaSource, SerpSource};
