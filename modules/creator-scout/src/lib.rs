pub mod apify;
pub mod config;
pub mod events;
pub mod pipeline;
pub mod record;
pub mod sink;
pub mod traits;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use apify::ApifyScrapers;
pub use config::{ActorInput, Config, OutputTarget};
pub use events::{EventLevel, PipelineEvent, Stage, TracingObserver};
pub use pipeline::{Pipeline, PipelineError, PipelineMode, RunSettings};
pub use record::{OutputRecord, RunSummary, PLATFORM_HOST};
pub use sink::{ApifyDatasetSink, JsonlFileSink};
pub use traits::{
    EnrichmentService, PipelineObserver, ResultSink, RunResult, RunStatus, SearchService,
    UpstreamError,
};
