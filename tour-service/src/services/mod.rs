pub mod database;
pub mod error;
pub mod metrics;
pub mod persistence;
pub mod pipeline;
pub mod prompt;
pub mod providers;
pub mod routing;
pub mod storage;

pub use database::{ArtifactStore, PgArtifactStore};
pub use error::PipelineError;
pub use metrics::{get_metrics, init_metrics};
pub use persistence::ArtifactPersister;
pub use pipeline::{TourOutcome, TourPipeline};
pub use storage::{BlobStorage, LocalStorage, Storage};
