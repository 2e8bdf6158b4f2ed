pub mod batch_engine;
pub mod callbacks;
pub mod events;
pub mod runner;

pub use batch_engine::BatchEngine;
pub use callbacks::{JobCallbacks, ProgressCallback, StatusCallback};
pub use events::{EngineEvent, EventBroadcaster};
pub use runner::{FileOutcome, FileProgressReporter, NoopProgress, WorkflowRunner};
