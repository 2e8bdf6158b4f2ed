//! Engine-wide event stream for live job monitoring.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::batch::{BatchProgress, JobStatus};

/// Event published by the engine for every job it manages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum EngineEvent {
    JobCreated {
        job_id: String,
        name: String,
        total_files: usize,
    },
    StatusChanged {
        job_id: String,
        status: JobStatus,
        timestamp: DateTime<Utc>,
    },
    Progress {
        job_id: String,
        progress: BatchProgress,
    },
    /// A step finished for a file in flight.
    FileProgress {
        job_id: String,
        file_id: String,
        file_name: String,
        step_name: String,
        percentage: f64,
    },
    JobDeleted {
        job_id: String,
    },
}

impl EngineEvent {
    pub fn job_id(&self) -> &str {
        match self {
            EngineEvent::JobCreated { job_id, .. }
            | EngineEvent::StatusChanged { job_id, .. }
            | EngineEvent::Progress { job_id, .. }
            | EngineEvent::FileProgress { job_id, .. }
            | EngineEvent::JobDeleted { job_id } => job_id,
        }
    }
}

/// Fans engine events out to any number of subscribers.
#[derive(Clone)]
pub struct EventBroadcaster {
    sender: Arc<broadcast::Sender<EngineEvent>>,
}

impl EventBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn send(&self, event: EngineEvent) {
        // No active receivers is fine
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new(100)
    }
}
