//! Instrumented step processor for engine tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use docbatch::error::StepError;
use docbatch::processor::{StepOutput, StepProcessor};
use docbatch::{BatchFile, StepAction, StepType};

/// Step processor whose behavior is scripted per file name.
///
/// It records how many invocations were in flight at the same time, which
/// lets tests check the engine's concurrency bound.
pub struct ScriptedProcessor {
    step_type: StepType,
    delay: Duration,
    fail_for: Mutex<HashSet<String>>,
    panic_for: HashSet<String>,
    gate: Option<Arc<Semaphore>>,
    ungated: HashSet<String>,
    calls: AtomicUsize,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl ScriptedProcessor {
    pub fn new(step_type: StepType) -> Self {
        Self {
            step_type,
            delay: Duration::ZERO,
            fail_for: Mutex::new(HashSet::new()),
            panic_for: HashSet::new(),
            gate: None,
            ungated: HashSet::new(),
            calls: AtomicUsize::new(0),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Sleep this long inside every invocation.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Fail every invocation for the named file.
    pub fn failing_for(self, file_name: &str) -> Self {
        self.fail_for.lock().unwrap().insert(file_name.to_string());
        self
    }

    /// Panic inside the invocation for the named file.
    pub fn panicking_for(mut self, file_name: &str) -> Self {
        self.panic_for.insert(file_name.to_string());
        self
    }

    /// Every invocation waits for one permit of `gate` before finishing.
    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// The named file finishes without waiting on the gate.
    pub fn ungated_for(mut self, file_name: &str) -> Self {
        self.ungated.insert(file_name.to_string());
        self
    }

    /// Share in-flight counters with other processors, so the bound is
    /// measured across step types.
    pub fn sharing_counters_with(mut self, other: &ScriptedProcessor) -> Self {
        self.in_flight = Arc::clone(&other.in_flight);
        self.max_in_flight = Arc::clone(&other.max_in_flight);
        self
    }

    /// Stop failing for the named file.
    pub fn heal(&self, file_name: &str) {
        self.fail_for.lock().unwrap().remove(file_name);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl StepProcessor for ScriptedProcessor {
    fn step_type(&self) -> StepType {
        self.step_type
    }

    async fn process(&self, file: &BatchFile, _action: &StepAction) -> Result<StepOutput, StepError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let depth = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(depth, Ordering::SeqCst);

        if let Some(gate) = self.gate.as_ref().filter(|_| !self.ungated.contains(&file.name)) {
            gate.acquire().await.unwrap().forget();
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.panic_for.contains(&file.name) {
            panic!("scripted panic for {}", file.name);
        }
        let fail = self.fail_for.lock().unwrap().contains(&file.name);
        if fail {
            return Err(StepError::Failed(format!("scripted failure for {}", file.name)));
        }

        Ok(StepOutput::Custom(serde_json::json!({ "file": file.name })))
    }
}
