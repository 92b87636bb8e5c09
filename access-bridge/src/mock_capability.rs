use crate::types::{CapabilityError, CapabilityHandle, CapabilityService, OperationKind, OperationOptions};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Counters shared between a mock service and every handle it creates
#[derive(Debug, Default)]
pub struct MockCounters {
    pub created: AtomicUsize,
    pub invoked: AtomicUsize,
    pub released: AtomicUsize,
}

impl MockCounters {
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn invoked(&self) -> usize {
        self.invoked.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

/// Mock capability service for development and testing.
///
/// Every supported kind answers with `"[<kind>] <input>"`, so tests can tell an
/// AI-sourced result from a heuristic one by looking at the text alone.
pub struct MockCapabilityService {
    name: String,
    supported: HashSet<OperationKind>,
    fail_marker: Option<String>,
    panic_marker: Option<String>,
    fail_release: bool,
    response_delay_ms: u64,
    counters: Arc<MockCounters>,
}

impl MockCapabilityService {
    pub fn new(name: String) -> Self {
        Self {
            name,
            supported: OperationKind::ALL.into_iter().collect(),
            fail_marker: None,
            panic_marker: None,
            fail_release: false,
            response_delay_ms: 0,
            counters: Arc::new(MockCounters::default()),
        }
    }

    pub fn with_supported(mut self, kinds: &[OperationKind]) -> Self {
        self.supported = kinds.iter().copied().collect();
        self
    }

    /// Invocations whose input contains `marker` fail.
    pub fn failing_on(mut self, marker: &str) -> Self {
        self.fail_marker = Some(marker.to_string());
        self
    }

    /// Invocations whose input contains `marker` panic.
    pub fn panicking_on(mut self, marker: &str) -> Self {
        self.panic_marker = Some(marker.to_string());
        self
    }

    pub fn with_failing_release(mut self) -> Self {
        self.fail_release = true;
        self
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.response_delay_ms = delay_ms;
        self
    }

    pub fn counters(&self) -> Arc<MockCounters> {
        self.counters.clone()
    }
}

#[async_trait]
impl CapabilityService for MockCapabilityService {
    fn name(&self) -> String {
        format!("Mock capability service ({})", self.name)
    }

    fn supports(&self, kind: OperationKind) -> bool {
        self.supported.contains(&kind)
    }

    async fn create(
        &self,
        kind: OperationKind,
        options: &OperationOptions,
    ) -> Result<Box<dyn CapabilityHandle>, CapabilityError> {
        if !self.supports(kind) {
            return Err(CapabilityError::Unavailable(kind));
        }

        debug!("Mock service creating {} handle with {} options", kind, options.len());
        self.counters.created.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(MockCapabilityHandle {
            kind,
            fail_marker: self.fail_marker.clone(),
            panic_marker: self.panic_marker.clone(),
            fail_release: self.fail_release,
            response_delay_ms: self.response_delay_ms,
            counters: self.counters.clone(),
        }))
    }
}

struct MockCapabilityHandle {
    kind: OperationKind,
    fail_marker: Option<String>,
    panic_marker: Option<String>,
    fail_release: bool,
    response_delay_ms: u64,
    counters: Arc<MockCounters>,
}

impl MockCapabilityHandle {
    async fn simulate_processing(&self) {
        if self.response_delay_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.response_delay_ms)).await;
        }
    }
}

#[async_trait]
impl CapabilityHandle for MockCapabilityHandle {
    async fn invoke(&self, input: &str) -> Result<String, CapabilityError> {
        self.simulate_processing().await;
        self.counters.invoked.fetch_add(1, Ordering::SeqCst);

        if let Some(marker) = &self.panic_marker {
            if input.contains(marker.as_str()) {
                panic!("mock {} handle hit panic marker", self.kind);
            }
        }
        if let Some(marker) = &self.fail_marker {
            if input.contains(marker.as_str()) {
                return Err(CapabilityError::Invocation(format!(
                    "mock {} handle rejected input",
                    self.kind
                )));
            }
        }

        Ok(format!("[{}] {}", self.kind, input))
    }

    async fn release(&self) -> Result<(), CapabilityError> {
        self.counters.released.fetch_add(1, Ordering::SeqCst);
        if self.fail_release {
            return Err(CapabilityError::Release(format!("mock {} handle refused release", self.kind)));
        }
        Ok(())
    }
}
