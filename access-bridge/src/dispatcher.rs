//! AI-or-fallback dispatch.
//!
//! Every request first tries the external AI service and, on any failure,
//! runs the matching local heuristic. The caller always gets an
//! [`OperationResult`] of the same shape back.

use crate::heuristics;
use crate::orchestrator::{self, ChunkProcessor};
use crate::types::{
    BridgeConfig, CapabilityError, CapabilityHandle, CapabilityService, ImageContext, OperationKind,
    OperationOptions, OperationRequest, OperationResult, Result, ResultSource, TextUnit, OPTION_FORMAT,
    OPTION_LENGTH, OPTION_SOURCE_LANGUAGE, OPTION_TARGET_LANGUAGE, OPTION_TONE, OPTION_TYPE,
};
use crate::utils::{describe_input, image_context_string};
use async_trait::async_trait;
use futures::FutureExt;
use interfaces::empty::UnsupportedCapabilityService;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use tracing::{debug, error, info, warn};

/// Handles are cached per kind and effective options, so a translator for one
/// language pair is never reused for another.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct HandleKey {
    kind: OperationKind,
    options: OperationOptions,
}

/// Owns the capability service and the handles created from it for the
/// lifetime of one hosting session.
pub struct Dispatcher {
    service: Box<dyn CapabilityService>,
    handles: HashMap<HandleKey, Box<dyn CapabilityHandle>>,
    config: BridgeConfig,
}

impl Dispatcher {
    pub fn new(service: Box<dyn CapabilityService>, config: BridgeConfig) -> Self {
        info!("Dispatcher using capability service: {}", service.name());
        Self {
            service,
            handles: HashMap::new(),
            config,
        }
    }

    /// A dispatcher for environments without any AI service.
    pub fn heuristics_only(config: BridgeConfig) -> Self {
        Self::new(Box::new(UnsupportedCapabilityService), config)
    }

    pub fn service_name(&self) -> String {
        self.service.name()
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Number of live capability handles
    pub fn cached_handles(&self) -> usize {
        self.handles.len()
    }

    /// Options sent with every request of `kind` unless the request overrides them
    pub fn default_options(&self, kind: OperationKind) -> OperationOptions {
        let pairs: Vec<(&str, &str)> = match kind {
            OperationKind::Summarize => vec![
                (OPTION_TYPE, "key-points"),
                (OPTION_FORMAT, "plain-text"),
                (OPTION_LENGTH, "short"),
            ],
            OperationKind::Describe => vec![
                (OPTION_TONE, "neutral"),
                (OPTION_FORMAT, "plain-text"),
                (OPTION_LENGTH, "short"),
            ],
            OperationKind::Rewrite => vec![
                (OPTION_TONE, "more-casual"),
                (OPTION_FORMAT, "plain-text"),
                (OPTION_LENGTH, "shorter"),
            ],
            OperationKind::Translate => vec![
                (OPTION_SOURCE_LANGUAGE, "auto"),
                (OPTION_TARGET_LANGUAGE, self.config.default_target_language.as_str()),
            ],
        };

        pairs
            .into_iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    /// Run one request. Never fails: any problem on the AI side turns into a
    /// heuristic result.
    pub async fn dispatch(&mut self, request: &OperationRequest) -> OperationResult {
        let kind = request.kind;

        match AssertUnwindSafe(self.try_ai_service(request)).catch_unwind().await {
            Ok(Ok(text)) => {
                debug!("{} served by {}", kind, self.service.name());
                OperationResult::ai(text)
            }
            Ok(Err(e)) => {
                warn!("{} via {} failed, using heuristic: {}", kind, self.service.name(), e);
                Self::run_heuristic(request)
            }
            Err(_) => {
                error!("{} capability panicked, dropping its handle and using heuristic", kind);
                let key = self.handle_key(request);
                self.handles.remove(&key);
                Self::run_heuristic(request)
            }
        }
    }

    async fn try_ai_service(&mut self, request: &OperationRequest) -> std::result::Result<String, CapabilityError> {
        let kind = request.kind;
        if !self.service.supports(kind) {
            return Err(CapabilityError::Unavailable(kind));
        }

        let key = self.handle_key(request);
        if !self.handles.contains_key(&key) {
            let handle = self.service.create(kind, &key.options).await?;
            info!("Created {} capability handle", kind.capability_name());
            self.handles.insert(key.clone(), handle);
        }
        let handle = self
            .handles
            .get(&key)
            .ok_or_else(|| CapabilityError::Invocation(format!("{} handle missing from cache", kind)))?;

        match kind {
            OperationKind::Describe => {
                let output = handle.invoke(&describe_prompt(&request.payload.content)).await?;
                Ok(output.trim().to_string())
            }
            _ => handle.invoke(&request.payload.content).await,
        }
    }

    fn run_heuristic(request: &OperationRequest) -> OperationResult {
        OperationResult::heuristic(heuristics::run(request.kind, &request.payload.content))
    }

    fn handle_key(&self, request: &OperationRequest) -> HandleKey {
        let mut options = self.default_options(request.kind);
        options.extend(request.options.iter().map(|(k, v)| (k.clone(), v.clone())));
        HandleKey {
            kind: request.kind,
            options,
        }
    }

    /// Release every cached handle. Safe to call any number of times.
    pub async fn release(&mut self) {
        if self.handles.is_empty() {
            debug!("No capability handles to release");
            return;
        }

        let count = self.handles.len();
        for (key, handle) in self.handles.drain() {
            if let Err(e) = handle.release().await {
                warn!("Failed to release {} handle: {}", key.kind.capability_name(), e);
            }
        }
        info!("Released {} capability handles", count);
    }

    pub async fn summarize(&mut self, text: &str) -> OperationResult {
        self.dispatch(&OperationRequest::new(OperationKind::Summarize, text)).await
    }

    /// Alt text for an image, from whatever hints the page offers.
    pub async fn describe(&mut self, image: &ImageContext) -> OperationResult {
        let context = image_context_string(image);
        self.describe_context(context).await
    }

    /// Alt text from a description the caller supplies, plus any image hints.
    pub async fn describe_text(&mut self, image: &ImageContext, description: &str) -> OperationResult {
        let context = describe_input(image, description);
        self.describe_context(context).await
    }

    async fn describe_context(&mut self, context: String) -> OperationResult {
        self.dispatch(&OperationRequest::new(OperationKind::Describe, context)).await
    }

    pub async fn translate(&mut self, text: &str, target_language: &str) -> OperationResult {
        let request = OperationRequest::new(OperationKind::Translate, text)
            .with_option(OPTION_TARGET_LANGUAGE, target_language);
        self.dispatch(&request).await
    }

    pub async fn rewrite(&mut self, text: &str) -> OperationResult {
        self.dispatch(&OperationRequest::new(OperationKind::Rewrite, text)).await
    }

    /// Summary meant to be read aloud: summarize, then rewrite the summary.
    ///
    /// Unless both steps were served by the AI service the result takes the
    /// heuristic audio form.
    pub async fn audio_summary(&mut self, text: &str) -> OperationResult {
        let summary = self.summarize(text).await;
        let rewritten = self.rewrite(&summary.text).await;

        if summary.source == ResultSource::AiService && rewritten.source == ResultSource::AiService {
            rewritten
        } else {
            OperationResult::heuristic(heuristics::audio_friendly(&rewritten.text))
        }
    }

    /// Apply `kind` to arbitrarily long text, chunk by chunk.
    pub async fn process_long_text(&mut self, text: &str, kind: OperationKind, options: OperationOptions) -> String {
        self.long_text_result(text, kind, options).await.text
    }

    /// Like [`Dispatcher::process_long_text`], tagged `AiService` only when
    /// at least one chunk was sent and every chunk was served by the AI service.
    pub async fn long_text_result(
        &mut self,
        text: &str,
        kind: OperationKind,
        options: OperationOptions,
    ) -> OperationResult {
        let max_length = self.config.max_chunk_length;
        let mut chunks = DispatchChunks::new(self, kind, options);
        let output = orchestrator::process_long_text(&mut chunks, text, max_length).await;

        // Untouched text counts as a local result.
        if chunks.dispatched > 0 && chunks.heuristic_chunks == 0 {
            OperationResult::ai(output)
        } else {
            OperationResult::heuristic(output)
        }
    }
}

/// Prompt sent to the writer capability for alt text
pub fn describe_prompt(context: &str) -> String {
    format!(
        "Generate a concise, descriptive alt text for an image. Context: {}. \
         Focus on essential visual information for screen readers. Maximum 125 characters.",
        context
    )
}

/// Feeds chunks through a dispatcher
pub struct DispatchChunks<'a> {
    dispatcher: &'a mut Dispatcher,
    kind: OperationKind,
    options: OperationOptions,
    dispatched: usize,
    heuristic_chunks: usize,
}

impl<'a> DispatchChunks<'a> {
    pub fn new(dispatcher: &'a mut Dispatcher, kind: OperationKind, options: OperationOptions) -> Self {
        Self {
            dispatcher,
            kind,
            options,
            dispatched: 0,
            heuristic_chunks: 0,
        }
    }
}

#[async_trait]
impl<'a> ChunkProcessor for DispatchChunks<'a> {
    async fn process_chunk(&mut self, chunk: &TextUnit) -> Result<String> {
        let request = OperationRequest {
            kind: self.kind,
            payload: chunk.clone(),
            options: self.options.clone(),
        };
        let result = self.dispatcher.dispatch(&request).await;
        self.dispatched += 1;
        if result.source == ResultSource::Heuristic {
            self.heuristic_chunks += 1;
        }
        Ok(result.text)
    }

    fn processor_name(&self) -> String {
        format!("{} dispatcher", self.kind)
    }
}
