use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Options forwarded opaquely to the AI capability service (tone, format,
/// length, source/target language).
pub type OperationOptions = BTreeMap<String, String>;

pub const OPTION_TYPE: &str = "type";
pub const OPTION_TONE: &str = "tone";
pub const OPTION_FORMAT: &str = "format";
pub const OPTION_LENGTH: &str = "length";
pub const OPTION_SOURCE_LANGUAGE: &str = "sourceLanguage";
pub const OPTION_TARGET_LANGUAGE: &str = "targetLanguage";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextUnit {
    pub content: String,
    pub length: usize,
}

impl TextUnit {
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        let length = content.chars().count();
        Self { content, length }
    }
}

impl From<&str> for TextUnit {
    fn from(content: &str) -> Self {
        Self::new(content)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    Summarize,
    Describe,
    Translate,
    Rewrite,
}

impl OperationKind {
    pub const ALL: [OperationKind; 4] = [
        OperationKind::Summarize,
        OperationKind::Describe,
        OperationKind::Translate,
        OperationKind::Rewrite,
    ];

    /// Name of the capability that serves this kind on the AI service side.
    pub fn capability_name(&self) -> &'static str {
        match self {
            OperationKind::Summarize => "summarizer",
            OperationKind::Describe => "writer",
            OperationKind::Translate => "translator",
            OperationKind::Rewrite => "rewriter",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::Summarize => "summarize",
            OperationKind::Describe => "describe",
            OperationKind::Translate => "translate",
            OperationKind::Rewrite => "rewrite",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OperationRequest {
    pub kind: OperationKind,
    pub payload: TextUnit,
    #[serde(default)]
    pub options: OperationOptions,
}

impl OperationRequest {
    pub fn new(kind: OperationKind, payload: impl Into<String>) -> Self {
        Self {
            kind,
            payload: TextUnit::new(payload),
            options: OperationOptions::new(),
        }
    }

    pub fn with_option(mut self, key: &str, value: impl Into<String>) -> Self {
        self.options.insert(key.to_owned(), value.into());
        self
    }
}

/// Where a result came from. Callers must treat both variants the same way;
/// the tag only exists for logging and metrics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultSource {
    AiService,
    Heuristic,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult {
    pub text: String,
    pub source: ResultSource,
}

impl OperationResult {
    pub fn ai(text: impl Into<String>) -> Self {
        Self { text: text.into(), source: ResultSource::AiService }
    }

    pub fn heuristic(text: impl Into<String>) -> Self {
        Self { text: text.into(), source: ResultSource::Heuristic }
    }
}

/// Ordered chunks produced from one oversized input.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkSet {
    pub chunks: Vec<TextUnit>,
}

impl ChunkSet {
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TextUnit> {
        self.chunks.iter()
    }

    /// Rejoin the chunk contents with the given joiner.
    pub fn join(&self, joiner: &str) -> String {
        self.chunks
            .iter()
            .map(|chunk| chunk.content.as_str())
            .collect::<Vec<&str>>()
            .join(joiner)
    }
}

/// Structural hints that travel with a Describe request.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ImageContext {
    /// Image source path or URL; only the file stem is used.
    pub src: Option<String>,
    pub title: Option<String>,
    pub nearby_text: Option<String>,
    pub caption: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
    #[error("capability unavailable: {0}")]
    Unavailable(OperationKind),

    #[error("invocation failed: {0}")]
    Invocation(String),

    #[error("release failed: {0}")]
    Release(String),
}

// Object style note:
// A capability service is probed with `supports` before anything is created.
// Environments without an AI service plug in a stand-in that supports nothing
// (see `empty.rs`), so callers never detect features by any other means.

/// An external AI service exposing one capability per operation kind.
#[async_trait]
pub trait CapabilityService: Send + Sync {
    fn name(&self) -> String;

    fn supports(&self, kind: OperationKind) -> bool;

    async fn create(
        &self,
        kind: OperationKind,
        options: &OperationOptions,
    ) -> Result<Box<dyn CapabilityHandle>, CapabilityError>;
}

/// A reusable connection to one capability of the AI service.
#[async_trait]
pub trait CapabilityHandle: Send + Sync {
    async fn invoke(&self, input: &str) -> Result<String, CapabilityError>;

    /// Best effort cleanup. Failures are logged by the caller, never propagated.
    async fn release(&self) -> Result<(), CapabilityError>;
}
