use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
// Use the interfaces crate for core types
pub use interfaces::defs::{TextUnit, ChunkSet, ImageContext, OperationKind, OperationOptions};
pub use interfaces::defs::{OperationRequest, OperationResult, ResultSource};
pub use interfaces::defs::{CapabilityError, CapabilityHandle, CapabilityService};
pub use interfaces::defs::{OPTION_FORMAT, OPTION_LENGTH, OPTION_SOURCE_LANGUAGE, OPTION_TARGET_LANGUAGE, OPTION_TONE, OPTION_TYPE};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Texts longer than this are chunked before dispatch.
    pub max_chunk_length: usize,
    pub default_target_language: String,
    pub simplify_min_block_chars: usize,
    pub simplify_max_blocks: usize,
    pub translate_min_block_chars: usize,
    pub translate_max_blocks: usize,
    pub alt_text_max_images: usize,
    pub main_content_min_paragraph_chars: usize,
    pub main_content_max_paragraphs: usize,
    pub audio_min_content_chars: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            max_chunk_length: 1000,
            default_target_language: "en".to_string(),
            simplify_min_block_chars: 50,
            simplify_max_blocks: 10,
            translate_min_block_chars: 10,
            translate_max_blocks: 15,
            alt_text_max_images: 20,
            main_content_min_paragraph_chars: 20,
            main_content_max_paragraphs: 10,
            audio_min_content_chars: 50,
        }
    }
}

impl BridgeConfig {
    /// Defaults overridden by `ACCESS_BRIDGE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(value) = env_parse::<usize>("ACCESS_BRIDGE_MAX_CHUNK_LENGTH")? {
            config.max_chunk_length = value;
        }
        if let Some(value) = env_var("ACCESS_BRIDGE_TARGET_LANGUAGE") {
            config.default_target_language = value;
        }
        if let Some(value) = env_parse::<usize>("ACCESS_BRIDGE_SIMPLIFY_MAX_BLOCKS")? {
            config.simplify_max_blocks = value;
        }
        if let Some(value) = env_parse::<usize>("ACCESS_BRIDGE_TRANSLATE_MAX_BLOCKS")? {
            config.translate_max_blocks = value;
        }
        if let Some(value) = env_parse::<usize>("ACCESS_BRIDGE_ALT_TEXT_MAX_IMAGES")? {
            config.alt_text_max_images = value;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_chunk_length == 0 {
            return Err(BridgeError::Config("max_chunk_length must be greater than zero".to_string()));
        }
        if self.default_target_language.trim().is_empty() {
            return Err(BridgeError::Config("default_target_language must not be empty".to_string()));
        }
        Ok(())
    }
}

pub(crate) fn env_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub(crate) fn env_parse<T: FromStr>(key: &str) -> Result<Option<T>> {
    match env_var(key) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| BridgeError::Config(format!("{key} has an invalid value: {raw}"))),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Chunk {index} failed: {reason}")]
    ChunkFailed { index: usize, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("General error: {0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
