use crate::dispatcher::Dispatcher;
use crate::types::{ImageContext, OperationKind, OperationOptions, OperationResult, ResultSource};
use crate::utils::text::char_len;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// Trait for page enhancement stages
#[async_trait]
pub trait EnhancementStage: Send + Sync {
    /// Enhance the blocks of one page
    async fn process(&mut self, dispatcher: &mut Dispatcher, input: EnhancementInput) -> EnhancementOutput;

    /// Get the name of this stage
    fn stage_name(&self) -> String;
}

/// A page element as seen by the core: an id the boundary layer can map back
/// to its DOM node, plus the element's text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageBlock {
    pub id: String,
    pub text: String,
    /// Set once the element carries an enhancement from an earlier run
    #[serde(default)]
    pub already_processed: bool,
}

impl PageBlock {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            already_processed: false,
        }
    }
}

/// An image element and its hints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageBlock {
    pub id: String,
    pub context: ImageContext,
}

/// Input to an enhancement stage
#[derive(Debug, Clone, Default)]
pub struct EnhancementInput {
    pub blocks: Vec<PageBlock>,
    pub images: Vec<ImageBlock>,
    pub metadata: HashMap<String, String>,
}

impl EnhancementInput {
    pub fn from_blocks(blocks: Vec<PageBlock>) -> Self {
        Self {
            blocks,
            ..Self::default()
        }
    }

    pub fn from_images(images: Vec<ImageBlock>) -> Self {
        Self {
            images,
            ..Self::default()
        }
    }
}

/// A replacement the boundary layer should apply to one element
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enhancement {
    pub block_id: String,
    pub original: String,
    pub replacement: String,
    pub source: ResultSource,
}

/// Output from an enhancement stage
#[derive(Debug, Clone, Default)]
pub struct EnhancementOutput {
    pub enhancements: Vec<Enhancement>,
    pub metadata: HashMap<String, String>,
}

/// Stage that simplifies long text blocks
pub struct SimplifyStage {
    min_block_chars: usize,
    max_blocks: usize,
}

impl SimplifyStage {
    pub fn new(min_block_chars: usize, max_blocks: usize) -> Self {
        Self {
            min_block_chars,
            max_blocks,
        }
    }

    pub fn from_dispatcher(dispatcher: &Dispatcher) -> Self {
        let config = dispatcher.config();
        Self::new(config.simplify_min_block_chars, config.simplify_max_blocks)
    }
}

#[async_trait]
impl EnhancementStage for SimplifyStage {
    async fn process(&mut self, dispatcher: &mut Dispatcher, input: EnhancementInput) -> EnhancementOutput {
        debug!("Simplifying up to {} of {} blocks", self.max_blocks, input.blocks.len());

        let mut enhancements = Vec::new();
        let mut skipped = 0;

        for block in input.blocks {
            if enhancements.len() >= self.max_blocks {
                break;
            }
            let text = block.text.trim();
            if char_len(text) < self.min_block_chars || block.already_processed {
                skipped += 1;
                continue;
            }

            let simplified = dispatcher
                .long_text_result(text, OperationKind::Summarize, OperationOptions::new())
                .await;
            if simplified.text != text {
                enhancements.push(enhancement(block.id, text, simplified));
            }
        }

        finish("simplify", enhancements, skipped, input.metadata)
    }

    fn stage_name(&self) -> String {
        "simplifier".to_string()
    }
}

/// Stage that translates text blocks into one target language
pub struct TranslateStage {
    target_language: String,
    min_block_chars: usize,
    max_blocks: usize,
}

impl TranslateStage {
    pub fn new(target_language: impl Into<String>, min_block_chars: usize, max_blocks: usize) -> Self {
        Self {
            target_language: target_language.into(),
            min_block_chars,
            max_blocks,
        }
    }

    pub fn from_dispatcher(dispatcher: &Dispatcher, target_language: impl Into<String>) -> Self {
        let config = dispatcher.config();
        Self::new(target_language, config.translate_min_block_chars, config.translate_max_blocks)
    }
}

#[async_trait]
impl EnhancementStage for TranslateStage {
    async fn process(&mut self, dispatcher: &mut Dispatcher, input: EnhancementInput) -> EnhancementOutput {
        debug!("Translating up to {} blocks to {}", self.max_blocks, self.target_language);

        let mut enhancements = Vec::new();
        let mut skipped = 0;

        for block in input.blocks {
            if enhancements.len() >= self.max_blocks {
                break;
            }
            let text = block.text.trim();
            if char_len(text) < self.min_block_chars || block.already_processed {
                skipped += 1;
                continue;
            }

            let translated = dispatcher.translate(text, &self.target_language).await;
            if translated.text != text {
                enhancements.push(enhancement(block.id, text, translated));
            }
        }

        let mut metadata = input.metadata;
        metadata.insert("target_language".to_string(), self.target_language.clone());
        finish("translate", enhancements, skipped, metadata)
    }

    fn stage_name(&self) -> String {
        "translator".to_string()
    }
}

/// Stage that adds alt text to images that lack it
pub struct AltTextStage {
    max_images: usize,
}

impl AltTextStage {
    pub fn new(max_images: usize) -> Self {
        Self { max_images }
    }

    pub fn from_dispatcher(dispatcher: &Dispatcher) -> Self {
        Self::new(dispatcher.config().alt_text_max_images)
    }
}

#[async_trait]
impl EnhancementStage for AltTextStage {
    async fn process(&mut self, dispatcher: &mut Dispatcher, input: EnhancementInput) -> EnhancementOutput {
        debug!("Generating alt text for up to {} of {} images", self.max_images, input.images.len());

        let mut enhancements = Vec::new();
        let skipped = input.images.len().saturating_sub(self.max_images);

        for image in input.images.into_iter().take(self.max_images) {
            let description = dispatcher.describe(&image.context).await;
            enhancements.push(enhancement(image.id, "", description));
        }

        finish("alt_text", enhancements, skipped, input.metadata)
    }

    fn stage_name(&self) -> String {
        "alt_text".to_string()
    }
}

fn enhancement(block_id: String, original: &str, result: OperationResult) -> Enhancement {
    Enhancement {
        block_id,
        original: original.to_string(),
        replacement: result.text,
        source: result.source,
    }
}

fn finish(
    stage: &str,
    enhancements: Vec<Enhancement>,
    skipped: usize,
    mut metadata: HashMap<String, String>,
) -> EnhancementOutput {
    info!("Stage {} applied {} enhancements", stage, enhancements.len());
    metadata.insert("stage".to_string(), stage.to_string());
    metadata.insert("enhancements_applied".to_string(), enhancements.len().to_string());
    metadata.insert("blocks_skipped".to_string(), skipped.to_string());
    EnhancementOutput { enhancements, metadata }
}

/// Main text of a page when no main/article container exists: the first
/// paragraphs long enough to be prose, joined by spaces.
pub fn extract_main_content(paragraphs: &[String], min_paragraph_chars: usize, max_paragraphs: usize) -> String {
    paragraphs
        .iter()
        .map(|p| p.trim())
        .filter(|p| char_len(p) > min_paragraph_chars)
        .take(max_paragraphs)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Audio-friendly summary of a page, or `None` when the page has too little
/// prose to be worth summarizing.
pub async fn audio_summary_for_page(dispatcher: &mut Dispatcher, paragraphs: &[String]) -> Option<OperationResult> {
    let config = dispatcher.config();
    let content = extract_main_content(
        paragraphs,
        config.main_content_min_paragraph_chars,
        config.main_content_max_paragraphs,
    );
    if char_len(&content) < config.audio_min_content_chars {
        info!("Insufficient content for an audio summary ({} chars)", char_len(&content));
        return None;
    }

    Some(dispatcher.audio_summary(&content).await)
}
