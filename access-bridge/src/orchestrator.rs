use crate::chunking::{is_text_too_long, split_long_text};
use crate::types::{BridgeError, Result, TextUnit};
use async_trait::async_trait;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tracing::{debug, error, info};

/// Anything that can turn one chunk of text into its processed form
#[async_trait]
pub trait ChunkProcessor: Send {
    /// Process one chunk. An error keeps the chunk's original text.
    async fn process_chunk(&mut self, chunk: &TextUnit) -> Result<String>;

    /// Get the name of this processor
    fn processor_name(&self) -> String;
}

/// Run `processor` over `text`, chunking it first when it is longer than
/// `max_length`.
///
/// Chunks are processed strictly one after another and joined with a single
/// space in their original order. A chunk whose processing fails (or panics)
/// is replaced by its original content, so the caller always gets a complete
/// string back. Text without any sentence in it comes back unchanged.
pub async fn process_long_text<P>(processor: &mut P, text: &str, max_length: usize) -> String
where
    P: ChunkProcessor + ?Sized,
{
    if !is_text_too_long(text, max_length) {
        let unit = TextUnit::new(text);
        return match run_chunk(processor, &unit, 0).await {
            Ok(output) => output,
            Err(e) => {
                error!("Error processing text with {}: {}", processor.processor_name(), e);
                text.to_string()
            }
        };
    }

    let chunk_set = split_long_text(text, max_length);
    if chunk_set.is_empty() {
        debug!("No sentences in {} chars of text, keeping it as is", text.chars().count());
        return text.to_string();
    }
    info!(
        "Processing {} chunks of at most {} chars with {}",
        chunk_set.len(),
        max_length,
        processor.processor_name()
    );

    let mut results = Vec::with_capacity(chunk_set.len());
    for (index, chunk) in chunk_set.iter().enumerate() {
        match run_chunk(processor, chunk, index).await {
            Ok(output) => {
                debug!("Chunk {} processed ({} chars in)", index, chunk.length);
                results.push(output);
            }
            Err(e) => {
                error!("Error processing text chunk {}: {}", index, e);
                results.push(chunk.content.clone());
            }
        }
    }

    results.join(" ")
}

async fn run_chunk<P>(processor: &mut P, chunk: &TextUnit, index: usize) -> Result<String>
where
    P: ChunkProcessor + ?Sized,
{
    match AssertUnwindSafe(processor.process_chunk(chunk)).catch_unwind().await {
        Ok(result) => result,
        Err(_) => Err(BridgeError::ChunkFailed {
            index,
            reason: "chunk processor panicked".to_string(),
        }),
    }
}
