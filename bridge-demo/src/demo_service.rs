use access_bridge::utils::text::take_chars;
use anyhow::Result;
use async_trait::async_trait;
use interfaces::defs::{
    CapabilityError, CapabilityHandle, CapabilityService, OperationKind, OperationOptions, OPTION_TARGET_LANGUAGE,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

const DEMO_DATA: &str = include_str!("demo_data.json");

/// Input containing this many leading chars of a canned original counts as a match
pub const SIMPLIFICATION_MATCH_CHARS: usize = 50;

pub const ALT_TEXT_PREFIX: &str = "Generated alt text: ";

#[derive(Debug, Clone, Deserialize)]
pub struct Simplification {
    pub original: String,
    pub simplified: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AltTexts {
    pub star_k_logo: String,
    pub logo: String,
    pub food: String,
    pub restaurant: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhraseTranslation {
    pub phrase: String,
    pub translation: String,
}

/// Canned answers for the restaurant demo page
#[derive(Debug, Clone, Deserialize)]
pub struct DemoData {
    pub simplifications: Vec<Simplification>,
    pub alt_texts: AltTexts,
    pub translations: HashMap<String, Vec<PhraseTranslation>>,
}

impl DemoData {
    /// The tables compiled into this crate
    pub fn embedded() -> Result<Self> {
        Ok(serde_json::from_str(DEMO_DATA)?)
    }

    pub fn languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = self.translations.keys().map(String::as_str).collect();
        languages.sort_unstable();
        languages
    }

    fn simplify(&self, input: &str) -> Option<&str> {
        self.simplifications
            .iter()
            .find(|entry| input.contains(take_chars(&entry.original, SIMPLIFICATION_MATCH_CHARS)))
            .map(|entry| entry.simplified.as_str())
    }

    fn describe(&self, input: &str) -> String {
        // Filename hints arrive with dashes already turned into spaces.
        let context = input.to_lowercase().replace(['-', '_'], " ");
        let text = if context.contains("star k logo") {
            &self.alt_texts.star_k_logo
        } else if context.contains("logo") {
            &self.alt_texts.logo
        } else if context.contains("food") || context.contains("menu") {
            &self.alt_texts.food
        } else {
            &self.alt_texts.restaurant
        };
        format!("{ALT_TEXT_PREFIX}{text}")
    }
}

/// Capability service answering from lookup tables instead of a model.
///
/// Rewrite is not offered, so the dispatcher always falls back to the local
/// rewrite rules for it.
pub struct DemoCapabilityService {
    data: Arc<DemoData>,
}

impl DemoCapabilityService {
    pub fn new() -> Result<Self> {
        Ok(Self::with_data(DemoData::embedded()?))
    }

    pub fn with_data(data: DemoData) -> Self {
        Self { data: Arc::new(data) }
    }
}

#[async_trait]
impl CapabilityService for DemoCapabilityService {
    fn name(&self) -> String {
        "Demo lookup tables".to_string()
    }

    fn supports(&self, kind: OperationKind) -> bool {
        !matches!(kind, OperationKind::Rewrite)
    }

    async fn create(
        &self,
        kind: OperationKind,
        options: &OperationOptions,
    ) -> std::result::Result<Box<dyn CapabilityHandle>, CapabilityError> {
        let mode = match kind {
            OperationKind::Summarize => DemoMode::Simplify,
            OperationKind::Describe => DemoMode::Describe,
            OperationKind::Translate => {
                let language = options.get(OPTION_TARGET_LANGUAGE).cloned().unwrap_or_default();
                if !self.data.translations.contains_key(&language) {
                    return Err(CapabilityError::Invocation(format!(
                        "language not available in demo: {language}"
                    )));
                }
                DemoMode::Translate(language)
            }
            OperationKind::Rewrite => return Err(CapabilityError::Unavailable(kind)),
        };

        debug!("Demo service created {} handle", kind.capability_name());
        Ok(Box::new(DemoCapabilityHandle {
            data: self.data.clone(),
            mode,
        }))
    }
}

enum DemoMode {
    Simplify,
    Describe,
    Translate(String),
}

struct DemoCapabilityHandle {
    data: Arc<DemoData>,
    mode: DemoMode,
}

#[async_trait]
impl CapabilityHandle for DemoCapabilityHandle {
    async fn invoke(&self, input: &str) -> std::result::Result<String, CapabilityError> {
        match &self.mode {
            DemoMode::Simplify => self
                .data
                .simplify(input)
                .map(str::to_string)
                .ok_or_else(|| CapabilityError::Invocation("no canned simplification for this text".to_string())),
            DemoMode::Describe => Ok(self.data.describe(input)),
            DemoMode::Translate(language) => {
                let phrases = self.data.translations.get(language).map(Vec::as_slice).unwrap_or_default();
                let translated = phrases
                    .iter()
                    .find(|entry| input.contains(entry.phrase.as_str()))
                    .map(|entry| input.replacen(entry.phrase.as_str(), &entry.translation, 1))
                    .unwrap_or_else(|| input.to_string());
                Ok(translated)
            }
        }
    }

    async fn release(&self) -> std::result::Result<(), CapabilityError> {
        Ok(())
    }
}
