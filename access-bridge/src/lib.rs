pub mod types;
pub mod utils;
pub mod heuristics;
pub mod chunking;
pub mod orchestrator;
pub mod dispatcher;
pub mod processing;
pub mod mock_capability;
pub mod http_capability;

pub use types::*;
pub use chunking::{is_text_too_long, split_long_text};
pub use orchestrator::{process_long_text, ChunkProcessor};
pub use dispatcher::{Dispatcher, DispatchChunks};
pub use processing::{
    AltTextStage, Enhancement, EnhancementInput, EnhancementOutput, EnhancementStage, ImageBlock, PageBlock,
    SimplifyStage, TranslateStage,
};
pub use mock_capability::{MockCapabilityService, MockCounters};
pub use http_capability::{HttpCapabilityConfig, HttpCapabilityService};
