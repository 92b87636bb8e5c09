use access_bridge::{
    BridgeConfig, Dispatcher, HttpCapabilityConfig, HttpCapabilityService, ImageContext, OperationKind,
    OperationOptions, OPTION_TARGET_LANGUAGE,
};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "access-bridge", about = "Accessibility text tools with AI and local fallbacks")]
struct Cli {
    /// Read input from this file instead of stdin
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    /// Chunk texts longer than this many characters
    #[arg(long, global = true)]
    max_length: Option<usize>,

    /// Never call the AI service, even when one is configured
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simplify text into a few short sentences
    Simplify,
    /// Generate alt text from a description read from the input
    Describe {
        /// Image source path or URL
        #[arg(long)]
        src: Option<String>,
        /// Image title attribute
        #[arg(long)]
        title: Option<String>,
        /// Figure caption
        #[arg(long)]
        caption: Option<String>,
    },
    /// Translate text
    Translate {
        /// Target language code, e.g. es or fr
        #[arg(long)]
        to: Option<String>,
    },
    /// Rewrite text in plainer words
    Rewrite,
    /// Summary meant to be read aloud
    AudioSummary,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    let mut config = BridgeConfig::from_env()?;
    if let Some(max_length) = cli.max_length {
        config.max_chunk_length = max_length;
        config.validate()?;
    }

    let mut dispatcher = build_dispatcher(config, cli.offline)?;
    let input = read_input(cli.file.as_ref())?;

    let output = match cli.command {
        Command::Simplify => {
            dispatcher
                .process_long_text(&input, OperationKind::Summarize, OperationOptions::new())
                .await
        }
        Command::Describe { src, title, caption } => {
            let image = ImageContext {
                src,
                title,
                nearby_text: None,
                caption,
            };
            dispatcher.describe_text(&image, &input).await.text
        }
        Command::Translate { to } => {
            let target = to.unwrap_or_else(|| dispatcher.config().default_target_language.clone());
            let mut options = OperationOptions::new();
            options.insert(OPTION_TARGET_LANGUAGE.to_string(), target);
            dispatcher.process_long_text(&input, OperationKind::Translate, options).await
        }
        Command::Rewrite => {
            dispatcher
                .process_long_text(&input, OperationKind::Rewrite, OperationOptions::new())
                .await
        }
        Command::AudioSummary => dispatcher.audio_summary(&input).await.text,
    };

    println!("{}", output);
    dispatcher.release().await;
    Ok(())
}

fn build_dispatcher(config: BridgeConfig, offline: bool) -> anyhow::Result<Dispatcher> {
    if offline {
        info!("Offline mode, using local heuristics only");
        return Ok(Dispatcher::heuristics_only(config));
    }

    match HttpCapabilityConfig::from_env()? {
        Some(http_config) => {
            info!("Using AI endpoint at {}", http_config.base_url);
            let service = HttpCapabilityService::new(reqwest::Client::new(), http_config)?;
            Ok(Dispatcher::new(Box::new(service), config))
        }
        None => {
            warn!("ACCESS_BRIDGE_AI_BASE_URL not set, using local heuristics only");
            Ok(Dispatcher::heuristics_only(config))
        }
    }
}

fn read_input(file: Option<&PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input).context("failed to read stdin")?;
            Ok(input)
        }
    }
}
