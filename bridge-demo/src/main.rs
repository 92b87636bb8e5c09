use access_bridge::processing::audio_summary_for_page;
use access_bridge::{
    AltTextStage, BridgeConfig, Dispatcher, EnhancementInput, EnhancementOutput, EnhancementStage, SimplifyStage,
    TranslateStage,
};
use bridge_demo::restaurant;
use bridge_demo::DemoCapabilityService;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let target_language = std::env::args().nth(1).unwrap_or_else(|| "es".to_string());

    let service = DemoCapabilityService::new()?;
    let mut dispatcher = Dispatcher::new(Box::new(service), BridgeConfig::from_env()?);

    let stages: Vec<(Box<dyn EnhancementStage>, EnhancementInput)> = vec![
        (
            Box::new(SimplifyStage::from_dispatcher(&dispatcher)) as Box<dyn EnhancementStage>,
            EnhancementInput::from_blocks(restaurant::text_blocks()),
        ),
        (
            Box::new(AltTextStage::from_dispatcher(&dispatcher)) as Box<dyn EnhancementStage>,
            EnhancementInput::from_images(restaurant::images()),
        ),
        (
            Box::new(TranslateStage::from_dispatcher(&dispatcher, target_language.as_str())) as Box<dyn EnhancementStage>,
            EnhancementInput::from_blocks(restaurant::text_blocks()),
        ),
    ];

    for (mut stage, input) in stages {
        info!("Running stage: {}", stage.stage_name());
        let output = stage.process(&mut dispatcher, input).await;
        print_output(&output);
    }

    match audio_summary_for_page(&mut dispatcher, &restaurant::paragraphs()).await {
        Some(summary) => println!("\n[audio summary, {:?}]\n{}", summary.source, summary.text),
        None => warn!("Page has too little content for an audio summary"),
    }

    dispatcher.release().await;
    Ok(())
}

fn print_output(output: &EnhancementOutput) {
    let stage = output.metadata.get("stage").map(String::as_str).unwrap_or("unknown");
    println!(
        "\n[{}] {} applied, {} skipped",
        stage,
        output.enhancements.len(),
        output.metadata.get("blocks_skipped").map(String::as_str).unwrap_or("0")
    );
    for enhancement in &output.enhancements {
        println!("  {} ({:?}): {}", enhancement.block_id, enhancement.source, enhancement.replacement);
    }
}
