use access_bridge::dispatcher::describe_prompt;
use access_bridge::{
    BridgeConfig, Dispatcher, ImageContext, MockCapabilityService, OperationKind, OperationRequest, Result,
    ResultSource, OPTION_SOURCE_LANGUAGE, OPTION_TARGET_LANGUAGE, OPTION_TYPE,
};
use tracing::info;

fn mock_dispatcher(service: MockCapabilityService) -> Dispatcher {
    Dispatcher::new(Box::new(service), BridgeConfig::default())
}

#[tokio::test]
async fn test_unsupported_service_uses_heuristics() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let mut dispatcher = Dispatcher::heuristics_only(BridgeConfig::default());
    info!("Testing with {}", dispatcher.service_name());

    let result = dispatcher.summarize("This is short.").await;
    assert_eq!(result.text, "This is short.");
    assert_eq!(result.source, ResultSource::Heuristic);

    let translated = dispatcher.translate("Hola", "en").await;
    assert_eq!(translated.text, "Hola");
    assert_eq!(translated.source, ResultSource::Heuristic);

    assert_eq!(dispatcher.cached_handles(), 0);
    Ok(())
}

#[tokio::test]
async fn test_ai_service_result_is_tagged() -> Result<()> {
    let mut dispatcher = mock_dispatcher(MockCapabilityService::new("ai".to_string()).with_delay(5));

    let result = dispatcher.summarize("We utilize numerous tools.").await;
    assert_eq!(result.text, "[summarize] We utilize numerous tools.");
    assert_eq!(result.source, ResultSource::AiService);

    let rewritten = dispatcher.rewrite("numerous").await;
    assert_eq!(rewritten.text, "[rewrite] numerous");
    Ok(())
}

#[tokio::test]
async fn test_describe_sends_prompt_with_context() -> Result<()> {
    let mut dispatcher = mock_dispatcher(MockCapabilityService::new("writer".to_string()));

    let image = ImageContext {
        title: Some("Restaurant logo image".to_string()),
        ..ImageContext::default()
    };
    let result = dispatcher.describe(&image).await;

    assert_eq!(result.source, ResultSource::AiService);
    assert_eq!(result.text, format!("[describe] {}", describe_prompt("Restaurant logo image")));
    assert!(result.text.contains("Context: Restaurant logo image."));
    assert!(result.text.ends_with("Maximum 125 characters."));
    Ok(())
}

#[tokio::test]
async fn test_describe_falls_back_to_rules() -> Result<()> {
    let mut dispatcher = Dispatcher::heuristics_only(BridgeConfig::default());

    let logo = ImageContext {
        src: Some("https://example.com/assets/logo.png".to_string()),
        ..ImageContext::default()
    };
    assert_eq!(dispatcher.describe(&logo).await.text, "Company logo");

    let bare = dispatcher.describe(&ImageContext::default()).await;
    assert_eq!(bare.text, "Image: image on webpage");
    assert_eq!(bare.source, ResultSource::Heuristic);
    Ok(())
}

#[tokio::test]
async fn test_describe_text_keeps_long_descriptions() -> Result<()> {
    let mut dispatcher = Dispatcher::heuristics_only(BridgeConfig::default());

    let description = format!(
        "Our restaurant logo shown above the entrance, {}",
        "painted in red and gold lettering on a lacquered board ".repeat(4)
    );
    assert!(description.chars().count() > 200);

    let result = dispatcher.describe_text(&ImageContext::default(), &description).await;
    assert_eq!(result.text, "Company logo");
    assert_eq!(result.source, ResultSource::Heuristic);

    // The same text as nearby page text is too long to count as a hint.
    let image = ImageContext {
        nearby_text: Some(description.clone()),
        ..ImageContext::default()
    };
    assert_eq!(dispatcher.describe(&image).await.text, "Image: image on webpage");
    Ok(())
}

#[tokio::test]
async fn test_describe_text_sends_hints_then_description() -> Result<()> {
    let mut dispatcher = mock_dispatcher(MockCapabilityService::new("writer".to_string()));

    let image = ImageContext {
        src: Some("/img/front-door.jpg".to_string()),
        caption: Some("Opening night".to_string()),
        ..ImageContext::default()
    };
    let result = dispatcher.describe_text(&image, "  A crowd waits\n outside.  ").await;

    assert_eq!(
        result.text,
        format!("[describe] {}", describe_prompt("front door Opening night A crowd waits outside."))
    );
    Ok(())
}

#[tokio::test]
async fn test_unsupported_kind_falls_back_without_creating() -> Result<()> {
    let service = MockCapabilityService::new("partial".to_string()).with_supported(&[OperationKind::Summarize]);
    let counters = service.counters();
    let mut dispatcher = mock_dispatcher(service);

    let rewritten = dispatcher.rewrite("There are numerous options").await;
    assert_eq!(rewritten.text, "There are many options");
    assert_eq!(rewritten.source, ResultSource::Heuristic);
    assert_eq!(counters.created(), 0);

    let summary = dispatcher.summarize("Short.").await;
    assert_eq!(summary.source, ResultSource::AiService);
    assert_eq!(counters.created(), 1);
    Ok(())
}

#[tokio::test]
async fn test_invocation_failure_falls_back() -> Result<()> {
    let service = MockCapabilityService::new("flaky".to_string()).failing_on("UNAVAILABLE");
    let mut dispatcher = mock_dispatcher(service);

    let result = dispatcher.summarize("UNAVAILABLE right now. Try later.").await;
    assert_eq!(result.text, "UNAVAILABLE right now. Try later.");
    assert_eq!(result.source, ResultSource::Heuristic);

    // A failed invocation keeps the handle for the next request.
    assert_eq!(dispatcher.cached_handles(), 1);
    let next = dispatcher.summarize("All good.").await;
    assert_eq!(next.source, ResultSource::AiService);
    Ok(())
}

#[tokio::test]
async fn test_handles_are_cached_per_kind_and_options() -> Result<()> {
    let service = MockCapabilityService::new("cache".to_string());
    let counters = service.counters();
    let mut dispatcher = mock_dispatcher(service);

    dispatcher.summarize("First text.").await;
    dispatcher.summarize("Second text.").await;
    assert_eq!(counters.created(), 1);
    assert_eq!(counters.invoked(), 2);

    dispatcher.translate("Hours", "es").await;
    dispatcher.translate("Menu", "es").await;
    assert_eq!(counters.created(), 2);

    dispatcher.translate("Hours", "fr").await;
    assert_eq!(counters.created(), 3);
    assert_eq!(dispatcher.cached_handles(), 3);

    // Spelling out a default does not create a new handle.
    let request = OperationRequest::new(OperationKind::Summarize, "Third text.").with_option(OPTION_TYPE, "key-points");
    dispatcher.dispatch(&request).await;
    assert_eq!(counters.created(), 3);

    let request = OperationRequest::new(OperationKind::Summarize, "Fourth text.").with_option(OPTION_TYPE, "tl;dr");
    dispatcher.dispatch(&request).await;
    assert_eq!(counters.created(), 4);
    Ok(())
}

#[tokio::test]
async fn test_release_is_idempotent() -> Result<()> {
    let service = MockCapabilityService::new("release".to_string());
    let counters = service.counters();
    let mut dispatcher = mock_dispatcher(service);

    dispatcher.release().await;
    assert_eq!(counters.released(), 0);

    dispatcher.summarize("One.").await;
    dispatcher.rewrite("Two.").await;
    dispatcher.translate("Three.", "es").await;
    assert_eq!(dispatcher.cached_handles(), 3);

    dispatcher.release().await;
    assert_eq!(counters.released(), 3);
    assert_eq!(dispatcher.cached_handles(), 0);

    dispatcher.release().await;
    assert_eq!(counters.released(), 3);

    // Handles are created again on demand after a release.
    dispatcher.summarize("Again.").await;
    assert_eq!(counters.created(), 4);
    Ok(())
}

#[tokio::test]
async fn test_failed_release_still_clears_handles() -> Result<()> {
    let service = MockCapabilityService::new("stubborn".to_string()).with_failing_release();
    let counters = service.counters();
    let mut dispatcher = mock_dispatcher(service);

    dispatcher.summarize("One.").await;
    dispatcher.rewrite("Two.").await;
    dispatcher.release().await;

    assert_eq!(counters.released(), 2);
    assert_eq!(dispatcher.cached_handles(), 0);
    Ok(())
}

#[tokio::test]
async fn test_panicking_handle_is_evicted() -> Result<()> {
    let service = MockCapabilityService::new("panicky".to_string()).panicking_on("BOOM");
    let counters = service.counters();
    let mut dispatcher = mock_dispatcher(service);

    let result = dispatcher.summarize("BOOM goes the service.").await;
    assert_eq!(result.text, "BOOM goes the service.");
    assert_eq!(result.source, ResultSource::Heuristic);
    assert_eq!(dispatcher.cached_handles(), 0);

    let next = dispatcher.summarize("Calm text.").await;
    assert_eq!(next.text, "[summarize] Calm text.");
    assert_eq!(counters.created(), 2);
    Ok(())
}

#[tokio::test]
async fn test_audio_summary_heuristic_form() -> Result<()> {
    let mut dispatcher = Dispatcher::heuristics_only(BridgeConfig::default());

    let result = dispatcher.audio_summary("We utilize numerous tools. They work.").await;
    assert_eq!(result.text, "Here's a summary: We use many tools. They work.");
    assert_eq!(result.source, ResultSource::Heuristic);
    Ok(())
}

#[tokio::test]
async fn test_audio_summary_with_ai_service() -> Result<()> {
    let mut dispatcher = mock_dispatcher(MockCapabilityService::new("audio".to_string()));

    let result = dispatcher.audio_summary("We utilize numerous tools. They work.").await;
    assert_eq!(result.text, "[rewrite] [summarize] We utilize numerous tools. They work.");
    assert_eq!(result.source, ResultSource::AiService);
    Ok(())
}

#[tokio::test]
async fn test_audio_summary_mixed_sources_uses_heuristic_form() -> Result<()> {
    let service = MockCapabilityService::new("half".to_string()).with_supported(&[OperationKind::Summarize]);
    let mut dispatcher = mock_dispatcher(service);

    let result = dispatcher.audio_summary("We utilize numerous tools.").await;
    assert_eq!(result.text, "Here's a summary: summarize We use many tools.");
    assert_eq!(result.source, ResultSource::Heuristic);
    Ok(())
}

#[tokio::test]
async fn test_default_options_per_kind() -> Result<()> {
    let config = BridgeConfig {
        default_target_language: "de".to_string(),
        ..BridgeConfig::default()
    };
    let dispatcher = Dispatcher::new(Box::new(MockCapabilityService::new("defaults".to_string())), config);

    let translate = dispatcher.default_options(OperationKind::Translate);
    assert_eq!(translate.get(OPTION_SOURCE_LANGUAGE).map(String::as_str), Some("auto"));
    assert_eq!(translate.get(OPTION_TARGET_LANGUAGE).map(String::as_str), Some("de"));

    let summarize = dispatcher.default_options(OperationKind::Summarize);
    assert_eq!(summarize.get(OPTION_TYPE).map(String::as_str), Some("key-points"));
    assert_eq!(summarize.len(), 3);

    let rewrite = dispatcher.default_options(OperationKind::Rewrite);
    assert_eq!(rewrite.get("tone").map(String::as_str), Some("more-casual"));
    assert_eq!(rewrite.get("length").map(String::as_str), Some("shorter"));
    Ok(())
}
