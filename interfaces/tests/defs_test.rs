use interfaces::defs::{
    CapabilityError, CapabilityService, ChunkSet, OperationKind, OperationOptions, OperationRequest,
    TextUnit, OPTION_TARGET_LANGUAGE,
};
use interfaces::empty::UnsupportedCapabilityService;

#[test]
fn test_text_unit_counts_chars_not_bytes() {
    let unit = TextUnit::new("Dirección:");
    assert_eq!(unit.length, 10);
    assert_eq!(unit.content, "Dirección:");
}

#[test]
fn test_chunk_set_join_preserves_order() {
    let set = ChunkSet {
        chunks: vec![TextUnit::from("First."), TextUnit::from("Second."), TextUnit::from("Third.")],
    };
    assert_eq!(set.len(), 3);
    assert_eq!(set.join(" "), "First. Second. Third.");
}

#[test]
fn test_operation_request_builder() {
    let request = OperationRequest::new(OperationKind::Translate, "Hours:")
        .with_option(OPTION_TARGET_LANGUAGE, "es");
    assert_eq!(request.payload.length, 6);
    assert_eq!(request.options.get(OPTION_TARGET_LANGUAGE).map(String::as_str), Some("es"));
}

#[test]
fn test_kind_names() {
    assert_eq!(OperationKind::Describe.to_string(), "describe");
    assert_eq!(OperationKind::Describe.capability_name(), "writer");
    assert_eq!(OperationKind::Summarize.capability_name(), "summarizer");
}

#[tokio::test]
async fn test_unsupported_service_supports_nothing() {
    let service = UnsupportedCapabilityService;
    for kind in OperationKind::ALL {
        assert!(!service.supports(kind), "{kind} should be unsupported");
        let result = service.create(kind, &OperationOptions::new()).await;
        assert!(matches!(result, Err(CapabilityError::Unavailable(k)) if k == kind));
    }
}
