// Error handling tests
// Author: kelexine (https://github.com/kelexine)

use std::error::Error;
use vision_ocr::error::VisionError;
use vision_ocr::source::classify;
use vision_ocr::vision::create_context;

#[test]
fn test_error_display_messages() {
    let errors = vec![
        VisionError::Classification("no match".to_string()),
        VisionError::invalid_argument("Arguments is not a file."),
        VisionError::MalformedContext("bad shape".to_string()),
        VisionError::VisionApi {
            status: 400,
            message: "Bad image".to_string(),
        },
        VisionError::Config("missing key".to_string()),
    ];

    for error in errors {
        let display = format!("{}", error);
        assert!(!display.is_empty(), "Error should have display message");
    }
}

#[test]
fn test_invalid_argument_message_is_verbatim() {
    let error = VisionError::invalid_argument("Arguments is not an url.");
    assert_eq!(error.to_string(), "Arguments is not an url.");
    assert!(error.source().is_none());
    assert!(error.cause().is_none());
}

#[test]
fn test_rewrap_keeps_original_cause() {
    let original = VisionError::VisionApi {
        status: 503,
        message: "Service unavailable".to_string(),
    };
    let wrapped = original.into_invalid_argument();

    assert!(wrapped.is_invalid_argument());
    assert!(wrapped.to_string().contains("Service unavailable"));
    assert!(wrapped.source().is_some());
    assert!(matches!(
        wrapped.cause(),
        Some(VisionError::VisionApi { status: 503, .. })
    ));
}

#[test]
fn test_vision_api_error() {
    let error = VisionError::VisionApi {
        status: 429,
        message: "Quota exceeded".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("429"));
    assert!(display.contains("Quota exceeded"));
}

#[test]
fn test_classification_error_from_classifier() {
    let error = classify("no way this is an image!").unwrap_err();
    assert!(matches!(error, VisionError::Classification(_)));
}

#[test]
fn test_malformed_context_error_from_builder() {
    let error = create_context(serde_json::json!({"requests": 7})).unwrap_err();
    assert!(format!("{}", error).contains("number given"));
}

#[test]
fn test_json_error_conversion() {
    let parse: Result<serde_json::Value, _> = serde_json::from_str("{");
    let error: VisionError = parse.unwrap_err().into();
    assert!(matches!(error, VisionError::Json(_)));
}
