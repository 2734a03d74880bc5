// VisionClient end-to-end tests against a mock annotate endpoint
// Author: kelexine (https://github.com/kelexine)

use base64::Engine;
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use std::error::Error;
use std::io::Write;
use vision_ocr::config::VisionConfig;
use vision_ocr::error::VisionError;
use vision_ocr::vision::{ImageContext, ReadOptions, VisionClient};

// Tiny 1x1 PNG (base64 encoded)
const PNG_B64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";

const OCR_RESPONSE: &str = r#"{"responses": [{"textAnnotations": [{"locale": "en", "description": "HELLO"}]}]}"#;

fn png_bytes() -> Vec<u8> {
    base64::engine::general_purpose::STANDARD
        .decode(PNG_B64)
        .unwrap()
}

fn client_for(server: &ServerGuard) -> VisionClient {
    let config = VisionConfig {
        endpoint_url: format!("{}/v1/images:annotate", server.url()),
        ..VisionConfig::default()
    };
    VisionClient::with_config("test-key", config).unwrap()
}

fn annotate_query() -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("key".into(), "test-key".into()),
        Matcher::UrlEncoded("alt".into(), "json".into()),
    ])
}

fn content_matcher(max_results: u32) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::Regex(format!(r#""content":"{}""#, regex::escape(PNG_B64))),
        Matcher::Regex(format!(r#""maxResults":{}[,}}]"#, max_results)),
        Matcher::Regex(r#""type":"TEXT_DETECTION""#.to_string()),
    ])
}

#[tokio::test]
async fn test_read_from_binary_posts_once() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/images:annotate")
        .match_query(annotate_query())
        .match_header("content-type", "application/json")
        .match_header("x-origin", "https://explorer.apis.google.com")
        .match_body(content_matcher(10))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(OCR_RESPONSE)
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    let result = client
        .read_from_binary(&png_bytes(), &ReadOptions::default())
        .await
        .unwrap();

    assert_eq!(result["responses"][0]["textAnnotations"][0]["description"], "HELLO");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_read_image_base64_with_context() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/images:annotate")
        .match_query(annotate_query())
        .match_body(Matcher::AllOf(vec![
            content_matcher(3),
            Matcher::Regex(r#""imageContext":\{"languageHints":\["en"\]\}"#.to_string()),
        ]))
        .with_status(200)
        .with_body(OCR_RESPONSE)
        .expect(1)
        .create_async()
        .await;

    let mut context = ImageContext::new();
    context.insert("languageHints".to_string(), json!(["en"]));
    let options = ReadOptions::new().max_results(3).context(context);

    let client = client_for(&server);
    let result = client.read_image(PNG_B64, &options).await.unwrap();

    assert!(result["responses"].is_array());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_read_image_from_url() {
    let mut server = Server::new_async().await;
    let referer = format!("{}/scans/", server.url());

    let image_mock = server
        .mock("GET", "/scans/page.png")
        .match_query(Matcher::UrlEncoded("sig".into(), "abc".into()))
        .match_header("referer", referer.as_str())
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_body(png_bytes())
        .expect(1)
        .create_async()
        .await;

    let annotate_mock = server
        .mock("POST", "/v1/images:annotate")
        .match_query(annotate_query())
        .match_body(content_matcher(10))
        .with_status(200)
        .with_body(OCR_RESPONSE)
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    let url = format!("{}/scans/page.png?sig=abc", server.url());
    let result = client.read_image(&url, &ReadOptions::default()).await.unwrap();

    assert_eq!(result["responses"][0]["textAnnotations"][0]["locale"], "en");
    image_mock.assert_async().await;
    annotate_mock.assert_async().await;
}

#[tokio::test]
async fn test_url_download_failure_is_invalid_argument() {
    let mut server = Server::new_async().await;
    let _image_mock = server
        .mock("GET", "/missing.png")
        .with_status(404)
        .create_async()
        .await;

    let client = client_for(&server);
    let url = format!("{}/missing.png", server.url());
    let err = client
        .read_from_url(&url, &ReadOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_invalid_argument());
    assert!(err.source().is_some());
    assert!(matches!(err.cause(), Some(VisionError::Http(_))));
}

#[tokio::test]
async fn test_url_provider_failure_is_invalid_argument() {
    let mut server = Server::new_async().await;
    let _image_mock = server
        .mock("GET", "/page.png")
        .with_status(200)
        .with_body(png_bytes())
        .create_async()
        .await;
    let _annotate_mock = server
        .mock("POST", "/v1/images:annotate")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body(r#"{"error": {"code": 500, "message": "backend error"}}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let url = format!("{}/page.png", server.url());
    let err = client
        .read_from_url(&url, &ReadOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_invalid_argument());
    assert!(err.to_string().contains("backend error"));
}

#[tokio::test]
async fn test_provider_error_propagates() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/images:annotate")
        .match_query(Matcher::Any)
        .with_status(403)
        .with_body(r#"{"error": {"code": 403, "message": "API key not valid.", "status": "PERMISSION_DENIED"}}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client
        .read_from_binary(&png_bytes(), &ReadOptions::default())
        .await
        .unwrap_err();

    match err {
        VisionError::VisionApi { status, message } => {
            assert_eq!(status, 403);
            assert_eq!(message, "API key not valid.");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_provider_json_propagates() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/images:annotate")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client
        .read_from_binary(&png_bytes(), &ReadOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, VisionError::Json(_)));
}

#[tokio::test]
async fn test_read_image_from_file() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/images:annotate")
        .match_query(annotate_query())
        .match_body(content_matcher(10))
        .with_status(200)
        .with_body(OCR_RESPONSE)
        .expect(1)
        .create_async()
        .await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&png_bytes()).unwrap();
    let path = file.path().to_str().unwrap().to_string();

    let client = client_for(&server);
    let result = client.read_image(&path, &ReadOptions::default()).await.unwrap();

    assert!(result["responses"].is_array());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_missing_file_is_invalid_argument() {
    let client = VisionClient::new("test-key").unwrap();
    let err = client
        .read_image("/nonexistent/vision-ocr/scan.png", &ReadOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_invalid_argument());
    assert!(err.to_string().contains("is not exists or not a file"));
}

#[tokio::test]
async fn test_directory_is_not_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().to_str().unwrap().to_string();

    let client = VisionClient::new("test-key").unwrap();
    let err = client
        .read_from_file(&path, &ReadOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_invalid_argument());
}

#[tokio::test]
async fn test_non_image_file_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"just some notes\n").unwrap();
    let path = file.path().to_str().unwrap().to_string();

    let client = VisionClient::new("test-key").unwrap();
    let err = client
        .read_from_file(&path, &ReadOptions::default())
        .await
        .unwrap_err();

    // Plain text is neither raw binary nor base64
    assert_eq!(err.to_string(), "Argument image source is not a binary.");
}

#[tokio::test]
async fn test_wrong_kind_for_reader() {
    let client = VisionClient::new("test-key").unwrap();

    let err = client
        .read_from_url("/tmp/scan.png", &ReadOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Arguments is not an url.");

    let err = client
        .read_from_file("https://example.com/scan.png", &ReadOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Arguments is not a file.");
}

#[tokio::test]
async fn test_unclassifiable_input() {
    let client = VisionClient::new("test-key").unwrap();
    let err = client
        .read_image("scan.png is not here!", &ReadOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_invalid_argument());
    assert_eq!(err.to_string(), "Argument image source is not a binary.");
    assert!(matches!(err.cause(), Some(VisionError::Classification(_))));
}

#[tokio::test]
async fn test_truncated_headers_never_reach_the_provider() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/images:annotate")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(OCR_RESPONSE)
        .expect(0)
        .create_async()
        .await;

    let inputs: Vec<Vec<u8>> = vec![
        [b"BM".as_slice(), &[0u8; 10]].concat(),
        [b"\x00\x00\x01\x00".as_slice(), &[0u8; 8]].concat(),
        b"\x89PNG\r\n\x1a\n\x00\x00\x00\x00".to_vec(),
    ];

    let client = client_for(&server);
    for data in inputs {
        let err = client
            .read_from_binary(&data, &ReadOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Argument image source is not an image file.");
    }

    mock.assert_async().await;
}
