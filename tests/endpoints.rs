//! Request/response endpoints against a mock server.

use bytes::Bytes;
use serde_json::json;
use video_agent_client::{
    ChatRequest, ClientError, ClientOptions, SearchRequest, UserIntent, VideoAgentClient,
    VideoClient,
};
use wiremock::matchers::{body_json, body_string, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> VideoAgentClient {
    let options = ClientOptions::new()
        .with_base_url(format!("{}/api/", server.uri()))
        .with_header("X-Client".to_string(), "tests".to_string());
    VideoAgentClient::new(options).expect("client builds")
}

#[tokio::test]
async fn test_summarize_posts_plain_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/summarize"))
        .and(header("content-type", "text/plain"))
        .and(header("x-client", "tests"))
        .and(body_string("字幕内容"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "content": "一段摘要",
            "message": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server).summarize("字幕内容").await.unwrap();

    assert!(response.success);
    assert_eq!(response.content.as_deref(), Some("一段摘要"));
}

#[tokio::test]
async fn test_sample_subtitle_sends_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload/content"))
        .and(body_string(""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "字幕加载成功",
            "content": "1\n00:00:00,000 --> 00:00:05,000\n大家好",
            "fileName": null,
            "charCount": 0
        })))
        .mount(&server)
        .await;

    let response = client_for(&server).sample_subtitle().await.unwrap();

    assert!(response.success);
    assert!(response.content.unwrap().contains("大家好"));
}

#[tokio::test]
async fn test_upload_sends_multipart_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("filename=\"lesson.srt\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "字幕上传成功",
            "fileName": "lesson.srt",
            "charCount": 11
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .upload("lesson.srt", Bytes::from_static(b"1\nhello srt"))
        .await
        .unwrap();

    assert_eq!(response.file_name.as_deref(), Some("lesson.srt"));
    assert_eq!(response.char_count, Some(11));
}

#[tokio::test]
async fn test_chat_posts_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"subtitleContent": "text", "question": "why?"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "content": "because"
        })))
        .mount(&server)
        .await;

    let response = client_for(&server)
        .chat(&ChatRequest::new("text", "why?"))
        .await
        .unwrap();

    assert_eq!(response.content.as_deref(), Some("because"));
}

#[tokio::test]
async fn test_extract_concepts_parses_list() {
    let server = MockServer::start().await;
    let concepts = r#"```json
[{"timestampFrom":"00:00:05","timestampTo":"00:00:12","concept":"Prompt Engineering","description":"核心技能"}]
```"#;
    Mock::given(method("POST"))
        .and(path("/api/extract"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "content": concepts
        })))
        .mount(&server)
        .await;

    let response = client_for(&server).extract_concepts("text").await.unwrap();
    let parsed = response.concepts().unwrap();

    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].timestamp_from, "00:00:05");
    assert_eq!(parsed[0].concept, "Prompt Engineering");
}

#[tokio::test]
async fn test_extract_quotes_reports_server_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/quotes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "提取金句失败: timeout",
            "content": null
        })))
        .mount(&server)
        .await;

    let response = client_for(&server).extract_quotes("text").await.unwrap();

    assert!(!response.success);
    assert_eq!(response.content, None);
    assert_eq!(response.message.as_deref(), Some("提取金句失败: timeout"));
}

#[tokio::test]
async fn test_search_keyword_posts_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/search"))
        .and(body_json(json!({"subtitleContent": "text", "keyword": "RAG"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "content": "[]"
        })))
        .mount(&server)
        .await;

    let response = client_for(&server)
        .search_keyword(&SearchRequest::new("text", "RAG"))
        .await
        .unwrap();

    assert!(response.success);
}

#[tokio::test]
async fn test_smart_ask_debug_flag() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ask"))
        .and(query_param("debug", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "intent": "SUMMARIZE",
            "confidence": 0.87,
            "content": "summary"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .smart_ask(&ChatRequest::new("text", "总结一下"), true)
        .await
        .unwrap();

    assert_eq!(response.content, "summary");
    assert_eq!(response.user_intent(), Some(UserIntent::Summarize));
    assert_eq!(response.confidence, Some(0.87));
}

#[tokio::test]
async fn test_smart_ask_without_debug() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ask"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "intent": null,
            "confidence": null,
            "content": "answer"
        })))
        .mount(&server)
        .await;

    let response = client_for(&server)
        .smart_ask(&ChatRequest::new("text", "q"), false)
        .await
        .unwrap();

    assert_eq!(response.content, "answer");
    assert_eq!(response.user_intent(), None);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = client_for(&server).chat(&ChatRequest::new("t", "q")).await;

    assert!(matches!(result, Err(ClientError::Status(404))));
}

#[tokio::test]
async fn test_invalid_json_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/summarize"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client_for(&server).summarize("t").await;

    assert!(matches!(result, Err(ClientError::Parse(_))));
}
