mod common;

use common::{init_tracing, test_config, verdict_json, ScriptedLlm};
use std::sync::Arc;
use std::time::Duration;
use verify_gateway::schema::{self, MAX_SOURCES};
use verify_gateway::{InferenceError, RawInferenceResponse, VerdictInferenceClient};

const KEY: &str = "xai-test-key";

#[tokio::test]
async fn test_request_carries_fixed_configuration() {
    init_tracing();
    let adapter = Arc::new(ScriptedLlm::replying(verdict_json("no", 0)));
    let client = VerdictInferenceClient::new(adapter.clone(), test_config().inference);

    client.infer(KEY, "Some claim to check").await.unwrap();

    let requests = adapter.requests();
    assert_eq!(requests.len(), 1, "exactly one request per invocation");
    let request = &requests[0];
    assert_eq!(request.user_text, "Some claim to check");
    assert_eq!(request.model_id, "grok-4-fast-reasoning");
    assert!(request.search_enabled);
    assert!((request.temperature - 0.2).abs() < f32::EPSILON);
    assert!(request.system_instruction.contains("disinformation"));
    assert!(request.system_instruction.contains("government"));
    assert_eq!(request.response_format, schema::response_format());
}

#[test]
fn test_schema_contract_is_strict_and_closed() {
    let format = schema::response_format();
    assert_eq!(format["type"], "json_schema");
    assert_eq!(format["json_schema"]["name"], "disinfo_check");
    assert_eq!(format["json_schema"]["strict"], true);

    let schema = &format["json_schema"]["schema"];
    assert_eq!(schema["additionalProperties"], false);
    assert_eq!(
        schema["required"],
        serde_json::json!(["decision", "summary", "explanation", "sources"])
    );
    assert_eq!(schema["properties"]["decision"]["enum"], serde_json::json!(["yes", "no"]));
    assert_eq!(schema["properties"]["sources"]["maxItems"], MAX_SOURCES);
}

#[tokio::test]
async fn test_message_content_is_returned_raw() {
    init_tracing();
    let content = r#"{"decision":"no","summary":"...","explanation":"...","sources":[]}"#;
    let client = VerdictInferenceClient::new(Arc::new(ScriptedLlm::replying(content)), test_config().inference);

    let response = client.infer(KEY, "text").await.unwrap();

    assert_eq!(
        response,
        RawInferenceResponse {
            content: content.to_string()
        }
    );
}

#[tokio::test]
async fn test_missing_or_blank_content_is_empty_response() {
    init_tracing();
    for reply in [None, Some(String::new()), Some("  ".to_string())] {
        let client = VerdictInferenceClient::new(
            Arc::new(ScriptedLlm::with_outcome(Ok(reply.clone()))),
            test_config().inference,
        );
        assert_eq!(client.infer(KEY, "text").await, Err(InferenceError::EmptyResponse), "reply: {:?}", reply);
    }
}

#[tokio::test]
async fn test_provider_rejection_is_bad_request_with_body() {
    init_tracing();
    let rejection = InferenceError::BadRequest {
        status: 400,
        body: "{\"error\":\"invalid schema\"}".to_string(),
    };
    let client = VerdictInferenceClient::new(
        Arc::new(ScriptedLlm::with_outcome(Err(rejection.clone()))),
        test_config().inference,
    );

    assert_eq!(client.infer(KEY, "text").await, Err(rejection));
}

#[tokio::test]
async fn test_exceeding_the_wait_is_unavailable() {
    init_tracing();
    let mut settings = test_config().inference;
    settings.timeout = Duration::from_millis(20);
    let adapter = ScriptedLlm::replying(verdict_json("yes", 1)).with_delay(Duration::from_secs(5));
    let client = VerdictInferenceClient::new(Arc::new(adapter), settings);

    let result = client.infer(KEY, "text").await;

    assert!(matches!(result, Err(InferenceError::Unavailable(_))), "got {:?}", result);
}
