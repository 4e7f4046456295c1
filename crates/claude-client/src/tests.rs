/// Reply parsing against the shapes models actually produce.
#[cfg(test)]
mod parse {
    use crate::{parse_json_reply, ClaudeClientError};
    use serde_json::json;

    #[test]
    fn strict_json() {
        let v = parse_json_reply(r#"{"risk": "high"}"#).unwrap();
        assert_eq!(v, json!({ "risk": "high" }));
    }

    #[test]
    fn fenced_block() {
        let reply = "Here is the breakdown:\n```json\n[{\"name\": \"Design\", \"hours\": 8}]\n```\nLet me know.";
        let v = parse_json_reply(reply).unwrap();
        assert_eq!(v[0]["hours"], 8);
    }

    #[test]
    fn unlabelled_fence() {
        let reply = "```\n{\"ok\": true}\n```";
        assert_eq!(parse_json_reply(reply).unwrap(), json!({ "ok": true }));
    }

    #[test]
    fn embedded_object() {
        let reply = "Sure! {\"completionProbability\": \"80%\"} Hope that helps.";
        let v = parse_json_reply(reply).unwrap();
        assert_eq!(v["completionProbability"], "80%");
    }

    #[test]
    fn embedded_array() {
        let reply = "Subtasks: [1, 2, 3] done";
        assert_eq!(parse_json_reply(reply).unwrap(), json!([1, 2, 3]));
    }

    #[test]
    fn prose_is_rejected() {
        let err = parse_json_reply("I could not analyze this project.").unwrap_err();
        assert!(matches!(err, ClaudeClientError::InvalidJson(_)));
    }

    #[test]
    fn broken_json_is_rejected() {
        let err = parse_json_reply("{\"a\": ").unwrap_err();
        assert!(matches!(err, ClaudeClientError::InvalidJson(_)));
    }
}

/// `AnthropicClient` against a local mock of the Messages endpoint.
#[cfg(test)]
mod client {
    use crate::{AnthropicClient, ClaudeClientError, ClientConfig, Completion, CompletionRequest};
    use std::time::Duration;

    fn config(base: String) -> ClientConfig {
        ClientConfig {
            api_key: "test-key".into(),
            api_base: base,
            max_retries: 2,
            retry_delay: Duration::from_millis(1),
            ..Default::default()
        }
    }

    #[test]
    fn api_key_required() {
        let err = AnthropicClient::new(ClientConfig::default()).err().unwrap();
        assert!(matches!(err, ClaudeClientError::MissingApiKey));
    }

    #[tokio::test]
    async fn concatenates_text_blocks() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/messages")
            .match_header("x-api-key", "test-key")
            .match_header("anthropic-version", "2023-06-01")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"content": [
                    {"type": "text", "text": "Hello, "},
                    {"type": "tool_use", "id": "x"},
                    {"type": "text", "text": "world"}
                ]}"#,
            )
            .create_async()
            .await;

        let client = AnthropicClient::new(config(server.url())).unwrap();
        let text = client
            .complete(CompletionRequest::new("hi").with_max_tokens(10))
            .await
            .unwrap();
        assert_eq!(text, "Hello, world");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn client_error_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/messages")
            .with_status(400)
            .with_body("bad request")
            .expect(1)
            .create_async()
            .await;

        let client = AnthropicClient::new(config(server.url())).unwrap();
        let err = client.complete(CompletionRequest::new("hi")).await.unwrap_err();
        assert!(matches!(err, ClaudeClientError::Api { status: 400, .. }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_error_is_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/messages")
            .with_status(503)
            .expect(3)
            .create_async()
            .await;

        let client = AnthropicClient::new(config(server.url())).unwrap();
        let err = client.complete(CompletionRequest::new("hi")).await.unwrap_err();
        assert!(matches!(err, ClaudeClientError::Api { status: 503, .. }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn empty_reply_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/messages")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"content": []}"#)
            .create_async()
            .await;

        let client = AnthropicClient::new(config(server.url())).unwrap();
        let err = client.complete(CompletionRequest::new("hi")).await.unwrap_err();
        assert!(matches!(err, ClaudeClientError::EmptyResponse));
    }
}
