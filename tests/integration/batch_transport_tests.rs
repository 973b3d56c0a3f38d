//! Batch transport over HTTP

#[cfg(test)]
mod tests {
    use crate::common::platform::inner_requests;
    use crate::common::{BatchEndpoint, multipart_response, test_config};
    use adsync::core::models::{LineItemKey, TargetingType};
    use adsync::core::platform::{bulk_edit_request, bulk_list_request};
    use adsync::{BatchExecutor, BatchTransport, BulkEditPayload, SyncError};
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn base_url(server: &MockServer) -> String {
        format!("{}/v1", server.uri())
    }

    #[tokio::test]
    async fn test_chunk_is_sent_as_one_multipart_call() {
        let server = MockServer::start().await;
        let first = LineItemKey::new("1", "10");
        let second = LineItemKey::new("1", "11");

        Mock::given(method("POST"))
            .and(path("/batch"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(BatchEndpoint::default().with_keyword(&first, "shoes", false))
            .expect(1)
            .mount(&server)
            .await;

        let config = test_config(&server.uri());
        let transport = BatchTransport::new(config.platform()).unwrap();
        let operations = vec![
            bulk_list_request(&base_url(&server), &first, &[TargetingType::Keyword]).unwrap(),
            bulk_list_request(&base_url(&server), &second, &[TargetingType::Keyword]).unwrap(),
        ];

        let outcome = transport.execute(&operations).await.unwrap();
        assert_eq!(outcome.success.len(), 2);
        assert!(!outcome.has_errors());

        let requests = server.received_requests().await.unwrap();
        let content_type = requests[0]
            .headers
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(content_type.starts_with("multipart/mixed; boundary=batch_"));

        let body = String::from_utf8(requests[0].body.clone()).unwrap();
        let inner = inner_requests(&body);
        assert_eq!(inner.len(), 2);
        assert!(inner.iter().all(|(m, _)| m == "GET"));
        assert!(body.contains("Content-ID: <1>"));
        assert!(body.contains("Content-ID: <2>"));
    }

    #[tokio::test]
    async fn test_edit_payload_travels_inside_the_part() {
        let server = MockServer::start().await;
        let key = LineItemKey::new("1", "10");

        Mock::given(method("POST"))
            .and(path("/batch"))
            .respond_with(BatchEndpoint::default().failing_edit(&key))
            .mount(&server)
            .await;

        let config = test_config(&server.uri());
        let transport = BatchTransport::new(config.platform()).unwrap();
        let payload: BulkEditPayload = serde_json::from_value(json!({
            "createRequests": [{
                "targetingType": "TARGETING_TYPE_KEYWORD",
                "assignedTargetingOptions": [{"keywordDetails": {"keyword": "boots", "negative": false}}]
            }]
        }))
        .unwrap();
        let operation = bulk_edit_request(&base_url(&server), &key, &payload).unwrap();

        let outcome = transport.execute(&[operation]).await.unwrap();
        assert!(outcome.success.is_empty());
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].status.as_deref(), Some("INVALID_ARGUMENT"));

        let requests = server.received_requests().await.unwrap();
        let body = String::from_utf8(requests[0].body.clone()).unwrap();
        assert!(body.contains(":bulkEditLineItemAssignedTargetingOptions"));
        assert!(body.contains("\"boots\""));
    }

    #[tokio::test]
    async fn test_boundary_is_read_from_body_without_header() {
        let server = MockServer::start().await;
        let body = multipart_response(&[(200, json!({"assignedTargetingOptions": []}))]);

        Mock::given(method("POST"))
            .and(path("/batch"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let config = test_config(&server.uri());
        let transport = BatchTransport::new(config.platform()).unwrap();
        let operation =
            bulk_list_request(&base_url(&server), &LineItemKey::new("1", "2"), &[]).unwrap();

        let outcome = transport.execute(&[operation]).await.unwrap();
        assert_eq!(outcome.success.len(), 1);
    }

    #[tokio::test]
    async fn test_outer_failure_fails_the_chunk() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/batch"))
            .respond_with(ResponseTemplate::new(500).set_body_string("backend unavailable"))
            .expect(1)
            .mount(&server)
            .await;

        let config = test_config(&server.uri());
        let transport = BatchTransport::new(config.platform()).unwrap();
        let operation =
            bulk_list_request(&base_url(&server), &LineItemKey::new("1", "2"), &[]).unwrap();

        match transport.execute(&[operation]).await {
            Err(SyncError::Api { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "backend unavailable");
            }
            other => panic!("Expected an API error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_chunk_makes_no_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let config = test_config(&server.uri());
        let transport = BatchTransport::new(config.platform()).unwrap();
        let outcome = transport.execute(&[]).await.unwrap();
        assert!(outcome.is_empty());
    }
}
