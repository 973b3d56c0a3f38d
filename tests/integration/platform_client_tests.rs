//! Single-call client over HTTP

#[cfg(test)]
mod tests {
    use crate::common::test_config;
    use adsync::core::models::{AdvertiserId, InsertionOrderId, LineItemId, LineItemKey, TargetingType};
    use adsync::{PlatformApi, PlatformClient, RetryPolicy, SyncError};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> PlatformClient {
        let config = test_config(&server.uri());
        PlatformClient::new(config.platform(), RetryPolicy::new(config.retry().clone())).unwrap()
    }

    fn line_item_json(line_item_id: &str) -> serde_json::Value {
        json!({
            "advertiserId": "1",
            "insertionOrderId": "5",
            "lineItemId": line_item_id,
            "displayName": format!("Line item {}", line_item_id),
            "entityStatus": "ENTITY_STATUS_ACTIVE"
        })
    }

    #[tokio::test]
    async fn test_transient_error_is_retried() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/advertisers/1/lineItems/10"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": {"code": 429, "message": "Quota exceeded for quota metric 'Read requests'"}
            })))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/advertisers/1/lineItems/10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(line_item_json("10")))
            .expect(1)
            .mount(&server)
            .await;

        let line_item = client(&server)
            .get_line_item(&AdvertiserId::from("1"), &LineItemId::from("10"))
            .await
            .unwrap();
        assert_eq!(line_item.key(), LineItemKey::new("1", "10"));
        assert_eq!(line_item.display_name, "Line item 10");
        assert_eq!(line_item.other["entityStatus"], "ENTITY_STATUS_ACTIVE");
    }

    #[tokio::test]
    async fn test_retries_are_bounded() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/advertisers/1/lineItems/10"))
            .respond_with(
                ResponseTemplate::new(500).set_body_string("Internal error encountered."),
            )
            .expect(3)
            .mount(&server)
            .await;

        let result = client(&server)
            .get_line_item(&AdvertiserId::from("1"), &LineItemId::from("10"))
            .await;
        assert!(matches!(result, Err(SyncError::Api { status: 500, .. })));
    }

    #[tokio::test]
    async fn test_permanent_error_is_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/advertisers/1/lineItems/99"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {"code": 404, "message": "Requested entity was not found."}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = client(&server)
            .get_line_item(&AdvertiserId::from("1"), &LineItemId::from("99"))
            .await;
        assert_eq!(result.unwrap_err().status_code(), Some(404));
    }

    #[tokio::test]
    async fn test_line_item_listing_follows_page_tokens() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/advertisers/1/lineItems"))
            .and(query_param("pageToken", "page-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "lineItems": [line_item_json("12")]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/advertisers/1/lineItems"))
            .and(query_param("filter", "insertionOrderId=5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "lineItems": [line_item_json("10"), line_item_json("11")],
                "nextPageToken": "page-2"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let line_items = client(&server)
            .list_line_items(&AdvertiserId::from("1"), &InsertionOrderId::from("5"))
            .await
            .unwrap();
        let ids: Vec<_> = line_items.iter().map(|li| li.line_item_id.as_str()).collect();
        assert_eq!(ids, vec!["10", "11", "12"]);
    }

    #[tokio::test]
    async fn test_patch_sends_update_mask_and_keeps_unknown_fields() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/v1/advertisers/1/lineItems/10"))
            .and(query_param("updateMask", "displayName"))
            .and(body_partial_json(json!({
                "displayName": "Renamed",
                "entityStatus": "ENTITY_STATUS_ACTIVE"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "advertiserId": "1",
                "insertionOrderId": "5",
                "lineItemId": "10",
                "displayName": "Renamed",
                "entityStatus": "ENTITY_STATUS_ACTIVE"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut line_item: adsync::core::platform::LineItem =
            serde_json::from_value(line_item_json("10")).unwrap();
        line_item.display_name = "Renamed".to_string();

        let updated = client(&server)
            .patch_line_item(&line_item, "displayName")
            .await
            .unwrap();
        assert_eq!(updated.display_name, "Renamed");
        assert_eq!(updated.other["entityStatus"], "ENTITY_STATUS_ACTIVE");
    }

    #[tokio::test]
    async fn test_assigned_option_listing_follows_page_tokens() {
        let server = MockServer::start().await;
        let options_path =
            "/v1/advertisers/1/lineItems/10/targetingTypes/TARGETING_TYPE_KEYWORD/assignedTargetingOptions";
        let option = |id: &str, keyword: &str| {
            json!({
                "name": format!(
                    "advertisers/1/lineItems/10/targetingTypes/TARGETING_TYPE_KEYWORD/assignedTargetingOptions/{}",
                    id
                ),
                "targetingType": "TARGETING_TYPE_KEYWORD",
                "keywordDetails": {"keyword": keyword, "negative": false}
            })
        };

        Mock::given(method("GET"))
            .and(path(options_path))
            .and(query_param("pageToken", "page-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "assignedTargetingOptions": [option("b", "boots")]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(options_path))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "assignedTargetingOptions": [option("a", "shoes")],
                "nextPageToken": "page-2"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let options = client(&server)
            .list_assigned_targeting_options(&LineItemKey::new("1", "10"), TargetingType::Keyword)
            .await
            .unwrap();
        let keywords: Vec<_> = options
            .iter()
            .filter_map(|o| o.keyword_details.as_ref())
            .map(|k| k.keyword.as_str())
            .collect();
        assert_eq!(keywords, vec!["shoes", "boots"]);
    }

    #[tokio::test]
    async fn test_targeting_catalogue_is_scoped_to_advertiser() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(
                "/v1/targetingTypes/TARGETING_TYPE_SENSITIVE_CATEGORY_EXCLUSION/targetingOptions",
            ))
            .and(query_param("advertiserId", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "targetingOptions": [{
                    "targetingOptionId": "1000",
                    "sensitiveCategoryDetails": {"sensitiveCategory": "SENSITIVE_CATEGORY_ADULT"}
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let options = client(&server)
            .list_targeting_options(
                &AdvertiserId::from("1"),
                TargetingType::SensitiveCategoryExclusion,
            )
            .await
            .unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0]["targetingOptionId"], "1000");
    }

    #[tokio::test]
    async fn test_single_bulk_edit_call() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(
                "/v1/advertisers/1/lineItems/10:bulkEditLineItemAssignedTargetingOptions",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "createdAssignedTargetingOptions": [{
                    "name": "advertisers/1/lineItems/10/targetingTypes/TARGETING_TYPE_KEYWORD/assignedTargetingOptions/9"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let payload = serde_json::from_value(json!({
            "createRequests": [{
                "targetingType": "TARGETING_TYPE_KEYWORD",
                "assignedTargetingOptions": [{"keywordDetails": {"keyword": "boots"}}]
            }]
        }))
        .unwrap();
        let response = client(&server)
            .bulk_edit_assigned_targeting_options(&LineItemKey::new("1", "10"), &payload)
            .await
            .unwrap();
        assert!(response["createdAssignedTargetingOptions"].is_array());

        let requests = server.received_requests().await.unwrap();
        let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(
            sent["createRequests"][0]["assignedTargetingOptions"][0]["keywordDetails"]["keyword"],
            "boots"
        );
    }
}
