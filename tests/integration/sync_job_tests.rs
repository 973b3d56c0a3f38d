//! Load and push jobs end to end

#[cfg(test)]
mod tests {
    use crate::common::assertions::SummaryAssertions;
    use crate::common::platform::inner_requests;
    use crate::common::{BatchEndpoint, FeedRowFactory, test_config};
    use adsync::core::correlation::{LOAD_STATUS_MESSAGE, PUSH_STATUS_MESSAGE};
    use adsync::core::models::LineItemKey;
    use adsync::{EntityType, JobContext, LoaderRegistry, MemoryLogSink, SyncJob};
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn job(server: &MockServer, sink: Arc<MemoryLogSink>) -> SyncJob {
        let config = test_config(&server.uri());
        let ctx = JobContext::from_config(&config, sink).unwrap();
        SyncJob::new(ctx, LoaderRegistry::from_config(&config.job().entities))
    }

    async fn batch_bodies(server: &MockServer) -> Vec<String> {
        server
            .received_requests()
            .await
            .unwrap()
            .into_iter()
            .filter(|request| request.url.path() == "/batch")
            .map(|request| String::from_utf8(request.body).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_push_adds_only_missing_options() {
        let server = MockServer::start().await;
        let shoes = LineItemKey::new("1", "10");
        let sandals = LineItemKey::new("1", "11");
        let settled = LineItemKey::new("1", "12");

        Mock::given(method("POST"))
            .and(path("/batch"))
            .respond_with(
                BatchEndpoint::default()
                    .with_keyword(&shoes, "shoes", false)
                    .with_keyword(&settled, "hats", false),
            )
            .expect(2)
            .mount(&server)
            .await;

        let rows = vec![
            FeedRowFactory::with_keywords(FeedRowFactory::line_item("1", "10"), "shoes,boots", ""),
            FeedRowFactory::with_keywords(FeedRowFactory::line_item("1", "11"), "", "sandals"),
            FeedRowFactory::with_keywords(FeedRowFactory::line_item("1", "12"), "hats", ""),
        ];

        let sink = Arc::new(MemoryLogSink::new());
        let summary = job(&server, sink.clone()).push(&rows).await.unwrap();

        summary.assert_clean();
        assert_eq!(summary.line_items, 3);
        assert_eq!(summary.empty_diffs, 1);
        assert_eq!(summary.operations, 5);
        assert!(sink.report().is_empty());

        let bodies = batch_bodies(&server).await;
        assert_eq!(bodies.len(), 2);
        let edits = inner_requests(&bodies[1]);
        assert_eq!(edits.len(), 2);
        assert!(edits.iter().all(|(m, _)| m == "POST"));
        assert!(bodies[1].contains("\"boots\""));
        assert!(bodies[1].contains("\"sandals\""));
        assert!(!bodies[1].contains("\"shoes\""));
        assert!(!bodies[1].contains("lineItems/12:"));
    }

    #[tokio::test]
    async fn test_push_attributes_failed_edit_by_elimination() {
        let server = MockServer::start().await;
        let failing = LineItemKey::new("1", "11");

        Mock::given(method("POST"))
            .and(path("/batch"))
            .respond_with(BatchEndpoint::default().failing_edit(&failing))
            .mount(&server)
            .await;

        let rows = vec![
            FeedRowFactory::with_keywords(FeedRowFactory::line_item("1", "10"), "boots", ""),
            FeedRowFactory::with_keywords(FeedRowFactory::line_item("1", "11"), "sandals", ""),
        ];

        let sink = Arc::new(MemoryLogSink::new());
        let summary = job(&server, sink.clone()).push(&rows).await.unwrap();

        summary.assert_failures(1, 1);
        let attributed = sink.attributed_records();
        assert_eq!(attributed.len(), 1);
        assert_eq!(attributed[0].advertiser_id, "1");
        assert_eq!(attributed[0].line_item_id, "11");
        assert_eq!(attributed[0].status_message, PUSH_STATUS_MESSAGE);

        let unattributed = sink.unattributed_records();
        assert_eq!(unattributed.len(), 1);
        assert_eq!(unattributed[0].error_message, "Request contains an invalid argument.");
    }

    #[tokio::test]
    async fn test_push_skips_line_items_that_failed_to_load() {
        let server = MockServer::start().await;
        let loaded = LineItemKey::new("1", "10");
        let unreadable = LineItemKey::new("1", "11");

        Mock::given(method("POST"))
            .and(path("/batch"))
            .respond_with(
                BatchEndpoint::default()
                    .with_keyword(&loaded, "shoes", false)
                    .failing_list(&unreadable),
            )
            .expect(2)
            .mount(&server)
            .await;

        let rows = vec![
            FeedRowFactory::with_keywords(FeedRowFactory::line_item("1", "10"), "boots", ""),
            FeedRowFactory::with_keywords(FeedRowFactory::line_item("1", "11"), "sandals", ""),
        ];

        let sink = Arc::new(MemoryLogSink::new());
        let summary = job(&server, sink.clone()).push(&rows).await.unwrap();

        assert_eq!(summary.attributed_failures, 1);
        let attributed = sink.attributed_records();
        assert_eq!(attributed[0].line_item_id, "11");
        assert_eq!(attributed[0].status_message, LOAD_STATUS_MESSAGE);

        let bodies = batch_bodies(&server).await;
        let edits = inner_requests(&bodies[1]);
        assert_eq!(edits.len(), 1);
        assert!(edits[0].1.contains("lineItems/10:"));
    }

    #[tokio::test]
    async fn test_push_resolves_categories_through_catalogue() {
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
        Mock::given(method("POST"))
            .and(path("/batch"))
            .respond_with(BatchEndpoint::default())
            .mount(&server)
            .await;

        let rows = vec![
            FeedRowFactory::line_item("1", "10").with(
                "Sensitive Category Exclusions",
                "SENSITIVE_CATEGORY_ADULT,SENSITIVE_CATEGORY_UNHEARD_OF",
            ),
            FeedRowFactory::line_item("1", "11").with(
                "Sensitive Category Exclusions",
                "SENSITIVE_CATEGORY_ADULT",
            ),
        ];

        let sink = Arc::new(MemoryLogSink::new());
        let summary = job(&server, sink.clone()).push(&rows).await.unwrap();

        summary.assert_clean();
        assert_eq!(summary.skipped_categories, 1);
        let bodies = batch_bodies(&server).await;
        assert_eq!(inner_requests(&bodies[1]).len(), 2);
        assert!(bodies[1].contains("\"1000\""));
        assert!(!bodies[1].contains("UNHEARD_OF"));
    }

    #[tokio::test]
    async fn test_push_with_nothing_to_do_makes_no_calls() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let rows = vec![FeedRowFactory::insertion_order("1", "5")];
        let sink = Arc::new(MemoryLogSink::new());
        let summary = job(&server, sink).push(&rows).await.unwrap();

        assert_eq!(summary.skipped_rows, 1);
        assert_eq!(summary.line_items, 0);
        summary.assert_clean();
    }

    #[tokio::test]
    async fn test_load_line_items_renders_report_rows() {
        let server = MockServer::start().await;
        let key = LineItemKey::new("1", "10");

        Mock::given(method("GET"))
            .and(path("/v1/advertisers/1/lineItems/10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "advertiserId": "1",
                "insertionOrderId": "5",
                "lineItemId": "10",
                "displayName": "Spring shoes"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/batch"))
            .respond_with(
                BatchEndpoint::default()
                    .with_keyword(&key, "shoes", false)
                    .with_keyword(&key, "boots", false)
                    .with_keyword(&key, "casino", true),
            )
            .expect(1)
            .mount(&server)
            .await;

        let rows = vec![FeedRowFactory::line_item("1", "10")];
        let sink = Arc::new(MemoryLogSink::new());
        let report = job(&server, sink)
            .load(EntityType::LineItem, &rows)
            .await
            .unwrap();

        report.summary.assert_clean();
        assert_eq!(report.rows.len(), 1);
        let row = &report.rows[0];
        assert_eq!(row.cell("Insertion Order ID"), "5");
        assert_eq!(row.cell("Line Item Name"), "Spring shoes");
        assert_eq!(row.cell("Keyword Inclusions"), "shoes,boots");
        assert_eq!(row.cell("Original Keyword Inclusions"), "shoes,boots");
        assert_eq!(row.cell("Keyword Exclusions"), "casino");
        assert_eq!(row.cell("Sensitive Category Exclusions"), "");
    }

    #[tokio::test]
    async fn test_load_insertion_order_lists_its_line_items() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/advertisers/1/lineItems"))
            .and(query_param("filter", "insertionOrderId=5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "lineItems": [
                    {"advertiserId": "1", "insertionOrderId": "5", "lineItemId": "10", "displayName": "A"},
                    {"advertiserId": "1", "insertionOrderId": "5", "lineItemId": "11", "displayName": "B"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/batch"))
            .respond_with(BatchEndpoint::default())
            .expect(1)
            .mount(&server)
            .await;

        let rows = vec![
            FeedRowFactory::insertion_order("1", "5"),
            FeedRowFactory::insertion_order("1", "5"),
        ];
        let sink = Arc::new(MemoryLogSink::new());
        let report = job(&server, sink)
            .load(EntityType::InsertionOrder, &rows)
            .await
            .unwrap();

        let ids: Vec<_> = report.rows.iter().map(|r| r.cell("Line Item ID").to_string()).collect();
        assert_eq!(ids, vec!["10", "11"]);
        assert_eq!(report.summary.line_items, 2);
    }
}
