//! Single-call platform client

use super::types::LineItem;
use crate::config::PlatformConfig;
use crate::core::diff::BulkEditPayload;
use crate::core::models::{
    AdvertiserId, AssignedTargetingOption, InsertionOrderId, LineItemId, LineItemKey,
    TargetingType,
};
use crate::utils::error::{Result, RetryPolicy, SyncError};
use crate::utils::net::ClientUtils;
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

/// Non-batched calls against the remote ad platform
#[async_trait]
pub trait PlatformApi: Send + Sync {
    /// Base URL inner batch requests are built against
    fn base_url(&self) -> &str;

    async fn get_line_item(
        &self,
        advertiser_id: &AdvertiserId,
        line_item_id: &LineItemId,
    ) -> Result<LineItem>;

    async fn patch_line_item(&self, line_item: &LineItem, update_mask: &str) -> Result<LineItem>;

    /// Every line item of an insertion order, across all pages
    async fn list_line_items(
        &self,
        advertiser_id: &AdvertiserId,
        insertion_order_id: &InsertionOrderId,
    ) -> Result<Vec<LineItem>>;

    async fn list_assigned_targeting_options(
        &self,
        key: &LineItemKey,
        targeting_type: TargetingType,
    ) -> Result<Vec<AssignedTargetingOption>>;

    /// The advertiser's catalogue of options for a targeting type
    async fn list_targeting_options(
        &self,
        advertiser_id: &AdvertiserId,
        targeting_type: TargetingType,
    ) -> Result<Vec<Value>>;

    async fn bulk_edit_assigned_targeting_options(
        &self,
        key: &LineItemKey,
        payload: &BulkEditPayload,
    ) -> Result<Value>;
}

/// [`PlatformApi`] over HTTP. Every call goes through the retry policy.
#[derive(Debug, Clone)]
pub struct PlatformClient {
    client: Client,
    base_url: String,
    access_token: Option<String>,
    retry: RetryPolicy,
}

impl PlatformClient {
    pub fn new(config: &PlatformConfig, retry: RetryPolicy) -> Result<Self> {
        Ok(Self {
            client: ClientUtils::create_http_client(config)?,
            base_url: config.base_url.clone(),
            access_token: config.access_token.clone(),
            retry,
        })
    }

    fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&ClientUtils::add_path_to_api_base(&self.base_url, path))
            .map_err(|e| SyncError::config(format!("Invalid platform URL: {}", e)))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in query {
                pairs.append_pair(name, value);
            }
        }
        Ok(url)
    }

    async fn send_once(&self, method: Method, url: Url, body: Option<&Value>) -> Result<Value> {
        let mut request = self.client.request(method, url);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(SyncError::api(status.as_u16(), text));
        }
        if text.trim().is_empty() {
            return Ok(Value::Object(Default::default()));
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        operation: &str,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<T> {
        debug!(operation, url = %url, "Platform call");
        let value = self
            .retry
            .call(operation, || self.send_once(method.clone(), url.clone(), body))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Follow `nextPageToken` until exhausted, collecting `items_field`
    async fn call_paged(
        &self,
        operation: &str,
        path: &str,
        query: &[(&str, &str)],
        items_field: &str,
    ) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let url = {
                let mut page_query = query.to_vec();
                if let Some(token) = page_token.as_deref() {
                    page_query.push(("pageToken", token));
                }
                self.url(path, &page_query)?
            };
            let page: Value = self.call(operation, Method::GET, url, None).await?;

            if let Some(page_items) = page.get(items_field).and_then(Value::as_array) {
                items.extend(page_items.iter().cloned());
            }
            match page.get("nextPageToken").and_then(Value::as_str) {
                Some(token) if !token.is_empty() => page_token = Some(token.to_string()),
                _ => break,
            }
        }

        Ok(items)
    }
}

#[async_trait]
impl PlatformApi for PlatformClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_line_item(
        &self,
        advertiser_id: &AdvertiserId,
        line_item_id: &LineItemId,
    ) -> Result<LineItem> {
        let url = self.url(
            &format!("advertisers/{}/lineItems/{}", advertiser_id, line_item_id),
            &[],
        )?;
        self.call("get_line_item", Method::GET, url, None).await
    }

    async fn patch_line_item(&self, line_item: &LineItem, update_mask: &str) -> Result<LineItem> {
        let url = self.url(
            &format!(
                "advertisers/{}/lineItems/{}",
                line_item.advertiser_id, line_item.line_item_id
            ),
            &[("updateMask", update_mask)],
        )?;
        let body = serde_json::to_value(line_item)?;
        self.call("patch_line_item", Method::PATCH, url, Some(&body))
            .await
    }

    async fn list_line_items(
        &self,
        advertiser_id: &AdvertiserId,
        insertion_order_id: &InsertionOrderId,
    ) -> Result<Vec<LineItem>> {
        let filter = format!("insertionOrderId={}", insertion_order_id);
        let items = self
            .call_paged(
                "list_line_items",
                &format!("advertisers/{}/lineItems", advertiser_id),
                &[("filter", filter.as_str())],
                "lineItems",
            )
            .await?;
        items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(SyncError::from))
            .collect()
    }

    async fn list_assigned_targeting_options(
        &self,
        key: &LineItemKey,
        targeting_type: TargetingType,
    ) -> Result<Vec<AssignedTargetingOption>> {
        let items = self
            .call_paged(
                "list_assigned_targeting_options",
                &format!(
                    "advertisers/{}/lineItems/{}/targetingTypes/{}/assignedTargetingOptions",
                    key.advertiser_id, key.line_item_id, targeting_type
                ),
                &[],
                "assignedTargetingOptions",
            )
            .await?;
        items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(SyncError::from))
            .collect()
    }

    async fn list_targeting_options(
        &self,
        advertiser_id: &AdvertiserId,
        targeting_type: TargetingType,
    ) -> Result<Vec<Value>> {
        self.call_paged(
            "list_targeting_options",
            &format!("targetingTypes/{}/targetingOptions", targeting_type),
            &[("advertiserId", advertiser_id.as_str())],
            "targetingOptions",
        )
        .await
    }

    async fn bulk_edit_assigned_targeting_options(
        &self,
        key: &LineItemKey,
        payload: &BulkEditPayload,
    ) -> Result<Value> {
        let url = self.url(
            &format!(
                "advertisers/{}/lineItems/{}:bulkEditLineItemAssignedTargetingOptions",
                key.advertiser_id, key.line_item_id
            ),
            &[],
        )?;
        let body = serde_json::to_value(payload)?;
        self.call(
            "bulk_edit_assigned_targeting_options",
            Method::POST,
            url,
            Some(&body),
        )
        .await
    }
}
