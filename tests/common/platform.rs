//! Mock platform endpoints

use adsync::core::models::LineItemKey;
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use wiremock::{Request, Respond, ResponseTemplate};

pub const RESPONSE_BOUNDARY: &str = "batch_response_boundary";

/// Render inner responses as a `multipart/mixed` body
pub fn multipart_response(parts: &[(u16, Value)]) -> String {
    let mut body = String::new();
    for (index, (status, json)) in parts.iter().enumerate() {
        body.push_str(&format!(
            "--{}\r\nContent-Type: application/http\r\nContent-ID: <response-{}>\r\n\r\nHTTP/1.1 {} {}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{}\r\n",
            RESPONSE_BOUNDARY,
            index + 1,
            status,
            if *status < 400 { "OK" } else { "Error" },
            serde_json::to_string_pretty(json).unwrap()
        ));
    }
    body.push_str(&format!("--{}--\r\n", RESPONSE_BOUNDARY));
    body
}

/// Inner request lines (`METHOD url`) of a batch request body
pub fn inner_requests(body: &str) -> Vec<(String, String)> {
    body.lines()
        .filter_map(|line| {
            let (method, url) = line.trim().split_once(' ')?;
            matches!(method, "GET" | "POST" | "PATCH" | "DELETE")
                .then(|| (method.to_string(), url.to_string()))
        })
        .collect()
}

/// Batch endpoint answering bulk-list and bulk-edit requests.
///
/// Responses come back in reverse order, and failing line items get an
/// error part that names no resource.
#[derive(Clone, Default)]
pub struct BatchEndpoint {
    pub keywords: HashMap<LineItemKey, Vec<(String, bool)>>,
    pub failing_lists: HashSet<LineItemKey>,
    pub failing_edits: HashSet<LineItemKey>,
}

impl BatchEndpoint {
    pub fn with_keyword(mut self, key: &LineItemKey, keyword: &str, negative: bool) -> Self {
        self.keywords
            .entry(key.clone())
            .or_default()
            .push((keyword.to_string(), negative));
        self
    }

    pub fn failing_list(mut self, key: &LineItemKey) -> Self {
        self.failing_lists.insert(key.clone());
        self
    }

    pub fn failing_edit(mut self, key: &LineItemKey) -> Self {
        self.failing_edits.insert(key.clone());
        self
    }

    fn option_name(key: &LineItemKey, id: &str) -> String {
        format!(
            "advertisers/{}/lineItems/{}/targetingTypes/TARGETING_TYPE_KEYWORD/assignedTargetingOptions/{}",
            key.advertiser_id, key.line_item_id, id
        )
    }
}

impl Respond for BatchEndpoint {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body = String::from_utf8_lossy(&request.body);
        let mut parts = Vec::new();

        for (method, url) in inner_requests(&body) {
            let Some(key) = LineItemKey::from_resource_path(&url) else {
                parts.push((400, json!({"error": {"code": 400, "message": "Bad URL"}})));
                continue;
            };

            if method == "GET" && self.failing_lists.contains(&key) {
                parts.push((
                    500,
                    json!({"error": {"code": 500, "message": "Internal error encountered.", "status": "INTERNAL"}}),
                ));
            } else if method == "GET" {
                let options: Vec<Value> = self
                    .keywords
                    .get(&key)
                    .into_iter()
                    .flatten()
                    .enumerate()
                    .map(|(i, (keyword, negative))| {
                        json!({
                            "name": Self::option_name(&key, &i.to_string()),
                            "assignedTargetingOptionId": i.to_string(),
                            "targetingType": "TARGETING_TYPE_KEYWORD",
                            "keywordDetails": {"keyword": keyword, "negative": negative}
                        })
                    })
                    .collect();
                parts.push((200, json!({"assignedTargetingOptions": options})));
            } else if self.failing_edits.contains(&key) {
                parts.push((
                    400,
                    json!({"error": {"code": 400, "message": "Request contains an invalid argument.", "status": "INVALID_ARGUMENT"}}),
                ));
            } else {
                parts.push((
                    200,
                    json!({"createdAssignedTargetingOptions": [{"name": Self::option_name(&key, "new")}]}),
                ));
            }
        }

        parts.reverse();
        ResponseTemplate::new(200).set_body_raw(
            multipart_response(&parts),
            &format!("multipart/mixed; boundary={}", RESPONSE_BOUNDARY),
        )
    }
}
