//! `multipart/mixed` framing for batch calls

use super::types::{BatchOperation, BatchOutcome, BatchResponseItem};
use crate::utils::error::Result;
use tracing::debug;
use uuid::Uuid;

const CRLF: &str = "\r\n";

/// Fresh boundary token for one outer request
pub fn new_boundary() -> String {
    format!("batch_{}", Uuid::new_v4().simple())
}

/// Outer `Content-Type` header value for `boundary`
pub fn content_type(boundary: &str) -> String {
    format!("multipart/mixed; boundary={}", boundary)
}

/// Frame `operations` as one multipart body.
///
/// Content-IDs run from 1 in submission order.
pub fn encode(boundary: &str, operations: &[BatchOperation]) -> Result<String> {
    let mut body = String::new();

    for (index, operation) in operations.iter().enumerate() {
        body.push_str("--");
        body.push_str(boundary);
        body.push_str(CRLF);
        body.push_str("Content-Type: application/http");
        body.push_str(CRLF);
        body.push_str(&format!("Content-ID: <{}>", index + 1));
        body.push_str(CRLF);
        body.push_str(CRLF);
        body.push_str(&format!("{} {}", operation.method(), operation.url()));
        body.push_str(CRLF);

        if let Some(payload) = operation.payload() {
            body.push_str("Content-Type: application/json");
            body.push_str(CRLF);
            body.push_str(CRLF);
            body.push_str(&serde_json::to_string(payload)?);
            body.push_str(CRLF);
        }
        body.push_str(CRLF);
    }

    body.push_str("--");
    body.push_str(boundary);
    body.push_str("--");
    body.push_str(CRLF);
    Ok(body)
}

/// Boundary of a multipart body, read from its first delimiter line
pub fn boundary_from_body(body: &str) -> Option<String> {
    body.lines()
        .map(str::trim)
        .find(|line| line.starts_with("--") && line.len() > 2)
        .map(|line| line.trim_start_matches("--").trim_end_matches("--").to_string())
        .filter(|boundary| !boundary.is_empty())
}

/// Split a multipart response on `boundary` and classify every JSON part.
///
/// Parts are returned in response order, which need not match the order of
/// the submitted Content-IDs. Parts without a JSON object are skipped.
pub fn decode(body: &str, boundary: &str) -> BatchOutcome {
    let delimiter = format!("--{}", boundary);

    body.split(delimiter.as_str())
        .filter_map(|part| {
            let json = first_json_object(part)?;
            match serde_json::from_str(json) {
                Ok(value) => Some(BatchResponseItem::classify(value)),
                Err(e) => {
                    debug!("Skipping unparseable batch part: {}", e);
                    None
                }
            }
        })
        .collect()
}

/// First balanced-brace object in `text`, with braces inside string literals
/// ignored.
pub fn first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}
