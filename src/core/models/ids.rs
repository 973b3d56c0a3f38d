//! Entity identifiers and the line item key extraction rule

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Advertiser id, the root of the ownership hierarchy
    AdvertiserId
);
string_id!(
    /// Insertion order id, owned by an advertiser
    InsertionOrderId
);
string_id!(
    /// Line item id, owned by an insertion order
    LineItemId
);

/// Two-part key identifying a line item across requests and responses.
///
/// Batch responses carry no request reference, so this key is what ties a
/// response back to the operation that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineItemKey {
    pub advertiser_id: AdvertiserId,
    pub line_item_id: LineItemId,
}

impl LineItemKey {
    pub fn new(advertiser_id: impl Into<AdvertiserId>, line_item_id: impl Into<LineItemId>) -> Self {
        Self {
            advertiser_id: advertiser_id.into(),
            line_item_id: line_item_id.into(),
        }
    }

    /// Extract the key from a request URL, a resource name or free text.
    ///
    /// Looks for `advertisers/{id}` and then the first later `lineItems/{id}`
    /// segment pair. The line item segment is cut at an action suffix
    /// (`:bulkEdit...`), a query string or any delimiter that cannot be part
    /// of an id.
    ///
    /// ```
    /// use adsync::core::models::LineItemKey;
    ///
    /// let key = LineItemKey::from_resource_path(
    ///     "https://example.test/v1/advertisers/12/lineItems/34:bulkEditLineItemAssignedTargetingOptions",
    /// )
    /// .unwrap();
    /// assert_eq!(key, LineItemKey::new("12", "34"));
    /// ```
    pub fn from_resource_path(path: &str) -> Option<Self> {
        let start = path.find("advertisers/")?;
        let mut segments = path[start..].split('/').skip(1);

        let advertiser = clean_segment(segments.next()?)?;
        let line_item = loop {
            if segments.next()? == "lineItems" {
                break clean_segment(segments.next()?)?;
            }
        };

        Some(Self::new(advertiser, line_item))
    }
}

impl fmt::Display for LineItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.advertiser_id, self.line_item_id)
    }
}

fn clean_segment(segment: &str) -> Option<&str> {
    let end = segment
        .find(|c: char| {
            c.is_whitespace() || matches!(c, ':' | '?' | '#' | '"' | '\'' | ',' | ';' | ')' | ']')
        })
        .unwrap_or(segment.len());
    let id = &segment[..end];
    (!id.is_empty()).then_some(id)
}
