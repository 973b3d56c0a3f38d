//! Remote ad platform access
//!
//! Single calls with retry, plus builders for the inner requests sent
//! through the batch endpoint.

mod client;
pub mod requests;
mod types;


pub use client::{PlatformApi, PlatformClient};
pub use requests::{bulk_edit_request, bulk_list_request, targeting_type_filter};
pub use types::LineItem;
