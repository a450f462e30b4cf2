//! HTTP handlers for the REST surface

pub mod auth;
pub mod products;
pub mod purchases;
pub mod users;

use serde::Deserialize;
use uuid::Uuid;

use crate::core::error::{ApiError, ValidationError};
use crate::core::query::QueryRequest;

/// Raw query parameters accepted by every list endpoint.
///
/// Everything is extracted as an optional string so a non-numeric
/// `page_number`/`page_size` falls back to the unpaginated mode instead
/// of failing extraction.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ListParams {
    pub search: Option<String>,

    #[serde(rename = "sortField")]
    pub sort_field: Option<String>,

    #[serde(rename = "sortOrder")]
    pub sort_order: Option<String>,

    pub page_number: Option<String>,
    pub page_size: Option<String>,
}

impl ListParams {
    /// Build the immutable query request for one resource.
    pub fn into_request(self, default_sort_field: &str) -> QueryRequest {
        QueryRequest::from_raw(
            self.search,
            self.sort_field,
            self.sort_order,
            self.page_number,
            self.page_size,
            default_sort_field,
        )
    }
}

/// Parse a path id, rejecting garbage with a validation error.
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| {
        ApiError::Validation(ValidationError::FieldError {
            field: "id".to_string(),
            message: format!("'{}' is not a valid id", raw),
        })
    })
}
