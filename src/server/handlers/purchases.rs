//! Purchase HTTP handlers
//!
//! The detail view joins the purchase's product references against the
//! product collection at read time.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use validator::Validate;

use super::{ListParams, parse_id};
use crate::core::error::{ApiError, ApiResult};
use crate::core::query::{QueryResult, query};
use crate::core::record::Searchable;
use crate::entities::purchase::{
    AddItemRequest, CreatePurchaseRequest, Purchase, PurchaseDetail, PurchaseSummary,
};
use crate::server::state::AppState;

pub async fn list_purchases(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<QueryResult<PurchaseSummary>>> {
    let request = params.into_request(Purchase::default_sort_field());
    let purchases = state.purchases.fetch_all().await?;

    Ok(Json(query(purchases, &request, PurchaseSummary::of)?))
}

pub async fn get_purchase(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PurchaseDetail>> {
    let id = parse_id(&id)?;
    let purchase = state
        .purchases
        .fetch_one(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "purchase",
            id: id.to_string(),
        })?;

    let products = state.products.fetch_all().await?;

    Ok(Json(PurchaseDetail::of(&purchase, &products)))
}

pub async fn create_purchase(
    State(state): State<AppState>,
    Json(payload): Json<CreatePurchaseRequest>,
) -> ApiResult<(StatusCode, Json<PurchaseSummary>)> {
    payload.validate()?;

    let purchase = Purchase::new(payload.name, payload.email, payload.address);

    let created = state
        .purchases
        .insert(purchase)
        .await
        .map_err(|_| ApiError::operation_failed("create", "purchase"))?;

    Ok((StatusCode::CREATED, Json(PurchaseSummary::of(&created))))
}

pub async fn add_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<AddItemRequest>,
) -> ApiResult<Json<PurchaseDetail>> {
    let id = parse_id(&id)?;

    let mut purchase = state
        .purchases
        .fetch_one(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "purchase",
            id: id.to_string(),
        })?;

    // The referenced product must exist at the time it is added
    state
        .products
        .fetch_one(&payload.product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "product",
            id: payload.product_id.to_string(),
        })?;

    purchase.add_item(payload.product_id);

    let updated = state
        .purchases
        .update(&id, purchase)
        .await
        .map_err(|_| ApiError::operation_failed("update", "purchase"))?;

    let products = state.products.fetch_all().await?;
    Ok(Json(PurchaseDetail::of(&updated, &products)))
}

pub async fn remove_item(
    State(state): State<AppState>,
    Path((id, product_id)): Path<(String, String)>,
) -> ApiResult<Json<PurchaseDetail>> {
    let id = parse_id(&id)?;
    let product_id = parse_id(&product_id)?;

    let mut purchase = state
        .purchases
        .fetch_one(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "purchase",
            id: id.to_string(),
        })?;

    // Removing a reference that is not present is a no-op
    purchase.remove_item(&product_id);

    let updated = state
        .purchases
        .update(&id, purchase)
        .await
        .map_err(|_| ApiError::operation_failed("update", "purchase"))?;

    let products = state.products.fetch_all().await?;
    Ok(Json(PurchaseDetail::of(&updated, &products)))
}

pub async fn delete_purchase(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;

    state
        .purchases
        .fetch_one(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "purchase",
            id: id.to_string(),
        })?;

    state
        .purchases
        .delete(&id)
        .await
        .map_err(|_| ApiError::operation_failed("delete", "purchase"))?;

    Ok(StatusCode::NO_CONTENT)
}
