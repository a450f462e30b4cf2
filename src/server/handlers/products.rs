//! Product HTTP handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use validator::Validate;

use super::{ListParams, parse_id};
use crate::core::error::{ApiError, ApiResult};
use crate::core::query::{QueryResult, query};
use crate::core::record::Searchable;
use crate::entities::product::{
    CreateProductRequest, Product, ProductSummary, UpdateProductRequest,
};
use crate::server::state::AppState;

pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<QueryResult<ProductSummary>>> {
    let request = params.into_request(Product::default_sort_field());
    let products = state.products.fetch_all().await?;

    Ok(Json(query(products, &request, ProductSummary::of)?))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ProductSummary>> {
    let id = parse_id(&id)?;
    let product = state
        .products
        .fetch_one(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "product",
            id: id.to_string(),
        })?;

    Ok(Json(ProductSummary::of(&product)))
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> ApiResult<(StatusCode, Json<ProductSummary>)> {
    payload.validate()?;

    // Sku must be unique
    if state
        .products
        .fetch_by_field("sku", &payload.sku)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict {
            resource: "product",
            field: "sku",
            value: payload.sku,
        });
    }

    let product = Product::new(
        payload.sku,
        payload.product_name,
        payload.brand,
        payload.price,
        payload.category,
    );

    let created = state
        .products
        .insert(product)
        .await
        .map_err(|_| ApiError::operation_failed("create", "product"))?;

    Ok((StatusCode::CREATED, Json(ProductSummary::of(&created))))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateProductRequest>,
) -> ApiResult<Json<ProductSummary>> {
    let id = parse_id(&id)?;
    payload.validate()?;

    let mut product = state
        .products
        .fetch_one(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "product",
            id: id.to_string(),
        })?;

    product.product_name = payload.product_name;
    product.brand = payload.brand;
    product.price = payload.price;
    product.category = payload.category;
    product.touch();

    let updated = state
        .products
        .update(&id, product)
        .await
        .map_err(|_| ApiError::operation_failed("update", "product"))?;

    Ok(Json(ProductSummary::of(&updated)))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;

    state
        .products
        .fetch_one(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "product",
            id: id.to_string(),
        })?;

    state
        .products
        .delete(&id)
        .await
        .map_err(|_| ApiError::operation_failed("delete", "product"))?;

    Ok(StatusCode::NO_CONTENT)
}
