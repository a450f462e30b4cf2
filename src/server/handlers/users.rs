//! User HTTP handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use validator::Validate;

use super::{ListParams, parse_id};
use crate::core::error::{ApiError, ApiResult, ValidationError};
use crate::core::password;
use crate::core::query::{QueryResult, query};
use crate::core::record::Searchable;
use crate::entities::user::{
    ChangePasswordRequest, CreateUserRequest, UpdateUserRequest, User, UserSummary,
};
use crate::server::state::AppState;

pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<QueryResult<UserSummary>>> {
    let request = params.into_request(User::default_sort_field());
    let users = state.users.fetch_all().await?;

    Ok(Json(query(users, &request, UserSummary::of)?))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<UserSummary>> {
    let id = parse_id(&id)?;
    let user = state
        .users
        .fetch_one(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "user",
            id: id.to_string(),
        })?;

    Ok(Json(UserSummary::of(&user)))
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserSummary>)> {
    payload.validate()?;

    if payload.password != payload.password_confirm {
        return Err(ApiError::Validation(ValidationError::FieldError {
            field: "password_confirm".to_string(),
            message: "Password confirmation mismatched".to_string(),
        }));
    }

    // Email must be unique
    if state
        .users
        .fetch_by_field("email", &payload.email)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict {
            resource: "user",
            field: "email",
            value: payload.email,
        });
    }

    let digest = password::hash(&payload.password)?;
    let user = User::new(payload.name, payload.email, digest);

    let created = state
        .users
        .insert(user)
        .await
        .map_err(|_| ApiError::operation_failed("create", "user"))?;

    Ok((StatusCode::CREATED, Json(UserSummary::of(&created))))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserSummary>> {
    let id = parse_id(&id)?;
    payload.validate()?;

    let mut user = state
        .users
        .fetch_one(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "user",
            id: id.to_string(),
        })?;

    // Email must stay unique across other accounts
    if let Some(existing) = state.users.fetch_by_field("email", &payload.email).await? {
        if existing.id != id {
            return Err(ApiError::Conflict {
                resource: "user",
                field: "email",
                value: payload.email,
            });
        }
    }

    user.name = payload.name;
    user.email = payload.email;
    user.touch();

    let updated = state
        .users
        .update(&id, user)
        .await
        .map_err(|_| ApiError::operation_failed("update", "user"))?;

    Ok(Json(UserSummary::of(&updated)))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;

    state
        .users
        .fetch_one(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "user",
            id: id.to_string(),
        })?;

    state
        .users
        .delete(&id)
        .await
        .map_err(|_| ApiError::operation_failed("delete", "user"))?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn change_password(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ChangePasswordRequest>,
) -> ApiResult<Json<UserSummary>> {
    let id = parse_id(&id)?;
    payload.validate()?;

    if payload.password_new != payload.password_confirm {
        return Err(ApiError::Validation(ValidationError::FieldError {
            field: "password_confirm".to_string(),
            message: "Password confirmation mismatched".to_string(),
        }));
    }

    let mut user = state
        .users
        .fetch_one(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "user",
            id: id.to_string(),
        })?;

    if !password::verify(&payload.password_old, &user.password_hash)? {
        return Err(ApiError::InvalidCredentials);
    }

    user.password_hash = password::hash(&payload.password_new)?;
    user.touch();

    let updated = state
        .users
        .update(&id, user)
        .await
        .map_err(|_| ApiError::operation_failed("update", "user"))?;

    Ok(Json(UserSummary::of(&updated)))
}
