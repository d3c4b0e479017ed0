// src/presentation/http/controllers/activation_codes.rs
use crate::application::{
    commands::enrollments::{CreateActivationCodeCommand, SetActivationCodeActiveCommand},
    dto::ActivationCodeDto,
    queries::enrollments::{DEFAULT_PAGE_SIZE, ListActivationCodesQuery},
};
use crate::presentation::http::error::{ErrorResponse, HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::Authenticated;
use crate::presentation::http::openapi::ActivationCodeListResponse;
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Json,
    extract::{Path, Query},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

fn default_limit() -> u32 {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateActivationCodeRequest {
    pub course_id: Uuid,
    /// Omit for an unlimited code.
    #[serde(default)]
    pub max_uses: Option<u32>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateActivationCodeRequest {
    pub is_active: bool,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListActivationCodesParams {
    #[serde(default)]
    pub course_id: Option<Uuid>,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u64,
}

#[utoipa::path(
    post,
    path = "/api/v1/activation-codes",
    request_body = CreateActivationCodeRequest,
    responses(
        (status = 201, description = "Code generated.", body = ActivationCodeDto),
        (status = 400, description = "Invalid limit, expiry or note.", body = ErrorResponse),
        (status = 403, description = "Caller may not manage codes.", body = ErrorResponse),
        (status = 404, description = "Course does not exist.", body = ErrorResponse)
    ),
    tag = "ActivationCodes"
)]
pub async fn create_code(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Json(payload): Json<CreateActivationCodeRequest>,
) -> HttpResult<(StatusCode, Json<ActivationCodeDto>)> {
    let command = CreateActivationCodeCommand {
        course_id: payload.course_id,
        max_uses: payload.max_uses,
        expires_at: payload.expires_at,
        note: payload.note,
    };

    let code = state
        .services
        .enrollment_commands
        .create_activation_code(&user, command)
        .await
        .into_http()?;

    Ok((StatusCode::CREATED, Json(code)))
}

#[utoipa::path(
    get,
    path = "/api/v1/activation-codes",
    params(ListActivationCodesParams),
    responses(
        (status = 200, description = "Codes, newest first.", body = ActivationCodeListResponse),
        (status = 403, description = "Caller may not manage codes.", body = ErrorResponse)
    ),
    tag = "ActivationCodes"
)]
pub async fn list_codes(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Query(params): Query<ListActivationCodesParams>,
) -> HttpResult<Json<ActivationCodeListResponse>> {
    let query = ListActivationCodesQuery {
        course_id: params.course_id,
        limit: params.limit,
        offset: params.offset,
    };

    state
        .services
        .enrollment_queries
        .list_activation_codes(&user, query)
        .await
        .into_http()
        .map(|page| Json(page.into()))
}

#[utoipa::path(
    patch,
    path = "/api/v1/activation-codes/{id}",
    params(("id" = Uuid, Path, description = "Activation code identifier")),
    request_body = UpdateActivationCodeRequest,
    responses(
        (status = 200, description = "Code updated.", body = ActivationCodeDto),
        (status = 403, description = "Caller may not manage codes.", body = ErrorResponse),
        (status = 404, description = "Code does not exist.", body = ErrorResponse)
    ),
    tag = "ActivationCodes"
)]
pub async fn update_code(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateActivationCodeRequest>,
) -> HttpResult<Json<ActivationCodeDto>> {
    let command = SetActivationCodeActiveCommand {
        code_id: id,
        is_active: payload.is_active,
    };

    state
        .services
        .enrollment_commands
        .set_activation_code_active(&user, command)
        .await
        .into_http()
        .map(Json)
}
