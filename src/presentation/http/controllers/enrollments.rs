// src/presentation/http/controllers/enrollments.rs
use crate::application::{
    commands::enrollments::{CancelEnrollmentCommand, RedeemCodeCommand},
    dto::{EnrollmentCheckDto, EnrollmentDto, RedemptionResultDto},
    queries::enrollments::{DEFAULT_PAGE_SIZE, ListEnrollmentsQuery},
};
use crate::presentation::http::error::{ErrorResponse, HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::Authenticated;
use crate::presentation::http::openapi::EnrollmentListResponse;
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Json,
    extract::{Path, Query},
    http::StatusCode,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

fn default_limit() -> u32 {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RedeemCodeRequest {
    /// Case and surrounding whitespace are ignored.
    pub code: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListEnrollmentsParams {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub cursor: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/enrollments/activate",
    request_body = RedeemCodeRequest,
    responses(
        (
            status = 201,
            description = "Code redeemed and enrollment created.",
            body = RedemptionResultDto
        ),
        (
            status = 400,
            description = "Code is malformed, inactive or expired.",
            body = ErrorResponse
        ),
        (status = 404, description = "Code does not exist.", body = ErrorResponse),
        (
            status = 409,
            description = "Code used up or caller already enrolled.",
            body = ErrorResponse
        )
    ),
    tag = "Enrollments"
)]
pub async fn activate(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Json(payload): Json<RedeemCodeRequest>,
) -> HttpResult<(StatusCode, Json<RedemptionResultDto>)> {
    let result = state
        .services
        .enrollment_commands
        .redeem(&user, RedeemCodeCommand { code: payload.code })
        .await
        .into_http()?;

    Ok((StatusCode::CREATED, Json(result)))
}

#[utoipa::path(
    get,
    path = "/api/v1/enrollments/my-courses",
    params(ListEnrollmentsParams),
    responses(
        (
            status = 200,
            description = "Caller's enrollments, most recent first.",
            body = EnrollmentListResponse
        ),
        (status = 400, description = "Malformed cursor.", body = ErrorResponse)
    ),
    tag = "Enrollments"
)]
pub async fn my_courses(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Query(params): Query<ListEnrollmentsParams>,
) -> HttpResult<Json<EnrollmentListResponse>> {
    let query = ListEnrollmentsQuery {
        limit: params.limit,
        cursor: params.cursor,
    };

    state
        .services
        .enrollment_queries
        .list_my_enrollments(&user, query)
        .await
        .into_http()
        .map(|page| Json(page.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/enrollments/check/{course_id}",
    params(("course_id" = Uuid, Path, description = "Course identifier")),
    responses(
        (
            status = 200,
            description = "Whether the caller holds an active enrollment.",
            body = EnrollmentCheckDto
        )
    ),
    tag = "Enrollments"
)]
pub async fn check(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(course_id): Path<Uuid>,
) -> HttpResult<Json<EnrollmentCheckDto>> {
    state
        .services
        .enrollment_queries
        .is_enrolled(&user, course_id)
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    get,
    path = "/api/v1/enrollments/courses/{course_id}",
    params(("course_id" = Uuid, Path, description = "Course identifier")),
    responses(
        (
            status = 200,
            description = "Caller's latest enrollment in the course.",
            body = EnrollmentDto
        ),
        (status = 404, description = "No enrollment for this course.", body = ErrorResponse)
    ),
    tag = "Enrollments"
)]
pub async fn course_enrollment(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(course_id): Path<Uuid>,
) -> HttpResult<Json<EnrollmentDto>> {
    state
        .services
        .enrollment_queries
        .get_enrollment(&user, course_id)
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    post,
    path = "/api/v1/enrollments/{id}/cancel",
    params(("id" = Uuid, Path, description = "Enrollment identifier")),
    responses(
        (status = 200, description = "Enrollment cancelled.", body = EnrollmentDto),
        (status = 403, description = "Caller is not an administrator.", body = ErrorResponse),
        (status = 404, description = "Enrollment does not exist.", body = ErrorResponse),
        (status = 409, description = "Enrollment already ended.", body = ErrorResponse)
    ),
    tag = "Enrollments"
)]
pub async fn cancel(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(id): Path<Uuid>,
) -> HttpResult<Json<EnrollmentDto>> {
    state
        .services
        .enrollment_commands
        .cancel_enrollment(&user, CancelEnrollmentCommand { enrollment_id: id })
        .await
        .into_http()
        .map(Json)
}
