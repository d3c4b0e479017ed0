// src/presentation/http/openapi.rs
use crate::application::dto::{
    ActivationCodeDto, CursorPage, EnrollmentDto, OffsetPage,
};
use axum::{Router, routing::get};
use serde::{Deserialize, Serialize};
use utoipa::openapi::{
    Components,
    security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa::{Modify, OpenApi, ToSchema};

pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EnrollmentListResponse {
    pub items: Vec<EnrollmentDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

impl From<CursorPage<EnrollmentDto>> for EnrollmentListResponse {
    fn from(page: CursorPage<EnrollmentDto>) -> Self {
        Self {
            items: page.items,
            next_cursor: page.next_cursor,
            has_more: page.has_more,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActivationCodeListResponse {
    pub items: Vec<ActivationCodeDto>,
    pub total: u64,
    pub limit: u32,
    pub offset: u64,
}

impl From<OffsetPage<ActivationCodeDto>> for ActivationCodeListResponse {
    fn from(page: OffsetPage<ActivationCodeDto>) -> Self {
        Self {
            items: page.items,
            total: page.total,
            limit: page.limit,
            offset: page.offset,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::controllers::auth::register,
        crate::presentation::http::controllers::auth::login,
        crate::presentation::http::controllers::auth::refresh_token,
        crate::presentation::http::controllers::auth::logout,
        crate::presentation::http::controllers::auth::logout_all,
        crate::presentation::http::controllers::auth::profile,
        crate::presentation::http::controllers::auth::change_password,
        crate::presentation::http::controllers::enrollments::activate,
        crate::presentation::http::controllers::enrollments::my_courses,
        crate::presentation::http::controllers::enrollments::check,
        crate::presentation::http::controllers::enrollments::course_enrollment,
        crate::presentation::http::controllers::enrollments::cancel,
        crate::presentation::http::controllers::activation_codes::create_code,
        crate::presentation::http::controllers::activation_codes::list_codes,
        crate::presentation::http::controllers::activation_codes::update_code,
        super::routes::health
    ),
    components(
        schemas(
            StatusResponse,
            EnrollmentListResponse,
            ActivationCodeListResponse,
            crate::presentation::http::error::ErrorResponse,
            crate::presentation::http::controllers::auth::RegisterRequest,
            crate::presentation::http::controllers::auth::LoginRequest,
            crate::presentation::http::controllers::auth::RefreshTokenRequest,
            crate::presentation::http::controllers::auth::ChangePasswordRequest,
            crate::presentation::http::controllers::auth::LogoutAllResponse,
            crate::presentation::http::controllers::enrollments::RedeemCodeRequest,
            crate::presentation::http::controllers::activation_codes::CreateActivationCodeRequest,
            crate::presentation::http::controllers::activation_codes::UpdateActivationCodeRequest,
            crate::application::dto::UserDto,
            crate::application::dto::UserProfileDto,
            crate::application::dto::TokenPairDto,
            crate::application::dto::AuthResultDto,
            crate::application::dto::EnrollmentDto,
            crate::application::dto::EnrollmentCheckDto,
            crate::application::dto::CourseSummaryDto,
            crate::application::dto::RedemptionResultDto,
            crate::application::dto::ActivationCodeDto
        )
    ),
    tags(
        (name = "Auth", description = "Registration, login and session endpoints"),
        (name = "Enrollments", description = "Code redemption and enrollment lookups"),
        (name = "ActivationCodes", description = "Activation code administration"),
        (name = "System", description = "System level endpoints")
    ),
    modifiers(&ApiDocCustomizer),
    security(("bearerAuth" = [])),
    info(
        title = "Academy API",
        description = "Session lifecycle and course enrollment backend",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;

struct ApiDocCustomizer;

impl Modify for ApiDocCustomizer {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Components::default);
        let mut http = Http::new(HttpAuthScheme::Bearer);
        http.bearer_format = Some("JWT".into());
        components.add_security_scheme("bearerAuth", SecurityScheme::Http(http));
    }
}

pub async fn serve_openapi() -> axum::Json<utoipa::openapi::OpenApi> {
    axum::Json(ApiDoc::openapi())
}

pub fn docs_router() -> Router {
    Router::new().route(OPENAPI_JSON_PATH, get(serve_openapi))
}
