//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into a single OpenAPI document,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the customer registry API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Customer Registry API",
        version = "0.1.0",
        description = "Customer records keyed by CPF (Brazilian taxpayer identifier).\n\nEvery CPF is sanitized (`.` and `-` removed) and check-digit validated before it is stored or looked up. Invalid CPFs are rejected with 422 `INVALID_CPF`; duplicates with 409 `CONFLICT`."
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    paths(
        crate::routes::customers::list_customers,
        crate::routes::customers::create_customer,
        crate::routes::customers::get_customer,
        crate::routes::customers::get_customer_by_cpf,
        crate::routes::customers::lookup_customer,
    ),
    components(
        schemas(
            crate::state::CustomerRecord,
            crate::routes::customers::CreateCustomerRequest,
            crate::routes::customers::CustomerLookupRequest,
            crate::routes::customers::CustomerPage,
            crate::error::ErrorBody,
            crate::error::ErrorDetail,
        )
    ),
    tags(
        (name = "customers", description = "Customer registration and lookup by id or CPF"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
