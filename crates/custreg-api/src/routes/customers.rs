//! # Customer Registry API
//!
//! List, detail, and create endpoints for CPF-keyed customer records.
//! Every CPF that reaches the store or a lookup has gone through
//! sanitize-and-validate first; a failing check digit is a 422 with code
//! `INVALID_CPF`, never a 404 or 409.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use custreg_core::{sanitize_opt, Cpf};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::dates::parse_born;
use crate::error::AppError;
use crate::extractors::{extract_json, extract_query, extract_validated_json, Validate};
use crate::state::{AppConfig, AppState, CustomerFilter, CustomerRecord, NAME_MAX_LEN};

const COLLECTION_PATH: &str = "/v1/customers";

// -- Request / response types -------------------------------------------------

/// Request to register a customer.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCustomerRequest {
    /// Full name, 1 to 127 characters after trimming.
    pub name: String,
    /// Birth date as `YYYY-MM-DD` or `DD/MM/YYYY`.
    #[schema(example = "1990-03-15")]
    pub born: String,
    /// CPF, masked (`208.021.130-79`) or bare (`20802113079`).
    #[serde(rename = "CPF")]
    #[schema(example = "208.021.130-79")]
    pub cpf: Option<String>,
}

impl Validate for CreateCustomerRequest {
    fn validate(&self) -> Result<(), String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("name must not be empty".to_string());
        }
        if name.chars().count() > NAME_MAX_LEN {
            return Err(format!("name must not exceed {NAME_MAX_LEN} characters"));
        }
        if parse_born(&self.born).is_none() {
            return Err(format!(
                "invalid born \"{}\": expected YYYY-MM-DD or DD/MM/YYYY",
                self.born
            ));
        }
        Ok(())
    }
}

/// Detail lookup by id or CPF. `id` wins when both are present.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CustomerLookupRequest {
    pub id: Option<Uuid>,
    /// CPF, masked or bare.
    #[serde(rename = "CPF")]
    #[schema(example = "208.021.130-79")]
    pub cpf: Option<String>,
}

/// Query parameters for `GET /v1/customers`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListCustomersParams {
    /// Exact name match.
    pub name: Option<String>,
    /// Exact birth date, `YYYY-MM-DD` or `DD/MM/YYYY`.
    pub born: Option<String>,
    /// 1-based page number (default 1), or `last`.
    pub page: Option<String>,
    /// Items per page (default from `DEFAULT_PAGE_SIZE`, capped at `MAX_PAGE_SIZE`).
    /// Anything other than a positive integer falls back to the default.
    pub page_size: Option<String>,
}

/// Keyword selecting the final page.
const LAST_PAGE: &str = "last";

impl ListCustomersParams {
    fn effective_page_size(&self, config: &AppConfig) -> usize {
        self.page_size
            .as_deref()
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
            .map_or(config.default_page_size, |n| n.min(config.max_page_size))
    }

    /// Resolve the requested page against `num_pages`.
    fn page_number(&self, num_pages: usize) -> Result<usize, AppError> {
        let page = match self.page.as_deref().map(str::trim) {
            None => 1,
            Some(LAST_PAGE) => num_pages,
            Some(raw) => raw.parse::<usize>().unwrap_or(0),
        };
        if page == 0 || page > num_pages {
            return Err(AppError::not_found("Invalid page."));
        }
        Ok(page)
    }

    fn filter(&self) -> Result<CustomerFilter, AppError> {
        let born = self
            .born
            .as_deref()
            .map(|raw| {
                parse_born(raw).ok_or_else(|| {
                    AppError::Validation(format!(
                        "invalid born \"{raw}\": expected YYYY-MM-DD or DD/MM/YYYY"
                    ))
                })
            })
            .transpose()?;
        Ok(CustomerFilter {
            name: self.name.clone(),
            born,
        })
    }

    /// Relative link to `page`, carrying the active filters.
    fn page_link(&self, page: usize, page_size: usize) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        if let Some(name) = &self.name {
            query.append_pair("name", name);
        }
        if let Some(born) = &self.born {
            query.append_pair("born", born);
        }
        query.append_pair("page", &page.to_string());
        query.append_pair("page_size", &page_size.to_string());
        format!("{COLLECTION_PATH}?{}", query.finish())
    }
}

/// One page of customers.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CustomerPage {
    /// Total matching customers across all pages.
    pub count: usize,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<CustomerRecord>,
}

// -- Router -------------------------------------------------------------------

/// Build the customers router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(COLLECTION_PATH, get(list_customers).post(create_customer))
        .route("/v1/customers/detail", post(lookup_customer))
        .route("/v1/customers/cpf/{cpf}", get(get_customer_by_cpf))
        .route("/v1/customers/{id}", get(get_customer))
}

// -- Shared lookup helpers ----------------------------------------------------

/// Sanitize and validate `raw`, counting rejections under `operation`.
fn parse_cpf(state: &AppState, raw: &str, operation: &str) -> Result<Cpf, AppError> {
    Cpf::parse(raw).map_err(|e| {
        state.metrics.record_cpf_rejection(operation);
        tracing::info!(operation, "rejected CPF with invalid check digits");
        AppError::from(e)
    })
}

fn find_by_cpf(state: &AppState, raw: &str) -> Result<CustomerRecord, AppError> {
    let cpf = parse_cpf(state, raw, "lookup")?;
    state
        .customers
        .get_by_cpf(&cpf)
        .ok_or_else(|| AppError::not_found("no customer with this CPF"))
}

fn find_by_id(state: &AppState, id: &Uuid) -> Result<CustomerRecord, AppError> {
    state
        .customers
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("customer {id} not found")))
}

// -- Handlers -----------------------------------------------------------------

/// GET /v1/customers: Paginated customer list ordered by name.
#[utoipa::path(
    get,
    path = "/v1/customers",
    params(ListCustomersParams),
    responses(
        (status = 200, description = "Page of customers", body = CustomerPage),
        (status = 404, description = "Invalid page", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid filter", body = crate::error::ErrorBody),
    ),
    tag = "customers"
)]
pub(crate) async fn list_customers(
    State(state): State<AppState>,
    query: Result<Query<ListCustomersParams>, QueryRejection>,
) -> Result<Json<CustomerPage>, AppError> {
    let params = extract_query(query)?;
    let filter = params.filter()?;
    let page_size = params.effective_page_size(&state.config);

    let matching = state.customers.filter(&filter);
    let count = matching.len();
    let num_pages = count.div_ceil(page_size).max(1);
    let page = params.page_number(num_pages)?;

    let results = matching
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .collect();

    Ok(Json(CustomerPage {
        count,
        next: (page < num_pages).then(|| params.page_link(page + 1, page_size)),
        previous: (page > 1).then(|| params.page_link(page - 1, page_size)),
        results,
    }))
}

/// POST /v1/customers: Register a customer.
///
/// The CPF is sanitized and validated before anything is stored; the stored
/// value is always the canonical 11-digit form.
#[utoipa::path(
    post,
    path = "/v1/customers",
    request_body = CreateCustomerRequest,
    responses(
        (status = 201, description = "Customer created", body = CustomerRecord),
        (status = 409, description = "CPF already registered", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid CPF, name, or born", body = crate::error::ErrorBody),
    ),
    tag = "customers"
)]
pub(crate) async fn create_customer(
    State(state): State<AppState>,
    body: Result<Json<CreateCustomerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CustomerRecord>), AppError> {
    let req = extract_validated_json(body)?;
    let canonical = sanitize_opt(req.cpf.as_deref())
        .ok_or_else(|| AppError::Validation("CPF is required".to_string()))?;
    let cpf = parse_cpf(&state, &canonical, "create")?;

    if state.customers.contains_cpf(&cpf) {
        return Err(AppError::Conflict(
            "a customer with this CPF already exists".to_string(),
        ));
    }

    // Validated above.
    let born = parse_born(&req.born)
        .ok_or_else(|| AppError::Validation("invalid born".to_string()))?;

    let record = CustomerRecord {
        id: Uuid::new_v4(),
        name: req.name.trim().to_string(),
        born,
        cpf,
        created_at: Utc::now(),
    };

    // Postgres first: its unique index is authoritative across replicas.
    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::customers::insert(pool, &record).await {
            tracing::error!(customer_id = %record.id, error = %e, "failed to persist customer");
            return Err(e.into());
        }
    }

    state.customers.insert(record.clone())?;
    tracing::info!(customer_id = %record.id, "customer created");

    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /v1/customers/{id}: Customer detail by id.
#[utoipa::path(
    get,
    path = "/v1/customers/{id}",
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer found", body = CustomerRecord),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "customers"
)]
pub(crate) async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CustomerRecord>, AppError> {
    let id = Uuid::parse_str(&id)
        .map_err(|_| AppError::NotFound(format!("customer {id} not found")))?;
    find_by_id(&state, &id).map(Json)
}

/// GET /v1/customers/cpf/{cpf}: Customer detail by CPF, masked or bare.
#[utoipa::path(
    get,
    path = "/v1/customers/cpf/{cpf}",
    params(("cpf" = String, Path, description = "CPF, masked or bare")),
    responses(
        (status = 200, description = "Customer found", body = CustomerRecord),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid CPF", body = crate::error::ErrorBody),
    ),
    tag = "customers"
)]
pub(crate) async fn get_customer_by_cpf(
    State(state): State<AppState>,
    Path(cpf): Path<String>,
) -> Result<Json<CustomerRecord>, AppError> {
    find_by_cpf(&state, &cpf).map(Json)
}

/// POST /v1/customers/detail: Customer detail by id or CPF in the body.
#[utoipa::path(
    post,
    path = "/v1/customers/detail",
    request_body = CustomerLookupRequest,
    responses(
        (status = 200, description = "Customer found", body = CustomerRecord),
        (status = 404, description = "Not found, or neither id nor CPF given", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid CPF", body = crate::error::ErrorBody),
    ),
    tag = "customers"
)]
pub(crate) async fn lookup_customer(
    State(state): State<AppState>,
    body: Result<Json<CustomerLookupRequest>, JsonRejection>,
) -> Result<Json<CustomerRecord>, AppError> {
    let req = extract_json(body)?;
    let record = match (req.id, sanitize_opt(req.cpf.as_deref())) {
        (Some(id), _) => find_by_id(&state, &id)?,
        (None, Some(canonical)) => find_by_cpf(&state, &canonical)?,
        (None, None) => {
            return Err(AppError::not_found("Either id or CPF must be provided"));
        }
    };
    Ok(Json(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_app() -> (AppState, Router) {
        let state = AppState::new();
        let app = router().with_state(state.clone());
        (state, app)
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn create(app: &Router, name: &str, cpf: &str) -> serde_json::Value {
        let (status, body) = send(
            app,
            post_json(
                "/v1/customers",
                serde_json::json!({"name": name, "born": "1990-03-15", "CPF": cpf}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "body: {body}");
        body
    }

    // -- create ---------------------------------------------------------------

    #[tokio::test]
    async fn create_stores_canonical_cpf() {
        let (state, app) = test_app();
        let body = create(&app, "Ana Souza", "208.021.130-79").await;
        assert_eq!(body["CPF"], "20802113079");
        assert_eq!(body["name"], "Ana Souza");
        assert_eq!(body["born"], "15/03/1990");
        assert_eq!(state.customers.len(), 1);
    }

    #[tokio::test]
    async fn create_invalid_cpf_is_rejected_before_storage() {
        let (state, app) = test_app();
        let (status, body) = send(
            &app,
            post_json(
                "/v1/customers",
                serde_json::json!({"name": "Ana", "born": "1990-03-15", "CPF": "208.021.130-40"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "INVALID_CPF");
        assert!(state.customers.is_empty());
        assert_eq!(state.metrics.cpf_rejections(), 1);
    }

    #[tokio::test]
    async fn create_duplicate_cpf_conflicts_across_masks() {
        let (state, app) = test_app();
        create(&app, "Ana", "208.021.130-79").await;
        let (status, body) = send(
            &app,
            post_json(
                "/v1/customers",
                serde_json::json!({"name": "Bia", "born": "1991-01-01", "CPF": "20802113079"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CONFLICT");
        assert_eq!(state.customers.len(), 1);
    }

    #[tokio::test]
    async fn create_missing_cpf_is_validation_error() {
        let (_, app) = test_app();
        let (status, body) = send(
            &app,
            post_json(
                "/v1/customers",
                serde_json::json!({"name": "Ana", "born": "1990-03-15"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn create_rejects_bad_name_and_born() {
        let (_, app) = test_app();
        let long_name = "x".repeat(NAME_MAX_LEN + 1);
        for payload in [
            serde_json::json!({"name": "  ", "born": "1990-03-15", "CPF": "20802113079"}),
            serde_json::json!({"name": long_name, "born": "1990-03-15", "CPF": "20802113079"}),
            serde_json::json!({"name": "Ana", "born": "1990-13-01", "CPF": "20802113079"}),
        ] {
            let (status, body) = send(&app, post_json("/v1/customers", payload)).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        }
    }

    #[tokio::test]
    async fn create_non_string_cpf_is_bad_request() {
        let (_, app) = test_app();
        let (status, body) = send(
            &app,
            post_json(
                "/v1/customers",
                serde_json::json!({"name": "Ana", "born": "1990-03-15", "CPF": 20802113079u64}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn create_accepts_display_date_and_trims_name() {
        let (_, app) = test_app();
        let (status, body) = send(
            &app,
            post_json(
                "/v1/customers",
                serde_json::json!({"name": "  Ana  ", "born": "15/03/1990", "CPF": "20802113079"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["name"], "Ana");
        assert_eq!(body["born"], "15/03/1990");
    }

    // -- detail ---------------------------------------------------------------

    #[tokio::test]
    async fn get_by_id_and_missing() {
        let (_, app) = test_app();
        let created = create(&app, "Ana", "20802113079").await;
        let id = created["id"].as_str().unwrap();

        let (status, body) = send(&app, get(&format!("/v1/customers/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, created);

        let (status, _) = send(&app, get(&format!("/v1/customers/{}", Uuid::new_v4()))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, get("/v1/customers/not-a-uuid")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn get_by_cpf_accepts_masked_and_bare() {
        let (_, app) = test_app();
        let created = create(&app, "Ana", "20802113079").await;

        for path in ["/v1/customers/cpf/208.021.130-79", "/v1/customers/cpf/20802113079"] {
            let (status, body) = send(&app, get(path)).await;
            assert_eq!(status, StatusCode::OK, "{path}");
            assert_eq!(body["id"], created["id"]);
        }
    }

    #[tokio::test]
    async fn get_by_cpf_distinguishes_invalid_from_absent() {
        let (state, app) = test_app();
        let (status, body) = send(&app, get("/v1/customers/cpf/20802113040")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "INVALID_CPF");
        assert_eq!(state.metrics.cpf_rejections(), 1);

        let (status, body) = send(&app, get("/v1/customers/cpf/11144477735")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn lookup_by_body_cpf_or_id() {
        let (_, app) = test_app();
        let created = create(&app, "Ana", "20802113079").await;

        let (status, body) = send(
            &app,
            post_json("/v1/customers/detail", serde_json::json!({"CPF": "208.021.130-79"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], created["id"]);

        let (status, body) = send(
            &app,
            post_json("/v1/customers/detail", serde_json::json!({"id": created["id"]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["CPF"], "20802113079");
    }

    #[tokio::test]
    async fn cpf_errors_report_sanitized_input() {
        let (state, app) = test_app();
        let (status, body) = send(
            &app,
            post_json(
                "/v1/customers",
                serde_json::json!({"name": "Ana", "born": "1990-03-15", "CPF": "208.021.130-40"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let message = body["error"]["message"].as_str().unwrap();
        assert!(message.contains("\"20802113040\""), "{message}");
        assert!(!message.contains("208.021.130-40"), "{message}");

        let (status, body) = send(
            &app,
            post_json("/v1/customers/detail", serde_json::json!({"CPF": "208.021.130-40"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("\"20802113040\""));
        assert_eq!(state.metrics.cpf_rejections(), 2);
    }

    #[tokio::test]
    async fn lookup_with_null_cpf_is_not_found() {
        let (_, app) = test_app();
        create(&app, "Ana", "20802113079").await;
        let (status, body) = send(
            &app,
            post_json("/v1/customers/detail", serde_json::json!({"CPF": null})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn lookup_without_identifier_is_not_found() {
        let (_, app) = test_app();
        let (status, body) =
            send(&app, post_json("/v1/customers/detail", serde_json::json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Either id or CPF must be provided"));
    }

    // -- list -----------------------------------------------------------------

    #[tokio::test]
    async fn list_empty_first_page() {
        let (_, app) = test_app();
        let (status, body) = send(&app, get("/v1/customers")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 0);
        assert!(body["next"].is_null());
        assert!(body["previous"].is_null());
        assert_eq!(body["results"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn list_paginates_and_links() {
        let (_, app) = test_app();
        for (name, cpf) in [
            ("Fabio", "20802113079"),
            ("Ana", "97088230070"),
            ("Eva", "61876157003"),
            ("Caio", "22349654036"),
            ("Bia", "47878593078"),
            ("Davi", "64570225020"),
        ] {
            create(&app, name, cpf).await;
        }

        let (status, body) = send(&app, get("/v1/customers")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 6);
        assert_eq!(body["next"], "/v1/customers?page=2&page_size=5");
        assert!(body["previous"].is_null());
        let names: Vec<_> = body["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["Ana", "Bia", "Caio", "Davi", "Eva"]);

        let (status, body) = send(&app, get("/v1/customers?page=2")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["next"].is_null());
        assert_eq!(body["previous"], "/v1/customers?page=1&page_size=5");
        assert_eq!(body["results"][0]["name"], "Fabio");

        let (status, _) = send(&app, get("/v1/customers?page=3")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, get("/v1/customers?page=0")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    async fn seed_six(app: &Router) {
        for (name, cpf) in [
            ("Fabio", "20802113079"),
            ("Ana", "97088230070"),
            ("Eva", "61876157003"),
            ("Caio", "22349654036"),
            ("Bia", "47878593078"),
            ("Davi", "64570225020"),
        ] {
            create(app, name, cpf).await;
        }
    }

    #[tokio::test]
    async fn list_unparseable_page_is_not_found() {
        let (_, app) = test_app();
        seed_six(&app).await;
        for uri in [
            "/v1/customers?page=abc",
            "/v1/customers?page=-1",
            "/v1/customers?page=1.5",
            "/v1/customers?page=",
        ] {
            let (status, body) = send(&app, get(uri)).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body["error"]["code"], "NOT_FOUND");
            assert!(body["error"]["message"]
                .as_str()
                .unwrap()
                .ends_with("Invalid page."));
        }
    }

    #[tokio::test]
    async fn list_last_page_keyword() {
        let (_, app) = test_app();
        seed_six(&app).await;
        let (status, body) = send(&app, get("/v1/customers?page=last")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["next"].is_null());
        assert_eq!(body["previous"], "/v1/customers?page=1&page_size=5");
        assert_eq!(body["results"].as_array().unwrap().len(), 1);
        assert_eq!(body["results"][0]["name"], "Fabio");

        let (_, app) = test_app();
        let (status, body) = send(&app, get("/v1/customers?page=last")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn list_bad_page_size_uses_default() {
        let (_, app) = test_app();
        seed_six(&app).await;
        for uri in [
            "/v1/customers?page_size=abc",
            "/v1/customers?page_size=-3",
            "/v1/customers?page_size=0",
        ] {
            let (status, body) = send(&app, get(uri)).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(body["results"].as_array().unwrap().len(), 5, "{uri}");
            assert_eq!(body["next"], "/v1/customers?page=2&page_size=5");
        }

        let (_, body) = send(&app, get("/v1/customers?page_size=2&page=last")).await;
        assert_eq!(body["results"].as_array().unwrap().len(), 2);
        assert_eq!(body["previous"], "/v1/customers?page=2&page_size=2");
    }

    #[tokio::test]
    async fn list_page_size_is_capped() {
        let (_, app) = test_app();
        create(&app, "Ana", "20802113079").await;
        let (status, body) = send(&app, get("/v1/customers?page_size=100000")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
    }

    #[tokio::test]
    async fn list_filters_by_name_and_born() {
        let (_, app) = test_app();
        create(&app, "Ana", "20802113079").await;
        create(&app, "Bia", "97088230070").await;

        let (_, body) = send(&app, get("/v1/customers?name=Ana")).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["results"][0]["CPF"], "20802113079");

        let (_, body) = send(&app, get("/v1/customers?born=15/03/1990")).await;
        assert_eq!(body["count"], 2);

        let (_, body) = send(&app, get("/v1/customers?born=2000-01-01")).await;
        assert_eq!(body["count"], 0);

        let (status, body) = send(&app, get("/v1/customers?born=someday")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[test]
    fn page_link_encodes_filters() {
        let params = ListCustomersParams {
            name: Some("Ana Souza".into()),
            born: Some("15/03/1990".into()),
            ..Default::default()
        };
        assert_eq!(
            params.page_link(2, 5),
            "/v1/customers?name=Ana+Souza&born=15%2F03%2F1990&page=2&page_size=5"
        );
    }
}
