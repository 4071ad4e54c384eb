// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use seatwise_audit::{MemoryAuditSink, OperationLogEntry};
use seatwise_core::{
    AssignResult, AssignmentVerdict, InMemoryDirectory, InfrastructureError, LicenseService,
};
use seatwise_domain::{
    AssignmentRequest, AssignmentTarget, LicenseCatalog, LicenseType, TargetKind,
};
use seatwise_inventory::{InMemoryInventoryStore, InventoryError, InventoryLedger, InventoryStore, SeatTotals};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// The fully wired engine behind every handler.
type Service = LicenseService<InMemoryInventoryStore, InMemoryDirectory, MemoryAuditSink>;

/// Seatwise Server - HTTP server for the license entitlement engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Purchased seats registered per license type at startup
    #[arg(short, long, default_value_t = 25)]
    seats: u32,

    /// Timeout in seconds for directory and store calls
    #[arg(short, long, default_value_t = 10)]
    timeout_secs: u64,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The license engine.
    service: Arc<Service>,
}

/// API request for validating or performing an assignment.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct AssignApiRequest {
    /// The target's directory identifier.
    target_id: String,
    /// The target kind: "user" or "group".
    target_type: String,
    /// The license type wire name (e.g. `M365_E3`).
    license_type: String,
    /// The number of seats requested. Defaults to one.
    #[serde(default = "default_quantity")]
    quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

/// API request for unassigning a license.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct UnassignApiRequest {
    /// The assignment id returned by a previous assign.
    assignment_id: String,
}

/// API response for validate operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ValidateApiResponse {
    /// Whether the request passed every check.
    is_valid: bool,
    /// Every violated rule, in check order.
    errors: Vec<String>,
}

/// API response for assign and unassign operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AssignApiResponse {
    /// Success indicator.
    success: bool,
    /// A human-readable summary.
    message: String,
    /// The itemized failure reasons, when the operation failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<String>>,
    /// The assignment id involved, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    assignment_id: Option<String>,
}

impl From<AssignResult> for AssignApiResponse {
    fn from(result: AssignResult) -> Self {
        Self {
            success: result.success,
            message: result.message,
            errors: result.errors,
            assignment_id: result.assignment_id,
        }
    }
}

/// Seat counts for one license type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct InventoryEntryResponse {
    /// The license type wire name.
    license_type: String,
    /// The total number of purchased seats.
    total: u32,
    /// The number of seats currently consumed.
    consumed: u32,
    /// The number of seats still available.
    available: u32,
}

impl InventoryEntryResponse {
    fn new(license_type: LicenseType, totals: SeatTotals) -> Self {
        Self {
            license_type: license_type.as_str().to_string(),
            total: totals.total,
            consumed: totals.consumed,
            available: totals.available(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct HealthResponse {
    /// Always "ok" when the server is up.
    status: String,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<InfrastructureError> for HttpError {
    fn from(err: InfrastructureError) -> Self {
        error!(error = %err, "Infrastructure error");
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: err.to_string(),
        }
    }
}

/// Parses a license type wire name, rejecting unknown names up front.
fn parse_license_type(name: &str) -> Result<LicenseType, HttpError> {
    LicenseType::from_str(name).map_err(|err| HttpError {
        status: StatusCode::BAD_REQUEST,
        message: err.to_string(),
    })
}

/// Builds a domain request from the API request.
fn parse_assign_request(req: &AssignApiRequest) -> Result<AssignmentRequest, HttpError> {
    let license_type: LicenseType = parse_license_type(&req.license_type)?;
    let kind: TargetKind = TargetKind::from_str(&req.target_type).map_err(|err| HttpError {
        status: StatusCode::BAD_REQUEST,
        message: err.to_string(),
    })?;
    let target: AssignmentTarget = AssignmentTarget::new(req.target_id.clone(), kind);
    Ok(AssignmentRequest::new(target, license_type, req.quantity))
}

/// Handler for POST `/licenses/validate` endpoint.
///
/// Runs every validation check without consuming seats or touching
/// the directory's assignments.
async fn handle_validate(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<AssignApiRequest>,
) -> Result<Json<ValidateApiResponse>, HttpError> {
    info!(
        target_id = %req.target_id,
        license_type = %req.license_type,
        quantity = req.quantity,
        "Handling validate request"
    );

    let request: AssignmentRequest = parse_assign_request(&req)?;
    let verdict: AssignmentVerdict = app_state.service.validate_assignment(&request).await?;

    Ok(Json(ValidateApiResponse {
        is_valid: verdict.is_valid,
        errors: verdict.errors,
    }))
}

/// Handler for POST `/licenses/assign` endpoint.
///
/// Validates, reserves seats, and performs the grant. Rule failures
/// come back as a 200 with `success: false`; only unreachable
/// collaborators produce an error status.
async fn handle_assign(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<AssignApiRequest>,
) -> Result<Json<AssignApiResponse>, HttpError> {
    info!(
        target_id = %req.target_id,
        license_type = %req.license_type,
        quantity = req.quantity,
        "Handling assign request"
    );

    let request: AssignmentRequest = parse_assign_request(&req)?;
    let result: AssignResult = app_state.service.assign(&request).await?;

    if result.success {
        info!(
            target_id = %req.target_id,
            license_type = %req.license_type,
            assignment_id = ?result.assignment_id,
            "Successfully assigned license"
        );
    }

    Ok(Json(result.into()))
}

/// Handler for POST `/licenses/unassign` endpoint.
async fn handle_unassign(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<UnassignApiRequest>,
) -> Result<Json<AssignApiResponse>, HttpError> {
    info!(assignment_id = %req.assignment_id, "Handling unassign request");

    let result: AssignResult = app_state.service.unassign(&req.assignment_id).await?;

    Ok(Json(result.into()))
}

/// Handler for GET `/inventory` endpoint.
///
/// Lists seat counts for every license type in the catalog.
async fn handle_list_inventory(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<InventoryEntryResponse>>, HttpError> {
    info!("Handling list_inventory request");

    let service: &Service = &app_state.service;
    let mut entries: Vec<InventoryEntryResponse> = Vec::new();
    for license_type in service.catalog().license_types() {
        match service.ledger().store().get_totals(license_type) {
            Ok(totals) => entries.push(InventoryEntryResponse::new(license_type, totals)),
            // Catalog types without a seat record are simply omitted.
            Err(InventoryError::UnknownLicenseType(_)) => {}
            Err(err) => {
                return Err(HttpError {
                    status: StatusCode::BAD_GATEWAY,
                    message: err.to_string(),
                });
            }
        }
    }

    Ok(Json(entries))
}

/// Handler for GET `/inventory/{license_type}` endpoint.
async fn handle_get_inventory(
    AxumState(app_state): AxumState<AppState>,
    Path(license_type): Path<String>,
) -> Result<Json<InventoryEntryResponse>, HttpError> {
    info!(license_type = %license_type, "Handling get_inventory request");

    let license_type: LicenseType = parse_license_type(&license_type)?;
    match app_state.service.ledger().store().get_totals(license_type) {
        Ok(totals) => Ok(Json(InventoryEntryResponse::new(license_type, totals))),
        Err(err @ InventoryError::UnknownLicenseType(_)) => Err(HttpError {
            status: StatusCode::NOT_FOUND,
            message: err.to_string(),
        }),
        Err(err) => Err(HttpError {
            status: StatusCode::BAD_GATEWAY,
            message: err.to_string(),
        }),
    }
}

/// Handler for GET `/audit/log` endpoint.
///
/// Returns every operation log entry appended so far, oldest first.
async fn handle_get_audit_log(
    AxumState(app_state): AxumState<AppState>,
) -> Json<Vec<OperationLogEntry>> {
    info!("Handling get_audit_log request");

    Json(app_state.service.audit().entries())
}

/// Handler for GET `/health` endpoint.
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: String::from("ok"),
    })
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/licenses/validate", post(handle_validate))
        .route("/licenses/assign", post(handle_assign))
        .route("/licenses/unassign", post(handle_unassign))
        .route("/inventory", get(handle_list_inventory))
        .route("/inventory/{license_type}", get(handle_get_inventory))
        .route("/audit/log", get(handle_get_audit_log))
        .route("/health", get(handle_health))
        .with_state(app_state)
}

/// Wires a service over in-process collaborators, registering every
/// catalog license type with the given seat total.
fn build_service(seats: u32, call_timeout: Duration) -> Result<Service, InventoryError> {
    let catalog: Arc<LicenseCatalog> = Arc::new(LicenseCatalog::standard());
    let store: InMemoryInventoryStore = InMemoryInventoryStore::new();
    for license_type in catalog.license_types() {
        store.register(license_type, seats)?;
    }

    Ok(LicenseService::new(
        catalog,
        InventoryLedger::new(store),
        InMemoryDirectory::new(),
        MemoryAuditSink::new(),
    )
    .with_call_timeout(call_timeout))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Seatwise Server");

    let service: Service = build_service(args.seats, Duration::from_secs(args.timeout_secs))?;
    info!(
        seats = args.seats,
        "Registered seat inventory for all catalog license types"
    );

    let app_state: AppState = AppState {
        service: Arc::new(service),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use tower::ServiceExt;

    /// Helper to create a test app with a given seat total per type.
    fn create_test_app(seats: u32) -> Router {
        let service: Service = build_service(seats, Duration::from_secs(5))
            .expect("Failed to build in-memory service");
        build_router(AppState {
            service: Arc::new(service),
        })
    }

    /// Helper to create a test assign request body.
    fn create_test_assign_request(license_type: &str) -> AssignApiRequest {
        AssignApiRequest {
            target_id: String::from("user-001"),
            target_type: String::from("user"),
            license_type: license_type.to_string(),
            quantity: 1,
        }
    }

    /// Helper to POST a JSON body and return the response.
    async fn post_json<T: Serialize>(app: Router, uri: &str, body: &T) -> axum::response::Response {
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    /// Helper to GET a uri and return the response.
    async fn get_uri(app: Router, uri: &str) -> axum::response::Response {
        app.oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
    }

    /// Helper to deserialize a response body.
    async fn read_body<T: for<'de> Deserialize<'de>>(response: axum::response::Response) -> T {
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body_bytes).unwrap()
    }

    #[tokio::test]
    async fn test_assign_succeeds_and_decrements_inventory() {
        let app: Router = create_test_app(5);

        let response = post_json(
            app.clone(),
            "/licenses/assign",
            &create_test_assign_request("O365_BUSINESS_ESSENTIALS"),
        )
        .await;

        assert_eq!(response.status(), HttpStatusCode::OK);
        let api_response: AssignApiResponse = read_body(response).await;
        assert!(api_response.success);
        assert_eq!(api_response.message, "License assigned successfully");
        assert!(api_response.assignment_id.is_some());

        let inventory_response = get_uri(app, "/inventory/O365_BUSINESS_ESSENTIALS").await;
        assert_eq!(inventory_response.status(), HttpStatusCode::OK);
        let entry: InventoryEntryResponse = read_body(inventory_response).await;
        assert_eq!(entry.total, 5);
        assert_eq!(entry.consumed, 1);
        assert_eq!(entry.available, 4);
    }

    #[tokio::test]
    async fn test_assign_with_missing_prerequisite_reports_rule_failure() {
        let app: Router = create_test_app(5);

        let response = post_json(
            app,
            "/licenses/assign",
            &create_test_assign_request("AAD_PREMIUM_P2"),
        )
        .await;

        assert_eq!(response.status(), HttpStatusCode::OK);
        let api_response: AssignApiResponse = read_body(response).await;
        assert!(!api_response.success);
        assert_eq!(api_response.message, "License validation failed");
        assert_eq!(
            api_response.errors,
            Some(vec![String::from(
                "Missing required prerequisite licenses for AAD_PREMIUM_P2: AAD_PREMIUM_P1"
            )])
        );
    }

    #[tokio::test]
    async fn test_assign_with_unknown_license_type_is_bad_request() {
        let app: Router = create_test_app(5);

        let response = post_json(
            app,
            "/licenses/assign",
            &create_test_assign_request("VISIO_PLAN_2"),
        )
        .await;

        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
        let error_response: ErrorResponse = read_body(response).await;
        assert!(error_response.error);
        assert!(error_response.message.contains("VISIO_PLAN_2"));
    }

    #[tokio::test]
    async fn test_assign_with_unknown_target_type_is_bad_request() {
        let app: Router = create_test_app(5);

        let mut request: AssignApiRequest = create_test_assign_request("M365_E3");
        request.target_type = String::from("device");

        let response = post_json(app, "/licenses/assign", &request).await;

        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_validate_reports_shortfall_without_consuming_seats() {
        let app: Router = create_test_app(0);

        let response = post_json(
            app.clone(),
            "/licenses/validate",
            &create_test_assign_request("M365_E3"),
        )
        .await;

        assert_eq!(response.status(), HttpStatusCode::OK);
        let verdict: ValidateApiResponse = read_body(response).await;
        assert!(!verdict.is_valid);
        assert_eq!(
            verdict.errors,
            vec![String::from(
                "Insufficient licenses available. Required: 1, Available: 0"
            )]
        );

        // Validation is read-only.
        let entry: InventoryEntryResponse =
            read_body(get_uri(app, "/inventory/M365_E3").await).await;
        assert_eq!(entry.consumed, 0);
    }

    #[tokio::test]
    async fn test_unassign_restores_inventory() {
        let app: Router = create_test_app(5);

        let assign_response: AssignApiResponse = read_body(
            post_json(
                app.clone(),
                "/licenses/assign",
                &create_test_assign_request("O365_BUSINESS_ESSENTIALS"),
            )
            .await,
        )
        .await;
        let assignment_id: String = assign_response.assignment_id.expect("assignment id");

        let response = post_json(
            app.clone(),
            "/licenses/unassign",
            &UnassignApiRequest { assignment_id },
        )
        .await;

        assert_eq!(response.status(), HttpStatusCode::OK);
        let api_response: AssignApiResponse = read_body(response).await;
        assert!(api_response.success);
        assert_eq!(api_response.message, "License unassigned successfully");

        let entry: InventoryEntryResponse =
            read_body(get_uri(app, "/inventory/O365_BUSINESS_ESSENTIALS").await).await;
        assert_eq!(entry.consumed, 0);
        assert_eq!(entry.available, 5);
    }

    #[tokio::test]
    async fn test_unassign_of_unknown_id_is_noop_success() {
        let app: Router = create_test_app(5);

        let response = post_json(
            app,
            "/licenses/unassign",
            &UnassignApiRequest {
                assignment_id: String::from("asg_0_0"),
            },
        )
        .await;

        assert_eq!(response.status(), HttpStatusCode::OK);
        let api_response: AssignApiResponse = read_body(response).await;
        assert!(api_response.success);
        assert_eq!(api_response.message, "License already unassigned");
    }

    #[tokio::test]
    async fn test_inventory_lists_every_catalog_type() {
        let app: Router = create_test_app(25);

        let response = get_uri(app, "/inventory").await;

        assert_eq!(response.status(), HttpStatusCode::OK);
        let entries: Vec<InventoryEntryResponse> = read_body(response).await;
        assert_eq!(entries.len(), 8);
        assert!(entries.iter().all(|entry| entry.total == 25));
    }

    #[tokio::test]
    async fn test_audit_log_records_every_attempt() {
        let app: Router = create_test_app(5);

        // One grant, one rule failure.
        post_json(
            app.clone(),
            "/licenses/assign",
            &create_test_assign_request("O365_BUSINESS_ESSENTIALS"),
        )
        .await;
        post_json(
            app.clone(),
            "/licenses/assign",
            &create_test_assign_request("AAD_PREMIUM_P2"),
        )
        .await;

        let response = get_uri(app, "/audit/log").await;

        assert_eq!(response.status(), HttpStatusCode::OK);
        let entries: Vec<serde_json::Value> = read_body(response).await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["status"], "success");
        assert_eq!(entries[0]["operation"], "assign");
        assert_eq!(entries[0]["license_type"], "O365_BUSINESS_ESSENTIALS");
        assert_eq!(entries[1]["status"], "failed");
        assert!(
            entries[1]["error_message"]
                .as_str()
                .is_some_and(|msg| msg.contains("AAD_PREMIUM_P1"))
        );
    }

    #[tokio::test]
    async fn test_health_endpoint_responds_ok() {
        let app: Router = create_test_app(1);

        let response = get_uri(app, "/health").await;

        assert_eq!(response.status(), HttpStatusCode::OK);
        let health: HealthResponse = read_body(response).await;
        assert_eq!(health.status, "ok");
    }
}
