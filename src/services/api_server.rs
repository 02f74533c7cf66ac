// src/services/api_server.rs
//! API Server for the wallet
//!
//! Exposes the issuance protocol and the petition state to a front end. The
//! API is built using Axum and includes endpoints for:
//! - Running a credential issuance attempt for an attribute
//! - Listing and reading the stored certificate records
//! - Fetching the current petition
//! - Entering petition verification codes
//! - Reading the loading/error status shown by the UI

use crate::models::{CertificateRecord, Petition, SubmissionSet};
use crate::services::petition_client::{fetch_petition, PetitionSource};
use crate::services::ServiceError;
use crate::state::{selectors, update_verification_code, VerificationCodeMap};
use crate::wallet::credential_storage::CertificateStore;
use crate::wallet::issuance::{CredentialOrchestrator, IssuanceError, IssuanceRequest};
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use log::info;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

// API request and response structures

/// Request payload for issuing a credential
#[derive(Serialize, Deserialize)]
struct IssueCredentialRequest {
    #[serde(default)]
    mandatory: SubmissionSet,
    #[serde(default)]
    optional: SubmissionSet,
    /// Falls back to the configured default issuer
    issuer_url: Option<String>,
}

/// Request payload for fetching a petition
#[derive(Serialize, Deserialize)]
struct FetchPetitionRequest {
    url: String,
    id: String,
}

/// Request payload for entering a verification code
#[derive(Serialize, Deserialize)]
struct UpdateVerificationRequest {
    value: String,
}

#[derive(Serialize, Deserialize)]
struct StatusResponse {
    loading: bool,
    error: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, error: impl ToString) -> Response {
    (status, Json(ErrorResponse { error: error.to_string() })).into_response()
}

fn service_status(e: &ServiceError) -> StatusCode {
    match e {
        ServiceError::InvalidUrl { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::BAD_GATEWAY,
    }
}

/// API server state containing all service dependencies
#[derive(Clone)]
pub struct ApiServer {
    /// Runs issuance attempts and owns the state store
    orchestrator: Arc<CredentialOrchestrator>,

    /// Where petitions are fetched from
    petitions: Arc<dyn PetitionSource>,

    /// Issuer used when a request does not name one
    default_issuer_url: String,
}

impl ApiServer {
    /// Creates a new instance of the API server
    ///
    /// # Arguments
    /// * `orchestrator` - Issuance protocol runner
    /// * `petitions` - Petition source
    /// * `default_issuer_url` - Issuer used when a request omits `issuer_url`
    pub fn new(
        orchestrator: CredentialOrchestrator,
        petitions: Arc<dyn PetitionSource>,
        default_issuer_url: String,
    ) -> Self {
        ApiServer {
            orchestrator: Arc::new(orchestrator),
            petitions,
            default_issuer_url,
        }
    }

    /// Builds the router with all API routes
    pub fn router(&self) -> Router {
        Router::new()
            .route("/credentials/:attribute_id", post(Self::issue_credential_handler))
            .route("/certificates", get(Self::list_certificates_handler))
            .route("/certificates/:attribute_id", get(Self::get_certificate_handler))
            .route(
                "/petition",
                get(Self::get_petition_handler).post(Self::fetch_petition_handler),
            )
            .route("/verification", get(Self::get_verification_handler))
            .route("/verification/:field_id", put(Self::update_verification_handler))
            .route("/status", get(Self::status_handler))
            .layer(CorsLayer::permissive())
            .with_state(Arc::new(self.clone()))
    }

    /// Starts the API server and begins listening for requests
    ///
    /// # Arguments
    /// * `addr` - Socket address to bind to (e.g., "127.0.0.1:3000")
    ///
    /// # Errors
    /// Returns the I/O error if the address cannot be bound or serving fails
    pub async fn run(&self, addr: SocketAddr) -> std::io::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("API server listening on http://{}", addr);
        axum::serve(listener, self.router()).await
    }

    // =====================
    // Credential Handlers
    // =====================

    /// Runs a full issuance attempt for an attribute
    ///
    /// # Endpoint
    /// POST /credentials/:attribute_id
    ///
    /// # Request Body
    /// `{ "mandatory": {...}, "optional": {...}, "issuer_url": "..." }`
    ///
    /// # Responses
    /// - 200 OK: Returns the stored certificate record
    /// - 400 Bad Request: Issuer URL is invalid
    /// - 502 Bad Gateway: Issuer rejected the request or was unreachable
    /// - 500 Internal Server Error: Crypto Engine failed or produced invalid output
    async fn issue_credential_handler(
        Path(attribute_id): Path<String>,
        State(state): State<Arc<ApiServer>>,
        Json(payload): Json<IssueCredentialRequest>,
    ) -> Response {
        let request = IssuanceRequest {
            mandatory: payload.mandatory,
            optional: payload.optional,
            issuer_url: payload
                .issuer_url
                .unwrap_or_else(|| state.default_issuer_url.clone()),
            attribute_id,
        };

        match state.orchestrator.issue(request).await {
            Ok(record) => (StatusCode::OK, Json(record)).into_response(),
            Err(IssuanceError::Service(e)) => error_response(service_status(&e), e),
            Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e),
        }
    }

    /// Lists every stored certificate record by attribute
    ///
    /// # Endpoint
    /// GET /certificates
    async fn list_certificates_handler(
        State(state): State<Arc<ApiServer>>,
    ) -> Json<CertificateStore> {
        Json(
            state
                .orchestrator
                .store()
                .select(|s| selectors::certificates(s).clone()),
        )
    }

    /// Reads the certificate record of one attribute
    ///
    /// # Endpoint
    /// GET /certificates/:attribute_id
    ///
    /// # Responses
    /// - 200 OK: Returns the record
    /// - 404 Not Found: No credential issued for that attribute
    async fn get_certificate_handler(
        Path(attribute_id): Path<String>,
        State(state): State<Arc<ApiServer>>,
    ) -> Response {
        let record: Option<CertificateRecord> = state
            .orchestrator
            .store()
            .select(|s| selectors::certificate(s, &attribute_id).cloned());

        match record {
            Some(record) => (StatusCode::OK, Json(record)).into_response(),
            None => error_response(
                StatusCode::NOT_FOUND,
                format!("no credential for attribute '{}'", attribute_id),
            ),
        }
    }

    // =====================
    // Petition Handlers
    // =====================

    /// Fetches a petition and makes it the current one
    ///
    /// # Endpoint
    /// POST /petition
    ///
    /// # Responses
    /// - 200 OK: Returns the petition
    /// - 400 Bad Request: Petition URL is invalid
    /// - 502 Bad Gateway: Petition source failed
    async fn fetch_petition_handler(
        State(state): State<Arc<ApiServer>>,
        Json(payload): Json<FetchPetitionRequest>,
    ) -> Response {
        let store = state.orchestrator.store();
        match fetch_petition(store, state.petitions.as_ref(), &payload.url, &payload.id).await {
            Ok(petition) => (StatusCode::OK, Json(petition)).into_response(),
            Err(e) => error_response(service_status(&e), e),
        }
    }

    /// GET /petition
    async fn get_petition_handler(State(state): State<Arc<ApiServer>>) -> Json<Petition> {
        Json(
            state
                .orchestrator
                .store()
                .select(|s| selectors::petition(s).clone()),
        )
    }

    /// Records the value entered for one petition verification field
    ///
    /// # Endpoint
    /// PUT /verification/:field_id
    ///
    /// # Responses
    /// - 200 OK: Returns the whole verification code map
    async fn update_verification_handler(
        Path(field_id): Path<String>,
        State(state): State<Arc<ApiServer>>,
        Json(payload): Json<UpdateVerificationRequest>,
    ) -> Json<VerificationCodeMap> {
        let store = state.orchestrator.store();
        store.dispatch(update_verification_code(field_id, payload.value));
        Json(store.select(|s| selectors::verification(s).clone()))
    }

    /// GET /verification
    async fn get_verification_handler(
        State(state): State<Arc<ApiServer>>,
    ) -> Json<VerificationCodeMap> {
        Json(
            state
                .orchestrator
                .store()
                .select(|s| selectors::verification(s).clone()),
        )
    }

    /// GET /status
    async fn status_handler(State(state): State<Arc<ApiServer>>) -> Json<StatusResponse> {
        Json(state.orchestrator.store().select(|s| StatusResponse {
            loading: selectors::loading(s),
            error: selectors::error(s).map(str::to_string),
        }))
    }
}
