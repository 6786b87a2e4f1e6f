use axum::{
	Json, Router,
	extract::State,
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::CorsLayer;

use funil_service::{
	CoachAdvice, CoachProposalRequest, CommissionSummary, CreateGoalRequest, CreateGoalResponse,
	CreateMemberRequest, CreateProposalRequest, CreateProposalResponse, MemberView,
	ScoreLeadRequest, ScoreLeadResponse, ServiceError, SummaryRequest, UpdateMemberRequest,
	UpdateStatusRequest, UpdateStatusResponse, WebhookResponse,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/commissions/summary", post(commission_summary))
		.route("/v1/goals", post(create_goal))
		.route("/v1/pipeline/proposals", post(create_proposal))
		.route("/v1/pipeline/status", post(update_status))
		.route("/v1/pipeline/coach", post(coach_proposal))
		.route("/v1/leads/score", post(score_lead))
		.route("/v1/team/members", get(list_members).post(create_member))
		.route("/v1/team/members/update", post(update_member))
		.merge(webhook_router())
		.with_state(state)
}

// External schedulers deliver cross-origin, so only the webhook routes carry
// permissive CORS.
fn webhook_router() -> Router<AppState> {
	Router::new()
		.route("/webhooks/calendly", post(webhook_calendly))
		.route("/webhooks/calcom", post(webhook_calcom))
		.route("/webhooks/lead", post(webhook_lead))
		.layer(CorsLayer::permissive())
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn commission_summary(
	State(state): State<AppState>,
	Json(payload): Json<SummaryRequest>,
) -> Result<Json<CommissionSummary>, ApiError> {
	let response = state.service.commission_summary(payload).await?;

	Ok(Json(response))
}

async fn create_goal(
	State(state): State<AppState>,
	Json(payload): Json<CreateGoalRequest>,
) -> Result<Json<CreateGoalResponse>, ApiError> {
	let response = state.service.create_goal(payload).await?;

	Ok(Json(response))
}

async fn create_proposal(
	State(state): State<AppState>,
	Json(payload): Json<CreateProposalRequest>,
) -> Result<Json<CreateProposalResponse>, ApiError> {
	let response = state.service.create_proposal(payload).await?;

	Ok(Json(response))
}

async fn update_status(
	State(state): State<AppState>,
	Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<UpdateStatusResponse>, ApiError> {
	let response = state.service.update_proposal_status(payload).await?;

	Ok(Json(response))
}

async fn coach_proposal(
	State(state): State<AppState>,
	Json(payload): Json<CoachProposalRequest>,
) -> Result<Json<CoachAdvice>, ApiError> {
	let response = state.service.coach_proposal(payload).await?;

	Ok(Json(response))
}

async fn score_lead(
	State(state): State<AppState>,
	Json(payload): Json<ScoreLeadRequest>,
) -> Result<Json<ScoreLeadResponse>, ApiError> {
	let response = state.service.score_lead(payload).await?;

	Ok(Json(response))
}

async fn list_members(State(state): State<AppState>) -> Result<Json<Vec<MemberView>>, ApiError> {
	let response = state.service.list_members().await?;

	Ok(Json(response))
}

async fn create_member(
	State(state): State<AppState>,
	Json(payload): Json<CreateMemberRequest>,
) -> Result<Json<MemberView>, ApiError> {
	let response = state.service.create_member(payload).await?;

	Ok(Json(response))
}

async fn update_member(
	State(state): State<AppState>,
	Json(payload): Json<UpdateMemberRequest>,
) -> Result<Json<MemberView>, ApiError> {
	let response = state.service.update_member(payload).await?;

	Ok(Json(response))
}

async fn webhook_calendly(
	State(state): State<AppState>,
	Json(payload): Json<Value>,
) -> Result<Json<WebhookResponse>, ApiError> {
	let response = state.service.ingest_calendly(payload).await?;

	Ok(Json(response))
}

async fn webhook_calcom(
	State(state): State<AppState>,
	Json(payload): Json<Value>,
) -> Result<Json<WebhookResponse>, ApiError> {
	let response = state.service.ingest_calcom(payload).await?;

	Ok(Json(response))
}

async fn webhook_lead(
	State(state): State<AppState>,
	Json(payload): Json<Value>,
) -> Result<Json<WebhookResponse>, ApiError> {
	let response = state.service.ingest_lead(payload).await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error: String,
	details: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error: String,
	details: String,
}
impl ApiError {
	fn new(status: StatusCode, error: impl Into<String>, details: impl Into<String>) -> Self {
		Self { status, error: error.into(), details: details.into() }
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message } =>
				Self::new(StatusCode::BAD_REQUEST, "invalid_request", message),
			ServiceError::InvalidTransition { message } =>
				Self::new(StatusCode::BAD_REQUEST, "invalid_transition", message),
			ServiceError::NotFound { message } =>
				Self::new(StatusCode::NOT_FOUND, "not_found", message),
			// Rate-limit and billing statuses from the model provider pass
			// through with their original code.
			ServiceError::ProviderStatus { status, message } => Self::new(
				StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
				"provider_status",
				message,
			),
			ServiceError::Provider { message } =>
				Self::new(StatusCode::BAD_GATEWAY, "provider_error", message),
			ServiceError::Storage { message } =>
				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", message),
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error: self.error, details: self.details };

		(self.status, Json(body)).into_response()
	}
}
