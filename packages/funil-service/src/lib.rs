pub mod commissions;
pub mod goals;
pub mod pipeline;
pub mod scoring;
pub mod team;
pub mod time_serde;
pub mod webhooks;

use std::{future::Future, pin::Pin, sync::Arc};

pub use commissions::{CommissionSummary, SummaryRequest};
use funil_config::{Config, LlmProviderConfig};
use funil_providers::llm;
use funil_storage::db::Db;
pub use goals::{CreateGoalRequest, CreateGoalResponse};
pub use pipeline::{
	CreateProposalRequest, CreateProposalResponse, UpdateStatusRequest, UpdateStatusResponse,
};
pub use scoring::{CoachAdvice, CoachProposalRequest, LeadAssessment, ScoreLeadRequest, ScoreLeadResponse};
pub use team::{CreateMemberRequest, MemberView, UpdateMemberRequest};
pub use webhooks::WebhookResponse;
use serde_json::Value;

pub type ServiceResult<T> = Result<T, ServiceError>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait LlmProvider
where
	Self: Send + Sync,
{
	fn chat<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, funil_providers::Result<String>>;
}

#[derive(Debug)]
pub enum ServiceError {
	InvalidRequest { message: String },
	NotFound { message: String },
	InvalidTransition { message: String },
	Provider { message: String },
	ProviderStatus { status: u16, message: String },
	Storage { message: String },
}

#[derive(Clone)]
pub struct Providers {
	pub llm: Arc<dyn LlmProvider>,
}

pub struct FunilService {
	pub cfg: Config,
	pub db: Db,
	pub providers: Providers,
}

struct DefaultProviders;

impl std::fmt::Display for ServiceError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::InvalidRequest { message } => write!(f, "Invalid request: {message}"),
			Self::NotFound { message } => write!(f, "Not found: {message}"),
			Self::InvalidTransition { message } => write!(f, "Invalid transition: {message}"),
			Self::Provider { message } => write!(f, "Provider error: {message}"),
			Self::ProviderStatus { status, message } => {
				write!(f, "Provider returned status {status}: {message}")
			},
			Self::Storage { message } => write!(f, "Storage error: {message}"),
		}
	}
}

impl std::error::Error for ServiceError {}

impl From<sqlx::Error> for ServiceError {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<funil_storage::Error> for ServiceError {
	fn from(err: funil_storage::Error) -> Self {
		match err {
			funil_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			funil_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			funil_storage::Error::NotFound(message) => Self::NotFound { message },
		}
	}
}

impl From<funil_providers::Error> for ServiceError {
	fn from(err: funil_providers::Error) -> Self {
		match err {
			// Rate-limit and billing statuses travel to the caller unchanged.
			funil_providers::Error::Status { status, body } if status == 429 || status == 402 =>
				Self::ProviderStatus { status, message: body },
			other => Self::Provider { message: other.to_string() },
		}
	}
}

impl LlmProvider for DefaultProviders {
	fn chat<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, funil_providers::Result<String>> {
		Box::pin(llm::chat(cfg, messages))
	}
}

impl Providers {
	pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
		Self { llm }
	}
}

impl Default for Providers {
	fn default() -> Self {
		Self { llm: Arc::new(DefaultProviders) }
	}
}

impl FunilService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self { cfg, db, providers: Providers::default() }
	}

	pub fn with_providers(cfg: Config, db: Db, providers: Providers) -> Self {
		Self { cfg, db, providers }
	}
}
