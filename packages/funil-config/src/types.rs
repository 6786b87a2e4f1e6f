use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub commissions: Commissions,
	pub webhooks: Webhooks,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub llm: LlmProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	pub default_headers: Map<String, Value>,
}

/// Commission rates applied when a team member row carries no explicit
/// percentage.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Commissions {
	pub default_mrr_percent: f64,
	pub default_projeto_percent: f64,
}
impl Default for Commissions {
	fn default() -> Self {
		Self { default_mrr_percent: 1.0, default_projeto_percent: 0.5 }
	}
}

#[derive(Debug, Deserialize)]
pub struct Webhooks {
	/// Lead origins accepted as-is; anything else is normalized to `outro`.
	pub known_origins: Vec<String>,
}
