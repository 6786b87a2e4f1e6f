use std::time::Duration;

use regex::Regex;
use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

/// Sends a chat-completion request and returns the content of the first
/// choice. Non-success statuses are surfaced with their code so callers can
/// pass rate-limit (429) and billing (402) responses through verbatim.
pub async fn chat(cfg: &funil_config::LlmProviderConfig, messages: &[Value]) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"messages": messages,
	});
	let res = client
		.post(&url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let status = res.status();

	if !status.is_success() {
		let body = res.text().await.unwrap_or_default();

		return Err(Error::Status { status: status.as_u16(), body });
	}

	let json: Value = res.json().await?;

	json.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.map(str::to_string)
		.ok_or(Error::MissingContent)
}

/// Best-effort extraction of the first `{...}` block in model output. Models
/// often wrap the object in prose or code fences; callers substitute their
/// own fallback payload when nothing parses.
pub fn extract_json_object(content: &str) -> Option<Value> {
	let re = Regex::new(r"(?s)\{.*\}").ok()?;
	let candidate = re.find(content)?.as_str();

	serde_json::from_str(candidate).ok()
}
