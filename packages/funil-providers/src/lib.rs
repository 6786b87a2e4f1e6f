pub mod llm;

mod error;

pub use error::{Error, Result};

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName};
use serde_json::{Map, Value};

pub fn auth_headers(api_key: &str, default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	headers.insert(
		AUTHORIZATION,
		format!("Bearer {api_key}")
			.parse()
			.map_err(|_| Error::InvalidHeader { name: "authorization".to_string() })?,
	);

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidHeader { name: key.clone() });
		};
		let name = HeaderName::from_bytes(key.as_bytes())
			.map_err(|_| Error::InvalidHeader { name: key.clone() })?;

		headers.insert(name, raw.parse().map_err(|_| Error::InvalidHeader { name: key.clone() })?);
	}

	Ok(headers)
}
