pub const FALLBACK_ORIGIN: &str = "outro";

/// Normalizes a raw lead origin against the configured allow-list. Anything
/// missing, blank, or unrecognized maps to `outro`.
pub fn normalize_origin(raw: Option<&str>, known: &[String]) -> String {
	let Some(raw) = raw else {
		return FALLBACK_ORIGIN.to_string();
	};
	let candidate = raw.trim().to_lowercase();

	if candidate.is_empty() {
		return FALLBACK_ORIGIN.to_string();
	}

	if known.iter().any(|origin| origin == &candidate) {
		candidate
	} else {
		FALLBACK_ORIGIN.to_string()
	}
}
