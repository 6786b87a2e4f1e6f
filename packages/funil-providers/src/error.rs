pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Request(#[from] reqwest::Error),
	#[error("Provider returned HTTP {status}.")]
	Status { status: u16, body: String },
	#[error("Invalid provider header {name:?}.")]
	InvalidHeader { name: String },
	#[error("Provider response is missing chat content.")]
	MissingContent,
}
