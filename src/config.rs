use std::time::Duration;

pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";
/// Hosted model the whole prompt and schema are tuned for.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash-preview-05-20:generateContent";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error(
		"Error: {var} environment variable not found.\n\
		Please set it before starting, e.g. `export {var}=\"YOUR_KEY_HERE\"` in your shell profile,\n\
		or `setx {var} \"YOUR_KEY_HERE\"` in a Windows command prompt, then reopen your terminal.",
		var = API_KEY_VAR
	)]
	MissingApiKey,
}

/// Read-only settings, captured once at startup and handed to the client.
#[derive(Clone)]
pub struct Config {
	pub api_key: String,
	pub endpoint: String,
	pub timeout: Duration,
}
impl Config {
	pub fn new(api_key: impl Into<String>) -> Self {
		Self {
			api_key: api_key.into(),
			endpoint: DEFAULT_ENDPOINT.to_owned(),
			timeout: DEFAULT_TIMEOUT,
		}
	}

	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_var(std::env::var(API_KEY_VAR).ok())
	}

	fn from_var(value: Option<String>) -> Result<Self, ConfigError> {
		match value {
			Some(key) if !key.trim().is_empty() => Ok(Self::new(key.trim())),
			_ => Err(ConfigError::MissingApiKey),
		}
	}

	pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
		self.endpoint = endpoint.into();
		self
	}

	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}
}

// keep the key out of logs
impl std::fmt::Debug for Config {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Config")
			.field("api_key", &"<redacted>")
			.field("endpoint", &self.endpoint)
			.field("timeout", &self.timeout)
			.finish()
	}
}
