use eyre::Result;

use crate::{Brainstorm, BrainstormError, BrainstormRequest, BrainstormResult, Config, gemini::GeminiClient};

/// Synchronous face of [GeminiClient]: one request at a time, each blocking until it resolves.
pub struct Client {
	inner: GeminiClient,
	runtime: tokio::runtime::Runtime,
}
impl Client {
	pub fn new(config: Config) -> Result<Self> {
		let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
		Ok(Self {
			inner: GeminiClient::new(config)?,
			runtime,
		})
	}

	pub fn ask(&self, request: &BrainstormRequest) -> Result<BrainstormResult, BrainstormError> {
		self.runtime.block_on(self.inner.ask(request))
	}
}

impl Brainstorm for Client {
	fn brainstorm(&mut self, request: &BrainstormRequest) -> Result<BrainstormResult, BrainstormError> {
		self.ask(request)
	}
}
