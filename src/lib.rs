use serde::Deserialize;

pub mod blocking;
pub mod config;
pub mod gemini;
pub mod render;
pub mod repl;

pub use blocking::Client;
pub use config::{Config, ConfigError};
pub use gemini::BrainstormError;

/// A concept the user wants brainstormed. Only constructible from non-blank input; the text is stored trimmed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BrainstormRequest {
	concept: String,
}
impl BrainstormRequest {
	pub fn new<T: AsRef<str>>(concept: T) -> Option<Self> {
		let concept = concept.as_ref().trim();
		match concept.is_empty() {
			true => None,
			false => Some(Self { concept: concept.to_owned() }),
		}
	}

	pub fn concept(&self) -> &str {
		&self.concept
	}
}

/// What the model sent back, in the order it sent it.
///
/// Parsing is lenient: the schema marks everything required, but the model does not always comply.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, derive_new::new)]
pub struct BrainstormResult {
	#[serde(default)]
	pub idea: Option<String>,
	#[serde(default)]
	pub angles: Vec<Angle>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, derive_new::new)]
pub struct Angle {
	#[serde(default = "unknown_category")]
	pub category: String,
	#[serde(default)]
	pub points: Vec<String>,
}

fn unknown_category() -> String {
	"Unknown Category".to_owned()
}

/// Anything that can turn a concept into a result. The interaction loop only talks to this.
pub trait Brainstorm {
	fn brainstorm(&mut self, request: &BrainstormRequest) -> Result<BrainstormResult, BrainstormError>;
}
