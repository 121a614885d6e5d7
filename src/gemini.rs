use eyre::Result;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{BrainstormRequest, BrainstormResult, Config};

/// Categories the model is asked to cover, in the order they should come back.
pub const CATEGORIES: [&str; 5] = [
	"Target Users/Audience",
	"Core Problem Solved",
	"Potential Business Models/Monetization",
	"Key Technologies/Features",
	"Ethical/Societal Considerations",
];

/// Content filters sent with every request. All four are fully open.
pub const SAFETY_SETTINGS: [(&str, &str); 4] = [
	("HARM_CATEGORY_HARASSMENT", "BLOCK_NONE"),
	("HARM_CATEGORY_HATE_SPEECH", "BLOCK_NONE"),
	("HARM_CATEGORY_SEXUALLY_EXPLICIT", "BLOCK_NONE"),
	("HARM_CATEGORY_DANGEROUS_CONTENT", "BLOCK_NONE"),
];

#[derive(Debug, thiserror::Error)]
pub enum BrainstormError {
	#[error("HTTP Error: {status} - {body}")]
	Status { status: u16, body: String },
	#[error("Connection Error: {0}")]
	Connection(String),
	#[error("Timeout Error: {0}")]
	Timeout(String),
	#[error("Request Error: {0}")]
	Request(String),
	#[error("LLM blocked prompt due to: {reason}{}", rating_lines(.ratings))]
	Blocked { reason: String, ratings: Vec<SafetyRating> },
	#[error("Error: Unexpected or empty LLM response format.\n{envelope}")]
	UnexpectedEnvelope { envelope: String },
	#[error("Error: Could not parse the API response body as JSON. Error: {error}\nRaw response body:\n{raw}")]
	MalformedEnvelope { error: String, raw: String },
	#[error("JSON Decode Error: Could not parse LLM's JSON response. Error: {error}\nRaw LLM response string (might be incomplete/invalid JSON):\n{raw}")]
	InnerJson { error: String, raw: String },
}
impl From<reqwest::Error> for BrainstormError {
	fn from(e: reqwest::Error) -> Self {
		let description = describe(&e);
		if e.is_timeout() {
			Self::Timeout(description)
		} else if e.is_connect() {
			Self::Connection(description)
		} else {
			Self::Request(description)
		}
	}
}

/// reqwest hides the interesting part (dns, refused, tls) in the source chain.
fn describe(e: &(dyn std::error::Error + 'static)) -> String {
	let mut description = e.to_string();
	let mut source = e.source();
	while let Some(cause) = source {
		description.push_str(&format!(": {cause}"));
		source = cause.source();
	}
	description
}

fn rating_lines(ratings: &[SafetyRating]) -> String {
	ratings.iter().map(|r| format!("\n  {r}")).collect()
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, derive_more::Display)]
#[display("{category}: {probability}")]
pub struct SafetyRating {
	#[serde(default)]
	pub category: String,
	#[serde(default)]
	pub probability: String,
}

pub fn prompt(concept: &str) -> String {
	let categories = CATEGORIES.iter().map(|c| format!("- {c}")).collect::<Vec<_>>().join("\n");
	format!(
		"You are an expert startup ideator and business strategist.\n\
		Your task is to take the user's vague concept and generate {n} distinct, structured brainstorming angles.\n\
		For each angle, provide 3-5 specific, actionable points.\n\
		The angles should cover the following categories:\n\
		{categories}\n\
		\n\
		Concept to brainstorm: \"{concept}\"\n",
		n = CATEGORIES.len(),
	)
}

/// Shape the model is constrained to. Uses Gemini's OpenAPI-subset type names.
pub fn response_schema() -> Value {
	json!({
		"type": "OBJECT",
		"properties": {
			"idea": { "type": "STRING", "description": "The original concept provided by the user" },
			"angles": {
				"type": "ARRAY",
				"description": "A list of distinct brainstorming angles for the concept",
				"items": {
					"type": "OBJECT",
					"properties": {
						"category": { "type": "STRING", "description": "The name of the brainstorming category (e.g., Target Users, Business Models)" },
						"points": {
							"type": "ARRAY",
							"description": "3-5 specific bullet points for this category",
							"items": { "type": "STRING" }
						}
					},
					"required": ["category", "points"]
				}
			}
		},
		"required": ["idea", "angles"]
	})
}

///docs: https://ai.google.dev/api/generate-content#method:-models.generatecontent
pub fn payload(request: &BrainstormRequest) -> Value {
	let safety_settings = SAFETY_SETTINGS
		.iter()
		.map(|(category, threshold)| json!({ "category": category, "threshold": threshold }))
		.collect::<Vec<_>>();

	json!({
		"contents": [{ "parts": [{ "text": prompt(request.concept()) }] }],
		"generationConfig": {
			"responseMimeType": "application/json",
			"responseSchema": response_schema(),
		},
		"safetySettings": safety_settings,
	})
}

// Envelope {{{
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
	candidates: Option<Vec<Candidate>>,
	prompt_feedback: Option<PromptFeedback>,
}
impl Envelope {
	fn answer_text(&self) -> Option<&str> {
		let candidate = self.candidates.as_ref()?.first()?;
		let part = candidate.content.as_ref()?.parts.as_ref()?.first()?;
		part.text.as_deref().filter(|text| !text.is_empty())
	}

	fn block(self) -> Option<(String, Vec<SafetyRating>)> {
		if let Some(PromptFeedback { block_reason: Some(reason), safety_ratings }) = self.prompt_feedback {
			return Some((reason, safety_ratings.unwrap_or_default()));
		}
		let candidate = self.candidates?.into_iter().next()?;
		match candidate.finish_reason.as_deref() {
			Some(reason @ ("SAFETY" | "PROHIBITED_CONTENT" | "BLOCKLIST")) => Some((reason.to_owned(), candidate.safety_ratings.unwrap_or_default())),
			_ => None,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
	content: Option<Content>,
	finish_reason: Option<String>,
	safety_ratings: Option<Vec<SafetyRating>>,
}

#[derive(Debug, Deserialize)]
struct Content {
	parts: Option<Vec<Part>>,
}

#[derive(Debug, Deserialize)]
struct Part {
	text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
	block_reason: Option<String>,
	safety_ratings: Option<Vec<SafetyRating>>,
}

/// Unwraps a successful `generateContent` body. The answer is JSON text inside a JSON string field, so it is decoded twice.
pub fn decode_envelope(body: &str) -> Result<BrainstormResult, BrainstormError> {
	let value = serde_json::from_str::<Value>(body).map_err(|e| BrainstormError::MalformedEnvelope {
		error: e.to_string(),
		raw: body.to_owned(),
	})?;
	tracing::debug!(?value);
	// a wrongly-typed field is as good as a missing one here
	let envelope = serde_json::from_value::<Envelope>(value.clone()).unwrap_or_default();

	let Some(text) = envelope.answer_text() else {
		return Err(match envelope.block() {
			Some((reason, ratings)) => BrainstormError::Blocked { reason, ratings },
			None => BrainstormError::UnexpectedEnvelope {
				envelope: serde_json::to_string_pretty(&value).unwrap_or_else(|_| body.to_owned()),
			},
		});
	};

	let inner_json = |error: String| BrainstormError::InnerJson { error, raw: text.to_owned() };
	let answer = serde_json::from_str::<Value>(text).map_err(|e| inner_json(e.to_string()))?;
	// serde's struct visitor would also take a sequence
	match answer.as_object() {
		Some(fields) if !fields.is_empty() => {}
		_ => return Err(inner_json("expected a non-empty JSON object".to_owned())),
	}
	serde_json::from_value::<BrainstormResult>(answer).map_err(|e| inner_json(e.to_string()))
}
//,}}}

#[derive(Debug)]
pub struct GeminiClient {
	http: reqwest::Client,
	endpoint: String,
}
impl GeminiClient {
	pub fn new(config: Config) -> Result<Self> {
		// Header {{{
		let mut headers = HeaderMap::new();
		let mut api_key = HeaderValue::from_str(&config.api_key)?;
		api_key.set_sensitive(true);
		headers.insert("x-goog-api-key", api_key);
		headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		//,}}}

		let http = reqwest::Client::builder().default_headers(headers).timeout(config.timeout).build()?;
		Ok(Self { http, endpoint: config.endpoint })
	}

	pub async fn ask(&self, request: &BrainstormRequest) -> Result<BrainstormResult, BrainstormError> {
		let payload = payload(request);
		tracing::info!(concept = request.concept(), "asking gemini");
		tracing::debug!(?payload);

		let result = self.send(&payload).await;
		if let Err(e) = &result {
			tracing::warn!(error = %e, "brainstorm request failed");
		}
		result
	}

	async fn send(&self, payload: &Value) -> Result<BrainstormResult, BrainstormError> {
		let response = self.http.post(&self.endpoint).json(payload).send().await?;
		let status = response.status();
		let body = response.text().await?;
		if !status.is_success() {
			return Err(BrainstormError::Status { status: status.as_u16(), body });
		}
		decode_envelope(&body)
	}
}
