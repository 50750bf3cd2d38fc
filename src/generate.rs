//! Turns a mood prompt into an [`ArtConfig`] using the Gemini API.
//!
//! The request asks for a JSON response constrained by a schema that mirrors
//! the configuration wire format. Whatever comes back is parsed and validated
//! like any other configuration before it can reach the canvas.

use serde::Deserialize;
use serde_json::{Value, json};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::components::art_canvas::ArtConfig;
use crate::error::GenerateError;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Where and how to reach the generation service.
#[derive(Clone, Debug, PartialEq)]
pub struct ServiceSettings {
	pub api_key: Option<String>,
	pub model: String,
}

impl ServiceSettings {
	/// Reads `LUMINA_API_KEY` and `LUMINA_MODEL` as set at build time.
	pub fn from_env() -> Self {
		Self::from_values(option_env!("LUMINA_API_KEY"), option_env!("LUMINA_MODEL"))
	}

	fn from_values(api_key: Option<&str>, model: Option<&str>) -> Self {
		Self {
			api_key: api_key.map(str::trim).filter(|k| !k.is_empty()).map(String::from),
			model: model
				.map(str::trim)
				.filter(|m| !m.is_empty())
				.unwrap_or(DEFAULT_MODEL)
				.to_string(),
		}
	}

	/// Applies page-level overrides; blank values are ignored.
	pub fn with_overrides(self, api_key: Option<String>, model: Option<String>) -> Self {
		let api_key = api_key
			.filter(|k| !k.trim().is_empty())
			.or(self.api_key);
		let model = model.filter(|m| !m.trim().is_empty()).unwrap_or(self.model);
		Self { api_key, model }
	}

	fn endpoint(&self) -> String {
		format!("{}/{}:generateContent", ENDPOINT, self.model)
	}
}

fn instruction(prompt: &str) -> String {
	format!(
		"Transform this mood or theme into physics-based generative art parameters: \"{prompt}\".\n\
		 Create a unique visual system. Return a logical JSON configuration."
	)
}

fn response_schema() -> Value {
	json!({
		"type": "OBJECT",
		"properties": {
			"particleCount": { "type": "INTEGER", "description": "Number of particles (50-300)" },
			"particleSize": {
				"type": "ARRAY",
				"items": { "type": "NUMBER" },
				"description": "Min and Max size as [min, max]"
			},
			"speed": { "type": "NUMBER", "description": "Base velocity magnitude" },
			"connectionRadius": {
				"type": "NUMBER",
				"description": "Distance at which particles connect with lines (0-200)"
			},
			"colors": {
				"type": "ARRAY",
				"items": { "type": "STRING" },
				"description": "Hex color codes for the theme"
			},
			"background": { "type": "STRING", "description": "Dark hex background color" },
			"gravity": { "type": "NUMBER", "description": "Gravity constant (-0.1 to 0.1)" },
			"friction": { "type": "NUMBER", "description": "Friction (0.9 to 1.0)" },
			"vortexStrength": { "type": "NUMBER", "description": "Pull towards center (0 to 0.5)" },
			"shapeType": {
				"type": "STRING",
				"enum": ["circle", "square", "line"],
				"description": "The visual primitive"
			}
		},
		"required": [
			"particleCount", "particleSize", "speed", "connectionRadius", "colors",
			"background", "gravity", "friction", "vortexStrength", "shapeType"
		]
	})
}

/// Request body for `generateContent`.
pub fn request_body(prompt: &str) -> Value {
	json!({
		"contents": [{ "parts": [{ "text": instruction(prompt) }] }],
		"generationConfig": {
			"responseMimeType": "application/json",
			"responseSchema": response_schema()
		}
	})
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
	#[serde(default)]
	candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
	content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
	#[serde(default)]
	parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
	text: Option<String>,
}

/// Removes a Markdown code fence around the payload, if present.
fn strip_fence(text: &str) -> &str {
	let trimmed = text.trim();
	let Some(rest) = trimmed.strip_prefix("```") else {
		return trimmed;
	};
	let rest = rest.strip_prefix("json").unwrap_or(rest);
	rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Extracts and validates the configuration from a `generateContent` response.
pub fn parse_response(body: &str) -> Result<ArtConfig, GenerateError> {
	let response: GenerateResponse = serde_json::from_str(body).map_err(GenerateError::Decode)?;
	let text: String = response
		.candidates
		.into_iter()
		.next()
		.and_then(|c| c.content)
		.map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
		.unwrap_or_default();

	let payload = strip_fence(&text);
	if payload.is_empty() {
		return Err(GenerateError::EmptyResponse);
	}
	Ok(ArtConfig::from_json(payload)?)
}

fn js_error(value: JsValue) -> GenerateError {
	GenerateError::Request(
		value
			.as_string()
			.unwrap_or_else(|| format!("{:?}", value)),
	)
}

/// Asks the service for a configuration matching `prompt`.
pub async fn generate_art_config(
	settings: &ServiceSettings,
	prompt: &str,
) -> Result<ArtConfig, GenerateError> {
	let prompt = prompt.trim();
	if prompt.is_empty() {
		return Err(GenerateError::EmptyPrompt);
	}
	let api_key = settings.api_key.as_deref().ok_or(GenerateError::MissingApiKey)?;

	let init = RequestInit::new();
	init.set_method("POST");
	init.set_mode(RequestMode::Cors);
	init.set_body(&JsValue::from_str(&request_body(prompt).to_string()));

	let request = Request::new_with_str_and_init(&settings.endpoint(), &init).map_err(js_error)?;
	let headers = request.headers();
	headers.set("Content-Type", "application/json").map_err(js_error)?;
	headers.set("x-goog-api-key", api_key).map_err(js_error)?;

	let window = web_sys::window().ok_or_else(|| GenerateError::Request("no window".into()))?;
	let response: Response = JsFuture::from(window.fetch_with_request(&request))
		.await
		.map_err(js_error)?
		.dyn_into()
		.map_err(js_error)?;
	if !response.ok() {
		return Err(GenerateError::Status(response.status()));
	}

	let body = JsFuture::from(response.text().map_err(js_error)?)
		.await
		.map_err(js_error)?
		.as_string()
		.ok_or(GenerateError::EmptyResponse)?;
	parse_response(&body)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::art_canvas::ShapeType;
	use crate::error::ConfigError;

	const PAYLOAD: &str = r##"{"particleCount":120,"particleSize":[1,2.5],"speed":1,"connectionRadius":80,"colors":["#112233","#abcdef"],"background":"#000","gravity":0.05,"friction":0.95,"vortexStrength":0.2,"shapeType":"line"}"##;

	fn envelope(text: &str) -> String {
		json!({
			"candidates": [{ "content": { "parts": [{ "text": text }], "role": "model" } }]
		})
		.to_string()
	}

	#[test]
	fn body_carries_prompt_and_schema() {
		let body = request_body("rainy Tokyo night");
		let text = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
		assert!(text.contains("\"rainy Tokyo night\""));

		let gen_config = &body["generationConfig"];
		assert_eq!(gen_config["responseMimeType"], "application/json");
		let required = gen_config["responseSchema"]["required"].as_array().unwrap();
		assert_eq!(required.len(), 10);
		assert_eq!(
			gen_config["responseSchema"]["properties"]["shapeType"]["enum"],
			json!(["circle", "square", "line"])
		);
	}

	#[test]
	fn parses_candidate_text() {
		let config = parse_response(&envelope(PAYLOAD)).unwrap();
		assert_eq!(config.particle_count, 120);
		assert_eq!(config.shape_type, ShapeType::Line);
		assert_eq!(config.colors.len(), 2);
	}

	#[test]
	fn tolerates_fenced_json() {
		let fenced = format!("```json\n{PAYLOAD}\n```");
		assert!(parse_response(&envelope(&fenced)).is_ok());
	}

	#[test]
	fn empty_candidates_are_reported() {
		let err = parse_response(r#"{"candidates": []}"#).unwrap_err();
		assert!(matches!(err, GenerateError::EmptyResponse));

		let err = parse_response(&envelope("   ")).unwrap_err();
		assert!(matches!(err, GenerateError::EmptyResponse));
	}

	#[test]
	fn malformed_envelope_is_a_decode_error() {
		let err = parse_response("not json").unwrap_err();
		assert!(matches!(err, GenerateError::Decode(_)));
	}

	#[test]
	fn invalid_payload_is_rejected() {
		let err = parse_response(&envelope(r#"{"particleCount": 10}"#)).unwrap_err();
		assert!(matches!(err, GenerateError::Invalid(ConfigError::Parse(_))));

		let bad = PAYLOAD.replace("\"friction\":0.95", "\"friction\":0");
		let err = parse_response(&envelope(&bad)).unwrap_err();
		assert!(matches!(
			err,
			GenerateError::Invalid(ConfigError::InvalidFriction(_))
		));
	}

	#[test]
	fn settings_prefer_overrides_and_ignore_blanks() {
		let base = ServiceSettings::from_values(Some("build-key"), None);
		assert_eq!(base.model, DEFAULT_MODEL);
		assert_eq!(base.api_key.as_deref(), Some("build-key"));

		let merged = base
			.clone()
			.with_overrides(Some("page-key".into()), Some("  ".into()));
		assert_eq!(merged.api_key.as_deref(), Some("page-key"));
		assert_eq!(merged.model, DEFAULT_MODEL);

		let blank = ServiceSettings::from_values(Some(" "), Some("gemini-2.5-flash"));
		assert_eq!(blank.api_key, None);
		assert!(blank.endpoint().ends_with("/gemini-2.5-flash:generateContent"));
	}
}
