use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::env;
use tracing::warn;

use crate::classifier::EmergencyType;
use crate::region::Region;

/// Structured verdict returned by the hosted model.
#[derive(Debug, Clone, Deserialize)]
pub struct SemanticJudgment {
    #[serde(default)]
    pub is_emergency: bool,
    #[serde(default)]
    pub emergency_type: Option<EmergencyType>,
    #[serde(default)]
    pub confidence: f32,
    #[serde(default)]
    pub reasoning: String,
}

impl SemanticJudgment {
    /// The degraded branch for a failed judgment call: not an emergency,
    /// zero confidence. Callers treat this as a valid result, so a model
    /// outage can never abort call handling.
    pub fn failed() -> Self {
        Self {
            is_emergency: false,
            emergency_type: None,
            confidence: 0.0,
            reasoning: "analysis failed".to_string(),
        }
    }
}

pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new() -> Self {
        let api_key = env::var("OPENAI_API_KEY").unwrap_or_default();
        let model = env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4-turbo".to_string());
        if api_key.is_empty() {
            warn!("⚠️ OPENAI_API_KEY not set. Semantic judgments will degrade to non-emergency.");
        }
        Self {
            client: Client::new(),
            api_key,
            model,
        }
    }

    /// Ask the hosted model whether the transcript describes an emergency.
    /// Any failure surfaces as Err; the classifier maps that to the
    /// degraded judgment rather than propagating.
    pub async fn judge_transcript(
        &self,
        transcript: &str,
        region: Region,
    ) -> Result<SemanticJudgment, String> {
        if self.api_key.is_empty() {
            return Err("OPENAI_API_KEY not set".to_string());
        }

        let system_prompt = format!(
            "You are an HVAC emergency detection system for the {region} region.\n\
             \n\
             Analyze the call transcript and determine if this is an emergency situation.\n\
             \n\
             EMERGENCY CRITERIA:\n\
             - Gas leaks or gas smells (ALWAYS emergency)\n\
             - No heat in cold weather (especially with vulnerable people)\n\
             - No AC in extreme heat (especially with vulnerable people, elderly, or children)\n\
             - Water leaks or flooding\n\
             - Carbon monoxide or safety concerns\n\
             \n\
             REGIONAL CONTEXT ({region}):\n\
             - North: no heat is critical in winter\n\
             - South: no AC is critical in summer\n\
             \n\
             Return your analysis in this exact JSON format:\n\
             {{\n\
                 \"is_emergency\": true/false,\n\
                 \"emergency_type\": \"gas\" | \"no_heat\" | \"no_ac\" | \"water\" | \"safety\" | null,\n\
                 \"confidence\": 0.0-1.0,\n\
                 \"reasoning\": \"brief explanation\"\n\
             }}",
            region = region
        );

        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": format!("Transcript: {}", transcript) }
            ],
            "response_format": { "type": "json_object" },
            "temperature": 0.3
        });

        let res = self
            .client
            .post("https://api.openai.com/v1/chat/completions")
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("Judgment request failed: {}", e))?;

        if !res.status().is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(format!("Judgment failed: {}", text));
        }

        let json: Value = res.json().await.map_err(|e| e.to_string())?;

        let text = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or("No content in model response")?;

        // Clean markdown code blocks if any
        let clean_text = text
            .trim()
            .trim_start_matches("```json")
            .trim_start_matches("```")
            .trim_end_matches("```");

        serde_json::from_str(clean_text)
            .map_err(|e| format!("Failed to parse judgment JSON: {} - Text: {}", e, clean_text))
    }
}
