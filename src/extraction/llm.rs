//! Ollama-backed structured extraction client (§4.I).
//!
//! Grounded in `original_source/api/services/llm.py` and `api/services/ollama.py`.
//! Ollama autostart/process-management is out of scope; this client assumes
//! an already-running endpoint.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::AppError;
use crate::support::{json_salvage, retry::retry_async};

const EXTRACTION_PROMPT_TEMPLATE: &str = r#"You are extracting structured information from a job description.
Return ONLY valid JSON with these fields:
{
  "primary_function": "TPM|PM|Platform|SRE|AI/ML|Other",
  "yoe_required": {"min": int, "max": int} | null,
  "work_mode": "remote|hybrid|onsite|unclear",
  "location": string,
  "relevance_score": number,
  "key_requirements": [string, ...]
}

Rules:
- relevance_score is 0.0 to 1.0 for Principal TPM targeting AI/Platform roles.
- If YOE not specified, return null.
- If location not specified, return "Unknown".
- Use "unclear" for work_mode if not explicit.

Job Description:
{job_description}"#;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ExtractedInfo {
    pub primary_function: String,
    pub yoe_min: Option<i32>,
    pub yoe_max: Option<i32>,
    pub work_mode: String,
    pub location: String,
    pub relevance_score: f64,
    pub key_requirements: Vec<String>,
}

impl Default for ExtractedInfo {
    fn default() -> Self {
        Self {
            primary_function: "Other".to_string(),
            yoe_min: None,
            yoe_max: None,
            work_mode: "unclear".to_string(),
            location: "Unknown".to_string(),
            relevance_score: 0.0,
            key_requirements: Vec::new(),
        }
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Thin client over Ollama's `/api/generate` endpoint.
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: String, model: String) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build LLM HTTP client: {e}")))?;
        Ok(Self { client, base_url, model })
    }

    async fn generate(&self, prompt: &str) -> Result<String, AppError> {
        let payload = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "format": "json",
        });

        let response: GenerateResponse = retry_async(
            || async {
                let resp = self
                    .client
                    .post(format!("{}/api/generate", self.base_url))
                    .json(&payload)
                    .send()
                    .await?
                    .error_for_status()?;
                Ok::<_, AppError>(resp.json::<GenerateResponse>().await?)
            },
            AppError::is_retryable_scrape,
            3,
            Duration::from_millis(500),
        )
        .await?;

        Ok(response.response)
    }

    /// Extract structured fields from a job description. Any parse failure
    /// of the model's response falls back to a neutral [`ExtractedInfo`]
    /// rather than failing the job entirely.
    pub async fn extract_job_info(&self, job_description: &str) -> Result<ExtractedInfo, AppError> {
        let prompt = EXTRACTION_PROMPT_TEMPLATE.replace("{job_description}", job_description);
        let raw = self.generate(&prompt).await?;

        let Some(parsed) = json_salvage::parse(&raw) else {
            tracing::warn!(model = %self.model, raw_len = raw.len(), "llm_extract_failed");
            return Ok(ExtractedInfo::default());
        };

        let primary_function = parsed
            .get("primary_function")
            .and_then(|v| v.as_str())
            .unwrap_or("Other")
            .to_string();
        let (yoe_min, yoe_max) = parsed
            .get("yoe_required")
            .filter(|v| !v.is_null())
            .map(|yoe| {
                (
                    yoe.get("min").and_then(|v| v.as_i64()).map(|n| n as i32),
                    yoe.get("max").and_then(|v| v.as_i64()).map(|n| n as i32),
                )
            })
            .unwrap_or((None, None));
        let work_mode = parsed
            .get("work_mode")
            .and_then(|v| v.as_str())
            .unwrap_or("unclear")
            .to_string();
        let location = parsed
            .get("location")
            .and_then(|v| v.as_str())
            .unwrap_or("Unknown")
            .to_string();
        let relevance_score = parsed.get("relevance_score").and_then(|v| v.as_f64()).unwrap_or(0.0);
        let key_requirements = parsed
            .get("key_requirements")
            .and_then(|v| v.as_array())
            .map(|arr| arr.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
            .unwrap_or_default();

        Ok(ExtractedInfo {
            primary_function,
            yoe_min,
            yoe_max,
            work_mode,
            location,
            relevance_score,
            key_requirements,
        })
    }

    pub async fn estimate_salary(
        &self,
        title: &str,
        company: &str,
        description: &str,
    ) -> Result<Option<super::SalaryEstimate>, AppError> {
        super::salary::estimate_salary_with_llm(self, title, company, description).await
    }

    pub(crate) async fn generate_raw(&self, prompt: &str) -> Result<String, AppError> {
        self.generate(prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_extracted_info_matches_llm_failure_fallback() {
        let fallback = ExtractedInfo::default();
        assert_eq!(fallback.primary_function, "Other");
        assert_eq!(fallback.work_mode, "unclear");
        assert_eq!(fallback.location, "Unknown");
        assert_eq!(fallback.relevance_score, 0.0);
        assert!(fallback.key_requirements.is_empty());
    }
}
