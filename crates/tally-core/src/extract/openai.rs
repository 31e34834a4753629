//! OpenAI extraction backend
//!
//! Sends the statement document to the chat completions API with a strict
//! JSON schema response format, so every candidate transaction conforms to
//! the wire contract before this process ever sees it. Anything that still
//! fails deserialization is a fatal extraction error for the call.

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::ExtractedTransaction;

use super::{ExtractionBackend, ExtractionOutput};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "gpt-4o";

const SYSTEM_PROMPT: &str = "Extract transactions from the bank statement PDF. \
    Parse each row with date, description, and amount (negative for \
    outflows/spending). Categorize each transaction and provide a confidence \
    score. Extract merchant name for merchant_canonical field.";

pub struct OpenAiExtractor {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl Clone for OpenAiExtractor {
    fn clone(&self) -> Self {
        Self {
            http_client: self.http_client.clone(),
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            api_key: self.api_key.clone(),
        }
    }
}

impl OpenAiExtractor {
    pub fn new(base_url: &str, model: &str, api_key: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Create from environment variables.
    ///
    /// Required: `OPENAI_API_KEY`
    /// Optional: `OPENAI_MODEL` (default: gpt-4o), `OPENAI_BASE_URL`
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").ok()?;
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let base_url =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Some(Self::new(&base_url, &model, &api_key))
    }

    /// The strict response schema for transaction extraction.
    fn extraction_schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "transactions": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "date": {"type": "string", "pattern": "^\\d{4}-\\d{2}-\\d{2}$"},
                            "description": {"type": "string"},
                            "amount": {"type": "number"},
                            "merchant_canonical": {"type": "string"},
                            "category": {
                                "type": "string",
                                "enum": [
                                    "Income",
                                    "Food & Dining",
                                    "Transport & Mobility",
                                    "Bills & Utilities",
                                    "Shopping & Entertainment"
                                ]
                            },
                            "confidence": {"type": "number", "minimum": 0, "maximum": 1}
                        },
                        "required": [
                            "date", "description", "amount",
                            "merchant_canonical", "category", "confidence"
                        ],
                        "additionalProperties": false
                    }
                }
            },
            "required": ["transactions"],
            "additionalProperties": false
        })
    }
}

#[async_trait]
impl ExtractionBackend for OpenAiExtractor {
    async fn extract(&self, filename: &str, data: &[u8]) -> Result<ExtractionOutput> {
        let file_data = base64::engine::general_purpose::STANDARD.encode(data);

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: ChatContent::Text(SYSTEM_PROMPT.to_string()),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: ChatContent::Parts(vec![
                        ContentPart::Text {
                            text: "Please extract all transactions from this bank statement."
                                .to_string(),
                        },
                        ContentPart::File {
                            file: FilePart {
                                filename: filename.to_string(),
                                file_data: format!(
                                    "data:application/pdf;base64,{}",
                                    file_data
                                ),
                            },
                        },
                    ]),
                },
            ],
            response_format: ResponseFormat {
                format_type: "json_schema".to_string(),
                json_schema: JsonSchemaFormat {
                    name: "transaction_extraction".to_string(),
                    strict: true,
                    schema: Self::extraction_schema(),
                },
            },
        };

        let response = self
            .http_client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::InvalidData(format!(
                "extraction API error {}: {}",
                status, body
            )));
        }

        let completion: ChatCompletionResponse = response.json().await?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::InvalidData("no response from extraction API".into()))?;

        let payload: ExtractionPayload = serde_json::from_str(&content)?;
        debug!(
            filename,
            transactions = payload.transactions.len(),
            "Extraction completed"
        );

        Ok(ExtractionOutput {
            document_ref: completion.id,
            transactions: payload.transactions,
        })
    }
}

/// Chat completion request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: ChatContent,
}

/// Chat message content (text or multimodal)
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ChatContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    File { file: FilePart },
}

#[derive(Debug, Serialize)]
struct FilePart {
    filename: String,
    file_data: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
    json_schema: JsonSchemaFormat,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat {
    name: String,
    strict: bool,
    schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    id: String,
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// The schema-constrained payload inside the completion content.
#[derive(Debug, Deserialize)]
struct ExtractionPayload {
    transactions: Vec<ExtractedTransaction>,
}
