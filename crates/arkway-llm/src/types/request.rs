use serde::{Deserialize, Serialize};

use super::content::Turn;
use super::schema::SchemaSource;
use super::tool::FunctionDeclaration;

/// Parameters controlling text generation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Nucleus sampling threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

/// Canonical, vendor-neutral LLM request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LlmRequest {
    /// Model override; the adapter's configured model is used when absent
    pub model: Option<String>,
    /// System prompt
    pub system_instruction: Option<String>,
    /// Conversation history, oldest first
    pub contents: Vec<Turn>,
    /// Functions the model may call
    pub tools: Vec<FunctionDeclaration>,
    /// Schema the model output must validate against
    pub response_schema: Option<SchemaSource>,
    /// Generation parameters
    pub params: GenerationParams,
    /// Id of the previous response in a server-side conversation
    pub previous_response_id: Option<String>,
}

impl LlmRequest {
    /// Request over the given conversation
    pub fn new(contents: Vec<Turn>) -> Self {
        Self {
            contents,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    #[must_use]
    pub fn with_tools(mut self, tools: Vec<FunctionDeclaration>) -> Self {
        self.tools = tools;
        self
    }

    #[must_use]
    pub fn with_response_schema(mut self, schema: impl Into<SchemaSource>) -> Self {
        self.response_schema = Some(schema.into());
        self
    }

    #[must_use]
    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    #[must_use]
    pub fn with_previous_response_id(mut self, id: impl Into<String>) -> Self {
        self.previous_response_id = Some(id.into());
        self
    }
}
