use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Author of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// End user, including tool results fed back to the model
    User,
    /// Model output replayed as history
    #[serde(alias = "model")]
    Assistant,
    /// System instruction turn
    System,
}

impl Role {
    /// Vendor role name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}

/// One turn of a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// Who produced the turn
    pub role: Role,
    /// Ordered content parts
    pub parts: Vec<Part>,
}

impl Turn {
    /// Create a turn from parts
    pub const fn new(role: Role, parts: Vec<Part>) -> Self {
        Self { role, parts }
    }

    /// A user turn holding a single text part
    pub fn user_text(text: impl Into<String>) -> Self {
        Self::new(Role::User, vec![Part::text(text)])
    }

    /// An assistant turn holding a single text part
    pub fn assistant_text(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, vec![Part::text(text)])
    }

    /// Whether any part is a function result
    pub fn has_function_response(&self) -> bool {
        self.parts.iter().any(|p| matches!(p, Part::FunctionResponse { .. }))
    }
}

/// Video sampling hints attached to media parts
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    /// Frames per second to sample
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<f64>,
}

/// Smallest unit of multimodal conversation content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Part {
    /// Text, optionally marked as model reasoning
    Text {
        /// The text string
        text: String,
        /// Reasoning output rather than answer text
        #[serde(default)]
        thought: bool,
    },
    /// Raw bytes sent inline
    InlineData {
        /// MIME type of the bytes
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
        /// Payload bytes
        data: Vec<u8>,
        /// Sampling hints for video payloads
        #[serde(default, skip_serializing_if = "Option::is_none")]
        video_metadata: Option<VideoMetadata>,
    },
    /// Reference to a file hosted elsewhere or uploaded to the vendor
    FileData {
        /// MIME type of the referenced file
        mime_type: String,
        /// External URL or `file_id://<id>` for vendor-hosted files
        file_uri: String,
        /// Sampling hints for video files
        #[serde(default, skip_serializing_if = "Option::is_none")]
        video_metadata: Option<VideoMetadata>,
    },
    /// Tool invocation requested by the model
    FunctionCall {
        /// Call identifier used to match the result
        id: String,
        /// Function name
        name: String,
        /// Arguments object
        args: Value,
    },
    /// Result of a tool invocation
    FunctionResponse {
        /// Identifier of the call this answers
        id: String,
        /// Function name
        name: String,
        /// Result payload
        response: Value,
    },
}

impl Part {
    /// Plain answer text
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            thought: false,
        }
    }

    /// Reasoning text
    pub fn thought(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            thought: true,
        }
    }

    /// Inline bytes with a MIME type
    pub fn inline(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self::InlineData {
            mime_type: Some(mime_type.into()),
            data,
            video_metadata: None,
        }
    }

    /// File reference with a MIME type
    pub fn file(mime_type: impl Into<String>, file_uri: impl Into<String>) -> Self {
        Self::FileData {
            mime_type: mime_type.into(),
            file_uri: file_uri.into(),
            video_metadata: None,
        }
    }

    /// Function call requested by the model
    pub fn function_call(id: impl Into<String>, name: impl Into<String>, args: Value) -> Self {
        Self::FunctionCall {
            id: id.into(),
            name: name.into(),
            args,
        }
    }

    /// Function result returned to the model
    pub fn function_response(id: impl Into<String>, name: impl Into<String>, response: Value) -> Self {
        Self::FunctionResponse {
            id: id.into(),
            name: name.into(),
            response,
        }
    }

    /// Attach video sampling hints to a media part
    #[must_use]
    pub fn with_video_metadata(mut self, metadata: VideoMetadata) -> Self {
        match &mut self {
            Self::InlineData { video_metadata, .. } | Self::FileData { video_metadata, .. } => {
                *video_metadata = Some(metadata);
            }
            Self::Text { .. } | Self::FunctionCall { .. } | Self::FunctionResponse { .. } => {}
        }
        self
    }

    /// Text content if this is a text part
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Whether this part is reasoning text
    pub const fn is_thought(&self) -> bool {
        matches!(self, Self::Text { thought: true, .. })
    }
}
