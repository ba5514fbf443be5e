//! Canonical types for LLM request/response representation
//!
//! These mirror the agent runtime's vendor-neutral model of a call and are
//! converted to and from the Responses API wire format in [`crate::convert`].

pub mod content;
pub mod request;
pub mod response;
pub mod schema;
pub mod tool;

pub use content::{Part, Role, Turn, VideoMetadata};
pub use request::{GenerationParams, LlmRequest};
pub use response::{FinishReason, LlmResponse, UsageMetadata};
pub use schema::{NamedSchema, SchemaSource};
pub use tool::{FunctionDeclaration, Schema, SchemaType};
