//! Adapter executing canonical LLM requests against the Ark Responses API
//!
//! A request flows through four stages:
//!
//! - [`assemble`] turns an [`LlmRequest`] into a raw payload
//! - [`policy`] rewrites the payload to satisfy the vendor's feature constraints
//! - a [`ResponsesTransport`] sends it, either awaiting one response or streaming events
//! - [`convert`] decodes the result into [`LlmResponse`]s
//!
//! [`ResponsesModel`] ties the stages together.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod assemble;
pub mod convert;
pub mod error;
pub mod model;
pub mod policy;
pub mod protocol;
pub mod transport;
pub mod types;

pub use error::LlmError;
pub use model::{ResponseStream, ResponsesModel};
pub use protocol::responses::Payload;
pub use transport::{EventStream, HttpTransport, ResponsesTransport};
pub use types::{
    FinishReason, FunctionDeclaration, GenerationParams, LlmRequest, LlmResponse, NamedSchema, Part, Role, Schema,
    SchemaSource, SchemaType, Turn, UsageMetadata, VideoMetadata,
};
