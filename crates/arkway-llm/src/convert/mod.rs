//! Bidirectional conversion between canonical types and the Responses API
//! wire format
//!
//! Outbound conversions (`content`, `tool`, `schema`) never fail: shapes the
//! vendor cannot express are logged and dropped. Inbound conversions
//! (`response`, `stream`) skip unknown items.

pub mod content;
pub mod response;
pub mod schema;
pub mod stream;
pub mod tool;

pub use content::{output_item_to_part, part_to_input_content, safe_json_serialize, turn_to_input_items};
pub use response::decode_response;
pub use schema::schema_to_text_config;
pub use stream::{decode_event, decode_stream};
pub use tool::{declaration_to_tool, declarations_to_tools, normalize_schema};
