//! Conversion between canonical content parts and Responses API items

use std::fmt::Debug;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use serde_json::Value;

use crate::protocol::responses::{InputContent, InputItem, OutputContent, OutputItem};
use crate::types::{Part, Role, Turn, VideoMetadata};

/// URI prefix marking a file already uploaded to the vendor
pub const FILE_ID_SCHEME: &str = "file_id://";

const DEFAULT_MIME_TYPE: &str = "application/octet-stream";
const DEFAULT_VIDEO_FPS: f64 = 1.0;
const IMAGE_DETAIL: &str = "auto";

/// Media class selected by MIME prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MediaKind {
    Image,
    Video,
    File,
}

impl MediaKind {
    fn classify(mime_type: &str) -> Self {
        if mime_type.starts_with("image/") {
            Self::Image
        } else if mime_type.starts_with("video/") {
            Self::Video
        } else {
            Self::File
        }
    }
}

// -- Outbound: canonical turn -> input items --

/// Convert one turn into input items
///
/// A turn carrying function results is sent as the bare
/// `function_call_output` items; any other parts in it are dropped because
/// tool messages cannot be mixed with other content.
pub fn turn_to_input_items(turn: &Turn) -> Vec<InputItem> {
    if turn.has_function_response() {
        return turn
            .parts
            .iter()
            .filter_map(|part| match part {
                Part::FunctionResponse { id, response, .. } => Some(InputItem::FunctionCallOutput {
                    call_id: id.clone(),
                    output: safe_json_serialize(response),
                }),
                _ => None,
            })
            .collect();
    }

    match turn.role {
        Role::Assistant => assistant_items(&turn.parts),
        Role::User | Role::System => message_item(turn.role, &turn.parts).into_iter().collect(),
    }
}

/// Assistant history: calls in part order, content collected into one message
/// placed where the first content part appeared
fn assistant_items(parts: &[Part]) -> Vec<InputItem> {
    let mut items = Vec::new();
    let mut message = message_item(Role::Assistant, parts);

    for part in parts {
        match part {
            Part::FunctionCall { id, name, args } => items.push(InputItem::FunctionCall {
                call_id: id.clone(),
                name: name.clone(),
                arguments: safe_json_serialize(args),
            }),
            _ if part_to_input_content(part).is_some() => {
                if let Some(message) = message.take() {
                    items.push(message);
                }
            }
            _ => {}
        }
    }

    items
}

fn message_item(role: Role, parts: &[Part]) -> Option<InputItem> {
    let content: Vec<InputContent> = parts.iter().filter_map(part_to_input_content).collect();

    if content.is_empty() {
        return None;
    }

    Some(InputItem::Message {
        role: role.as_str().to_owned(),
        content,
    })
}

/// Convert a content part into message content
///
/// Function calls and results are items in their own right and yield
/// `None`, as do empty text, empty inline data and reasoning text.
pub fn part_to_input_content(part: &Part) -> Option<InputContent> {
    match part {
        Part::Text { text, thought } => (!thought && !text.is_empty()).then(|| InputContent::InputText { text: text.clone() }),
        Part::InlineData {
            mime_type,
            data,
            video_metadata,
        } => (!data.is_empty()).then(|| inline_data_to_content(mime_type.as_deref(), data, video_metadata.as_ref())),
        Part::FileData {
            mime_type,
            file_uri,
            video_metadata,
        } => Some(file_data_to_content(mime_type, file_uri, video_metadata.as_ref())),
        Part::FunctionCall { .. } | Part::FunctionResponse { .. } => None,
    }
}

fn inline_data_to_content(mime_type: Option<&str>, data: &[u8], video: Option<&VideoMetadata>) -> InputContent {
    let mime_type = mime_type.filter(|m| !m.is_empty()).unwrap_or(DEFAULT_MIME_TYPE);
    let data_uri = format!("data:{mime_type};base64,{}", STANDARD.encode(data));

    match MediaKind::classify(mime_type) {
        MediaKind::Image => InputContent::InputImage {
            image_url: Some(data_uri),
            file_id: None,
            detail: Some(IMAGE_DETAIL.to_owned()),
        },
        MediaKind::Video => InputContent::InputVideo {
            video_url: Some(data_uri),
            file_id: None,
            fps: video.and_then(|m| m.fps),
        },
        MediaKind::File => InputContent::InputFile {
            file_url: None,
            file_id: None,
            file_data: Some(data_uri),
        },
    }
}

fn file_data_to_content(mime_type: &str, file_uri: &str, video: Option<&VideoMetadata>) -> InputContent {
    let (file_id, url) = match file_uri.strip_prefix(FILE_ID_SCHEME) {
        Some(id) => (Some(id.to_owned()), None),
        None => (None, Some(file_uri.to_owned())),
    };

    match MediaKind::classify(mime_type) {
        MediaKind::Image => InputContent::InputImage {
            image_url: url,
            file_id,
            detail: Some(IMAGE_DETAIL.to_owned()),
        },
        // Referenced videos are sampled at 1 fps unless metadata says otherwise
        MediaKind::Video => InputContent::InputVideo {
            video_url: url,
            file_id,
            fps: video.map_or(Some(DEFAULT_VIDEO_FPS), |m| m.fps),
        },
        MediaKind::File => InputContent::InputFile {
            file_url: url,
            file_id,
            file_data: None,
        },
    }
}

/// Serialize to JSON, falling back to the debug rendering
pub fn safe_json_serialize<T: Serialize + Debug + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("{value:?}"))
}

// -- Inbound: output item -> canonical part --

/// Convert a response output item into a canonical part
///
/// Unrecognized item types are skipped.
pub fn output_item_to_part(item: &OutputItem) -> Option<Part> {
    match item {
        OutputItem::Reasoning { summary } => {
            let text = summary.iter().map(|s| s.text.as_str()).collect::<Vec<_>>().join("\n");
            Some(Part::thought(text))
        }
        OutputItem::Message { content } => {
            let text: String = content
                .iter()
                .filter_map(|c| match c {
                    OutputContent::OutputText { text } => Some(text.as_str()),
                    OutputContent::Unknown => None,
                })
                .collect();
            Some(Part::text(text))
        }
        OutputItem::FunctionCall {
            call_id,
            name,
            arguments,
        } => Some(Part::function_call(call_id.clone(), name.clone(), parse_arguments(name, arguments))),
        OutputItem::Unknown => {
            tracing::debug!("skipping unrecognized output item");
            None
        }
    }
}

/// Parse function call arguments, keeping unparseable text as a JSON string
fn parse_arguments(name: &str, arguments: &str) -> Value {
    if arguments.trim().is_empty() {
        return Value::Object(serde_json::Map::new());
    }

    serde_json::from_str(arguments).unwrap_or_else(|e| {
        tracing::warn!(function = %name, error = %e, "function call arguments are not valid JSON");
        Value::String(arguments.to_owned())
    })
}
