//! Shared data types for the RailVision AI chat assembly and export core.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One incremental fragment of an in-progress streamed assistant response.
///
/// Produced by the stream decoder, consumed immediately by the delta merger.
/// All fields are optional on the wire; a delta may carry any combination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodedDelta {
    /// Text fragment to append to the assistant message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    /// Partial tool-call records. Kept as raw values here; per-entry shape
    /// validation happens in [`ToolCallDelta::from_value`] so one bad entry
    /// never discards the rest of the delta.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<Value>>,
    /// Citation payloads, passed through opaquely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citations: Option<Vec<Value>>,
}

impl DecodedDelta {
    /// Converts a decoded JSON object into a delta, field by field.
    ///
    /// Tolerant by design: a `response` that is not a string is ignored
    /// rather than rejecting the whole object, and unknown fields are
    /// dropped. Returns `None` only when the value is not an object.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        Some(Self {
            response: obj
                .get("response")
                .and_then(Value::as_str)
                .map(str::to_string),
            tool_calls: obj.get("tool_calls").and_then(Value::as_array).cloned(),
            citations: obj.get("citations").and_then(Value::as_array).cloned(),
        })
    }

    /// True when the delta carries nothing the merger would act on.
    pub fn is_empty(&self) -> bool {
        self.response.is_none() && self.tool_calls.is_none() && self.citations.is_none()
    }
}

/// A structured record of one external-capability invocation and its
/// eventual result. Identity is `call_id`; every other field may arrive
/// partially and repeatedly across deltas for the same call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallDelta {
    pub call_id: String,
    pub event_type: String,
    pub tool_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_details: Option<ToolCallDetails>,
    /// Any additional top-level fields, carried through the shallow merge.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ToolCallDelta {
    /// The required identity fields must all be non-empty strings.
    pub fn has_identity(&self) -> bool {
        !self.call_id.is_empty() && !self.event_type.is_empty() && !self.tool_name.is_empty()
    }

    /// Converts a raw tool-call record, requiring only identity.
    ///
    /// Optional fields with the wrong shape are treated as absent rather
    /// than rejecting the record. Returns `None` when the value is not an
    /// object or an identity field is missing, non-string or empty.
    pub fn from_value(value: &Value) -> Option<Self> {
        const KNOWN: [&str; 5] = [
            "call_id",
            "event_type",
            "tool_name",
            "tool_response",
            "tool_call_details",
        ];
        let obj = value.as_object()?;
        let required = |key: &str| obj.get(key).and_then(Value::as_str).map(str::to_string);
        let call = Self {
            call_id: required("call_id")?,
            event_type: required("event_type")?,
            tool_name: required("tool_name")?,
            tool_response: obj
                .get("tool_response")
                .and_then(Value::as_str)
                .map(str::to_string),
            tool_call_details: obj
                .get("tool_call_details")
                .and_then(|v| serde_json::from_value(v.clone()).ok()),
            extra: obj
                .iter()
                .filter(|(key, _)| !KNOWN.contains(&key.as_str()))
                .map(|(key, field)| (key.clone(), field.clone()))
                .collect(),
        };
        call.has_identity().then_some(call)
    }
}

/// Free-form detail payload attached to a tool call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolCallDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<ToolCallSummary>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Argument/result summary for a tool call. `args` and `result` are never
/// erased once populated; later deltas only overwrite them with real values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolCallSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The accumulated result of merging all deltas for one assistant turn.
///
/// `content` only ever grows. `tool_calls` is keyed by `call_id`
/// conceptually, materialized as a sequence preserving first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageState {
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallDelta>,
}

impl MessageState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a tool call by its stable identifier.
    pub fn tool_call(&self, call_id: &str) -> Option<&ToolCallDelta> {
        self.tool_calls.iter().find(|t| t.call_id == call_id)
    }
}

/// One structurally classified unit of parsed markdown, in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Token {
    Heading {
        /// 1 through 6.
        level: u8,
        text: String,
    },
    Bullet {
        /// Nesting depth, one level per two spaces of indent.
        level: usize,
        text: String,
    },
    Ordered {
        index: u64,
        level: usize,
        text: String,
    },
    Table {
        /// Surviving data rows; the first row is the header.
        rows: Vec<Vec<String>>,
    },
    Blockquote {
        /// Quote lines joined with newlines, markers stripped.
        text: String,
    },
    Code {
        lang: Option<String>,
        /// Verbatim body, fences excluded.
        text: String,
    },
    Hr,
    Paragraph {
        text: String,
    },
}

/// A contiguous styled run of inline text within a single token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub code: bool,
}

impl Segment {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}
