//! Reducer folding decoded deltas into one message state.

use railvision_types::{DecodedDelta, MessageState, ToolCallDelta, ToolCallDetails, ToolCallSummary};
use serde_json::Value;
use tracing::debug;

/// Applies one delta to the accumulated state of an assistant turn.
///
/// `content` is append-only: re-applying the same text delta appends again,
/// matching the backend's segmented-fragment contract. Tool-call merging is
/// idempotent: re-applying an identical delta leaves `tool_calls` unchanged.
pub fn apply_delta(state: &mut MessageState, delta: &DecodedDelta) {
    if let Some(text) = &delta.response {
        state.content.push_str(text);
    }

    let Some(incoming_calls) = &delta.tool_calls else {
        return;
    };
    for raw in incoming_calls {
        let Some(call) = ToolCallDelta::from_value(raw) else {
            debug!("discarding tool-call delta without identity fields");
            continue;
        };

        match state.tool_calls.iter().position(|t| t.call_id == call.call_id) {
            Some(idx) => merge_tool_call(&mut state.tool_calls[idx], call),
            None => state.tool_calls.push(call),
        }
    }
}

/// In-place merge of a later delta into an existing tool call.
///
/// Incoming top-level fields override, with two exceptions: an empty
/// incoming `tool_response` keeps the existing value, and the nested
/// `summary` never loses a populated `args` or `result`.
fn merge_tool_call(existing: &mut ToolCallDelta, incoming: ToolCallDelta) {
    existing.event_type = incoming.event_type;
    existing.tool_name = incoming.tool_name;
    if incoming
        .tool_response
        .as_deref()
        .is_some_and(|r| !r.is_empty())
    {
        existing.tool_response = incoming.tool_response;
    }
    for (key, value) in incoming.extra {
        existing.extra.insert(key, value);
    }
    if let Some(details) = incoming.tool_call_details {
        match existing.tool_call_details.as_mut() {
            Some(current) => merge_details(current, details),
            None => existing.tool_call_details = Some(details),
        }
    }
}

fn merge_details(current: &mut ToolCallDetails, incoming: ToolCallDetails) {
    for (key, value) in incoming.extra {
        current.extra.insert(key, value);
    }
    if let Some(summary) = incoming.summary {
        match current.summary.as_mut() {
            Some(existing) => merge_summary(existing, summary),
            None => current.summary = Some(summary),
        }
    }
}

fn merge_summary(existing: &mut ToolCallSummary, incoming: ToolCallSummary) {
    if is_populated(incoming.args.as_ref()) {
        existing.args = incoming.args;
    }
    if is_populated(incoming.result.as_ref()) {
        existing.result = incoming.result;
    }
    for (key, value) in incoming.extra {
        existing.extra.insert(key, value);
    }
}

fn is_populated(value: Option<&Value>) -> bool {
    value.is_some_and(|v| !v.is_null())
}
