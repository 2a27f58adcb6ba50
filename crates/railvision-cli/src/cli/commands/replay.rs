//! Replay command: reassemble an assistant turn from a captured stream.

use std::path::Path;

use anyhow::{Context, Result};
use futures_util::StreamExt;
use railvision_stream::{DeltaStream, apply_delta};
use railvision_types::MessageState;

/// Chunk size used when replaying a capture, small enough to exercise the
/// same split-object paths a live response does.
const REPLAY_CHUNK_BYTES: usize = 512;

pub fn run(file: &Path, as_json: bool) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("create runtime")?;
    let state = runtime.block_on(replay(file))?;

    if as_json {
        println!(
            "{}",
            serde_json::to_string_pretty(&state).context("serialize merged state")?
        );
        return Ok(());
    }

    println!("{}", state.content);
    for call in &state.tool_calls {
        let response = call.tool_response.as_deref().unwrap_or("-");
        println!("[tool] {} {} {}", call.tool_name, call.event_type, response);
    }
    Ok(())
}

async fn replay(file: &Path) -> Result<MessageState> {
    let data = tokio::fs::read(file)
        .await
        .with_context(|| format!("read capture {}", file.display()))?;

    let chunks: Vec<std::result::Result<bytes::Bytes, std::io::Error>> = data
        .chunks(REPLAY_CHUNK_BYTES)
        .map(|c| Ok(bytes::Bytes::copy_from_slice(c)))
        .collect();
    let mut stream = DeltaStream::new(futures_util::stream::iter(chunks));

    let mut state = MessageState::new();
    while let Some(result) = stream.next().await {
        let delta = result.context("read capture stream")?;
        apply_delta(&mut state, &delta);
    }
    Ok(state)
}
