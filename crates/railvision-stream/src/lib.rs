//! Streaming-chat message assembly: incremental JSON-object extraction from
//! a raw response stream, plus the reducer that folds decoded deltas into a
//! single message state.

mod decoder;
mod merge;
mod stream;

pub use decoder::StreamDecoder;
pub use merge::apply_delta;
pub use stream::DeltaStream;
