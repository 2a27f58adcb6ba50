//! Async adapter from a raw byte stream to decoded deltas.

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use anyhow::{Result, anyhow};
use futures_util::Stream;
use railvision_types::DecodedDelta;

use crate::decoder::StreamDecoder;

/// Wraps an HTTP response body stream and yields decoded deltas.
///
/// Transport errors surface as stream items; decode-level garbage never
/// does. Multi-byte UTF-8 sequences split across chunk boundaries are
/// carried until complete. Dropping the stream mid-flight is a clean
/// cancellation: no callbacks fire after the drop.
pub struct DeltaStream<S> {
    inner: S,
    decoder: StreamDecoder,
    /// Raw bytes not yet decodable as UTF-8 (incomplete trailing sequence).
    carry: Vec<u8>,
    pending: VecDeque<DecodedDelta>,
    flushed: bool,
}

impl<S> DeltaStream<S> {
    pub fn new(stream: S) -> Self {
        Self {
            inner: stream,
            decoder: StreamDecoder::new(),
            carry: Vec::new(),
            pending: VecDeque::new(),
            flushed: false,
        }
    }

    /// Takes the longest valid UTF-8 prefix of the carry buffer.
    ///
    /// An incomplete trailing sequence stays buffered; truly invalid bytes
    /// are replaced rather than wedging the stream.
    fn take_decodable(&mut self) -> String {
        match std::str::from_utf8(&self.carry) {
            Ok(text) => {
                let text = text.to_string();
                self.carry.clear();
                text
            }
            Err(err) if err.error_len().is_none() => {
                let valid = err.valid_up_to();
                let text = String::from_utf8_lossy(&self.carry[..valid]).into_owned();
                self.carry.drain(..valid);
                text
            }
            Err(_) => {
                let text = String::from_utf8_lossy(&self.carry).into_owned();
                self.carry.clear();
                text
            }
        }
    }
}

impl<S, E> Stream for DeltaStream<S>
where
    S: Stream<Item = std::result::Result<bytes::Bytes, E>> + Unpin,
    E: std::error::Error + Send + Sync + 'static,
{
    type Item = Result<DecodedDelta>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            if let Some(delta) = self.pending.pop_front() {
                return Poll::Ready(Some(Ok(delta)));
            }
            if self.flushed {
                return Poll::Ready(None);
            }

            let inner = Pin::new(&mut self.inner);
            match inner.poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => {
                    self.carry.extend_from_slice(&bytes);
                    let text = self.take_decodable();
                    let decoded = self.decoder.feed(&text);
                    self.pending.extend(decoded);
                }
                Poll::Ready(Some(Err(e))) => {
                    return Poll::Ready(Some(Err(anyhow!("stream error: {}", e))));
                }
                Poll::Ready(None) => {
                    self.flushed = true;
                    let tail = String::from_utf8_lossy(&std::mem::take(&mut self.carry)).into_owned();
                    let mut decoded = self.decoder.feed(&tail);
                    decoded.extend(self.decoder.flush());
                    self.pending.extend(decoded);
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use futures_util::StreamExt;

    use super::*;

    fn mock_byte_stream(
        data: &str,
        chunk_size: usize,
    ) -> impl Stream<Item = std::result::Result<bytes::Bytes, std::io::Error>> {
        let chunks: Vec<_> = data
            .as_bytes()
            .chunks(chunk_size)
            .map(|c| Ok(bytes::Bytes::copy_from_slice(c)))
            .collect();
        futures_util::stream::iter(chunks)
    }

    #[tokio::test]
    async fn yields_deltas_in_arrival_order() {
        let data = "data: {\"response\":\"Hello \"}\ndata: {\"response\":\"world\"}\n";
        let mut stream = DeltaStream::new(mock_byte_stream(data, 7));

        let mut texts = Vec::new();
        while let Some(result) = stream.next().await {
            let delta = result.expect("transport is clean");
            texts.push(delta.response.unwrap_or_default());
        }
        assert_eq!(texts, vec!["Hello ", "world"]);
    }

    #[tokio::test]
    async fn final_object_recovered_at_end_of_stream() {
        // No trailing newline or further data after the last object.
        let data = r#"{"response":"tail"}"#;
        let mut stream = DeltaStream::new(mock_byte_stream(data, 5));

        let delta = stream.next().await.expect("one item").expect("ok");
        assert_eq!(delta.response.as_deref(), Some("tail"));
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn utf8_split_across_chunks() {
        // 👋 = F0 9F 91 8B; split in the middle of the sequence.
        let data = "{\"response\":\"Hi 👋\"}";
        let bytes = data.as_bytes();
        let emoji_start = bytes
            .windows(4)
            .position(|w| w == [0xF0, 0x9F, 0x91, 0x8B])
            .expect("emoji present");
        let split = emoji_start + 2;

        let chunks: Vec<std::result::Result<bytes::Bytes, std::io::Error>> = vec![
            Ok(bytes::Bytes::copy_from_slice(&bytes[..split])),
            Ok(bytes::Bytes::copy_from_slice(&bytes[split..])),
        ];
        let mut stream = DeltaStream::new(futures_util::stream::iter(chunks));

        let delta = stream.next().await.expect("one item").expect("ok");
        assert_eq!(delta.response.as_deref(), Some("Hi 👋"));
    }

    #[tokio::test]
    async fn transport_error_surfaces() {
        let chunks: Vec<std::result::Result<bytes::Bytes, std::io::Error>> = vec![
            Ok(bytes::Bytes::from_static(b"{\"response\":\"a\"}")),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
        ];
        let mut stream = DeltaStream::new(futures_util::stream::iter(chunks));

        assert!(stream.next().await.expect("first item").is_ok());
        let err = stream.next().await.expect("second item");
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn malformed_payload_is_skipped_not_errored() {
        let data = "data: {oops}\ndata: {\"response\":\"ok\"}\n";
        let mut stream = DeltaStream::new(mock_byte_stream(data, 1024));

        let delta = stream.next().await.expect("one item").expect("ok");
        assert_eq!(delta.response.as_deref(), Some("ok"));
        assert!(stream.next().await.is_none());
    }
}
