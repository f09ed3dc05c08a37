//! Response-buffering decompression transform.
//!
//! Some test clients cannot decode brotli, so matched responses are
//! decompressed server-side before they leave the gateway. Everything
//! else must keep streaming: buffering large package payloads that
//! nobody asked to transform is a regression, not a convenience.

use axum::body::Body;
use axum::http::Response;
use axum::http::header::{CONTENT_ENCODING, CONTENT_LENGTH};
use http_body_util::BodyExt;

use crate::error::{DispatchError, DispatchResult};

/// Default cap on a buffered response body: 32 MiB.
pub const DEFAULT_MAX_BUFFER: usize = 32 * 1024 * 1024;

/// Decompress a brotli-encoded response body.
///
/// Responses without `content-encoding: br` are returned untouched,
/// original streaming body included; nothing is buffered on that path.
/// Encoded responses are drained fully (capped at `max_buffer` bytes),
/// decompressed, validated as UTF-8, and rebuilt with the now-stale
/// `content-length` and `content-encoding` headers removed. All other
/// headers and the status code are preserved.
pub async fn maybe_decompress(
    response: Response<Body>,
    max_buffer: usize,
) -> DispatchResult<Response<Body>> {
    let is_brotli = response
        .headers()
        .get(CONTENT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("br"));
    if !is_brotli {
        return Ok(response);
    }

    let (mut parts, body) = response.into_parts();
    let compressed = drain_body(body, max_buffer).await?;

    let decoded = decompress(&compressed).map_err(|reason| DispatchError::Decode {
        status: parts.status,
        headers: parts.headers.clone(),
        reason,
    })?;
    let text = String::from_utf8(decoded).map_err(|_| DispatchError::Decode {
        status: parts.status,
        headers: parts.headers.clone(),
        reason: "decompressed body is not valid UTF-8".to_string(),
    })?;

    // Rebuild rather than `remove`: HeaderMap removal swaps entries
    // around, and the remaining headers must keep their original order.
    let mut headers = axum::http::HeaderMap::with_capacity(parts.headers.len());
    for (name, value) in parts.headers.iter() {
        if *name != CONTENT_LENGTH && *name != CONTENT_ENCODING {
            headers.append(name.clone(), value.clone());
        }
    }
    parts.headers = headers;
    Ok(Response::from_parts(parts, Body::from(text)))
}

/// Drain a body stream into one contiguous buffer, chunks in arrival
/// order. A transport error discards the partial buffer and fails the
/// transform; dropping the future (client cancellation) aborts the
/// drain at the next await point.
async fn drain_body(mut body: Body, max_buffer: usize) -> DispatchResult<Vec<u8>> {
    let mut buffer = Vec::new();
    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(|e| DispatchError::UpstreamStream(e.to_string()))?;
        if let Some(data) = frame.data_ref() {
            if buffer.len() + data.len() > max_buffer {
                return Err(DispatchError::PayloadTooLarge { limit: max_buffer });
            }
            buffer.extend_from_slice(data);
        }
    }
    Ok(buffer)
}

fn decompress(bytes: &[u8]) -> Result<Vec<u8>, String> {
    use std::io::Read;

    let mut decoded = Vec::new();
    brotli::Decompressor::new(bytes, 4096)
        .read_to_end(&mut decoded)
        .map_err(|e| format!("brotli decompression failed: {e}"))?;
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use std::pin::Pin;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::task::{Context, Poll};

    use axum::http::StatusCode;
    use bytes::Bytes;
    use futures_util::Stream;

    use super::*;

    fn compress(text: &[u8]) -> Vec<u8> {
        use std::io::Write;

        let mut out = Vec::new();
        let mut writer = brotli::CompressorWriter::new(&mut out, 4096, 5, 22);
        writer.write_all(text).unwrap();
        drop(writer);
        out
    }

    fn chunked_body(bytes: &[u8], chunks: usize) -> Body {
        let size = bytes.len().div_ceil(chunks).max(1);
        let parts: Vec<Result<Bytes, std::io::Error>> = bytes
            .chunks(size)
            .map(|c| Ok(Bytes::copy_from_slice(c)))
            .collect();
        Body::from_stream(futures_util::stream::iter(parts))
    }

    async fn body_bytes(body: Body) -> Vec<u8> {
        body.collect().await.unwrap().to_bytes().to_vec()
    }

    /// Stream wrapper that records whether it was ever polled.
    struct Watched {
        inner: futures_util::stream::Iter<std::vec::IntoIter<Result<Bytes, std::io::Error>>>,
        polled: Arc<AtomicBool>,
    }

    impl Stream for Watched {
        type Item = Result<Bytes, std::io::Error>;

        fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
            self.polled.store(true, Ordering::SeqCst);
            Pin::new(&mut self.inner).poll_next(cx)
        }
    }

    #[tokio::test]
    async fn passthrough_never_touches_the_stream() {
        let polled = Arc::new(AtomicBool::new(false));
        let stream = Watched {
            inner: futures_util::stream::iter(vec![Ok(Bytes::from_static(b"streamed payload"))]),
            polled: polled.clone(),
        };
        let response = Response::builder()
            .header("content-length", "16")
            .header("x-request-id", "abc")
            .body(Body::from_stream(stream))
            .unwrap();

        let out = maybe_decompress(response, DEFAULT_MAX_BUFFER).await.unwrap();

        // The transform must return before a single chunk is pulled.
        assert!(!polled.load(Ordering::SeqCst));
        assert_eq!(out.headers()["content-length"], "16");
        assert_eq!(out.headers()["x-request-id"], "abc");
        assert_eq!(body_bytes(out.into_body()).await, b"streamed payload");
    }

    #[tokio::test]
    async fn passthrough_ignores_other_encodings() {
        let response = Response::builder()
            .header("content-encoding", "gzip")
            .body(Body::from("gzipped"))
            .unwrap();

        let out = maybe_decompress(response, DEFAULT_MAX_BUFFER).await.unwrap();

        assert_eq!(out.headers()["content-encoding"], "gzip");
        assert_eq!(body_bytes(out.into_body()).await, b"gzipped");
    }

    #[tokio::test]
    async fn decompresses_and_rewrites_headers() {
        let compressed = compress("{\"name\":\"@scope/lib\"}".as_bytes());
        let response = Response::builder()
            .status(StatusCode::CREATED)
            .header("x-first", "1")
            .header("content-encoding", "br")
            .header("content-length", compressed.len().to_string())
            .header("x-last", "2")
            .body(Body::from(compressed))
            .unwrap();

        let out = maybe_decompress(response, DEFAULT_MAX_BUFFER).await.unwrap();

        assert_eq!(out.status(), StatusCode::CREATED);
        assert!(out.headers().get("content-encoding").is_none());
        assert!(out.headers().get("content-length").is_none());
        let kept: Vec<&str> = out.headers().keys().map(|k| k.as_str()).collect();
        assert_eq!(kept, vec!["x-first", "x-last"]);
        assert_eq!(body_bytes(out.into_body()).await, b"{\"name\":\"@scope/lib\"}");
    }

    #[tokio::test]
    async fn round_trips_regardless_of_chunk_boundaries() {
        let text = "päckage payload ".repeat(400);
        let compressed = compress(text.as_bytes());

        for chunks in [1, 2, 50] {
            let response = Response::builder()
                .header("content-encoding", "br")
                .body(chunked_body(&compressed, chunks))
                .unwrap();

            let out = maybe_decompress(response, DEFAULT_MAX_BUFFER).await.unwrap();
            assert_eq!(
                body_bytes(out.into_body()).await,
                text.as_bytes(),
                "chunks = {chunks}"
            );
        }
    }

    #[tokio::test]
    async fn round_trips_the_empty_payload() {
        let compressed = compress(b"");
        let response = Response::builder()
            .header("content-encoding", "br")
            .body(Body::from(compressed))
            .unwrap();

        let out = maybe_decompress(response, DEFAULT_MAX_BUFFER).await.unwrap();
        assert_eq!(body_bytes(out.into_body()).await, b"");
    }

    #[tokio::test]
    async fn corrupt_payload_is_a_decode_error() {
        let response = Response::builder()
            .status(StatusCode::OK)
            .header("content-encoding", "br")
            .header("x-request-id", "abc")
            .body(Body::from(vec![0xde, 0xad, 0xbe, 0xef]))
            .unwrap();

        let err = maybe_decompress(response, DEFAULT_MAX_BUFFER)
            .await
            .unwrap_err();
        match err {
            DispatchError::Decode { status, headers, .. } => {
                assert_eq!(status, StatusCode::OK);
                assert_eq!(headers["x-request-id"], "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn invalid_utf8_is_a_decode_error() {
        let compressed = compress(&[0xff, 0xfe, 0x80]);
        let response = Response::builder()
            .header("content-encoding", "br")
            .body(Body::from(compressed))
            .unwrap();

        let err = maybe_decompress(response, DEFAULT_MAX_BUFFER)
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Decode { .. }));
    }

    #[tokio::test]
    async fn transport_error_discards_the_partial_buffer() {
        let parts: Vec<Result<Bytes, std::io::Error>> = vec![
            Ok(Bytes::from_static(b"partial")),
            Err(std::io::Error::other("connection reset")),
        ];
        let response = Response::builder()
            .header("content-encoding", "br")
            .body(Body::from_stream(futures_util::stream::iter(parts)))
            .unwrap();

        let err = maybe_decompress(response, DEFAULT_MAX_BUFFER)
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::UpstreamStream(_)));
    }

    #[tokio::test]
    async fn oversized_payload_is_rejected() {
        // The cap trips while draining, before any decompression, so
        // the body bytes never need to form a valid stream.
        let response = Response::builder()
            .header("content-encoding", "br")
            .body(Body::from(vec![0u8; 64]))
            .unwrap();

        let err = maybe_decompress(response, 16).await.unwrap_err();
        assert!(matches!(
            err,
            DispatchError::PayloadTooLarge { limit: 16 }
        ));
    }
}
