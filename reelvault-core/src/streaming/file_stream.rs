//! Chunked file streaming with HTTP range support.

use std::io::SeekFrom;
use std::path::PathBuf;

use axum::body::Body;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use futures::{Stream, stream};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use super::range::{parse_range_header, validate_range_bounds};
use super::{StreamingError, StreamingResult};

/// Size of chunks read from disk per poll.
///
/// Balances syscall overhead against memory held per in-flight response.
const CHUNK_SIZE: usize = 256 * 1024; // 256KB

/// Streams one library file as an HTTP response.
///
/// The response body reads the file incrementally: the next chunk is only
/// pulled off disk when the client connection accepts more data, so slow
/// clients throttle the disk reads instead of ballooning memory.
pub struct FileStreamer {
    path: PathBuf,
    content_type: String,
}

impl FileStreamer {
    /// Creates a streamer for `path`, deriving the content type from the
    /// file extension with a `video/mp4` fallback.
    pub fn open(path: PathBuf) -> Self {
        let content_type = mime_guess::from_path(&path)
            .first_raw()
            .unwrap_or("video/mp4")
            .to_string();
        Self { path, content_type }
    }

    /// Builds the streaming response for a request's headers.
    ///
    /// A valid `Range` header yields 206 with `Content-Range`; no header
    /// (or one that does not parse) yields the full file with 200; a
    /// syntactically valid but unsatisfiable range yields 416.
    ///
    /// # Errors
    ///
    /// - `StreamingError::IoError` - File cannot be opened or stat'd
    pub async fn stream_response(&self, headers: &HeaderMap) -> StreamingResult<Response> {
        let size = tokio::fs::metadata(&self.path)
            .await
            .map_err(|source| StreamingError::IoError {
                operation: format!("stat {}", self.path.display()),
                source,
            })?
            .len();

        match parse_range_header(headers) {
            Some((start, end)) => {
                let Ok((start, end, length)) = validate_range_bounds(start, end, size) else {
                    return Ok((
                        StatusCode::RANGE_NOT_SATISFIABLE,
                        [(
                            header::CONTENT_RANGE,
                            HeaderValue::from_str(&format!("bytes */{size}"))
                                .unwrap_or_else(|_| HeaderValue::from_static("bytes */0")),
                        )],
                    )
                        .into_response());
                };

                let stream = Self::open_range_stream(self.path.clone(), start, length).await?;

                Ok(Response::builder()
                    .status(StatusCode::PARTIAL_CONTENT)
                    .header(header::CONTENT_TYPE, &self.content_type)
                    .header(header::CONTENT_LENGTH, length.to_string())
                    .header(
                        header::CONTENT_RANGE,
                        format!("bytes {start}-{end}/{size}"),
                    )
                    .header(header::ACCEPT_RANGES, "bytes")
                    .header(header::CACHE_CONTROL, "no-cache")
                    .body(Body::from_stream(stream))
                    .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response()))
            }
            None => {
                let stream = Self::open_range_stream(self.path.clone(), 0, size).await?;

                Ok(Response::builder()
                    .status(StatusCode::OK)
                    .header(header::CONTENT_TYPE, &self.content_type)
                    .header(header::CONTENT_LENGTH, size.to_string())
                    .header(header::ACCEPT_RANGES, "bytes")
                    .header(header::CACHE_CONTROL, "no-cache")
                    .body(Body::from_stream(stream))
                    .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response()))
            }
        }
    }

    /// Opens the file, seeks to `start`, and yields up to `length` bytes
    /// in `CHUNK_SIZE` reads.
    async fn open_range_stream(
        path: PathBuf,
        start: u64,
        length: u64,
    ) -> StreamingResult<impl Stream<Item = Result<Bytes, std::io::Error>>> {
        let mut file = File::open(&path)
            .await
            .map_err(|source| StreamingError::IoError {
                operation: format!("open {}", path.display()),
                source,
            })?;
        file.seek(SeekFrom::Start(start))
            .await
            .map_err(|source| StreamingError::IoError {
                operation: format!("seek {}", path.display()),
                source,
            })?;

        Ok(stream::unfold(
            (file, length),
            |(mut file, remaining)| async move {
                if remaining == 0 {
                    return None;
                }

                let chunk = CHUNK_SIZE.min(remaining as usize);
                let mut buffer = vec![0u8; chunk];

                match file.read(&mut buffer).await {
                    // EOF before the window ended (file truncated mid-stream)
                    Ok(0) => None,
                    Ok(n) => {
                        buffer.truncate(n);
                        Some((Ok(Bytes::from(buffer)), (file, remaining - n as u64)))
                    }
                    Err(e) => Some((Err(e), (file, 0))),
                }
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    async fn body_bytes(response: Response) -> Bytes {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
    }

    fn write_fixture(dir: &std::path::Path, len: u8) -> PathBuf {
        let path = dir.join("clip.mp4");
        std::fs::write(&path, (0..len).collect::<Vec<u8>>()).unwrap();
        path
    }

    fn range_headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::RANGE, HeaderValue::from_static(value));
        headers
    }

    #[tokio::test]
    async fn test_full_file_request() {
        let dir = tempdir().unwrap();
        let path = write_fixture(dir.path(), 100);

        let streamer = FileStreamer::open(path);
        let response = streamer.stream_response(&HeaderMap::new()).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_LENGTH).unwrap(),
            "100"
        );
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "video/mp4"
        );
        assert_eq!(
            response.headers().get(header::ACCEPT_RANGES).unwrap(),
            "bytes"
        );

        let body = body_bytes(response).await;
        assert_eq!(body, (0..100u8).collect::<Vec<u8>>());
    }

    #[tokio::test]
    async fn test_range_request_window() {
        let dir = tempdir().unwrap();
        let path = write_fixture(dir.path(), 100);

        let streamer = FileStreamer::open(path);
        let response = streamer
            .stream_response(&range_headers("bytes=10-19"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(
            response.headers().get(header::CONTENT_LENGTH).unwrap(),
            "10"
        );
        assert_eq!(
            response.headers().get(header::CONTENT_RANGE).unwrap(),
            "bytes 10-19/100"
        );

        let body = body_bytes(response).await;
        assert_eq!(body, vec![10, 11, 12, 13, 14, 15, 16, 17, 18, 19]);
    }

    #[tokio::test]
    async fn test_open_ended_range() {
        let dir = tempdir().unwrap();
        let path = write_fixture(dir.path(), 100);

        let streamer = FileStreamer::open(path);
        let response = streamer
            .stream_response(&range_headers("bytes=90-"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(
            response.headers().get(header::CONTENT_RANGE).unwrap(),
            "bytes 90-99/100"
        );
        assert_eq!(body_bytes(response).await.len(), 10);
    }

    #[tokio::test]
    async fn test_unsatisfiable_range() {
        let dir = tempdir().unwrap();
        let path = write_fixture(dir.path(), 100);

        let streamer = FileStreamer::open(path);
        let response = streamer
            .stream_response(&range_headers("bytes=150-200"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::RANGE_NOT_SATISFIABLE);
        assert_eq!(
            response.headers().get(header::CONTENT_RANGE).unwrap(),
            "bytes */100"
        );
    }

    #[tokio::test]
    async fn test_malformed_range_served_as_full_content() {
        let dir = tempdir().unwrap();
        let path = write_fixture(dir.path(), 50);

        let streamer = FileStreamer::open(path);
        let response = streamer
            .stream_response(&range_headers("bytes=tail"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await.len(), 50);
    }

    #[tokio::test]
    async fn test_content_type_from_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("clip.webm");
        std::fs::write(&path, b"data").unwrap();

        let streamer = FileStreamer::open(path);
        let response = streamer.stream_response(&HeaderMap::new()).await.unwrap();
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "video/webm"
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let streamer = FileStreamer::open(dir.path().join("missing.mp4"));

        assert!(matches!(
            streamer.stream_response(&HeaderMap::new()).await,
            Err(StreamingError::IoError { .. })
        ));
    }
}
