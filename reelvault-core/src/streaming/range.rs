//! HTTP Range header parsing and bounds validation.

use axum::http::{HeaderMap, StatusCode, header};

/// Parses the `Range` header into `(start, optional end)`.
///
/// Supports the single-range `bytes=start-end` form, with the end
/// position optional. A missing or malformed header yields `None`, in
/// which case the caller serves the full content with a 200.
pub fn parse_range_header(headers: &HeaderMap) -> Option<(u64, Option<u64>)> {
    let range_header = headers.get(header::RANGE)?.to_str().ok()?;

    if !range_header.starts_with("bytes=") {
        return None;
    }

    let range_spec = &range_header[6..]; // Skip "bytes="
    let (start_str, end_str) = range_spec.split_once('-')?;

    let start = start_str.parse::<u64>().ok()?;
    let end = if end_str.is_empty() {
        None
    } else {
        Some(end_str.parse::<u64>().ok()?)
    };

    Some((start, end))
}

/// Validates a parsed range against the content size.
///
/// The end position defaults to `size - 1` and is clamped to it, so an
/// over-long suffix request degrades to "the rest of the file". Returns
/// `(start, end, length)` on success.
///
/// # Errors
///
/// Returns `RANGE_NOT_SATISFIABLE` when the range cannot be satisfied:
/// `start` is at or past the end of the content, or past the requested
/// end position. The caller responds 416 with
/// `Content-Range: bytes */<size>`.
pub fn validate_range_bounds(
    start: u64,
    end: Option<u64>,
    size: u64,
) -> Result<(u64, u64, u64), StatusCode> {
    if start >= size {
        return Err(StatusCode::RANGE_NOT_SATISFIABLE);
    }

    let end = end.unwrap_or(size - 1).min(size - 1);
    if start > end {
        return Err(StatusCode::RANGE_NOT_SATISFIABLE);
    }

    Ok((start, end, end - start + 1))
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers_with_range(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::RANGE, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_parse_range_header_valid() {
        let headers = headers_with_range("bytes=100-199");
        assert_eq!(parse_range_header(&headers), Some((100, Some(199))));
    }

    #[test]
    fn test_parse_range_header_open_end() {
        let headers = headers_with_range("bytes=500-");
        assert_eq!(parse_range_header(&headers), Some((500, None)));
    }

    #[test]
    fn test_parse_range_header_missing() {
        assert_eq!(parse_range_header(&HeaderMap::new()), None);
    }

    #[test]
    fn test_parse_range_header_malformed() {
        assert_eq!(parse_range_header(&headers_with_range("invalid")), None);
        assert_eq!(parse_range_header(&headers_with_range("bytes=abc-")), None);
        assert_eq!(parse_range_header(&headers_with_range("bytes=10")), None);
    }

    #[test]
    fn test_validate_range_bounds_valid() {
        assert_eq!(validate_range_bounds(100, Some(199), 1000), Ok((100, 199, 100)));
    }

    #[test]
    fn test_validate_range_bounds_defaults_end() {
        assert_eq!(validate_range_bounds(500, None, 1000), Ok((500, 999, 500)));
    }

    #[test]
    fn test_validate_range_bounds_clamps_end() {
        assert_eq!(validate_range_bounds(100, Some(9999), 500), Ok((100, 499, 400)));
    }

    #[test]
    fn test_validate_range_bounds_start_past_size() {
        assert!(validate_range_bounds(1000, None, 1000).is_err());
        assert!(validate_range_bounds(1500, Some(1600), 1000).is_err());
    }

    #[test]
    fn test_validate_range_bounds_inverted() {
        assert!(validate_range_bounds(200, Some(100), 1000).is_err());
    }
}
