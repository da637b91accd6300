//! Audio download API
use crate::{
    error::{Result, ServerError},
    services::downloads::content_type,
    state::AppState,
};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
};
use std::io::SeekFrom;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

const CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// Byte range to serve for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteRange {
    /// Whole file (no range, or one we do not honour)
    Full,
    /// Inclusive byte offsets
    Partial { start: u64, end: u64 },
    Unsatisfiable,
}

/// GET /download/:file
/// Serve a file from the songs directory with single-range support
pub async fn download(
    Path(file): Path<String>,
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response> {
    let file_path = app_state.downloads.resolve(&file)?;

    let metadata = tokio::fs::metadata(&file_path).await?;
    let file_size = metadata.len();
    let mime_type = content_type(&file_path);

    let range = headers
        .get(header::RANGE)
        .and_then(|value| value.to_str().ok())
        .map_or(ByteRange::Full, |value| parse_range(value, file_size));

    if range == ByteRange::Unsatisfiable {
        return Err(ServerError::RangeNotSatisfiable { size: file_size });
    }

    let builder = Response::builder()
        .header(header::CONTENT_TYPE, mime_type)
        .header(header::ACCEPT_RANGES, "bytes")
        .header(header::CACHE_CONTROL, CACHE_CONTROL);

    let mut file = File::open(&file_path).await?;

    let response = match range {
        ByteRange::Partial { start, end } => {
            file.seek(SeekFrom::Start(start)).await?;
            let content_length = end - start + 1;
            let body = Body::from_stream(ReaderStream::new(file.take(content_length)));

            builder
                .status(StatusCode::PARTIAL_CONTENT)
                .header(header::CONTENT_LENGTH, content_length)
                .header(
                    header::CONTENT_RANGE,
                    format!("bytes {}-{}/{}", start, end, file_size),
                )
                .body(body)
        }
        ByteRange::Full | ByteRange::Unsatisfiable => builder
            .status(StatusCode::OK)
            .header(header::CONTENT_LENGTH, file_size)
            .body(Body::from_stream(ReaderStream::new(file))),
    };

    response.map_err(|e| ServerError::Internal(format!("Failed to build response: {}", e)))
}

/// Parse an HTTP Range header against a file of `file_size` bytes
///
/// Supports `bytes=start-end`, `bytes=start-` and the suffix form
/// `bytes=-count`. An end past the file is clamped. Multi-range and
/// malformed headers fall back to the whole file.
pub fn parse_range(range: &str, file_size: u64) -> ByteRange {
    let Some(spec) = range.trim().strip_prefix("bytes=") else {
        return ByteRange::Full;
    };
    if spec.contains(',') {
        return ByteRange::Full;
    }
    let Some((start_str, end_str)) = spec.trim().split_once('-') else {
        return ByteRange::Full;
    };

    if start_str.is_empty() {
        // Suffix: the last `count` bytes
        let Ok(count) = end_str.parse::<u64>() else {
            return ByteRange::Full;
        };
        if count == 0 || file_size == 0 {
            return ByteRange::Unsatisfiable;
        }
        return ByteRange::Partial {
            start: file_size.saturating_sub(count),
            end: file_size - 1,
        };
    }

    let Ok(start) = start_str.parse::<u64>() else {
        return ByteRange::Full;
    };
    let end = if end_str.is_empty() {
        None
    } else {
        match end_str.parse::<u64>() {
            Ok(end) => Some(end),
            Err(_) => return ByteRange::Full,
        }
    };

    if let Some(end) = end {
        if end < start {
            return ByteRange::Full;
        }
    }
    if start >= file_size {
        return ByteRange::Unsatisfiable;
    }

    let last = file_size - 1;
    ByteRange::Partial {
        start,
        end: end.map_or(last, |end| end.min(last)),
    }
}
