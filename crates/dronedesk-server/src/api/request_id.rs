//! Request correlation ids.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Caller-supplied id, if it is a non-empty visible string.
fn incoming_id(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(&REQUEST_ID_HEADER)?.to_str().ok()?.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Runs the request inside an `http` span tagged with its id and echoes the
/// id on the response. Ids are minted for callers that send none.
pub async fn ensure_request_id(request: Request, next: Next) -> Response {
    let id = incoming_id(request.headers()).unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let span = tracing::info_span!(
        "http",
        request_id = %id,
        method = %request.method(),
        path = %request.uri().path()
    );

    let mut response = next.run(request).instrument(span).await;
    match HeaderValue::from_str(&id) {
        Ok(value) => {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        Err(_) => tracing::warn!("Request id {:?} is not a valid header value", id),
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_ids_are_ignored() {
        let mut headers = HeaderMap::new();
        assert_eq!(incoming_id(&headers), None);
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("   "));
        assert_eq!(incoming_id(&headers), None);
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static(" abc-1 "));
        assert_eq!(incoming_id(&headers).as_deref(), Some("abc-1"));
    }
}
