//! Shared HTTP response checks.

use crate::error::SinkError;

/// Fallback when a 429 carries no usable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Map a webhook response to `Ok` or a [`SinkError`].
///
/// - **429 Too Many Requests** → [`SinkError::RateLimited`], reading
///   `Retry-After` as whole seconds.
/// - **Non-success status** → [`SinkError::Api`] with the response body.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, SinkError> {
    if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(SinkError::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        });
    }
    if !resp.status().is_success() {
        return Err(SinkError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map_or(DEFAULT_RETRY_AFTER_SECS, |secs| secs.ceil() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_response(status: u16, retry_after: Option<&str>, body: &'static str) -> reqwest::Response {
        let mut builder = ::http::Response::builder().status(status);
        if let Some(value) = retry_after {
            builder = builder.header("Retry-After", value);
        }
        reqwest::Response::from(builder.body(body).unwrap())
    }

    #[test]
    fn retry_after_whole_seconds() {
        assert_eq!(parse_retry_after(&mock_response(429, Some("120"), "")), 120);
    }

    #[test]
    fn retry_after_fractional_rounds_up() {
        // Discord reports sub-second buckets such as "0.35"
        assert_eq!(parse_retry_after(&mock_response(429, Some("0.35"), "")), 1);
    }

    #[test]
    fn retry_after_missing_or_garbage_defaults() {
        assert_eq!(parse_retry_after(&mock_response(429, None, "")), 60);
        assert_eq!(parse_retry_after(&mock_response(429, Some("soon"), "")), 60);
        assert_eq!(parse_retry_after(&mock_response(429, Some("-3"), "")), 60);
    }

    #[tokio::test]
    async fn rate_limited_response() {
        let err = check_response(mock_response(429, Some("30"), ""))
            .await
            .unwrap_err();
        assert!(matches!(err, SinkError::RateLimited { retry_after_secs: 30 }));
    }

    #[tokio::test]
    async fn api_error_keeps_body() {
        let err = check_response(mock_response(400, None, r#"{"message":"Cannot send an empty message"}"#))
            .await
            .unwrap_err();
        match err {
            SinkError::Api { status, message } => {
                assert_eq!(status, 400);
                assert!(message.contains("empty message"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn no_content_is_success() {
        assert!(check_response(mock_response(204, None, "")).await.is_ok());
    }
}
