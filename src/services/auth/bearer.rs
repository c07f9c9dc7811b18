/*
 * Responsibility
 * - `Authorization: Bearer <token>` から token 文字列を取り出す (検証はしない)
 * - 形式が違えば暗号処理の前に失敗させる
 */
use axum::http::{HeaderMap, header};

const BEARER: &str = "Bearer";

/// Extract the token from an `Authorization` header value.
///
/// The value is split on the literal `Bearer`; exactly two parts must result,
/// and the second (trimmed) is the token.
pub fn token_from_header(value: &str) -> Option<&str> {
    let mut parts = value.split(BEARER);
    let _before = parts.next()?;
    let token = parts.next()?;

    if parts.next().is_some() {
        return None;
    }

    Some(token.trim())
}

/// Extract the bearer token from the request's `Authorization` header.
pub fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(token_from_header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn extracts_token_after_bearer() {
        assert_eq!(token_from_header("Bearer abc.def.ghi"), Some("abc.def.ghi"));
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(token_from_header("Bearer   abc.def.ghi \t"), Some("abc.def.ghi"));
    }

    #[test]
    fn rejects_malformed_values() {
        for value in ["", "abc", "Bearer a Bearer b", "bearer abc", "Basic dXNlcjpwYXNz"] {
            assert_eq!(token_from_header(value), None, "value: {value:?}");
        }
    }

    #[test]
    fn reads_authorization_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(token_from_headers(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer t0k3n"));
        assert_eq!(token_from_headers(&headers), Some("t0k3n"));
    }

    #[test]
    fn rejects_non_utf8_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap(),
        );

        assert_eq!(token_from_headers(&headers), None);
    }
}
