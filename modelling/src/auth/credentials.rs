//! Session token lookup for the configured transport.

use axum::http::{HeaderMap, header};

use crate::config::{AuthConfig, TokenTransport};

/// Find the raw session token on a request.
///
/// Only the transport configured for the deployment is consulted. Returns `None` if the
/// header or cookie is missing, not valid UTF-8, or empty.
pub fn find_token<'h>(headers: &'h HeaderMap, auth: &AuthConfig) -> Option<&'h str> {
    match auth.transport {
        TokenTransport::Bearer => bearer_token(headers),
        TokenTransport::Cookie => cookie_token(headers, &auth.cookie_name),
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    value.strip_prefix("Bearer ").map(str::trim).filter(|t| !t.is_empty())
}

fn cookie_token<'h>(headers: &'h HeaderMap, cookie_name: &str) -> Option<&'h str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|cookie| cookie.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

/// Build the `Set-Cookie` value issued on login in cookie deployments.
///
/// `Secure` is a bare attribute, so it is only emitted when `cookie_secure` is set.
pub fn session_cookie(token: &str, auth: &AuthConfig) -> String {
    let mut cookie = format!("{}={}; Path=/; HttpOnly", auth.cookie_name, token);
    if auth.cookie_secure {
        cookie.push_str("; Secure");
    }
    cookie.push_str(&format!(
        "; SameSite={}; Max-Age={}",
        auth.cookie_same_site,
        auth.token_expiry.as_secs()
    ));
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn cookie_config() -> AuthConfig {
        AuthConfig {
            transport: TokenTransport::Cookie,
            ..Default::default()
        }
    }

    #[test]
    fn test_bearer_transport() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(find_token(&headers, &AuthConfig::default()), Some("abc.def.ghi"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert_eq!(find_token(&headers, &AuthConfig::default()), None);
    }

    #[test]
    fn test_cookie_transport_ignores_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(find_token(&headers, &cookie_config()), None);

        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; accessToken=tok123; other=1"));
        assert_eq!(find_token(&headers, &cookie_config()), Some("tok123"));
    }

    #[test]
    fn test_session_cookie_format() {
        let cookie = session_cookie("tok", &cookie_config());
        assert_eq!(cookie, "accessToken=tok; Path=/; HttpOnly; Secure; SameSite=strict; Max-Age=86400");
    }

    #[test]
    fn test_insecure_cookie_omits_secure_attribute() {
        let auth = AuthConfig {
            cookie_secure: false,
            ..cookie_config()
        };
        let cookie = session_cookie("tok", &auth);
        assert_eq!(cookie, "accessToken=tok; Path=/; HttpOnly; SameSite=strict; Max-Age=86400");
        assert!(!cookie.contains("Secure"));
    }
}
