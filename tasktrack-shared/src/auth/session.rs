/// Session transport — cookie with Bearer header fallback
///
/// The session token travels in a browser-managed cookie that scripts cannot
/// read (HttpOnly) and that only flows on same-site requests (SameSite=Lax).
/// Non-browser clients send `Authorization: Bearer <token>` instead.
///
/// The cookie's Max-Age matches the token's own 7-day validity, so the
/// browser drops the cookie at roughly the same time the token stops
/// verifying.
///
/// # Clearing
///
/// Per cookie semantics, removal only works when the clear attributes mirror
/// the set attributes (name, path, HttpOnly, SameSite). [`clear_session_cookie`]
/// is built from the same attribute set as [`session_cookie`] for that reason.

use axum::http::{header, HeaderMap};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use super::jwt::TOKEN_VALIDITY_DAYS;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "token";

/// Builds the session cookie carrying a freshly issued token
///
/// Attributes: HttpOnly, SameSite=Lax, Path=/, Max-Age = 7 days. `secure`
/// should be true behind HTTPS (config-driven; off by default for local
/// development).
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .path("/")
        .max_age(Duration::days(TOKEN_VALIDITY_DAYS))
        .build()
}

/// Builds the cookie that clears the session on logout
///
/// Attributes mirror [`session_cookie`] exactly — a mismatch would make the
/// browser silently keep the old cookie.
pub fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .path("/")
        .max_age(Duration::ZERO)
        .build()
}

/// Extracts the session token from an incoming request
///
/// Prefers the session cookie; falls back to an `Authorization: Bearer`
/// header for non-browser clients. Returns `None` when neither is present —
/// absence is not an error here, the access control gate decides what it
/// means.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|token| token.to_string())
}
