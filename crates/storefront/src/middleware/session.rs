//! Signed-cookie sessions.
//!
//! The session is the [`CurrentUser`] pair itself, serialized to JSON,
//! base64url-encoded and signed with the state's cookie key. Nothing is kept
//! server-side; a cookie whose signature does not verify is ignored.

use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::models::CurrentUser;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "bakugai_session";

/// Encode a user for the cookie value.
#[must_use]
pub fn encode_session(user: &CurrentUser) -> String {
    // Serializing a struct of an integer and a string cannot fail.
    let json = serde_json::to_vec(user).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

/// Decode a cookie value, `None` if it is not a valid session payload.
#[must_use]
pub fn decode_session(value: &str) -> Option<CurrentUser> {
    let json = URL_SAFE_NO_PAD.decode(value).ok()?;
    serde_json::from_slice(&json).ok()
}

/// The user carried by a verified session cookie.
#[must_use]
pub fn current_user(jar: &SignedCookieJar) -> Option<CurrentUser> {
    jar.get(SESSION_COOKIE_NAME)
        .and_then(|cookie| decode_session(cookie.value()))
}

/// Store `user` in the session.
#[must_use]
pub fn set_current_user(jar: SignedCookieJar, user: &CurrentUser) -> SignedCookieJar {
    jar.add(session_cookie(encode_session(user)))
}

/// Clear the session, whether or not one exists.
#[must_use]
pub fn clear_current_user(jar: SignedCookieJar) -> SignedCookieJar {
    jar.remove(session_cookie(String::new()))
}

fn session_cookie(value: String) -> Cookie<'static> {
    Cookie::build(Cookie::new(SESSION_COOKIE_NAME, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, header};
    use axum::response::IntoResponse;
    use axum_extra::extract::cookie::Key;

    use bakugai_core::UserId;

    use super::*;
    use crate::state::derive_cookie_key;

    fn taro() -> CurrentUser {
        CurrentUser {
            id: UserId::new(12),
            name: "山田 太郎".to_string(),
        }
    }

    /// The `name=value` pair a browser would send back for `jar`.
    fn browser_cookie(jar: SignedCookieJar) -> String {
        let response = (jar, "ok").into_response();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    fn jar_from(cookie: &str, key: Key) -> SignedCookieJar {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        SignedCookieJar::from_headers(&headers, key)
    }

    #[test]
    fn test_encoded_session_is_cookie_safe() {
        let value = encode_session(&taro());
        assert!(
            value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
        assert_eq!(decode_session(&value), Some(taro()));
    }

    #[test]
    fn test_garbage_is_not_a_session() {
        assert_eq!(decode_session("not base64!"), None);
        assert_eq!(decode_session(&URL_SAFE_NO_PAD.encode("{}")), None);
    }

    #[test]
    fn test_signed_round_trip() {
        let key = derive_cookie_key("round trip secret").unwrap();
        let cookie = browser_cookie(set_current_user(SignedCookieJar::new(key.clone()), &taro()));

        assert_eq!(current_user(&jar_from(&cookie, key)), Some(taro()));
    }

    #[test]
    fn test_unsigned_cookie_is_ignored() {
        let key = derive_cookie_key("round trip secret").unwrap();
        let forged = format!("{SESSION_COOKIE_NAME}={}", encode_session(&taro()));

        assert_eq!(current_user(&jar_from(&forged, key)), None);
    }

    #[test]
    fn test_cookie_signed_with_other_key_is_ignored() {
        let ours = derive_cookie_key("ours").unwrap();
        let theirs = derive_cookie_key("theirs").unwrap();
        let cookie = browser_cookie(set_current_user(SignedCookieJar::new(theirs), &taro()));

        assert_eq!(current_user(&jar_from(&cookie, ours)), None);
    }

    #[test]
    fn test_clear_removes_session() {
        let key = derive_cookie_key("clear").unwrap();
        let jar = set_current_user(SignedCookieJar::new(key), &taro());
        let jar = clear_current_user(jar);

        assert_eq!(current_user(&jar), None);
    }
}
