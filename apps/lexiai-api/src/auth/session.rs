//! Cookie sessions
//!
//! The cookie holds `<sid>.<hex hmac-sha256(sid)>`; the session row maps the
//! sid to a user until it expires.

use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tower_cookies::cookie::SameSite;
use tower_cookies::{Cookie, Cookies};

use crate::db;
use crate::error::ApiError;
use crate::state::AppState;

type HmacSha256 = Hmac<Sha256>;

pub const SESSION_COOKIE: &str = "lexiai.sid";

/// Session lifetime in seconds (7 days)
pub const SESSION_TTL_SECS: i64 = 7 * 24 * 60 * 60;

fn signature(sid: &str, secret: &str) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(sid.as_bytes());
    Some(mac)
}

/// Cookie value for a session id
pub fn sign(sid: &str, secret: &str) -> String {
    let tag = signature(sid, secret)
        .map(|mac| hex::encode(mac.finalize().into_bytes()))
        .unwrap_or_default();
    format!("{sid}.{tag}")
}

/// Session id from a cookie value, if the signature checks out
pub fn unsign<'a>(value: &'a str, secret: &str) -> Option<&'a str> {
    let (sid, tag) = value.rsplit_once('.')?;
    let tag = hex::decode(tag).ok()?;
    signature(sid, secret)?.verify_slice(&tag).ok()?;
    Some(sid)
}

/// Create a session row for `user_id` and hand the client its cookie
pub async fn start(state: &AppState, cookies: &Cookies, user_id: &str) -> Result<(), ApiError> {
    let sid = db::new_id();
    let expire = Utc::now() + chrono::Duration::seconds(SESSION_TTL_SECS);
    db::sessions::create(&state.db, &sid, user_id, expire).await?;

    let cookie = Cookie::build((SESSION_COOKIE, sign(&sid, &state.config.session_secret)))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.secure_cookies)
        .max_age(time::Duration::seconds(SESSION_TTL_SECS))
        .build();
    cookies.add(cookie);

    tracing::debug!(user_id, "session started");
    Ok(())
}

/// User id of the request's session, if it is signed and still live
pub async fn current_user_id(state: &AppState, cookies: &Cookies) -> Result<Option<String>, ApiError> {
    let Some(cookie) = cookies.get(SESSION_COOKIE) else {
        return Ok(None);
    };
    let Some(sid) = unsign(cookie.value(), &state.config.session_secret) else {
        tracing::debug!("ignoring session cookie with bad signature");
        return Ok(None);
    };

    Ok(db::sessions::find_user_id(&state.db, sid).await?)
}

/// Delete the session row and expire the cookie
pub async fn destroy(state: &AppState, cookies: &Cookies) -> Result<(), ApiError> {
    if let Some(cookie) = cookies.get(SESSION_COOKIE) {
        if let Some(sid) = unsign(cookie.value(), &state.config.session_secret) {
            db::sessions::delete(&state.db, sid).await?;
        }
    }

    cookies.remove(Cookie::build(SESSION_COOKIE).path("/").build());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const SECRET: &str = "session-secret";

    #[test]
    fn signed_value_round_trips() {
        let value = sign("3f2c9a", SECRET);
        assert_eq!(unsign(&value, SECRET), Some("3f2c9a"));
    }

    #[test]
    fn other_secret_is_rejected() {
        let value = sign("3f2c9a", SECRET);
        assert_eq!(unsign(&value, "different"), None);
    }

    #[test]
    fn unsigned_values_are_rejected() {
        assert_eq!(unsign("3f2c9a", SECRET), None);
        assert_eq!(unsign("3f2c9a.zz", SECRET), None);
        assert_eq!(unsign("", SECRET), None);
    }

    proptest! {
        #[test]
        fn swapping_the_sid_breaks_the_signature(sid in "[a-f0-9-]{8,36}", other in "[a-f0-9-]{8,36}") {
            prop_assume!(sid != other);
            let value = sign(&sid, SECRET);
            let (_, tag) = value.rsplit_once('.').unwrap();
            let forged = format!("{other}.{tag}");
            prop_assert_eq!(unsign(&forged, SECRET), None);
        }
    }
}
