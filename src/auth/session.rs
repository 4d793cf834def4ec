use actix_web::cookie::{time::Duration as CookieDuration, Cookie, CookieJar, Key, SameSite};
use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use chrono::{DateTime, Duration, Utc};
use futures_util::future::{ready, Ready};

use super::AuthError;
use crate::error::ApiError;
use crate::http::AppState;

pub const SESSION_COOKIE: &str = "orders_session";
pub const STATE_COOKIE: &str = "orders_oauth_state";

/// How long a login attempt may take between /login and /callback
const STATE_TTL_SECS: i64 = 600;

/// A verified login session
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub subject: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies signed cookies.
///
/// Session cookie value: `<subject>|<expiry unix seconds>`, signed (HMAC)
/// with `key`. The subject may itself contain `|`, so the expiry is split
/// off from the right.
pub struct SessionManager {
    key: Key,
    ttl: Duration,
    required: bool,
    secure_cookies: bool,
}

impl SessionManager {
    pub fn new(key: Key, ttl: Duration, required: bool, secure_cookies: bool) -> Self {
        Self {
            key,
            ttl,
            required,
            secure_cookies,
        }
    }

    /// Whether write endpoints demand a session
    pub fn required(&self) -> bool {
        self.required
    }

    pub fn issue_session(&self, subject: &str) -> Result<Cookie<'static>, AuthError> {
        let expires_at = Utc::now() + self.ttl;
        let value = format!("{}|{}", subject, expires_at.timestamp());
        self.sign(SESSION_COOKIE, value, self.ttl.num_seconds(), SameSite::Lax)
    }

    pub fn issue_state(&self, state: &str) -> Result<Cookie<'static>, AuthError> {
        // The provider may come back with a cross-site form POST
        let same_site = if self.secure_cookies { SameSite::None } else { SameSite::Lax };
        self.sign(STATE_COOKIE, state.to_string(), STATE_TTL_SECS, same_site)
    }

    /// Session carried by the request, if any and still valid
    pub fn current(&self, req: &HttpRequest) -> Option<Session> {
        let cookie = req.cookie(SESSION_COOKIE)?;
        self.verify_session(cookie)
    }

    pub fn verify_session(&self, cookie: Cookie<'static>) -> Option<Session> {
        let value = self.verified_value(cookie, SESSION_COOKIE)?;
        let (subject, expiry) = value.rsplit_once('|')?;
        let expires_at = DateTime::from_timestamp(expiry.parse::<i64>().ok()?, 0)?;

        if subject.is_empty() || expires_at <= Utc::now() {
            return None;
        }

        Some(Session {
            subject: subject.to_string(),
            expires_at,
        })
    }

    /// Plain value of a cookie whose signature checks out
    pub fn verified_value(&self, cookie: Cookie<'static>, name: &str) -> Option<String> {
        let mut jar = CookieJar::new();
        jar.add_original(cookie);
        jar.signed(&self.key).get(name).map(|c| c.value().to_string())
    }

    /// Expired, empty cookie that makes the browser drop `name`
    pub fn removal(&self, name: &'static str) -> Cookie<'static> {
        let mut cookie = Cookie::build(name, "").path("/").finish();
        cookie.make_removal();
        cookie
    }

    fn sign(
        &self,
        name: &'static str,
        value: String,
        max_age_secs: i64,
        same_site: SameSite,
    ) -> Result<Cookie<'static>, AuthError> {
        let cookie = Cookie::build(name, value)
            .path("/")
            .http_only(true)
            .secure(self.secure_cookies)
            .same_site(same_site)
            .max_age(CookieDuration::seconds(max_age_secs))
            .finish();

        let mut jar = CookieJar::new();
        jar.signed_mut(&self.key).add(cookie);
        jar.get(name).cloned().ok_or(AuthError::Session)
    }
}

/// Who is making the request.
///
/// Taking this as a handler argument is what gates an endpoint behind login.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthContext {
    pub subject: String,
    pub anonymous: bool,
}

impl AuthContext {
    fn anonymous() -> Self {
        Self {
            subject: "anonymous".to_string(),
            anonymous: true,
        }
    }

    fn from_request_parts(req: &HttpRequest) -> Result<Self, ApiError> {
        let state = req
            .app_data::<web::Data<AppState>>()
            .ok_or_else(|| ApiError::Internal("Application state missing".to_string()))?;

        if !state.sessions.required() {
            return Ok(Self::anonymous());
        }

        let cookie = req
            .cookie(SESSION_COOKIE)
            .ok_or_else(|| ApiError::Unauthorized("Login required".to_string()))?;

        let session = state
            .sessions
            .verify_session(cookie)
            .ok_or_else(|| ApiError::Unauthorized("Session is invalid or expired".to_string()))?;

        Ok(Self {
            subject: session.subject,
            anonymous: false,
        })
    }
}

impl FromRequest for AuthContext {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_request_parts(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(ttl_secs: i64) -> SessionManager {
        SessionManager::new(Key::generate(), Duration::seconds(ttl_secs), true, false)
    }

    #[test]
    fn test_issued_session_verifies() {
        let sessions = manager(3600);
        let cookie = sessions.issue_session("auth0|abc123").unwrap();

        let session = sessions.verify_session(cookie).unwrap();
        assert_eq!(session.subject, "auth0|abc123");
        assert!(session.expires_at > Utc::now());
    }

    #[test]
    fn test_tampered_session_is_rejected() {
        let sessions = manager(3600);
        let cookie = sessions.issue_session("alice").unwrap();
        let forged = cookie.value().replace("alice", "mallory");

        assert!(sessions
            .verify_session(Cookie::new(SESSION_COOKIE, forged))
            .is_none());
    }

    #[test]
    fn test_session_signed_with_other_key_is_rejected() {
        let cookie = manager(3600).issue_session("alice").unwrap();
        assert!(manager(3600).verify_session(cookie).is_none());
    }

    #[test]
    fn test_expired_session_is_rejected() {
        let sessions = manager(-10);
        let cookie = sessions.issue_session("alice").unwrap();
        assert!(sessions.verify_session(cookie).is_none());
    }

    #[test]
    fn test_state_cookie_round_trip() {
        let sessions = manager(3600);
        let cookie = sessions.issue_state("csrf-token").unwrap();

        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(
            sessions.verified_value(cookie, STATE_COOKIE).as_deref(),
            Some("csrf-token")
        );
    }
}
