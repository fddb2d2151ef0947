use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use uuid::Uuid;

use super::PortalError;
use crate::workflows::talentpool::domain::UserId;

/// Header carrying the user id authenticated by the host platform.
pub const PORTAL_USER_HEADER: &str = "x-portal-user";
/// Cookie holding the double-submit CSRF token.
pub const CSRF_COOKIE: &str = "talentpool_csrf";
/// Form field the token is echoed in.
pub const CSRF_FIELD: &str = "csrf_token";

/// Authenticated portal caller.
#[derive(Debug, Clone)]
pub struct PortalSession {
    pub user_id: UserId,
    csrf_cookie: Option<String>,
}

impl PortalSession {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            csrf_cookie: None,
        }
    }

    /// Token for the next form, reusing the one already set in the browser.
    pub fn csrf_token(&self) -> CsrfToken {
        match self.csrf_cookie.as_deref() {
            Some(token) if !token.is_empty() => CsrfToken(token.to_string()),
            _ => CsrfToken::issue(),
        }
    }

    pub fn verify_csrf(&self, submitted: Option<&str>) -> Result<(), PortalError> {
        match (self.csrf_cookie.as_deref(), submitted.map(str::trim)) {
            (Some(expected), Some(submitted)) if !expected.is_empty() && expected == submitted => {
                Ok(())
            }
            _ => Err(PortalError::CsrfRejected),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for PortalSession
where
    S: Send + Sync,
{
    type Rejection = PortalError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(PORTAL_USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|id| *id > 0)
            .ok_or(PortalError::Unauthenticated)?;

        Ok(Self {
            user_id: UserId(user_id),
            csrf_cookie: cookie_value(parts, CSRF_COOKIE),
        })
    }
}

fn cookie_value(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfToken(String);

impl CsrfToken {
    pub fn issue() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn cookie(&self) -> String {
        format!("{CSRF_COOKIE}={}; Path=/my; HttpOnly; SameSite=Strict", self.0)
    }
}
