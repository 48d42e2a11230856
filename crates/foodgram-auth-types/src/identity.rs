//! Gateway-injected identity headers extractor.

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

use foodgram_domain::user::UserRole;

pub const USER_ID_HEADER: &str = "x-foodgram-user-id";
pub const USER_ROLE_HEADER: &str = "x-foodgram-user-role";

/// User identity injected by the gateway via `x-foodgram-user-id` and `x-foodgram-user-role`.
///
/// As a required extractor it returns 401 if either header is absent or malformed.
/// As `Option<IdentityHeaders>` it yields `None` for anonymous requests (no
/// user-id header) and still rejects malformed headers with 401.
#[derive(Debug, Clone)]
pub struct IdentityHeaders {
    pub user_id: Uuid,
    pub user_role: u8,
}

impl IdentityHeaders {
    pub fn role(&self) -> Option<UserRole> {
        UserRole::from_u8(self.user_role)
    }

    pub fn is_admin(&self) -> bool {
        self.role().is_some_and(UserRole::is_admin)
    }
}

fn header_value<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts.headers.get(name).and_then(|v| v.to_str().ok())
}

fn parse_identity(parts: &Parts) -> Result<IdentityHeaders, StatusCode> {
    let user_id = header_value(parts, USER_ID_HEADER)
        .and_then(|s| s.parse::<Uuid>().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;
    let user_role = header_value(parts, USER_ROLE_HEADER)
        .and_then(|s| s.parse::<u8>().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;
    Ok(IdentityHeaders { user_id, user_role })
}

impl<S> FromRequestParts<S> for IdentityHeaders
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // axum-core 0.5 declares `fn -> impl Future + Send`; parse synchronously and
    // hand back a 'static future so no borrow of `parts` is captured.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let identity = parse_identity(parts);
        async move { identity }
    }
}

impl<S> OptionalFromRequestParts<S> for IdentityHeaders
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Option<Self>, Self::Rejection>> + Send {
        let identity = if parts.headers.contains_key(USER_ID_HEADER) {
            parse_identity(parts).map(Some)
        } else {
            Ok(None)
        };
        async move { identity }
    }
}
