//! HTTP Basic authentication for the admin routes.

use std::fmt;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use subtle::ConstantTimeEq;
use warp::{Filter, Rejection};

use crate::error::ApiError;

/// The single admin account, taken from configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    username: String,
    password: String,
}

impl AdminCredentials {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn matches(
        &self,
        username: &str,
        password: &str,
    ) -> bool {
        let user_ok = self.username.as_bytes().ct_eq(username.as_bytes());
        let pass_ok = self.password.as_bytes().ct_eq(password.as_bytes());
        (user_ok & pass_ok).into()
    }
}

impl fmt::Debug for AdminCredentials {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Splits an `Authorization: Basic ...` header into user name and password.
pub fn parse_basic_auth(header: &str) -> Option<(String, String)> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(token.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// Passes only requests whose Basic credentials match `credentials`.
pub fn admin_auth(
    credentials: Arc<AdminCredentials>
) -> impl Filter<Extract = (), Error = Rejection> + Clone {
    warp::header::optional::<String>("authorization")
        .and_then(move |header: Option<String>| {
            let credentials = credentials.clone();
            async move {
                match header.as_deref().and_then(parse_basic_auth) {
                    Some((username, password)) if credentials.matches(&username, &password) => {
                        Ok(())
                    }
                    _ => Err(warp::reject::custom(ApiError::Unauthorized)),
                }
            }
        })
        .untuple_one()
}
