//! Authorization for crudkit
//!
//! Provides:
//! - per-resource [`AuthPolicy`] (public or bearer-token protected)
//! - a username/password [`Credentials`] table used to mint tokens
//! - the [`require_bearer`] middleware guarding protected routes

use crate::core::extractors::BearerAuth;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

/// Authorization policy for a resource's routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthPolicy {
    /// Public access (no auth required)
    #[default]
    Public,

    /// A valid bearer token is required
    Authenticated,
}

impl AuthPolicy {
    pub fn requires_token(&self) -> bool {
        matches!(self, AuthPolicy::Authenticated)
    }
}

/// One login accepted by the token endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserCredential {
    pub username: String,
    pub password: String,
    /// Identity stamped into issued tokens
    pub identity: i64,
}

/// Username/password table checked by the token endpoint
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    users: Vec<UserCredential>,
}

impl Credentials {
    pub fn new(users: Vec<UserCredential>) -> Self {
        Self { users }
    }

    /// Return the identity for a matching username/password pair
    ///
    /// Empty usernames or passwords never match.
    pub fn verify(&self, username: &str, password: &str) -> Option<i64> {
        if username.is_empty() || password.is_empty() {
            return None;
        }

        let user = self.users.iter().find(|u| u.username == username)?;
        let matches: bool = user.password.as_bytes().ct_eq(password.as_bytes()).into();
        matches.then_some(user.identity)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// Middleware rejecting requests without a valid bearer token
///
/// Verified claims are inserted into the request extensions.
pub async fn require_bearer(
    BearerAuth(claims): BearerAuth,
    mut req: Request,
    next: Next,
) -> Response {
    req.extensions_mut().insert(claims);
    next.run(req).await
}
