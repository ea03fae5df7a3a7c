//! Session and account surface: login, logout, current session, register.
//!
//! The session token is opaque — the backend issues and validates it, we
//! only carry it back on each call.

use reqwest::Method;
use serde_json::json;

use carhouse_core::{Role, ServiceError};

use crate::backend::{Backend, FailureKind};
use crate::model::{RegisterInput, Session, SessionUser, User};

impl Backend {
    /// Exchange credentials for a session token.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ServiceError> {
        let body = json!({"email": email, "password": password});
        let value = self
            .execute(
                self.request(Method::POST, "/auth/login").json(&body),
                FailureKind::Write,
            )
            .await?;
        Self::record(value, "session")
    }

    /// Resolve the user behind a session token. `None` means the token is
    /// missing, expired or revoked — not an error. A pure read, so it gets
    /// the same retry-once treatment as the list fetches.
    pub async fn get_session(&self, token: &str) -> Result<Option<SessionUser>, ServiceError> {
        match self.get_json_auth("/auth/session", Some(token)).await {
            Ok(value) => Ok(Some(Self::record(value, "session user")?)),
            Err(ServiceError::Unauthorized(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Revoke the session behind a token. A failed revoke is logged by the
    /// caller, not fatal — the cookie is cleared either way.
    pub async fn logout(&self, token: &str) -> Result<(), ServiceError> {
        self.execute(
            self.request(Method::POST, "/auth/logout").bearer_auth(token),
            FailureKind::Write,
        )
        .await?;
        Ok(())
    }

    /// Register a new account with the given role.
    pub async fn register(&self, input: &RegisterInput) -> Result<User, ServiceError> {
        let value = self
            .execute(
                self.request(Method::POST, "/auth/register").json(input),
                FailureKind::Write,
            )
            .await?;
        Self::record(value, "user")
    }

    /// Grant admin-table membership to a user.
    pub async fn add_admin(
        &self,
        user_id: &str,
        role: Role,
        permissions: &[&str],
    ) -> Result<(), ServiceError> {
        let body = json!({
            "user_id": user_id,
            "role": role,
            "permissions": permissions,
        });
        self.execute(
            self.request(Method::POST, "/rest/admins").json(&body),
            FailureKind::Write,
        )
        .await?;
        Ok(())
    }

    /// Revoke admin-table membership.
    pub async fn remove_admin(&self, user_id: &str) -> Result<(), ServiceError> {
        self.execute(
            self.request(Method::DELETE, &format!("/rest/admins/{}", user_id)),
            FailureKind::Write,
        )
        .await?;
        Ok(())
    }
}
