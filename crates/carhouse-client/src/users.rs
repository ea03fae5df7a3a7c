//! User listing and partial updates (block toggle, role changes).

use reqwest::Method;

use carhouse_core::ServiceError;

use crate::backend::{Backend, FailureKind};
use crate::model::{User, UserPatch};

impl Backend {
    /// All registered users.
    pub async fn get_users(&self) -> Result<Vec<User>, ServiceError> {
        let value = self.get_json("/rest/users").await?;
        Self::items(value, "user")
    }

    /// Apply a partial update to a user. Blocking and unblocking are two
    /// independent calls with explicit values, never a toggle.
    pub async fn update_user(&self, id: &str, patch: &UserPatch) -> Result<User, ServiceError> {
        let value = self
            .execute(
                self.request(Method::PATCH, &format!("/rest/users/{}", id))
                    .json(patch),
                FailureKind::Write,
            )
            .await?;
        Self::record(value, "user")
    }
}
