//! Keeps the users table in step with the identity proxy.

use std::sync::Arc;

use tracing::debug;

use homehunt_core::result::AppResult;
use homehunt_core::types::UserId;
use homehunt_database::store::UserStore;
use homehunt_entity::user::User;

/// Records users as they are seen so names can be shown to collaborators.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Create the user on first sight and refresh the display name.
    pub async fn ensure_user(&self, id: UserId, display_name: Option<&str>) -> AppResult<User> {
        let name = display_name.map(str::trim).filter(|n| !n.is_empty());
        let user = self.users.upsert_user(id, name).await?;
        debug!(user_id = %id, "User ensured");
        Ok(user)
    }
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService").finish_non_exhaustive()
    }
}
