use std::sync::Arc;

use tracing::{info, warn};

use crate::users::error::AuthError;
use crate::users::password::{hash_password, verify_password};
use crate::users::repo::UserStore;
use crate::users::repo_types::User;

/// Signup and signin on top of a [`UserStore`]. Holds no state of its
/// own, so one can be built per request from a shared store handle.
pub struct CredentialService {
    users: Arc<dyn UserStore>,
}

impl CredentialService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Create an account with a salted, hashed credential. Fails with
    /// [`AuthError::EmailInUse`] if the email is already registered;
    /// in that case nothing is written.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let existing = self.users.find(email).await?;
        if !existing.is_empty() {
            warn!(email = %email, "signup with email already in use");
            return Err(AuthError::EmailInUse);
        }

        let composite = hash_password(password)?;
        let user = self.users.create(email, &composite).await?;

        info!(user_id = user.id, email = %user.email, "user registered");
        Ok(user)
    }

    /// Check a credential against the stored record. Never writes.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let mut matches = self.users.find(email).await?;
        if matches.is_empty() {
            warn!(email = %email, "signin with unknown email");
            return Err(AuthError::UserNotFound);
        }
        // Duplicates can only exist if two registrations raced; the
        // first record wins.
        let user = matches.remove(0);

        if !verify_password(password, &user.password)? {
            warn!(email = %email, user_id = user.id, "signin with invalid password");
            return Err(AuthError::InvalidCredentials);
        }

        info!(user_id = user.id, email = %user.email, "user authenticated");
        Ok(user)
    }
}
