//! The acting principal of a request.

use agora_core::models::user::User;
use uuid::Uuid;

/// Who performs an operation. Passed explicitly to mutating calls.
#[derive(Debug, Clone)]
pub enum Actor {
    /// Unauthenticated request (e.g. self-registration).
    Guest,
    User(User),
}

impl Actor {
    pub fn id(&self) -> Option<Uuid> {
        self.user().map(|u| u.id)
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Actor::Guest => None,
            Actor::User(user) => Some(user),
        }
    }

    pub fn is_guest(&self) -> bool {
        matches!(self, Actor::Guest)
    }
}
