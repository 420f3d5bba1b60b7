//! Threaded text comments and their ownership rule.

use serde::{Deserialize, Serialize};

use crate::session::Identity;
use crate::types::{DbId, Timestamp};

/// The author embedded in every comment payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentAuthor {
    pub id: DbId,
    pub username: String,
}

/// A comment on one video. Ordering is insertion order: the backend
/// lists comments oldest-first and new comments append at the tail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: DbId,
    pub text: String,
    pub timestamp: Timestamp,
    pub user: CommentAuthor,
}

impl Comment {
    /// Mutation is permitted only to the author or an admin.
    pub fn can_be_modified_by(&self, actor: &Identity) -> bool {
        actor.role.is_admin() || actor.user_id == self.user.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Role;

    fn comment(author_id: DbId) -> Comment {
        Comment {
            id: 1,
            text: "hello".into(),
            timestamp: chrono::Utc::now(),
            user: CommentAuthor {
                id: author_id,
                username: "author".into(),
            },
        }
    }

    fn actor(user_id: DbId, role: Role) -> Identity {
        Identity {
            token: "t".into(),
            user_id,
            role,
        }
    }

    #[test]
    fn author_may_modify() {
        assert!(comment(7).can_be_modified_by(&actor(7, Role::User)));
    }

    #[test]
    fn admin_may_modify_any() {
        assert!(comment(9).can_be_modified_by(&actor(7, Role::Admin)));
    }

    #[test]
    fn other_users_may_not() {
        assert!(!comment(9).can_be_modified_by(&actor(7, Role::User)));
    }
}
