//! Process-wide identity store.
//!
//! [`SessionContext`] holds the current bearer identity for the whole
//! client process. It is set on successful login, cleared on logout, and
//! read-only everywhere else -- components receive a clone of the handle
//! explicitly rather than reaching for a global.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};
use crate::types::DbId;

/// Role carried in the token claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// The signed-in user as seen by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Opaque bearer credential attached to every authorized request.
    pub token: String,
    /// The user's backend id (`sub` claim).
    pub user_id: DbId,
    /// The user's role (`role` claim).
    pub role: Role,
}

/// Cheaply clonable handle to the process-wide session slot.
///
/// Writers: the auth flow only. Readers: every network-issuing component.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    inner: Arc<RwLock<Option<Identity>>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a new identity (login).
    pub fn set(&self, identity: Identity) {
        let mut slot = self.inner.write().expect("session lock poisoned");
        *slot = Some(identity);
    }

    /// Drop the current identity (logout).
    pub fn clear(&self) {
        let mut slot = self.inner.write().expect("session lock poisoned");
        *slot = None;
    }

    /// A snapshot of the current identity, if any.
    pub fn current(&self) -> Option<Identity> {
        self.inner.read().expect("session lock poisoned").clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.read().expect("session lock poisoned").is_some()
    }

    /// The current identity, or [`ClientError::AuthRequired`] when absent.
    pub fn require(&self) -> ClientResult<Identity> {
        self.current().ok_or(ClientError::AuthRequired)
    }
}
