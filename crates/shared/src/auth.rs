//! Authentication claims carried by access tokens.
//!
//! Chemstock does not implement credential handling itself; an external
//! identity provider issues signed tokens. The claims here are the only
//! identity surface the core consumes: who acted, with which role, and
//! which facility (if any) they are assigned to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Role;

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// User's role.
    pub role: Role,
    /// Facility the user is assigned to (required for engineers).
    pub facility: Option<Uuid>,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(
        user_id: Uuid,
        role: Role,
        facility: Option<Uuid>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            role,
            facility,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the assigned facility, if any.
    #[must_use]
    pub const fn assigned_facility(&self) -> Option<Uuid> {
        self.facility
    }
}
