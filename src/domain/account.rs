//! Member account identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A member account.
///
/// The account ID is the `sub` claim of the member's bearer token, so the
/// identity provider and this service agree on the same UUID. Accounts are
/// provisioned out of band; the pipeline and the read surface only ever
/// load them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique account identifier (matches the token `sub` claim).
    pub id: Uuid,

    /// Contact address. Recommendation summaries are delivered here.
    pub email: String,

    /// Display handle, unique across accounts.
    pub username: String,

    /// Whether the account may access operator tooling.
    pub is_staff: bool,

    /// Inactive accounts cannot authenticate.
    pub is_active: bool,

    /// Superusers bypass per-object ownership checks in operator tooling.
    pub is_superuser: bool,

    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,
}
