//! Governance proposal and space types fetched from the Snapshot hub.

use serde::{Deserialize, Serialize};

/// A governance proposal as returned by the Snapshot hub.
///
/// Only the fields the pipeline reads are decoded; the hub returns more.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    /// Hub-assigned proposal identifier (the webhook `id` without its
    /// `proposal/` prefix).
    pub id: String,

    /// Proposal title.
    pub title: String,

    /// Full proposal body text.
    pub body: String,

    /// The space the proposal belongs to.
    pub space: SpaceRef,
}

/// Reference to a space embedded in a proposal response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceRef {
    /// Space identifier (an ENS-style name such as `aave.eth`).
    pub id: String,
}

/// A governance space (organization) as returned by the Snapshot hub.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Space {
    /// Space identifier.
    pub id: String,

    /// Free-text description of the organization. Absent for spaces that
    /// never filled one in.
    pub about: Option<String>,
}
