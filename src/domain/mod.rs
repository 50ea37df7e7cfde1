//! Domain layer: core types shared across the pipeline and the API.
//!
//! This module contains the server-side domain model: member accounts and
//! their profiles, governance proposals fetched from the Snapshot hub, and
//! the recommendation aggregate produced by the pipeline.

pub mod account;
pub mod profile;
pub mod proposal;
pub mod recommendation;

pub use account::Account;
pub use profile::{LanguageModel, Profile};
pub use proposal::{Proposal, Space, SpaceRef};
pub use recommendation::{ProposalSummary, Recommendation, TokenUsage};
